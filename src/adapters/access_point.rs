//! Soft access point, HTTP front end and captive DNS.
//!
//! Brings up a WPA2 soft-AP at the configured address, serves the captive
//! portal pages with data from the [`StatusPage`] mirror, and answers
//! every DNS query with our own address so client OSes detect the portal.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::wifi` in AP mode plus
//!   `EspHttpServer` with a wildcard GET handler.
//! - **all other targets**: simulation stubs; the DNS responder still binds
//!   a real UDP socket so it can be exercised on the host.
//!
//! The HTTP layer is a thin shell: [`CaptivePortal::route`] decides, and
//! [`render_reply`] turns the decision into status, headers and body.

use std::sync::{Arc, Mutex};

use log::{info, warn};

use crate::adapters::status_page::StatusPage;
use crate::config::PortalConfig;
use crate::error::PortalError;
use crate::portal::dns::{CaptiveDns, DNS_PORT};
use crate::portal::pages::{CAPTIVE_HTML, SUCCESS_HTML};
use crate::portal::{CaptivePortal, PageTier, PortalRequest, PortalResponse, CACHE_CONTROL};

// ───────────────────────────────────────────────────────────────
// Response rendering
// ───────────────────────────────────────────────────────────────

/// A fully rendered HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub location: Option<heapless::String<32>>,
    pub body: String,
}

impl HttpReply {
    fn empty(status: u16) -> Self {
        Self { status, content_type: None, location: None, body: String::new() }
    }

    /// Header pairs to send, `Cache-Control` included on pages.
    pub fn headers(&self) -> heapless::Vec<(&str, &str), 3> {
        let mut h = heapless::Vec::new();
        if let Some(ct) = self.content_type {
            let _ = h.push(("Content-Type", ct));
            let _ = h.push(("Cache-Control", CACHE_CONTROL));
        }
        if let Some(loc) = &self.location {
            let _ = h.push(("Location", loc.as_str()));
        }
        h
    }
}

/// Turn a routing decision into bytes, pulling live values from `status`.
pub fn render_reply(response: &PortalResponse, status: &StatusPage) -> HttpReply {
    match response {
        PortalResponse::Page(tier) => {
            let body = match tier {
                PageTier::Captive => String::from(CAPTIVE_HTML),
                PageTier::Success => String::from(SUCCESS_HTML),
                PageTier::Main => status.main_html(),
            };
            HttpReply { status: 200, content_type: Some("text/html"), location: None, body }
        }
        PortalResponse::StatusJson => HttpReply {
            status: 200,
            content_type: Some("application/json"),
            location: None,
            body: status.json(),
        },
        PortalResponse::Redirect(to) => HttpReply {
            status: 302,
            content_type: None,
            location: Some(to.clone()),
            body: String::new(),
        },
        PortalResponse::Status(code) => HttpReply::empty(*code),
    }
}

/// Route and render one request against a shared portal.
pub fn handle_request(portal: &Mutex<CaptivePortal>, status: &StatusPage, host: &str, uri: &str) -> HttpReply {
    let req = PortalRequest::new(host, uri);
    let decision = portal
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .route(&req);
    render_reply(&decision, status)
}

// ───────────────────────────────────────────────────────────────
// Platform handles
// ───────────────────────────────────────────────────────────────

/// Peripherals the soft-AP consumes.
#[cfg(target_os = "espidf")]
pub struct RadioHandles {
    pub modem: esp_idf_hal::modem::Modem,
    pub sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
    pub nvs: Option<esp_idf_svc::nvs::EspDefaultNvsPartition>,
}

/// Peripherals the soft-AP consumes (none in simulation).
#[cfg(not(target_os = "espidf"))]
pub struct RadioHandles;

// ───────────────────────────────────────────────────────────────
// Access point adapter
// ───────────────────────────────────────────────────────────────

pub struct AccessPoint {
    cfg: PortalConfig,
    dns_interval_ms: u32,
    status: StatusPage,
    portal: Arc<Mutex<CaptivePortal>>,
    dns: Option<CaptiveDns>,
    #[cfg(target_os = "espidf")]
    wifi: Option<esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>>,
    #[cfg(target_os = "espidf")]
    http: Option<esp_idf_svc::http::server::EspHttpServer<'static>>,
}

impl AccessPoint {
    /// Validate credentials and prepare; nothing is started yet.
    pub fn new(cfg: &PortalConfig, dns_interval_ms: u32, status: StatusPage) -> Result<Self, PortalError> {
        validate_credentials(cfg)?;
        Ok(Self {
            cfg: cfg.clone(),
            dns_interval_ms,
            status,
            portal: Arc::new(Mutex::new(CaptivePortal::new(cfg))),
            dns: None,
            #[cfg(target_os = "espidf")]
            wifi: None,
            #[cfg(target_os = "espidf")]
            http: None,
        })
    }

    /// Start radio, web server and DNS.  A DNS bind failure is logged and
    /// the AP keeps running without it.
    pub fn start(&mut self, radio: RadioHandles) -> Result<(), PortalError> {
        self.platform_start(radio)?;
        self.start_dns(DNS_PORT);
        info!("AP: '{}' up at {}", self.cfg.ssid, self.cfg.local_url());
        Ok(())
    }

    /// Service the DNS responder; called every tick.
    pub fn poll(&mut self, now_ms: u32) {
        if let Some(dns) = self.dns.as_mut() {
            dns.poll(now_ms);
        }
    }

    pub fn dns_running(&self) -> bool {
        self.dns.is_some()
    }

    /// Serve one request the way the HTTP handler does.
    pub fn handle(&self, host: &str, uri: &str) -> HttpReply {
        handle_request(&self.portal, &self.status, host, uri)
    }

    fn start_dns(&mut self, port: u16) {
        match CaptiveDns::bind(port, self.cfg.ip, self.cfg.dns_ttl_secs, self.dns_interval_ms) {
            Ok(dns) => self.dns = Some(dns),
            Err(e) => warn!("AP: captive DNS unavailable: {}", e),
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self, radio: RadioHandles) -> Result<(), PortalError> {
        use core::net::Ipv4Addr;

        use esp_idf_svc::http::server::{Configuration as HttpConfiguration, EspHttpServer};
        use esp_idf_svc::http::Method;
        use esp_idf_svc::io::Write;
        use esp_idf_svc::ipv4::{self, Mask, RouterConfiguration, Subnet};
        use esp_idf_svc::netif::{EspNetif, NetifConfiguration, NetifStack};
        use esp_idf_svc::wifi::{
            AccessPointConfiguration, AuthMethod, BlockingWifi, Configuration, EspWifi, WifiDriver,
        };

        let ip = Ipv4Addr::from(self.cfg.ip);
        let ap_netif = EspNetif::new_with_conf(&NetifConfiguration {
            ip_configuration: Some(ipv4::Configuration::Router(RouterConfiguration {
                subnet: Subnet { gateway: ip, mask: Mask(24) },
                dhcp_enabled: true,
                dns: Some(ip),
                secondary_dns: None,
            })),
            ..NetifConfiguration::wifi_default_router()
        })
        .map_err(|_| PortalError::AccessPointFailed)?;

        let driver = WifiDriver::new(radio.modem, radio.sysloop.clone(), radio.nvs)
            .map_err(|_| PortalError::AccessPointFailed)?;
        let sta_netif = EspNetif::new(NetifStack::Sta).map_err(|_| PortalError::AccessPointFailed)?;
        let esp_wifi =
            EspWifi::wrap_all(driver, sta_netif, ap_netif).map_err(|_| PortalError::AccessPointFailed)?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, radio.sysloop).map_err(|_| PortalError::AccessPointFailed)?;

        wifi.set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
            ssid: self.cfg.ssid.clone(),
            password: self.cfg.password.clone(),
            channel: self.cfg.channel,
            auth_method: AuthMethod::WPA2Personal,
            max_connections: u16::from(self.cfg.max_clients),
            ssid_hidden: false,
            ..Default::default()
        }))
        .map_err(|_| PortalError::AccessPointFailed)?;
        wifi.start().map_err(|_| PortalError::AccessPointFailed)?;
        wifi.wait_netif_up().map_err(|_| PortalError::AccessPointFailed)?;

        let mut server = EspHttpServer::new(&HttpConfiguration {
            uri_match_wildcard: true,
            ..Default::default()
        })
        .map_err(|_| PortalError::HttpServerFailed)?;

        let portal = Arc::clone(&self.portal);
        let status = self.status.clone();
        server
            .fn_handler("/*", Method::Get, move |req| -> Result<(), esp_idf_svc::io::EspIOError> {
                let host = req.header("Host").unwrap_or("").to_owned();
                let uri = req.uri().to_owned();
                let reply = handle_request(&portal, &status, &host, &uri);
                let headers = reply.headers();
                let mut resp = req.into_response(reply.status, None, &headers)?;
                resp.write_all(reply.body.as_bytes())?;
                Ok(())
            })
            .map_err(|_| PortalError::HttpServerFailed)?;

        self.wifi = Some(wifi);
        self.http = Some(server);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self, _radio: RadioHandles) -> Result<(), PortalError> {
        info!(
            "AP(sim): '{}' channel {} max_clients {}",
            self.cfg.ssid, self.cfg.channel, self.cfg.max_clients
        );
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// SSID 1–32 printable bytes without spaces; WPA2 passphrase 8–62 bytes.
fn validate_credentials(cfg: &PortalConfig) -> Result<(), PortalError> {
    let ssid = cfg.ssid.as_str();
    if ssid.is_empty() || ssid.len() > 32 || ssid.contains(' ') || !is_printable_ascii(ssid) {
        return Err(PortalError::InvalidCredentials);
    }
    if !(8..=62).contains(&cfg.password.len()) || !is_printable_ascii(&cfg.password) {
        return Err(PortalError::InvalidCredentials);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
