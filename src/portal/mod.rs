//! Captive portal request routing.
//!
//! Phones and laptops probe well-known URLs after joining a network; the
//! router answers those probes so the OS pops its captive-portal sheet,
//! then walks the visitor through three page tiers:
//!
//! ```text
//!   Captive ──[?redirect]──▶ Main ──(later probes)──▶ Success
//! ```
//!
//! The router is pure: it maps a request to a [`PortalResponse`] and the
//! HTTP adapter turns that into bytes.

pub mod dns;
pub mod pages;

use log::{debug, info};

use crate::config::PortalConfig;

/// `Cache-Control` sent with every page so browsers re-fetch the status.
pub const CACHE_CONTROL: &str = "public,no-store";

/// Where Windows 11 is sent for `/connecttest.txt`.
const WINDOWS_LOGOUT_URL: &str = "http://logout.net";

/// The parts of an HTTP request the router looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortalRequest<'a> {
    pub host: &'a str,
    pub path: &'a str,
    pub query: &'a str,
}

impl<'a> PortalRequest<'a> {
    /// Split `uri` into path and query.
    pub fn new(host: &'a str, uri: &'a str) -> Self {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        Self { host, path, query }
    }

    /// Whether `name` appears as a query parameter (with or without a value).
    pub fn has_param(&self, name: &str) -> bool {
        self.query
            .split('&')
            .any(|kv| kv.split_once('=').map_or(kv, |(k, _)| k) == name)
    }
}

/// Page tier served on `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTier {
    /// Before capture: link that escapes the popup into a browser.
    Captive,
    /// After capture: lets the OS sheet close.
    Success,
    /// The live status page.
    Main,
}

/// What the HTTP adapter should send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalResponse {
    /// 200 `text/html` with [`CACHE_CONTROL`].
    Page(PageTier),
    /// 200 `application/json` status snapshot.
    StatusJson,
    /// 302 to the given location.
    Redirect(heapless::String<32>),
    /// Empty body with this status code.
    Status(u16),
}

pub struct CaptivePortal {
    local_url: heapless::String<24>,
    opened: bool,
}

impl CaptivePortal {
    pub fn new(cfg: &PortalConfig) -> Self {
        Self {
            local_url: cfg.local_url(),
            opened: false,
        }
    }

    /// The visitor has reached the status page at least once.
    pub fn opened(&self) -> bool {
        self.opened
    }

    pub fn route(&mut self, req: &PortalRequest<'_>) -> PortalResponse {
        match req.path {
            "/connecttest.txt" => Self::redirect(WINDOWS_LOGOUT_URL),
            "/wpad.dat" | "/favicon.ico" => PortalResponse::Status(404),
            "/success.txt" => PortalResponse::Status(200),
            "/generate_204" | "/redirect" | "/hotspot-detect.html" | "/canonical.html" | "/ncsi.txt" => {
                Self::redirect(&self.local_url)
            }
            "/status.json" => PortalResponse::StatusJson,
            "/" => self.root(req),
            _ => {
                debug!("Portal: {}{} -> {}", req.host, req.path, self.local_url);
                Self::redirect(&self.local_url)
            }
        }
    }

    fn root(&mut self, req: &PortalRequest<'_>) -> PortalResponse {
        if req.host.contains("citrix") {
            return PortalResponse::Status(404);
        }
        if req.has_param("redirect") {
            if !self.opened {
                info!("Portal: opened by {}", req.host);
            }
            self.opened = true;
            PortalResponse::Page(PageTier::Main)
        } else if self.opened {
            PortalResponse::Page(PageTier::Success)
        } else {
            PortalResponse::Page(PageTier::Captive)
        }
    }

    fn redirect(to: &str) -> PortalResponse {
        let mut location = heapless::String::new();
        let _ = location.push_str(to);
        PortalResponse::Redirect(location)
    }
}
