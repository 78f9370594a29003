//! Fuzz target: `CaptivePortal::route`
//!
//! Splits arbitrary bytes into a Host header and a request URI and routes
//! them.  The router must never panic, and once the portal has been opened
//! it must never fall back to the captive tier.
//!
//! cargo fuzz run fuzz_portal_request

#![no_main]

use libfuzzer_sys::fuzz_target;
use resistor_cutter::config::PortalConfig;
use resistor_cutter::portal::{CaptivePortal, PageTier, PortalRequest, PortalResponse};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let (host, uri) = text.split_once('\n').unwrap_or(("4.3.2.1", text));

    let mut portal = CaptivePortal::new(&PortalConfig::default());
    let first = portal.route(&PortalRequest::new(host, uri));
    if let PortalResponse::Redirect(to) = &first {
        assert!(!to.is_empty(), "redirect without a location");
    }

    if portal.opened() {
        let again = portal.route(&PortalRequest::new("4.3.2.1", "/"));
        assert_ne!(again, PortalResponse::Page(PageTier::Captive));
    }
});
