//! Captive portal end to end: HTTP routing against the live status mirror,
//! and the DNS responder over a loopback socket.

use std::net::UdpSocket;
use std::sync::Mutex;
use std::time::Duration;

use resistor_cutter::adapters::access_point::handle_request;
use resistor_cutter::adapters::status_page::StatusPage;
use resistor_cutter::app::ports::{StatusMirrorPort, StatusUpdate};
use resistor_cutter::config::PortalConfig;
use resistor_cutter::fsm::RunStatus;
use resistor_cutter::portal::dns::CaptiveDns;
use resistor_cutter::portal::CaptivePortal;

fn portal() -> Mutex<CaptivePortal> {
    Mutex::new(CaptivePortal::new(&PortalConfig::default()))
}

#[test]
fn phone_walks_through_captive_flow() {
    let portal = portal();
    let page = StatusPage::new();

    // OS probe → redirected to the portal.
    let probe = handle_request(&portal, &page, "connectivitycheck.gstatic.com", "/generate_204");
    assert_eq!(probe.status, 302);
    assert_eq!(probe.location.as_deref(), Some("http://4.3.2.1/"));

    // Popup lands on the captive page.
    let landing = handle_request(&portal, &page, "4.3.2.1", "/");
    assert!(landing.body.contains("neverssl"));

    // Browser comes back with ?redirect → live status page.
    let main = handle_request(&portal, &page, "www.neverssl.com", "/?redirect=true");
    assert!(main.body.contains("Resistor Cutter Status"));

    // Later probes get the bare success page so the popup can close.
    let later = handle_request(&portal, &page, "4.3.2.1", "/");
    assert!(later.body.contains("Success"));
}

#[test]
fn status_json_tracks_mirror() {
    let portal = portal();
    let mut page = StatusPage::new();
    page.update_status(&StatusUpdate {
        quantity_per_kit: 5,
        kit_count: 30,
        run_status: RunStatus::Running,
        percent: Some(12),
    });

    let reply = handle_request(&portal, &page, "4.3.2.1", "/status.json");
    assert_eq!(reply.status, 200);
    assert_eq!(
        reply.body,
        r#"{"resistorsPerKit":5,"kits":30,"runningClass":"cutting","runningText":"Cutting","progress":12}"#
    );
}

fn a_query(id: u16, name: &[&str]) -> Vec<u8> {
    let mut q = Vec::new();
    q.extend_from_slice(&id.to_be_bytes());
    q.extend_from_slice(&[0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0]);
    for label in name {
        q.push(label.len() as u8);
        q.extend_from_slice(label.as_bytes());
    }
    q.push(0);
    q.extend_from_slice(&[0, 1, 0, 1]);
    q
}

#[test]
fn dns_answers_every_name_with_portal_ip() {
    let mut dns = CaptiveDns::bind(0, [4, 3, 2, 1], 3600, 30).unwrap();
    let port = dns.local_port().unwrap();

    let client = UdpSocket::bind("127.0.0.1:0").unwrap();
    client.set_read_timeout(Some(Duration::from_secs(2))).unwrap();

    for (i, name) in [["apple", "com"], ["gstatic", "com"]].iter().enumerate() {
        client
            .send_to(&a_query(0x1000 + i as u16, name), ("127.0.0.1", port))
            .unwrap();
        let mut sent = 0;
        for t in 0..100u32 {
            sent += dns.poll(1_000 * (i as u32 + 1) + t * 30);
            if sent > 0 {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(sent, 1);

        let mut buf = [0u8; 512];
        let n = client.recv(&mut buf).unwrap();
        assert_eq!(&buf[..2], &(0x1000 + i as u16).to_be_bytes());
        assert_eq!(&buf[n - 4..n], &[4, 3, 2, 1]);
    }
    assert_eq!(dns.answered(), 2);
}
