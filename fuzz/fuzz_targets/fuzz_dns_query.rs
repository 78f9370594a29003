//! Fuzz target: captive DNS `parse_query` / `build_reply`
//!
//! Feeds arbitrary datagrams to the parser and answer builder.  Neither may
//! panic; every reply must echo the query ID and fit the output buffer.
//!
//! cargo fuzz run fuzz_dns_query

#![no_main]

use libfuzzer_sys::fuzz_target;
use resistor_cutter::portal::dns::{build_reply, parse_query, MAX_PACKET};

fuzz_target!(|data: &[u8]| {
    let _ = parse_query(data);

    let mut out = [0u8; MAX_PACKET];
    if let Ok(n) = build_reply(data, [4, 3, 2, 1], 3600, &mut out) {
        assert!(n >= 12 && n <= out.len());
        assert_eq!(out[..2], data[..2], "reply must echo the query ID");
    }
});
