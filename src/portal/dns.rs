//! Captive DNS: every name resolves to the portal.
//!
//! Wire format (RFC 1035, only what a captive resolver needs):
//! ```text
//! ┌────────────┬──────────────────────────┬─────────────────────────┐
//! │ Header 12B │ Question (QNAME, T, C)   │ Answer (ptr, A, TTL, IP)│
//! └────────────┴──────────────────────────┴─────────────────────────┘
//! ```
//!
//! A queries get one A record pointing at the portal address.  Other
//! types get an empty NOERROR reply so clients fall back to IPv4.  Queries
//! with zero or several questions, or a non-standard opcode, get NXDOMAIN.
//! Responses and malformed packets are dropped without a reply.

use core::fmt;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use log::{debug, info, warn};

use crate::error::PortalError;

pub const DNS_PORT: u16 = 53;
/// Classic UDP DNS limit; captive clients never send EDNS payloads we need.
pub const MAX_PACKET: usize = 512;

const HEADER_LEN: usize = 12;
const MAX_NAME_LEN: usize = 255;
const MAX_LABEL_LEN: usize = 63;

const FLAG_QR: u16 = 0x8000;
const FLAG_AA: u16 = 0x0400;
const FLAG_RD: u16 = 0x0100;
const OPCODE_MASK: u16 = 0x7800;

const RCODE_NXDOMAIN: u16 = 3;

const TYPE_A: u16 = 1;
const CLASS_IN: u16 = 1;
/// Compression pointer to the question name at offset 12.
const NAME_POINTER: [u8; 2] = [0xC0, 0x0C];
const ANSWER_LEN: usize = 16;

/// Packets per servicing pass; bounds the time spent away from the tick.
const MAX_PER_PASS: usize = 4;

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsError {
    /// Shorter than a header, or the question runs off the end.
    Truncated,
    /// The packet is a response, not a query.
    NotAQuery,
    /// QNAME is malformed (label too long, compression, or over 255 bytes).
    BadName,
    /// The output buffer cannot hold the reply.
    BufferTooSmall,
}

impl fmt::Display for DnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "packet truncated"),
            Self::NotAQuery => write!(f, "packet is not a query"),
            Self::BadName => write!(f, "malformed question name"),
            Self::BufferTooSmall => write!(f, "reply buffer too small"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Codec
// ───────────────────────────────────────────────────────────────

/// The single question of a standard query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    /// Byte offset just past QTYPE/QCLASS.
    pub end: usize,
    pub qtype: u16,
    pub qclass: u16,
}

/// How a query will be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Standard(Question),
    /// Anything we refuse with NXDOMAIN.
    Unsupported,
}

fn be16(b: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([b[at], b[at + 1]])
}

/// Validate the header and walk the question.
pub fn parse_query(packet: &[u8]) -> Result<Query, DnsError> {
    if packet.len() < HEADER_LEN {
        return Err(DnsError::Truncated);
    }
    let flags = be16(packet, 2);
    if flags & FLAG_QR != 0 {
        return Err(DnsError::NotAQuery);
    }
    if flags & OPCODE_MASK != 0 || be16(packet, 4) != 1 {
        return Ok(Query::Unsupported);
    }

    let mut pos = HEADER_LEN;
    loop {
        let len = *packet.get(pos).ok_or(DnsError::Truncated)? as usize;
        pos += 1;
        if len == 0 {
            break;
        }
        if len > MAX_LABEL_LEN {
            return Err(DnsError::BadName);
        }
        pos += len;
        if pos - HEADER_LEN > MAX_NAME_LEN {
            return Err(DnsError::BadName);
        }
    }

    if packet.len() < pos + 4 {
        return Err(DnsError::Truncated);
    }
    Ok(Query::Standard(Question {
        end: pos + 4,
        qtype: be16(packet, pos),
        qclass: be16(packet, pos + 2),
    }))
}

/// Write the reply to `query` into `out`.  Returns the reply length.
pub fn build_reply(query: &[u8], ip: [u8; 4], ttl_secs: u32, out: &mut [u8]) -> Result<usize, DnsError> {
    let parsed = parse_query(query)?;
    if out.len() < HEADER_LEN {
        return Err(DnsError::BufferTooSmall);
    }

    let rd = be16(query, 2) & FLAG_RD;
    out[..2].copy_from_slice(&query[..2]);

    let Query::Standard(q) = parsed else {
        let flags = FLAG_QR | rd | RCODE_NXDOMAIN;
        out[2..4].copy_from_slice(&flags.to_be_bytes());
        out[4..HEADER_LEN].fill(0);
        return Ok(HEADER_LEN);
    };

    let answer = q.qtype == TYPE_A && q.qclass == CLASS_IN;
    let len = q.end + if answer { ANSWER_LEN } else { 0 };
    if out.len() < len {
        return Err(DnsError::BufferTooSmall);
    }

    let flags = FLAG_QR | FLAG_AA | rd;
    out[2..4].copy_from_slice(&flags.to_be_bytes());
    out[4..6].copy_from_slice(&1u16.to_be_bytes());
    out[6..8].copy_from_slice(&u16::from(answer).to_be_bytes());
    out[8..HEADER_LEN].fill(0);
    out[HEADER_LEN..q.end].copy_from_slice(&query[HEADER_LEN..q.end]);

    if answer {
        let a = &mut out[q.end..len];
        a[0..2].copy_from_slice(&NAME_POINTER);
        a[2..4].copy_from_slice(&TYPE_A.to_be_bytes());
        a[4..6].copy_from_slice(&CLASS_IN.to_be_bytes());
        a[6..10].copy_from_slice(&ttl_secs.to_be_bytes());
        a[10..12].copy_from_slice(&4u16.to_be_bytes());
        a[12..16].copy_from_slice(&ip);
    }
    Ok(len)
}

// ───────────────────────────────────────────────────────────────
// UDP responder
// ───────────────────────────────────────────────────────────────

/// Non-blocking captive DNS server, serviced from the main loop.
pub struct CaptiveDns {
    socket: UdpSocket,
    ip: [u8; 4],
    ttl_secs: u32,
    interval_ms: u32,
    last_service_ms: Option<u32>,
    answered: u32,
}

impl CaptiveDns {
    /// Bind `0.0.0.0:port`.
    pub fn bind(port: u16, ip: [u8; 4], ttl_secs: u32, interval_ms: u32) -> Result<Self, PortalError> {
        let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port))
            .map_err(|_| PortalError::DnsBindFailed)?;
        socket
            .set_nonblocking(true)
            .map_err(|_| PortalError::DnsBindFailed)?;
        info!("DNS: captive resolver on port {} -> {}", port, Ipv4Addr::from(ip));
        Ok(Self {
            socket,
            ip,
            ttl_secs,
            interval_ms,
            last_service_ms: None,
            answered: 0,
        })
    }

    pub fn local_port(&self) -> Option<u16> {
        self.socket.local_addr().ok().map(|a| a.port())
    }

    /// Total replies sent since bind.
    pub fn answered(&self) -> u32 {
        self.answered
    }

    /// Answer pending queries, at most once per interval.  Returns the
    /// number of replies sent this pass.
    pub fn poll(&mut self, now_ms: u32) -> usize {
        if let Some(last) = self.last_service_ms {
            if now_ms.wrapping_sub(last) < self.interval_ms {
                return 0;
            }
        }
        self.last_service_ms = Some(now_ms);

        let mut query = [0u8; MAX_PACKET];
        let mut reply = [0u8; MAX_PACKET];
        let mut sent = 0;
        for _ in 0..MAX_PER_PASS {
            let (n, peer) = match self.socket.recv_from(&mut query) {
                Ok(r) => r,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    warn!("DNS: recv failed: {}", e);
                    break;
                }
            };
            match build_reply(&query[..n], self.ip, self.ttl_secs, &mut reply) {
                Ok(len) => match self.socket.send_to(&reply[..len], peer) {
                    Ok(_) => sent += 1,
                    Err(e) => warn!("DNS: send to {} failed: {}", peer, e),
                },
                Err(e) => debug!("DNS: dropped packet from {}: {}", peer, e),
            }
        }
        self.answered = self.answered.wrapping_add(sent as u32);
        sent
    }
}
