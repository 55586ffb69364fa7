//! Request metadata extraction.
//!
//! # Responsibilities
//! - Pull a flat set of named fields out of an inbound request
//! - Resolve the client IP (forwarded header override, peer fallback)
//! - Keep field order stable for index-page display
//!
//! # Design Decisions
//! - Extraction is a pure function of the request head and peer address
//! - `X-Forwarded-For` is only honored behind the trusted-proxy flag; the
//!   port always comes from the transport peer address
//! - A duplicate insert under a reserved field name is logged and dropped;
//!   the first value wins

use axum::http::{header, HeaderMap, Method, Uri, Version};
use std::net::SocketAddr;
use tracing::warn;

/// Reserved field names, in index-page display order.
pub mod fields {
    pub const IP: &str = "Ip";
    pub const PORT: &str = "Port";
    pub const METHOD: &str = "Method";
    pub const HOST: &str = "Host";
    pub const PROTO: &str = "Proto";
    pub const USER_AGENT: &str = "User-Agent";
    pub const ACCEPT: &str = "Accept";
    pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
}

/// Ordered metadata describing one inbound request.
///
/// Created at request entry, discarded at response completion; never shared
/// across requests.
#[derive(Debug, Default)]
pub struct RequestFacts {
    entries: Vec<(&'static str, String)>,
}

impl RequestFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, preserving insertion order.
    ///
    /// Collisions with an already-present field name are dropped with a
    /// warning; the existing value is preserved.
    pub fn insert(&mut self, name: &'static str, value: String) {
        if self.entries.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)) {
            warn!(field = name, "duplicate field name, keeping first value");
            return;
        }
        self.entries.push((name, value));
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(n, v)| (*n, v.as_str()))
    }

    /// Extract the full fact set from a request head.
    ///
    /// Population order is fixed: IP first, then the client metadata in
    /// declared order.
    pub fn extract(
        headers: &HeaderMap,
        method: &Method,
        uri: &Uri,
        version: Version,
        peer: SocketAddr,
        trust_forwarded_for: bool,
    ) -> Self {
        let mut facts = Self::new();
        facts.insert(fields::IP, client_ip(headers, peer, trust_forwarded_for));
        facts.insert(fields::PORT, client_port(peer).to_string());
        facts.insert(fields::METHOD, method.to_string());
        facts.insert(fields::HOST, host(headers, uri));
        facts.insert(fields::PROTO, proto(version).to_string());
        facts.insert(fields::USER_AGENT, header_value(headers, header::USER_AGENT));
        facts.insert(fields::ACCEPT, header_value(headers, header::ACCEPT));
        facts.insert(
            fields::ACCEPT_ENCODING,
            header_value(headers, header::ACCEPT_ENCODING),
        );
        facts
    }
}

/// Resolve the client IP for a request.
///
/// The transport peer host is the base value. When `trust_forwarded_for` is
/// set and the request carries a non-empty `X-Forwarded-For`, the header
/// value replaces the host. The peer port is never overridden.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        if let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }
    }
    peer.ip().to_string()
}

/// The transport peer port, always taken from the socket address.
pub fn client_port(peer: SocketAddr) -> u16 {
    peer.port()
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn host(headers: &HeaderMap, uri: &Uri) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_default()
}

/// Protocol string the way clients expect to read it back.
pub fn proto(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/?",
    }
}
