// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered client IP resolution.
//!
//! Header candidates are tried first, in table order. Within one header the
//! first public address wins, then the first valid non-loopback address, then
//! the first non-empty entry verbatim. Transport signals follow, and a fixed
//! loopback literal is the last resort. When the result is still loopback,
//! [`IpResolver::resolve`] escalates to a dotted-quad scan of every header.

use std::fmt;
use std::net::IpAddr;
use std::sync::LazyLock;

use grievance_core::RunMode;
use http::HeaderMap;
use regex::Regex;
use tracing::{debug, trace};

use crate::headers::{HeaderTable, TrustTier};
use crate::ranges::{is_loopback_text, is_public, parse_ip};

/// Returned when every signal is loopback or absent.
pub const FALLBACK_ADDRESS: &str = "127.0.0.1";

/// Returned in non-production modes when escalation finds nothing (RFC 5737).
pub const SIMULATED_ADDRESS: &str = "203.0.113.1";

static DOTTED_QUAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").unwrap());

/// Which pass over a header's entries produced the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPass {
    Public,
    NonLoopback,
    Verbatim,
}

/// Where a resolved address came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpSource {
    Header {
        name: String,
        tier: TrustTier,
        pass: HeaderPass,
    },
    Peer,
    ProxyChain,
    Connection,
    Socket,
    Fallback,
    /// Dotted quad found inside an arbitrary header during escalation.
    Embedded {
        header: String,
    },
    Simulated,
}

impl fmt::Display for IpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header { name, tier, pass } => {
                let pass = match pass {
                    HeaderPass::Public => "public",
                    HeaderPass::NonLoopback => "non-loopback",
                    HeaderPass::Verbatim => "verbatim",
                };
                write!(f, "header {name} ({tier}, {pass})")
            }
            Self::Peer => f.write_str("peer"),
            Self::ProxyChain => f.write_str("proxy chain"),
            Self::Connection => f.write_str("connection"),
            Self::Socket => f.write_str("socket"),
            Self::Fallback => f.write_str("fallback"),
            Self::Embedded { header } => write!(f, "embedded in {header}"),
            Self::Simulated => f.write_str("simulated"),
        }
    }
}

/// Address plus provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIp {
    pub address: String,
    pub source: IpSource,
}

impl ResolvedIp {
    fn new(address: impl Into<String>, source: IpSource) -> Self {
        Self {
            address: address.into(),
            source,
        }
    }

    pub fn is_loopback(&self) -> bool {
        is_loopback_text(&self.address)
    }
}

/// Transport-level signals. Any of them may be missing.
#[derive(Debug, Clone, Default)]
pub struct TransportSignals {
    /// Framework-resolved peer address.
    pub peer: Option<IpAddr>,
    /// Framework-resolved proxy chain, nearest client first.
    pub proxy_chain: Vec<IpAddr>,
    /// Raw connection-level remote address.
    pub connection: Option<IpAddr>,
    /// Raw socket-level remote address.
    pub socket: Option<IpAddr>,
}

impl TransportSignals {
    /// All signals derived from a single accepted socket address.
    pub fn from_remote(addr: IpAddr) -> Self {
        Self {
            peer: Some(addr),
            proxy_chain: Vec::new(),
            connection: Some(addr),
            socket: Some(addr),
        }
    }
}

/// Resolves client addresses. Immutable after construction and cheap to share.
#[derive(Debug, Clone, Default)]
pub struct IpResolver {
    headers: HeaderTable,
    mode: RunMode,
}

impl IpResolver {
    pub fn new(headers: HeaderTable, mode: RunMode) -> Self {
        Self { headers, mode }
    }

    /// Header, transport and fallback tiers, without escalation.
    pub fn standard(&self, headers: &HeaderMap, transport: &TransportSignals) -> ResolvedIp {
        if let Some(found) = self.from_headers(headers) {
            return found;
        }

        let non_loopback = |ip: &IpAddr| !ip.is_loopback() && !is_loopback_text(&ip.to_string());

        if let Some(peer) = transport.peer.filter(non_loopback) {
            return ResolvedIp::new(canonical(peer), IpSource::Peer);
        }
        if let Some(hop) = transport.proxy_chain.iter().copied().find(non_loopback) {
            return ResolvedIp::new(canonical(hop), IpSource::ProxyChain);
        }
        if let Some(conn) = transport.connection.filter(non_loopback) {
            return ResolvedIp::new(canonical(conn), IpSource::Connection);
        }
        if let Some(sock) = transport.socket.filter(non_loopback) {
            return ResolvedIp::new(canonical(sock), IpSource::Socket);
        }

        ResolvedIp::new(FALLBACK_ADDRESS, IpSource::Fallback)
    }

    /// Full resolution. Always returns a non-empty address.
    pub fn resolve(&self, headers: &HeaderMap, transport: &TransportSignals) -> ResolvedIp {
        trace!(headers = ?proxy_header_snapshot(headers, &self.headers), "resolving client ip");

        let standard = self.standard(headers, transport);
        if !standard.is_loopback() {
            debug!(ip = %standard.address, source = %standard.source, "client ip resolved");
            return standard;
        }

        let resolved = self.escalate(headers).unwrap_or(standard);
        debug!(ip = %resolved.address, source = %resolved.source, "client ip resolved");
        resolved
    }

    fn from_headers(&self, headers: &HeaderMap) -> Option<ResolvedIp> {
        for header in self.headers.iter() {
            // Repeated header lines form one comma-separated list.
            let entries: Vec<&str> = headers
                .get_all(header.name.as_str())
                .iter()
                .filter_map(|value| value.to_str().ok())
                .flat_map(|value| value.split(','))
                .map(str::trim)
                .collect();
            if entries.iter().all(|e| e.is_empty()) {
                continue;
            }

            let source = |pass| IpSource::Header {
                name: header.name.clone(),
                tier: header.tier,
                pass,
            };

            if let Some(entry) = entries
                .iter()
                .find(|e| parse_ip(e).is_some_and(|ip| is_public(&ip)))
            {
                return Some(ResolvedIp::new(*entry, source(HeaderPass::Public)));
            }

            if let Some(entry) = entries
                .iter()
                .find(|e| parse_ip(e).is_some() && !is_loopback_text(e))
            {
                return Some(ResolvedIp::new(*entry, source(HeaderPass::NonLoopback)));
            }

            if let Some(first) = entries.iter().find(|e| !e.is_empty()) {
                return Some(ResolvedIp::new(*first, source(HeaderPass::Verbatim)));
            }
        }
        None
    }

    /// Scan every header value for an embedded non-loopback dotted quad.
    fn escalate(&self, headers: &HeaderMap) -> Option<ResolvedIp> {
        for (name, value) in headers {
            let Ok(value) = value.to_str() else {
                continue;
            };
            if !value.contains('.') {
                continue;
            }
            if let Some(m) = DOTTED_QUAD
                .find_iter(value)
                .map(|m| m.as_str())
                .find(|candidate| !is_loopback_text(candidate))
            {
                return Some(ResolvedIp::new(
                    m,
                    IpSource::Embedded {
                        header: name.as_str().to_string(),
                    },
                ));
            }
        }

        if self.mode.is_production() {
            None
        } else {
            Some(ResolvedIp::new(SIMULATED_ADDRESS, IpSource::Simulated))
        }
    }
}

fn canonical(ip: IpAddr) -> String {
    ip.to_canonical().to_string()
}

/// Values of the known proxy headers present on the request, for trace logs.
fn proxy_header_snapshot<'a>(headers: &'a HeaderMap, table: &'a HeaderTable) -> Vec<(&'a str, &'a str)> {
    table
        .iter()
        .filter_map(|h| {
            headers
                .get(h.name.as_str())
                .and_then(|v| v.to_str().ok())
                .map(|v| (h.name.as_str(), v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, value.parse().unwrap());
        }
        map
    }

    fn resolver(mode: RunMode) -> IpResolver {
        IpResolver::new(HeaderTable::builtin(), mode)
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn public_entry_wins_over_private_in_same_header() {
        let h = headers(&[("x-forwarded-for", "10.0.0.5, 198.51.100.7")]);
        let got = resolver(RunMode::Production).resolve(&h, &TransportSignals::default());
        assert_eq!(got.address, "198.51.100.7");
        assert!(matches!(
            got.source,
            IpSource::Header { pass: HeaderPass::Public, .. }
        ));
    }

    #[test]
    fn repeated_header_lines_are_one_chain() {
        let h = headers(&[
            ("x-forwarded-for", "10.0.0.1"),
            ("x-forwarded-for", "198.51.100.7"),
        ]);
        let got = resolver(RunMode::Production).resolve(&h, &TransportSignals::default());
        assert_eq!(got.address, "198.51.100.7");
        assert!(matches!(
            got.source,
            IpSource::Header { pass: HeaderPass::Public, .. }
        ));
    }

    #[test]
    fn blank_first_line_does_not_hide_later_lines() {
        let h = headers(&[("x-real-ip", ""), ("x-real-ip", "192.168.4.4")]);
        let got = resolver(RunMode::Production).standard(&h, &TransportSignals::default());
        assert_eq!(got.address, "192.168.4.4");
    }

    #[test]
    fn public_entry_is_returned_as_written() {
        let h = headers(&[("x-forwarded-for", "10.0.0.1, ::FFFF:198.51.100.7")]);
        let got = resolver(RunMode::Production).resolve(&h, &TransportSignals::default());
        assert_eq!(got.address, "::FFFF:198.51.100.7");

        let h = headers(&[("x-client-ip", "2001:DB8::A")]);
        let got = resolver(RunMode::Production).resolve(&h, &TransportSignals::default());
        assert_eq!(got.address, "2001:DB8::A");
    }

    #[test]
    fn private_entry_accepted_when_no_public_one() {
        let h = headers(&[("x-forwarded-for", "127.0.0.1, 192.168.1.20")]);
        let got = resolver(RunMode::Production).standard(&h, &TransportSignals::default());
        assert_eq!(got.address, "192.168.1.20");
        assert!(matches!(
            got.source,
            IpSource::Header { pass: HeaderPass::NonLoopback, .. }
        ));
    }

    #[test]
    fn unparseable_entry_returned_verbatim() {
        let h = headers(&[("x-real-ip", "unknown, also-unknown")]);
        let got = resolver(RunMode::Production).resolve(&h, &TransportSignals::default());
        assert_eq!(got.address, "unknown");
        assert!(matches!(
            got.source,
            IpSource::Header { pass: HeaderPass::Verbatim, .. }
        ));
    }

    #[test]
    fn header_order_follows_table() {
        let h = headers(&[
            ("x-forwarded-for", "198.51.100.1"),
            ("cf-connecting-ip", "198.51.100.2"),
        ]);
        let got = resolver(RunMode::Production).resolve(&h, &TransportSignals::default());
        assert_eq!(got.address, "198.51.100.2");
    }

    #[test]
    fn custom_headers_are_scanned_after_builtins() {
        let table = HeaderTable::builtin().with_extra(["x-edge-ip"]);
        let r = IpResolver::new(table, RunMode::Production);
        let got = r.resolve(&headers(&[("x-edge-ip", "198.51.100.9")]), &TransportSignals::default());
        assert_eq!(got.address, "198.51.100.9");
        assert!(matches!(
            got.source,
            IpSource::Header { tier: TrustTier::Custom, .. }
        ));
    }

    #[test]
    fn transport_peer_used_when_headers_absent() {
        let t = TransportSignals::from_remote(ip("198.51.100.30"));
        let got = resolver(RunMode::Production).resolve(&HeaderMap::new(), &t);
        assert_eq!(got.address, "198.51.100.30");
        assert_eq!(got.source, IpSource::Peer);
    }

    #[test]
    fn loopback_peer_skipped_for_proxy_chain() {
        let t = TransportSignals {
            peer: Some(ip("127.0.0.1")),
            proxy_chain: vec![ip("::1"), ip("10.1.1.1")],
            connection: Some(ip("198.51.100.1")),
            socket: None,
        };
        let got = resolver(RunMode::Production).standard(&HeaderMap::new(), &t);
        assert_eq!(got.address, "10.1.1.1");
        assert_eq!(got.source, IpSource::ProxyChain);
    }

    #[test]
    fn socket_is_the_last_transport_signal() {
        let t = TransportSignals {
            socket: Some(ip("198.51.100.2")),
            ..TransportSignals::default()
        };
        let got = resolver(RunMode::Production).standard(&HeaderMap::new(), &t);
        assert_eq!(got.source, IpSource::Socket);
    }

    #[test]
    fn mapped_peer_is_reported_as_ipv4() {
        let t = TransportSignals::from_remote(ip("::ffff:198.51.100.4"));
        let got = resolver(RunMode::Production).resolve(&HeaderMap::new(), &t);
        assert_eq!(got.address, "198.51.100.4");
    }

    #[test]
    fn production_loopback_only_falls_back_to_literal() {
        let t = TransportSignals::from_remote(ip("127.0.0.1"));
        let h = headers(&[("accept", "application/json")]);
        let got = resolver(RunMode::Production).resolve(&h, &t);
        assert_eq!(got.address, FALLBACK_ADDRESS);
        assert_eq!(got.source, IpSource::Fallback);
    }

    #[test]
    fn non_production_loopback_only_is_simulated() {
        let t = TransportSignals::from_remote(ip("127.0.0.1"));
        for mode in [RunMode::Development, RunMode::Test] {
            let got = resolver(mode).resolve(&HeaderMap::new(), &t);
            assert_eq!(got.address, SIMULATED_ADDRESS);
            assert_eq!(got.source, IpSource::Simulated);
        }
    }

    #[test]
    fn escalation_finds_embedded_quad_in_any_header() {
        let h = headers(&[("x-debug-origin", "client=127.0.0.1 via=198.51.100.77")]);
        let got = resolver(RunMode::Production).resolve(&h, &TransportSignals::default());
        assert_eq!(got.address, "198.51.100.77");
        assert_eq!(
            got.source,
            IpSource::Embedded {
                header: "x-debug-origin".to_string()
            }
        );
    }

    #[test]
    fn escalation_can_match_version_strings() {
        let h = headers(&[("user-agent", "Agent/1.2.3.4 (X11)")]);
        let got = resolver(RunMode::Production).resolve(&h, &TransportSignals::default());
        assert_eq!(got.address, "1.2.3.4");
    }

    #[test]
    fn escalation_skipped_when_standard_result_is_not_loopback() {
        let h = headers(&[
            ("x-real-ip", "192.168.0.4"),
            ("x-other", "198.51.100.5"),
        ]);
        let got = resolver(RunMode::Development).resolve(&h, &TransportSignals::default());
        assert_eq!(got.address, "192.168.0.4");
    }

    #[test]
    fn loopback_header_entry_shadows_transport() {
        let h = headers(&[("x-forwarded-for", "127.0.0.1")]);
        let t = TransportSignals::from_remote(ip("198.51.100.8"));
        let got = resolver(RunMode::Production).resolve(&h, &t);
        assert_eq!(got.address, "127.0.0.1");
        assert!(matches!(
            got.source,
            IpSource::Header { pass: HeaderPass::Verbatim, .. }
        ));
    }
}
