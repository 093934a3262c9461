// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Non-public address ranges as data, plus the textual loopback test.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use strum::Display;

/// Why an address is not considered public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum RangeKind {
    Private,
    Loopback,
    LinkLocal,
    UniqueLocal,
    Reserved,
    Unspecified,
}

/// A CIDR block tagged with the reason it is excluded.
#[derive(Debug, Clone, Copy)]
pub struct CidrRange {
    network: IpAddr,
    prefix: u8,
    kind: RangeKind,
}

impl CidrRange {
    pub const fn v4(a: u8, b: u8, c: u8, d: u8, prefix: u8, kind: RangeKind) -> Self {
        Self {
            network: IpAddr::V4(Ipv4Addr::new(a, b, c, d)),
            prefix,
            kind,
        }
    }

    pub const fn v6(first_segment: u16, prefix: u8, kind: RangeKind) -> Self {
        Self {
            network: IpAddr::V6(Ipv6Addr::new(first_segment, 0, 0, 0, 0, 0, 0, 0)),
            prefix,
            kind,
        }
    }

    const fn v6_host(addr: Ipv6Addr, kind: RangeKind) -> Self {
        Self {
            network: IpAddr::V6(addr),
            prefix: 128,
            kind,
        }
    }

    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    /// Whether `ip` falls inside this block. Families never match each other.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.network, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = prefix_mask_u32(self.prefix);
                u32::from(net) & mask == u32::from(*ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = prefix_mask_u128(self.prefix);
                u128::from(net) & mask == u128::from(*ip) & mask
            }
            _ => false,
        }
    }
}

fn prefix_mask_u32(prefix: u8) -> u32 {
    match prefix {
        0 => 0,
        p => u32::MAX << (32 - u32::from(p.min(32))),
    }
}

fn prefix_mask_u128(prefix: u8) -> u128 {
    match prefix {
        0 => 0,
        p => u128::MAX << (128 - u32::from(p.min(128))),
    }
}

/// Blocks that disqualify an address from the public sub-tier.
pub const NON_PUBLIC_RANGES: &[CidrRange] = &[
    CidrRange::v4(10, 0, 0, 0, 8, RangeKind::Private),
    CidrRange::v4(172, 16, 0, 0, 12, RangeKind::Private),
    CidrRange::v4(192, 168, 0, 0, 16, RangeKind::Private),
    CidrRange::v4(169, 254, 0, 0, 16, RangeKind::LinkLocal),
    CidrRange::v4(127, 0, 0, 0, 8, RangeKind::Loopback),
    CidrRange::v4(0, 0, 0, 0, 8, RangeKind::Reserved),
    // 224.0.0.0 and above: multicast, class E, broadcast.
    CidrRange::v4(224, 0, 0, 0, 3, RangeKind::Reserved),
    CidrRange::v6_host(Ipv6Addr::LOCALHOST, RangeKind::Loopback),
    CidrRange::v6_host(Ipv6Addr::UNSPECIFIED, RangeKind::Unspecified),
    CidrRange::v6(0xfc00, 7, RangeKind::UniqueLocal),
    CidrRange::v6(0xfe80, 10, RangeKind::LinkLocal),
];

/// First matching non-public range for `ip`, if any.
pub fn classify(ip: &IpAddr) -> Option<RangeKind> {
    let ip = ip.to_canonical();
    NON_PUBLIC_RANGES
        .iter()
        .find(|range| range.contains(&ip))
        .map(CidrRange::kind)
}

pub fn is_public(ip: &IpAddr) -> bool {
    classify(ip).is_none()
}

/// Strip the IPv4-mapped prefix some stacks report (`::ffff:10.0.0.1`).
pub fn strip_mapped_prefix(value: &str) -> &str {
    match value.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("::ffff:") && value[7..].contains('.') => {
            &value[7..]
        }
        _ => value,
    }
}

/// Parse a header entry as an IP address, ignoring the mapped prefix.
pub fn parse_ip(value: &str) -> Option<IpAddr> {
    strip_mapped_prefix(value.trim())
        .parse::<IpAddr>()
        .ok()
        .map(|ip| ip.to_canonical())
}

/// Loopback test on raw text. Empty values and `localhost` count as loopback,
/// as does anything that merely starts with `127.`.
pub fn is_loopback_text(value: &str) -> bool {
    let clean = strip_mapped_prefix(value.trim());
    if clean.is_empty() || clean.eq_ignore_ascii_case("localhost") || clean.starts_with("127.") {
        return true;
    }
    parse_ip(clean).is_some_and(|ip| ip.is_loopback())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn rfc1918_blocks_are_private() {
        for addr in ["10.0.0.1", "172.16.0.1", "172.31.255.255", "192.168.1.1"] {
            assert_eq!(classify(&ip(addr)), Some(RangeKind::Private), "{addr}");
        }
    }

    #[test]
    fn edges_of_172_block() {
        assert!(is_public(&ip("172.15.255.255")));
        assert!(is_public(&ip("172.32.0.0")));
    }

    #[test]
    fn reserved_low_and_high_ranges() {
        assert_eq!(classify(&ip("0.1.2.3")), Some(RangeKind::Reserved));
        assert_eq!(classify(&ip("224.0.0.1")), Some(RangeKind::Reserved));
        assert_eq!(classify(&ip("255.255.255.255")), Some(RangeKind::Reserved));
        assert!(is_public(&ip("223.255.255.255")));
    }

    #[test]
    fn link_local_and_loopback() {
        assert_eq!(classify(&ip("169.254.169.254")), Some(RangeKind::LinkLocal));
        assert_eq!(classify(&ip("127.8.8.8")), Some(RangeKind::Loopback));
        assert_eq!(classify(&ip("::1")), Some(RangeKind::Loopback));
    }

    #[test]
    fn ipv6_private_blocks() {
        assert_eq!(classify(&ip("fd12:3456::1")), Some(RangeKind::UniqueLocal));
        assert_eq!(classify(&ip("fe80::1")), Some(RangeKind::LinkLocal));
        assert_eq!(classify(&ip("::")), Some(RangeKind::Unspecified));
        assert!(is_public(&ip("2001:4860:4860::8888")));
    }

    #[test]
    fn mapped_addresses_use_the_ipv4_table() {
        assert_eq!(classify(&ip("::ffff:10.1.2.3")), Some(RangeKind::Private));
        assert_eq!(parse_ip("::ffff:8.8.8.8"), Some(ip("8.8.8.8")));
    }

    #[test]
    fn loopback_text_rules() {
        assert!(is_loopback_text(""));
        assert!(is_loopback_text("   "));
        assert!(is_loopback_text("localhost"));
        assert!(is_loopback_text("::ffff:127.0.0.1"));
        assert!(is_loopback_text("127.garbage"));
        assert!(is_loopback_text("::1"));
        assert!(!is_loopback_text("10.0.0.1"));
        assert!(!is_loopback_text("unknown"));
    }

    #[test]
    fn parse_rejects_ports_and_junk() {
        assert_eq!(parse_ip("1.2.3.4:80"), None);
        assert_eq!(parse_ip("999.1.1.1"), None);
        assert_eq!(parse_ip("for=1.2.3.4"), None);
        assert_eq!(parse_ip(" 2001:db8::1 "), Some(ip("2001:db8::1")));
    }
}
