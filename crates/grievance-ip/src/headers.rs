// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered table of proxy headers that may carry the client address.

use strum::Display;

/// Who sets a header, used only to label where an address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TrustTier {
    /// CDN edge headers (Cloudflare, Akamai, Fastly).
    Cdn,
    /// Reverse-proxy headers (nginx, Apache, generic load balancers).
    Proxy,
    /// Hosting-platform headers (Azure, Vercel).
    Platform,
    /// Loosely standardised or rarely trustworthy headers.
    Generic,
    /// Operator-configured headers.
    Custom,
}

/// A header name and its tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedHeader {
    pub name: String,
    pub tier: TrustTier,
}

/// Scan order of the built-in headers. Earlier entries win.
pub const BUILTIN_HEADERS: &[(&str, TrustTier)] = &[
    ("cf-connecting-ip", TrustTier::Cdn),
    ("true-client-ip", TrustTier::Cdn),
    ("x-forwarded-for", TrustTier::Proxy),
    ("x-real-ip", TrustTier::Proxy),
    ("x-client-ip", TrustTier::Proxy),
    ("x-cluster-client-ip", TrustTier::Proxy),
    ("x-forwarded", TrustTier::Generic),
    ("forwarded-for", TrustTier::Generic),
    ("forwarded", TrustTier::Generic),
    ("fastly-client-ip", TrustTier::Cdn),
    ("x-azure-clientip", TrustTier::Platform),
    ("x-azure-socketip", TrustTier::Platform),
    ("x-vercel-forwarded-for", TrustTier::Platform),
    ("x-forwarded-proto", TrustTier::Generic),
    ("x-original-forwarded-for", TrustTier::Proxy),
    ("client-ip", TrustTier::Generic),
    ("remote-addr", TrustTier::Generic),
];

/// The header scan list: built-ins first, then any configured extras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTable {
    entries: Vec<TrustedHeader>,
}

impl Default for HeaderTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl HeaderTable {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_HEADERS
                .iter()
                .map(|(name, tier)| TrustedHeader {
                    name: (*name).to_string(),
                    tier: *tier,
                })
                .collect(),
        }
    }

    /// Append extra header names as [`TrustTier::Custom`]. Names are
    /// lowercased; duplicates of existing entries are skipped.
    pub fn with_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref().trim().to_ascii_lowercase();
            if name.is_empty() || self.entries.iter().any(|e| e.name == name) {
                continue;
            }
            self.entries.push(TrustedHeader {
                name,
                tier: TrustTier::Custom,
            });
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrustedHeader> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_starts_with_cdn_headers() {
        let table = HeaderTable::builtin();
        let names: Vec<_> = table.iter().map(|h| h.name.as_str()).take(3).collect();
        assert_eq!(names, ["cf-connecting-ip", "true-client-ip", "x-forwarded-for"]);
        assert_eq!(table.len(), 17);
    }

    #[test]
    fn extras_are_appended_lowercased_and_deduplicated() {
        let table = HeaderTable::builtin().with_extra(["X-Edge-IP", "x-real-ip", " "]);
        assert_eq!(table.len(), 18);
        let last = table.iter().last().unwrap();
        assert_eq!(last.name, "x-edge-ip");
        assert_eq!(last.tier, TrustTier::Custom);
    }
}
