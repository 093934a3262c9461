// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort client IP resolution.
//!
//! The result is a heuristic ranked by how much each source is usually
//! trusted. Headers can be spoofed, so it must never feed a security
//! decision. It is used for geolocation and logging only.

pub mod headers;
pub mod ranges;
pub mod resolver;

pub use headers::{BUILTIN_HEADERS, HeaderTable, TrustTier, TrustedHeader};
pub use ranges::{CidrRange, NON_PUBLIC_RANGES, RangeKind, classify, is_loopback_text, is_public};
pub use resolver::{
    FALLBACK_ADDRESS, HeaderPass, IpResolver, IpSource, ResolvedIp, SIMULATED_ADDRESS,
    TransportSignals,
};
