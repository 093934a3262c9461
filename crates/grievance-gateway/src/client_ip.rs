// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Middleware that resolves the client address once per request.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use grievance_ip::{IpResolver, IpSource, TransportSignals};

/// The resolved client address, stored in request extensions.
#[derive(Debug, Clone)]
pub struct ClientIp {
    pub address: String,
    pub source: IpSource,
}

/// Runs the resolver and attaches a [`ClientIp`] to the request.
///
/// Transport signals come from `ConnectInfo` when the server was started
/// with connect info; otherwise only headers are consulted.
pub async fn capture_client_ip(
    State(resolver): State<Arc<IpResolver>>,
    mut request: Request,
    next: Next,
) -> Response {
    let transport = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| TransportSignals::from_remote(addr.ip()))
        .unwrap_or_default();

    let resolved = resolver.resolve(request.headers(), &transport);
    tracing::debug!(
        ip = %resolved.address,
        source = %resolved.source,
        method = %request.method(),
        path = %request.uri().path(),
        "client ip captured"
    );

    request.extensions_mut().insert(ClientIp {
        address: resolved.address,
        source: resolved.source,
    });
    next.run(request).await
}
