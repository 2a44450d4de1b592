// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Caller IP resolution.

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

/// Caller IP as seen by the service, if known.
#[derive(Debug, Clone, Default)]
pub struct ClientIp(pub Option<String>);

/// Insert a [`ClientIp`] extension into every request.
///
/// The first `X-Forwarded-For` hop wins (the service runs behind a load
/// balancer); otherwise the socket peer address is used.
pub async fn capture_client_ip(mut request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    let ip = forwarded_for(request.headers()).or(peer);
    request.extensions_mut().insert(ClientIp(ip));

    next.run(request).await
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}
