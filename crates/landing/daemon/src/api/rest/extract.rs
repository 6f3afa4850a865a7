//! Request plumbing: client address resolution and path normalization

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts, Request},
    http::{request::Parts, uri::PathAndQuery, HeaderMap, Uri},
    middleware::Next,
    response::Response,
};
use landing_types::UNKNOWN_CLIENT_ADDRESS;
use std::convert::Infallible;
use std::net::SocketAddr;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Best-effort address of the client that sent the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientAddress
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientAddress(client_address(&parts.headers, peer)))
    }
}

/// First `X-Forwarded-For` entry, else the socket peer, else `"Unknown"`.
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(addr), _) => addr.to_string(),
        (None, Some(peer)) => peer.ip().to_string(),
        (None, None) => UNKNOWN_CLIENT_ADDRESS.to_string(),
    }
}

/// Collapse runs of `/` in a path; `None` when already normal.
pub fn collapse_slashes(path: &str) -> Option<String> {
    if !path.contains("//") {
        return None;
    }

    let mut collapsed = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        collapsed.push(c);
    }
    Some(collapsed)
}

/// Middleware wrapping the whole router so `//api/contact` routes like `/api/contact`
pub async fn normalize_path(mut request: Request, next: Next) -> Response {
    if let Some(path) = collapse_slashes(request.uri().path()) {
        let path_and_query = match request.uri().query() {
            Some(query) => format!("{}?{}", path, query),
            None => path,
        };

        let mut parts = request.uri().clone().into_parts();
        if let Ok(pq) = PathAndQuery::try_from(path_and_query) {
            parts.path_and_query = Some(pq);
            if let Ok(uri) = Uri::from_parts(parts) {
                *request.uri_mut() = uri;
            }
        }
    }

    next.run(request).await
}
