//! Buffered reverse proxy.
//!
//! Requests that clear the gate are handed here as the router fallback.
//! The body is buffered, connection-scoped headers are dropped on both
//! legs, and the upstream's status, headers, and body are relayed back
//! unchanged.

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderName, StatusCode, header},
    response::Response,
};
use tracing::error;

use mukando_core::AppError;

use crate::state::GatewayState;

/// Bodies are buffered before forwarding; anything larger is refused.
const MAX_FORWARD_BODY: usize = 10 * 1024 * 1024;

/// Connection-scoped headers that must not cross a proxy (RFC 9110).
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

pub async fn forward(
    State(state): State<Arc<GatewayState>>,
    req: Request,
) -> Result<Response, AppError> {
    let path = req.uri().path();
    let Some(upstream) = state.routes.upstream_for(path) else {
        error!(path = %path, "no upstream configured");
        return Err(AppError::new(
            StatusCode::BAD_GATEWAY,
            anyhow!("No upstream configured"),
        ));
    };

    let mut url = format!("{upstream}{path}");
    if let Some(query) = req.uri().query() {
        url.push('?');
        url.push_str(query);
    }

    let (parts, body) = req.into_parts();
    let body_bytes = axum::body::to_bytes(body, MAX_FORWARD_BODY).await.map_err(|_| {
        AppError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            anyhow!("Request body too large"),
        )
    })?;

    // Host names the gateway; content-length is recomputed from the
    // buffered body.
    let mut upstream_headers = HeaderMap::new();
    for (name, value) in &parts.headers {
        if !is_hop_by_hop(name) && name != header::HOST && name != header::CONTENT_LENGTH {
            upstream_headers.append(name.clone(), value.clone());
        }
    }

    let upstream_resp = state
        .http
        .request(parts.method, &url)
        .headers(upstream_headers)
        .body(body_bytes)
        .send()
        .await
        .map_err(|e| {
            error!(url = %url, error = %e, "upstream request failed");
            AppError::new(StatusCode::BAD_GATEWAY, anyhow!("Upstream unavailable"))
        })?;

    let status = upstream_resp.status();
    let mut headers = HeaderMap::new();
    for (name, value) in upstream_resp.headers() {
        if !is_hop_by_hop(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    let bytes = upstream_resp.bytes().await.map_err(|e| {
        error!(url = %url, error = %e, "failed to read upstream response");
        AppError::new(StatusCode::BAD_GATEWAY, anyhow!("Upstream unavailable"))
    })?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_by_hop_detection() {
        assert!(is_hop_by_hop(&header::TRANSFER_ENCODING));
        assert!(is_hop_by_hop(&header::CONNECTION));
        assert!(is_hop_by_hop(&header::UPGRADE));
        assert!(!is_hop_by_hop(&header::AUTHORIZATION));
        assert!(!is_hop_by_hop(&header::CONTENT_TYPE));
        assert!(!is_hop_by_hop(&HeaderName::from_static("x-user-id")));
    }
}
