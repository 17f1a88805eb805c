//! Audit trail for catalogue changes made through the admin API

use axum::{
    body::Body,
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};

use super::request_id::RequestId;

/// Last path segment when it names a single hospital
fn hospital_id(path: &str) -> Option<&str> {
    let mut segments = path.rsplit('/');
    let last = segments.next()?;
    match segments.next() {
        Some("hospitals") if uuid::Uuid::try_parse(last).is_ok() => Some(last),
        _ => None,
    }
}

/// Logs every admin request that can change the catalogue, once it has run
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    if !matches!(method, Method::POST | Method::PUT | Method::DELETE) {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();

    let response = next.run(request).await;
    let status = response.status();
    let applied = status.is_success();

    tracing::info!(
        target: "audit",
        request_id = %request_id,
        method = %method,
        path = %path,
        hospital_id = hospital_id(&path).unwrap_or("-"),
        status = status.as_u16(),
        applied,
        "Catalogue change"
    );

    response
}
