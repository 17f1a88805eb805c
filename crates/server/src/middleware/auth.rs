use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use medifind_core::Notice;

/// Header carrying the admin API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// API Key authentication state
#[derive(Clone)]
pub struct ApiKeyAuth {
    api_key: Option<String>,
}

impl ApiKeyAuth {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    /// Whether the headers carry the configured key (always true when none is configured)
    fn allows(&self, headers: &HeaderMap) -> bool {
        match &self.api_key {
            None => true,
            Some(expected) => headers
                .get(API_KEY_HEADER)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|provided| provided == expected),
        }
    }
}

/// Reject admin requests without a valid API key
pub async fn auth_middleware(request: Request<Body>, next: Next) -> Response {
    let allowed = request
        .extensions()
        .get::<ApiKeyAuth>()
        .is_none_or(|auth| auth.allows(request.headers()));

    if !allowed {
        let notice = Notice::error("unauthorized", "Missing or invalid API key");
        return (StatusCode::UNAUTHORIZED, Json(notice)).into_response();
    }

    next.run(request).await
}
