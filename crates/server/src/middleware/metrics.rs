//! Request metrics
//!
//! `http_requests_total` and `http_request_duration_seconds`, labelled by
//! method, route and status.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

/// Route label for a request. Unmatched paths have UUID segments collapsed
/// so probes against random ids stay in one series.
fn route_label(matched: Option<&str>, path: &str) -> String {
    if let Some(route) = matched {
        return route.to_string();
    }
    path.split('/')
        .map(|seg| if uuid::Uuid::try_parse(seg).is_ok() { "{id}" } else { seg })
        .collect::<Vec<_>>()
        .join("/")
}

pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = route_label(
        request.extensions().get::<MatchedPath>().map(MatchedPath::as_str),
        request.uri().path(),
    );

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "route" => route)
        .record(elapsed);

    response
}
