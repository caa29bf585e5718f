//! Prometheus metrics.
//!
//! Exposes search-sync collectors and an HTTP handler for the `/metrics`
//! endpoint.
use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

/// Outbox entries successfully mirrored into the search index
pub static SEARCH_SYNC_PUBLISHED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "microblog_search_sync_published_total",
        "Outbox entries successfully mirrored into the search index"
    )
    .expect("metric registration")
});

/// Outbox delivery attempts that failed
pub static SEARCH_SYNC_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "microblog_search_sync_failures_total",
        "Outbox delivery attempts that failed"
    )
    .expect("metric registration")
});

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
