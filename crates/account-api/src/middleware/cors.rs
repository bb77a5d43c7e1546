//! CORS layer configuration.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::warn;

use account_core::config::app::CorsConfig;

/// Builds a CORS tower layer from configuration.
///
/// Credentials are allowed, so origins are always listed explicitly.
/// `csrf_header` is exposed to preflight so browsers may send it.
pub fn build_cors_layer(config: &CorsConfig, csrf_header: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let mut headers = vec![AUTHORIZATION, CONTENT_TYPE];
    if let Ok(name) = HeaderName::try_from(csrf_header) {
        headers.push(name);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(headers)
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.max_age_seconds))
}
