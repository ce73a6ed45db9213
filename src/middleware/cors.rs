use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The front-end may be served from any origin; only the verbs the API uses
/// are allowed.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any)
}
