//! CORS middleware configuration for cross-origin requests.
//!
//! Mobile clients call the OTP endpoints directly; web clients are limited
//! to the origins listed in `ServerConfig::allowed_origins`.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tk_shared::config::{Environment, ServerConfig};

/// Max age for preflight cache, in seconds
const CORS_MAX_AGE: usize = 3600;

/// Creates a CORS middleware instance for the given server configuration.
///
/// With no configured origins, development allows any origin and every
/// other environment allows none.
pub fn create_cors(server: &ServerConfig, environment: Environment) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
            header::HeaderName::from_static("x-app-version"),
            header::HeaderName::from_static("x-platform"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(CORS_MAX_AGE);

    if server.allowed_origins.is_empty() {
        if environment.is_development() {
            tracing::info!("Configuring permissive CORS for development");
            cors = cors.allow_any_origin();
        } else {
            tracing::warn!("No CORS origins configured, cross-origin requests will be rejected");
        }
        return cors;
    }

    for origin in &server.allowed_origins {
        tracing::info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }
    cors
}
