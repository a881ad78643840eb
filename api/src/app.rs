//! Application state and route wiring
//!
//! `configure_app` registers every endpoint on an Actix `ServiceConfig`, so
//! the binary and the integration tests build the same application; only
//! the middleware stack and the concrete store/gateway types differ.

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use tk_core::repositories::OtpStore;
use tk_core::services::{OtpService, SmsGateway};

use crate::handlers::error::ApiError;
use crate::health::{health_check, DependencyCheck};
use crate::routes::otp::{resend::resend_otp, send::send_otp, verify::verify_otp};

/// Largest JSON body accepted by the OTP endpoints
const JSON_PAYLOAD_LIMIT: usize = 4 * 1024;

/// Application state that holds shared services
pub struct AppState<S: OtpStore, G: SmsGateway> {
    pub otp_service: Arc<OtpService<S, G>>,
    /// Backends reported by `/health`
    pub dependencies: Vec<Arc<dyn DependencyCheck>>,
}

impl<S: OtpStore, G: SmsGateway> AppState<S, G> {
    pub fn new(otp_service: Arc<OtpService<S, G>>) -> Self {
        Self {
            otp_service,
            dependencies: Vec::new(),
        }
    }

    /// Report `dependency` in the health check
    pub fn with_dependency(mut self, dependency: Arc<dyn DependencyCheck>) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

/// JSON extractor configuration
///
/// Malformed bodies, unknown purposes and missing fields are answered with
/// the same error envelope as validation failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_PAYLOAD_LIMIT)
        .error_handler(|err, _req| {
            tracing::debug!(error = %err, "Rejected malformed JSON payload");
            ApiError::InvalidPayload(err.to_string()).into()
        })
}

/// Register health check and `/api/v1` routes
pub fn configure_app<S, G>(cfg: &mut web::ServiceConfig)
where
    S: OtpStore + 'static,
    G: SmsGateway + 'static,
{
    cfg.app_data(json_config())
        .route("/health", web::get().to(health_check::<S, G>))
        .service(
            web::scope("/api/v1").service(
                web::scope("/otp")
                    .route("/send", web::post().to(send_otp::<S, G>))
                    .route("/resend", web::post().to(resend_otp::<S, G>))
                    .route("/verify", web::post().to(verify_otp::<S, G>)),
            ),
        )
        .default_service(web::route().to(not_found));
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "error": "NOT_FOUND",
        "message": "The requested resource was not found"
    }))
}
