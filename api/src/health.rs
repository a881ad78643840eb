//! Health reporting for the service and the backends it depends on

use actix_web::{web, HttpResponse};
use async_trait::async_trait;
use serde_json::{Map, Value};

use tk_core::repositories::OtpStore;
use tk_core::services::SmsGateway;
use tk_infra::database::DatabasePool;

use crate::app::AppState;

/// A backend whose reachability is reported by `/health`
#[async_trait]
pub trait DependencyCheck: Send + Sync {
    /// Key used for this dependency in the health response
    fn name(&self) -> &'static str;

    /// Whether the dependency currently answers
    async fn is_healthy(&self) -> bool;
}

#[async_trait]
impl DependencyCheck for DatabasePool {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }
}

/// Health check endpoint handler
///
/// Answers 503 when any registered dependency is down.
pub async fn health_check<S, G>(state: web::Data<AppState<S, G>>) -> HttpResponse
where
    S: OtpStore + 'static,
    G: SmsGateway + 'static,
{
    let mut checks = Map::new();
    let mut healthy = true;

    for dependency in &state.dependencies {
        let up = dependency.is_healthy().await;
        if !up {
            tracing::warn!(dependency = dependency.name(), "Health check failed");
        }
        healthy &= up;
        checks.insert(
            dependency.name().to_string(),
            Value::from(if up { "up" } else { "down" }),
        );
    }

    let body = serde_json::json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "service": "tiki-auth",
        "version": env!("CARGO_PKG_VERSION"),
        "checks": checks,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
