use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use tk_api::{configure_app, logging, middleware::create_cors, AppState};
use tk_core::services::{OtpCleanupConfig, OtpCleanupTask, OtpService, OtpServiceConfig};
use tk_infra::database::{DatabasePool, MySqlOtpStore};
use tk_infra::sms::{create_sms_service, SmsGatewayAdapter};
use tk_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_tracing(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(environment = %config.environment, "Starting Tiki auth API server");

    // Database
    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to database")?;
    if config.database.run_migrations {
        pool.run_migrations().await.context("Failed to run migrations")?;
    }
    let store = Arc::new(MySqlOtpStore::new(pool.get_pool().clone()));

    // SMS delivery
    let sms_service = create_sms_service(&config.sms).context("Failed to create SMS service")?;
    tracing::info!("Using SMS provider: {}", sms_service.provider_name());
    let gateway = Arc::new(
        SmsGatewayAdapter::new(sms_service, config.sms.default_country_code.clone())
            .with_validity_minutes(config.otp.code_ttl_minutes),
    );

    // OTP service and retention cleanup
    let service_config =
        OtpServiceConfig::try_from(&config.otp).context("Invalid OTP configuration")?;
    let otp_service = Arc::new(OtpService::new(store, gateway, service_config));
    let cleanup = Arc::new(OtpCleanupTask::new(
        otp_service.clone(),
        OtpCleanupConfig::from(&config.otp),
    ));
    let cleanup_handle = cleanup.start_background_task();

    let app_state = web::Data::new(
        AppState::new(otp_service).with_dependency(Arc::new(pool.clone())),
    );
    let server_config = config.server.clone();
    let environment = config.environment;

    let bind_address = config.server.bind_address();
    tracing::info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(create_cors(&server_config, environment))
            .wrap(TracingLogger::default())
            .app_data(app_state.clone())
            .configure(configure_app::<MySqlOtpStore, SmsGatewayAdapter>)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    tracing::info!("Server stopped, shutting down");
    if let Some(handle) = cleanup_handle {
        handle.abort();
    }
    pool.close().await;

    Ok(())
}
