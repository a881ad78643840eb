// Library exports for testing and external use

pub mod app;
pub mod dto;
pub mod handlers;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod routes;

pub use app::{configure_app, json_config, AppState};
pub use health::DependencyCheck;
