//! Core: configuration and process setup

pub mod config;

pub use config::Config;

/// Load `.env` (if any) into the process environment
pub fn setup_environment() {
    if dotenv::dotenv().is_ok() {
        tracing::debug!("Loaded environment from .env");
    }
}
