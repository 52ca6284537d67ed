//! Service layer between the command handlers and storage

pub mod config_service;

pub use config_service::{ConfigService, ResolvedConfig};
