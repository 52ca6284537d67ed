//! Storage layer
//!
//! YAML configuration files and the environment override layer.

use crate::error::StorageError;

pub mod config;
pub mod environment;

type Result<T> = std::result::Result<T, StorageError>;
