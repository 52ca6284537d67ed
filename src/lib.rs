pub use error::AppError;

/// Main architecture layers (dependency flow: CLI → Core → Storage)
pub mod cli; // Command-line interface
pub mod core; // Configuration resolution
pub mod storage; // Config files and environment overrides

/// Support modules (used across layers)
pub mod api; // recuerd0 API client
pub mod display; // JSON envelope
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;
