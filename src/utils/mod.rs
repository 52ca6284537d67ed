//! Utils module - Shared utilities and helpers

/// Content arguments that may come from stdin
pub mod input;

/// Stderr logger setup
pub mod logging;

/// Input validation
pub mod validation;
