//! Content arguments
//!
//! `--content -` means "read the content from stdin".

use crate::error::AppError;
use std::io::Read;

pub const STDIN_MARKER: &str = "-";

/// Resolve a `--content` value, reading `reader` to the end when the value is
/// the stdin marker.
pub fn resolve_content(value: Option<String>, reader: &mut dyn Read) -> crate::Result<Option<String>> {
    match value {
        Some(v) if v == STDIN_MARKER => {
            let mut content = String::new();
            reader
                .read_to_string(&mut content)
                .map_err(|e| AppError::general(format!("reading stdin: {}", e)))?;
            Ok(Some(content))
        }
        other => Ok(other),
    }
}
