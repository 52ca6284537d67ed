//! Upstream error message extraction
//!
//! Upstream services report errors in several JSON shapes. Each extractor
//! recognizes one shape; the first match in [`EXTRACTORS`] order wins, since
//! some bodies satisfy more than one shape.

use serde_json::{Map, Value};

/// Raw bodies shorter than this are used verbatim when no shape matches.
const RAW_MESSAGE_LIMIT: usize = 200;

pub const UNKNOWN_ERROR: &str = "unknown error";

type Extractor = fn(&Map<String, Value>) -> Option<String>;

const EXTRACTORS: [Extractor; 6] = [
    top_level_error_string,
    nested_error_details,
    nested_error_message,
    top_level_message,
    top_level_errors_map,
    top_level_errors_array,
];

/// Pick the most specific message out of an error response.
pub fn extract_error_message(data: Option<&Value>, raw: &[u8]) -> String {
    if let Some(Value::Object(map)) = data {
        if let Some(message) = EXTRACTORS.iter().find_map(|extract| extract(map)) {
            return message;
        }
    }

    if !raw.is_empty() && raw.len() < RAW_MESSAGE_LIMIT {
        return String::from_utf8_lossy(raw).into_owned();
    }

    UNKNOWN_ERROR.to_string()
}

// {"error": "message"}
fn top_level_error_string(map: &Map<String, Value>) -> Option<String> {
    map.get("error")?.as_str().map(str::to_string)
}

// {"error": {"details": {"field": ["msg"]}}}
fn nested_error_details(map: &Map<String, Value>) -> Option<String> {
    let details = map.get("error")?.as_object()?.get("details")?.as_object()?;
    flatten_field_messages(details)
}

// {"error": {"message": "..."}}
fn nested_error_message(map: &Map<String, Value>) -> Option<String> {
    map.get("error")?
        .as_object()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

// {"message": "..."}
fn top_level_message(map: &Map<String, Value>) -> Option<String> {
    map.get("message")?.as_str().map(str::to_string)
}

// {"errors": {"name": ["can't be blank"]}}
fn top_level_errors_map(map: &Map<String, Value>) -> Option<String> {
    flatten_field_messages(map.get("errors")?.as_object()?)
}

// {"errors": ["message", ...]}
fn top_level_errors_array(map: &Map<String, Value>) -> Option<String> {
    map.get("errors")?
        .as_array()?
        .first()?
        .as_str()
        .map(str::to_string)
}

/// `{"name": ["can't be blank", "is too short"]}` becomes
/// `"name can't be blank; name is too short"`. Non-string entries are skipped.
fn flatten_field_messages(fields: &Map<String, Value>) -> Option<String> {
    let parts: Vec<String> = fields
        .iter()
        .filter_map(|(field, messages)| Some((field, messages.as_array()?)))
        .flat_map(|(field, messages)| {
            messages
                .iter()
                .filter_map(Value::as_str)
                .map(move |msg| format!("{} {}", field, msg))
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}
