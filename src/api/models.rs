use serde_json::Value;

/// Normalized result of one successful HTTP round trip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Raw response body, kept even when it is not JSON
    pub body: Vec<u8>,
    /// Parsed body, `None` when empty or not valid JSON
    pub data: Option<Value>,
    /// `Location` header, verbatim
    pub location: Option<String>,
    /// `rel="next"` target of the `Link` header
    pub link_next: Option<String>,
}

impl ApiResponse {
    pub fn has_next(&self) -> bool {
        self.link_next.is_some()
    }

    /// Number of items when the body is a JSON array, otherwise 0
    pub fn item_count(&self) -> usize {
        match &self.data {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    /// Result count of a search body: `total_results`, else `results` length
    pub fn search_result_count(&self) -> u64 {
        let Some(Value::Object(map)) = &self.data else {
            return 0;
        };
        if let Some(total) = map.get("total_results").and_then(Value::as_f64) {
            return total as u64;
        }
        match map.get("results") {
            Some(Value::Array(results)) => results.len() as u64,
            _ => 0,
        }
    }
}
