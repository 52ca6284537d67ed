use super::envelope::Response;

/// Rendering options for the response envelope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub pretty: bool,
}

impl OutputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Serialize the envelope as compact single-line JSON, or indented when
    /// `pretty` is set.
    pub fn render(&self, response: &Response) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(response)
        } else {
            serde_json::to_string(response)
        }
    }
}
