use crate::api::error_body::extract_error_message;
use crate::api::link::parse_link_next;
use crate::api::models::ApiResponse;
use crate::error::AppError;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE, LINK, LOCATION};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("recuerd0/", env!("CARGO_PKG_VERSION"));
const JSON_CONTENT_TYPE: &str = "application/json";

/// One HTTP round trip per call. Upstream error statuses come back as
/// [`AppError`], never as an `Ok` response.
#[async_trait]
pub trait Api: Send + Sync {
    async fn get(&self, path: &str) -> Result<ApiResponse, AppError>;
    async fn post(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, AppError>;
    async fn patch(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, AppError>;
    async fn delete(&self, path: &str) -> Result<ApiResponse, AppError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    pub base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, AppError> {
        Self::with_timeout(base_url, token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, token: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Network(format!("creating HTTP client: {}", e)))?;

        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Relative paths are appended to the base URL; absolute URLs (such as
    /// pagination links) are used as given.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.build_url(path))
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, AppError> {
        let mut request = self.build_request(method.clone(), path);
        if let Some(body) = body {
            let payload = serde_json::to_vec(body)
                .map_err(|e| AppError::general(format!("marshaling request body: {}", e)))?;
            request = request.body(payload);
        }

        debug!("--> {} {}", method, self.build_url(path));

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(format!("request failed: {}", e)))?;

        let status = response.status();
        let location = header_value(&response, LOCATION);
        let link_next = header_value(&response, LINK).and_then(|link| parse_link_next(&link));

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(format!("reading response: {}", e)))?
            .to_vec();

        debug!(
            "<-- {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        );

        let data = if body.is_empty() {
            None
        } else {
            serde_json::from_slice::<Value>(&body).ok()
        };

        if status.as_u16() >= 400 {
            let message = extract_error_message(data.as_ref(), &body);
            return Err(AppError::from_http_status(status.as_u16(), message));
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
            data,
            location,
            link_next,
        })
    }
}

fn header_value(
    response: &reqwest::Response,
    name: reqwest::header::HeaderName,
) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl Api for ApiClient {
    async fn get(&self, path: &str) -> Result<ApiResponse, AppError> {
        self.execute(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, AppError> {
        self.execute(Method::POST, path, body).await
    }

    async fn patch(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, AppError> {
        self.execute(Method::PATCH, path, body).await
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, AppError> {
        self.execute(Method::DELETE, path, None).await
    }
}
