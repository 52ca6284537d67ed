//! The JSON envelope every command prints
//!
//! A response is either a success (data plus optional pagination,
//! breadcrumbs, summary and location) or a failure (error detail only).
//! Success-only fields can only be attached through [`SuccessBuilder`], so a
//! failure never carries them.

use crate::error::{AppError, EXIT_SUCCESS, ErrorKind};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub has_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
}

/// A suggested follow-up command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breadcrumb {
    pub action: String,
    pub cmd: String,
    pub description: String,
}

impl Breadcrumb {
    pub fn new(
        action: impl Into<String>,
        cmd: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            cmd: cmd.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub timestamp: String,
}

impl Meta {
    fn now() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    breadcrumbs: Vec<Breadcrumb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    meta: Meta,
}

impl Response {
    /// Start a success envelope around `data`
    pub fn success(data: impl Into<Option<Value>>) -> SuccessBuilder {
        SuccessBuilder {
            data: data.into(),
            pagination: None,
            breadcrumbs: Vec::new(),
            summary: None,
            location: None,
        }
    }

    pub fn failure(err: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorDetail {
                code: err.kind(),
                message: err.to_string(),
                status: err.status(),
            }),
            pagination: None,
            breadcrumbs: Vec::new(),
            summary: None,
            location: None,
            meta: Meta::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorDetail> {
        self.error.as_ref()
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.breadcrumbs
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn timestamp(&self) -> &str {
        &self.meta.timestamp
    }

    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match &self.error {
            Some(detail) => detail.code.exit_code(),
            None => EXIT_SUCCESS,
        }
    }
}

impl From<Result<Response, AppError>> for Response {
    fn from(result: Result<Response, AppError>) -> Self {
        match result {
            Ok(response) => response,
            Err(err) => Response::failure(&err),
        }
    }
}

/// Builder for success envelopes
#[derive(Debug)]
pub struct SuccessBuilder {
    data: Option<Value>,
    pagination: Option<Pagination>,
    breadcrumbs: Vec<Breadcrumb>,
    summary: Option<String>,
    location: Option<String>,
}

impl SuccessBuilder {
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into()).filter(|s| !s.is_empty());
        self
    }

    /// Location of a created resource
    pub fn location(mut self, location: Option<String>) -> Self {
        self.location = location.filter(|l| !l.is_empty());
        self
    }

    pub fn pagination(mut self, has_next: bool, next_url: Option<String>) -> Self {
        self.pagination = Some(Pagination {
            has_next,
            next_url: next_url.filter(|u| !u.is_empty()),
        });
        self
    }

    pub fn breadcrumbs(mut self, breadcrumbs: Vec<Breadcrumb>) -> Self {
        self.breadcrumbs = breadcrumbs;
        self
    }

    pub fn build(self) -> Response {
        Response {
            success: true,
            data: self.data,
            error: None,
            pagination: self.pagination,
            breadcrumbs: self.breadcrumbs,
            summary: self.summary,
            location: self.location,
            meta: Meta::now(),
        }
    }
}
