use serde::Serialize;
use thiserror::Error;

/// Machine-readable failure category. Every kind owns exactly one error code
/// string and one process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    #[serde(rename = "ERROR")]
    General,
    #[serde(rename = "INVALID_ARGS")]
    InvalidArgs,
    #[serde(rename = "AUTH_ERROR")]
    Auth,
    #[serde(rename = "FORBIDDEN")]
    Forbidden,
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    #[serde(rename = "NETWORK_ERROR")]
    Network,
    #[serde(rename = "RATE_LIMITED")]
    RateLimited,
}

pub const EXIT_SUCCESS: i32 = 0;

impl ErrorKind {
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::General,
        ErrorKind::InvalidArgs,
        ErrorKind::Auth,
        ErrorKind::Forbidden,
        ErrorKind::NotFound,
        ErrorKind::Validation,
        ErrorKind::Network,
        ErrorKind::RateLimited,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::General => "ERROR",
            ErrorKind::InvalidArgs => "INVALID_ARGS",
            ErrorKind::Auth => "AUTH_ERROR",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::RateLimited => "RATE_LIMITED",
        }
    }

    /// Process exit code scripts can branch on.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::General => 1,
            ErrorKind::InvalidArgs => 2,
            ErrorKind::Auth => 3,
            ErrorKind::Forbidden => 4,
            ErrorKind::NotFound => 5,
            ErrorKind::Validation => 6,
            ErrorKind::Network => 7,
            ErrorKind::RateLimited => 8,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{message}")]
    Unauthorized { message: String },
    #[error("{message}")]
    Forbidden { message: String },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Validation { message: String },
    #[error("{message}")]
    RateLimited { message: String },
    #[error("{0}")]
    Network(String),
    #[error("{message}")]
    General {
        message: String,
        status: Option<u16>,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("parsing {path}: {message}")]
    ConfigParseError { path: String, message: String },
    #[error("serializing config: {message}")]
    ConfigSerialize { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
    #[error("account \"{name}\" not found")]
    AccountNotFound { name: String },
    #[error(
        "cannot remove current account \"{name}\" while other accounts exist; switch to another account first"
    )]
    CurrentAccountInUse { name: String },
}

impl AppError {
    pub fn general(message: impl Into<String>) -> Self {
        AppError::General {
            message: message.into(),
            status: None,
        }
    }

    /// Classify an upstream error status. Only called for statuses >= 400.
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => AppError::Unauthorized { message },
            403 => AppError::Forbidden { message },
            404 => AppError::NotFound { message },
            422 => AppError::Validation { message },
            429 => AppError::RateLimited { message },
            400..=499 => AppError::General {
                message,
                status: Some(status),
            },
            500..=u16::MAX => AppError::General {
                message: format!("Server error ({}): {}", status, message),
                status: Some(status),
            },
            _ => AppError::general(message),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidArguments(_) => ErrorKind::InvalidArgs,
            AppError::Unauthorized { .. } => ErrorKind::Auth,
            AppError::Forbidden { .. } => ErrorKind::Forbidden,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Validation { .. } => ErrorKind::Validation,
            AppError::RateLimited { .. } => ErrorKind::RateLimited,
            AppError::Network(_) => ErrorKind::Network,
            AppError::General { .. } | AppError::Storage(_) => ErrorKind::General,
        }
    }

    /// HTTP status associated with the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Unauthorized { .. } => Some(401),
            AppError::Forbidden { .. } => Some(403),
            AppError::NotFound { .. } => Some(404),
            AppError::Validation { .. } => Some(422),
            AppError::RateLimited { .. } => Some(429),
            AppError::General { status, .. } => *status,
            AppError::InvalidArguments(_) | AppError::Network(_) | AppError::Storage(_) => None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}
