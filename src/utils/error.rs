use chrono::{DateTime, Local, TimeZone};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefileError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status} for {endpoint}")]
    HttpStatus {
        status: u16,
        endpoint: String,
        rate_limit_reset: Option<i64>,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, RefileError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    RateLimit,
    Configuration,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RefileError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            _ if self.is_rate_limited() => ErrorCategory::RateLimit,
            RefileError::ApiError(_) | RefileError::HttpStatus { .. } => ErrorCategory::Network,
            RefileError::IoError(_) => ErrorCategory::Storage,
            RefileError::ConfigError { .. }
            | RefileError::InvalidConfigValueError { .. }
            | RefileError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RefileError::CsvError(_)
            | RefileError::SerializationError(_)
            | RefileError::ProcessingError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::RateLimit | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// A 403 carrying an `X-RateLimit-Reset` hint.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            RefileError::HttpStatus {
                status: 403,
                rate_limit_reset: Some(_),
                ..
            }
        )
    }

    pub fn rate_limit_reset_time(&self) -> Option<DateTime<Local>> {
        match self {
            RefileError::HttpStatus {
                status: 403,
                rate_limit_reset: Some(epoch),
                ..
            } => Local.timestamp_opt(*epoch, 0).single(),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::RateLimit => match self.rate_limit_reset_time() {
                Some(reset) => format!(
                    "Wait until the quota resets at {} and run again",
                    reset.format("%Y-%m-%d %H:%M:%S")
                ),
                None => "Wait for the API quota to reset and run again".to_string(),
            },
            ErrorCategory::Network => {
                "Check the network connection and the access token, then run again".to_string()
            }
            ErrorCategory::Configuration => {
                "Check the JSON documents and refile.toml in the data directory".to_string()
            }
            ErrorCategory::Storage => {
                "Check that the data directory exists and is writable".to_string()
            }
            ErrorCategory::Data => {
                "Delete the cached stage files to force a fresh fetch".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RefileError::HttpStatus { .. } if self.is_rate_limited() => {
                "Over the API rate limit".to_string()
            }
            RefileError::HttpStatus {
                status, endpoint, ..
            } => format!("The API rejected a request to {} (HTTP {})", endpoint, status),
            RefileError::ApiError(e) => format!("Could not reach the API: {}", e),
            RefileError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            other => other.to_string(),
        }
    }
}
