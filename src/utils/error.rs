use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShippingError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status} for {endpoint}")]
    StatusError { endpoint: String, status: u16 },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Validation,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ShippingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShippingError::ApiError(_) | ShippingError::StatusError { .. } => {
                ErrorCategory::Network
            }
            ShippingError::SerializationError(_) => ErrorCategory::Data,
            ShippingError::UrlError(_)
            | ShippingError::ConfigError { .. }
            | ShippingError::ConfigValidationError { .. }
            | ShippingError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ShippingError::ValidationError { .. } => ErrorCategory::Validation,
            ShippingError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ShippingError::ApiError(e) if e.is_connect() => {
                "Could not reach the shipping service".to_string()
            }
            ShippingError::ApiError(e) if e.is_timeout() => {
                "The shipping service did not answer in time".to_string()
            }
            ShippingError::ApiError(_) => "Request to the shipping service failed".to_string(),
            ShippingError::StatusError { status, .. } => {
                format!("The shipping service answered with status {}", status)
            }
            ShippingError::SerializationError(_) => {
                "The shipping service returned data in an unexpected format".to_string()
            }
            ShippingError::IoError(e) => format!("File access failed: {}", e),
            ShippingError::ValidationError { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the shipping service is running and --base-url points at it"
            }
            ErrorCategory::Data => "Check that the service version matches this client",
            ErrorCategory::Configuration => "Fix the configuration value and try again",
            ErrorCategory::Validation => "Select both a product and a box that exist",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, ShippingError>;
