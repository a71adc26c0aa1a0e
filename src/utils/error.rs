use thiserror::Error;

#[derive(Error, Debug)]
pub enum FineError {
    #[error("Vehicle lookup failed for license number {license_number}: {reason}")]
    Enrichment {
        license_number: String,
        reason: String,
    },

    #[error("Notification dispatch to {recipient} failed: {reason}")]
    Dispatch { recipient: String, reason: String },

    #[error("Formatting error: {message}")]
    Formatting { message: String },

    #[error("Processing task failed: {message}")]
    TaskError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Registry,
    Dispatch,
    Rendering,
    Input,
    Runtime,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FineError {
    pub fn formatting(message: impl Into<String>) -> Self {
        Self::Formatting {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Enrichment { .. } => ErrorCategory::Registry,
            Self::Dispatch { .. } => ErrorCategory::Dispatch,
            Self::Formatting { .. } => ErrorCategory::Rendering,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Input,
            Self::TaskError { .. } => ErrorCategory::Runtime,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Collaborator outages are worth a retry by the caller; bad data is not.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Registry | ErrorCategory::Dispatch => ErrorSeverity::Medium,
            ErrorCategory::Rendering | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Runtime | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Registry => {
                "Check that the vehicle registry is reachable and knows the license number"
            }
            ErrorCategory::Dispatch => "Check the outbound mail binding and retry the violation",
            ErrorCategory::Rendering => "Inspect the violation and owner data for missing fields",
            ErrorCategory::Input => "Verify the violation files exist and contain valid JSON",
            ErrorCategory::Runtime => "Re-run the batch; the failed violation was not processed",
            ErrorCategory::Configuration => "Review the configuration file and CLI arguments",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Enrichment { license_number, .. } => {
                format!("Could not find the owner of vehicle {}", license_number)
            }
            Self::Dispatch { recipient, .. } => {
                format!("Could not deliver the fine notification to {}", recipient)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FineError>;
