use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error in {step}: {message}")]
    ValidationError { step: String, message: String },

    #[error("Arithmetic error in {step}: {message}")]
    ArithmeticError { step: String, message: String },

    #[error("Source '{source_name}' failed: {message}")]
    SourceFailure {
        source_name: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Ingestion,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 失敗的執行一律以非零碼結束
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Medium => 2,
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

impl PipelineError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn validation(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn arithmetic(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArithmeticError {
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn source_failure(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceFailure {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::SourceFailure { .. } => ErrorCategory::Ingestion,
            Self::ValidationError { .. } | Self::ArithmeticError { .. } => {
                ErrorCategory::Processing
            }
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// 決定進程退出碼的嚴重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 來源失敗通常是暫時性的，重跑即可
            ErrorCategory::Ingestion => ErrorSeverity::Medium,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ConfigError { .. } => {
                "Check the step order in the pipeline file: metrics_calculator must be the last step"
            }
            Self::InvalidConfigValueError { .. } => {
                "Fix the highlighted field in the pipeline file and run again"
            }
            Self::ValidationError { .. } => {
                "Make sure the sources produce at least one record with a numeric value"
            }
            Self::ArithmeticError { .. } => {
                "Normalisation needs a non-zero maximum and every result must stay finite; check the values produced by the sources"
            }
            Self::SourceFailure { .. } => {
                "Retry the run, or set retry_attempts on the failing source"
            }
            Self::IoError(_) => "Check that the file exists and is readable",
            Self::SerializationError(_) => "Check that the records are valid JSON values",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::SourceFailure { source_name, .. } => {
                format!("Ingestion failed: source '{}' did not return data", source_name)
            }
            Self::ValidationError { step, message } | Self::ArithmeticError { step, message } => {
                format!("Pipeline step {} failed: {}", step, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration for '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}
