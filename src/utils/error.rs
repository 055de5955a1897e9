use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client setup failed: {0}")]
    ClientBuildError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Cannot read tag list '{path}': {message}")]
    InputError { path: String, message: String },

    #[error("Device {device} unreachable: {message}")]
    TransportError { device: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TaggerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TaggerError::ConfigError { .. }
            | TaggerError::MissingConfigError { .. }
            | TaggerError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            TaggerError::InputError { .. } => ErrorCategory::Input,
            TaggerError::TransportError { .. } => ErrorCategory::Network,
            TaggerError::IoError(_)
            | TaggerError::SerializationError(_)
            | TaggerError::ClientBuildError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 傳輸錯誤只影響單一設備，會被重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Transport failures are the only errors the retry policy acts on.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TaggerError::TransportError { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TaggerError::MissingConfigError { field } => {
                format!("{} not found in env file, exiting..", field)
            }
            TaggerError::InputError { path, .. } => {
                format!("Could not read tags from '{}'", path)
            }
            TaggerError::TransportError { device, .. } => {
                format!("Could not reach device {}", device)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TaggerError::MissingConfigError { .. } => {
                "Add API_KEY=<key> and PAN=<host,host> lines to the env file"
            }
            TaggerError::ConfigError { .. } | TaggerError::InvalidConfigValueError { .. } => {
                "Check the settings file and command line options"
            }
            TaggerError::InputError { .. } => {
                "Make sure the tag file exists and lists one tag per line"
            }
            TaggerError::TransportError { .. } => {
                "Check the device address and that its management interface is reachable"
            }
            TaggerError::IoError(_) => "Check file permissions and paths",
            TaggerError::SerializationError(_) => "Check the report output path",
            TaggerError::ClientBuildError(_) => "Check the transport settings",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaggerError>;
