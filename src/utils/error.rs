use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown entity reference '&{name};' in {path}")]
    UnknownEntity { name: String, path: String },

    #[error("Render error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 依嚴重程度決定程式結束碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ToolError {
    pub fn config(message: impl Into<String>) -> Self {
        ToolError::ConfigError {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        ToolError::RenderError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolError::IoError(_) => ErrorCategory::Io,
            ToolError::ConfigError { .. } | ToolError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            ToolError::UnknownEntity { .. } => ErrorCategory::Input,
            ToolError::SerializationError(_) | ToolError::RenderError { .. } => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ToolError::ConfigError { .. } | ToolError::InvalidConfigValueError { .. } => {
                ErrorSeverity::Medium
            }
            ToolError::UnknownEntity { .. } => ErrorSeverity::High,
            ToolError::IoError(_) => ErrorSeverity::High,
            ToolError::SerializationError(_) | ToolError::RenderError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ToolError::IoError(_) => {
                "Check that the file exists and that you have permission to read or write it"
                    .to_string()
            }
            ToolError::ConfigError { .. } => {
                "Check the configuration file syntax (TOML)".to_string()
            }
            ToolError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the configuration or command line", field)
            }
            ToolError::UnknownEntity { name, .. } => format!(
                "Replace '&{};' with a numeric reference or declare it under [checker.entities]",
                name
            ),
            ToolError::SerializationError(_) => "Report this as a bug".to_string(),
            ToolError::RenderError { .. } => {
                "Check the figure settings (sample count, marker size)".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ToolError::IoError(e) => format!("File access failed: {}", e),
            ToolError::UnknownEntity { name, path } => {
                format!("Unknown escape character \"{}\" in {}", name, path)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_entity_is_fatal_input_error() {
        let err = ToolError::UnknownEntity {
            name: "bogus".to_string(),
            path: "a.xml".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity().exit_code(), 1);
        assert!(err.to_string().contains("&bogus;"));
        assert!(err.user_friendly_message().contains("a.xml"));
    }

    #[test]
    fn test_config_errors_map_to_medium() {
        let err = ToolError::config("bad toml");
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.severity().exit_code(), 2);
    }
}
