use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgramError {
    #[error("Workbook error: {0}")]
    WorkbookError(#[from] calamine::Error),

    #[error("Worksheet '{name}' not found in workbook")]
    MissingSheetError { name: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("No dated entry in the program, cannot derive the quarter")]
    NoDatedEntryError,

    #[error("External tool '{tool}' failed: {message}")]
    ExternalToolError { tool: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, ProgramError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Rendering,
    ExternalTool,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ProgramError {
    pub fn external_tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalToolError {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::WorkbookError(_)
            | Self::MissingSheetError { .. }
            | Self::NoDatedEntryError
            | Self::ProcessingError { .. } => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::TemplateError(_) => ErrorCategory::Rendering,
            Self::ExternalToolError { .. } => ErrorCategory::ExternalTool,
            Self::ZipError(_) | Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::ExternalTool => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Rendering | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::WorkbookError(_) => {
                "Check that the workbook exists and is a valid spreadsheet (xlsx, xls, ods)".to_string()
            }
            Self::MissingSheetError { name } => {
                format!("Add a worksheet named '{}' or set the sheet name in the [workbook] config section", name)
            }
            Self::NoDatedEntryError => {
                "Add at least one row with a real date in the first column of the program sheet".to_string()
            }
            Self::ExternalToolError { tool, .. } => {
                format!("Make sure '{}' is installed and on PATH, or configure it in the [tools] section", tool)
            }
            Self::TemplateError(_) => "Check the values passed to the page template".to_string(),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
            Self::IoError(_) | Self::ZipError(_) => {
                "Check file permissions and available disk space in the output directory".to_string()
            }
            Self::ProcessingError { .. } => "Inspect the program sheet for malformed rows".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the program: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Rendering => format!("Could not render the page: {}", self),
            ErrorCategory::ExternalTool => format!("An external tool failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_tool_errors_are_retryable() {
        let err = ProgramError::external_tool("pdftk", "exited with status 1");
        assert_eq!(err.category(), ErrorCategory::ExternalTool);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.recovery_suggestion().contains("pdftk"));
        assert!(err.to_string().contains("exited with status 1"));
    }

    #[test]
    fn test_missing_date_is_an_input_error() {
        let err = ProgramError::NoDatedEntryError;
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().starts_with("Could not read the program"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = ProgramError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
