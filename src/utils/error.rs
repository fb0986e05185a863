use crate::domain::model::SelectionState;
use thiserror::Error;

/// 加入待確認清單時的驗證失敗。每個變體都是可預期、可恢復的結果。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Course {course_id} is already {state}")]
    DuplicateCourseError {
        course_id: String,
        state: SelectionState,
    },

    #[error("Prerequisites not fulfilled. Required: {}", .missing.join(", "))]
    PrerequisiteError { missing: Vec<String> },

    #[error("This course overlaps with {conflicting_code} ({conflicting_schedule})")]
    OverlapError {
        conflicting_course_id: String,
        conflicting_code: String,
        conflicting_schedule: String,
    },

    #[error(
        "Adding this course would exceed the {ceiling} credit maximum. Current: {current} credits, Adding: {adding} credits, Total: {total} credits."
    )]
    CreditLimitError {
        current: u32,
        adding: u32,
        total: u32,
        ceiling: u32,
    },
}

impl RegistrationError {
    /// 穩定的錯誤標籤，供呈現層分支使用
    pub fn kind(&self) -> &'static str {
        match self {
            RegistrationError::DuplicateCourseError { .. } => "already_selected",
            RegistrationError::PrerequisiteError { .. } => "prerequisite_not_fulfilled",
            RegistrationError::OverlapError { .. } => "overlap",
            RegistrationError::CreditLimitError { .. } => "credits_exceeded",
        }
    }
}

#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error in {source_name}: {message}")]
    TomlError {
        source_name: String,
        message: String,
    },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Course '{course_id}' not found in catalogue")]
    UnknownCourseError { course_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Catalogue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RegistrarError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegistrarError::IoError(_) => ErrorCategory::Io,
            RegistrarError::SerializationError(_) | RegistrarError::CsvError(_) => {
                ErrorCategory::Data
            }
            RegistrarError::TomlError { .. }
            | RegistrarError::ConfigValidationError { .. }
            | RegistrarError::InvalidConfigValueError { .. }
            | RegistrarError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RegistrarError::UnknownCourseError { .. } => ErrorCategory::Catalogue,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Catalogue => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RegistrarError::IoError(_) => "Check that the file exists and is readable",
            RegistrarError::SerializationError(_) => "Check that the JSON catalogue is well formed",
            RegistrarError::CsvError(_) => "Check that the export path is writable",
            RegistrarError::TomlError { .. } => "Check the TOML syntax of the session file",
            RegistrarError::ConfigValidationError { .. }
            | RegistrarError::InvalidConfigValueError { .. } => {
                "Fix the reported field in the configuration file"
            }
            RegistrarError::MissingConfigError { .. } => {
                "Add the missing field to the configuration file"
            }
            RegistrarError::UnknownCourseError { .. } => {
                "Use a course id that is listed in the catalogue"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RegistrarError::IoError(e) => format!("Could not access a file: {}", e),
            RegistrarError::UnknownCourseError { course_id } => {
                format!("The course '{}' does not exist", course_id)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistrarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_limit_message() {
        let err = RegistrationError::CreditLimitError {
            current: 16,
            adding: 3,
            total: 19,
            ceiling: 18,
        };
        assert_eq!(
            err.to_string(),
            "Adding this course would exceed the 18 credit maximum. Current: 16 credits, Adding: 3 credits, Total: 19 credits."
        );
        assert_eq!(err.kind(), "credits_exceeded");
    }

    #[test]
    fn test_prerequisite_message_lists_missing_codes() {
        let err = RegistrationError::PrerequisiteError {
            missing: vec!["CS101".to_string(), "MA1025".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Prerequisites not fulfilled. Required: CS101, MA1025"
        );
    }

    #[test]
    fn test_severity_follows_category() {
        let err = RegistrarError::UnknownCourseError {
            course_id: "42".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Catalogue);
        assert_eq!(err.severity(), ErrorSeverity::Medium);

        let err = RegistrarError::MissingConfigError {
            field: "student".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
