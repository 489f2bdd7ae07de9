use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoffeeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Page rendering error: {0}")]
    TemplateError(#[from] minijinja::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load model artifact '{path}': {reason}")]
    ModelLoadError { path: String, reason: String },

    #[error("Invalid model artifact: {reason}")]
    InvalidArtifactError { reason: String },

    #[error("Category '{value}' for {field} is not known to the model")]
    UnknownCategoryError { field: String, value: String },

    #[error("Model returned unexpected label {label}")]
    UnexpectedLabelError { label: i64 },

    #[error("Invalid {field}: {message}")]
    ValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Model,
    Input,
    Contract,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CoffeeError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        CoffeeError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CoffeeError::IoError(_) | CoffeeError::TemplateError(_) => ErrorCategory::System,
            CoffeeError::ConfigError { .. } | CoffeeError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            CoffeeError::ModelLoadError { .. } | CoffeeError::InvalidArtifactError { .. } => {
                ErrorCategory::Model
            }
            CoffeeError::ValidationError { .. } => ErrorCategory::Input,
            CoffeeError::UnknownCategoryError { .. } | CoffeeError::UnexpectedLabelError { .. } => {
                ErrorCategory::Contract
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Contract => ErrorSeverity::High,
            ErrorCategory::Model | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Short message suitable for the rendered page or the terminal.
    pub fn user_friendly_message(&self) -> String {
        match self {
            CoffeeError::ValidationError { field, message } => {
                format!("Please check the {} field: {}", field, message)
            }
            CoffeeError::ModelLoadError { .. } | CoffeeError::InvalidArtifactError { .. } => {
                "The coffee classifier is unavailable right now.".to_string()
            }
            CoffeeError::UnknownCategoryError { field, value } => {
                format!("The classifier does not know the {} '{}'.", field, value)
            }
            CoffeeError::UnexpectedLabelError { .. } => {
                "The classifier produced a result this app cannot interpret.".to_string()
            }
            CoffeeError::ConfigError { .. } | CoffeeError::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            CoffeeError::IoError(_) | CoffeeError::TemplateError(_) => {
                "An internal error occurred.".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CoffeeError::ValidationError { .. } => {
                "Use an altitude of at least 600 and pick region, processing and variety from the lists"
            }
            CoffeeError::ModelLoadError { .. } => {
                "Check that the model path points to an existing, readable artifact file"
            }
            CoffeeError::InvalidArtifactError { .. } => {
                "Re-export the classifier artifact; the file on disk is corrupt or inconsistent"
            }
            CoffeeError::UnknownCategoryError { .. } => {
                "The artifact was trained on different category labels; re-export it with the current option sets"
            }
            CoffeeError::UnexpectedLabelError { .. } => {
                "The artifact must be a binary classifier with classes 0 and 1"
            }
            CoffeeError::ConfigError { .. } | CoffeeError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and try again"
            }
            CoffeeError::IoError(_) | CoffeeError::TemplateError(_) => {
                "Check file permissions and disk state, then retry"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CoffeeError>;
