use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Error parsing CSV file: {message}")]
    Parse { message: String },

    #[error("Error parsing CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Cannot read input file {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid user_id '{user_id}': {reason}")]
    InvalidUserId { user_id: String, reason: String },

    #[error("CSV must contain a '{column}' column")]
    Schema { column: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed: {message}")]
    Transport { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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
    Medium,
    High,
    Critical,
}

impl DeleteError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } | Self::MissingConfig { .. } | Self::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            Self::Parse { .. }
            | Self::Csv(_)
            | Self::Input { .. }
            | Self::InvalidUserId { .. }
            | Self::Schema { .. } => ErrorCategory::Input,
            Self::Http(_) | Self::Transport { .. } => ErrorCategory::Network,
            Self::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// Whether the error stops a run before any deletion request is sent.
    pub fn is_pre_run(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Configuration | ErrorCategory::Input
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Config { .. } | Self::MissingConfig { .. } => {
                "Provide both the API token and the organization domain (flags, environment or .env)"
            }
            Self::InvalidConfigValue { .. } => {
                "Check the organization domain, e.g. myorg.omniapp.co, without scheme or path"
            }
            Self::Parse { .. } | Self::Csv(_) => {
                "Make sure the input is a UTF-8 comma-separated file with a header row"
            }
            Self::Input { .. } => "Check the --input path points to an existing, readable CSV file",
            Self::InvalidUserId { .. } => "Fill in or remove rows whose user_id is blank, '.' or '..'",
            Self::Schema { .. } => {
                "Add a header row containing a user_id column, one identifier per line"
            }
            Self::Http(_) | Self::Transport { .. } => {
                "Check network connectivity to the organization domain and try again"
            }
            Self::Io(_) => "Check that the output directory exists and is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config { .. } | Self::MissingConfig { .. } => {
                "Please provide both API token and organization domain!".to_string()
            }
            Self::Schema { column } => format!("CSV must contain a '{}' column!", column),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeleteError>;
