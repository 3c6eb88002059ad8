//! Error types and handling for `poimap`

use thiserror::Error;

/// A single schema violation inside a map document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path to the offending value, e.g. `locations[2].url`
    pub path: String,
    /// What constraint the value broke
    pub message: String,
}

impl FieldViolation {
    pub fn new<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Main error type for the `poimap` application
#[derive(Error, Debug)]
pub enum PoiMapError {
    /// The page was requested without a `config` query parameter
    #[error("Missing `{param}` query parameter")]
    MissingParameter { param: &'static str },

    /// The `config` query parameter is not a usable document name
    #[error("Invalid `{param}` query parameter: {value:?}")]
    InvalidParameter { param: &'static str, value: String },

    /// The page query string could not be decoded, e.g. a repeated key
    #[error("Malformed query string: {message}")]
    MalformedQuery { message: String },

    /// No document exists under the requested name
    #[error("Map document `{identifier}` not found")]
    NotFound { identifier: String },

    /// Network or HTTP failure while fetching a document
    #[error("Failed to fetch map document `{identifier}`: {message}")]
    Fetch { identifier: String, message: String },

    /// The document is not well-formed JSON of the expected shape
    #[error("Map document is malformed: {message}")]
    Parse { message: String },

    /// The document parsed but broke one or more field constraints
    #[error("Map document failed validation: {}", join_violations(.violations))]
    Validation { violations: Vec<FieldViolation> },

    /// A credential the map widget needs is not configured
    #[error("Missing credential {name}: {remediation}")]
    MissingCredential {
        name: &'static str,
        remediation: String,
    },

    /// Settings-related errors
    #[error("Settings error: {message}")]
    Settings { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl PoiMapError {
    /// Create a new fetch error
    pub fn fetch<I: Into<String>, M: Into<String>>(identifier: I, message: M) -> Self {
        Self::Fetch {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new settings error
    pub fn settings<S: Into<String>>(message: S) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PoiMapError::MissingParameter { param } => {
                format!("You must provide a `{param}` search parameter, e.g. `?{param}=kyoto`.")
            }
            PoiMapError::InvalidParameter { param, value } => format!(
                "The `{param}` search parameter {value:?} is not a valid map name. \
                 Use letters, digits, `-` and `_` only."
            ),
            PoiMapError::MalformedQuery { message } => format!(
                "The page address could not be read ({message}). \
                 Open it as `?config=<name>` with each parameter given once."
            ),
            PoiMapError::NotFound { identifier } => {
                format!("There is no map called `{identifier}`.")
            }
            PoiMapError::Fetch { identifier, .. } => {
                format!("Unable to load the map `{identifier}`. Please try again later.")
            }
            PoiMapError::Parse { message } => {
                format!("The map document is not valid JSON of the expected shape: {message}")
            }
            PoiMapError::Validation { violations } => format!(
                "The map document has {} invalid field(s): {}",
                violations.len(),
                join_violations(violations)
            ),
            PoiMapError::MissingCredential { remediation, .. } => remediation.clone(),
            PoiMapError::Settings { .. } => {
                "Settings error. Please check your settings file and environment.".to_string()
            }
            PoiMapError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
