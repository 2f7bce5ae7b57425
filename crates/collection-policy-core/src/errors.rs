use thiserror::Error;

/// Result type alias using PolicyError
pub type Result<T> = std::result::Result<T, PolicyError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (CLI, services
/// embedding the core) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    Parse,
    SchemaValidation,

    // Integration/IO
    Serialization,
    Config,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::SchemaValidation => "ERR_SCHEMA_VALIDATION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Classification plus optional context, built up with the `with_*`
/// methods.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    path: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (a pid, a file name)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add document path context (e.g. `/collection_policy/content_models`)
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for collection-policy operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// Input is not well-formed XML
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Parsed document does not conform to the collection-policy schema
    #[error("Schema validation failed at {path}: {message}")]
    Validation { path: String, message: String },

    /// Writing the document back to text failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File could not be read
    #[error("IO error: {message}")]
    Io { message: String },
}

impl PolicyError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        PolicyError::Parse {
            message: message.into(),
        }
    }

    pub(crate) fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        PolicyError::Validation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for the two construction failures (`Parse`, `Validation`)
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PolicyError::Parse { .. } | PolicyError::Validation { .. }
        )
    }
}

impl From<quick_xml::Error> for PolicyError {
    fn from(err: quick_xml::Error) -> Self {
        PolicyError::parse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for PolicyError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        PolicyError::parse(err.to_string())
    }
}

/// Conversion from PolicyError to ExError
///
/// Validation errors come from both loading and `validate()`, so their
/// `op` is left for the call site to set.
impl From<PolicyError> for ExError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Parse { message } => ExError::new(ExErrorKind::Parse)
                .with_op("from_xml")
                .with_message(message),

            PolicyError::Validation { path, message } => {
                ExError::new(ExErrorKind::SchemaValidation)
                    .with_path(path)
                    .with_message(message)
            }

            PolicyError::Serialization { message } => ExError::new(ExErrorKind::Serialization)
                .with_op("to_xml")
                .with_message(message),

            PolicyError::Config { message } => ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_message(message),

            PolicyError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::SchemaValidation)
            .with_op("from_xml")
            .with_path("/collection_policy")
            .with_message("missing attribute 'name'");

        let text = err.to_string();
        assert!(text.starts_with("[ERR_SCHEMA_VALIDATION]"));
        assert!(text.contains("from_xml"));
        assert!(text.contains("/collection_policy"));
        assert!(text.contains("missing attribute 'name'"));
    }

    #[test]
    fn test_is_rejection() {
        assert!(PolicyError::parse("bad").is_rejection());
        assert!(PolicyError::validation("/", "bad").is_rejection());
        assert!(!PolicyError::Io {
            message: "gone".to_string()
        }
        .is_rejection());
    }
}
