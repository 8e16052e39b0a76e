use thiserror::Error;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on when
/// translating failures into responses (for example a 400 for a bad path
/// versus a 500 for a persistence failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Path / input
    InvalidInput,
    MalformedPath,
    EmptySegment,
    InvalidOperator,

    // Schema resolution
    UnknownEntity,
    UnknownRelationship,
    UnknownAttribute,
    SchemaInvalid,

    // Integration/IO
    Io,
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::MalformedPath => "ERR_MALFORMED_PATH",
            ExErrorKind::EmptySegment => "ERR_EMPTY_SEGMENT",
            ExErrorKind::InvalidOperator => "ERR_INVALID_OPERATOR",
            ExErrorKind::UnknownEntity => "ERR_UNKNOWN_ENTITY",
            ExErrorKind::UnknownRelationship => "ERR_UNKNOWN_RELATIONSHIP",
            ExErrorKind::UnknownAttribute => "ERR_UNKNOWN_ATTRIBUTE",
            ExErrorKind::SchemaInvalid => "ERR_SCHEMA_INVALID",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context
/// needed to debug a failed composition: which operation, which entity and
/// which attribute path.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    path: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add attribute path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Get the attribute path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
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
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Errors raised while composing a query from attribute paths
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScopeError {
    /// A path segment names a relationship the entity does not declare
    #[error("Unknown relationship '{relation}' on entity {entity}")]
    UnknownRelationship { entity: String, relation: String },

    /// An attribute is not among the entity's declared columns
    #[error("Unknown attribute '{attribute}' on entity {entity}")]
    UnknownAttribute { entity: String, attribute: String },

    /// The entity name is not part of the schema
    #[error("Unknown entity: {entity}")]
    UnknownEntity { entity: String },

    /// A relational projection path needs at least `relation.attribute`
    #[error("Malformed path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    /// A path is empty or contains an empty segment (`a..b`, `a.`, `.a`)
    #[error("Path '{path}' contains an empty segment")]
    EmptySegment { path: String },

    /// Comparison operator token not recognised
    #[error("Invalid comparison operator: '{operator}'")]
    InvalidOperator { operator: String },
}

/// Conversion from ScopeError to ExError
impl From<ScopeError> for ExError {
    fn from(err: ScopeError) -> Self {
        let message = err.to_string();
        match err {
            ScopeError::UnknownRelationship { entity, relation } => {
                ExError::new(ExErrorKind::UnknownRelationship)
                    .with_entity(entity)
                    .with_path(relation)
                    .with_message(message)
            }

            ScopeError::UnknownAttribute { entity, attribute } => {
                ExError::new(ExErrorKind::UnknownAttribute)
                    .with_entity(entity)
                    .with_path(attribute)
                    .with_message(message)
            }

            ScopeError::UnknownEntity { entity } => ExError::new(ExErrorKind::UnknownEntity)
                .with_entity(entity)
                .with_message(message),

            ScopeError::MalformedPath { path, .. } => ExError::new(ExErrorKind::MalformedPath)
                .with_path(path)
                .with_message(message),

            ScopeError::EmptySegment { path } => ExError::new(ExErrorKind::EmptySegment)
                .with_path(path)
                .with_message(message),

            ScopeError::InvalidOperator { .. } => {
                ExError::new(ExErrorKind::InvalidOperator).with_message(message)
            }
        }
    }
}
