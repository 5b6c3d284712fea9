use thiserror::Error;

/// Input rejected before any store effect
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Invalid document path {path:?}")]
    InvalidPath { path: String },
    #[error("Time slot must end after it starts: {start} >= {end}")]
    EmptySlot { start: i64, end: i64 },
    #[error("Timestamp out of range: {seconds} seconds")]
    OutOfRange { seconds: i64 },
    #[error("A proposal needs at least one time slot")]
    NoSlots,
}

/// A stored document that does not have the expected shape
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum DocumentError {
    #[error("Malformed document: {reason}")]
    Malformed { reason: String },
}

impl From<serde_json::Error> for DocumentError {
    fn from(error: serde_json::Error) -> Self {
        DocumentError::Malformed {
            reason: error.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum StoreError {
    #[error("Document not found: {path}")]
    NotFound { path: String },
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Failure of a user-facing flow (create a proposal, submit answers)
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DocumentError> for FlowError {
    fn from(error: DocumentError) -> Self {
        FlowError::Store(error.into())
    }
}
