use thiserror::Error;

/// Errors raised while decoding a stored attribute map into a [`super::Todo`].
///
/// These indicate corrupted or legacy-shaped items; data written by this
/// crate's own encoder never produces them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Missing required field: {0}")]
    FieldMissing(&'static str),
    #[error("Field {0} has an unexpected attribute type")]
    TypeMismatch(&'static str),
    #[error("Field {field} is not a valid timestamp: {cause}")]
    DateParse { field: &'static str, cause: String },
    #[error("Field {field} is not a valid UUID: {cause}")]
    InvalidUuid { field: &'static str, cause: String },
}

impl DecodeError {
    /// Name of the attribute that failed to decode.
    pub fn field(&self) -> &'static str {
        match self {
            DecodeError::FieldMissing(field) | DecodeError::TypeMismatch(field) => field,
            DecodeError::DateParse { field, .. } | DecodeError::InvalidUuid { field, .. } => field,
        }
    }
}
