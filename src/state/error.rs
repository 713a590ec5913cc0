use thiserror::Error;

/// Errors raised when reading typed fields out of a dynamic state map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The requested field is absent.
    #[error("field `{0}` is not present in the state")]
    MissingField(String),

    /// A value did not hold the requested type.
    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A named field did not hold the requested type.
    #[error("field `{field}` holds {found}, expected a {expected} value")]
    InvalidField {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl StateError {
    /// Attach a field name to a type mismatch.
    pub(crate) fn in_field(self, field: &str) -> Self {
        match self {
            StateError::TypeMismatch { expected, found } => StateError::InvalidField {
                field: field.to_string(),
                expected,
                found,
            },
            other => other,
        }
    }
}
