use std::fmt;

/// Lookup failures raised when driving fields by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// No registered field carries this identifier.
    UnknownField(String),
    /// No element carries this `id` attribute.
    UnknownElement(String),
    /// The element exists but cannot hold the requested input state.
    NotAnInput(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::UnknownField(identifier) => {
                write!(f, "no vanishing field registered as '{identifier}'")
            }
            FieldError::UnknownElement(id) => write!(f, "no element with id '{id}'"),
            FieldError::NotAnInput(id) => write!(f, "element '{id}' is not a matching input"),
        }
    }
}

impl std::error::Error for FieldError {}
