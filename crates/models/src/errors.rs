use thiserror::Error;

/// Payload shape errors. The `Display` text is what clients see.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Field \"{0}\" must be a boolean.")]
    NotBoolean(&'static str),
    #[error("Field \"{0}\" must be a list of strings.")]
    NotStringList(&'static str),
    #[error("Field \"{0}\" must be a string.")]
    NotString(&'static str),
    #[error("Invalid JSON body.")]
    InvalidJson,
    #[error("Request body must be a JSON object.")]
    NotAnObject,
}
