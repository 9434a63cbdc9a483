use std::fmt;

#[derive(Debug)]
pub enum MatchError {
    InvalidTeamSize { expected: usize, found: usize },
    InvalidPosition(String),
    ValidationError(String),
    SerializationError(String),
    DeserializationError(String),
    UnsupportedSchemaVersion(u8),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchError::InvalidTeamSize { expected, found } => {
                write!(f, "Invalid team size: expected at most {}, found {}", expected, found)
            }
            MatchError::InvalidPosition(position) => {
                write!(f, "Invalid player position: {}", position)
            }
            MatchError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
            MatchError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            MatchError::DeserializationError(msg) => {
                write!(f, "Deserialization error: {}", msg)
            }
            MatchError::UnsupportedSchemaVersion(version) => {
                write!(f, "Unsupported schema version: {}", version)
            }
        }
    }
}

impl std::error::Error for MatchError {}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            MatchError::DeserializationError(err.to_string())
        } else {
            MatchError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
