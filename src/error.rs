use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TesseraError {
    #[error("Invalid source: {0}")]
    InvalidSource(String),
    #[error("Position {position} is out of range for source of length {length}")]
    OutOfRange { position: i64, length: usize },
    #[error("Unexpected end of input after {length} characters")]
    UnexpectedEndOfInput { length: usize },
    #[error("Unexpected character at index {column} on line {line}: {found}")]
    UnexpectedCharacter { found: char, line: usize, column: usize },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Execution error: {0}")]
    Execution(String),
}

pub type Result<T> = std::result::Result<T, TesseraError>;

// Helper conversions
impl From<config::ConfigError> for TesseraError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
