use thiserror::Error;

/// Failures while reading an uploaded file into a table.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("input file not found: {0}")]
    NotFound(String),

    #[error("input file is empty or cannot be read")]
    EmptyOrUnparsable,

    #[error("error parsing input at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("io error reading input: {0}")]
    Io(#[from] std::io::Error),
}

impl DatasetError {
    /// Message safe to hand back to API clients (no filesystem paths).
    pub fn client_message(&self) -> String {
        match self {
            Self::NotFound(_) => "input file does not exist".to_string(),
            Self::EmptyOrUnparsable => self.to_string(),
            Self::Parse { .. } => format!("{self}. Check the file format."),
            Self::Io(_) => "input file could not be read".to_string(),
        }
    }
}
