use std::fmt;
use std::io;

#[derive(Debug)]
pub enum CneError {
    /// A row that can't be parsed (wrong column count, non-numeric coordinate, start > end)
    MalformedInputRow {
        /// Input file the row came from
        file: String,
        /// The line number (1-based)
        line: usize,
        /// A human-readable message explaining the error
        message: String,
    },
    /// A pairwise file name not following `{ref}_vs_{query}.out`
    MalformedFileName(String),
    /// A call references a species absent from the canonical set
    UnknownSpeciesReference(String),
    /// Interval end lies past the last scaffold
    OutOfRange { id: String, end: u64, total: u64 },
    /// Interval start and end fall into different scaffolds
    StraddlingInterval {
        id: String,
        start: u64,
        end: u64,
        scaffold: String,
    },
    /// Two comparisons that don't share exactly one species
    SpeciesMismatch(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl CneError {
    pub fn malformed(file: &str, line: usize, message: impl Into<String>) -> Self {
        CneError::MalformedInputRow {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for CneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CneError::MalformedInputRow {
                file,
                line,
                message,
            } => write!(f, "Malformed row in {} at line {}: {}", file, line, message),
            CneError::MalformedFileName(name) => write!(
                f,
                "Can't recover species from file name {}, expected {{ref}}_vs_{{query}}.out",
                name
            ),
            CneError::UnknownSpeciesReference(species) => {
                write!(f, "Species {} is absent from the canonical set", species)
            }
            CneError::OutOfRange { id, end, total } => write!(
                f,
                "{}: end {} exceeds the total sequence length {}",
                id, end, total
            ),
            CneError::StraddlingInterval {
                id,
                start,
                end,
                scaffold,
            } => write!(
                f,
                "{}: interval {}-{} straddles the start of scaffold {}",
                id, start, end, scaffold
            ),
            CneError::SpeciesMismatch(msg) => write!(f, "Species mismatch: {}", msg),
            CneError::Io(err) => write!(f, "I/O error: {}", err),
            CneError::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for CneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CneError::Io(err) => Some(err),
            CneError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CneError {
    fn from(err: io::Error) -> Self {
        CneError::Io(err)
    }
}

impl From<serde_json::Error> for CneError {
    fn from(err: serde_json::Error) -> Self {
        CneError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, CneError>;
