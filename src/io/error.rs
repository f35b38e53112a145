use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error in XYZ stream: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("cannot access '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse XYZ input: {details} (line {line_number})")]
    Parse { line_number: usize, details: String },

    #[error("unknown element symbol '{symbol}' (line {line_number})")]
    UnknownElement { symbol: String, line_number: usize },

    #[error("XYZ header declares {declared} atoms but only {found} were found")]
    AtomCountMismatch { declared: usize, found: usize },
}

impl Error {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    pub fn parse(line_number: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            line_number,
            details: details.into(),
        }
    }

    pub fn unknown_element(symbol: impl Into<String>, line_number: usize) -> Self {
        Self::UnknownElement {
            symbol: symbol.into(),
            line_number,
        }
    }
}
