use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// GDAL style header fields were seen but not all of them.
    #[error("incomplete grid header, missing: {}", .missing.join(", "))]
    IncompleteHeader { missing: Vec<&'static str> },

    #[error("no valid grid command found")]
    NoGridCommand,

    /// A token that passed classification did not parse as a number.
    #[error("line {line}: malformed number '{token}'")]
    MalformedNumber { line: usize, token: String },
}

pub type Result<T> = std::result::Result<T, Error>;
