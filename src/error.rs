use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Carries only the parse reason; callers add the file name when they
    /// print it.
    #[error("unreadable as UTF-8 or Latin-1 CSV: {0}")]
    Unreadable(String),

    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;
