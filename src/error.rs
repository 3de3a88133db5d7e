use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("{0} is not set")]
    MissingConfig(&'static str),
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("Invalid token")]
    InvalidToken,
    #[error("Error: {0}")]
    TokenCheck(StatusCode),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Commit timestamp {value:?} does not match YYYY-MM-DDTHH:MM:SSZ")]
    Timestamp { value: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// The token was refused or could not be checked.
    pub fn is_auth(&self) -> bool {
        matches!(self, ReportError::InvalidToken | ReportError::TokenCheck(_))
    }
}
