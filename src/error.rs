// Error types shared by the client, the import validator and the prompt
// parsers. Orchestrators wrap these in `anyhow` like the binary does.

use thiserror::Error;

/// Outcome of a request that did not produce a usable JSON document.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestFailure {
    /// The endpoint answered with something other than HTTP 200.
    #[error("request failed with status code {status}: {body}")]
    Status { status: u16, body: String },
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("transport error: {0}")]
    Transport(String),
    /// HTTP 200 but the body was not JSON.
    #[error("could not decode response body: {0}")]
    Decode(String),
}

/// Reason a CSV import row is rejected. Each variant names what the
/// operator has to fix in the input file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("missing value for required column 'Name'")]
    MissingName,
    #[error("unknown column header '{0}' - please correct")]
    UnknownColumn(String),
    #[error("unable to find unit '{0}'")]
    UnknownUnit(String),
    #[error("unknown authority '{0}'")]
    UnknownAuthority(String),
    #[error("unknown allergen '{allergen}' in column '{column}' for authority '{authority}'")]
    UnknownAllergen {
        column: String,
        allergen: String,
        authority: String,
    },
}

/// Rejected operator input from one of the interactive prompts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("invalid choice '{input}', please enter a number from 1 to {max}")]
    OutOfRange { input: String, max: usize },
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },
}
