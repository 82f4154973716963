use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// Neither the domain-specific probes nor the generic heuristic found a
    /// usable main-content region. Not retryable with the same input.
    #[error("no readable content in document")]
    NoReadableContent,
}
