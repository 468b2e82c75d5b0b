use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by store and engine operations.
///
/// Every operation is atomic: when it returns an error, the store is
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid event: {0}")]
    Validation(String),

    #[error("no event with id {0}")]
    NotFound(String),

    #[error("an event with id {0} already exists")]
    DuplicateId(String),

    #[error("invalid clock time {0:?}, expected HH:MM")]
    InvalidClock(String),
}
