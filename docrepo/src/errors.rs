use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::{atomic, Atomic};

/// Error kinds for repository and store operations.
///
/// Each kind names a category of failure so callers can branch on the cause
/// without parsing messages. Argument errors are raised by the repository
/// itself; every other kind normally originates in the document store and
/// reaches the caller unchanged.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::errors::{RepoError, ErrorKind, RepoResult};
///
/// fn example() -> RepoResult<()> {
///     Err(RepoError::new("items per page must be positive", ErrorKind::InvalidArgument))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The caller supplied missing, conflicting or malformed input
    InvalidArgument,
    /// Error during filter evaluation or construction
    FilterError,
    /// An update operation could not be applied to a document
    UpdateError,
    /// Error mapping an item to or from a document
    ObjectMappingError,
    /// A document with the same identity already exists
    UniqueConstraintViolation,
    /// Generic failure reported by the document store
    StoreFailure,
    /// The document store has been closed
    StoreClosed,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "Invalid argument"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::UpdateError => write!(f, "Update error"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::UniqueConstraintViolation => write!(f, "Unique constraint violation"),
            ErrorKind::StoreFailure => write!(f, "Store failure"),
            ErrorKind::StoreClosed => write!(f, "Store closed"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type shared by the repository and the document store.
///
/// `RepoError` carries a message, a kind and an optional cause. A backtrace
/// is captured at construction and printed by the `Debug` implementation.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::errors::{RepoError, ErrorKind};
///
/// let err = RepoError::new("store is closed", ErrorKind::StoreClosed);
///
/// let cause = RepoError::new("disk unavailable", ErrorKind::StoreFailure);
/// let err = RepoError::new_with_cause("insert failed", ErrorKind::StoreFailure, cause);
/// ```
#[derive(Clone)]
pub struct RepoError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<RepoError>>,
    backtrace: Atomic<Backtrace>,
}

impl RepoError {
    /// Creates a new `RepoError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        RepoError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `RepoError` that wraps the error that caused it.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    /// * `cause` - The underlying error
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: RepoError) -> Self {
        RepoError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&RepoError> {
        self.cause.as_deref()
    }

    /// Returns `true` when the error was raised because of caller input.
    pub fn is_argument_error(&self) -> bool {
        self.error_kind == ErrorKind::InvalidArgument
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for repository and store operations.
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(feature = "serde")]
impl serde::de::Error for RepoError {
    fn custom<T: Display>(msg: T) -> Self {
        RepoError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for RepoError {
    fn custom<T: Display>(msg: T) -> Self {
        RepoError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

impl From<std::num::ParseIntError> for RepoError {
    fn from(err: std::num::ParseIntError) -> Self {
        RepoError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidArgument,
        )
    }
}

impl From<String> for RepoError {
    fn from(msg: String) -> Self {
        RepoError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for RepoError {
    fn from(msg: &str) -> Self {
        RepoError::new(msg, ErrorKind::InternalError)
    }
}
