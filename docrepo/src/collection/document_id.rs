use crate::common::{GENERATED_ID_WIDTH, MAX_ID_LENGTH};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::ID_GENERATOR;
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// The identity of a stored document.
///
/// Every document held by a store carries a `DocumentId` under the reserved
/// `_id` field. The store assigns one on insertion when the document does
/// not bring its own.
///
/// # Format
///
/// An identity is an opaque, non-empty string of at most 128 bytes without
/// whitespace or control characters. Generated identities are snowflake
/// numbers zero-padded to 19 digits, so ordering identities as strings
/// orders them by creation time.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::collection::DocumentId;
///
/// let generated = DocumentId::new();
/// let parsed = DocumentId::parse("user-42")?;
/// assert!(DocumentId::parse("").is_err());
/// ```
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DocumentId {
    id_value: String,
}

impl DocumentId {
    /// Generates a new unique `DocumentId`.
    pub fn new() -> Self {
        let id_value = ID_GENERATOR.get_id();
        DocumentId {
            id_value: format!("{:0width$}", id_value, width = GENERATED_ID_WIDTH),
        }
    }

    /// Validates and wraps a caller supplied identity.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`] when the value is empty, longer
    /// than 128 bytes, or contains whitespace or control characters.
    pub fn parse(id_value: &str) -> RepoResult<DocumentId> {
        DocumentId::validate(id_value)?;
        Ok(DocumentId {
            id_value: id_value.to_string(),
        })
    }

    /// Gets the string form of this identity.
    pub fn as_str(&self) -> &str {
        &self.id_value
    }

    fn validate(id_value: &str) -> RepoResult<()> {
        if id_value.is_empty() {
            log::error!("Document id cannot be empty");
            return Err(RepoError::new(
                "Document id validation error: id cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }

        if id_value.len() > MAX_ID_LENGTH {
            log::error!("Document id is too long: {} bytes", id_value.len());
            return Err(RepoError::new(
                &format!(
                    "Document id validation error: id must be at most {} bytes",
                    MAX_ID_LENGTH
                ),
                ErrorKind::InvalidArgument,
            ));
        }

        if id_value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            log::error!("Document id {:?} contains whitespace or control characters", id_value);
            return Err(RepoError::new(
                "Document id validation error: id cannot contain whitespace or control characters",
                ErrorKind::InvalidArgument,
            ));
        }

        Ok(())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        DocumentId::new()
    }
}

impl Debug for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentId({})", self.id_value)
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id_value)
    }
}

impl FromStr for DocumentId {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentId::parse(s)
    }
}

impl TryFrom<&str> for DocumentId {
    type Error = RepoError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        DocumentId::parse(value)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = RepoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DocumentId::validate(&value)?;
        Ok(DocumentId { id_value: value })
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.id_value
    }
}
