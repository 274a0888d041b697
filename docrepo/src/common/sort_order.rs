use crate::errors::{ErrorKind, RepoError, RepoResult};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Specifies the direction for sorting documents.
///
/// # Variants
/// - `Ascending`: Sort from smallest to largest value (A to Z, 0 to 9, oldest to newest)
/// - `Descending`: Sort from largest to smallest value (Z to A, 9 to 0, newest to oldest)
///
/// A direction can be parsed from the textual forms `"asc"`, `"ascending"`,
/// `"desc"`, `"descending"` (any case) and from the numeric forms `1` and `-1`:
/// ```text
/// let order: SortOrder = "desc".parse()?;
/// let order = SortOrder::try_from(-1)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SortOrder {
    /// Sort in ascending order (smallest to largest, A-Z, oldest to newest)
    Ascending,
    /// Sort in descending order (largest to smallest, Z-A, newest to oldest)
    Descending,
}

impl SortOrder {
    pub fn reverse(self) -> SortOrder {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Applies this direction to an ascending comparison result.
    #[inline]
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "asc"),
            SortOrder::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(SortOrder::Ascending),
            "desc" | "descending" | "-1" => Ok(SortOrder::Descending),
            other => {
                log::error!("Unknown sort direction {}", other);
                Err(RepoError::new(
                    &format!("Unknown sort direction '{}', expected asc or desc", other),
                    ErrorKind::InvalidArgument,
                ))
            }
        }
    }
}

impl TryFrom<i32> for SortOrder {
    type Error = RepoError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SortOrder::Ascending),
            -1 => Ok(SortOrder::Descending),
            other => {
                log::error!("Unknown numeric sort direction {}", other);
                Err(RepoError::new(
                    &format!("Unknown sort direction {}, expected 1 or -1", other),
                    ErrorKind::InvalidArgument,
                ))
            }
        }
    }
}

/// Ordering intent for a query: one field and the direction to sort it in.
///
/// `Sort` is generic over its direction payload so a repository can accept
/// its own direction type; the default payload is [`SortOrder`]. The field
/// is not checked against the entity here, the store decides what sorting on
/// an unknown field means.
///
/// ```text
/// let newest_first = Sort::descending("created_at");
/// let by_name = Sort::new("name", SortOrder::Ascending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Sort<O = SortOrder> {
    pub field: String,
    pub by: O,
}

impl<O> Sort<O> {
    pub fn new(field: &str, by: O) -> Self {
        Sort {
            field: field.to_string(),
            by,
        }
    }
}

impl Sort<SortOrder> {
    pub fn ascending(field: &str) -> Self {
        Sort::new(field, SortOrder::Ascending)
    }

    pub fn descending(field: &str) -> Self {
        Sort::new(field, SortOrder::Descending)
    }

    /// Parses a textual direction such as `"asc"` or `"-1"`.
    pub fn parse(field: &str, by: &str) -> RepoResult<Self> {
        Ok(Sort::new(field, by.parse()?))
    }
}

impl<O: Display> Display for Sort<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_parse_textual_directions() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert_eq!(" ascending ".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert_eq!("-1".parse::<SortOrder>().unwrap(), SortOrder::Descending);
    }

    #[test]
    fn test_parse_unknown_direction_fails() {
        let err = "sideways".parse::<SortOrder>().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_numeric_directions() {
        assert_eq!(SortOrder::try_from(1).unwrap(), SortOrder::Ascending);
        assert_eq!(SortOrder::try_from(-1).unwrap(), SortOrder::Descending);
        assert!(SortOrder::try_from(0).is_err());
    }

    #[test]
    fn test_apply_and_reverse() {
        assert_eq!(SortOrder::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Ascending.reverse(), SortOrder::Descending);
    }

    #[test]
    fn test_sort_constructors() {
        let sort = Sort::parse("name", "desc").unwrap();
        assert_eq!(sort, Sort::descending("name"));
        assert_eq!(sort.to_string(), "name desc");

        let custom: Sort<i8> = Sort::new("age", -1);
        assert_eq!(custom.by, -1);
    }
}
