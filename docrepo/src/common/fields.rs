use crate::common::SortOrder;
use crate::errors::{ErrorKind, RepoError, RepoResult};
use std::fmt::{Display, Formatter};

/// An ordered list of `(field, direction)` pairs used to sort query results.
///
/// The first pair is the primary sort key; later pairs break ties.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortableFields {
    sorting_order: Vec<(String, SortOrder)>,
}

impl SortableFields {
    pub fn new() -> SortableFields {
        SortableFields {
            sorting_order: Vec::new(),
        }
    }

    pub fn with_names_and_order(sorting_order: Vec<(String, SortOrder)>) -> RepoResult<SortableFields> {
        if sorting_order.is_empty() {
            log::error!("Field names cannot be empty");
            return Err(RepoError::new(
                "Field names cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }

        Ok(SortableFields { sorting_order })
    }

    #[inline]
    pub fn add_sorted_field(mut self, field_name: String, sort_order: SortOrder) -> SortableFields {
        self.sorting_order.push((field_name, sort_order));
        self
    }

    #[inline]
    pub fn sorting_order(&self) -> &[(String, SortOrder)] {
        &self.sorting_order
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.sorting_order.iter().any(|(name, _)| name == field_name)
    }

    pub fn is_empty(&self) -> bool {
        self.sorting_order.is_empty()
    }
}

impl Display for SortableFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .sorting_order
            .iter()
            .map(|(name, order)| format!("{} {}", name, order))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
