use crate::common::{SortOrder, SortableFields};
use std::fmt::{Display, Formatter};

/// Ordering and windowing options for a store `find`.
///
/// `skip` and `limit` apply after sorting. Options are built either through
/// the free functions [`order_by`], [`skip_by`] and [`limit_to`] or by
/// chaining the builder methods:
///
/// ```text
/// let options = order_by("age", SortOrder::Descending).skip(20).limit(10);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub(crate) sort_by: Option<SortableFields>,
    pub(crate) skip: Option<u64>,
    pub(crate) limit: Option<u64>,
}

pub fn order_by(field_name: &str, sort_order: SortOrder) -> FindOptions {
    FindOptions::new().sort_by(field_name.to_string(), sort_order)
}

pub fn skip_by(skip: u64) -> FindOptions {
    FindOptions::new().skip(skip)
}

pub fn limit_to(limit: u64) -> FindOptions {
    FindOptions::new().limit(limit)
}

impl FindOptions {
    pub fn new() -> FindOptions {
        FindOptions {
            sort_by: None,
            skip: None,
            limit: None,
        }
    }

    pub fn skip(mut self, skip: u64) -> FindOptions {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u64) -> FindOptions {
        self.limit = Some(limit);
        self
    }

    /// Appends a sort key. Keys apply in the order they were added.
    pub fn sort_by(mut self, field_name: String, sort_order: SortOrder) -> FindOptions {
        let fields = self.sort_by.unwrap_or_default();
        self.sort_by = Some(fields.add_sorted_field(field_name, sort_order));
        self
    }

    /// Replaces all sort keys.
    pub fn sort_by_fields(mut self, fields: SortableFields) -> FindOptions {
        self.sort_by = if fields.is_empty() { None } else { Some(fields) };
        self
    }

    pub fn sorting(&self) -> Option<&SortableFields> {
        self.sort_by.as_ref()
    }

    pub fn skip_count(&self) -> Option<u64> {
        self.skip
    }

    pub fn limit_count(&self) -> Option<u64> {
        self.limit
    }
}

impl Display for FindOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.sort_by {
            Some(fields) => write!(f, "sort: {}", fields)?,
            None => write!(f, "sort: none")?,
        }
        if let Some(skip) = self.skip {
            write!(f, ", skip: {}", skip)?;
        }
        if let Some(limit) = self.limit {
            write!(f, ", limit: {}", limit)?;
        }
        Ok(())
    }
}
