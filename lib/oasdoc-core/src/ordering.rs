//! Ordering and grouping of the documented entities.

use std::cmp;
use std::collections::BTreeMap;

use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::Ordering;
use crate::error::ConvertError;
use crate::model::{ParameterEntry, PathOperation};

/// Canonical order of an entity kind, used by [`Ordering::Natural`].
pub trait NaturalOrder {
    /// Compares two entities.
    fn natural_cmp(&self, other: &Self) -> cmp::Ordering;
}

/// Lexicographic; response codes sort before `default`.
impl NaturalOrder for str {
    fn natural_cmp(&self, other: &Self) -> cmp::Ordering {
        self.cmp(other)
    }
}

/// By path, then by method priority `POST, GET, PUT, DELETE, PATCH, HEAD, OPTIONS`.
impl NaturalOrder for PathOperation {
    fn natural_cmp(&self, other: &Self) -> cmp::Ordering {
        self.path()
            .cmp(other.path())
            .then_with(|| self.method().cmp(&other.method()))
    }
}

/// By location priority `header, path, query, formData, body`, then by name.
impl NaturalOrder for ParameterEntry {
    fn natural_cmp(&self, other: &Self) -> cmp::Ordering {
        self.location()
            .cmp(&other.location())
            .then_with(|| self.name().cmp(other.name()))
    }
}

/// Sorts `items` by the key `key` extracts, with a stable sort.
///
/// ```rust
/// use oasdoc_core::{Ordering, sort_by_ordering};
///
/// let mut codes = vec!["default", "404", "200"];
/// sort_by_ordering(&mut codes, &Ordering::Natural, |code| *code);
/// assert_eq!(codes, ["200", "404", "default"]);
///
/// sort_by_ordering(&mut codes, &Ordering::custom(|a: &str, b: &str| b.cmp(a)), |code| *code);
/// assert_eq!(codes, ["default", "404", "200"]);
/// ```
pub fn sort_by_ordering<E, K>(items: &mut [E], ordering: &Ordering<K>, key: impl Fn(&E) -> &K)
where
    K: NaturalOrder + ?Sized,
{
    match ordering {
        Ordering::AsIs => {}
        Ordering::Natural => items.sort_by(|left, right| key(left).natural_cmp(key(right))),
        Ordering::Custom(comparator) => {
            items.sort_by(|left, right| comparator.compare(key(left), key(right)));
        }
    }
}

/// Groups operations by tag.
///
/// An operation appears in the bucket of each of its tags. Buckets follow `tag_ordering`,
/// operations in a bucket follow `operation_ordering`.
///
/// # Errors
///
/// Returns a [`ConvertError::Configuration`] on the `pathsGroupedBy` key when an operation has
/// no tag.
pub fn group_by_tags(
    operations: Vec<PathOperation>,
    tag_ordering: &Ordering<str>,
    operation_ordering: &Ordering<PathOperation>,
) -> Result<IndexMap<String, Vec<PathOperation>>, ConvertError> {
    let mut groups: IndexMap<String, Vec<PathOperation>> = IndexMap::new();
    for operation in operations {
        let Some((last, others)) = operation.tags().split_last() else {
            return Err(ConvertError::configuration(
                "pathsGroupedBy",
                format!("operation '{operation}' has no tag, it cannot be grouped by tags"),
            ));
        };
        for tag in others {
            groups
                .entry(tag.clone())
                .or_default()
                .push(operation.clone());
        }
        let last = last.clone();
        groups.entry(last).or_default().push(operation);
    }

    let mut groups = groups.into_iter().collect::<Vec<_>>();
    sort_by_ordering(&mut groups, tag_ordering, |(tag, _)| tag.as_str());
    for (tag, operations) in &mut groups {
        sort_by_ordering(operations, operation_ordering, |operation| operation);
        debug!(tag = %tag, operations = operations.len(), "tag group");
    }

    Ok(groups.into_iter().collect())
}

/// Groups operations by the first capture of `pattern` on their path.
///
/// Buckets are sorted by key, operations in a bucket follow `operation_ordering`. Operations
/// whose path does not match are left out.
///
/// # Errors
///
/// Returns a [`ConvertError::Configuration`] on the `headerPattern` key when no pattern is
/// configured.
pub fn group_by_regex(
    operations: Vec<PathOperation>,
    pattern: Option<&Regex>,
    operation_ordering: &Ordering<PathOperation>,
) -> Result<BTreeMap<String, Vec<PathOperation>>, ConvertError> {
    let pattern = pattern.ok_or_else(|| {
        ConvertError::configuration("headerPattern", "grouping by regex requires a header pattern")
    })?;

    let mut groups: BTreeMap<String, Vec<PathOperation>> = BTreeMap::new();
    for operation in operations {
        let header = pattern
            .captures(operation.path())
            .and_then(|captures| captures.get(1))
            .map(|header| header.as_str().to_string());
        match header {
            Some(header) => groups.entry(header).or_default().push(operation),
            None => warn!(
                %operation,
                pattern = pattern.as_str(),
                "operation path does not match the header pattern, skipped"
            ),
        }
    }

    for operations in groups.values_mut() {
        sort_by_ordering(operations, operation_ordering, |operation| operation);
    }
    Ok(groups)
}
