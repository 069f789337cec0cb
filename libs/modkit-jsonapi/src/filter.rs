//! Normalization of `filter[...]` parameters.
//!
//! Raw keys are either bare field names (`name`) or qualified with a
//! resource (`comments.body`). Normalization groups them per qualifier:
//!
//! ```text
//! {"name": "Bob", "comments.body": "hi"}   (current resource: User)
//!   → {"user": {"name": "Bob"}, "comments": {"body": "hi"}}
//! ```
//!
//! Field existence is not checked here.

use indexmap::IndexMap;

use crate::{Error, FilterValue};

/// Separates the resource qualifier from the field name in a filter key.
pub const QUALIFIER_SEPARATOR: char = '.';

/// Default qualifier for unqualified filters on `resource_type`.
#[must_use]
pub fn resource_identity(resource_type: &str) -> String {
    resource_type.to_lowercase()
}

/// Raw filters in request order.
///
/// Duplicate keys are kept; normalization resolves them last-write-wins.
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct FilterRequest(Vec<(String, FilterValue)>);

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for FilterRequest {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Filters grouped by qualifier, then by unqualified field name.
///
/// Qualifiers appear in the order they were first seen.
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct NormalizedFilters(IndexMap<String, IndexMap<String, FilterValue>>);

impl NormalizedFilters {
    /// Set `field = value` under `qualifier`, replacing an earlier value.
    pub fn insert(
        &mut self,
        qualifier: impl Into<String>,
        field: impl Into<String>,
        value: FilterValue,
    ) {
        self.0
            .entry(qualifier.into())
            .or_default()
            .insert(field.into(), value);
    }

    #[must_use]
    pub fn get(&self, qualifier: &str) -> Option<&IndexMap<String, FilterValue>> {
        self.0.get(qualifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexMap<String, FilterValue>)> {
        self.0.iter().map(|(q, f)| (q.as_str(), f))
    }

    #[must_use]
    pub fn qualifiers(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct qualifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Group raw filters by resource qualifier.
///
/// Only the first [`QUALIFIER_SEPARATOR`] splits a key, so `a.b.c` targets
/// field `b.c` of resource `a`. Unqualified keys go to
/// [`resource_identity`] of `current_resource_type`.
///
/// # Errors
/// Returns `Error::InvalidFilterKey` when a key yields an empty qualifier or field name.
pub fn normalize_filters(
    request: &FilterRequest,
    current_resource_type: &str,
) -> Result<NormalizedFilters, Error> {
    let current = resource_identity(current_resource_type);
    let mut filters = NormalizedFilters::default();

    for (key, value) in request.iter() {
        let (qualifier, field) = key
            .split_once(QUALIFIER_SEPARATOR)
            .unwrap_or((current.as_str(), key));

        if qualifier.is_empty() || field.is_empty() {
            return Err(Error::InvalidFilterKey(key.to_owned()));
        }

        filters.insert(qualifier, field, value.clone());
    }

    Ok(filters)
}
