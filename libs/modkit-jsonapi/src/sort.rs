//! `sort` resolution: public field names → `ORDER BY` columns.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{FieldMapping, QueryBuilder};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// `ascending` maps to [`SortDirection::Ascending`]; every other keyword,
    /// `descending` included, maps to [`SortDirection::Descending`].
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        if keyword == "ascending" {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }
}

/// Field → direction in `ORDER BY` order.
///
/// Re-inserting a field keeps its original position and takes the new direction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct SortSpec(IndexMap<String, SortDirection>);

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, direction: SortDirection) {
        self.0.insert(field.into(), direction);
    }

    pub fn with(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.push(field, direction);
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<SortDirection> {
        self.0.get(field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.0.iter().map(|(f, d)| (f.as_str(), *d))
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

impl<K: Into<String>> FromIterator<(K, SortDirection)> for SortSpec {
    fn from_iter<I: IntoIterator<Item = (K, SortDirection)>>(iter: I) -> Self {
        let mut spec = SortSpec::new();
        for (field, direction) in iter {
            spec.push(field, direction);
        }
        spec
    }
}

/// Rewrite aliased field names to their physical columns.
///
/// Aliases match whole field names only; unknown names pass through unchanged.
pub fn resolve_sort(spec: &SortSpec, mapping: &FieldMapping) -> SortSpec {
    spec.iter()
        .map(|(field, direction)| {
            let column = mapping.column_for(field);
            if column != field {
                trace!(field, column, "sort alias resolved");
            }
            (column.to_owned(), direction)
        })
        .collect()
}

/// Apply `spec` to `builder` as `ORDER BY` clauses. No-op for an empty spec.
pub fn apply_sort<B>(spec: &SortSpec, mapping: &FieldMapping, builder: &mut B)
where
    B: QueryBuilder + ?Sized,
{
    if spec.is_empty() {
        return;
    }

    let resolved = resolve_sort(spec, mapping);
    debug!(
        resource = %mapping.resource_type,
        clauses = resolved.len(),
        "applying sort"
    );
    for (column, direction) in resolved.iter() {
        builder.order_by(column, direction);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn user() -> FieldMapping {
        FieldMapping::new("User", "user", "users").alias("fullName", "full_name")
    }

    #[test]
    fn direction_keywords() {
        assert_eq!(SortDirection::from_keyword("ascending"), SortDirection::Ascending);
        assert_eq!(SortDirection::from_keyword("descending"), SortDirection::Descending);
        assert_eq!(SortDirection::from_keyword("ASC"), SortDirection::Descending);
    }

    #[test]
    fn aliases_resolve_and_plain_fields_pass_through() {
        let spec = SortSpec::new()
            .with("fullName", SortDirection::Ascending)
            .with("email", SortDirection::Descending);

        let resolved = resolve_sort(&spec, &user());
        let clauses: Vec<_> = resolved.iter().collect();
        assert_eq!(
            clauses,
            vec![
                ("full_name", SortDirection::Ascending),
                ("email", SortDirection::Descending)
            ]
        );
    }

    #[test]
    fn alias_is_not_replaced_inside_longer_names() {
        let spec = SortSpec::new().with("fullNameLength", SortDirection::Ascending);
        let resolved = resolve_sort(&spec, &user());
        assert_eq!(resolved.get("fullNameLength"), Some(SortDirection::Ascending));
    }

    #[test]
    fn alias_collision_keeps_first_position_and_last_direction() {
        let spec = SortSpec::new()
            .with("full_name", SortDirection::Ascending)
            .with("email", SortDirection::Ascending)
            .with("fullName", SortDirection::Descending);

        let resolved = resolve_sort(&spec, &user());
        let clauses: Vec<_> = resolved.iter().collect();
        assert_eq!(
            clauses,
            vec![
                ("full_name", SortDirection::Descending),
                ("email", SortDirection::Ascending)
            ]
        );
    }
}
