//! Sparse fieldset projection.

use indexmap::IndexMap;
use tracing::debug;

use crate::MappingRegistry;

/// Projection used when no resource asked for a sparse fieldset.
pub const ALL_COLUMNS: &str = "*";

/// Resource alias → requested public field names, in request order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct FieldSet(IndexMap<String, Vec<String>>);

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, resource_alias: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.insert(
            resource_alias.into(),
            fields.into_iter().map(Into::into).collect(),
        );
    }

    pub fn with<I, S>(mut self, resource_alias: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(resource_alias, fields);
        self
    }

    #[must_use]
    pub fn get(&self, resource_alias: &str) -> Option<&[String]> {
        self.0.get(resource_alias).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Columns to select for a sparse fieldset request.
///
/// Every mapping whose alias has a non-empty entry in `fields` contributes
/// its requested columns as `table.column`, followed by its primary key
/// (added once, even when not requested). Mappings are visited in registry
/// order. Without any such entry the result is `["*"]`.
#[must_use]
pub fn project_columns<R>(fields: &FieldSet, registry: &R) -> Vec<String>
where
    R: MappingRegistry + ?Sized,
{
    let mut columns = Vec::new();

    for mapping in registry.all_mappings() {
        let Some(requested) = fields
            .get(&mapping.resource_alias)
            .filter(|f| !f.is_empty())
        else {
            continue;
        };

        let start = columns.len();
        for field in requested {
            columns.push(mapping.qualified(mapping.column_for(field)));
        }

        let primary_key = mapping.qualified_primary_key();
        if !columns[start..].contains(&primary_key) {
            columns.push(primary_key);
        }
    }

    if columns.is_empty() {
        return vec![ALL_COLUMNS.to_owned()];
    }

    debug!(count = columns.len(), "projected sparse fieldset");
    columns
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{FieldMapping, Mappings};

    fn registry() -> Mappings {
        Mappings::new(vec![
            FieldMapping::new("User", "user", "users").alias("fullName", "full_name"),
            FieldMapping::new("Comment", "comments", "comments").primary_key("comment_id"),
        ])
        .unwrap()
    }

    #[test]
    fn requested_fields_are_qualified_and_primary_key_appended() {
        let fields = FieldSet::new().with("user", ["name"]);
        assert_eq!(
            project_columns(&fields, &registry()),
            vec!["users.name", "users.id"]
        );
    }

    #[test]
    fn aliases_resolve_to_columns() {
        let fields = FieldSet::new().with("user", ["fullName", "email"]);
        assert_eq!(
            project_columns(&fields, &registry()),
            vec!["users.full_name", "users.email", "users.id"]
        );
    }

    #[test]
    fn explicit_primary_key_is_not_duplicated() {
        let fields = FieldSet::new().with("user", ["id", "name"]);
        assert_eq!(
            project_columns(&fields, &registry()),
            vec!["users.id", "users.name"]
        );
    }

    #[test]
    fn every_requested_resource_contributes_in_registry_order() {
        let fields = FieldSet::new()
            .with("comments", ["body"])
            .with("user", ["name"]);
        assert_eq!(
            project_columns(&fields, &registry()),
            vec!["users.name", "users.id", "comments.body", "comments.comment_id"]
        );
    }

    #[test]
    fn falls_back_to_all_columns() {
        let reg = registry();
        assert_eq!(project_columns(&FieldSet::new(), &reg), vec!["*"]);

        let empty_entry = FieldSet::new().with("user", Vec::<String>::new());
        assert_eq!(project_columns(&empty_entry, &reg), vec!["*"]);

        let unknown = FieldSet::new().with("posts", ["title"]);
        assert_eq!(project_columns(&unknown, &reg), vec!["*"]);
    }
}
