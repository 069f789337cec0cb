//! Resource → table mappings.
//!
//! A [`FieldMapping`] describes how one JSON:API resource type is stored:
//! its table, primary key, which public field names are aliases of
//! differently named columns, and how related resources join back to it.
//! Mappings are built once and read-only afterwards; translators only ever
//! borrow them through [`MappingRegistry`].

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Error;

fn default_primary_key() -> String {
    "id".to_owned()
}

/// Join keys between a resource and one of its related resources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct Relation {
    /// Column on the related table that points at the parent row.
    pub foreign_key: String,
    /// Column on the parent table referenced by `foreign_key`.
    /// Defaults to the parent's primary key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_key: Option<String>,
}

impl Relation {
    pub fn new(foreign_key: impl Into<String>) -> Self {
        Self {
            foreign_key: foreign_key.into(),
            local_key: None,
        }
    }

    pub fn local_key(mut self, local_key: impl Into<String>) -> Self {
        self.local_key = Some(local_key.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct FieldMapping {
    /// Internal type identity, e.g. `User`.
    pub resource_type: String,
    /// Public resource name used by `fields[...]`, e.g. `user`.
    pub resource_alias: String,
    pub table_name: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    /// Public field name → physical column name. Used for lookups only;
    /// mappings loaded through [`JsonApiConfig`](crate::JsonApiConfig) come
    /// back sorted by key.
    #[serde(default)]
    pub aliased_properties: IndexMap<String, String>,
    /// Filter qualifier of a related resource → join keys.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub relations: IndexMap<String, Relation>,
}

impl FieldMapping {
    pub fn new(
        resource_type: impl Into<String>,
        resource_alias: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_alias: resource_alias.into(),
            table_name: table_name.into(),
            primary_key: default_primary_key(),
            aliased_properties: IndexMap::new(),
            relations: IndexMap::new(),
        }
    }

    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Expose `column` under the public name `public_name`.
    pub fn alias(mut self, public_name: impl Into<String>, column: impl Into<String>) -> Self {
        self.aliased_properties
            .insert(public_name.into(), column.into());
        self
    }

    pub fn relation(mut self, qualifier: impl Into<String>, relation: Relation) -> Self {
        self.relations.insert(qualifier.into(), relation);
        self
    }

    /// Lower-cased resource type, the default filter qualifier.
    #[must_use]
    pub fn identity(&self) -> String {
        self.resource_type.to_lowercase()
    }

    /// Physical column for a public field name.
    ///
    /// Names without an alias pass through unchanged.
    #[must_use]
    pub fn column_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.aliased_properties
            .get(field)
            .map_or(field, String::as_str)
    }

    /// `table.column` for a physical column of this resource.
    #[must_use]
    pub fn qualified(&self, column: &str) -> String {
        format!("{}.{}", self.table_name, column)
    }

    #[must_use]
    pub fn qualified_primary_key(&self) -> String {
        self.qualified(&self.primary_key)
    }

    /// Join keys towards the resource reached through `qualifier`.
    #[must_use]
    pub fn relation_for(&self, qualifier: &str) -> Option<&Relation> {
        self.relations.get(qualifier)
    }
}

/// Read-only access to the mappings of every exposed resource.
pub trait MappingRegistry {
    /// Mapping for an internal resource type (case-insensitive).
    fn mapping_for_resource_type(&self, resource_type: &str) -> Option<&FieldMapping>;

    /// All mappings in registration order.
    fn all_mappings(&self) -> &[FieldMapping];

    /// Mapping designated by a filter qualifier.
    ///
    /// Matches are tried across all mappings by kind: lower-cased resource
    /// type first, then resource alias, then table name. A qualifier that is
    /// one mapping's alias and another's table resolves to the alias owner.
    fn mapping_for_qualifier(&self, qualifier: &str) -> Option<&FieldMapping> {
        let mappings = self.all_mappings();
        mappings
            .iter()
            .find(|m| m.identity() == qualifier)
            .or_else(|| mappings.iter().find(|m| m.resource_alias == qualifier))
            .or_else(|| mappings.iter().find(|m| m.table_name == qualifier))
    }
}

/// In-memory [`MappingRegistry`].
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct Mappings {
    mappings: Vec<FieldMapping>,
    by_type: HashMap<String, usize>,
}

impl Mappings {
    /// Build the registry.
    ///
    /// # Errors
    /// Returns `Error::DuplicateMapping` if two mappings share a resource type.
    pub fn new(mappings: Vec<FieldMapping>) -> Result<Self, Error> {
        let mut by_type = HashMap::with_capacity(mappings.len());
        for (idx, mapping) in mappings.iter().enumerate() {
            if by_type.insert(mapping.identity(), idx).is_some() {
                return Err(Error::DuplicateMapping(mapping.resource_type.clone()));
            }
        }
        Ok(Self { mappings, by_type })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl MappingRegistry for Mappings {
    fn mapping_for_resource_type(&self, resource_type: &str) -> Option<&FieldMapping> {
        self.by_type
            .get(&resource_type.to_lowercase())
            .and_then(|idx| self.mappings.get(*idx))
    }

    fn all_mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }
}
