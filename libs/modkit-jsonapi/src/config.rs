//! Configuration: paging limits and resource mappings.
//!
//! Layered with `figment`: defaults → YAML file → `JSONAPI__*` environment
//! variables (`__` separates nested keys, e.g. `JSONAPI__PAGE__MAX_SIZE=200`).
//!
//! ```yaml
//! page:
//!   default_size: 25
//!   max_size: 500
//! resources:
//!   - resource_type: User
//!     resource_alias: user
//!     table_name: users
//!     aliased_properties:
//!       fullName: full_name
//!     relations:
//!       comments: { foreign_key: user_id }
//! ```

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::{Error, FieldMapping, Mappings};

/// Page size bounds applied to `page[size]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLimits {
    pub default_size: u64,
    pub max_size: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: 25,
            max_size: 1000,
        }
    }
}

impl PageLimits {
    /// Missing → default, zero → 1, above max → max.
    #[must_use]
    pub fn clamp_size(&self, requested: Option<u64>) -> u64 {
        let mut size = requested.unwrap_or(self.default_size);
        if size == 0 {
            size = 1;
        }
        if size > self.max_size {
            size = self.max_size.max(1);
        }
        size
    }

    /// Missing or zero → first page.
    #[must_use]
    pub fn page_number(requested: Option<u64>) -> u64 {
        requested.filter(|n| *n > 0).unwrap_or(1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[must_use]
pub struct JsonApiConfig {
    pub page: PageLimits,
    /// Name of the pagination request parameter handed to the query builder.
    pub page_param: String,
    pub resources: Vec<FieldMapping>,
}

impl Default for JsonApiConfig {
    fn default() -> Self {
        Self {
            page: PageLimits::default(),
            page_param: "page".to_owned(),
            resources: Vec::new(),
        }
    }
}

impl JsonApiConfig {
    pub const ENV_PREFIX: &'static str = "JSONAPI__";

    /// Layered provider: defaults, then `path` (if any), then the environment.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }

    /// # Errors
    /// Returns `Error::Config` if the merged configuration does not deserialize.
    pub fn from_figment(figment: &Figment) -> Result<Self, Error> {
        figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// # Errors
    /// Returns `Error::Config` if the file or environment holds invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        Self::from_figment(&Self::figment(path))
    }

    /// Registry over the configured resources.
    ///
    /// # Errors
    /// Returns `Error::DuplicateMapping` if a resource type is configured twice.
    pub fn registry(&self) -> Result<Mappings, Error> {
        Mappings::new(self.resources.clone())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MappingRegistry;

    const YAML: &str = r"
page:
  max_size: 50
resources:
  - resource_type: User
    resource_alias: user
    table_name: users
    aliased_properties:
      fullName: full_name
      emailAddress: email
    relations:
      comments:
        foreign_key: user_id
  - resource_type: Comment
    resource_alias: comments
    table_name: comments
";

    #[test]
    fn clamp_size_applies_bounds() {
        let limits = PageLimits {
            default_size: 25,
            max_size: 100,
        };
        assert_eq!(limits.clamp_size(None), 25);
        assert_eq!(limits.clamp_size(Some(0)), 1);
        assert_eq!(limits.clamp_size(Some(40)), 40);
        assert_eq!(limits.clamp_size(Some(5000)), 100);
    }

    #[test]
    fn page_number_defaults_to_first_page() {
        assert_eq!(PageLimits::page_number(None), 1);
        assert_eq!(PageLimits::page_number(Some(0)), 1);
        assert_eq!(PageLimits::page_number(Some(7)), 7);
    }

    #[test]
    fn yaml_layer_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(JsonApiConfig::default()))
            .merge(Yaml::string(YAML));
        let config = JsonApiConfig::from_figment(&figment).unwrap();

        assert_eq!(config.page.default_size, 25);
        assert_eq!(config.page.max_size, 50);
        assert_eq!(config.page_param, "page");

        let registry = config.registry().unwrap();
        let user = registry.mapping_for_resource_type("User").unwrap();
        assert_eq!(user.column_for("fullName"), "full_name");
        assert_eq!(user.column_for("emailAddress"), "email");
        assert_eq!(user.aliased_properties.len(), 2);
        assert_eq!(user.relation_for("comments").unwrap().foreign_key, "user_id");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn env_layer_overrides_yaml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("jsonapi.yaml");
        std::fs::write(&path, YAML).unwrap();

        temp_env::with_vars(
            [
                ("JSONAPI__PAGE__MAX_SIZE", Some("7")),
                ("JSONAPI__PAGE_PARAM", Some("p")),
            ],
            || {
                let config = JsonApiConfig::load(Some(&path)).unwrap();
                assert_eq!(config.page.max_size, 7);
                assert_eq!(config.page.default_size, 25);
                assert_eq!(config.page_param, "p");
                assert_eq!(config.resources.len(), 2);
            },
        );
    }

    #[test]
    fn load_without_file_uses_defaults() {
        temp_env::with_var_unset("JSONAPI__PAGE__MAX_SIZE", || {
            let config = JsonApiConfig::load(None).unwrap();
            assert_eq!(config.page, PageLimits::default());
            assert!(config.resources.is_empty());
        });
    }

    #[test]
    fn invalid_values_are_reported_as_config_errors() {
        let figment = Figment::from(Serialized::defaults(JsonApiConfig::default()))
            .merge(Yaml::string("page:\n  max_size: lots\n"));
        let err = JsonApiConfig::from_figment(&figment).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.is_configuration());
    }
}
