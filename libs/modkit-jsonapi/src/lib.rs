#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! JSON:API query parameters → relational query constraints.
//!
//! The crate turns the request-scoped `filter`, `sort`, `fields` and `page`
//! parameters of a JSON:API request into calls on a [`QueryBuilder`]:
//!
//! - [`filter`]: dotted `filter[...]` keys grouped per resource
//! - [`constraints`]: equality and related-resource `EXISTS` constraints
//! - [`sort`]: alias-aware `ORDER BY` clauses
//! - [`columns`]: sparse fieldset projection with primary keys
//! - [`pager`]: the [`paginate`] entry point tying the steps together
//!
//! Execution stays with the ORM. With the `sea-orm` feature, [`sea::SeaQueryBuilder`]
//! implements the builder port on top of `sea_query::SelectStatement`.
//!
//! # Example
//!
//! ```rust,ignore
//! use modkit_jsonapi::{FieldMapping, JsonApiPager, JsonApiRequest, Mappings, sea::SeaQueryBuilder};
//!
//! let registry = Mappings::new(vec![
//!     FieldMapping::new("User", "user", "users").alias("fullName", "full_name"),
//! ])?;
//! let request = JsonApiRequest::from_query_str("filter[fullName]=Bob&sort=-fullName")?;
//!
//! let mut builder = SeaQueryBuilder::new(&registry.all_mappings()[0]);
//! JsonApiPager::new(&registry).limits(25, 100).paginate(&mut builder, &request)?;
//! ```

pub mod builder;
pub mod columns;
pub mod config;
pub mod constraints;
pub mod errors;
pub mod filter;
pub mod mapping;
pub mod pager;
pub mod problem;
pub mod request;
#[cfg(feature = "sea-orm")]
pub mod sea;
pub mod sort;
pub mod value;

pub use builder::{JoinKeys, PageRequest, PredicateBuilder, QueryBuilder, RelatedScope};
pub use columns::{ALL_COLUMNS, FieldSet, project_columns};
pub use config::{JsonApiConfig, PageLimits};
pub use constraints::apply_filters;
pub use errors::{Error, Result};
pub use filter::{FilterRequest, NormalizedFilters, normalize_filters, resource_identity};
pub use mapping::{FieldMapping, MappingRegistry, Mappings, Relation};
pub use pager::{JsonApiPager, paginate};
pub use request::{JsonApiRequest, RequestReader};
pub use sort::{SortDirection, SortSpec, apply_sort, resolve_sort};
pub use value::FilterValue;
