//! Ports implemented by query builders.
//!
//! The translators never execute anything. They describe constraints to a
//! [`QueryBuilder`] supplied by the ORM layer and leave rendering and
//! execution to it.

use crate::{FilterValue, SortDirection};

/// Receives equality predicates.
///
/// Column names are physical and unqualified; the builder qualifies them
/// with the table it is building a predicate for.
pub trait PredicateBuilder {
    fn where_equals(&mut self, column: &str, value: &FilterValue);
}

/// Columns correlating a related-resource subquery with the outer row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinKeys {
    pub parent_table: String,
    pub parent_column: String,
    pub related_column: String,
}

/// Target of a related-resource `EXISTS` constraint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedScope {
    pub table: String,
    /// `None` when no relation is declared; the subquery is then uncorrelated.
    pub join: Option<JoinKeys>,
}

/// Resolved pagination parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub size: u64,
    /// 1-based.
    pub number: u64,
    /// Name of the request parameter carrying the page, usually `page`.
    pub param_name: String,
}

impl PageRequest {
    /// Rows to skip before the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }
}

/// A query under construction for one resource.
pub trait QueryBuilder: PredicateBuilder {
    /// Internal type of the resource the query selects from, e.g. `User`.
    fn resource_type(&self) -> &str;

    /// Keep rows for which `related` has at least one row matching `predicate`.
    fn where_related_exists(
        &mut self,
        related: &RelatedScope,
        predicate: &dyn Fn(&mut dyn PredicateBuilder),
    );

    fn order_by(&mut self, column: &str, direction: SortDirection);

    /// Restrict the query to one page projecting `columns`
    /// (`table.column` names, or the single entry `*`).
    fn paginate(&mut self, page: &PageRequest, columns: &[String]);
}
