//! Application of normalized filters to a query.
//!
//! Filters qualified with the current resource become plain equality
//! predicates. Any other qualifier is resolved through the registry to its
//! table and applied as an `EXISTS` subquery on that table, correlated with
//! the outer row when the current mapping declares a [`Relation`](crate::Relation)
//! for it.

use tracing::{debug, trace};

use crate::{
    Error, FieldMapping, FilterValue, JoinKeys, MappingRegistry, NormalizedFilters,
    PredicateBuilder, QueryBuilder, RelatedScope, resource_identity,
};

enum Constraint<'a> {
    Equals {
        column: &'a str,
        value: &'a FilterValue,
    },
    RelatedEquals {
        scope: RelatedScope,
        column: &'a str,
        value: &'a FilterValue,
    },
}

/// Apply `filters` to `builder`.
///
/// Every qualifier is resolved before the builder is touched, so a rejected
/// request leaves the query unchanged. Field names go through the owning
/// mapping's aliases; unknown names pass through.
///
/// # Errors
/// Returns `Error::UnknownResourceFilter` if a qualifier names no mapped resource.
pub fn apply_filters<B, R>(
    filters: &NormalizedFilters,
    builder: &mut B,
    registry: &R,
) -> Result<(), Error>
where
    B: QueryBuilder + ?Sized,
    R: MappingRegistry + ?Sized,
{
    if filters.is_empty() {
        return Ok(());
    }

    let resource_type = builder.resource_type().to_owned();
    let current = registry.mapping_for_resource_type(&resource_type);
    let plan = plan(filters, &resource_identity(&resource_type), current, registry)?;

    debug!(
        resource = %resource_type,
        constraints = plan.len(),
        "applying filters"
    );

    for constraint in plan {
        match constraint {
            Constraint::Equals { column, value } => {
                trace!(column, value = %value, "equality filter");
                builder.where_equals(column, value);
            }
            Constraint::RelatedEquals {
                scope,
                column,
                value,
            } => {
                trace!(table = %scope.table, column, value = %value, "related filter");
                builder.where_related_exists(&scope, &|q: &mut dyn PredicateBuilder| {
                    q.where_equals(column, value);
                });
            }
        }
    }

    Ok(())
}

fn plan<'a, R>(
    filters: &'a NormalizedFilters,
    identity: &str,
    current: Option<&'a FieldMapping>,
    registry: &'a R,
) -> Result<Vec<Constraint<'a>>, Error>
where
    R: MappingRegistry + ?Sized,
{
    let mut plan = Vec::new();

    for (qualifier, fields) in filters.iter() {
        let related = if qualifier == identity {
            None
        } else {
            let target = registry
                .mapping_for_qualifier(qualifier)
                .ok_or_else(|| Error::UnknownResourceFilter(qualifier.to_owned()))?;
            match current {
                Some(c) if c.resource_type == target.resource_type => None,
                _ => Some(target),
            }
        };

        match related {
            None => {
                for (field, value) in fields {
                    let column = current.map_or(field.as_str(), |m| m.column_for(field));
                    plan.push(Constraint::Equals { column, value });
                }
            }
            Some(target) => {
                let scope = related_scope(current, target, qualifier);
                for (field, value) in fields {
                    plan.push(Constraint::RelatedEquals {
                        scope: scope.clone(),
                        column: target.column_for(field),
                        value,
                    });
                }
            }
        }
    }

    Ok(plan)
}

fn related_scope(
    current: Option<&FieldMapping>,
    target: &FieldMapping,
    qualifier: &str,
) -> RelatedScope {
    let join = current.and_then(|parent| {
        parent
            .relation_for(qualifier)
            .or_else(|| parent.relation_for(&target.resource_alias))
            .map(|rel| JoinKeys {
                parent_table: parent.table_name.clone(),
                parent_column: rel
                    .local_key
                    .clone()
                    .unwrap_or_else(|| parent.primary_key.clone()),
                related_column: rel.foreign_key.clone(),
            })
    });

    RelatedScope {
        table: target.table_name.clone(),
        join,
    }
}
