//! [`QueryBuilder`] on top of `sea_query::SelectStatement`.
//!
//! Columns are always qualified with their table, so predicates of the outer
//! query and of related `EXISTS` subqueries never clash. Execution goes
//! through `sea_orm`; its `DbErr` is returned unchanged.

use sea_orm::sea_query::{
    Alias, Asterisk, Expr, MysqlQueryBuilder, Order, PostgresQueryBuilder, Query,
    SelectStatement, SimpleExpr, SqliteQueryBuilder,
};
use sea_orm::{ConnectionTrait, DbBackend, DbErr, FromQueryResult, JsonValue, Statement};

use crate::{
    ALL_COLUMNS, FieldMapping, FilterValue, PageRequest, PredicateBuilder, QueryBuilder,
    RelatedScope, SortDirection,
};

fn column_ref(table: &str, column: &str) -> (Alias, Alias) {
    (Alias::new(table), Alias::new(column))
}

fn to_sea_value(value: &FilterValue) -> sea_orm::Value {
    match value {
        FilterValue::Null => sea_orm::Value::String(None),
        FilterValue::Bool(b) => sea_orm::Value::from(*b),
        FilterValue::Integer(i) => sea_orm::Value::from(*i),
        FilterValue::Float(f) => sea_orm::Value::from(*f),
        FilterValue::String(s) => sea_orm::Value::from(s.clone()),
    }
}

fn equals(table: &str, column: &str, value: &FilterValue) -> SimpleExpr {
    let col = Expr::col(column_ref(table, column));
    match value {
        FilterValue::Null => col.is_null(),
        other => col.eq(to_sea_value(other)),
    }
}

/// Predicate scope inside a related-resource subquery.
struct SubqueryPredicate<'a> {
    table: &'a str,
    select: &'a mut SelectStatement,
}

impl PredicateBuilder for SubqueryPredicate<'_> {
    fn where_equals(&mut self, column: &str, value: &FilterValue) {
        self.select.and_where(equals(self.table, column, value));
    }
}

/// Builds a `SELECT` over one mapped resource.
#[derive(Clone, Debug)]
#[must_use]
pub struct SeaQueryBuilder {
    resource_type: String,
    table: String,
    select: SelectStatement,
    projected: bool,
}

impl SeaQueryBuilder {
    pub fn new(mapping: &FieldMapping) -> Self {
        let mut select = Query::select();
        select.from(Alias::new(mapping.table_name.as_str()));
        Self {
            resource_type: mapping.resource_type.clone(),
            table: mapping.table_name.clone(),
            select,
            projected: false,
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The statement built so far; selects `*` if no projection was set.
    #[must_use]
    pub fn select_statement(&self) -> SelectStatement {
        let mut select = self.select.clone();
        if !self.projected {
            select.column(Asterisk);
        }
        select
    }

    /// SQL with values inlined, for logs and tooling.
    #[must_use]
    pub fn to_sql(&self, backend: DbBackend) -> String {
        let select = self.select_statement();
        match backend {
            DbBackend::Postgres => select.to_string(PostgresQueryBuilder),
            DbBackend::MySql => select.to_string(MysqlQueryBuilder),
            DbBackend::Sqlite => select.to_string(SqliteQueryBuilder),
        }
    }

    #[must_use]
    pub fn statement(&self, backend: DbBackend) -> Statement {
        backend.build(&self.select_statement())
    }

    /// Run the query and return each row as a JSON object keyed by column name.
    ///
    /// # Errors
    /// Returns the connection's `DbErr` unchanged.
    pub async fn fetch_json<C>(&self, conn: &C) -> Result<Vec<JsonValue>, DbErr>
    where
        C: ConnectionTrait,
    {
        let statement = self.statement(conn.get_database_backend());
        tracing::debug!(sql = %statement.sql, "executing JSON:API query");
        JsonValue::find_by_statement(statement).all(conn).await
    }
}

impl PredicateBuilder for SeaQueryBuilder {
    fn where_equals(&mut self, column: &str, value: &FilterValue) {
        self.select.and_where(equals(&self.table, column, value));
    }
}

impl QueryBuilder for SeaQueryBuilder {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn where_related_exists(
        &mut self,
        related: &RelatedScope,
        predicate: &dyn Fn(&mut dyn PredicateBuilder),
    ) {
        let mut subquery = Query::select();
        subquery
            .expr(Expr::val(1))
            .from(Alias::new(related.table.as_str()));

        if let Some(join) = &related.join {
            subquery.and_where(
                Expr::col(column_ref(&related.table, &join.related_column))
                    .equals(column_ref(&join.parent_table, &join.parent_column)),
            );
        }

        predicate(&mut SubqueryPredicate {
            table: &related.table,
            select: &mut subquery,
        });

        self.select.and_where(Expr::exists(subquery));
    }

    fn order_by(&mut self, column: &str, direction: SortDirection) {
        let order = match direction {
            SortDirection::Ascending => Order::Asc,
            SortDirection::Descending => Order::Desc,
        };
        self.select.order_by(column_ref(&self.table, column), order);
    }

    fn paginate(&mut self, page: &PageRequest, columns: &[String]) {
        for column in columns {
            if column == ALL_COLUMNS {
                self.select.column(Asterisk);
            } else if let Some((table, name)) = column.split_once('.') {
                self.select.column(column_ref(table, name));
            } else {
                self.select.column(column_ref(&self.table, column));
            }
        }
        self.projected = !columns.is_empty();

        self.select.limit(page.size).offset(page.offset());
    }
}
