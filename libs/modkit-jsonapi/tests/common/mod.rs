#![allow(dead_code)]

//! Shared fixtures: a mapping registry and a `QueryBuilder` that records calls.

use modkit_jsonapi::{
    FieldMapping, FilterValue, Mappings, PageRequest, PredicateBuilder, QueryBuilder,
    RelatedScope, Relation, SortDirection,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Equals {
        column: String,
        value: FilterValue,
    },
    RelatedExists {
        scope: RelatedScope,
        predicates: Vec<(String, FilterValue)>,
    },
    OrderBy {
        column: String,
        direction: SortDirection,
    },
    Paginate {
        page: PageRequest,
        columns: Vec<String>,
    },
}

pub struct RecordingBuilder {
    resource_type: String,
    pub calls: Vec<Call>,
}

impl RecordingBuilder {
    pub fn new(resource_type: &str) -> Self {
        Self {
            resource_type: resource_type.to_owned(),
            calls: Vec::new(),
        }
    }
}

#[derive(Default)]
struct PredicateRecorder(Vec<(String, FilterValue)>);

impl PredicateBuilder for PredicateRecorder {
    fn where_equals(&mut self, column: &str, value: &FilterValue) {
        self.0.push((column.to_owned(), value.clone()));
    }
}

impl PredicateBuilder for RecordingBuilder {
    fn where_equals(&mut self, column: &str, value: &FilterValue) {
        self.calls.push(Call::Equals {
            column: column.to_owned(),
            value: value.clone(),
        });
    }
}

impl QueryBuilder for RecordingBuilder {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn where_related_exists(
        &mut self,
        related: &RelatedScope,
        predicate: &dyn Fn(&mut dyn PredicateBuilder),
    ) {
        let mut recorder = PredicateRecorder::default();
        predicate(&mut recorder);
        self.calls.push(Call::RelatedExists {
            scope: related.clone(),
            predicates: recorder.0,
        });
    }

    fn order_by(&mut self, column: &str, direction: SortDirection) {
        self.calls.push(Call::OrderBy {
            column: column.to_owned(),
            direction,
        });
    }

    fn paginate(&mut self, page: &PageRequest, columns: &[String]) {
        self.calls.push(Call::Paginate {
            page: page.clone(),
            columns: columns.to_vec(),
        });
    }
}

pub fn user_mapping() -> FieldMapping {
    FieldMapping::new("User", "user", "users")
        .alias("fullName", "full_name")
        .relation("comments", Relation::new("user_id"))
}

pub fn comment_mapping() -> FieldMapping {
    FieldMapping::new("Comment", "comments", "comments").alias("text", "body")
}

pub fn post_mapping() -> FieldMapping {
    FieldMapping::new("Post", "posts", "posts").primary_key("post_id")
}

pub fn registry() -> Mappings {
    Mappings::new(vec![user_mapping(), comment_mapping(), post_mapping()])
        .expect("fixture mappings are unique")
}

pub fn eq(column: &str, value: &str) -> Call {
    Call::Equals {
        column: column.to_owned(),
        value: FilterValue::from(value),
    }
}
