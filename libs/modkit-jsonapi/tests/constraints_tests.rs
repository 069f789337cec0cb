#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Filter application against a recording builder.

mod common;

use common::{Call, RecordingBuilder, eq, registry};
use modkit_jsonapi::{
    Error, FilterRequest, FilterValue, JoinKeys, RelatedScope, apply_filters, normalize_filters,
};

fn apply(resource_type: &str, request: &FilterRequest) -> Result<Vec<Call>, Error> {
    let mut builder = RecordingBuilder::new(resource_type);
    let filters = normalize_filters(request, resource_type)?;
    apply_filters(&filters, &mut builder, &registry())?;
    Ok(builder.calls)
}

#[test]
fn current_resource_filters_become_equality_constraints() {
    let request = FilterRequest::new().with("name", "Bob").with("fullName", "Bob Smith");
    let calls = apply("User", &request).unwrap();
    assert_eq!(calls, vec![eq("name", "Bob"), eq("full_name", "Bob Smith")]);
}

#[test]
fn related_filter_resolves_table_and_join_keys() {
    let request = FilterRequest::new().with("comments.text", "hi");
    let calls = apply("User", &request).unwrap();

    assert_eq!(
        calls,
        vec![Call::RelatedExists {
            scope: RelatedScope {
                table: "comments".to_owned(),
                join: Some(JoinKeys {
                    parent_table: "users".to_owned(),
                    parent_column: "id".to_owned(),
                    related_column: "user_id".to_owned(),
                }),
            },
            predicates: vec![("body".to_owned(), FilterValue::from("hi"))],
        }]
    );
}

#[test]
fn related_filter_without_relation_is_uncorrelated() {
    let request = FilterRequest::new().with("posts.title", "Rust");
    let calls = apply("User", &request).unwrap();

    assert_eq!(
        calls,
        vec![Call::RelatedExists {
            scope: RelatedScope {
                table: "posts".to_owned(),
                join: None,
            },
            predicates: vec![("title".to_owned(), FilterValue::from("Rust"))],
        }]
    );
}

#[test]
fn qualifier_naming_current_resource_by_alias_filters_directly() {
    let request = FilterRequest::new().with("users.fullName", "Ann");
    let calls = apply("User", &request).unwrap();
    assert_eq!(calls, vec![eq("full_name", "Ann")]);
}

#[test]
fn unknown_qualifier_is_rejected_before_anything_is_applied() {
    let mut builder = RecordingBuilder::new("User");
    let request = FilterRequest::new()
        .with("name", "Bob")
        .with("tags.label", "rust");
    let filters = normalize_filters(&request, "User").unwrap();

    let err = apply_filters(&filters, &mut builder, &registry()).unwrap_err();

    assert_eq!(err, Error::UnknownResourceFilter("tags".to_owned()));
    assert!(err.is_configuration());
    assert!(builder.calls.is_empty());
}

#[test]
fn unmapped_current_resource_passes_fields_through() {
    let request = FilterRequest::new().with("fullName", "x");
    let calls = apply("Audit", &request).unwrap();
    assert_eq!(calls, vec![eq("fullName", "x")]);
}

#[test]
fn no_filters_leave_builder_untouched() {
    let calls = apply("User", &FilterRequest::new()).unwrap();
    assert!(calls.is_empty());
}
