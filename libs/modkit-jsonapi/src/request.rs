//! Reading JSON:API query parameters from a request.

use crate::{Error, FieldSet, FilterRequest, FilterValue, SortDirection, SortSpec};

const PAGE_SIZE: &str = "size";
const PAGE_NUMBER: &str = "number";

/// Request-scoped access to the query parameters the translators consume.
///
/// Implementations hand out fresh values on every call; nothing is shared
/// between requests.
pub trait RequestReader {
    fn page_size(&self) -> Option<u64>;

    fn page_number(&self) -> Option<u64>;

    fn requested_fields(&self) -> FieldSet;

    fn requested_filters(&self) -> FilterRequest;

    fn requested_sort(&self) -> SortSpec;
}

/// Query parameters of one JSON:API request.
///
/// Understands `filter[<key>]`, `sort`, `fields[<resource>]`, `page[size]`
/// and `page[number]`; anything else is ignored.
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct JsonApiRequest {
    filters: FilterRequest,
    sort: SortSpec,
    fields: FieldSet,
    page_size: Option<u64>,
    page_number: Option<u64>,
}

impl JsonApiRequest {
    /// Parse a urlencoded query string, with or without a leading `?`.
    ///
    /// # Errors
    /// Returns `Error::InvalidQueryString` if the string is not urlencoded, or
    /// `Error::InvalidPageParam` if a page parameter is not an unsigned integer.
    pub fn from_query_str(query: &str) -> Result<Self, Error> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| Error::InvalidQueryString(e.to_string()))?;
        Self::from_pairs(pairs)
    }

    /// Build from already decoded `(name, value)` pairs in request order.
    ///
    /// # Errors
    /// Returns `Error::InvalidPageParam` if a page parameter is not an unsigned integer.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut request = Self::default();

        for (name, value) in pairs {
            if let Some(key) = bracketed(&name, "filter") {
                request.filters.push(key, FilterValue::String(value));
            } else if name == "sort" {
                request.sort = parse_sort(&value);
            } else if let Some(resource) = bracketed(&name, "fields") {
                request.fields.insert(resource, split_list(&value));
            } else if let Some(param) = bracketed(&name, "page") {
                match param {
                    PAGE_SIZE => request.page_size = Some(parse_page(PAGE_SIZE, &value)?),
                    PAGE_NUMBER => request.page_number = Some(parse_page(PAGE_NUMBER, &value)?),
                    _ => {}
                }
            }
        }

        Ok(request)
    }

    pub fn filters(&self) -> &FilterRequest {
        &self.filters
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }
}

impl RequestReader for JsonApiRequest {
    fn page_size(&self) -> Option<u64> {
        self.page_size
    }

    fn page_number(&self) -> Option<u64> {
        self.page_number
    }

    fn requested_fields(&self) -> FieldSet {
        self.fields.clone()
    }

    fn requested_filters(&self) -> FilterRequest {
        self.filters.clone()
    }

    fn requested_sort(&self) -> SortSpec {
        self.sort.clone()
    }
}

fn bracketed<'a>(name: &'a str, family: &str) -> Option<&'a str> {
    name.strip_prefix(family)?
        .strip_prefix('[')?
        .strip_suffix(']')
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// `a,-b` → `a` ascending, `b` descending.
fn parse_sort(value: &str) -> SortSpec {
    split_list(value)
        .map(|token| match token.strip_prefix('-') {
            Some(field) => (field, SortDirection::Descending),
            None => (token, SortDirection::Ascending),
        })
        .filter(|(field, _)| !field.is_empty())
        .collect()
}

fn parse_page(param: &'static str, value: &str) -> Result<u64, Error> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::InvalidPageParam {
            param,
            value: value.to_owned(),
        })
}
