//! The `paginate` entry point.
//!
//! [`JsonApiPager`] runs the translators in a fixed order against one query:
//!
//! 1. filters: normalized, then applied as equality / related `EXISTS` constraints
//! 2. sort: aliases resolved, `ORDER BY` clauses appended in request order
//! 3. page: size clamped to the configured limits, columns projected from the
//!    sparse fieldset, both handed to [`QueryBuilder::paginate`]
//!
//! It holds no per-request state; every call reads the request afresh.
//!
//! ```ignore
//! let page = JsonApiPager::new(&registry)
//!     .limits(25, 500)
//!     .paginate(&mut builder, &request)?;
//! ```

use tracing::debug;

use crate::{
    Error, JsonApiConfig, MappingRegistry, PageLimits, PageRequest, QueryBuilder, RequestReader,
    apply_filters, apply_sort, normalize_filters, project_columns,
};

const DEFAULT_PAGE_PARAM: &str = "page";

#[must_use]
pub struct JsonApiPager<'a, R: MappingRegistry + ?Sized> {
    registry: &'a R,
    limits: PageLimits,
    page_param: String,
}

impl<'a, R: MappingRegistry + ?Sized> JsonApiPager<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        Self {
            registry,
            limits: PageLimits::default(),
            page_param: DEFAULT_PAGE_PARAM.to_owned(),
        }
    }

    pub fn from_config(registry: &'a R, config: &JsonApiConfig) -> Self {
        Self {
            registry,
            limits: config.page,
            page_param: config.page_param.clone(),
        }
    }

    pub fn limits(mut self, default_size: u64, max_size: u64) -> Self {
        self.limits = PageLimits {
            default_size,
            max_size,
        };
        self
    }

    pub fn page_param(mut self, name: impl Into<String>) -> Self {
        self.page_param = name.into();
        self
    }

    /// Apply the request's filters, sort and page to `builder`.
    ///
    /// Returns the effective page. Nothing is applied when the request is
    /// rejected.
    ///
    /// # Errors
    /// - `Error::UnmappedResource` if the builder's resource has no mapping
    /// - `Error::InvalidFilterKey` if a filter key is malformed
    /// - `Error::UnknownResourceFilter` if a filter qualifier names no mapped resource
    pub fn paginate<B, Q>(&self, builder: &mut B, request: &Q) -> Result<PageRequest, Error>
    where
        B: QueryBuilder + ?Sized,
        Q: RequestReader + ?Sized,
    {
        let resource_type = builder.resource_type().to_owned();
        let mapping = self
            .registry
            .mapping_for_resource_type(&resource_type)
            .ok_or_else(|| {
                tracing::warn!(resource = %resource_type, "no mapping for queried resource");
                Error::UnmappedResource(resource_type.clone())
            })?;

        let filters = normalize_filters(&request.requested_filters(), &resource_type)?;
        apply_filters(&filters, builder, self.registry)?;

        apply_sort(&request.requested_sort(), mapping, builder);

        let page = PageRequest {
            size: self.limits.clamp_size(request.page_size()),
            number: PageLimits::page_number(request.page_number()),
            param_name: self.page_param.clone(),
        };
        let columns = project_columns(&request.requested_fields(), self.registry);

        debug!(
            resource = %resource_type,
            page.size = page.size,
            page.number = page.number,
            columns = ?columns,
            "paginating"
        );
        builder.paginate(&page, &columns);

        Ok(page)
    }
}

/// [`JsonApiPager::paginate`] with default limits and page parameter.
///
/// # Errors
/// Same as [`JsonApiPager::paginate`].
pub fn paginate<R, B, Q>(registry: &R, builder: &mut B, request: &Q) -> Result<PageRequest, Error>
where
    R: MappingRegistry + ?Sized,
    B: QueryBuilder + ?Sized,
    Q: RequestReader + ?Sized,
{
    JsonApiPager::new(registry).paginate(builder, request)
}
