//! Pagination and sort contracts shared by the API and repository layers.
//!
//! Page numbers are 1-based. A page past the end of the result set yields
//! an empty slice, never an error; non-positive page numbers or sizes are
//! rejected up front.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default number of results per page.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Maximum number of results per page; larger requests are clamped.
pub const MAX_PER_PAGE: i64 = 100;

/// Whitelisted sort fields for property search.
///
/// The variants map to column names, so ordering can be pushed into SQL
/// without interpolating caller-supplied strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Price,
    Area,
    Bedrooms,
}

impl SortField {
    /// The column this field sorts by.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Price => "price",
            SortField::Area => "area",
            SortField::Bedrooms => "bedrooms",
        }
    }
}

/// Sort direction; descending by default (newest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for the direction.
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: i64,
    /// Results per page, already clamped to [`MAX_PER_PAGE`].
    pub per_page: i64,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl PageRequest {
    /// Build a page request from raw query values.
    ///
    /// Missing values take the documented defaults; `page <= 0` or
    /// `per_page <= 0` is an invalid-argument error; `per_page` above
    /// [`MAX_PER_PAGE`] is clamped, not rejected.
    pub fn new(
        page: Option<i64>,
        per_page: Option<i64>,
        sort_by: Option<SortField>,
        order: Option<SortOrder>,
    ) -> Result<Self, CoreError> {
        let page = page.unwrap_or(1);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);

        if page <= 0 {
            return Err(CoreError::Validation(format!(
                "page must be positive, got {page}"
            )));
        }
        if per_page <= 0 {
            return Err(CoreError::Validation(format!(
                "per_page must be positive, got {per_page}"
            )));
        }

        Ok(Self {
            page,
            per_page: per_page.min(MAX_PER_PAGE),
            sort_by: sort_by.unwrap_or_default(),
            order: order.unwrap_or_default(),
        })
    }

    /// Number of rows to skip for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// Pagination metadata returned alongside every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PageMeta {
    /// Compute metadata for a result set of `total` rows.
    ///
    /// `total_pages` is `ceil(total / per_page)`; zero rows means zero pages.
    pub fn compute(total: i64, request: &PageRequest) -> Self {
        Self {
            total,
            page: request.page,
            per_page: request.per_page,
            total_pages: (total + request.per_page - 1) / request.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(page: i64, per_page: i64) -> PageRequest {
        PageRequest::new(Some(page), Some(per_page), None, None).unwrap()
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn defaults_are_page_one_of_ten_newest_first() {
        let req = PageRequest::new(None, None, None, None).unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, DEFAULT_PER_PAGE);
        assert_eq!(req.sort_by, SortField::CreatedAt);
        assert_eq!(req.order, SortOrder::Desc);
    }

    #[test]
    fn zero_or_negative_page_is_rejected() {
        assert_matches!(
            PageRequest::new(Some(0), None, None, None),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            PageRequest::new(Some(-3), None, None, None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn zero_or_negative_per_page_is_rejected() {
        assert_matches!(
            PageRequest::new(None, Some(0), None, None),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            PageRequest::new(None, Some(-1), None, None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn oversized_per_page_is_clamped_to_the_cap() {
        assert_eq!(request(1, 500).per_page, MAX_PER_PAGE);
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(request(1, 10).offset(), 0);
        assert_eq!(request(3, 10).offset(), 20);
    }

    // -- metadata ------------------------------------------------------------

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(PageMeta::compute(25, &request(1, 10)).total_pages, 3);
        assert_eq!(PageMeta::compute(30, &request(1, 10)).total_pages, 3);
        assert_eq!(PageMeta::compute(31, &request(1, 10)).total_pages, 4);
    }

    #[test]
    fn empty_result_set_has_zero_pages() {
        assert_eq!(PageMeta::compute(0, &request(1, 10)).total_pages, 0);
    }

    #[test]
    fn pages_partition_the_result_set_exactly_once() {
        // concat(page 1..=total_pages) must cover [0, total) with no
        // overlap: each page's offset picks up where the previous ended.
        let total = 47;
        let per_page = 10;
        let meta = PageMeta::compute(total, &request(1, per_page));

        let mut covered = 0;
        for page in 1..=meta.total_pages {
            let req = request(page, per_page);
            assert_eq!(req.offset(), covered);
            let len = (total - req.offset()).min(per_page);
            covered += len;
        }
        assert_eq!(covered, total);

        // A page past the end starts beyond the data: empty slice.
        let past = request(meta.total_pages + 1, per_page);
        assert!(past.offset() >= total);
    }

    // -- sort mapping --------------------------------------------------------

    #[test]
    fn sort_fields_map_to_fixed_columns() {
        assert_eq!(SortField::CreatedAt.column(), "created_at");
        assert_eq!(SortField::Price.column(), "price");
        assert_eq!(SortField::Area.column(), "area");
        assert_eq!(SortField::Bedrooms.column(), "bedrooms");
    }

    #[test]
    fn sort_order_keywords() {
        assert_eq!(SortOrder::Asc.keyword(), "ASC");
        assert_eq!(SortOrder::Desc.keyword(), "DESC");
    }
}
