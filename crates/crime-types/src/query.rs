use serde::{Deserialize, Serialize};

use crate::record::OffenseRecord;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 50;

/// Query parameters exactly as the caller sent them.
///
/// Nothing here is validated; the pipeline normalizes every field and never
/// rejects a request because of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub q: Option<String>,
    pub cognizable: Option<String>,
    pub bailable: Option<String>,
    pub compoundable: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    SeverityDesc,
    SeverityAsc,
    #[default]
    NameAsc,
}

impl SortOrder {
    /// Unrecognized values fall back to name ordering.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("severity_desc") => SortOrder::SeverityDesc,
            Some("severity_asc") => SortOrder::SeverityAsc,
            _ => SortOrder::NameAsc,
        }
    }
}

/// Pagination metadata returned alongside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
}

/// One page of filtered, sorted records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    pub data: Vec<OffenseRecord>,
    pub meta: PageMeta,
}
