//! Filter, sort and paginate over a [`Dataset`].
//!
//! The pipeline is total: malformed parameters are normalized, never
//! rejected. Stages always run in the same order: text filter, flag filters,
//! sort, paginate.

use std::cmp::Ordering;

use crime_types::query::{DEFAULT_LIMIT, DEFAULT_PAGE};
use crime_types::{OffenseRecord, PageMeta, QueryParams, ResultPage, SortOrder, TriState};

use crate::dataset::Dataset;

/// Run one request's parameters against the dataset.
pub fn query(dataset: &Dataset, params: &QueryParams) -> ResultPage {
    let mut results: Vec<&OffenseRecord> = dataset.records().iter().collect();

    if let Some(q) = params.q.as_deref().filter(|q| !q.is_empty()) {
        let needle = q.to_lowercase();
        results.retain(|r| matches_text(r, &needle));
    }

    let flag_filters: [(Option<bool>, fn(&OffenseRecord) -> TriState); 3] = [
        (parse_flag(&params.cognizable), |r| r.cognizable),
        (parse_flag(&params.bailable), |r| r.bailable),
        (parse_flag(&params.compoundable), |r| r.compoundable),
    ];
    for (wanted, flag) in flag_filters {
        if let Some(wanted) = wanted {
            results.retain(|r| flag(r).is(wanted));
        }
    }

    // `sort_by` is stable: equal keys keep dataset order
    match SortOrder::parse(params.sort_by.as_deref()) {
        SortOrder::SeverityDesc => results.sort_by(|a, b| b.severity.cmp(&a.severity)),
        SortOrder::SeverityAsc => results.sort_by(|a, b| a.severity.cmp(&b.severity)),
        SortOrder::NameAsc => results.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
    }

    let page = coerce_positive(params.page.as_deref(), DEFAULT_PAGE);
    let limit = coerce_positive(params.limit.as_deref(), DEFAULT_LIMIT);
    paginate(&results, page, limit)
}

fn matches_text(record: &OffenseRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record.section.to_lowercase().contains(needle)
        || record.description.to_lowercase().contains(needle)
        || record.ingredients_text().to_lowercase().contains(needle)
}

fn parse_flag(raw: &Option<String>) -> Option<bool> {
    raw.as_deref().and_then(parse_bool_token)
}

/// `true`/`1`/`yes` and `false`/`0`/`no`, case-insensitive. Anything else is `None`.
pub fn parse_bool_token(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a page/limit value; anything non-numeric or below 1 yields `default`.
fn coerce_positive(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .map(f64::floor)
        .filter(|n| *n >= 1.0)
        // float-to-int casts saturate
        .map(|n| n as usize)
        .unwrap_or(default)
}

fn paginate(results: &[&OffenseRecord], page: usize, limit: usize) -> ResultPage {
    let total = results.len();
    let start = (page - 1).saturating_mul(limit);
    let data = if start >= total {
        Vec::new()
    } else {
        let end = start.saturating_add(limit).min(total);
        results[start..end].iter().map(|r| (*r).clone()).collect()
    };

    ResultPage {
        data,
        meta: PageMeta {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        },
    }
}

/// Locale-style name ordering: case-insensitive first, then lowercase
/// before uppercase for names that differ only in case.
///
/// Only case is folded. Letters are otherwise compared by code point, so
/// this matches locale collation for ASCII names but sorts accented letters
/// after `z` and punctuation in code point order.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
}
