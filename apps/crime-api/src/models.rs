//! Request and response bodies for the Crimes API

use serde::{Deserialize, Serialize};

use crime_types::{OffenseRecord, QueryParams};

/// Response for `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// Response for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub records: usize,
}

/// Single-record envelope for `GET /v1/crimes/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    pub data: OffenseRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build [`QueryParams`] from raw query-string pairs.
///
/// Unknown keys are ignored and the first occurrence of a repeated key wins,
/// so no query string can make the listing endpoint reject a request.
pub fn params_from_pairs(pairs: Vec<(String, String)>) -> QueryParams {
    let mut params = QueryParams::default();

    for (key, value) in pairs {
        let slot = match key.as_str() {
            "q" => &mut params.q,
            "cognizable" => &mut params.cognizable,
            "bailable" => &mut params.bailable,
            "compoundable" => &mut params.compoundable,
            "sortBy" => &mut params.sort_by,
            "page" => &mut params.page,
            "limit" => &mut params.limit,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    params
}

/// Parse a path id the way a numeric coercion would: surrounding
/// whitespace is allowed and `14.0` equals `14`.
pub fn parse_record_id(raw: &str) -> Option<u64> {
    let n = raw.trim().parse::<f64>().ok()?;
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64 {
        Some(n as u64)
    } else {
        None
    }
}
