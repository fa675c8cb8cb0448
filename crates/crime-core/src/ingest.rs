//! Normalization of loosely shaped crime payloads.
//!
//! Upstream data sources disagree on both the envelope (`[...]`,
//! `{crimes: [...]}`, `{data: [...]}`, keyed objects) and the field names
//! (`title` vs `name`, `ipc` vs `section`, ...). Everything funnels through
//! [`FIELD_ALIASES`] so the mapping stays in one ordered table.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use crime_types::{OffenseRecord, TriState};

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const UNKNOWN_NAME: &str = "Unknown";

/// Canonical record fields that can be sourced from aliased keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Id,
    Name,
    Section,
    Punishment,
    Ingredients,
    Cognizable,
    Bailable,
    Compoundable,
    Description,
    Severity,
}

/// Source keys for each canonical field, tried in order; first match wins.
pub const FIELD_ALIASES: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::Id, &["id"]),
    (CanonicalField::Name, &["name", "title", "crime", "key"]),
    (CanonicalField::Section, &["section", "ipc", "act"]),
    (CanonicalField::Punishment, &["punishment", "penalty"]),
    (CanonicalField::Ingredients, &["ingredients", "elements", "details"]),
    (CanonicalField::Cognizable, &["cognizable", "isCognizable"]),
    (CanonicalField::Bailable, &["bailable", "isBailable"]),
    (CanonicalField::Compoundable, &["compoundable", "isCompoundable"]),
    (CanonicalField::Description, &["description", "def", "details"]),
    (CanonicalField::Severity, &["severity"]),
];

/// Keys whose presence makes a nested object look like a record.
const RECORD_HINT_KEYS: &[&str] = &["name", "section", "description"];

lazy_static! {
    static ref INGREDIENT_SEPARATOR: Regex = Regex::new(r"\r?\n|;|,").unwrap();
}

pub fn aliases(field: CanonicalField) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, keys)| *keys)
        .unwrap_or(&[])
}

/// Normalize every item in `payload` into a record.
///
/// Items that are not JSON objects, or whose name resolves to an empty
/// string, are dropped.
pub fn records_from_payload(payload: &Value) -> Vec<OffenseRecord> {
    let items = payload_items(payload);
    let total = items.len();
    let records: Vec<OffenseRecord> = items.into_iter().filter_map(normalize_item).collect();

    if records.len() < total {
        tracing::debug!(
            "Dropped {} of {} payload items without usable names",
            total - records.len(),
            total
        );
    }
    records
}

/// Pick the list of candidate items out of a payload envelope.
pub fn payload_items(payload: &Value) -> Vec<&Value> {
    match payload {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => {
            for key in ["crimes", "data"] {
                if let Some(Value::Array(items)) = map.get(key) {
                    return items.iter().collect();
                }
            }

            let record_like: Vec<&Value> = map.values().filter(|v| looks_like_record(v)).collect();
            if record_like.is_empty() {
                vec![payload]
            } else {
                record_like
            }
        }
        _ => Vec::new(),
    }
}

fn looks_like_record(value: &Value) -> bool {
    match value {
        Value::Object(map) => RECORD_HINT_KEYS
            .iter()
            .any(|key| map.get(*key).is_some_and(is_truthy)),
        _ => false,
    }
}

/// Map one source object onto the canonical record shape.
pub fn normalize_item(item: &Value) -> Option<OffenseRecord> {
    let map = item.as_object()?;

    let raw_id = first_truthy(map, CanonicalField::Id);
    let name = match first_truthy(map, CanonicalField::Name) {
        Some(value) => display_string(value),
        None => match raw_id {
            Some(id) => format!("crime-{}", display_string(id)),
            None => UNKNOWN_NAME.to_string(),
        },
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        return None;
    }

    Some(OffenseRecord {
        id: raw_id.and_then(parse_id),
        name,
        section: text_or(map, CanonicalField::Section, NOT_SPECIFIED),
        ingredients: first_truthy(map, CanonicalField::Ingredients)
            .map(ingredient_list)
            .unwrap_or_default(),
        punishment: text_or(map, CanonicalField::Punishment, NOT_SPECIFIED),
        cognizable: tri_state(map, CanonicalField::Cognizable),
        bailable: tri_state(map, CanonicalField::Bailable),
        compoundable: tri_state(map, CanonicalField::Compoundable),
        severity: first_truthy(map, CanonicalField::Severity)
            .and_then(parse_severity)
            .unwrap_or(0),
        description: text_or(map, CanonicalField::Description, NO_DESCRIPTION),
    })
}

/// First aliased value that is present and not empty-ish.
fn first_truthy<'a>(map: &'a Map<String, Value>, field: CanonicalField) -> Option<&'a Value> {
    aliases(field)
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_truthy(value))
}

/// First aliased key that is present at all, even when its value is `null`.
fn first_present<'a>(map: &'a Map<String, Value>, field: CanonicalField) -> Option<&'a Value> {
    aliases(field).iter().find_map(|key| map.get(*key))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_or(map: &Map<String, Value>, field: CanonicalField, default: &str) -> String {
    first_truthy(map, field)
        .map(display_string)
        .unwrap_or_else(|| default.to_string())
}

fn tri_state(map: &Map<String, Value>, field: CanonicalField) -> TriState {
    match first_present(map, field) {
        Some(Value::Bool(b)) => TriState::from(*b),
        Some(Value::String(s)) => match s.as_str() {
            "true" | "yes" => TriState::Yes,
            "false" | "no" => TriState::No,
            _ => TriState::Unknown,
        },
        _ => TriState::Unknown,
    }
}

fn parse_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_severity(value: &Value) -> Option<u8> {
    let severity = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    u8::try_from(severity).ok().filter(|s| (1..=10).contains(s))
}

fn ingredient_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(display_string).collect(),
        Value::String(s) => {
            let parts: Vec<String> = INGREDIENT_SEPARATOR
                .split(s)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(String::from)
                .collect();
            if parts.len() > 1 {
                parts
            } else {
                vec![s.trim().to_string()]
            }
        }
        _ => Vec::new(),
    }
}

/// String form of an arbitrary JSON value as shown to users.
fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
