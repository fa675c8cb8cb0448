//! Free-text lookup over a list of records.
//!
//! Resolution runs a fixed cascade and stops at the first strategy that
//! finds something: exact name, name substring, numeric id, then edit
//! distance. A fuzzy hit within [`FUZZY_ACCEPT_DISTANCE`] is treated as the
//! answer; otherwise the closest names come back as suggestions.

use std::collections::HashMap;

use serde_json::Value;

use crime_types::OffenseRecord;

use crate::dataset::Dataset;
use crate::distance::levenshtein_distance;
use crate::ingest;
use crate::pipeline::locale_cmp;

/// Largest edit distance that is silently accepted as the intended record.
///
/// Absolute, not scaled by input length.
pub const FUZZY_ACCEPT_DISTANCE: usize = 3;

/// Upper bound on suggestions returned for an unresolved lookup.
pub const MAX_SUGGESTIONS: usize = 6;

/// Default cap for [`Catalog::suggestion_names`].
pub const SUGGESTION_NAME_LIMIT: usize = 500;

/// Which cascade stage produced an exact result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Name,
    Substring,
    Id,
    Fuzzy { distance: usize },
}

/// A record and its edit distance from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate<'a> {
    pub record: &'a OffenseRecord,
    pub distance: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult<'a> {
    Exact {
        record: &'a OffenseRecord,
        strategy: MatchStrategy,
    },
    /// Closest records, nearest first, at most [`MAX_SUGGESTIONS`].
    Suggestions(Vec<MatchCandidate<'a>>),
    None,
}

impl<'a> MatchResult<'a> {
    pub fn record(&self) -> Option<&'a OffenseRecord> {
        match self {
            MatchResult::Exact { record, .. } => Some(*record),
            _ => None,
        }
    }
}

/// Records keyed by case-folded name, in first-seen order.
///
/// A later record with the same folded name replaces the earlier one in
/// place.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<OffenseRecord>,
    folded_names: Vec<String>,
}

impl Catalog {
    pub fn new(records: impl IntoIterator<Item = OffenseRecord>) -> Self {
        let mut catalog = Catalog::default();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for record in records {
            let folded = record.name.to_lowercase();
            match positions.get(&folded) {
                Some(&index) => catalog.records[index] = record,
                None => {
                    positions.insert(folded.clone(), catalog.records.len());
                    catalog.records.push(record);
                    catalog.folded_names.push(folded);
                }
            }
        }

        catalog
    }

    /// Build from an arbitrary upstream payload; see [`ingest::records_from_payload`].
    pub fn from_payload(payload: &Value) -> Self {
        Self::new(ingest::records_from_payload(payload))
    }

    pub fn records(&self) -> &[OffenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Names in display order for auto-completion.
    pub fn suggestion_names(&self, limit: usize) -> Vec<&str> {
        let mut names: Vec<&str> = self.records.iter().map(|r| r.name.as_str()).collect();
        names.sort_by(|a, b| locale_cmp(a, b));
        names.truncate(limit);
        names
    }

    /// Resolve user input to a record or a ranked suggestion list.
    ///
    /// Input is trimmed and compared case-insensitively. Blank input
    /// resolves to [`MatchResult::None`]; callers are expected to prompt for
    /// a value before getting here.
    pub fn resolve(&self, raw: &str) -> MatchResult<'_> {
        let raw = raw.trim();
        if raw.is_empty() {
            return MatchResult::None;
        }
        let key = raw.to_lowercase();

        if let Some(index) = self.folded_names.iter().position(|n| *n == key) {
            return self.exact(index, MatchStrategy::Name);
        }

        if let Some(index) = self.folded_names.iter().position(|n| n.contains(&key)) {
            return self.exact(index, MatchStrategy::Substring);
        }

        if let Some(record) = self.find_by_number(raw) {
            return MatchResult::Exact {
                record,
                strategy: MatchStrategy::Id,
            };
        }

        self.fuzzy(&key)
    }

    fn exact(&self, index: usize, strategy: MatchStrategy) -> MatchResult<'_> {
        MatchResult::Exact {
            record: &self.records[index],
            strategy,
        }
    }

    fn find_by_number(&self, raw: &str) -> Option<&OffenseRecord> {
        let number = raw.parse::<f64>().ok().filter(|n| n.is_finite())?;
        self.records
            .iter()
            .find(|r| r.id.is_some_and(|id| id as f64 == number))
    }

    fn fuzzy(&self, key: &str) -> MatchResult<'_> {
        let mut candidates: Vec<MatchCandidate<'_>> = self
            .records
            .iter()
            .zip(&self.folded_names)
            .map(|(record, name)| MatchCandidate {
                record,
                distance: levenshtein_distance(name, key),
            })
            .collect();

        // Stable: equal distances keep catalog order
        candidates.sort_by_key(|c| c.distance);
        candidates.truncate(MAX_SUGGESTIONS);

        match candidates.first() {
            None => MatchResult::None,
            Some(best) if best.distance <= FUZZY_ACCEPT_DISTANCE => MatchResult::Exact {
                record: best.record,
                strategy: MatchStrategy::Fuzzy {
                    distance: best.distance,
                },
            },
            Some(_) => MatchResult::Suggestions(candidates),
        }
    }
}

impl From<&Dataset> for Catalog {
    fn from(dataset: &Dataset) -> Self {
        Catalog::new(dataset.records().iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crime_types::TriState;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn record(id: Option<u64>, name: &str) -> OffenseRecord {
        OffenseRecord {
            id,
            name: name.to_string(),
            section: "Not specified".to_string(),
            ingredients: vec![],
            punishment: "Not specified".to_string(),
            cognizable: TriState::Unknown,
            bailable: TriState::Unknown,
            compoundable: TriState::Unknown,
            severity: 0,
            description: "No description available.".to_string(),
        }
    }

    fn embedded() -> Catalog {
        Catalog::from(&Dataset::embedded().unwrap())
    }

    fn resolved_id(result: &MatchResult<'_>) -> Option<u64> {
        result.record().and_then(|r| r.id)
    }

    #[test]
    fn test_exact_name_is_case_insensitive() {
        let catalog = embedded();
        let result = catalog.resolve("  MURDER (ipc 302) ");
        assert_eq!(resolved_id(&result), Some(1));
        assert!(matches!(
            result,
            MatchResult::Exact {
                strategy: MatchStrategy::Name,
                ..
            }
        ));
    }

    #[test]
    fn test_theft_resolves_by_substring() {
        let catalog = embedded();
        let result = catalog.resolve("theft");
        assert_eq!(
            result,
            MatchResult::Exact {
                record: &catalog.records()[13],
                strategy: MatchStrategy::Substring,
            }
        );
        assert_eq!(resolved_id(&result), Some(14));
    }

    #[test]
    fn test_substring_prefers_catalog_order() {
        // "murder" appears in ids 1, 2 and 3; the first in catalog order wins
        let catalog = embedded();
        assert_eq!(resolved_id(&catalog.resolve("murder")), Some(1));
    }

    #[test]
    fn test_exact_name_beats_earlier_substring() {
        let catalog = Catalog::new(vec![record(Some(1), "Stalking Online"), record(Some(2), "Stalking")]);
        assert_eq!(resolved_id(&catalog.resolve("stalking")), Some(2));
    }

    #[test]
    fn test_numeric_id_lookup() {
        let catalog = embedded();
        let result = catalog.resolve("33");
        assert_eq!(resolved_id(&result), Some(33));
        assert!(matches!(
            result,
            MatchResult::Exact {
                strategy: MatchStrategy::Id,
                ..
            }
        ));
        assert_eq!(resolved_id(&catalog.resolve("33.0")), Some(33));
    }

    #[test]
    fn test_substring_runs_before_id() {
        // "302" is in the name "Murder (IPC 302)" even though no record has id 302
        let catalog = embedded();
        assert_eq!(resolved_id(&catalog.resolve("302")), Some(1));
        // "25" is id 25 but also part of "Grievous Hurt (IPC 325)"
        assert_eq!(resolved_id(&catalog.resolve("25")), Some(12));
    }

    #[test]
    fn test_small_typo_is_accepted() {
        let catalog = Catalog::new(vec![record(Some(1), "Murder"), record(Some(2), "Theft")]);
        let result = catalog.resolve("muder");
        assert_eq!(resolved_id(&result), Some(1));
        assert!(matches!(
            result,
            MatchResult::Exact {
                strategy: MatchStrategy::Fuzzy { distance: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_typo_in_full_name_is_accepted() {
        let catalog = embedded();
        assert_eq!(resolved_id(&catalog.resolve("cyber stalkng")), Some(22));
        assert_eq!(resolved_id(&catalog.resolve("Arsen (IPC 435/436)")), Some(31));
    }

    #[test]
    fn test_distant_input_returns_suggestions() {
        let catalog = embedded();
        let MatchResult::Suggestions(candidates) = catalog.resolve("xyzxyz") else {
            panic!("expected suggestions");
        };

        assert_eq!(candidates.len(), MAX_SUGGESTIONS);
        assert!(candidates.iter().all(|c| c.distance > FUZZY_ACCEPT_DISTANCE));
        assert!(candidates.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(candidates[0].record.name, "Cyber Stalking");
        assert_eq!(candidates[0].distance, 13);
    }

    #[test]
    fn test_fewer_records_than_suggestion_cap() {
        let catalog = Catalog::new(vec![record(Some(1), "Arson"), record(Some(2), "Bribery")]);
        let MatchResult::Suggestions(candidates) = catalog.resolve("zzzzzzzzz") else {
            panic!("expected suggestions");
        };
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_equal_distances_keep_catalog_order() {
        let catalog = Catalog::new(vec![record(Some(1), "bbbb"), record(Some(2), "cccc")]);
        let MatchResult::Suggestions(candidates) = catalog.resolve("zzzzzzzz") else {
            panic!("expected suggestions");
        };
        let ids: Vec<_> = candidates.iter().map(|c| c.record.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_empty_catalog_and_blank_input() {
        assert_eq!(Catalog::default().resolve("murder"), MatchResult::None);
        assert_eq!(embedded().resolve("   "), MatchResult::None);
    }

    #[test]
    fn test_records_without_id_never_match_numbers() {
        let catalog = Catalog::new(vec![record(None, "Arson")]);
        assert!(matches!(catalog.resolve("0"), MatchResult::Suggestions(_)));
    }

    #[test]
    fn test_duplicate_names_replace_in_place() {
        let catalog = Catalog::new(vec![
            record(Some(1), "Arson"),
            record(Some(2), "Bribery"),
            record(Some(3), "ARSON"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.records()[0].id, Some(3));
        assert_eq!(resolved_id(&catalog.resolve("arson")), Some(3));
    }

    #[test]
    fn test_from_payload() {
        let catalog = Catalog::from_payload(&json!({
            "crimes": [{ "id": 1, "title": "Murder" }, { "id": 2, "crime": "Theft" }]
        }));
        assert_eq!(resolved_id(&catalog.resolve("theft")), Some(2));
    }

    #[test]
    fn test_suggestion_names_sorted_and_capped() {
        let catalog = embedded();
        let names = catalog.suggestion_names(3);
        assert_eq!(
            names,
            vec!["Acid Attack (IPC 326A)", "Arson (IPC 435/436)", "Assault (IPC 351/352)"]
        );
        assert_eq!(catalog.suggestion_names(SUGGESTION_NAME_LIMIT).len(), 50);
    }

    proptest! {
        #[test]
        fn exact_name_always_returns_that_record(
            names in prop::collection::vec("[A-Za-z]{1,6}( [A-Za-z]{1,6})?", 1..12),
            pick in any::<prop::sample::Index>(),
        ) {
            let records: Vec<OffenseRecord> = names
                .iter()
                .enumerate()
                .map(|(i, n)| record(Some(i as u64 + 1), n))
                .collect();
            let catalog = Catalog::new(records);

            let target = &catalog.records()[pick.index(catalog.len())];
            let result = catalog.resolve(&target.name);
            let resolved = result.record().map(|r| r.name.to_lowercase());
            prop_assert_eq!(resolved, Some(target.name.to_lowercase()));
        }
    }
}
