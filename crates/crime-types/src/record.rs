use serde::{Deserialize, Serialize};

/// A yes/no flag that may also be unknown.
///
/// Unknown is distinct from `No`: it serializes as JSON `null` and never
/// satisfies a boolean filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unknown,
}

impl TriState {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            TriState::Yes => Some(true),
            TriState::No => Some(false),
            TriState::Unknown => None,
        }
    }

    /// True only when the flag is known and equal to `wanted`.
    pub fn is(self, wanted: bool) -> bool {
        self.as_bool() == Some(wanted)
    }

    pub fn label(self) -> &'static str {
        match self {
            TriState::Yes => "Yes",
            TriState::No => "No",
            TriState::Unknown => "Unknown",
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::Yes
        } else {
            TriState::No
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        value.map(TriState::from).unwrap_or_default()
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        value.as_bool()
    }
}

/// One catalogued offense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenseRecord {
    /// Absent only for client-ingested records whose source carried no id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub section: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub punishment: String,
    #[serde(default)]
    pub cognizable: TriState,
    #[serde(default)]
    pub bailable: TriState,
    #[serde(default)]
    pub compoundable: TriState,
    /// 1 (least severe) to 10; 0 when the source did not rate it.
    #[serde(default)]
    pub severity: u8,
    pub description: String,
}

impl OffenseRecord {
    /// Ingredients joined the way the text filter searches them.
    pub fn ingredients_text(&self) -> String {
        self.ingredients.join(" ")
    }
}
