use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accepted shapes of the generated JSON, tried in order.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum NarrativePayload {
    List(Vec<Value>),
    Suggestions { suggestions: Vec<Value> },
    Places { places: Vec<Value> },
    /// Any other object: its first array-valued field is used.
    Keyed(Map<String, Value>),
}

impl NarrativePayload {
    pub fn into_items(self) -> Option<Vec<Value>> {
        match self {
            NarrativePayload::List(items)
            | NarrativePayload::Suggestions { suggestions: items }
            | NarrativePayload::Places { places: items } => Some(items),
            NarrativePayload::Keyed(map) => map.into_iter().find_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            }),
        }
    }
}

/// One generated stop before geocoding. Every field is checked individually.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct RawSuggestion {
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}
