//! Eisenhower evaluation payload and quadrant classification.
//!
//! # Responsibility
//! - Carry the caller-supplied urgent/important payload through storage.
//! - Map an evaluation payload onto exactly one of four quadrants.
//!
//! # Invariants
//! - Classification is a pure function of `isUrgent`/`isImportant`.
//! - Missing or non-boolean flags default to `false`.
//! - An undecodable stored payload stays present but is never classified.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// One of the four mutually exclusive Eisenhower categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    UrgentImportant,
    ImportantNotUrgent,
    UrgentNotImportant,
    NotUrgentNotImportant,
}

impl Quadrant {
    /// Classifies an evaluation payload by its `isUrgent`/`isImportant` flags.
    ///
    /// Extra caller-defined fields in the payload are ignored. Flags that are
    /// missing or not booleans count as `false`.
    pub fn classify(evaluation: &Value) -> Self {
        let is_urgent = flag(evaluation, "isUrgent");
        let is_important = flag(evaluation, "isImportant");

        match (is_urgent, is_important) {
            (true, true) => Self::UrgentImportant,
            (false, true) => Self::ImportantNotUrgent,
            (true, false) => Self::UrgentNotImportant,
            (false, false) => Self::NotUrgentNotImportant,
        }
    }

    /// Stable label used in stats payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UrgentImportant => "urgent_important",
            Self::ImportantNotUrgent => "important_not_urgent",
            Self::UrgentNotImportant => "urgent_not_important",
            Self::NotUrgentNotImportant => "not_urgent_not_important",
        }
    }
}

fn flag(evaluation: &Value, key: &str) -> bool {
    evaluation.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Storage-facing state of a task's Eisenhower evaluation.
///
/// `Undecodable` carries the raw stored text verbatim so that an unrelated
/// update of the same task does not destroy or "repair" a corrupt payload.
/// Such a payload still counts as evaluated for stats but contributes to no
/// quadrant.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EvaluationState {
    /// Task has not been classified yet.
    #[default]
    Absent,
    /// A structurally valid JSON payload.
    Valid(Value),
    /// Stored text that failed to decode as JSON.
    Undecodable(String),
}

impl EvaluationState {
    /// Builds the state from the raw stored column value.
    pub fn from_stored(text: Option<String>) -> Self {
        match text {
            None => Self::Absent,
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Self::Valid(value),
                Err(_) => Self::Undecodable(raw),
            },
        }
    }

    /// Returns the payload when it is present and valid.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Valid(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the quadrant for a valid payload, `None` otherwise.
    pub fn quadrant(&self) -> Option<Quadrant> {
        self.as_value().map(Quadrant::classify)
    }

    /// Whether a payload is stored at all, valid or not.
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Serde helper: only valid payloads appear in serialized task records.
    pub fn is_hidden(&self) -> bool {
        self.as_value().is_none()
    }
}

impl Serialize for EvaluationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_value() {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// Truthiness of a JSON value, mirroring the update contract where a falsy
/// `eisenhowerEvaluation` clears the stored evaluation.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
    }
}
