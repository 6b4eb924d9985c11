use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// TriageLevel
// ---------------------------------------------------------------------------

/// Urgency classification for an encounter.
/// Declaration order is priority order: `Routine < Urgent < Emergency`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TriageLevel {
    /// Non-urgent, no red flags.
    #[default]
    Routine,
    /// Needs prompt evaluation (same day).
    Urgent,
    /// Immediate care required.
    Emergency,
}

impl TriageLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Routine => "Routine",
            Self::Urgent => "Urgent",
            Self::Emergency => "Emergency",
        }
    }

    /// Case-insensitive name lookup. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "routine" => Some(Self::Routine),
            "urgent" => Some(Self::Urgent),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }
}

impl std::fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TriageResult
// ---------------------------------------------------------------------------

/// Level plus the human-readable rule that decided it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResult {
    pub level: TriageLevel,
    pub reason: String,
}

impl TriageResult {
    pub fn new(level: TriageLevel, reason: impl Into<String>) -> Self {
        Self {
            level,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// StructuredRecord — extractor output
// ---------------------------------------------------------------------------

/// Normalized conversation content handed over by the symptom extractor.
///
/// Deserialization never rejects well-formed JSON: a non-object document is an
/// empty record, nulls and wrong-typed fields fall back to empty values, and
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredRecord {
    pub chief_complaint: String,
    pub associated_symptoms: Vec<String>,
    pub severity: String,
    pub vitals: Vitals,
}

impl StructuredRecord {
    /// Build from an arbitrary JSON value. Anything but an object yields an empty record.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        Self {
            chief_complaint: map
                .get("chief_complaint")
                .map(lenient_string)
                .unwrap_or_default(),
            associated_symptoms: map
                .get("associated_symptoms")
                .map(lenient_string_list)
                .unwrap_or_default(),
            severity: map.get("severity").map(lenient_string).unwrap_or_default(),
            vitals: map.get("vitals").map(Vitals::from_value).unwrap_or_default(),
        }
    }

    /// Parse extractor output. Only invalid JSON syntax is an error.
    pub fn from_json_str(json: &str) -> Result<Self, TriageError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| TriageError::RecordParse(e.to_string()))?;
        Ok(Self::from_value(&value))
    }
}

impl<'de> Deserialize<'de> for StructuredRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Vital signs as reported. `None` means absent or unparseable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vitals {
    /// Heart rate, beats per minute.
    pub hr: Option<i64>,
    /// Systolic blood pressure, mmHg.
    pub sbp: Option<i64>,
    /// Temperature, degrees Celsius.
    pub temp: Option<f64>,
}

impl Vitals {
    /// Build from an arbitrary JSON value. Anything but an object yields all-absent.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        Self {
            hr: map.get("hr").and_then(int_like),
            sbp: map.get("sbp").and_then(int_like),
            temp: map.get("temp").and_then(float_like),
        }
    }

    /// Heart rate with absent coerced to 0.
    pub fn heart_rate(&self) -> i64 {
        self.hr.unwrap_or(0)
    }

    /// Systolic pressure with absent coerced to 0.
    pub fn systolic(&self) -> i64 {
        self.sbp.unwrap_or(0)
    }

    /// Temperature with absent coerced to 0.0.
    pub fn temperature(&self) -> f64 {
        self.temp.unwrap_or(0.0)
    }
}

impl<'de> Deserialize<'de> for Vitals {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Integer-like: JSON integers, fractional numbers (truncated), or integer text.
fn int_like(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Numeric-like: any finite JSON number or numeric text.
fn float_like(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn lenient_string(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

fn lenient_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// GuidelineEntry
// ---------------------------------------------------------------------------

/// Guideline recommendation for one diagnosis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineEntry {
    pub recommended_triage: TriageLevel,
    pub note: String,
}

impl GuidelineEntry {
    pub fn new(recommended_triage: TriageLevel, note: impl Into<String>) -> Self {
        Self {
            recommended_triage,
            note: note.into(),
        }
    }

    /// Tolerant conversion from a table value.
    /// Returns `None` for non-objects; missing or unknown fields take defaults.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let recommended_triage = map
            .get("recommended_triage")
            .and_then(Value::as_str)
            .and_then(TriageLevel::from_name)
            .unwrap_or_default();
        let note = map
            .get("note")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Some(Self {
            recommended_triage,
            note,
        })
    }
}

// ---------------------------------------------------------------------------
// TriageError
// ---------------------------------------------------------------------------

/// Loading and parsing failures. Evaluation and verification never produce these.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Guideline table load failed ({0}): {1}")]
    GuidelineLoad(String, String),

    #[error("Guideline table parse failed ({0}): {1}")]
    GuidelineParse(String, String),

    #[error("Record is not valid JSON: {0}")]
    RecordParse(String),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::triage::rules::evaluate;

    #[test]
    fn level_ordering_follows_priority() {
        assert!(TriageLevel::Routine < TriageLevel::Urgent);
        assert!(TriageLevel::Urgent < TriageLevel::Emergency);
        assert_eq!(
            TriageLevel::Routine.max(TriageLevel::Emergency),
            TriageLevel::Emergency
        );
    }

    #[test]
    fn level_from_name_is_case_insensitive() {
        assert_eq!(TriageLevel::from_name("URGENT"), Some(TriageLevel::Urgent));
        assert_eq!(
            TriageLevel::from_name(" emergency "),
            Some(TriageLevel::Emergency)
        );
        assert_eq!(TriageLevel::from_name("Normal"), None);
    }

    #[test]
    fn level_serializes_as_name() {
        let json = serde_json::to_string(&TriageLevel::Emergency).unwrap();
        assert_eq!(json, "\"Emergency\"");
    }

    #[test]
    fn record_tolerates_nulls_and_wrong_types() {
        let record: StructuredRecord = serde_json::from_value(json!({
            "chief_complaint": null,
            "associated_symptoms": ["cough", 42, null, "fever"],
            "severity": 7,
            "vitals": {"hr": "abc", "sbp": null, "temp": null},
            "duration": "3 days"
        }))
        .unwrap();

        assert_eq!(record.chief_complaint, "");
        assert_eq!(record.associated_symptoms, vec!["cough", "fever"]);
        assert_eq!(record.severity, "");
        assert_eq!(record.vitals, Vitals::default());
    }

    #[test]
    fn record_from_empty_object() {
        let record: StructuredRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, StructuredRecord::default());
    }

    #[test]
    fn non_object_documents_become_empty_records() {
        for json in ["null", "\"chest pain\"", "42", "[\"chest pain\"]"] {
            let record: StructuredRecord = serde_json::from_str(json).unwrap();
            assert_eq!(record, StructuredRecord::default(), "input: {json}");
            assert_eq!(evaluate(&record).level, TriageLevel::Routine);
        }
    }

    #[test]
    fn record_from_json_str_only_rejects_bad_syntax() {
        let record = StructuredRecord::from_json_str("null").unwrap();
        assert_eq!(record, StructuredRecord::default());

        let record =
            StructuredRecord::from_json_str(r#"{"chief_complaint": "Chest pain"}"#).unwrap();
        assert_eq!(evaluate(&record).level, TriageLevel::Emergency);

        let err = StructuredRecord::from_json_str("{chief_complaint").unwrap_err();
        assert!(matches!(err, TriageError::RecordParse(_)));
    }

    #[test]
    fn bare_symptom_string_becomes_single_entry() {
        let record: StructuredRecord =
            serde_json::from_value(json!({"associated_symptoms": "dizziness"})).unwrap();
        assert_eq!(record.associated_symptoms, vec!["dizziness"]);
    }

    #[test]
    fn vitals_accept_numeric_text() {
        let vitals = Vitals::from_value(&json!({"hr": " 120 ", "sbp": 85.9, "temp": "38.7"}));
        assert_eq!(vitals.hr, Some(120));
        assert_eq!(vitals.sbp, Some(85));
        assert_eq!(vitals.temp, Some(38.7));
    }

    #[test]
    fn vitals_reject_non_numeric() {
        let vitals = Vitals::from_value(&json!({"hr": true, "sbp": "low", "temp": "NaN"}));
        assert_eq!(vitals.heart_rate(), 0);
        assert_eq!(vitals.systolic(), 0);
        assert_eq!(vitals.temperature(), 0.0);
    }

    #[test]
    fn vitals_non_object_is_absent() {
        assert_eq!(Vitals::from_value(&json!("120/80")), Vitals::default());
        assert_eq!(Vitals::from_value(&Value::Null), Vitals::default());
    }

    #[test]
    fn guideline_entry_defaults() {
        let entry = GuidelineEntry::from_value(&json!({})).unwrap();
        assert_eq!(entry.recommended_triage, TriageLevel::Routine);
        assert_eq!(entry.note, "");

        let entry =
            GuidelineEntry::from_value(&json!({"recommended_triage": "Critical", "note": 5}))
                .unwrap();
        assert_eq!(entry, GuidelineEntry::default());
    }

    #[test]
    fn guideline_entry_rejects_non_object() {
        assert!(GuidelineEntry::from_value(&json!("Urgent")).is_none());
    }
}
