//! Baseline triage from a structured record.
//!
//! Categories are checked in fixed clinical priority; the first that fires
//! decides the level:
//! 1. red-flag phrases
//! 2. vital-sign thresholds
//! 3. urgent phrases
//! 4. severity text and moderate fever
//! 5. routine default

use super::keywords::{matched_phrases, RED_FLAGS, URGENT_KEYWORDS};
use super::types::{StructuredRecord, TriageLevel, TriageResult};

/// Heart rate above this is treated as tachycardia (bpm).
pub const TACHYCARDIA_HR: i64 = 130;
/// Systolic pressure below this is critically low (mmHg).
pub const HYPOTENSION_SBP: i64 = 90;
/// Temperature at or above this is an extreme fever (°C).
pub const EXTREME_FEVER_C: f64 = 40.0;
/// Temperature at or above this is a high fever (°C).
pub const HIGH_FEVER_C: f64 = 38.5;

pub const DEFAULT_ROUTINE_REASON: &str = "No red flags found; symptoms appear non-urgent.";

/// Which category produced a result. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleCategory {
    RedFlag,
    VitalSign,
    UrgentKeyword,
    SeverityText,
    Default,
}

impl RuleCategory {
    fn as_str(self) -> &'static str {
        match self {
            Self::RedFlag => "red_flag",
            Self::VitalSign => "vital_sign",
            Self::UrgentKeyword => "urgent_keyword",
            Self::SeverityText => "severity_text",
            Self::Default => "default",
        }
    }
}

/// Evaluate a record. Never fails: malformed input has already been
/// coerced to empty values during deserialization.
pub fn evaluate(record: &StructuredRecord) -> TriageResult {
    let (category, result) = first_match(record);
    tracing::debug!(
        rule = category.as_str(),
        level = %result.level,
        "Triage rule fired"
    );
    result
}

fn first_match(record: &StructuredRecord) -> (RuleCategory, TriageResult) {
    let complaint = record.chief_complaint.to_lowercase();
    let symptoms: Vec<String> = record
        .associated_symptoms
        .iter()
        .map(|s| s.to_lowercase())
        .collect();
    let severity = record.severity.to_lowercase();

    let red_flags = matched_phrases(RED_FLAGS, &complaint, &symptoms);
    if !red_flags.is_empty() {
        return (
            RuleCategory::RedFlag,
            TriageResult::new(
                TriageLevel::Emergency,
                format!(
                    "Red flag symptoms detected ({}). Immediate medical attention required.",
                    red_flags.join(", ")
                ),
            ),
        );
    }

    // Absent vitals are 0 and never trip a threshold.
    let hr = record.vitals.heart_rate();
    let sbp = record.vitals.systolic();
    let temp = record.vitals.temperature();

    if hr > TACHYCARDIA_HR {
        return (
            RuleCategory::VitalSign,
            TriageResult::new(
                TriageLevel::Emergency,
                "Very high heart rate (>130 bpm); possible tachycardia.",
            ),
        );
    }
    if sbp != 0 && sbp < HYPOTENSION_SBP {
        return (
            RuleCategory::VitalSign,
            TriageResult::new(
                TriageLevel::Emergency,
                "Critically low blood pressure (<90 mmHg).",
            ),
        );
    }
    if temp >= EXTREME_FEVER_C {
        return (
            RuleCategory::VitalSign,
            TriageResult::new(
                TriageLevel::Emergency,
                "Extremely high fever (\u{2265}40\u{00b0}C).",
            ),
        );
    }

    let urgent = matched_phrases(URGENT_KEYWORDS, &complaint, &symptoms);
    if !urgent.is_empty() {
        return (
            RuleCategory::UrgentKeyword,
            TriageResult::new(
                TriageLevel::Urgent,
                format!(
                    "Concerning symptom(s) detected ({}). Needs prompt evaluation.",
                    urgent.join(", ")
                ),
            ),
        );
    }

    if severity.contains("severe") || (severity.contains("fever") && severity.contains("high")) {
        return (
            RuleCategory::SeverityText,
            TriageResult::new(TriageLevel::Urgent, "High severity or fever reported."),
        );
    }
    if (HIGH_FEVER_C..EXTREME_FEVER_C).contains(&temp) {
        return (
            RuleCategory::SeverityText,
            TriageResult::new(
                TriageLevel::Urgent,
                "High fever present (\u{2265}38.5\u{00b0}C).",
            ),
        );
    }

    (
        RuleCategory::Default,
        TriageResult::new(TriageLevel::Routine, DEFAULT_ROUTINE_REASON),
    )
}
