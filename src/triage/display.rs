use serde::{Deserialize, Serialize};

use super::types::{TriageLevel, TriageResult};

impl TriageLevel {
    /// Banner colour for the presentation layer.
    pub fn color(self) -> &'static str {
        match self {
            Self::Emergency => "#e63946",
            Self::Urgent => "#ff8800",
            Self::Routine => "#2a9d8f",
        }
    }

    /// One-line status text shown next to the banner.
    pub fn status(self) -> &'static str {
        match self {
            Self::Emergency => "Emergency - Immediate care required!",
            Self::Urgent => "Urgent - Needs prompt medical attention.",
            Self::Routine => "Routine - Non-urgent.",
        }
    }
}

/// Triage outcome shaped for display and session logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageDisplay {
    pub level: TriageLevel,
    pub reason: String,
    pub color: String,
    pub status: String,
}

impl From<TriageResult> for TriageDisplay {
    fn from(result: TriageResult) -> Self {
        Self {
            level: result.level,
            color: result.level.color().to_string(),
            status: result.level.status().to_string(),
            reason: result.reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_reason_and_colour() {
        let display = TriageDisplay::from(TriageResult::new(TriageLevel::Urgent, "dizziness"));
        assert_eq!(display.level, TriageLevel::Urgent);
        assert_eq!(display.reason, "dizziness");
        assert_eq!(display.color, "#ff8800");
        assert!(display.status.starts_with("Urgent"));
    }

    #[test]
    fn each_level_has_distinct_status() {
        let levels = [TriageLevel::Routine, TriageLevel::Urgent, TriageLevel::Emergency];
        for level in levels {
            assert!(level.status().starts_with(level.as_str()));
        }
        assert_ne!(TriageLevel::Emergency.color(), TriageLevel::Routine.color());
    }

    #[test]
    fn display_serializes_level_name() {
        let display = TriageDisplay::from(TriageResult::new(TriageLevel::Emergency, "r"));
        let json = serde_json::to_value(&display).unwrap();
        assert_eq!(json["level"], "Emergency");
        assert_eq!(json["color"], "#e63946");
    }
}
