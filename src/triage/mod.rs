//! Clinical triage: rule-based urgency plus guideline escalation.

pub mod display;
pub mod engine;
pub mod guidelines;
pub mod keywords;
pub mod rules;
pub mod types;
pub mod verifier;

pub use display::TriageDisplay;
pub use engine::{TriageAssessment, TriageEngine};
pub use guidelines::{GuidelineStore, GuidelineTable};
pub use rules::evaluate;
pub use types::{GuidelineEntry, StructuredRecord, TriageError, TriageLevel, TriageResult, Vitals};
pub use verifier::verify;
