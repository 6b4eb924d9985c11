use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::guidelines::{GuidelineStore, GuidelineTable};
use super::rules::evaluate;
use super::types::{StructuredRecord, TriageResult};
use super::verifier::verify;

/// Raw rule output alongside the guideline-verified result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub raw: TriageResult,
    pub verified: TriageResult,
    pub escalated: bool,
}

/// Runs rule evaluation followed by guideline verification.
///
/// Holds no per-call state; share it behind an `Arc` across callers.
pub struct TriageEngine {
    guidelines: Arc<GuidelineStore>,
}

impl TriageEngine {
    pub fn new(guidelines: Arc<GuidelineStore>) -> Self {
        Self { guidelines }
    }

    /// Engine over a fixed table.
    pub fn with_table(table: GuidelineTable) -> Self {
        Self::new(Arc::new(GuidelineStore::new(table)))
    }

    pub fn guidelines(&self) -> &GuidelineStore {
        &self.guidelines
    }

    /// Final triage result for a record and its candidate diagnoses.
    pub fn triage<S: AsRef<str>>(
        &self,
        record: &StructuredRecord,
        candidates: &[S],
    ) -> TriageResult {
        self.assess(record, candidates).verified
    }

    /// Evaluate then verify against one consistent table snapshot.
    pub fn assess<S: AsRef<str>>(
        &self,
        record: &StructuredRecord,
        candidates: &[S],
    ) -> TriageAssessment {
        let start = Instant::now();
        let table = self.guidelines.snapshot();

        let raw = evaluate(record);
        let verified = verify(raw.clone(), candidates, &table);
        let escalated = verified.level != raw.level;

        tracing::info!(
            raw = %raw.level,
            verified = %verified.level,
            escalated,
            candidates = candidates.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Triage complete"
        );

        TriageAssessment {
            raw,
            verified,
            escalated,
        }
    }
}
