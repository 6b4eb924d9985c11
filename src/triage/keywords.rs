//! Fixed phrase tables for symptom matching.
//!
//! Order matters: matched phrases are reported in table order, not input order.

/// Phrases whose presence alone mandates Emergency.
pub static RED_FLAGS: &[&str] = &[
    "chest pain",
    "shortness of breath",
    "difficulty breathing",
    "severe bleeding",
    "unconscious",
    "loss of consciousness",
    "sudden weakness",
    "slurred speech",
    "seizure",
    "altered mental state",
    "vomiting blood",
    "severe abdominal pain",
];

/// Phrases that warrant prompt (same day) evaluation.
pub static URGENT_KEYWORDS: &[&str] = &[
    "high fever",
    "severe pain",
    "infection",
    "dehydration",
    "dizziness",
    "fainting",
    "persistent vomiting",
    "blood in stool",
    "severe headache",
    "pain not improving",
];

/// Phrases from `table` contained in the complaint or in any symptom.
///
/// Inputs must already be lowercased. Substring containment, so
/// "crushing chest pain" matches "chest pain".
pub fn matched_phrases(
    table: &'static [&'static str],
    complaint: &str,
    symptoms: &[String],
) -> Vec<&'static str> {
    table
        .iter()
        .copied()
        .filter(|&phrase| {
            complaint.contains(phrase) || symptoms.iter().any(|s| s.contains(phrase))
        })
        .collect()
}
