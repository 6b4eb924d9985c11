use super::guidelines::GuidelineTable;
use super::types::TriageResult;

/// Cross-check a triage result against diagnosis guidelines.
///
/// Walks `candidates` in order and returns on the first diagnosis whose
/// recommended level is strictly higher than the current one. Never lowers
/// a level. Unknown diagnoses and an empty table leave the result as is.
pub fn verify<S: AsRef<str>>(
    result: TriageResult,
    candidates: &[S],
    table: &GuidelineTable,
) -> TriageResult {
    for candidate in candidates {
        let diagnosis = candidate.as_ref().trim();
        let Some(entry) = table.get(diagnosis) else {
            continue;
        };

        if entry.recommended_triage > result.level {
            tracing::warn!(
                diagnosis,
                from = %result.level,
                to = %entry.recommended_triage,
                "Triage upgraded per guideline"
            );
            return TriageResult::new(
                entry.recommended_triage,
                format!("Upgraded per guideline for {diagnosis}: {}", entry.note),
            );
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::types::{GuidelineEntry, TriageLevel};

    fn routine() -> TriageResult {
        TriageResult::new(TriageLevel::Routine, "x")
    }

    #[test]
    fn upgrades_routine_to_guideline_level() {
        let table =
            GuidelineTable::from_entries([("flu", GuidelineEntry::new(TriageLevel::Urgent, "n"))]);
        let result = verify(routine(), &["flu"], &table);
        assert_eq!(result.level, TriageLevel::Urgent);
        assert!(result.reason.contains("flu"));
        assert!(result.reason.contains("n"));
        assert_eq!(result.reason, "Upgraded per guideline for flu: n");
    }

    #[test]
    fn never_downgrades() {
        let table = GuidelineTable::load_test();
        let emergency = TriageResult::new(TriageLevel::Emergency, "red flag");
        let result = verify(emergency.clone(), &["common cold"], &table);
        assert_eq!(result, emergency);
    }

    #[test]
    fn equal_level_is_not_an_upgrade() {
        let table = GuidelineTable::load_test();
        let urgent = TriageResult::new(TriageLevel::Urgent, "keyword");
        assert_eq!(verify(urgent.clone(), &["flu"], &table), urgent);
    }

    #[test]
    fn first_qualifying_diagnosis_wins() {
        let table = GuidelineTable::load_test();
        let result = verify(routine(), &["common cold", "flu", "stroke"], &table);
        assert_eq!(result.level, TriageLevel::Urgent);
        assert!(result.reason.contains("flu"));
    }

    #[test]
    fn lookup_ignores_case_and_keeps_caller_spelling() {
        let table = GuidelineTable::load_test();
        let result = verify(routine(), &["Stroke"], &table);
        assert_eq!(result.level, TriageLevel::Emergency);
        assert!(result.reason.starts_with("Upgraded per guideline for Stroke:"));
    }

    #[test]
    fn unknown_or_empty_candidates_pass_through() {
        let table = GuidelineTable::load_test();
        assert_eq!(verify(routine(), &["measles"], &table), routine());
        assert_eq!(verify(routine(), &[] as &[&str], &table), routine());
    }

    #[test]
    fn empty_table_is_noop() {
        let table = GuidelineTable::empty();
        assert_eq!(verify(routine(), &["flu", "stroke"], &table), routine());
    }

    #[test]
    fn entry_without_level_never_upgrades() {
        let table = GuidelineTable::from_json_str(r#"{"flu": {"note": "n"}}"#, "inline").unwrap();
        assert_eq!(verify(routine(), &["flu"], &table), routine());
    }

    #[test]
    fn rerun_on_own_output_is_stable() {
        let table = GuidelineTable::load_test();
        let candidates = vec!["flu".to_string(), "common cold".to_string()];
        let once = verify(routine(), &candidates, &table);
        let twice = verify(once.clone(), &candidates, &table);
        assert_eq!(once, twice);
    }
}
