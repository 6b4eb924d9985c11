use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{Map, Value};

use super::types::{GuidelineEntry, TriageError, TriageLevel};

/// Diagnosis-keyed guideline recommendations (loaded from guidelines.json).
///
/// Immutable once built. Keys are trimmed and lowercased so lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuidelineTable {
    entries: HashMap<String, GuidelineEntry>,
}

fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Insert under the normalized key. When two names fold to the same key the
/// higher `recommended_triage` is kept; on a tie the entry already present stays.
/// Returns the entry that was dropped, if any.
fn merge_entry(
    entries: &mut HashMap<String, GuidelineEntry>,
    key: String,
    entry: GuidelineEntry,
) -> Option<GuidelineEntry> {
    match entries.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(entry);
            None
        }
        Entry::Occupied(mut slot) => {
            if entry.recommended_triage > slot.get().recommended_triage {
                Some(slot.insert(entry))
            } else {
                Some(entry)
            }
        }
    }
}

impl GuidelineTable {
    /// A table with no entries. Verification against it is a pass-through.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, GuidelineEntry)>,
    {
        let mut merged = HashMap::new();
        for (name, entry) in entries {
            merge_entry(&mut merged, normalize_key(name.as_ref()), entry);
        }
        Self { entries: merged }
    }

    /// Parse a JSON object of `name -> {recommended_triage, note}`.
    /// Malformed entries are skipped; a non-object document is an error.
    /// Names differing only in case or whitespace collapse to the most urgent entry.
    pub fn from_json_str(json: &str, source: &str) -> Result<Self, TriageError> {
        let raw: Map<String, Value> = serde_json::from_str(json)
            .map_err(|e| TriageError::GuidelineParse(source.to_string(), e.to_string()))?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (name, value) in raw {
            match GuidelineEntry::from_value(&value) {
                Some(entry) => {
                    let key = normalize_key(&name);
                    if let Some(dropped) = merge_entry(&mut entries, key.clone(), entry) {
                        tracing::warn!(
                            source,
                            diagnosis = %name,
                            key = %key,
                            dropped = %dropped.recommended_triage,
                            "Duplicate guideline entry after case folding, keeping higher triage"
                        );
                    }
                }
                None => {
                    tracing::warn!(
                        source,
                        diagnosis = %name,
                        "Skipping malformed guideline entry"
                    );
                }
            }
        }

        Ok(Self { entries })
    }

    /// Load a table from disk. Missing or unparseable files are errors.
    pub fn load(path: &Path) -> Result<Self, TriageError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            TriageError::GuidelineLoad(path.display().to_string(), e.to_string())
        })?;
        let table = Self::from_json_str(&json, &path.display().to_string())?;

        tracing::info!(
            path = %path.display(),
            entries = table.len(),
            "Guideline table loaded"
        );
        Ok(table)
    }

    /// Load a table from disk, degrading every failure to an empty table.
    pub fn load_or_empty(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!(
                path = %path.display(),
                "No guideline table found, guideline escalation disabled"
            );
            return Self::empty();
        }

        match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(error = %e, "Guideline table unusable, continuing without it");
                Self::empty()
            }
        }
    }

    /// Create a guideline table for tests (no file I/O).
    pub fn load_test() -> Self {
        Self::from_entries([
            (
                "flu",
                GuidelineEntry::new(
                    TriageLevel::Urgent,
                    "High-risk patients need antivirals within 48 hours.",
                ),
            ),
            (
                "common cold",
                GuidelineEntry::new(TriageLevel::Routine, "Supportive care."),
            ),
            (
                "pneumonia",
                GuidelineEntry::new(TriageLevel::Urgent, "Assess oxygenation same day."),
            ),
            (
                "myocardial infarction",
                GuidelineEntry::new(TriageLevel::Emergency, "Activate emergency services."),
            ),
            (
                "stroke",
                GuidelineEntry::new(TriageLevel::Emergency, "Time-critical imaging required."),
            ),
        ])
    }

    /// Look up a diagnosis, ignoring case and surrounding whitespace.
    pub fn get(&self, diagnosis: &str) -> Option<&GuidelineEntry> {
        self.entries.get(&normalize_key(diagnosis))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// GuidelineStore — atomic swap for hot reload
// ---------------------------------------------------------------------------

/// Shared holder for the active guideline table.
///
/// Readers take an `Arc` snapshot and never see a half-built table;
/// reloads build a fresh table and swap the pointer.
pub struct GuidelineStore {
    current: RwLock<Arc<GuidelineTable>>,
    source: Option<PathBuf>,
}

impl GuidelineStore {
    /// Wrap an already-built table with no backing file.
    pub fn new(table: GuidelineTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
            source: None,
        }
    }

    /// Load from `path` (empty table if unusable) and remember it for `reload`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = GuidelineTable::load_or_empty(&path);
        Self {
            current: RwLock::new(Arc::new(table)),
            source: Some(path),
        }
    }

    /// Current table. The lock only guards the pointer, so a poisoned lock
    /// still holds a valid table.
    pub fn snapshot(&self) -> Arc<GuidelineTable> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new table.
    pub fn replace(&self, table: GuidelineTable) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(table);
    }

    /// Re-read the backing file. On error the active table is kept.
    /// Returns the number of entries now active.
    pub fn reload(&self) -> Result<usize, TriageError> {
        let Some(path) = &self.source else {
            return Ok(self.snapshot().len());
        };

        let table = GuidelineTable::load(path)?;
        let count = table.len();
        self.replace(table);
        Ok(count)
    }
}

impl Default for GuidelineStore {
    fn default() -> Self {
        Self::new(GuidelineTable::empty())
    }
}
