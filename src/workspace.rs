// 🗂️ Diff Workspace - owns the active classified set
// Atomic replace on re-ingestion, review flags, classification-free views

use anyhow::Result;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use crate::classifier::{ClassifiedSet, Classifier};
use crate::config::RankConfig;
use crate::loader;
use crate::record::{NameUsage, NameValue, RawRecord};

/// Orderings a consumer can request without re-classifying
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOrder {
    /// Default: highest occurrence count first
    CountDesc,
    CountAsc,
    /// Lexicographic on the current interpretation of a column
    CurrentValue(String),
}

// ============================================================================
// WORKSPACE
// ============================================================================

/// Holds the active classified set between ingestions.
///
/// Ingestion builds a complete new set and publishes it with a single
/// assignment - a consumer holding the previous set never observes a
/// partially classified mix. Review flags live in a ledger keyed by the
/// record's content-stable natural key, so they survive re-ingestion of a
/// newer diff export for the same names.
pub struct DiffWorkspace {
    classifier: Classifier,
    active: Option<ClassifiedSet>,
    reviewed: HashMap<String, bool>,
}

impl DiffWorkspace {
    pub fn new() -> Self {
        DiffWorkspace {
            classifier: Classifier::new(),
            active: None,
            reviewed: HashMap::new(),
        }
    }

    pub fn with_config(config: RankConfig) -> Self {
        DiffWorkspace {
            classifier: Classifier::with_config(config),
            active: None,
            reviewed: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RankConfig {
        self.classifier.config()
    }

    pub fn active(&self) -> Option<&ClassifiedSet> {
        self.active.as_ref()
    }

    /// Classify a row set and make it the active one.
    ///
    /// The whole pass runs on a fresh allocation; the previous set stays
    /// active until the final assignment below.
    pub fn ingest(&mut self, rows: &[RawRecord]) -> &ClassifiedSet {
        let mut set = self.classifier.classify(rows);

        for record in &mut set.records {
            if let Some(flag) = self.reviewed.get(&record.natural_key) {
                record.reviewed = *flag;
            }
        }

        self.active.insert(set)
    }

    /// Load and classify a diff export. On failure the previous active set
    /// remains published.
    pub fn ingest_file(&mut self, path: &Path) -> Result<&ClassifiedSet> {
        let rows = loader::load_tsv(path)?;
        Ok(self.ingest(&rows))
    }

    /// Flip the review flag of one record. Returns false when the id is
    /// unknown. Classification results are never touched.
    pub fn set_reviewed(&mut self, id: usize, reviewed: bool) -> bool {
        let set = match self.active.as_mut() {
            Some(set) => set,
            None => return false,
        };

        for record in &mut set.records {
            if record.id == id {
                record.reviewed = reviewed;
                self.reviewed.insert(record.natural_key.clone(), reviewed);
                return true;
            }
        }
        false
    }

    // ========================================================================
    // CLASSIFICATION-FREE VIEWS
    // ========================================================================

    fn records(&self) -> &[NameUsage] {
        self.active
            .as_ref()
            .map(|set| set.records.as_slice())
            .unwrap_or(&[])
    }

    /// Records whose change map contains the key
    pub fn filter_changed(&self, key: &str) -> Vec<&NameUsage> {
        self.records()
            .iter()
            .filter(|record| record.has_changed(key))
            .collect()
    }

    /// Records whose change map does not contain the key
    pub fn filter_unchanged(&self, key: &str) -> Vec<&NameUsage> {
        self.records()
            .iter()
            .filter(|record| !record.has_changed(key))
            .collect()
    }

    /// Records not yet marked reviewed
    pub fn unreviewed(&self) -> Vec<&NameUsage> {
        self.records()
            .iter()
            .filter(|record| !record.reviewed)
            .collect()
    }

    /// Substring search against the current OR proposed interpretation of
    /// the chosen column (rank or field)
    pub fn search(&self, column: &str, query: &str) -> Vec<&NameUsage> {
        self.records()
            .iter()
            .filter(|record| {
                contains(record.current_value(column), query)
                    || contains(record.proposed_value(column), query)
            })
            .collect()
    }

    /// A reordered view of the active records. The active set itself keeps
    /// its default count-descending order.
    pub fn sorted_by(&self, order: SortOrder) -> Vec<&NameUsage> {
        let mut view: Vec<&NameUsage> = self.records().iter().collect();

        match &order {
            SortOrder::CountDesc => view.sort_by(|a, b| b.count.cmp(&a.count)),
            SortOrder::CountAsc => view.sort_by(|a, b| a.count.cmp(&b.count)),
            SortOrder::CurrentValue(column) => view.sort_by(|a, b| {
                let left = a.current_value(column).and_then(NameValue::as_name);
                let right = b.current_value(column).and_then(NameValue::as_name);
                match (left, right) {
                    (Some(left), Some(right)) => left.cmp(right),
                    // Records without a value sort to the end
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }),
        }

        view
    }
}

impl Default for DiffWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

fn contains(value: Option<&NameValue>, query: &str) -> bool {
    value
        .and_then(NameValue::as_name)
        .map(|name| name.contains(query))
        .unwrap_or(false)
}

// ============================================================================
// TESTS
// ============================================================================
