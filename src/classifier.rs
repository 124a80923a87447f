// 🧮 Classifier - single pass over the record set
// Produces annotated records plus the aggregate change summary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::comparator;
use crate::config::RankConfig;
use crate::record::{NameUsage, RawRecord};

/// Change-key → number of records changed under that key.
/// Holds an explicit zero for every configured key and is rebuilt whole on
/// every pass, never incrementally patched.
pub type ChangeSummary = BTreeMap<String, usize>;

// ============================================================================
// CLASSIFIED SET
// ============================================================================

/// The output of one classification pass: annotated records sorted
/// descending by occurrence count, plus the aggregate summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedSet {
    pub records: Vec<NameUsage>,
    pub summary: ChangeSummary,
    pub classified_at: DateTime<Utc>,
}

impl ClassifiedSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records changed under a key (0 for unknown keys)
    pub fn changed_count(&self, key: &str) -> usize {
        self.summary.get(key).copied().unwrap_or(0)
    }

    pub fn summary_line(&self) -> String {
        let changed = self
            .records
            .iter()
            .filter(|record| !record.changes.is_empty())
            .count();
        format!(
            "{} records, {} with at least one change across {} tracked keys",
            self.records.len(),
            changed,
            self.summary.len()
        )
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

pub struct Classifier {
    config: RankConfig,
}

impl Classifier {
    pub fn new() -> Self {
        Classifier {
            config: RankConfig::default(),
        }
    }

    pub fn with_config(config: RankConfig) -> Self {
        Classifier { config }
    }

    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Classify a fully materialized row set.
    ///
    /// Single pass, O(records × (ranks + fields)). Deterministic: the same
    /// input always yields the same change sets and summary. The returned
    /// set is complete - there is no partial publication.
    pub fn classify(&self, rows: &[RawRecord]) -> ClassifiedSet {
        let mut summary: ChangeSummary = ChangeSummary::new();
        for key in self.config.change_keys() {
            summary.insert(key, 0);
        }

        let mut records: Vec<NameUsage> = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let mut record = NameUsage::from_row(row, &self.config, index);
            let mut changed: Vec<String> = Vec::new();

            for rank in &self.config.ranks {
                if let Some(values) = record.rank(rank) {
                    if comparator::values_differ(values) {
                        changed.push(rank.clone());
                    }
                    // The name and its stable key are tracked independently
                    if comparator::key_differs(values) {
                        changed.push(format!("{}Key", rank));
                    }
                }
            }

            for field in &self.config.fields {
                if let Some(values) = record.field(field) {
                    if comparator::field_differs(values) {
                        changed.push(field.clone());
                    }
                }
            }

            for key in changed {
                if let Some(count) = summary.get_mut(&key) {
                    *count += 1;
                }
                record.changes.insert(key);
            }

            records.push(record);
        }

        // Default ordering: descending by count; the sort is stable, so ties
        // keep ingestion order
        records.sort_by(|a, b| b.count.cmp(&a.count));

        ClassifiedSet {
            records,
            summary,
            classified_at: Utc::now(),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
