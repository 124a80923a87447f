// 🌿 Record Model - Name usages compared across three interpretation sources
// verbatim (raw text), current (accepted backbone), proposed (candidate backbone)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::RankConfig;

// ============================================================================
// COLUMN NAMING
// ============================================================================

pub const VERBATIM_PREFIX: &str = "verbatim_";
pub const CURRENT_PREFIX: &str = "current_";
pub const PROPOSED_PREFIX: &str = "proposed_";

/// Sentinel string the diff export writes when a name had no backbone match
pub const UNMATCHED_SENTINEL: &str = "unmatched";

/// One raw ingestion row: column name → scalar value (string, number or null)
pub type RawRecord = HashMap<String, Value>;

// ============================================================================
// NAME VALUE
// ============================================================================

/// One interpretation cell.
///
/// The diff export uses the literal string "unmatched" as a pseudo-null for
/// "no interpretation exists". Representing it as its own variant keeps the
/// magic string out of the predicate logic while preserving its equality
/// behaviour: `Unmatched` equals only `Unmatched`, exactly like the sentinel
/// string equals only itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameValue {
    /// Column absent or null in the source row
    Missing,
    /// The "unmatched" sentinel: the source had no interpretation
    Unmatched,
    /// An actual name string
    Name(String),
}

impl NameValue {
    /// Convert a raw scalar into a name value
    pub fn from_scalar(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => NameValue::Missing,
            Some(Value::String(text)) if text == UNMATCHED_SENTINEL => NameValue::Unmatched,
            Some(Value::String(text)) => NameValue::Name(text.clone()),
            Some(other) => NameValue::Name(scalar_to_string(other)),
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            NameValue::Name(name) => Some(name),
            _ => None,
        }
    }

    /// True only for a real name, not for `Missing` or `Unmatched`
    pub fn is_name(&self) -> bool {
        matches!(self, NameValue::Name(_))
    }
}

/// Render a non-string scalar the way the tab-separated source wrote it
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

/// Stable-identifier columns (`<prefix>_<rank>Key`) keep their scalar form
fn key_from_scalar(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => Some(scalar_to_string(other)),
    }
}

// ============================================================================
// PER-RANK AND PER-FIELD TRIPLETS
// ============================================================================

/// The three interpretations of one taxonomic rank, plus the stable-key
/// counterparts. Built once per record from the configured rank list, so
/// lookups are structural instead of string-concatenated per access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankValues {
    pub verbatim: NameValue,
    pub current: NameValue,
    pub proposed: NameValue,
    pub verbatim_key: Option<String>,
    pub current_key: Option<String>,
    pub proposed_key: Option<String>,
}

impl RankValues {
    pub fn from_row(row: &RawRecord, rank: &str) -> Self {
        RankValues {
            verbatim: NameValue::from_scalar(row.get(&format!("{}{}", VERBATIM_PREFIX, rank))),
            current: NameValue::from_scalar(row.get(&format!("{}{}", CURRENT_PREFIX, rank))),
            proposed: NameValue::from_scalar(row.get(&format!("{}{}", PROPOSED_PREFIX, rank))),
            verbatim_key: key_from_scalar(row.get(&format!("{}{}Key", VERBATIM_PREFIX, rank))),
            current_key: key_from_scalar(row.get(&format!("{}{}Key", CURRENT_PREFIX, rank))),
            proposed_key: key_from_scalar(row.get(&format!("{}{}Key", PROPOSED_PREFIX, rank))),
        }
    }
}

/// The three interpretations of one non-rank comparison field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValues {
    pub verbatim: NameValue,
    pub current: NameValue,
    pub proposed: NameValue,
}

impl FieldValues {
    pub fn from_row(row: &RawRecord, field: &str) -> Self {
        FieldValues {
            verbatim: NameValue::from_scalar(row.get(&format!("{}{}", VERBATIM_PREFIX, field))),
            current: NameValue::from_scalar(row.get(&format!("{}{}", CURRENT_PREFIX, field))),
            proposed: NameValue::from_scalar(row.get(&format!("{}{}", PROPOSED_PREFIX, field))),
        }
    }
}

// ============================================================================
// NAME USAGE
// ============================================================================

/// One classified record of the diff set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameUsage {
    /// Stable identity for the lifetime of the set (ingestion index)
    pub id: usize,

    /// Occurrence frequency, drives the default ordering
    pub count: u64,

    /// Per-rank triplets, keyed by configured rank name
    pub ranks: BTreeMap<String, RankValues>,

    /// Per-field triplets, keyed by configured field name
    pub fields: BTreeMap<String, FieldValues>,

    /// Sparse change map: a key is present iff current ≠ proposed for it.
    /// Owned by the classifier, immutable after the pass.
    pub changes: BTreeSet<String>,

    /// Review flag, mutated only by explicit user action.
    /// Never read by classification.
    pub reviewed: bool,

    /// Content-stable identity over the verbatim values, used to carry the
    /// review flag across re-ingestions. NOT the record identity - that is
    /// `id` (same split as idempotency hash vs id in ledger systems).
    pub natural_key: String,
}

impl NameUsage {
    /// Build a record from a raw row. Missing columns degrade to
    /// `NameValue::Missing` - source data quality is not guaranteed and a
    /// malformed row must not abort the whole pass.
    pub fn from_row(row: &RawRecord, config: &RankConfig, id: usize) -> Self {
        let mut ranks = BTreeMap::new();
        for rank in &config.ranks {
            ranks.insert(rank.clone(), RankValues::from_row(row, rank));
        }

        let mut fields = BTreeMap::new();
        for field in &config.fields {
            fields.insert(field.clone(), FieldValues::from_row(row, field));
        }

        let natural_key = natural_key_for(&config.ranks, &ranks);

        NameUsage {
            id,
            count: count_from_row(row),
            ranks,
            fields,
            changes: BTreeSet::new(),
            reviewed: false,
            natural_key,
        }
    }

    pub fn rank(&self, rank: &str) -> Option<&RankValues> {
        self.ranks.get(rank)
    }

    pub fn field(&self, field: &str) -> Option<&FieldValues> {
        self.fields.get(field)
    }

    pub fn has_changed(&self, key: &str) -> bool {
        self.changes.contains(key)
    }

    /// Current interpretation of a column (rank or field)
    pub fn current_value(&self, column: &str) -> Option<&NameValue> {
        self.ranks
            .get(column)
            .map(|values| &values.current)
            .or_else(|| self.fields.get(column).map(|values| &values.current))
    }

    /// Proposed interpretation of a column (rank or field)
    pub fn proposed_value(&self, column: &str) -> Option<&NameValue> {
        self.ranks
            .get(column)
            .map(|values| &values.proposed)
            .or_else(|| self.fields.get(column).map(|values| &values.proposed))
    }
}

/// Occurrence count from the raw row, degrading to 0 on anything unusable
fn count_from_row(row: &RawRecord) -> u64 {
    match row.get("count") {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().map(|value| value.max(0.0) as u64))
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// SHA-256 over the verbatim rank values, in configured rank order
fn natural_key_for(rank_order: &[String], ranks: &BTreeMap<String, RankValues>) -> String {
    let mut hasher = Sha256::new();
    for rank in rank_order {
        if let Some(values) = ranks.get(rank) {
            hasher.update(rank.as_bytes());
            hasher.update(b"=");
            match &values.verbatim {
                NameValue::Name(name) => hasher.update(name.as_bytes()),
                NameValue::Unmatched => hasher.update(b"<unmatched>"),
                NameValue::Missing => {}
            }
            hasher.update(b"\n");
        }
    }
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config() -> RankConfig {
        RankConfig::new(
            vec!["genus".to_string(), "species".to_string()],
            vec!["taxonKey".to_string()],
        )
    }

    fn test_row() -> RawRecord {
        let mut row = RawRecord::new();
        row.insert("verbatim_genus".to_string(), json!("Abies"));
        row.insert("current_genus".to_string(), json!("Abies"));
        row.insert("proposed_genus".to_string(), json!("abies"));
        row.insert("current_genusKey".to_string(), json!(2684876));
        row.insert("proposed_genusKey".to_string(), json!(2684876));
        row.insert("current_taxonKey".to_string(), json!(5284884));
        row.insert("proposed_taxonKey".to_string(), json!(5284885));
        row.insert("count".to_string(), json!(1470));
        row
    }

    #[test]
    fn test_name_value_from_scalar() {
        assert_eq!(NameValue::from_scalar(None), NameValue::Missing);
        assert_eq!(NameValue::from_scalar(Some(&json!(null))), NameValue::Missing);
        assert_eq!(
            NameValue::from_scalar(Some(&json!("unmatched"))),
            NameValue::Unmatched
        );
        assert_eq!(
            NameValue::from_scalar(Some(&json!("Abies"))),
            NameValue::Name("Abies".to_string())
        );
        // Numbers keep their rendered form
        assert_eq!(
            NameValue::from_scalar(Some(&json!(42))),
            NameValue::Name("42".to_string())
        );
    }

    #[test]
    fn test_sentinel_is_its_own_value() {
        assert_eq!(NameValue::Unmatched, NameValue::Unmatched);
        assert_ne!(NameValue::Unmatched, NameValue::Missing);
        assert_ne!(NameValue::Unmatched, NameValue::Name("unmatched!".to_string()));
        assert!(!NameValue::Unmatched.is_name());
        assert!(NameValue::Unmatched.as_name().is_none());
    }

    #[test]
    fn test_from_row_builds_every_configured_rank() {
        let record = NameUsage::from_row(&test_row(), &test_config(), 0);

        assert_eq!(record.ranks.len(), 2);
        assert_eq!(record.fields.len(), 1);

        let genus = record.rank("genus").unwrap();
        assert_eq!(genus.verbatim, NameValue::Name("Abies".to_string()));
        assert_eq!(genus.current, NameValue::Name("Abies".to_string()));
        assert_eq!(genus.proposed, NameValue::Name("abies".to_string()));
        assert_eq!(genus.current_key.as_deref(), Some("2684876"));

        // species columns are absent from the row entirely
        let species = record.rank("species").unwrap();
        assert_eq!(species.verbatim, NameValue::Missing);
        assert_eq!(species.current, NameValue::Missing);
        assert_eq!(species.proposed, NameValue::Missing);
    }

    #[test]
    fn test_count_parsing() {
        let record = NameUsage::from_row(&test_row(), &test_config(), 0);
        assert_eq!(record.count, 1470);

        let mut row = test_row();
        row.insert("count".to_string(), json!("93"));
        assert_eq!(NameUsage::from_row(&row, &test_config(), 0).count, 93);

        row.insert("count".to_string(), json!("not a number"));
        assert_eq!(NameUsage::from_row(&row, &test_config(), 0).count, 0);

        row.remove("count");
        assert_eq!(NameUsage::from_row(&row, &test_config(), 0).count, 0);
    }

    #[test]
    fn test_natural_key_depends_only_on_verbatim() {
        let config = test_config();
        let base = NameUsage::from_row(&test_row(), &config, 0);

        // Changing proposed values leaves the natural key alone
        let mut row = test_row();
        row.insert("proposed_genus".to_string(), json!("Picea"));
        let same = NameUsage::from_row(&row, &config, 7);
        assert_eq!(base.natural_key, same.natural_key);

        // Changing verbatim values produces a different key
        let mut row = test_row();
        row.insert("verbatim_genus".to_string(), json!("Picea"));
        let other = NameUsage::from_row(&row, &config, 0);
        assert_ne!(base.natural_key, other.natural_key);

        assert_eq!(base.natural_key.len(), 64, "SHA-256 hash should be 64 hex characters");
    }

    #[test]
    fn test_column_lookup_covers_ranks_and_fields() {
        let record = NameUsage::from_row(&test_row(), &test_config(), 0);

        assert_eq!(
            record.current_value("genus"),
            Some(&NameValue::Name("Abies".to_string()))
        );
        assert_eq!(
            record.proposed_value("taxonKey"),
            Some(&NameValue::Name("5284885".to_string()))
        );
        assert_eq!(record.current_value("family"), None);
    }
}
