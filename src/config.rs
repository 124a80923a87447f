// 🧭 Rank Configuration - which ranks and fields get compared
// The rank vocabulary is deployment configuration, never inferred from data

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Ordered rank list plus ordered extra-field list.
///
/// Ranks are compared three ways (name, stable key, and the match-quality
/// predicates); extra fields only current vs proposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankConfig {
    /// Taxonomic ranks to compare, in display order
    pub ranks: Vec<String>,

    /// Non-rank fields to compare, in display order
    pub fields: Vec<String>,
}

impl Default for RankConfig {
    /// The GBIF backbone vocabulary used by the standard diff export
    fn default() -> Self {
        RankConfig {
            ranks: vec![
                "kingdom".to_string(),
                "phylum".to_string(),
                "class".to_string(),
                "order".to_string(),
                "family".to_string(),
                "genus".to_string(),
                "subGenus".to_string(),
                "species".to_string(),
                "scientificName".to_string(),
            ],
            fields: vec![
                "acceptedScientificName".to_string(),
                "taxonKey".to_string(),
            ],
        }
    }
}

impl RankConfig {
    pub fn new(ranks: Vec<String>, fields: Vec<String>) -> Self {
        RankConfig { ranks, fields }
    }

    /// Load a deployment-specific vocabulary from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rank config: {:?}", path.as_ref()))?;

        let config: RankConfig =
            serde_json::from_str(&content).context("Failed to parse rank config JSON")?;

        Ok(config)
    }

    /// Every change-key the summary tracks: each rank, its `<rank>Key`
    /// counterpart, and each extra field
    pub fn change_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.ranks.len() * 2 + self.fields.len());
        for rank in &self.ranks {
            keys.push(rank.clone());
            keys.push(format!("{}Key", rank));
        }
        for field in &self.fields {
            keys.push(field.clone());
        }
        keys
    }
}

// ============================================================================
// TESTS
// ============================================================================
