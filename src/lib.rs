// Backbone Diff - Core Library
// Classifies how taxonomic name interpretations changed between backbone versions

pub mod config;     // Rank vocabulary - deployment configuration
pub mod record;     // Data model - triplets, name usages, raw rows
pub mod comparator; // Per-rank difference and match-quality predicates
pub mod classifier; // Single-pass classification + change summary
pub mod loader;     // TSV ingestion
pub mod workspace;  // Active set, review flags, views

// Re-export commonly used types
pub use classifier::{ChangeSummary, ClassifiedSet, Classifier};
pub use comparator::{
    did_achieve_perfect_match, field_differs, is_cosmetic_change, key_differs, values_differ,
    was_perfect_match_broken,
};
pub use config::RankConfig;
pub use loader::{load_tsv, read_tsv};
pub use record::{FieldValues, NameUsage, NameValue, RankValues, RawRecord, UNMATCHED_SENTINEL};
pub use workspace::{DiffWorkspace, SortOrder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
