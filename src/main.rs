use anyhow::{anyhow, Result};
use std::env;
use std::path::Path;

use backbone_diff::{
    did_achieve_perfect_match, is_cosmetic_change, load_tsv, was_perfect_match_broken,
    DiffWorkspace, NameValue, RankConfig,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: backbone-diff <diff.tsv> [--config <ranks.json>]");
        std::process::exit(1);
    }

    let config = match args.iter().position(|arg| arg == "--config") {
        Some(position) => {
            let path = args
                .get(position + 1)
                .ok_or_else(|| anyhow!("--config requires a path"))?;
            RankConfig::from_file(path)?
        }
        None => RankConfig::default(),
    };

    run_report(Path::new(&args[1]), config)
}

fn run_report(path: &Path, config: RankConfig) -> Result<()> {
    println!("🧬 Backbone Diff - Interpretation Change Report");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let ranks = config.ranks.clone();
    // The last configured rank is the most specific one (scientificName in
    // the standard vocabulary) - use it as the record's display name
    let display_rank = ranks.last().cloned();

    println!("\n📂 Loading {}...", path.display());
    let rows = load_tsv(path)?;
    println!("✓ Loaded {} rows", rows.len());

    let mut workspace = DiffWorkspace::with_config(config);
    workspace.ingest(&rows);
    let set = match workspace.active() {
        Some(set) => set,
        None => return Ok(()),
    };
    println!("✓ {}", set.summary_line());

    println!("\n📊 Changes per key");
    let mut any_change = false;
    for (key, count) in &set.summary {
        if *count > 0 {
            any_change = true;
            println!("  {:<26} {}", key, count);
        }
    }
    if !any_change {
        println!("  (no changes detected)");
    }

    println!("\n🔎 Match quality by rank");
    let mut any_quality = false;
    for rank in &ranks {
        let mut cosmetic = 0usize;
        let mut broken = 0usize;
        let mut achieved = 0usize;

        for record in &set.records {
            if let Some(values) = record.rank(rank) {
                if is_cosmetic_change(values) {
                    cosmetic += 1;
                }
                if was_perfect_match_broken(values) {
                    broken += 1;
                }
                if did_achieve_perfect_match(values) {
                    achieved += 1;
                }
            }
        }

        if cosmetic + broken + achieved > 0 {
            any_quality = true;
            println!(
                "  {:<16} cosmetic: {:<5} broke verbatim match: {:<5} now matches verbatim: {}",
                rank, cosmetic, broken, achieved
            );
        }
    }
    if !any_quality {
        println!("  (nothing notable)");
    }

    println!("\n🔝 Largest changed records");
    for record in set
        .records
        .iter()
        .filter(|record| !record.changes.is_empty())
        .take(10)
    {
        let name = display_rank
            .as_deref()
            .and_then(|rank| record.current_value(rank))
            .and_then(NameValue::as_name)
            .unwrap_or("<no name>");
        let keys: Vec<&str> = record.changes.iter().map(String::as_str).collect();
        println!("  {:>8}x  {}  [{}]", record.count, name, keys.join(", "));
    }

    Ok(())
}
