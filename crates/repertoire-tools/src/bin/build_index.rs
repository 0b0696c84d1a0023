//! Compile the opening corpus into the binary move index.
//!
//! Usage: cargo run --release --bin build-index -- [corpus_dir] [index_path]
//!
//! Defaults come from CORPUS_DIR / CORPUS_PATTERN / INDEX_PATH.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use repertoire_core::{artifact, build, ShakmatyEngine};
use repertoire_tools::config::ToolConfig;
use repertoire_tools::corpus_dir::load_corpus;
use tracing_subscriber::EnvFilter;

const MAX_REJECTS_SHOWN: usize = 20;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut config = ToolConfig::from_env();
    let args: Vec<String> = env::args().collect();
    if let Some(dir) = args.get(1) {
        config.corpus_dir = PathBuf::from(dir);
    }
    if let Some(path) = args.get(2) {
        config.index_path = PathBuf::from(path);
    }

    println!("Building move index:");
    println!("  Corpus: {}/{}", config.corpus_dir.display(), config.corpus_pattern);
    println!("  Output: {}", config.index_path.display());
    println!();

    let start = Instant::now();
    let records = load_corpus(&config.corpus_dir, &config.corpus_pattern)?;
    let report = build(&ShakmatyEngine, records);
    let stats = report.index.stats();

    println!("Build complete in {:.1}s", start.elapsed().as_secs_f64());
    println!("  Input records:     {}", stats.total_records);
    println!("  Indexed records:   {}", stats.indexed_records);
    println!("  Unique sequences:  {}", stats.unique_keys);
    println!("  Records per key:   {:.2}", stats.avg_records_per_key);
    println!("  Positions:         {}", stats.distinct_positions);
    println!("  Key mismatches:    {}", stats.position_mismatches);
    println!("  Duplicate keys:    {}", stats.duplicate_position_keys);
    println!("  Rejected:          {}", stats.rejected_records);

    if !report.rejected.is_empty() {
        println!();
        println!("=== Rejected Records ===");
        for err in report.rejected.iter().take(MAX_REJECTS_SHOWN) {
            println!("  {err}");
        }
        if report.rejected.len() > MAX_REJECTS_SHOWN {
            println!("  ... and {} more", report.rejected.len() - MAX_REJECTS_SHOWN);
        }
    }

    artifact::save_index(&report.index, &config.index_path)?;
    let file_size = fs::metadata(&config.index_path)?.len();

    println!();
    println!("Done!");
    println!("  Output: {}", config.index_path.display());
    println!("  Size:   {} KB", file_size / 1024);

    Ok(())
}
