//! Query a compiled move index.
//!
//! Usage:
//!   cargo run --bin lookup-opening -- e4 e5 Nf3 Nc6 Bc4
//!   cargo run --bin lookup-opening -- "1. d4 d5 2. c4"
//!   cargo run --bin lookup-opening -- --fen "<position>"
//!   cargo run --bin lookup-opening -- --index path/to/index.bin --search najdorf

use std::env;
use std::path::PathBuf;

use repertoire_core::sequence;
use repertoire_core::{
    artifact, OpeningRecord, PositionEngine, ShakmatyEngine, TranspositionDetector,
};
use repertoire_tools::config::ToolConfig;
use tracing_subscriber::EnvFilter;

enum Query {
    Moves(Vec<String>),
    Fen(String),
    Search(String),
}

fn print_record(record: &OpeningRecord) {
    let root = if record.is_family_root { " [root]" } else { "" };
    println!("  {} {}{}", record.eco_code, record.name, root);
    println!("      {}", record.move_text);
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let mut config = ToolConfig::from_env();
    let args: Vec<String> = env::args().skip(1).collect();

    let mut query = None;
    let mut moves = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--index" => {
                if let Some(path) = args.get(i + 1) {
                    config.index_path = PathBuf::from(path);
                }
                i += 2;
            }
            "--fen" => {
                query = args.get(i + 1).cloned().map(Query::Fen);
                i += 2;
            }
            "--search" => {
                query = args.get(i + 1).cloned().map(Query::Search);
                i += 2;
            }
            other => {
                moves.extend(sequence::parse(other));
                i += 1;
            }
        }
    }
    let query = query.unwrap_or(Query::Moves(moves));

    let index = artifact::load_index(&config.index_path)?;

    match query {
        Query::Moves(plies) => {
            if let Some(entry) = index.lookup_plies(&plies) {
                println!("Exact match for \"{}\":", entry.key);
                entry.records.iter().for_each(print_record);
            } else if let Some(entry) = index.classify(&plies) {
                println!(
                    "Deepest known prefix ({} of {} plies): \"{}\"",
                    entry.ply_count(),
                    plies.len(),
                    entry.key
                );
                entry.records.iter().for_each(print_record);
            } else {
                println!("No known opening for \"{}\"", plies.join(" "));
            }
        }
        Query::Fen(fen) => {
            let engine = ShakmatyEngine;
            let Some(position) = engine.canonicalize(&fen) else {
                anyhow::bail!("not a FEN position: {fen}");
            };
            let detector = TranspositionDetector::from_index(&index);
            match index.positions().get(&position) {
                Some(records) => {
                    println!("Known position {position}:");
                    records.iter().for_each(print_record);
                    if let Some(best) = detector.detect(&position) {
                        println!("Preferred: {}", best.name);
                    }
                }
                None => println!("Position {position} is not in the index"),
            }
        }
        Query::Search(fragment) => {
            let hits = index.search(&fragment);
            println!("{} openings matching \"{}\":", hits.len(), fragment);
            hits.into_iter().for_each(print_record);
        }
    }

    Ok(())
}
