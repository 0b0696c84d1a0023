//! Integration tests: compile the fixture corpus and check the index
//! invariants consumers rely on.

mod common;

use repertoire_core::{artifact, build, replay, sequence, ShakmatyEngine};

#[test]
fn test_build_summary_statistics() {
    let report = build(&ShakmatyEngine, common::corpus());
    let stats = report.index.stats();

    assert_eq!(stats.total_records, common::LINES.len() + 1);
    assert_eq!(stats.indexed_records, common::LINES.len());
    assert_eq!(stats.rejected_records, 1);
    // The two Italian records share one key.
    assert_eq!(stats.unique_keys, common::LINES.len() - 1);
    assert_eq!(stats.avg_records_per_key, 17.0 / 16.0);
    // Reti and Zukertort move orders reach the same position.
    assert_eq!(stats.distinct_positions, common::LINES.len() - 2);
    assert_eq!(stats.position_mismatches, 0);
    assert_eq!(stats.duplicate_position_keys, 0);
}

#[test]
fn test_corrupt_record_is_reported_with_context() {
    let report = build(&ShakmatyEngine, common::corpus());
    assert_eq!(report.rejected.len(), 1);

    let err = &report.rejected[0];
    assert_eq!(err.position_key, common::CORRUPT_KEY);
    assert_eq!(err.name, "Corrupted Gambit");
    assert_eq!(err.eco_code, "C40");
    assert_eq!(err.index, 2);
    assert_eq!(err.token, "Ke3");
    assert!(report.index.search("Corrupted").is_empty());
}

#[test]
fn test_identical_moves_share_entry_sorted_by_name() {
    let report = build(&ShakmatyEngine, common::corpus());
    let entry = report.index.get("e4 e5 Nf3 Nc6 Bc4").unwrap();
    let names: Vec<_> = entry.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Giuoco Piano", "Italian Game"]);
}

#[test]
fn test_entries_are_totally_ordered() {
    let report = build(&ShakmatyEngine, common::corpus());
    let ply_len = |moves: &str| sequence::parse(moves).len();

    for entry in report.index.entries() {
        for pair in entry.records.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (la, lb) = (ply_len(&a.move_text), ply_len(&b.move_text));
            assert!(la < lb || (la == lb && a.name <= b.name), "{} / {}", a.name, b.name);
        }
    }
    for (_, records) in report.index.positions().iter() {
        for pair in records.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (la, lb) = (ply_len(&a.move_text), ply_len(&b.move_text));
            assert!(la < lb || (la == lb && a.name <= b.name), "{} / {}", a.name, b.name);
        }
    }
}

#[test]
fn test_every_indexed_record_replays() {
    let report = build(&ShakmatyEngine, common::corpus());
    for record in report.index.records() {
        let plies = sequence::parse(&record.move_text);
        let position = replay(&ShakmatyEngine, &plies, plies.len())
            .unwrap_or_else(|e| panic!("{}: {e}", record.name));
        let owners = report.index.positions().get(&position).unwrap();
        assert!(owners.contains(record), "{} missing from position index", record.name);
    }
}

#[test]
fn test_build_is_byte_identical() {
    let first = build(&ShakmatyEngine, common::corpus()).index;
    let second = build(&ShakmatyEngine, common::corpus()).index;
    assert_eq!(artifact::to_bytes(&first).unwrap(), artifact::to_bytes(&second).unwrap());

    let mut reversed = common::corpus();
    reversed.reverse();
    let third = build(&ShakmatyEngine, reversed).index;
    assert_eq!(artifact::to_bytes(&first).unwrap(), artifact::to_bytes(&third).unwrap());
}

#[test]
fn test_artifact_round_trip_on_disk() {
    let index = build(&ShakmatyEngine, common::corpus()).index;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data/opening_index.bin");

    artifact::save_index(&index, &path).unwrap();
    let loaded = artifact::load_index(&path).unwrap();

    assert_eq!(loaded, index);
    assert_eq!(
        loaded.best_line("1. e4 c5 2. Bc4").unwrap().name,
        "Sicilian Defense: Bowdler Attack"
    );
}

#[test]
fn test_family_roots_cover_each_family() {
    let index = build(&ShakmatyEngine, common::corpus()).index;
    let families = index.family_roots();
    assert!(families.contains_key("Sicilian Defense"));
    assert!(families.contains_key("Queen's Gambit Declined"));
    assert!(!families.contains_key("Reti Opening"));
    assert!(families.values().flatten().all(|r| r.is_family_root));
}
