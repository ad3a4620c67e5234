use std::collections::BTreeMap;
use std::fs;
use std::io::BufReader;

use scopa_engine::game::RoundConfig;
use scopa_engine::logger::{read_records, MoveRecord, RoundLogger, RoundRecord};
use scopa_engine::player::PlayerId;

fn record(id: &str) -> RoundRecord {
    let mut scores: BTreeMap<PlayerId, u32> = BTreeMap::new();
    scores.insert("a".into(), 3);
    scores.insert("b".into(), 1);
    RoundRecord {
        round_id: id.to_string(),
        deck: "napolitane".into(),
        seed: 12,
        players: vec!["a".into(), "b".into()],
        config: RoundConfig::default(),
        moves: vec![MoveRecord {
            player_id: "a".into(),
            card_id: "napolitane::oro::7".into(),
            capture_ids: vec!["napolitane::spade::7".into()],
            scopa: false,
        }],
        scores,
        breakdown: None,
        ts: None,
        meta: None,
    }
}

#[test]
fn writes_jsonl_with_lf_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rounds.jsonl");
    let mut logger = RoundLogger::create(&path).expect("create logger");
    logger.write(&record("20260101-000001")).expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
}

#[test]
fn sequential_ids_increment() {
    let mut logger = RoundLogger::with_seq_for_test("20261231");
    assert_eq!(logger.next_id(), "20261231-000001");
    assert_eq!(logger.next_id(), "20261231-000002");
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("rounds.jsonl");
    let mut logger = RoundLogger::create(&path).expect("create logger");
    logger.write(&record("20260101-000001")).unwrap();

    let preset = "2030-01-01T00:00:00Z".to_string();
    let rec2 = RoundRecord {
        ts: Some(preset.clone()),
        ..record("20260101-000002")
    };
    logger.write(&rec2).unwrap();

    let parsed = read_records(BufReader::new(fs::File::open(&path).unwrap())).unwrap();
    assert_eq!(parsed.len(), 2);
    let first = parsed[0].1.as_ref().unwrap();
    assert!(first.ts.is_some(), "ts should be injected");
    let second = parsed[1].1.as_ref().unwrap();
    assert_eq!(second.ts.as_deref(), Some(preset.as_str()));
}

#[test]
fn append_keeps_existing_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rounds.jsonl");
    RoundLogger::create(&path).unwrap().write(&record("x-1")).unwrap();
    RoundLogger::append(&path).unwrap().write(&record("x-2")).unwrap();
    let parsed = read_records(BufReader::new(fs::File::open(&path).unwrap())).unwrap();
    let ids: Vec<String> = parsed
        .into_iter()
        .map(|(_, r)| r.unwrap().round_id)
        .collect();
    assert_eq!(ids, vec!["x-1", "x-2"]);
}

#[test]
fn record_round_trips_through_json() {
    let rec = record("20260101-000003");
    let json = serde_json::to_string(&rec).unwrap();
    let back: RoundRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rec);
}

#[test]
fn append_continues_round_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rounds.jsonl");
    for _ in 0..2 {
        let mut logger = RoundLogger::append(&path).unwrap();
        let id = logger.next_id();
        logger.write(&record(&id)).unwrap();
    }
    let parsed = read_records(BufReader::new(fs::File::open(&path).unwrap())).unwrap();
    let ids: Vec<String> = parsed
        .into_iter()
        .map(|(_, r)| r.unwrap().round_id)
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(ids[0].ends_with("-000001"));
    assert!(ids[1].ends_with("-000002"));
}

#[test]
fn append_ignores_ids_from_other_days() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rounds.jsonl");
    let old = serde_json::to_string(&record("19990101-000042")).unwrap();
    fs::write(&path, format!("{}\nnot json\n", old)).unwrap();
    let mut logger = RoundLogger::append(&path).unwrap();
    assert!(logger.next_id().ends_with("-000001"));
}
