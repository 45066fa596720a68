use std::fs;
use std::path::{Path, PathBuf};

use icast_core::{ScoreboardFacts, decode_datagram, decode_hex};

fn golden_dir(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("golden")
        .join(name)
}

fn load_expected_facts(name: &str) -> ScoreboardFacts {
    let expected_path = golden_dir(name).join("expected_facts.json");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected_facts.json");
    serde_json::from_str(&expected_json).expect("parse expected facts")
}

fn run_golden(name: &str) {
    let input = fs::read_to_string(golden_dir(name).join("input.hex")).expect("read input.hex");
    let raw = decode_hex(&input).expect("valid hex fixture");
    let expected = load_expected_facts(name);

    let actual = decode_datagram(&raw).expect("decode datagram");

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");
    assert_eq!(actual_value, expected_value, "golden mismatch in {name}");
}

#[test]
fn golden_game_time() {
    run_golden("game_time");
}

#[test]
fn golden_penalties() {
    run_golden("penalties");
}

#[test]
fn golden_intermission() {
    run_golden("intermission");
}

#[test]
fn golden_time_out() {
    run_golden("time_out");
}

#[test]
fn golden_overtime() {
    run_golden("overtime");
}

#[test]
fn golden_unknown_time_type() {
    run_golden("unknown_time_type");
}

#[test]
fn golden_penalties_has_three_active_penalties() {
    let facts = load_expected_facts("penalties");
    assert_eq!(facts.home_penalty_1.as_deref(), Some("01:45"));
    assert_eq!(facts.home_penalty_2.as_deref(), Some("00:12"));
    assert_eq!(facts.guest_penalty_1.as_deref(), Some("02:00"));
    assert_eq!(facts.guest_penalty_2, None);
}

#[test]
fn golden_time_out_ignores_single_token_penalty() {
    let facts = load_expected_facts("time_out");
    assert_eq!(facts.time_period.as_deref(), Some("Time Out"));
    assert_eq!(facts.home_penalty_1, None);
}
