//! Key Builder Integration Tests
//!
//! Tests for object key construction.

use chrono::{NaiveDate, NaiveTime};
use voice_intake::core::{build_key, KEY_SUFFIX};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

#[test]
fn test_documented_example() {
    let key = build_key(
        "beit_oved",
        &["Rex Dog", "Jane Handler"],
        date(2024, 1, 5),
        time(14, 30, 0),
    );
    assert_eq!(key, "beit_oved/Rex_Dog_Jane_Handler_2024-01-05_14-30-00.wav");
}

#[test]
fn test_keys_have_no_colons_and_wav_suffix() {
    let names = ["Rex", "Bella Blue", "Omer Cohen", "Max", "Luna the Second"];
    let times = [time(0, 0, 0), time(9, 5, 59), time(23, 59, 59)];

    for a in names {
        for b in names {
            for t in times {
                let key = build_key("training", &[a, b], date(2025, 12, 31), t);
                assert!(!key.contains(':'), "colon in {}", key);
                assert!(key.ends_with(KEY_SUFFIX), "bad suffix in {}", key);
                assert!(!key.contains(' '), "space in {}", key);
                assert!(key.starts_with("training/"));
            }
        }
    }
}

#[test]
fn test_deterministic() {
    let first = build_key("p", &["Rex Dog"], date(2024, 6, 1), time(8, 0, 0));
    let second = build_key("p", &["Rex Dog"], date(2024, 6, 1), time(8, 0, 0));
    assert_eq!(first, second);
}

#[test]
fn test_distinct_inputs_give_distinct_keys() {
    let base = build_key("p", &["Rex"], date(2024, 6, 1), time(8, 0, 0));
    assert_ne!(base, build_key("p", &["Bella"], date(2024, 6, 1), time(8, 0, 0)));
    assert_ne!(base, build_key("p", &["Rex"], date(2024, 6, 2), time(8, 0, 0)));
    assert_ne!(base, build_key("p", &["Rex"], date(2024, 6, 1), time(8, 0, 1)));
    assert_ne!(base, build_key("q", &["Rex"], date(2024, 6, 1), time(8, 0, 0)));
}

#[test]
fn test_non_ascii_values_pass_through() {
    let key = build_key("p", &["רקס", "Zoë"], date(2024, 1, 5), time(14, 30, 0));
    assert_eq!(key, "p/רקס_Zoë_2024-01-05_14-30-00.wav");
}
