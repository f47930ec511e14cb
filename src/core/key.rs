//! Object key construction.
//!
//! Keys look like `<prefix>/<value>_<value>_<date>_<time>.wav`. Spaces inside
//! values become underscores and every colon in the final key becomes a
//! hyphen, so the result is usable both as a filename and as an S3 key.
//! Nothing else is escaped: values come from fixed option lists.

use chrono::{NaiveDate, NaiveTime};

/// Suffix of every uploaded object
pub const KEY_SUFFIX: &str = ".wav";

/// Build the storage key for a recording.
///
/// Deterministic: identical inputs produce identical keys, so two
/// submissions with the same values and timestamp target the same object.
pub fn build_key<S: AsRef<str>>(
    storage_prefix: &str,
    field_values: &[S],
    date: NaiveDate,
    time: NaiveTime,
) -> String {
    let mut parts: Vec<String> = field_values
        .iter()
        .map(|v| v.as_ref().replace(' ', "_"))
        .collect();
    parts.push(date.to_string());
    parts.push(time.to_string());

    format!("{}/{}{}", storage_prefix, parts.join("_"), KEY_SUFFIX).replace(':', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    fn time() -> NaiveTime {
        NaiveTime::from_hms_opt(14, 30, 0).unwrap()
    }

    #[test]
    fn test_worked_example() {
        let key = build_key("beit_oved", &["Rex Dog", "Jane Handler"], date(), time());
        assert_eq!(key, "beit_oved/Rex_Dog_Jane_Handler_2024-01-05_14-30-00.wav");
    }

    #[test]
    fn test_colons_replaced_everywhere() {
        let key = build_key("a:b", &["x:y"], date(), time());
        assert_eq!(key, "a-b/x-y_2024-01-05_14-30-00.wav");
        assert!(!key.contains(':'));
    }

    #[test]
    fn test_fractional_seconds_kept() {
        let t = NaiveTime::from_hms_milli_opt(9, 5, 7, 250).unwrap();
        let key = build_key("p", &["Rex"], date(), t);
        assert_eq!(key, "p/Rex_2024-01-05_09-05-07.250.wav");
    }

    #[test]
    fn test_no_fields() {
        let key = build_key::<&str>("p", &[], date(), time());
        assert_eq!(key, "p/2024-01-05_14-30-00.wav");
    }
}
