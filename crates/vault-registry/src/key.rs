//! Key derivation and parsing.
//!
//! Every stored object lives at `{contract_number}/{filename_stem}/{version_id}.txt`.
//! The version id is a UTC wall-clock timestamp, `YYYYMMDD_HHMMSS`, optionally
//! extended with a zero-padded `_NN` suffix when two writes land in the same
//! second. Both the timestamp format and the zero padding keep lexicographic
//! key order equal to chronological order.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};

use vault_core::error::AppError;
use vault_core::result::AppResult;

/// Timestamp layout of a version id.
pub const VERSION_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Fixed extension every stored object key carries.
pub const KEY_SUFFIX: &str = ".txt";

const MAX_COLLISION_SUFFIX: u32 = 99;

/// The three components of a stored object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey {
    pub contract_number: String,
    pub filename_stem: String,
    pub version_id: String,
}

/// Portion of a filename before the first `.`; extensions are not part of
/// a file's identity.
pub fn stem(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

/// Validate a filename and return its stem.
pub fn validate_stem(filename: &str) -> AppResult<&str> {
    // Checked on the raw name: a slash after the first `.` would survive
    // stemming and corrupt the derived key.
    if filename.contains('/') {
        return Err(AppError::validation("A filename cant have '/' on it."));
    }
    let stem = stem(filename);
    if stem.is_empty() {
        return Err(AppError::validation("A filename is required."));
    }
    Ok(stem)
}

/// Validate a contract number path segment.
pub fn validate_contract_number(contract_number: &str) -> AppResult<()> {
    if contract_number.is_empty() {
        return Err(AppError::validation("A contract_number is required."));
    }
    if contract_number.contains('/') {
        return Err(AppError::validation(
            "A contract_number cant have '/' on it.",
        ));
    }
    Ok(())
}

/// Derive a version id from a wall-clock instant.
pub fn derive_version_id(now: DateTime<Utc>) -> String {
    now.format(VERSION_ID_FORMAT).to_string()
}

/// Pick the first version id not already taken, appending `_01`..`_99`
/// when the bare timestamp collides.
pub fn next_available(base: &str, taken: &HashSet<String>) -> AppResult<String> {
    if !taken.contains(base) {
        return Ok(base.to_string());
    }
    for n in 1..=MAX_COLLISION_SUFFIX {
        let candidate = format!("{base}_{n:02}");
        if !taken.contains(&candidate) {
            return Ok(candidate);
        }
    }
    Err(AppError::conflict(format!(
        "Too many versions written within the same second ({base})."
    )))
}

/// Prefix covering every version of one file.
pub fn record_prefix(contract_number: &str, stem: &str) -> String {
    format!("{contract_number}/{stem}/")
}

/// Prefix covering every file of one contract.
pub fn contract_prefix(contract_number: &str) -> String {
    format!("{contract_number}/")
}

/// Full object key for one version of one file.
pub fn object_key(contract_number: &str, stem: &str, version_id: &str) -> String {
    format!("{contract_number}/{stem}/{version_id}{KEY_SUFFIX}")
}

/// Split a stored key back into its components.
pub fn parse_key(key: &str) -> AppResult<ParsedKey> {
    let segments: Vec<&str> = key.split('/').collect();
    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        return Err(AppError::validation(format!(
            "Malformed object key: '{key}'."
        )));
    }
    let version_id = segments[2].strip_suffix(KEY_SUFFIX).unwrap_or(segments[2]);
    if version_id.is_empty() {
        return Err(AppError::validation(format!(
            "Malformed object key: '{key}'."
        )));
    }
    Ok(ParsedKey {
        contract_number: segments[0].to_string(),
        filename_stem: segments[1].to_string(),
        version_id: version_id.to_string(),
    })
}

/// Timestamp carried by a version id, or `None` for foreign ids.
///
/// Collision suffixes are ignored here; ids sharing a second are ordered
/// by their full string instead.
pub fn parse_version_timestamp(version_id: &str) -> Option<NaiveDateTime> {
    let ts = version_id.get(..15)?;
    match version_id.get(15..) {
        None | Some("") => {}
        Some(rest) => {
            // Only a `_NN` collision suffix may follow the timestamp.
            let suffix = rest.strip_prefix('_')?;
            if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
        }
    }
    NaiveDateTime::parse_from_str(ts, VERSION_ID_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stem_stops_at_first_dot() {
        assert_eq!(stem("report.pdf"), "report");
        assert_eq!(stem("archive.tar.gz"), "archive");
        assert_eq!(stem("noextension"), "noextension");
    }

    #[test]
    fn validate_stem_rejects_slash() {
        let err = validate_stem("nested/report.pdf").unwrap_err();
        assert_eq!(err.message, "A filename cant have '/' on it.");

        // A slash hiding behind the first dot must get the same answer,
        // not the empty-stem one.
        let err = validate_stem("../escape.txt").unwrap_err();
        assert_eq!(err.message, "A filename cant have '/' on it.");
    }

    #[test]
    fn validate_stem_rejects_empty() {
        assert!(validate_stem("").is_err());
        assert!(validate_stem(".hidden").is_err());
    }

    #[test]
    fn version_id_is_second_resolution_utc() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 9).unwrap();
        assert_eq!(derive_version_id(now), "20240305_143009");
    }

    #[test]
    fn next_available_appends_padded_suffix() {
        let mut taken = HashSet::new();
        let base = "20240305_143009";
        assert_eq!(next_available(base, &taken).unwrap(), base);

        taken.insert(base.to_string());
        assert_eq!(
            next_available(base, &taken).unwrap(),
            "20240305_143009_01"
        );

        taken.insert("20240305_143009_01".to_string());
        assert_eq!(
            next_available(base, &taken).unwrap(),
            "20240305_143009_02"
        );
    }

    #[test]
    fn object_key_round_trips_through_parse() {
        let key = object_key("c-100", "report", "20240305_143009");
        assert_eq!(key, "c-100/report/20240305_143009.txt");

        let parsed = parse_key(&key).unwrap();
        assert_eq!(parsed.contract_number, "c-100");
        assert_eq!(parsed.filename_stem, "report");
        assert_eq!(parsed.version_id, "20240305_143009");
    }

    #[test]
    fn parse_key_requires_three_segments() {
        assert!(parse_key("only/two").is_err());
        assert!(parse_key("a/b/c/d").is_err());
        assert!(parse_key("a//c.txt").is_err());
    }

    #[test]
    fn parse_version_timestamp_accepts_collision_suffix() {
        assert!(parse_version_timestamp("20240305_143009").is_some());
        assert!(parse_version_timestamp("20240305_143009_01").is_some());
        assert!(parse_version_timestamp("not-a-timestamp").is_none());
        assert!(parse_version_timestamp("20240305_143009-x").is_none());
    }

    #[test]
    fn suffixed_ids_sort_after_their_base() {
        let mut ids = vec![
            "20240305_143009_02".to_string(),
            "20240305_143009".to_string(),
            "20240305_143009_01".to_string(),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                "20240305_143009",
                "20240305_143009_01",
                "20240305_143009_02",
            ]
        );
    }
}
