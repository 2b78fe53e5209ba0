//! Shared data structures for the gallery state
//!
//! These structs represent the data model that flows between
//! the store layer and the UI layer.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the random part of a record id
const ID_SUFFIX_LEN: usize = 9;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A single uploaded photo with its metadata
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Unique id: upload timestamp (ms) + random base36 suffix
    pub id: String,
    /// The image itself as a `data:` URL, no external reference
    pub encoded_data: String,
    /// Filename as selected by the admin (e.g., "DSC_0001.jpg")
    pub original_name: String,
    /// When the admin uploaded it
    pub uploaded_at: DateTime<Utc>,
    /// The access code this record is stored under
    #[serde(default)]
    pub owner_code: String,
}

impl PhotoRecord {
    /// Build a fresh record for an encoded image, stamped with the current time
    pub fn new(code: &AccessCode, original_name: &str, encoded_data: String) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(now),
            encoded_data,
            original_name: original_name.to_string(),
            uploaded_at: now,
            owner_code: code.as_str().to_string(),
        }
    }
}

/// Generate a record id like `1718000000000_k3j9x0q2a`
fn generate_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();

    format!("{}_{}", now.timestamp_millis(), suffix)
}

/// An access code, always stored uppercase
///
/// Codes partition the photo collections: records uploaded under one code
/// are only ever read back under the same code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessCode(String);

impl AccessCode {
    /// Uppercase user input into a code. Returns `None` only for `""`;
    /// surrounding whitespace is part of the code.
    pub fn parse(input: &str) -> Option<Self> {
        let code = input.to_uppercase();
        if code.is_empty() {
            None
        } else {
            Some(AccessCode(code))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_uppercased() {
        let code = AccessCode::parse("wedding2024").unwrap();
        assert_eq!(code.as_str(), "WEDDING2024");
        assert_eq!(code.to_string(), "WEDDING2024");
    }

    #[test]
    fn test_whitespace_is_kept() {
        let code = AccessCode::parse(" event2024 ").unwrap();
        assert_eq!(code.as_str(), " EVENT2024 ");
        assert_ne!(code, AccessCode::parse("EVENT2024").unwrap());
    }

    #[test]
    fn test_only_empty_code_rejected() {
        assert!(AccessCode::parse("").is_none());
        assert_eq!(AccessCode::parse("   ").unwrap().as_str(), "   ");
    }

    #[test]
    fn test_id_format() {
        let code = AccessCode::parse("EVENT2024").unwrap();
        let record = PhotoRecord::new(&code, "a.jpg", "data:image/jpeg;base64,AA==".to_string());

        let (millis, suffix) = record.id.split_once('_').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| ID_ALPHABET.contains(&b)));
        assert_eq!(record.owner_code, "EVENT2024");
    }

    #[test]
    fn test_ids_are_unique() {
        let code = AccessCode::parse("EVENT2024").unwrap();
        let a = PhotoRecord::new(&code, "a.jpg", String::new());
        let b = PhotoRecord::new(&code, "a.jpg", String::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_json_layout() {
        let code = AccessCode::parse("EVENT2024").unwrap();
        let record = PhotoRecord::new(&code, "a.jpg", "data:image/jpeg;base64,AA==".to_string());
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("encodedData").is_some());
        assert_eq!(json["originalName"], "a.jpg");
        assert_eq!(json["ownerCode"], "EVENT2024");
        assert!(json["uploadedAt"].as_str().unwrap().ends_with('Z'));
    }
}
