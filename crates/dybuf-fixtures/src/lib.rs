//! Shared wire-format fixtures for dybuf.
//!
//! The JSON files under `fixtures/v1` at the repository root pin the exact
//! bytes each codec produces. Every file has the shape
//! `{"cases": [ ... ]}`; this crate deserializes them into typed cases.
//!
//! ```no_run
//! use dybuf_fixtures::{load_fixture, UnsignedVarintCase};
//!
//! let cases: Vec<UnsignedVarintCase> = load_fixture("varint_unsigned").unwrap();
//! assert!(!cases.is_empty());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid hex string {0:?}")]
    InvalidHex(String),
    #[error("invalid decimal integer {0:?}")]
    InvalidInteger(String),
}

/// Directory holding the version-1 fixture files.
pub fn fixtures_dir() -> PathBuf {
    // crates/dybuf-fixtures -> repo root -> fixtures/v1
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("v1")
}

#[derive(Debug, Deserialize)]
struct FixtureFile<T> {
    cases: Vec<T>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FixtureError> {
    let data = fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| FixtureError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the cases of `fixtures/v1/<name>.json`.
pub fn load_fixture<T: DeserializeOwned>(name: &str) -> Result<Vec<T>, FixtureError> {
    let path = fixtures_dir().join(format!("{name}.json"));
    Ok(read_json::<FixtureFile<T>>(&path)?.cases)
}

/// Loads `fixtures/v1/manifest.json`.
pub fn load_manifest() -> Result<Manifest, FixtureError> {
    read_json(&fixtures_dir().join("manifest.json"))
}

/// Decodes lowercase or uppercase hex; the empty string is the empty payload.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, FixtureError> {
    if hex.len() % 2 != 0 {
        return Err(FixtureError::InvalidHex(hex.to_string()));
    }
    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            let digit = |c: u8| (c as char).to_digit(16);
            match (digit(pair[0]), digit(pair[1])) {
                (Some(hi), Some(lo)) => Ok(((hi << 4) | lo) as u8),
                _ => Err(FixtureError::InvalidHex(hex.to_string())),
            }
        })
        .collect()
}

pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Cases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub fixture_version: u32,
    pub fixtures: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub file: String,
    pub case_count: usize,
}

/// `varint_unsigned.json`. Values are decimal strings so `u64::MAX`
/// survives JSON number parsing elsewhere.
#[derive(Debug, Clone, Deserialize)]
pub struct UnsignedVarintCase {
    pub id: String,
    pub value_dec: String,
    pub value_hex: String,
    pub encoded_hex: String,
}

impl UnsignedVarintCase {
    pub fn value(&self) -> Result<u64, FixtureError> {
        self.value_dec
            .parse()
            .map_err(|_| FixtureError::InvalidInteger(self.value_dec.clone()))
    }

    pub fn encoded(&self) -> Result<Vec<u8>, FixtureError> {
        hex_to_bytes(&self.encoded_hex)
    }
}

/// `varint_signed.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedVarintCase {
    pub id: String,
    pub value_dec: String,
    pub value_hex: String,
    pub encoded_hex: String,
}

impl SignedVarintCase {
    pub fn value(&self) -> Result<i64, FixtureError> {
        self.value_dec
            .parse()
            .map_err(|_| FixtureError::InvalidInteger(self.value_dec.clone()))
    }

    pub fn encoded(&self) -> Result<Vec<u8>, FixtureError> {
        hex_to_bytes(&self.encoded_hex)
    }
}

/// `typdex.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct TypdexCase {
    pub id: String,
    #[serde(rename = "type")]
    pub ty: u32,
    pub index: u32,
    pub encoded_hex: String,
}

impl TypdexCase {
    pub fn encoded(&self) -> Result<Vec<u8>, FixtureError> {
        hex_to_bytes(&self.encoded_hex)
    }
}

/// `varlen_bytes.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct VarlenBytesCase {
    pub id: String,
    pub payload_hex: String,
    pub payload_length: usize,
    pub encoded_hex: String,
}

impl VarlenBytesCase {
    pub fn payload(&self) -> Result<Vec<u8>, FixtureError> {
        hex_to_bytes(&self.payload_hex)
    }

    pub fn encoded(&self) -> Result<Vec<u8>, FixtureError> {
        hex_to_bytes(&self.encoded_hex)
    }
}

/// `varlen_strings.json`: NUL-terminated var-length strings.
#[derive(Debug, Clone, Deserialize)]
pub struct VarlenStringCase {
    pub id: String,
    pub utf8: String,
    pub encoded_hex: String,
}

impl VarlenStringCase {
    pub fn encoded(&self) -> Result<Vec<u8>, FixtureError> {
        hex_to_bytes(&self.encoded_hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(hex_to_bytes("").unwrap(), Vec::<u8>::new());
        assert_eq!(hex_to_bytes("00ff7F").unwrap(), vec![0x00, 0xff, 0x7f]);
        assert_eq!(bytes_to_hex(&[0x00, 0xff, 0x7f]), "00ff7f");
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert!(matches!(hex_to_bytes("abc"), Err(FixtureError::InvalidHex(_))));
        assert!(matches!(hex_to_bytes("zz"), Err(FixtureError::InvalidHex(_))));
    }

    #[test]
    fn manifest_matches_files() {
        let manifest = load_manifest().unwrap();
        assert_eq!(manifest.fixture_version, 1);
        assert_eq!(manifest.fixtures.len(), 5);
        for entry in &manifest.fixtures {
            let path = fixtures_dir().join(&entry.file);
            assert!(path.exists(), "fixture file missing: {path:?}");
            let cases: Vec<serde_json::Value> = load_fixture(&entry.name).unwrap();
            assert_eq!(cases.len(), entry.case_count, "{}", entry.name);
        }
    }

    #[test]
    fn typed_cases_parse() {
        let unsigned: Vec<UnsignedVarintCase> = load_fixture("varint_unsigned").unwrap();
        let max = unsigned.iter().find(|c| c.id == "u64_max").unwrap();
        assert_eq!(max.value().unwrap(), u64::MAX);

        let signed: Vec<SignedVarintCase> = load_fixture("varint_signed").unwrap();
        let min = signed.iter().find(|c| c.id == "int64_min").unwrap();
        assert_eq!(min.value().unwrap(), i64::MIN);

        let typdex: Vec<TypdexCase> = load_fixture("typdex").unwrap();
        assert_eq!(typdex[1].ty, 0x0F);

        let bytes: Vec<VarlenBytesCase> = load_fixture("varlen_bytes").unwrap();
        for case in &bytes {
            assert_eq!(case.payload().unwrap().len(), case.payload_length, "{}", case.id);
        }
    }

    #[test]
    fn missing_fixture_is_io_error() {
        let err = load_fixture::<TypdexCase>("no_such_fixture").unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
