//! Order record types and the `order_<id>.json` naming contract.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Filename prefix shared with the external record writer.
pub const ORDER_FILE_PREFIX: &str = "order_";
/// Filename extension shared with the external record writer.
pub const ORDER_FILE_EXTENSION: &str = ".json";

/// `order_*.json`, where `*` may be empty.
static ORDER_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^order_(.*)\.json$").expect("static regex is valid"));

/// Build the filename for an order id.
pub fn order_file_name(id: &str) -> String {
    format!("{ORDER_FILE_PREFIX}{id}{ORDER_FILE_EXTENSION}")
}

/// Extract the order id from a filename, if it follows the naming pattern.
pub fn order_id_from_file_name(name: &str) -> Option<&str> {
    ORDER_FILE_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether an id can name a file directly inside the store directory.
///
/// Separators and NUL would let `order_<id>.json` point somewhere else.
/// The empty id is valid and names `order_.json`.
pub fn is_addressable_id(id: &str) -> bool {
    !id.contains(['/', '\\', '\0'])
}

/// An order record file discovered in the store directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderFile {
    /// Order id embedded in the filename.
    pub id: String,
    /// Full path to the record.
    pub path: PathBuf,
}

impl OrderFile {
    /// Build an order file from a path, if its filename matches the pattern.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let id = order_id_from_file_name(name)?;
        Some(Self {
            id: id.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// A successfully parsed order record.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Order id embedded in the filename.
    pub id: String,
    /// Parsed file contents.
    pub body: Value,
}

/// Why a single record was skipped during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The file could not be read.
    Read,
    /// The file was read but is not valid JSON.
    Parse,
}

/// A record that was excluded from a multi-record scan.
#[derive(Debug, Clone)]
pub struct RecordFailure {
    /// The offending file.
    pub file: OrderFile,
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable cause.
    pub reason: String,
}

/// Result of one pass over the store directory.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    /// Number of files matching the naming pattern, parsed or not.
    pub matched: usize,
    /// Records that were read and parsed.
    pub records: Vec<OrderRecord>,
    /// Records that were skipped.
    pub failures: Vec<RecordFailure>,
}

impl Scan {
    /// Consume the scan, keeping only the parsed bodies.
    pub fn into_bodies(self) -> Vec<Value> {
        self.records.into_iter().map(|r| r.body).collect()
    }
}
