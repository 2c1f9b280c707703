//! Read-only access to the order records in the store directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use super::aggregator::{aggregate, OrderStats};
use super::observer::{ScanObserver, TracingObserver};
use super::types::{
    is_addressable_id, order_file_name, FailureKind, OrderFile, OrderRecord, RecordFailure, Scan,
};
use crate::error::StoreError;

/// Order records backed by one directory of `order_<id>.json` files.
///
/// Every call reads the directory afresh; nothing is cached.
#[derive(Debug, Clone)]
pub struct OrderStore {
    dir: PathBuf,
    observer: Arc<dyn ScanObserver>,
}

impl OrderStore {
    /// Create a store over a resolved directory, logging through `tracing`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_observer(dir, Arc::new(TracingObserver))
    }

    /// Create a store with a custom scan observer.
    pub fn with_observer(dir: impl Into<PathBuf>, observer: Arc<dyn ScanObserver>) -> Self {
        Self {
            dir: dir.into(),
            observer,
        }
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the store directory currently exists.
    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// All parseable order records. Unreadable records are skipped.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn list(&self) -> Result<Vec<Value>, StoreError> {
        Ok(self.scan()?.into_bodies())
    }

    /// The record stored as `order_<id>.json`.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn get(&self, id: &str) -> Result<Value, StoreError> {
        let not_found = || StoreError::NotFound { id: id.to_string() };

        if !is_addressable_id(id) {
            debug!("Rejecting id that cannot name a file in the store");
            return Err(not_found());
        }

        let path = self.dir.join(order_file_name(id));
        if !is_regular_file(&path) {
            return Err(not_found());
        }

        let read_error = |reason: String| StoreError::Read {
            id: id.to_string(),
            reason,
        };

        let contents = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => not_found(),
            _ => read_error(e.to_string()),
        })?;

        serde_json::from_slice(&contents).map_err(|e| read_error(e.to_string()))
    }

    /// Aggregate statistics over the current directory contents.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn stats(&self) -> Result<OrderStats, StoreError> {
        Ok(aggregate(&self.scan()?))
    }

    /// Number of files matching the naming pattern.
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.order_files()?.len())
    }

    /// Read and parse every order file, isolating per-file failures.
    pub fn scan(&self) -> Result<Scan, StoreError> {
        let files = self.order_files()?;

        let mut scan = Scan {
            matched: files.len(),
            ..Scan::default()
        };

        for file in files {
            match read_record(&file) {
                Ok(body) => scan.records.push(OrderRecord { id: file.id, body }),
                Err((kind, reason)) => {
                    let failure = RecordFailure { file, kind, reason };
                    self.observer.record_skipped(&failure);
                    scan.failures.push(failure);
                }
            }
        }

        self.observer
            .scan_completed(scan.matched, scan.records.len());

        Ok(scan)
    }

    /// Order files directly inside the store directory, sorted by filename.
    ///
    /// A missing directory yields no files.
    fn order_files(&self) -> Result<Vec<OrderFile>, StoreError> {
        let directory_error = |source: std::io::Error| StoreError::Directory {
            path: self.dir.clone(),
            source,
        };

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(directory_error(e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(directory_error)?;
            let path = entry.path();
            let Some(file) = OrderFile::from_path(&path) else {
                continue;
            };
            // file_type does not follow symlinks
            if entry.file_type().is_ok_and(|t| t.is_file()) {
                files.push(file);
            }
        }

        files.sort();
        Ok(files)
    }
}

/// A regular file, not a symlink, so reads stay inside the store directory.
fn is_regular_file(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.is_file())
}

fn read_record(file: &OrderFile) -> Result<Value, (FailureKind, String)> {
    let contents = fs::read(&file.path).map_err(|e| (FailureKind::Read, e.to_string()))?;
    serde_json::from_slice(&contents).map_err(|e| (FailureKind::Parse, e.to_string()))
}
