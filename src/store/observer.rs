//! Observability hooks for store scans.

use std::fmt::Debug;

use tracing::{debug, warn};

use super::types::{FailureKind, RecordFailure};
use crate::metrics;

/// Receives notifications about per-file failures and completed scans.
pub trait ScanObserver: Send + Sync + Debug {
    /// A record was skipped during a multi-record scan.
    fn record_skipped(&self, failure: &RecordFailure);

    /// A scan finished.
    fn scan_completed(&self, matched: usize, parsed: usize);
}

/// Default observer: structured logs plus counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn record_skipped(&self, failure: &RecordFailure) {
        let kind = match failure.kind {
            FailureKind::Read => "read",
            FailureKind::Parse => "parse",
        };
        warn!(
            order_id = %failure.file.id,
            path = %failure.file.path.display(),
            kind,
            "Skipping unreadable order: {}",
            failure.reason
        );
        metrics::inc_records_skipped(kind);
    }

    fn scan_completed(&self, matched: usize, parsed: usize) {
        debug!(matched, parsed, "Order scan completed");
        metrics::inc_scans();
        metrics::add_records_parsed(parsed as u64);
    }
}
