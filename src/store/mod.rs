//! Order store over a directory of `order_<id>.json` records.
//!
//! This module handles:
//! - Locating (and if needed creating) the orders directory
//! - Listing and fetching records with per-file error isolation
//! - Frequency statistics over the record set

pub mod aggregator;
pub mod locator;
pub mod observer;
pub mod orders;
pub mod types;

pub use aggregator::{aggregate, FrequencyTable, OrderStats, TrackedField};
pub use locator::{default_candidates, Candidate, StoreLocator};
pub use observer::{ScanObserver, TracingObserver};
pub use orders::OrderStore;
pub use types::{order_file_name, FailureKind, OrderFile, OrderRecord, RecordFailure, Scan};
