//! Frequency statistics over parsed order records.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};
use tracing::instrument;

use super::types::Scan;

/// Observed value -> number of occurrences.
pub type FrequencyTable = BTreeMap<String, u64>;

/// Scalar fields of the nested `order` object that get their own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum TrackedField {
    /// Drink type, e.g. "latte".
    #[strum(serialize = "drinkType")]
    DrinkType,
    /// Cup size.
    #[strum(serialize = "size")]
    Size,
    /// Milk choice.
    #[strum(serialize = "milk")]
    Milk,
}

/// JSON key of the extras sequence inside `order`.
pub const EXTRAS_FIELD: &str = "extras";
/// JSON key of the nested order object inside a record.
pub const ORDER_FIELD: &str = "order";

/// Aggregate statistics over the store directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    /// Files matching the naming pattern, including ones that failed to parse.
    pub total_orders: u64,
    /// Drink type counts.
    pub drinks: FrequencyTable,
    /// Size counts.
    pub sizes: FrequencyTable,
    /// Milk counts.
    pub milks: FrequencyTable,
    /// Extra counts, one increment per listed extra.
    pub extras: FrequencyTable,
}

impl OrderStats {
    fn table_mut(&mut self, field: TrackedField) -> &mut FrequencyTable {
        match field {
            TrackedField::DrinkType => &mut self.drinks,
            TrackedField::Size => &mut self.sizes,
            TrackedField::Milk => &mut self.milks,
        }
    }

    /// Fold one parsed record body into the tables.
    ///
    /// Only the nested `order` object is inspected. Absent, empty or
    /// non-string values contribute nothing.
    pub fn record(&mut self, body: &Value) {
        let Some(order) = body.get(ORDER_FIELD) else {
            return;
        };

        for field in TrackedField::iter() {
            if let Some(value) = order.get(field.as_ref()).and_then(Value::as_str) {
                if !value.is_empty() {
                    bump(self.table_mut(field), value);
                }
            }
        }

        if let Some(extras) = order.get(EXTRAS_FIELD).and_then(Value::as_array) {
            for extra in extras.iter().filter_map(Value::as_str) {
                bump(&mut self.extras, extra);
            }
        }
    }
}

fn bump(table: &mut FrequencyTable, key: &str) {
    *table.entry(key.to_string()).or_insert(0) += 1;
}

/// Build statistics from a completed scan.
///
/// `total_orders` is the matched file count, not the parsed record count.
#[instrument(skip(scan), fields(matched = scan.matched, parsed = scan.records.len()))]
pub fn aggregate(scan: &Scan) -> OrderStats {
    let mut stats = OrderStats {
        total_orders: scan.matched as u64,
        ..OrderStats::default()
    };

    for record in &scan.records {
        stats.record(&record.body);
    }

    stats
}
