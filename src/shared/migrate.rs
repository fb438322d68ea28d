//! Upgrades stored collections into the current record shape.
//! Older blobs ordered items by a `time` stamp and lacked `order`, `note`
//! and `masked`; everything is normalized here in one pass.

use crate::record::{ItemType, Record};
use serde::Deserialize;
use std::cmp::Ordering;

/// A record as found in storage, with every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "type", default)]
    pub kind: ItemType,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub masked: Option<bool>,
    /// Epoch milliseconds; only present on legacy records.
    #[serde(default)]
    pub time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub records: Vec<Record>,
    /// True when the stored form differs from `records` and must be saved.
    pub changed: bool,
    /// True when at least one record had no `order` (time-ordered blob).
    pub legacy: bool,
}

pub fn needs_migration(stored: &[StoredRecord]) -> bool {
    stored.iter().any(is_incomplete) || !orders_contiguous(stored)
}

fn is_incomplete(record: &StoredRecord) -> bool {
    record.order.is_none()
        || record.content.is_none()
        || record.note.is_none()
        || record.masked.is_none()
        || record.time.is_some()
}

fn orders_contiguous(stored: &[StoredRecord]) -> bool {
    let mut orders: Vec<i64> = Vec::with_capacity(stored.len());
    for record in stored {
        match record.order {
            Some(order) => orders.push(order),
            None => return false,
        }
    }
    orders.sort_unstable();
    orders.iter().enumerate().all(|(idx, order)| *order == idx as i64)
}

/// Existing `order` wins; records without one follow, newest first.
fn cmp_stored(a: &StoredRecord, b: &StoredRecord) -> Ordering {
    match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.time.unwrap_or(0).cmp(&a.time.unwrap_or(0)),
    }
}

fn into_record(stored: StoredRecord, order: u32) -> Record {
    Record {
        kind: stored.kind,
        content: stored.content.unwrap_or_default(),
        note: stored.note.unwrap_or_default(),
        order,
        masked: stored.masked.unwrap_or(false),
    }
}

/// Normalize a stored collection. Already-current collections come back
/// unchanged and in their stored sequence.
pub fn migrate(mut stored: Vec<StoredRecord>) -> Migration {
    let legacy = stored.iter().any(|r| r.order.is_none());
    if !needs_migration(&stored) {
        let records = stored
            .into_iter()
            .map(|r| {
                let order = r.order.unwrap_or_default() as u32;
                into_record(r, order)
            })
            .collect();
        return Migration { records, changed: false, legacy };
    }

    stored.sort_by(cmp_stored);
    let records = stored
        .into_iter()
        .enumerate()
        .map(|(idx, r)| into_record(r, idx as u32))
        .collect();
    Migration { records, changed: true, legacy }
}
