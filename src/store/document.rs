//! Entry-by-entry decoding of stored documents.
//!
//! A document written by another client may hold entries this crate cannot
//! read. Decoding keeps every entry that reads and logs the rest, so one bad
//! milestone or task never empties the whole document.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::*;

/// A dashboard document that can be rebuilt from whatever is stored.
pub trait StoredDocument: Default {
    fn decode(source: &str, value: Value) -> Self;
}

impl StoredDocument for MilestonesDoc {
    fn decode(source: &str, value: Value) -> Self {
        keyed(source, value, |quarter| Some(by_category(source, quarter)))
    }
}

impl StoredDocument for WeeklyPlans {
    fn decode(source: &str, value: Value) -> Self {
        keyed(source, value, |weeks| {
            Some(keyed(source, weeks, |plan| Some(by_category(source, plan))))
        })
    }
}

impl StoredDocument for DailyLogs {
    fn decode(source: &str, value: Value) -> Self {
        keyed(source, value, |people| {
            Some(keyed(source, people, |entry| record(source, entry)))
        })
    }
}

impl StoredDocument for QuarterlyResourcing {
    fn decode(source: &str, value: Value) -> Self {
        keyed(source, value, |table| record(source, table))
    }
}

impl StoredDocument for WeekHistory {
    fn decode(source: &str, value: Value) -> Self {
        keyed(source, value, |snapshot| record(source, snapshot))
    }
}

/// Decode an object entry by entry, dropping entries `entry` rejects.
fn keyed<T>(
    source: &str,
    value: Value,
    mut entry: impl FnMut(Value) -> Option<T>,
) -> BTreeMap<String, T> {
    let map = match value {
        Value::Object(map) => map,
        Value::Null => return BTreeMap::new(),
        _ => {
            tracing::warn!(source, "expected an object, ignoring value");
            return BTreeMap::new();
        }
    };

    map.into_iter()
        .filter_map(|(key, value)| match entry(value) {
            Some(decoded) => Some((key, decoded)),
            None => {
                tracing::warn!(source, key = key.as_str(), "skipping unreadable entry");
                None
            }
        })
        .collect()
}

/// Category → list of items. Unknown categories and unreadable items are
/// skipped.
fn by_category<T: DeserializeOwned>(source: &str, value: Value) -> BTreeMap<Category, Vec<T>> {
    keyed(source, value, |items| match items {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| record(source, item))
                .collect::<Vec<T>>(),
        ),
        _ => None,
    })
    .into_iter()
    .filter_map(|(key, items)| match Category::from_str(&key) {
        Some(category) => Some((category, items)),
        None => {
            tracing::warn!(source, category = key.as_str(), "skipping unknown category");
            None
        }
    })
    .collect()
}

fn record<T: DeserializeOwned>(source: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(source, "skipping unreadable entry: {}", e);
            None
        }
    }
}
