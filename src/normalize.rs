// SPDX-License-Identifier: MIT
//! Collapses the two envelope shapes the CMS can return into one flat
//! attribute record.
//!
//! Older backends nest a resource's fields under an `attributes` object
//! beside the `id`; newer ones flatten the fields beside `id` and internal
//! bookkeeping columns. Every raw item passes through here exactly once so
//! the accessors never have to care which shape arrived.

use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// Backend-internal bookkeeping fields stripped from flat items.
const BOOKKEEPING_FIELDS: [&str; 4] = ["documentId", "createdAt", "updatedAt", "publishedAt"];

/// One raw item as received from the CMS. Untagged: the nested variant is
/// tried first, so an object with a real `attributes` map is always treated
/// as nested and anything else falls through to flat.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    /// Attributes nested under an `attributes` object beside the `id`.
    Nested {
        id: Option<Number>,
        attributes: Map<String, Value>,
    },
    /// Attributes flattened beside `id` and bookkeeping fields.
    Flat(Map<String, Value>),
}

impl Envelope {
    /// Collapse into a flat attribute record. A numeric `id` on the original
    /// item is preserved on the result under `id` either way.
    pub fn into_record(self) -> Map<String, Value> {
        match self {
            Envelope::Nested { id, mut attributes } => {
                if let Some(id) = id {
                    attributes.insert("id".to_string(), Value::Number(id));
                }
                attributes
            }
            Envelope::Flat(mut fields) => {
                for field in BOOKKEEPING_FIELDS {
                    fields.remove(field);
                }
                fields
            }
        }
    }
}

/// Normalize a single raw item. Non-object input (the CMS never sends any,
/// but the boundary has to pick something) comes back as `Null`.
pub fn normalize_item(raw: Value) -> Value {
    match serde_json::from_value::<Envelope>(raw) {
        Ok(envelope) => Value::Object(envelope.into_record()),
        Err(_) => Value::Null,
    }
}

/// Normalize the `data` field of a collection response. Absent or non-array
/// input yields an empty list; otherwise every element is normalized in
/// order.
pub fn normalize_list(raw: Option<Value>) -> Vec<Value> {
    match raw {
        Some(Value::Array(items)) => items.into_iter().map(normalize_item).collect(),
        _ => Vec::new(),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
