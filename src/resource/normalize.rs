//! Record normalization
//!
//! Turns raw provider JSON objects into [`ResourceRecord`]s: every field the
//! definition names is present (null when the provider omitted it), nested
//! structures are reduced to a fixed set of sub-fields, and timestamps are
//! ISO-8601 text.

use super::registry::{FieldDef, FieldKind, ResourceDef};
use crate::oci::compartments::Compartment;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Provider field carrying the lifecycle state
const LIFECYCLE_FIELD: &str = "lifecycleState";
/// Provider field carrying the creation time
const TIME_CREATED_FIELD: &str = "timeCreated";

/// A normalized resource, serialized as a flat JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResourceRecord(Map<String, Value>);

impl ResourceRecord {
    /// Start a record with the fields every resource type carries
    pub fn new(
        id: Value,
        name_key: &str,
        name: Value,
        lifecycle_state: Value,
        compartment: &Compartment,
        time_created: Value,
    ) -> Self {
        let mut map = Map::new();
        map.insert("id".to_string(), id);
        map.insert(name_key.to_string(), name);
        map.insert("lifecycle_state".to_string(), lifecycle_state);
        map.insert(
            "compartment_id".to_string(),
            Value::String(compartment.id.clone()),
        );
        map.insert(
            "compartment_name".to_string(),
            Value::String(compartment.name.clone()),
        );
        map.insert("time_created".to_string(), time_created);
        Self(map)
    }

    /// Add or replace a field
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Normalize one provider object according to its definition
pub fn normalize(def: &ResourceDef, item: &Value, compartment: &Compartment) -> ResourceRecord {
    let record = ResourceRecord::new(
        field(item, &def.id_field),
        &def.name_key,
        field(item, &def.name_field),
        field(item, LIFECYCLE_FIELD),
        compartment,
        timestamp(item.get(TIME_CREATED_FIELD)),
    );

    def.fields
        .iter()
        .fold(record, |record, f| record.with(&f.key, extract(item, f)))
}

fn extract(item: &Value, def: &FieldDef) -> Value {
    match def.kind {
        FieldKind::Value => field(item, &def.source),
        FieldKind::Timestamp => timestamp(item.get(&def.source)),
        FieldKind::Nested => nested(item.get(&def.source), &def.fields),
    }
}

/// Read a top-level field, null when absent
pub fn field(item: &Value, name: &str) -> Value {
    item.get(name).cloned().unwrap_or(Value::Null)
}

/// Flatten a nested object into the named sub-fields.
/// Absent or null parent gives null; a non-object parent gives an empty map.
fn nested(value: Option<&Value>, fields: &[FieldDef]) -> Value {
    match value {
        None | Some(Value::Null) => Value::Null,
        Some(obj @ Value::Object(_)) => {
            let map = fields
                .iter()
                .map(|f| (f.key.clone(), extract(obj, f)))
                .collect::<Map<_, _>>();
            Value::Object(map)
        }
        Some(other) => {
            tracing::debug!("Unexpected nested value shape: {}", other);
            Value::Object(Map::new())
        }
    }
}

/// Render a provider timestamp as ISO-8601 text.
///
/// Accepts RFC 3339 strings and epoch milliseconds; anything else is null.
pub fn timestamp(value: Option<&Value>) -> Value {
    let parsed = match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok(),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    };

    parsed
        .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)))
        .unwrap_or(Value::Null)
}
