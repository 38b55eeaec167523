//! Field-level change tracking for persisted records.
//!
//! When a record is updated, the caller builds a [`Changeset`] once from the
//! previous and current field values and passes it by value to any interested
//! handler. Handlers therefore never depend on a live record's mutable
//! change-tracking state.
//!
//! The serialized shape matches what the update event logs:
//!
//! ```json
//! { "price": { "previous": "789.95", "current": "799.95" } }
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name of a variant's price in a [`Changeset`].
pub const PRICE_FIELD: &str = "price";

/// The previous and current value of a single changed field.
///
/// Values are JSON because that is how they cross the wire: prices in
/// particular arrive as decimal strings (e.g. `"799.95"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub previous: Value,
    pub current: Value,
}

impl FieldChange {
    /// Parse the previous value as a decimal, if it is one.
    #[must_use]
    pub fn previous_decimal(&self) -> Option<Decimal> {
        value_as_decimal(&self.previous)
    }

    /// Parse the current value as a decimal, if it is one.
    #[must_use]
    pub fn current_decimal(&self) -> Option<Decimal> {
        value_as_decimal(&self.current)
    }
}

fn value_as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse::<Decimal>().ok(),
        Value::Number(n) => n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
        _ => None,
    }
}

/// A map of field name to `{previous, current}` for fields that actually
/// changed in one persisted update.
///
/// Unchanged fields never appear: [`Changeset::record`] drops pairs where
/// the previous and current values are equal, so `changed("price")` is the
/// no-op guard for handlers that only care about price movement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changeset {
    fields: BTreeMap<String, FieldChange>,
}

impl Changeset {
    /// Create an empty changeset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field's previous and current value.
    ///
    /// No-op when the two values are equal.
    pub fn record(&mut self, field: impl Into<String>, previous: Value, current: Value) {
        if previous == current {
            return;
        }
        self.fields
            .insert(field.into(), FieldChange { previous, current });
    }

    /// Did this field change in the update?
    #[must_use]
    pub fn changed(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// The `{previous, current}` pair for a changed field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.fields.get(field)
    }

    /// True when no field changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_record_drops_unchanged_fields() {
        let mut changes = Changeset::new();
        changes.record(PRICE_FIELD, json!("799.95"), json!("799.95"));
        assert!(!changes.changed(PRICE_FIELD));
        assert!(changes.is_empty());
    }

    #[test]
    fn test_record_keeps_changed_fields() {
        let mut changes = Changeset::new();
        changes.record(PRICE_FIELD, json!("789.95"), json!("799.95"));
        assert!(changes.changed(PRICE_FIELD));
        assert!(!changes.changed("title"));

        let change = changes.get(PRICE_FIELD).unwrap();
        assert_eq!(change.previous, json!("789.95"));
        assert_eq!(change.current, json!("799.95"));
    }

    #[test]
    fn test_serialized_shape() {
        let mut changes = Changeset::new();
        changes.record(PRICE_FIELD, json!("789.95"), json!("799.95"));

        let value = serde_json::to_value(&changes).unwrap();
        assert_eq!(
            value,
            json!({ "price": { "previous": "789.95", "current": "799.95" } })
        );

        let back: Changeset = serde_json::from_value(value).unwrap();
        assert_eq!(back, changes);
    }

    #[test]
    fn test_decimal_from_string_value() {
        let change = FieldChange {
            previous: json!("789.95"),
            current: json!("799.95"),
        };
        assert_eq!(change.previous_decimal(), Some("789.95".parse().unwrap()));
        assert_eq!(change.current_decimal(), Some("799.95".parse().unwrap()));
    }

    #[test]
    fn test_decimal_from_number_value() {
        let change = FieldChange {
            previous: json!(789),
            current: json!(799.5),
        };
        assert_eq!(change.previous_decimal(), Some(Decimal::from(789)));
        assert_eq!(change.current_decimal(), Some("799.5".parse().unwrap()));
    }

    #[test]
    fn test_decimal_from_non_numeric_value() {
        let change = FieldChange {
            previous: Value::Null,
            current: json!("not a price"),
        };
        assert_eq!(change.previous_decimal(), None);
        assert_eq!(change.current_decimal(), None);
    }
}
