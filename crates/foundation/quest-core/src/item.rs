//! Items as returned by the API, and the dashboard snapshot derived from them
//!
//! Items are kept as raw JSON objects. The API owns their shape; the
//! accessors below coerce the well-known keys and never fail.

use crate::field::parse_js_number;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys every item carries; everything else is an extra field
pub const BASE_ITEM_KEYS: [&str; 5] = ["id", "name", "description", "price", "quantity"];

/// An item as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build an item from any JSON value; non-objects become empty items
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// Id as display text, if present
    pub fn id_text(&self) -> Option<String> {
        self.get("id").filter(|v| !v.is_null()).map(display_value)
    }

    /// Name as display text; empty, zero, false and null names count as unnamed
    pub fn name(&self) -> Option<String> {
        self.get("name").filter(|v| is_truthy(v)).map(display_value)
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description").and_then(Value::as_str)
    }

    /// Price, 0 when missing or non-numeric
    pub fn price(&self) -> f64 {
        self.numeric("price")
    }

    /// Quantity, 0 when missing or non-numeric
    pub fn quantity(&self) -> f64 {
        self.numeric("quantity")
    }

    /// `price × quantity`
    pub fn value(&self) -> f64 {
        self.price() * self.quantity()
    }

    /// Chart label: the name, or `Item {id}` when unnamed
    pub fn label(&self) -> String {
        match self.name() {
            Some(name) => name,
            None => format!("Item {}", self.id_text().unwrap_or_else(|| "-".to_string())),
        }
    }

    /// Keys outside [`BASE_ITEM_KEYS`], in the order the API sent them
    pub fn extra_fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0
            .iter()
            .filter(|(k, _)| !BASE_ITEM_KEYS.contains(&k.as_str()))
    }

    /// Extra fields as `key: value` pairs joined by `, `, or `-` when none
    pub fn extras_summary(&self) -> String {
        let parts: Vec<String> = self
            .extra_fields()
            .map(|(k, v)| format!("{}: {}", k, display_value(v)))
            .collect();
        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(", ")
        }
    }

    fn numeric(&self, key: &str) -> f64 {
        let n = match self.get(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => parse_js_number(s),
            _ => 0.0,
        };
        if n.is_nan() {
            0.0
        } else {
            n
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a JSON value as table text; strings without quotes
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One table row projected from an item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub extras: String,
}

impl From<&Item> for TableRow {
    fn from(item: &Item) -> Self {
        let cell = |key: &str| {
            item.get(key)
                .filter(|v| !v.is_null())
                .map(display_value)
        };
        Self {
            id: cell("id").unwrap_or_else(|| "-".to_string()),
            name: cell("name").unwrap_or_else(|| "-".to_string()),
            description: cell("description").unwrap_or_default(),
            price: cell("price").unwrap_or_default(),
            quantity: cell("quantity").unwrap_or_default(),
            extras: item.extras_summary(),
        }
    }
}

/// Labeled series handed to the chart renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub quantities: Vec<f64>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Each value as a percentage of the value total; all zero when the total is zero
    pub fn value_shares(&self) -> Vec<f64> {
        let total: f64 = self.values.iter().sum();
        self.values
            .iter()
            .map(|v| if total > 0.0 { v / total * 100.0 } else { 0.0 })
            .collect()
    }
}

/// Full dashboard view, recomputed from scratch on every refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub rows: Vec<Item>,
    pub item_count: usize,
    pub total_value: f64,
    pub chart_series: ChartSeries,
}

impl DashboardSnapshot {
    /// Total value with two decimals
    pub fn total_value_display(&self) -> String {
        format!("{:.2}", self.total_value)
    }

    pub fn table_rows(&self) -> Vec<TableRow> {
        self.rows.iter().map(TableRow::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        Item::from_value(value)
    }

    #[test]
    fn test_numeric_coercion() {
        let it = item(json!({"price": "12.5", "quantity": 2}));
        assert_eq!(it.value(), 25.0);

        let junk = item(json!({"price": "abc", "quantity": null}));
        assert_eq!(junk.price(), 0.0);
        assert_eq!(junk.quantity(), 0.0);
    }

    #[test]
    fn test_label_falls_back_to_id() {
        assert_eq!(item(json!({"id": 7, "name": ""})).label(), "Item 7");
        assert_eq!(item(json!({"id": 7, "name": "Lamp"})).label(), "Lamp");
        assert_eq!(item(json!({"id": 7, "name": 42})).label(), "42");
        assert_eq!(item(json!({"id": 7, "name": 0})).label(), "Item 7");
        assert_eq!(item(json!({"id": 7, "name": null})).label(), "Item 7");
    }

    #[test]
    fn test_boolean_price_counts_as_zero() {
        let it = item(json!({"price": true, "quantity": 5}));
        assert_eq!(it.price(), 0.0);
        assert_eq!(it.value(), 0.0);
        assert_eq!(item(json!({"price": 4, "quantity": true})).quantity(), 0.0);
    }

    #[test]
    fn test_extras_summary() {
        let it = item(json!({"id": 1, "name": "X", "color": "red", "fragile": true}));
        assert_eq!(it.extras_summary(), "color: red, fragile: true");
        assert_eq!(item(json!({"id": 1, "name": "X"})).extras_summary(), "-");
    }

    #[test]
    fn test_table_row_placeholders() {
        let row = TableRow::from(&item(json!({"price": 3})));
        assert_eq!(row.id, "-");
        assert_eq!(row.name, "-");
        assert_eq!(row.description, "");
        assert_eq!(row.price, "3");
        assert_eq!(row.quantity, "");
    }

    #[test]
    fn test_value_shares() {
        let series = ChartSeries {
            labels: vec!["a".into(), "b".into()],
            quantities: vec![1.0, 3.0],
            values: vec![10.0, 30.0],
        };
        assert_eq!(series.value_shares(), vec![25.0, 75.0]);
    }
}
