//! Custom field registry
//!
//! Holds the ordered list of user-declared extra fields and merges their
//! resolved values into outgoing payloads. Names are not unique: when two
//! entries share a key the later one wins.

use quest_core::{CustomField, Error, FieldType, Result};
use serde_json::{Map, Value};

/// Ordered, transient list of custom fields
#[derive(Debug, Clone, Default)]
pub struct CustomFieldRegistry {
    fields: Vec<CustomField>,
}

impl CustomFieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Rejects names that are empty after trimming.
    pub fn add(&mut self, field: &str, field_type: FieldType, raw_value: &str) -> Result<()> {
        let field = field.trim();
        if field.is_empty() {
            return Err(Error::Validation("custom field name is empty".to_string()));
        }

        self.fields.push(CustomField {
            field: field.to_string(),
            field_type,
            raw_value: raw_value.to_string(),
        });
        Ok(())
    }

    /// Remove the field at `index`; out-of-range indices are ignored
    pub fn remove_at(&mut self, index: usize) -> Option<CustomField> {
        (index < self.fields.len()).then(|| self.fields.remove(index))
    }

    pub fn fields(&self) -> &[CustomField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// New payload: `base` with every field's resolved value assigned by key
    pub fn merge_into(&self, base: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = base.clone();
        for field in &self.fields {
            merged.insert(field.field.clone(), field.resolve().to_json());
        }
        merged
    }

    /// Payload schema as the API will see it, custom fields included
    pub fn preview(&self) -> Map<String, Value> {
        let mut preview = Map::new();
        for (key, ty) in [
            ("name", "string"),
            ("description", "string?"),
            ("price", "number"),
            ("quantity", "number"),
        ] {
            preview.insert(key.to_string(), Value::from(ty));
        }
        for field in &self.fields {
            preview.insert(field.field.clone(), Value::from(field.field_type.name()));
        }
        preview
    }
}
