//! Custom field declarations and typed value resolution
//!
//! A custom field is a user-declared `(name, type, raw value)` triple. The
//! raw value is kept as typed text and only resolved to a [`FieldValue`]
//! when merged into a payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Declared type of a custom field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Resolve raw text into a typed value.
    ///
    /// Numbers follow JavaScript `Number()` coercion and may yield NaN,
    /// which is carried as-is. Booleans are true only for the literal
    /// `"true"`.
    pub fn resolve(&self, raw_value: &str) -> FieldValue {
        match self {
            Self::Number => FieldValue::Number(parse_js_number(raw_value)),
            Self::Boolean => FieldValue::Bool(raw_value == "true"),
            Self::String => FieldValue::String(raw_value.to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" | "bool" => Ok(Self::Boolean),
            other => Err(crate::Error::Validation(format!(
                "unknown field type '{other}' (expected string, number or boolean)"
            ))),
        }
    }
}

/// A resolved custom field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    /// May be NaN when the raw text is not numeric
    Number(f64),
    Bool(bool),
}

impl FieldValue {
    /// JSON encoding used in outgoing payloads.
    ///
    /// Integral numbers become JSON integers; NaN and infinities become
    /// `null`, matching how `JSON.stringify` treats them.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
        }
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn number_to_json(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// A user-declared extra field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(rename = "value")]
    pub raw_value: String,
}

impl CustomField {
    pub fn resolve(&self) -> FieldValue {
        self.field_type.resolve(&self.raw_value)
    }
}

impl fmt::Display for CustomField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.raw_value, self.field_type)
    }
}

/// Parse text the way JavaScript's `Number()` does.
///
/// Blank text is 0; `0x`/`0o`/`0b` prefixes and `Infinity` are accepted;
/// anything else that is not a decimal literal is NaN.
pub fn parse_js_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        return digits.chars().fold(0.0, |acc, c| {
            c.to_digit(radix)
                .map_or(acc, |d| acc * f64::from(radix) + f64::from(d))
        });
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // Rust also accepts "inf" and "nan"; JavaScript does not
    let decimal_only = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !decimal_only {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_resolution() {
        assert_eq!(FieldType::Boolean.resolve("true"), FieldValue::Bool(true));
        assert_eq!(FieldType::Boolean.resolve("True"), FieldValue::Bool(false));
        assert_eq!(FieldType::Boolean.resolve("anything-else"), FieldValue::Bool(false));
    }

    #[test]
    fn test_string_resolution_keeps_raw_text() {
        assert_eq!(
            FieldType::String.resolve("  spaced  "),
            FieldValue::String("  spaced  ".to_string())
        );
    }

    #[test]
    fn test_number_resolution() {
        assert_eq!(parse_js_number("20"), 20.0);
        assert_eq!(parse_js_number(" 2.5 "), 2.5);
        assert_eq!(parse_js_number(""), 0.0);
        assert_eq!(parse_js_number("0x10"), 16.0);
        assert_eq!(parse_js_number("1e3"), 1000.0);
        assert_eq!(parse_js_number("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_js_number("abc").is_nan());
        assert!(parse_js_number("inf").is_nan());
        assert!(parse_js_number("12px").is_nan());
    }

    #[test]
    fn test_nan_is_carried_not_rejected() {
        match FieldType::Number.resolve("not a number") {
            FieldValue::Number(n) => assert!(n.is_nan()),
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn test_json_encoding() {
        assert_eq!(FieldValue::Number(20.0).to_json(), json!(20));
        assert_eq!(FieldValue::Number(2.5).to_json(), json!(2.5));
        assert_eq!(FieldValue::Number(f64::NAN).to_json(), Value::Null);
        assert_eq!(FieldValue::Bool(true).to_json(), json!(true));
    }

    #[test]
    fn test_field_type_parse() {
        assert_eq!("Number".parse::<FieldType>().unwrap(), FieldType::Number);
        assert_eq!("bool".parse::<FieldType>().unwrap(), FieldType::Boolean);
        assert!("date".parse::<FieldType>().is_err());
    }
}
