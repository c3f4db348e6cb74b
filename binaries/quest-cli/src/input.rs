//! Parsing of user-typed arguments: quoted words, `key=value` item fields
//! and `name:type=value` custom field specs.

use quest_core::{Error, FieldType, Result};
use quest_session::{ItemPatch, NewItem};

/// Split a line into words; double quotes group words, `\"` escapes a quote
pub fn split_args(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' if quoted => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(Error::Validation("unterminated quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// A custom field given on the command line as `name:type=value`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub value: String,
}

pub fn parse_field_spec(spec: &str) -> Result<FieldSpec> {
    let (head, value) = spec.split_once('=').unwrap_or((spec, ""));
    let (name, field_type) = match head.rsplit_once(':') {
        Some((name, ty)) => (name, ty.parse::<FieldType>()?),
        None => (head, FieldType::String),
    };

    Ok(FieldSpec {
        name: name.to_string(),
        field_type,
        value: value.to_string(),
    })
}

fn split_pair(word: &str) -> Result<(&str, &str)> {
    word.split_once('=')
        .ok_or_else(|| Error::Validation(format!("expected key=value, got '{word}'")))
}

fn parse_number(key: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Validation(format!("{key} must be a number, got '{value}'")))
}

fn parse_integer(key: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::Validation(format!("{key} must be an integer, got '{value}'")))
}

/// Parse an item id
pub fn parse_id(value: &str) -> Result<i64> {
    parse_integer("id", value)
}

/// `name=… price=… [description=…] [quantity=…]`
pub fn parse_new_item<S: AsRef<str>>(words: &[S]) -> Result<NewItem> {
    let mut name = None;
    let mut description = None;
    let mut price = None;
    let mut quantity = 0;

    for word in words {
        let (key, value) = split_pair(word.as_ref())?;
        match key {
            "name" => name = Some(value.to_string()),
            "description" => description = Some(value.to_string()).filter(|d| !d.is_empty()),
            "price" => price = Some(parse_number(key, value)?),
            "quantity" if !value.is_empty() => quantity = parse_integer(key, value)?,
            "quantity" => {}
            other => return Err(Error::Validation(format!("unknown item field '{other}'"))),
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::Validation("name is required".to_string()))?;
    let price = price.ok_or_else(|| Error::Validation("price is required".to_string()))?;

    Ok(NewItem {
        name,
        description,
        price,
        quantity,
    })
}

/// Only non-empty values are included in the patch
pub fn parse_patch<S: AsRef<str>>(words: &[S]) -> Result<ItemPatch> {
    let mut patch = ItemPatch::default();

    for word in words {
        let (key, value) = split_pair(word.as_ref())?;
        if value.is_empty() {
            continue;
        }
        match key {
            "name" => patch.name = Some(value.to_string()),
            "description" => patch.description = Some(value.to_string()),
            "price" => patch.price = Some(parse_number(key, value)?),
            "quantity" => patch.quantity = Some(parse_integer(key, value)?),
            other => return Err(Error::Validation(format!("unknown item field '{other}'"))),
        }
    }

    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args_quotes() {
        let words = split_args(r#"create name="Desk Lamp" price=12 description="say \"hi\"""#).unwrap();
        assert_eq!(
            words,
            vec!["create", "name=Desk Lamp", "price=12", r#"description=say "hi""#]
        );
        assert!(split_args(r#"name="open"#).is_err());
        assert_eq!(split_args(r#"field add note string """#).unwrap().len(), 5);
    }

    #[test]
    fn test_field_spec() {
        let spec = parse_field_spec("weight:number=1.5").unwrap();
        assert_eq!(spec.name, "weight");
        assert_eq!(spec.field_type, FieldType::Number);
        assert_eq!(spec.value, "1.5");

        let plain = parse_field_spec("color=red").unwrap();
        assert_eq!(plain.field_type, FieldType::String);

        let url = parse_field_spec("link=http://x:80").unwrap();
        assert_eq!(url.name, "link");
        assert_eq!(url.value, "http://x:80");

        assert!(parse_field_spec("x:date=1").is_err());
    }

    #[test]
    fn test_new_item() {
        let item = parse_new_item(&["name=Lamp", "price=9.5", "description="]).unwrap();
        assert_eq!(item.name, "Lamp");
        assert_eq!(item.price, 9.5);
        assert_eq!(item.quantity, 0);
        assert_eq!(item.description, None);

        assert!(parse_new_item(&["price=1"]).is_err());
        assert!(parse_new_item(&["name=Lamp"]).is_err());
        assert!(parse_new_item(&["name=Lamp", "price=1", "colour=red"]).is_err());
    }

    #[test]
    fn test_patch_skips_empty_values() {
        let patch = parse_patch(&["name=", "quantity=3"]).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.quantity, Some(3));
        assert!(parse_patch(&["quantity=lots"]).is_err());
    }
}
