use crate::types::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single typed property on a Notion database row.
///
/// Parsing is total: an unknown discriminator, or a known one whose payload
/// does not have the expected shape, becomes [`PropertyValue::Other`] so the
/// renderer always has something to show.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(Vec<RichTextItem>),
    RichText(Vec<RichTextItem>),
    Number(Option<f64>),
    Select(Option<SelectOption>),
    MultiSelect(Vec<SelectOption>),
    Status(Option<SelectOption>),
    Date(Option<DateValue>),
    Checkbox(bool),
    Url(Option<String>),
    Email(Option<String>),
    PhoneNumber(Option<String>),
    /// `None` when the row carried no `files` field at all.
    Files(Option<Vec<NotionFile>>),
    CreatedTime(Option<String>),
    LastEditedTime(Option<String>),
    CreatedBy(Option<User>),
    LastEditedBy(Option<User>),
    Relation(Vec<RelationRef>),
    Rollup(Option<RollupResult>),
    Formula(Option<FormulaResult>),
    People(Vec<User>),
    UniqueId(Option<UniqueIdData>),
    Other {
        type_name: String,
        /// Whatever sat under the `type_name` key, if anything.
        value: Option<Value>,
    },
}

impl PropertyValue {
    /// Builds a property from its raw JSON object. Never fails.
    pub fn from_json(raw: &Value) -> Self {
        let type_name = raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let payload = raw.get(&type_name).cloned();

        match parse_known(&type_name, payload.clone().unwrap_or(Value::Null)) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => Self::Other {
                type_name,
                value: payload,
            },
            Err(e) => {
                log::debug!(
                    "Property of type '{}' has an unexpected shape ({}); rendering raw value",
                    type_name,
                    e
                );
                Self::Other {
                    type_name,
                    value: payload,
                }
            }
        }
    }

    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &str {
        match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::RichText(_) => "rich_text",
            PropertyValue::Number(_) => "number",
            PropertyValue::Select(_) => "select",
            PropertyValue::MultiSelect(_) => "multi_select",
            PropertyValue::Status(_) => "status",
            PropertyValue::Date(_) => "date",
            PropertyValue::Checkbox(_) => "checkbox",
            PropertyValue::Url(_) => "url",
            PropertyValue::Email(_) => "email",
            PropertyValue::PhoneNumber(_) => "phone_number",
            PropertyValue::Files(_) => "files",
            PropertyValue::CreatedTime(_) => "created_time",
            PropertyValue::LastEditedTime(_) => "last_edited_time",
            PropertyValue::CreatedBy(_) => "created_by",
            PropertyValue::LastEditedBy(_) => "last_edited_by",
            PropertyValue::Relation(_) => "relation",
            PropertyValue::Rollup(_) => "rollup",
            PropertyValue::Formula(_) => "formula",
            PropertyValue::People(_) => "people",
            PropertyValue::UniqueId(_) => "unique_id",
            PropertyValue::Other { type_name, .. } => type_name,
        }
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&raw))
    }
}

/// Dispatches on the discriminator. `Ok(None)` means the type is unknown.
fn parse_known(type_name: &str, payload: Value) -> Result<Option<PropertyValue>, serde_json::Error> {
    use PropertyValue::*;

    let parsed = match type_name {
        "title" => Title(list(payload)?),
        "rich_text" => RichText(list(payload)?),
        "number" => Number(decode(payload)?),
        "select" => Select(decode(payload)?),
        "multi_select" => MultiSelect(list(payload)?),
        "status" => Status(decode(payload)?),
        "date" => Date(decode(payload)?),
        "checkbox" => Checkbox(decode::<Option<bool>>(payload)?.unwrap_or(false)),
        "url" => Url(decode(payload)?),
        "email" => Email(decode(payload)?),
        "phone_number" => PhoneNumber(decode(payload)?),
        "files" => Files(decode(payload)?),
        "created_time" => CreatedTime(decode(payload)?),
        "last_edited_time" => LastEditedTime(decode(payload)?),
        "created_by" => CreatedBy(decode(payload)?),
        "last_edited_by" => LastEditedBy(decode(payload)?),
        "relation" => Relation(list(payload)?),
        "rollup" => Rollup(nested(payload, RollupResult::from_json)),
        "formula" => Formula(nested(payload, FormulaResult::from_json)),
        "people" => People(list(payload)?),
        "unique_id" => UniqueId(decode(payload)?),
        _ => return Ok(None),
    };
    Ok(Some(parsed))
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(payload)
}

/// Lists may be missing or `null`; both read as empty.
fn list<T: DeserializeOwned>(payload: Value) -> Result<Vec<T>, serde_json::Error> {
    Ok(decode::<Option<Vec<T>>>(payload)?.unwrap_or_default())
}

fn nested<T>(payload: Value, parse: fn(&Value) -> T) -> Option<T> {
    match payload {
        Value::Null => None,
        other => Some(parse(&other)),
    }
}

/// Result of a rollup, unwrapped by its own `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum RollupResult {
    Number(Option<f64>),
    Date(Option<DateValue>),
    /// Each item is itself a property-shaped object.
    Array(Vec<PropertyValue>),
    /// `string`, `boolean`, `unsupported`, `incomplete`, or anything newer.
    Other { type_name: String, value: Value },
}

impl RollupResult {
    pub fn from_json(raw: &Value) -> Self {
        let (type_name, inner) = split_nested(raw);
        let parsed = match type_name.as_str() {
            "number" => decode(inner.clone()).map(RollupResult::Number),
            "date" => decode(inner.clone()).map(RollupResult::Date),
            "array" => match &inner {
                Value::Array(items) => Ok(RollupResult::Array(
                    items.iter().map(PropertyValue::from_json).collect(),
                )),
                _ => Ok(RollupResult::Array(Vec::new())),
            },
            _ => Ok(RollupResult::Other {
                type_name: type_name.clone(),
                value: inner.clone(),
            }),
        };
        parsed.unwrap_or(RollupResult::Other {
            type_name,
            value: inner,
        })
    }

    pub fn type_name(&self) -> &str {
        match self {
            RollupResult::Number(_) => "number",
            RollupResult::Date(_) => "date",
            RollupResult::Array(_) => "array",
            RollupResult::Other { type_name, .. } => type_name,
        }
    }
}

/// Result of a formula, unwrapped by its own `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaResult {
    String(Option<String>),
    Number(Option<f64>),
    Boolean(Option<bool>),
    Date(Option<DateValue>),
    Other { type_name: String, value: Value },
}

impl FormulaResult {
    pub fn from_json(raw: &Value) -> Self {
        let (type_name, inner) = split_nested(raw);
        let parsed = match type_name.as_str() {
            "string" => decode(inner.clone()).map(FormulaResult::String),
            "number" => decode(inner.clone()).map(FormulaResult::Number),
            "boolean" => decode(inner.clone()).map(FormulaResult::Boolean),
            "date" => decode(inner.clone()).map(FormulaResult::Date),
            _ => Ok(FormulaResult::Other {
                type_name: type_name.clone(),
                value: inner.clone(),
            }),
        };
        parsed.unwrap_or(FormulaResult::Other {
            type_name,
            value: inner,
        })
    }

    pub fn type_name(&self) -> &str {
        match self {
            FormulaResult::String(_) => "string",
            FormulaResult::Number(_) => "number",
            FormulaResult::Boolean(_) => "boolean",
            FormulaResult::Date(_) => "date",
            FormulaResult::Other { type_name, .. } => type_name,
        }
    }
}

fn split_nested(raw: &Value) -> (String, Value) {
    let type_name = raw
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let inner = raw.get(&type_name).cloned().unwrap_or(Value::Null);
    (type_name, inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_known_types_parse() {
        let prop = PropertyValue::from_json(&json!({
            "id": "abc",
            "type": "select",
            "select": {"id": "1", "name": "Done", "color": "green"}
        }));
        assert_eq!(
            prop,
            PropertyValue::Select(Some(SelectOption {
                id: Some("1".into()),
                name: "Done".into(),
                color: Some("green".into()),
            }))
        );
        assert_eq!(prop.type_name(), "select");

        let prop = PropertyValue::from_json(&json!({"type": "checkbox", "checkbox": true}));
        assert_eq!(prop, PropertyValue::Checkbox(true));
    }

    #[test]
    fn test_unknown_type_becomes_other() {
        let prop = PropertyValue::from_json(&json!({"type": "unknown_type"}));
        assert_eq!(
            prop,
            PropertyValue::Other {
                type_name: "unknown_type".into(),
                value: None,
            }
        );
        assert_eq!(prop.type_name(), "unknown_type");
    }

    #[test]
    fn test_malformed_known_type_becomes_other() {
        let prop = PropertyValue::from_json(&json!({"type": "number", "number": "twelve"}));
        assert_eq!(
            prop,
            PropertyValue::Other {
                type_name: "number".into(),
                value: Some(json!("twelve")),
            }
        );
    }

    #[test]
    fn test_missing_lists_read_as_empty() {
        let prop = PropertyValue::from_json(&json!({"type": "title"}));
        assert_eq!(prop, PropertyValue::Title(vec![]));
        let prop = PropertyValue::from_json(&json!({"type": "files"}));
        assert_eq!(prop, PropertyValue::Files(None));
    }

    #[test]
    fn test_rollup_array_items_are_properties() {
        let prop = PropertyValue::from_json(&json!({
            "type": "rollup",
            "rollup": {
                "type": "array",
                "array": [
                    {"type": "number", "number": 3},
                    {"type": "title", "title": [{"plain_text": "Linked"}]}
                ],
                "function": "show_original"
            }
        }));
        assert_eq!(
            prop,
            PropertyValue::Rollup(Some(RollupResult::Array(vec![
                PropertyValue::Number(Some(3.0)),
                PropertyValue::Title(vec![RichTextItem::plain_text("Linked")]),
            ])))
        );
    }

    #[test]
    fn test_formula_variants() {
        let prop = PropertyValue::from_json(&json!({
            "type": "formula",
            "formula": {"type": "string", "string": "hello"}
        }));
        assert_eq!(
            prop,
            PropertyValue::Formula(Some(FormulaResult::String(Some("hello".into()))))
        );

        let prop = PropertyValue::from_json(&json!({"type": "formula", "formula": null}));
        assert_eq!(prop, PropertyValue::Formula(None));
    }

    #[test]
    fn test_deserialize_goes_through_from_json() {
        let prop: PropertyValue =
            serde_json::from_value(json!({"type": "email", "email": "a@b.co"})).unwrap();
        assert_eq!(prop, PropertyValue::Email(Some("a@b.co".into())));
    }
}
