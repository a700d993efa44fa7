//! Explicit request/response schemas
//!
//! A [`Schema`] describes the fields of a JSON object. The pipeline uses it
//! three ways: to decode query-string and path values into typed JSON, to
//! validate request bodies, and to check handler output.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::error::{ValidationError, ValidationLocation};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Length bounds count characters
    String {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Number,
    Boolean,
    /// Hyphenated UUID carried as a JSON string
    Uuid,
    Array(Box<FieldKind>),
    Object(Schema),
    Any,
}

impl FieldKind {
    pub fn string() -> Self {
        FieldKind::String {
            min_len: None,
            max_len: None,
        }
    }

    pub fn string_len(min_len: usize, max_len: usize) -> Self {
        FieldKind::String {
            min_len: Some(min_len),
            max_len: Some(max_len),
        }
    }

    pub fn integer() -> Self {
        FieldKind::Integer {
            min: None,
            max: None,
        }
    }

    pub fn integer_range(min: i64, max: i64) -> Self {
        FieldKind::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn array(inner: FieldKind) -> Self {
        FieldKind::Array(Box::new(inner))
    }

    fn describe(&self) -> &'static str {
        match self {
            FieldKind::String { .. } => "a string",
            FieldKind::Integer { .. } => "an integer",
            FieldKind::Number => "a number",
            FieldKind::Boolean => "a boolean",
            FieldKind::Uuid => "a UUID",
            FieldKind::Array(_) => "an array",
            FieldKind::Object(_) => "an object",
            FieldKind::Any => "any value",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// Shape of a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub fields: Vec<FieldSchema>,
    /// Accept keys that are not declared
    pub allow_unknown: bool,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSchema {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSchema {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }

    pub fn allow_unknown(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check a JSON document against this schema
    ///
    /// `null` is treated as an empty object, so an absent body only fails
    /// when the schema has required fields. Optional fields may be `null`.
    pub fn validate(&self, value: &Value, location: ValidationLocation) -> Result<(), ValidationError> {
        self.validate_at(value, location, "")
    }

    fn validate_at(
        &self,
        value: &Value,
        location: ValidationLocation,
        prefix: &str,
    ) -> Result<(), ValidationError> {
        let empty = Map::new();
        let object = match value {
            Value::Object(object) => object,
            Value::Null => &empty,
            _ => {
                return Err(ValidationError::new(location, prefix, "expected a JSON object"));
            },
        };

        for field in &self.fields {
            let path = join_path(prefix, &field.name);
            match object.get(&field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(ValidationError::new(location, path, "is required"));
                },
                None | Some(Value::Null) => {},
                Some(value) => check_kind(value, &field.kind, location, &path)?,
            }
        }

        if !self.allow_unknown {
            if let Some(key) = object.keys().find(|key| self.field(key).is_none()) {
                return Err(ValidationError::new(
                    location,
                    join_path(prefix, key),
                    "is not an allowed field",
                ));
            }
        }

        Ok(())
    }

    /// Decode query-string pairs into typed JSON and validate the result
    ///
    /// Repeated keys collect into an array, which only an `Array` field
    /// accepts. Undeclared keys are rejected unless `allow_unknown` is set,
    /// in which case they are kept as strings.
    pub fn decode_query(&self, pairs: &[(String, String)]) -> Result<Map<String, Value>, ValidationError> {
        self.decode_pairs(pairs, ValidationLocation::Query)
    }

    /// Decode path captures the same way as query pairs
    pub fn decode_params(&self, params: &HashMap<String, String>) -> Result<Map<String, Value>, ValidationError> {
        let pairs: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.decode_pairs(&pairs, ValidationLocation::Params)
    }

    fn decode_pairs(
        &self,
        pairs: &[(String, String)],
        location: ValidationLocation,
    ) -> Result<Map<String, Value>, ValidationError> {
        let mut decoded = Map::new();

        for (key, raw_values) in group_pairs(pairs) {
            let value = match self.field(&key) {
                Some(field) => decode_field(&field.kind, &raw_values, location, &key)?,
                None if self.allow_unknown => strings_to_value(raw_values),
                None => {
                    return Err(ValidationError::new(location, key, "is not an allowed parameter"));
                },
            };
            decoded.insert(key, value);
        }

        self.validate(&Value::Object(decoded.clone()), location)?;
        Ok(decoded)
    }
}

/// Query pairs as untyped JSON: strings, or arrays of strings for repeated keys
pub fn untyped_pairs(pairs: &[(String, String)]) -> Map<String, Value> {
    group_pairs(pairs)
        .into_iter()
        .map(|(key, values)| (key, strings_to_value(values)))
        .collect()
}

fn group_pairs(pairs: &[(String, String)]) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in pairs {
        match grouped.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value.clone()),
            None => grouped.push((key.clone(), vec![value.clone()])),
        }
    }
    grouped
}

fn strings_to_value(mut values: Vec<String>) -> Value {
    if values.len() == 1 {
        Value::String(values.remove(0))
    } else {
        Value::Array(values.into_iter().map(Value::String).collect())
    }
}

fn decode_field(
    kind: &FieldKind,
    raw_values: &[String],
    location: ValidationLocation,
    path: &str,
) -> Result<Value, ValidationError> {
    match (kind, raw_values) {
        (FieldKind::Array(inner), values) => values
            .iter()
            .enumerate()
            .map(|(i, raw)| decode_scalar(inner, raw, location, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (kind, [raw]) => decode_scalar(kind, raw, location, path),
        _ => Err(ValidationError::new(location, path, "expected a single value")),
    }
}

fn decode_scalar(
    kind: &FieldKind,
    raw: &str,
    location: ValidationLocation,
    path: &str,
) -> Result<Value, ValidationError> {
    let mismatch = || ValidationError::new(location, path, format!("expected {}", kind.describe()));

    match kind {
        FieldKind::String { .. } | FieldKind::Any => Ok(Value::String(raw.to_string())),
        FieldKind::Integer { .. } => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| mismatch()),
        FieldKind::Number => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(mismatch),
        FieldKind::Boolean => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(mismatch()),
        },
        FieldKind::Uuid => Uuid::parse_str(raw)
            .map(|id| Value::String(id.to_string()))
            .map_err(|_| mismatch()),
        FieldKind::Array(_) | FieldKind::Object(_) => Err(ValidationError::new(
            location,
            path,
            format!("{} cannot be passed as a single parameter", kind.describe()),
        )),
    }
}

fn check_kind(
    value: &Value,
    kind: &FieldKind,
    location: ValidationLocation,
    path: &str,
) -> Result<(), ValidationError> {
    let mismatch = || ValidationError::new(location, path, format!("expected {}", kind.describe()));

    match kind {
        FieldKind::String { min_len, max_len } => {
            let s = value.as_str().ok_or_else(mismatch)?;
            let len = s.chars().count();
            if let Some(min) = min_len {
                if len < *min {
                    return Err(ValidationError::new(
                        location,
                        path,
                        format!("must be at least {} characters", min),
                    ));
                }
            }
            if let Some(max) = max_len {
                if len > *max {
                    return Err(ValidationError::new(
                        location,
                        path,
                        format!("must be at most {} characters", max),
                    ));
                }
            }
        },
        FieldKind::Integer { min, max } => {
            let n = value.as_i64().ok_or_else(mismatch)?;
            if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
                return Err(ValidationError::new(
                    location,
                    path,
                    format!(
                        "must be between {} and {}",
                        min.map_or("-inf".to_string(), |m| m.to_string()),
                        max.map_or("inf".to_string(), |m| m.to_string())
                    ),
                ));
            }
        },
        FieldKind::Number => {
            if !value.is_number() {
                return Err(mismatch());
            }
        },
        FieldKind::Boolean => {
            if !value.is_boolean() {
                return Err(mismatch());
            }
        },
        FieldKind::Uuid => {
            let s = value.as_str().ok_or_else(mismatch)?;
            Uuid::parse_str(s).map_err(|_| mismatch())?;
        },
        FieldKind::Array(inner) => {
            let items = value.as_array().ok_or_else(mismatch)?;
            for (i, item) in items.iter().enumerate() {
                check_kind(item, inner, location, &format!("{}[{}]", path, i))?;
            }
        },
        FieldKind::Object(schema) => {
            if !value.is_object() {
                return Err(mismatch());
            }
            schema.validate_at(value, location, path)?;
        },
        FieldKind::Any => {},
    }

    Ok(())
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
