//! # Load — JSON Data to Record Instances
//!
//! Decoding walks the record type's fields, not the input keys: unknown
//! input keys are never looked at, and absent or null fields are left to
//! default handling in [`RecordValue::new`]. Input is only borrowed, so the
//! caller's data is never modified.
//!
//! Per-field coercion by resolved type:
//!
//! | Type | Accepted wire value |
//! |---|---|
//! | date, datetime, time | ISO-8601 string, trailing `Z` stripped |
//! | Decimal | string or number |
//! | UUID | string |
//! | enum | a member's underlying value |
//! | record | mapping, loaded recursively |
//! | anything else | passed through unchanged |

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;
use serpens_core::temporal::{parse_date, parse_datetime, parse_time};
use serpens_core::{CoercionError, Datum};
use uuid::Uuid;

use crate::descriptor::RecordType;
use crate::error::SchemaError;
use crate::record::RecordValue;
use crate::types::FieldType;

impl RecordType {
    /// Load one record instance from a JSON mapping.
    ///
    /// # Errors
    ///
    /// - `Shape` if `data` is not a mapping.
    /// - `Coercion` if a special scalar fails to parse.
    /// - `RequiredFields` / `Validation` from construction.
    pub fn load(self: &Arc<Self>, data: &Value) -> Result<RecordValue, SchemaError> {
        let obj = data.as_object().ok_or_else(|| SchemaError::Shape {
            record: self.name().to_string(),
            expected: "a mapping",
            found: json_type_name(data),
        })?;

        let mut values = Vec::with_capacity(self.fields().len());
        for field in self.fields() {
            match obj.get(field.name()) {
                None | Some(Value::Null) => continue,
                Some(v) => values.push((field.name(), coerce(field.resolved_type(), v)?)),
            }
        }
        RecordValue::new(self, values)
    }

    /// Load a sequence of mappings, preserving input order.
    pub fn load_many(self: &Arc<Self>, data: &Value) -> Result<Vec<RecordValue>, SchemaError> {
        let items = data.as_array().ok_or_else(|| SchemaError::Shape {
            record: self.name().to_string(),
            expected: "a list",
            found: json_type_name(data),
        })?;
        items.iter().map(|item| self.load(item)).collect()
    }

    /// Parse JSON text, then [`load`](Self::load) it.
    pub fn loads(self: &Arc<Self>, text: &str) -> Result<RecordValue, SchemaError> {
        let data: Value = serde_json::from_str(text)?;
        self.load(&data)
    }

    /// Parse JSON text, then [`load_many`](Self::load_many) it.
    pub fn loads_many(self: &Arc<Self>, text: &str) -> Result<Vec<RecordValue>, SchemaError> {
        let data: Value = serde_json::from_str(text)?;
        self.load_many(&data)
    }
}

/// Convert a non-null wire value into a datum for the given resolved type.
pub(crate) fn coerce(ty: &FieldType, value: &Value) -> Result<Datum, SchemaError> {
    Ok(match ty {
        FieldType::Date => Datum::Date(parse_date(expect_str(value, "date")?)?),
        FieldType::DateTime => Datum::DateTime(parse_datetime(expect_str(value, "datetime")?)?),
        FieldType::Time => Datum::Time(parse_time(expect_str(value, "time")?)?),
        FieldType::Decimal => Datum::Decimal(coerce_decimal(value)?),
        FieldType::Uuid => {
            Datum::Uuid(Uuid::parse_str(expect_str(value, "UUID")?).map_err(CoercionError::from)?)
        }
        FieldType::Enum(e) => Datum::Enum(e.member_for_value(value)?),
        FieldType::Record(r) => r.load(value)?.into(),
        _ => Datum::from(value.clone()),
    })
}

fn expect_str<'a>(value: &'a Value, target: &'static str) -> Result<&'a str, CoercionError> {
    value.as_str().ok_or(CoercionError::WrongInput {
        target,
        found: json_type_name(value),
    })
}

fn coerce_decimal(value: &Value) -> Result<Decimal, CoercionError> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Decimal::from(i));
            }
            if let Some(u) = n.as_u64() {
                return Ok(Decimal::from(u));
            }
            // Shortest round-trip text, so 6500.1 becomes exactly 6500.1.
            n.to_string()
        }
        other => {
            return Err(CoercionError::WrongInput {
                target: "Decimal",
                found: json_type_name(other),
            })
        }
    };
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|e| Decimal::from_scientific(trimmed).map_err(|_| e))
        .map_err(|source| CoercionError::Decimal {
            input: text.clone(),
            source,
        })
}

/// JSON type name in the vocabulary of validation messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
