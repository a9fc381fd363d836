//! # Canonical Encoder — Datum to JSON
//!
//! The single path from in-memory values to wire data. Record dumps and
//! ad hoc maps both flow through [`to_value_with`], so every serializer in
//! the system renders the special scalars the same way:
//!
//! | In-memory type | Wire form |
//! |---|---|
//! | date / datetime / time | ISO-8601 string |
//! | Decimal | JSON number (or decimal string, see [`DecimalWire`]) |
//! | UUID | hyphenated string |
//! | enum member | the member's underlying value |
//! | record | object of its fields |
//!
//! Opaque host values fail with
//! `Object of type <TypeName> is not JSON serializable`.
//!
//! `Datum` also implements `serde::Serialize` on top of this module, so it
//! can be embedded in any serde-serializable structure.

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::datum::{Datum, RecordData};
use crate::error::EncodeError;
use crate::temporal::{format_date, format_datetime, format_time};

/// Wire form for `Decimal` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecimalWire {
    /// Floating-point JSON number. Precision beyond `f64` is lost.
    #[default]
    Float,
    /// Decimal string, exact.
    String,
}

/// Encoder settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// How decimals are rendered.
    pub decimal: DecimalWire,
}

impl EncodeOptions {
    /// Render decimals as exact strings.
    pub fn decimal_as_string() -> Self {
        Self {
            decimal: DecimalWire::String,
        }
    }
}

/// Encode a datum with default options.
pub fn to_value(datum: &Datum) -> Result<Value, EncodeError> {
    to_value_with(datum, &EncodeOptions::default())
}

/// Encode a datum into a JSON value tree.
pub fn to_value_with(datum: &Datum, opts: &EncodeOptions) -> Result<Value, EncodeError> {
    Ok(match datum {
        Datum::Null => Value::Null,
        Datum::Bool(b) => Value::Bool(*b),
        Datum::Int(i) => Value::Number((*i).into()),
        Datum::Float(f) => float_value(*f)?,
        Datum::Str(s) => Value::String(s.clone()),
        Datum::List(items) => Value::Array(
            items
                .iter()
                .map(|d| to_value_with(d, opts))
                .collect::<Result<_, _>>()?,
        ),
        Datum::Map(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(k.clone(), to_value_with(v, opts)?);
            }
            Value::Object(out)
        }
        Datum::Date(d) => Value::String(format_date(d)),
        Datum::DateTime(dt) => Value::String(format_datetime(dt)),
        Datum::Time(t) => Value::String(format_time(t)),
        Datum::Decimal(d) => match opts.decimal {
            DecimalWire::Float => {
                // Through the decimal text, so the nearest double is chosen.
                let f: f64 = d.to_string().parse().map_err(|_| EncodeError::NotSerializable {
                    type_name: "Decimal".to_string(),
                })?;
                float_value(f)?
            }
            DecimalWire::String => Value::String(d.to_string()),
        },
        Datum::Uuid(u) => Value::String(u.hyphenated().to_string()),
        Datum::Enum(member) => member.value.clone(),
        Datum::Record(record) => record_to_value_with(record, opts)?,
        Datum::Opaque(o) => {
            return Err(EncodeError::NotSerializable {
                type_name: o.type_name().to_string(),
            })
        }
    })
}

/// Encode a record's fields into a JSON object.
pub fn record_to_value_with(record: &RecordData, opts: &EncodeOptions) -> Result<Value, EncodeError> {
    let mut out = Map::new();
    for (k, v) in record.fields() {
        out.insert(k.clone(), to_value_with(v, opts)?);
    }
    Ok(Value::Object(out))
}

fn float_value(f: f64) -> Result<Value, EncodeError> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or(EncodeError::NonFiniteFloat(f))
}

impl Serialize for Datum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_value(self)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}
