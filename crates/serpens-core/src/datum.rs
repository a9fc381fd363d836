//! # Datum — the In-Memory Value Model
//!
//! `Datum` is the typed counterpart of `serde_json::Value`. Load produces
//! datums from wire data, construction validates them against field types,
//! and the encoder in [`crate::encode`] renders them back to JSON.
//!
//! Beyond the plain JSON shapes, a datum can hold the special scalars
//! (dates, times, decimals, UUIDs, enum members), a nested record, or an
//! [`Opaque`] host value that deliberately has no wire form.
//!
//! ## Conversions
//!
//! - `From<T> for Datum` for every supported Rust type, plus `Option<T>`,
//!   `Vec<T>` and `BTreeMap<String, T>`.
//! - [`FromDatum`] for the reverse direction. A mismatch hands the datum
//!   back so the caller can report it.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

/// A typed value held by a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// Absent value (`null` on the wire).
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// String.
    Str(String),
    /// Sequence of values.
    List(Vec<Datum>),
    /// String-keyed mapping.
    Map(BTreeMap<String, Datum>),
    /// Calendar date.
    Date(NaiveDate),
    /// Naive date-time.
    DateTime(NaiveDateTime),
    /// Time of day.
    Time(NaiveTime),
    /// Arbitrary-precision decimal.
    Decimal(Decimal),
    /// UUID.
    Uuid(Uuid),
    /// Member of a declared enumeration.
    Enum(EnumMember),
    /// Nested record.
    Record(RecordData),
    /// Host value without a wire representation.
    Opaque(Opaque),
}

impl Datum {
    /// Name of this value's type, in the vocabulary used by error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Null => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Map(_) => "dict",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Time(_) => "time",
            Self::Decimal(_) => "Decimal",
            Self::Uuid(_) => "UUID",
            Self::Enum(m) => &m.enum_name,
            Self::Record(r) => &r.name,
            Self::Opaque(o) => &o.type_name,
        }
    }

    /// Returns true for [`Datum::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Value> for Datum {
    /// Plain conversion: JSON shapes map onto their direct counterparts,
    /// no special scalar is inferred.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                // u64 beyond i64::MAX and true floats both land here.
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Str(s),
            Value::Array(items) => Self::List(items.into_iter().map(Datum::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Datum::from(v))).collect())
            }
        }
    }
}

/// A member of a declared enumeration: its symbolic name and wire value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    /// Name of the enumeration the member belongs to.
    pub enum_name: String,
    /// Symbolic member name (e.g. `MIDDLE`).
    pub name: String,
    /// Underlying wire value (e.g. `"middle"`).
    pub value: Value,
}

/// Field values of a record instance, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordData {
    name: String,
    fields: Vec<(String, Datum)>,
}

impl RecordData {
    /// Assemble record data. No validation happens here.
    pub fn new(name: impl Into<String>, fields: Vec<(String, Datum)>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Name of the record type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All fields, in declaration order.
    pub fn fields(&self) -> &[(String, Datum)] {
        &self.fields
    }

    /// Look up a field value by name.
    pub fn get(&self, field: &str) -> Option<&Datum> {
        self.fields.iter().find(|(n, _)| n == field).map(|(_, d)| d)
    }

    /// Remove a field and return its value.
    pub fn take(&mut self, field: &str) -> Option<Datum> {
        let idx = self.fields.iter().position(|(n, _)| n == field)?;
        Some(self.fields.remove(idx).1)
    }
}

/// A host value with no JSON representation.
///
/// Carries the short name of its Rust type so encoding can report it.
/// Two opaque datums are equal only when they share the same allocation.
#[derive(Clone)]
pub struct Opaque {
    type_name: String,
    value: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    /// Wrap a host value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: short_type_name(std::any::type_name::<T>()).to_string(),
            value: Arc::new(value),
        }
    }

    /// Short name of the wrapped type (`TypeVar`, not `my_crate::TypeVar`).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Borrow the wrapped value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque<{}>", self.type_name)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

macro_rules! datum_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Datum {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

datum_from! {
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    String => Str,
    &str => Str,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    NaiveTime => Time,
    Decimal => Decimal,
    Uuid => Uuid,
    EnumMember => Enum,
    RecordData => Record,
    Opaque => Opaque,
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Datum>> From<Vec<T>> for Datum {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Datum>> From<BTreeMap<String, T>> for Datum {
    fn from(v: BTreeMap<String, T>) -> Self {
        Self::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// Extract a Rust value from a datum.
///
/// `Err` returns the datum that did not match, unchanged.
pub trait FromDatum: Sized {
    /// Type name reported when the datum does not match.
    const TYPE_NAME: &'static str;

    /// Convert, or hand the datum back.
    fn from_datum(datum: Datum) -> Result<Self, Datum>;
}

macro_rules! from_datum {
    ($($ty:ty => $variant:ident, $name:literal),* $(,)?) => {
        $(
            impl FromDatum for $ty {
                const TYPE_NAME: &'static str = $name;

                fn from_datum(datum: Datum) -> Result<Self, Datum> {
                    match datum {
                        Datum::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

from_datum! {
    bool => Bool, "bool",
    i64 => Int, "int",
    f64 => Float, "float",
    String => Str, "str",
    NaiveDate => Date, "date",
    NaiveDateTime => DateTime, "datetime",
    NaiveTime => Time, "time",
    Decimal => Decimal, "Decimal",
    Uuid => Uuid, "UUID",
}

impl FromDatum for Datum {
    const TYPE_NAME: &'static str = "any";

    fn from_datum(datum: Datum) -> Result<Self, Datum> {
        Ok(datum)
    }
}

impl<T: FromDatum> FromDatum for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_datum(datum: Datum) -> Result<Self, Datum> {
        match datum {
            Datum::Null => Ok(None),
            other => T::from_datum(other).map(Some),
        }
    }
}

impl<T: FromDatum> FromDatum for Vec<T> {
    const TYPE_NAME: &'static str = "list";

    fn from_datum(datum: Datum) -> Result<Self, Datum> {
        match datum {
            Datum::List(items) => items.into_iter().map(T::from_datum).collect(),
            other => Err(other),
        }
    }
}

impl<T: FromDatum> FromDatum for BTreeMap<String, T> {
    const TYPE_NAME: &'static str = "dict";

    fn from_datum(datum: Datum) -> Result<Self, Datum> {
        match datum {
            Datum::Map(map) => map
                .into_iter()
                .map(|(k, v)| T::from_datum(v).map(|v| (k, v)))
                .collect(),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct TypeVar;

    #[test]
    fn test_from_json_plain_shapes() {
        let d = Datum::from(json!({"name": "John", "age": 30, "ratio": 0.5, "tags": ["a"], "x": null}));
        let Datum::Map(map) = d else {
            panic!("expected map");
        };
        assert_eq!(map["name"], Datum::Str("John".into()));
        assert_eq!(map["age"], Datum::Int(30));
        assert_eq!(map["ratio"], Datum::Float(0.5));
        assert_eq!(map["tags"], Datum::List(vec![Datum::Str("a".into())]));
        assert!(map["x"].is_null());
    }

    #[test]
    fn test_from_json_never_infers_special_scalars() {
        let d = Datum::from(json!("dc675e20-6e8b-4b05-a8ce-4459560526c3"));
        assert_eq!(d.type_name(), "str");
    }

    #[test]
    fn test_opaque_short_type_name() {
        let o = Opaque::new(TypeVar);
        assert_eq!(o.type_name(), "TypeVar");
        assert!(o.downcast_ref::<TypeVar>().is_some());
        assert_eq!(Datum::Opaque(o).type_name(), "TypeVar");
    }

    #[test]
    fn test_opaque_generic_type_name() {
        let o = Opaque::new(std::collections::HashSet::<u8>::new());
        assert_eq!(o.type_name(), "HashSet");
    }

    #[test]
    fn test_opaque_equality_is_identity() {
        let a = Opaque::new(1u8);
        let b = Opaque::new(1u8);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_data_get_and_take() {
        let mut r = RecordData::new(
            "PersonSchema",
            vec![("name".into(), "John".into()), ("age".into(), 30i64.into())],
        );
        assert_eq!(r.get("age"), Some(&Datum::Int(30)));
        assert_eq!(r.take("name"), Some(Datum::Str("John".into())));
        assert_eq!(r.get("name"), None);
        assert_eq!(r.fields().len(), 1);
    }

    #[test]
    fn test_from_datum_match_and_mismatch() {
        assert_eq!(String::from_datum(Datum::Str("x".into())), Ok("x".to_string()));
        assert_eq!(i64::from_datum(Datum::Str("x".into())), Err(Datum::Str("x".into())));
    }

    #[test]
    fn test_from_datum_option_and_vec() {
        assert_eq!(Option::<i64>::from_datum(Datum::Null), Ok(None));
        let v = Vec::<String>::from_datum(Datum::from(vec!["walk", "swim"])).unwrap();
        assert_eq!(v, vec!["walk".to_string(), "swim".to_string()]);
        assert!(Vec::<i64>::from_datum(Datum::from(vec!["walk"])).is_err());
    }

    #[test]
    fn test_from_option_none_is_null() {
        assert!(Datum::from(None::<String>).is_null());
        assert_eq!(Datum::from(Some(3i64)), Datum::Int(3));
    }
}
