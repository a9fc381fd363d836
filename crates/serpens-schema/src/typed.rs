//! # Typed Records
//!
//! The dynamic engine works on [`RecordValue`]s. Application code usually
//! wants its own structs and enums instead; implementing [`Record`] (and
//! [`Enumeration`] for enums) plugs them into the same load and dump paths:
//!
//! ```ignore
//! impl Record for PersonSchema {
//!     fn record_type() -> Arc<RecordType> { PERSON.get_or_init(build_person).clone() }
//!
//!     fn from_record(data: RecordData) -> Result<Self, SchemaError> {
//!         let mut r = FieldReader::new(data);
//!         Ok(Self { name: r.take("name")?, age: r.take("age")?, hobby: r.take("hobby")? })
//!     }
//!
//!     fn to_record(&self) -> Result<RecordValue, SchemaError> {
//!         RecordValue::new(&Self::record_type(), [
//!             ("name", self.name.clone().into()),
//!             ("age", self.age.into()),
//!             ("hobby", self.hobby.clone().into()),
//!         ])
//!     }
//! }
//!
//! let person: PersonSchema = serpens_schema::load(&data)?;
//! ```
//!
//! `to_record` goes through [`RecordValue::new`], so typed values are
//! validated against the descriptor table exactly like loaded data.

use std::sync::Arc;

use serde_json::Value;
use serpens_core::{Datum, EncodeOptions, FromDatum, RecordData};

use crate::descriptor::RecordType;
use crate::dump::dump_many_with;
use crate::error::{SchemaError, Violation, Violations};
use crate::record::RecordValue;
use crate::types::EnumType;

/// A Rust type with a record-type descriptor table.
pub trait Record: Sized {
    /// The descriptor table for this type.
    fn record_type() -> Arc<RecordType>;

    /// Build from validated field values.
    fn from_record(data: RecordData) -> Result<Self, SchemaError>;

    /// Convert into a validated record instance.
    fn to_record(&self) -> Result<RecordValue, SchemaError>;
}

/// A Rust enum backed by a declared [`EnumType`].
pub trait Enumeration: Sized {
    /// The declared enumeration.
    fn enum_type() -> Arc<EnumType>;

    /// Symbolic member name of this variant.
    fn member_name(&self) -> &'static str;

    /// Variant for a symbolic member name.
    fn from_member_name(name: &str) -> Option<Self>;

    /// This variant as an enum-member datum.
    fn to_datum(&self) -> Result<Datum, SchemaError> {
        let et = Self::enum_type();
        et.member(self.member_name())
            .map(Datum::Enum)
            .ok_or_else(|| SchemaError::UnknownType(format!("{}.{}", et.name(), self.member_name())))
    }
}

/// A nested typed record as a datum.
pub fn record_datum<T: Record>(value: &T) -> Result<Datum, SchemaError> {
    Ok(value.to_record()?.into())
}

/// Pulls typed field values out of validated record data.
#[derive(Debug)]
pub struct FieldReader {
    data: RecordData,
}

impl FieldReader {
    /// Wrap record data.
    pub fn new(data: RecordData) -> Self {
        Self { data }
    }

    /// Take a field as any [`FromDatum`] type.
    pub fn take<T: FromDatum>(&mut self, field: &str) -> Result<T, SchemaError> {
        let datum = self.take_datum(field)?;
        T::from_datum(datum).map_err(|_| wrong_type(field, T::TYPE_NAME))
    }

    /// Take a nested record field.
    pub fn take_record<T: Record>(&mut self, field: &str) -> Result<T, SchemaError> {
        match self.take_datum(field)? {
            Datum::Record(data) => T::from_record(data),
            _ => Err(wrong_type(field, T::record_type().name())),
        }
    }

    /// Take an optional nested record field.
    pub fn take_optional_record<T: Record>(&mut self, field: &str) -> Result<Option<T>, SchemaError> {
        match self.take_datum(field)? {
            Datum::Null => Ok(None),
            Datum::Record(data) => T::from_record(data).map(Some),
            _ => Err(wrong_type(field, T::record_type().name())),
        }
    }

    /// Take an enum field.
    pub fn take_enum<E: Enumeration>(&mut self, field: &str) -> Result<E, SchemaError> {
        match self.take_datum(field)? {
            Datum::Enum(m) => E::from_member_name(&m.name)
                .ok_or_else(|| wrong_type(field, E::enum_type().name())),
            _ => Err(wrong_type(field, E::enum_type().name())),
        }
    }

    fn take_datum(&mut self, field: &str) -> Result<Datum, SchemaError> {
        self.data.take(field).ok_or_else(|| {
            SchemaError::RequiredFields(Violations::new(vec![Violation::required(field)]))
        })
    }
}

fn wrong_type(field: &str, type_name: &str) -> SchemaError {
    SchemaError::Validation(Violations::new(vec![Violation::wrong_type(field, type_name)]))
}

/// Load a typed record from a JSON mapping.
pub fn load<T: Record>(data: &Value) -> Result<T, SchemaError> {
    T::from_record(T::record_type().load(data)?.into_data())
}

/// Load typed records from a JSON list, preserving order.
pub fn load_many<T: Record>(data: &Value) -> Result<Vec<T>, SchemaError> {
    T::record_type()
        .load_many(data)?
        .into_iter()
        .map(|r| T::from_record(r.into_data()))
        .collect()
}

/// Parse JSON text into a typed record.
pub fn loads<T: Record>(text: &str) -> Result<T, SchemaError> {
    let data: Value = serde_json::from_str(text)?;
    load(&data)
}

/// Parse JSON text into typed records.
pub fn loads_many<T: Record>(text: &str) -> Result<Vec<T>, SchemaError> {
    let data: Value = serde_json::from_str(text)?;
    load_many(&data)
}

/// Dump a typed record into a JSON mapping.
pub fn dump<T: Record>(value: &T) -> Result<Value, SchemaError> {
    value.to_record()?.dump()
}

/// Dump typed records into a JSON list.
pub fn dump_many<T: Record>(values: &[T]) -> Result<Value, SchemaError> {
    dump_many_typed(values, &EncodeOptions::default())
}

/// Dump a typed record into compact JSON text.
pub fn dumps<T: Record>(value: &T) -> Result<String, SchemaError> {
    value.to_record()?.dumps()
}

/// Dump typed records into compact JSON text.
pub fn dumps_many<T: Record>(values: &[T]) -> Result<String, SchemaError> {
    let value = dump_many(values)?;
    serde_json::to_string(&value).map_err(|e| SchemaError::Encode(e.into()))
}

fn dump_many_typed<T: Record>(values: &[T], opts: &EncodeOptions) -> Result<Value, SchemaError> {
    let records = values
        .iter()
        .map(T::to_record)
        .collect::<Result<Vec<_>, _>>()?;
    dump_many_with(&records, opts)
}
