//! # Dump — Record Instances to JSON
//!
//! Dumping routes every field through the canonical encoder in
//! `serpens_core::encode`, so `dump` and `dumps` always agree: parsing the
//! text produced by `dumps` yields exactly the value produced by `dump`.

use serde_json::Value;
use serpens_core::encode::record_to_value_with;
use serpens_core::{EncodeError, EncodeOptions};

use crate::error::SchemaError;
use crate::record::RecordValue;

impl RecordValue {
    /// Encode into a JSON mapping with default options.
    pub fn dump(&self) -> Result<Value, SchemaError> {
        self.dump_with(&EncodeOptions::default())
    }

    /// Encode into a JSON mapping.
    ///
    /// # Errors
    ///
    /// `Encode` if a field holds a value with no wire form.
    pub fn dump_with(&self, opts: &EncodeOptions) -> Result<Value, SchemaError> {
        Ok(record_to_value_with(self.data(), opts)?)
    }

    /// Encode into compact JSON text with default options.
    pub fn dumps(&self) -> Result<String, SchemaError> {
        self.dumps_with(&EncodeOptions::default())
    }

    /// Encode into compact JSON text.
    pub fn dumps_with(&self, opts: &EncodeOptions) -> Result<String, SchemaError> {
        to_text(&self.dump_with(opts)?)
    }
}

/// Encode a sequence of records into a JSON list, preserving order.
pub fn dump_many(records: &[RecordValue]) -> Result<Value, SchemaError> {
    dump_many_with(records, &EncodeOptions::default())
}

/// Encode a sequence of records into a JSON list with explicit options.
pub fn dump_many_with(records: &[RecordValue], opts: &EncodeOptions) -> Result<Value, SchemaError> {
    records
        .iter()
        .map(|r| r.dump_with(opts))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Encode a sequence of records into compact JSON text.
pub fn dumps_many(records: &[RecordValue]) -> Result<String, SchemaError> {
    to_text(&dump_many(records)?)
}

fn to_text(value: &Value) -> Result<String, SchemaError> {
    serde_json::to_string(value).map_err(|e| SchemaError::Encode(EncodeError::from(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use serpens_core::{Datum, Opaque};

    use crate::descriptor::{FieldDescriptor, RecordType};
    use crate::types::{EnumType, FieldType};

    struct TypeVar;

    fn empty_list() -> Datum {
        Datum::List(Vec::new())
    }

    fn employee() -> Arc<RecordType> {
        let level = EnumType::new("Level", [("MIDDLE", "middle"), ("SENIOR", "senior")]);
        let person = RecordType::builder("PersonSchema")
            .field(FieldDescriptor::new("name", FieldType::Str))
            .field(FieldDescriptor::new("age", FieldType::Int))
            .field(FieldDescriptor::new("hobby", FieldType::List).with_default_factory(empty_list))
            .build()
            .unwrap();
        RecordType::builder("EmployeeSchema")
            .field(FieldDescriptor::new("person", FieldType::Record(person)))
            .field(FieldDescriptor::new("uid", FieldType::Uuid))
            .field(FieldDescriptor::new("office", FieldType::Str))
            .field(FieldDescriptor::new("salary", FieldType::Decimal))
            .field(FieldDescriptor::new("level", FieldType::Enum(level)))
            .field(FieldDescriptor::new("registered", FieldType::Date))
            .build()
            .unwrap()
    }

    fn employee_json() -> Value {
        json!({
            "person": {"name": "John Doe", "age": 30, "hobby": ["walk"]},
            "uid": "dc675e20-6e8b-4b05-a8ce-4459560526c3",
            "office": "main",
            "salary": 6500.1,
            "level": "middle",
            "registered": "2021-01-01"
        })
    }

    #[test]
    fn test_dump_matches_loaded_input() {
        let e = employee().load(&employee_json()).unwrap();
        assert_eq!(e.dump().unwrap(), employee_json());
    }

    #[test]
    fn test_dumps_parses_back_to_dump() {
        let e = employee().load(&employee_json()).unwrap();
        let text = e.dumps().unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, e.dump().unwrap());
    }

    #[test]
    fn test_dump_decimal_as_string() {
        let e = employee().load(&employee_json()).unwrap();
        let v = e.dump_with(&EncodeOptions::decimal_as_string()).unwrap();
        assert_eq!(v["salary"], json!("6500.1"));
    }

    #[test]
    fn test_dump_many_preserves_order() {
        let rt = employee();
        let mut second = employee_json();
        second["office"] = json!("branch");
        let records = rt.load_many(&json!([employee_json(), second])).unwrap();
        let v = dump_many(&records).unwrap();
        assert_eq!(v[0]["office"], json!("main"));
        assert_eq!(v[1]["office"], json!("branch"));
        let parsed: Value = serde_json::from_str(&dumps_many(&records).unwrap()).unwrap();
        assert_eq!(parsed, v);
    }

    #[test]
    fn test_dump_not_serializable() {
        let rt = RecordType::builder("Holder")
            .field(FieldDescriptor::new("payload", FieldType::Any))
            .build()
            .unwrap();
        let r = RecordValue::new(&rt, [("payload", Datum::Opaque(Opaque::new(TypeVar)))]).unwrap();
        let err = r.dump().unwrap_err();
        assert!(matches!(err, SchemaError::Encode(EncodeError::NotSerializable { .. })));
        assert_eq!(err.to_string(), "Object of type TypeVar is not JSON serializable");
        assert!(r.dumps().is_err());
    }
}
