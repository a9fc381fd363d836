//! # Record Construction and Validation
//!
//! [`RecordValue::new`] is the only way to build a record instance. It fills
//! defaults, reports every missing required field at once, then checks each
//! field's value against its resolved type and reports every mismatch at
//! once. A constructed `RecordValue` is never mutated afterwards.
//!
//! ## Null Skip
//!
//! A field with no default whose value is null is not type-checked. This
//! mirrors long-standing behaviour: through `load`, such a field is reported
//! as missing instead, but direct construction with an explicit null is
//! accepted.
//!
//! ## Strict Scalars
//!
//! Type checks match the datum variant exactly. A boolean is not an `int`,
//! an integer is not a `float`, and a JSON integer outside the `i64` range
//! loads as a float, so it fails an `int` field.

use std::sync::Arc;

use serpens_core::{Datum, RecordData};

use crate::descriptor::RecordType;
use crate::error::{SchemaError, Violation, Violations};

/// A validated instance of a [`RecordType`].
#[derive(Debug, Clone)]
pub struct RecordValue {
    record_type: Arc<RecordType>,
    data: RecordData,
}

impl RecordValue {
    /// Construct and validate a record instance from field values.
    ///
    /// # Errors
    ///
    /// - `UnknownField` / `DuplicateField` for undeclared or repeated names.
    /// - `RequiredFields` listing every absent required field.
    /// - `Validation` listing every field whose value has the wrong type.
    pub fn new<I, K>(record_type: &Arc<RecordType>, values: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (K, Datum)>,
        K: Into<String>,
    {
        let mut supplied: Vec<(String, Datum)> = Vec::new();
        for (name, value) in values {
            let name = name.into();
            if record_type.field(&name).is_none() {
                return Err(SchemaError::UnknownField {
                    record: record_type.name().to_string(),
                    field: name,
                });
            }
            if supplied.iter().any(|(n, _)| *n == name) {
                return Err(SchemaError::DuplicateField {
                    record: record_type.name().to_string(),
                    field: name,
                });
            }
            supplied.push((name, value));
        }

        let mut fields = Vec::with_capacity(record_type.fields().len());
        let mut missing = Vec::new();
        for field in record_type.fields() {
            let given = supplied
                .iter()
                .position(|(n, _)| n == field.name())
                .map(|i| supplied.swap_remove(i).1);
            let value = match given.or_else(|| field.default_policy().produce()) {
                Some(v) => v,
                None if field.is_optional() => Datum::Null,
                None => {
                    missing.push(Violation::required(field.name()));
                    continue;
                }
            };
            fields.push((field.name().to_string(), value));
        }
        if !missing.is_empty() {
            return Err(SchemaError::RequiredFields(Violations::new(missing)));
        }

        validate(record_type, &fields)?;

        Ok(Self {
            data: RecordData::new(record_type.name(), fields),
            record_type: Arc::clone(record_type),
        })
    }

    /// The record type this instance belongs to.
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    /// Look up a field value by name.
    pub fn get(&self, field: &str) -> Option<&Datum> {
        self.data.get(field)
    }

    /// Borrow the field values.
    pub fn data(&self) -> &RecordData {
        &self.data
    }

    /// Consume into the field values.
    pub fn into_data(self) -> RecordData {
        self.data
    }
}

impl PartialEq for RecordValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.record_type, &other.record_type) && self.data == other.data
    }
}

impl From<RecordValue> for Datum {
    fn from(value: RecordValue) -> Self {
        Datum::Record(value.data)
    }
}

/// Check every field against its resolved type, collecting all mismatches.
fn validate(record_type: &RecordType, fields: &[(String, Datum)]) -> Result<(), SchemaError> {
    let mut violations = Vec::new();
    for (field, (_, value)) in record_type.fields().iter().zip(fields) {
        if value.is_null() && (!field.default_policy().is_some() || field.is_optional()) {
            continue;
        }
        if !field.resolved_type().accepts(value) {
            violations.push(Violation::wrong_type(
                field.name(),
                &field.resolved_type().type_name(),
            ));
        }
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Validation(Violations::new(violations)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldDescriptor;
    use crate::types::FieldType;

    fn empty_list() -> Datum {
        Datum::List(Vec::new())
    }

    fn person() -> Arc<RecordType> {
        RecordType::builder("PersonSchema")
            .field(FieldDescriptor::new("name", FieldType::Str))
            .field(FieldDescriptor::new("age", FieldType::Int))
            .field(FieldDescriptor::new("hobby", FieldType::List).with_default_factory(empty_list))
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_fills_defaults() {
        let p = RecordValue::new(&person(), [("name", Datum::from("John")), ("age", Datum::Int(30))])
            .unwrap();
        assert_eq!(p.get("hobby"), Some(&Datum::List(Vec::new())));
        assert_eq!(p.data().fields().len(), 3);
    }

    #[test]
    fn test_fields_in_declaration_order() {
        let p = RecordValue::new(&person(), [("age", Datum::Int(30)), ("name", Datum::from("John"))])
            .unwrap();
        let names: Vec<&str> = p.data().fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "hobby"]);
    }

    #[test]
    fn test_missing_required_reports_each_field() {
        let err = RecordValue::new(&person(), Vec::<(String, Datum)>::new()).unwrap_err();
        match err {
            SchemaError::RequiredFields(v) => {
                assert_eq!(v.len(), 2);
                assert_eq!(v.violations()[0].message, "'name' is a required field");
                assert_eq!(v.violations()[1].message, "'age' is a required field");
            }
            other => panic!("Expected RequiredFields, got: {other}"),
        }
    }

    #[test]
    fn test_invalid_type() {
        let err = RecordValue::new(&person(), [("name", Datum::from("foo")), ("age", Datum::from("bar"))])
            .unwrap_err();
        assert_eq!(err.messages(), vec!["'age' must be of type int"]);
    }

    #[test]
    fn test_all_type_errors_reported_together() {
        let err = RecordValue::new(
            &person(),
            [
                ("name", Datum::Int(1)),
                ("age", Datum::from("bar")),
                ("hobby", Datum::from("walk")),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err.messages(),
            vec![
                "'name' must be of type str",
                "'age' must be of type int",
                "'hobby' must be of type list",
            ]
        );
    }

    #[test]
    fn test_explicit_null_on_required_field_skips_validation() {
        let p = RecordValue::new(&person(), [("name", Datum::Null), ("age", Datum::Int(30))]).unwrap();
        assert_eq!(p.get("name"), Some(&Datum::Null));
    }

    #[test]
    fn test_null_on_defaulted_non_optional_field_is_type_error() {
        let err = RecordValue::new(
            &person(),
            [("name", Datum::from("John")), ("age", Datum::Int(30)), ("hobby", Datum::Null)],
        )
        .unwrap_err();
        assert_eq!(err.messages(), vec!["'hobby' must be of type list"]);
    }

    #[test]
    fn test_optional_field_absent_is_null() {
        let rt = RecordType::builder("Contact")
            .field(FieldDescriptor::new("phone", FieldType::optional(FieldType::Str)))
            .build()
            .unwrap();
        let c = RecordValue::new(&rt, Vec::<(String, Datum)>::new()).unwrap();
        assert_eq!(c.get("phone"), Some(&Datum::Null));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RecordValue::new(
            &person(),
            [("name", Datum::from("John")), ("age", Datum::Int(30)), ("salary", Datum::Int(1))],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField { ref field, .. } if field == "salary"));
    }

    #[test]
    fn test_duplicate_value_rejected() {
        let err = RecordValue::new(&person(), [("name", Datum::from("a")), ("name", Datum::from("b"))])
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_nested_record_checked_by_type_name() {
        let person = person();
        let employee = RecordType::builder("EmployeeSchema")
            .field(FieldDescriptor::new("person", FieldType::Record(Arc::clone(&person))))
            .build()
            .unwrap();
        let p = RecordValue::new(&person, [("name", Datum::from("John")), ("age", Datum::Int(30))])
            .unwrap();
        assert!(RecordValue::new(&employee, [("person", Datum::from(p))]).is_ok());

        let wrong = Datum::Record(RecordData::new("Other", Vec::new()));
        let err = RecordValue::new(&employee, [("person", wrong)]).unwrap_err();
        assert_eq!(err.messages(), vec!["'person' must be of type PersonSchema"]);
    }
}
