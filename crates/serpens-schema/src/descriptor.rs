//! # Field Descriptors and Record Types
//!
//! A record type is an explicit descriptor table: one [`FieldDescriptor`]
//! per field, carrying the name, the declared type and the default policy.
//! [`RecordTypeBuilder::build`] resolves every declared type once and
//! freezes the table into an `Arc<RecordType>` shared by all load and dump
//! calls.

use std::sync::Arc;

use serpens_core::Datum;

use crate::error::SchemaError;
use crate::types::{resolve, FieldType, ResolvedType};

/// How a field gets a value when the input does not supply one.
#[derive(Debug, Clone)]
pub enum DefaultPolicy {
    /// No default; the field is required unless its type is optional.
    None,
    /// Clone this value.
    Literal(Datum),
    /// Call this function for a fresh value (e.g. an empty list).
    Factory(fn() -> Datum),
}

impl DefaultPolicy {
    /// Produce the default value, if there is one.
    pub fn produce(&self) -> Option<Datum> {
        match self {
            Self::None => None,
            Self::Literal(d) => Some(d.clone()),
            Self::Factory(f) => Some(f()),
        }
    }

    /// Whether a default exists.
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Author-time declaration of one record field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    ty: FieldType,
    default: DefaultPolicy,
}

impl FieldDescriptor {
    /// A field with no default.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: DefaultPolicy::None,
        }
    }

    /// Use a literal default.
    pub fn with_default(mut self, value: impl Into<Datum>) -> Self {
        self.default = DefaultPolicy::Literal(value.into());
        self
    }

    /// Use a default factory.
    pub fn with_default_factory(mut self, factory: fn() -> Datum) -> Self {
        self.default = DefaultPolicy::Factory(factory);
        self
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A field of a built record type, with its type already resolved.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    declared: FieldType,
    resolved: ResolvedType,
    default: DefaultPolicy,
}

impl Field {
    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type as declared.
    pub fn declared_type(&self) -> &FieldType {
        &self.declared
    }

    /// The concrete type values are checked against.
    pub fn resolved_type(&self) -> &FieldType {
        &self.resolved.inner
    }

    /// Whether the declared type is `T | null`.
    pub fn is_optional(&self) -> bool {
        self.resolved.optional
    }

    /// Default policy.
    pub fn default_policy(&self) -> &DefaultPolicy {
        &self.default
    }

    /// Required fields have no default and a non-optional type.
    pub fn is_required(&self) -> bool {
        !self.default.is_some() && !self.resolved.optional
    }
}

/// A named, ordered set of fields.
#[derive(Debug)]
pub struct RecordType {
    name: String,
    fields: Vec<Field>,
}

impl RecordType {
    /// Start declaring a record type.
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: name.into(),
            descriptors: Vec::new(),
        }
    }

    /// Record type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Collects field descriptors for a [`RecordType`].
#[derive(Debug, Clone)]
pub struct RecordTypeBuilder {
    name: String,
    descriptors: Vec<FieldDescriptor>,
}

impl RecordTypeBuilder {
    /// Append a field.
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Resolve every declared type and freeze the descriptor table.
    ///
    /// # Errors
    ///
    /// `UnsupportedType` if a field's type is a union other than `T | null`,
    /// `DuplicateField` if a name is declared twice.
    pub fn build(self) -> Result<Arc<RecordType>, SchemaError> {
        let mut fields: Vec<Field> = Vec::with_capacity(self.descriptors.len());
        for d in self.descriptors {
            if fields.iter().any(|f| f.name == d.name) {
                return Err(SchemaError::DuplicateField {
                    record: self.name,
                    field: d.name,
                });
            }
            let resolved = resolve(&d.ty).map_err(|e| SchemaError::UnsupportedType {
                field: d.name.clone(),
                type_name: e.0.type_name(),
            })?;
            fields.push(Field {
                name: d.name,
                declared: d.ty,
                resolved,
                default: d.default,
            });
        }
        Ok(Arc::new(RecordType {
            name: self.name,
            fields,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_list() -> Datum {
        Datum::List(Vec::new())
    }

    #[test]
    fn test_build_resolves_optional() {
        let rt = RecordType::builder("PersonSchema")
            .field(FieldDescriptor::new("name", FieldType::Str))
            .field(FieldDescriptor::new("nickname", FieldType::optional(FieldType::Str)))
            .build()
            .unwrap();
        assert_eq!(rt.name(), "PersonSchema");
        assert!(rt.field("name").unwrap().is_required());
        let nickname = rt.field("nickname").unwrap();
        assert!(nickname.is_optional());
        assert!(!nickname.is_required());
        assert!(matches!(nickname.resolved_type(), FieldType::Str));
    }

    #[test]
    fn test_build_rejects_three_way_union() {
        let err = RecordType::builder("Broken")
            .field(FieldDescriptor::new(
                "value",
                FieldType::Union(vec![FieldType::Str, FieldType::Int, FieldType::Null]),
            ))
            .build()
            .unwrap_err();
        match err {
            SchemaError::UnsupportedType { field, type_name } => {
                assert_eq!(field, "value");
                assert_eq!(type_name, "Union[str, int, NoneType]");
            }
            other => panic!("Expected UnsupportedType, got: {other}"),
        }
    }

    #[test]
    fn test_build_rejects_duplicate_field() {
        let err = RecordType::builder("Dup")
            .field(FieldDescriptor::new("a", FieldType::Str))
            .field(FieldDescriptor::new("a", FieldType::Int))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_default_policies() {
        assert_eq!(DefaultPolicy::None.produce(), None);
        assert_eq!(
            DefaultPolicy::Literal(Datum::Int(3)).produce(),
            Some(Datum::Int(3))
        );
        assert_eq!(
            DefaultPolicy::Factory(empty_list).produce(),
            Some(Datum::List(Vec::new()))
        );
    }

    #[test]
    fn test_defaulted_field_not_required() {
        let rt = RecordType::builder("PersonSchema")
            .field(FieldDescriptor::new("hobby", FieldType::List).with_default_factory(empty_list))
            .build()
            .unwrap();
        assert!(!rt.field("hobby").unwrap().is_required());
    }
}
