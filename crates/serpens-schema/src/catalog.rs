//! # Record-Type Catalog
//!
//! Declares enumerations and record types in a YAML or JSON document instead
//! of Rust code. Declarations are processed top to bottom, so a type
//! expression may only name enums and records declared before it.
//!
//! ```yaml
//! enums:
//!   - name: Level
//!     members:
//!       - { name: MIDDLE, value: middle }
//! records:
//!   - name: PersonSchema
//!     fields:
//!       - { name: name, type: str }
//!       - { name: hobby, type: list, default_factory: list }
//!       - { name: nickname, type: "Optional[str]" }
//! ```
//!
//! ## Type Expressions
//!
//! - Plain names: `str`, `int`, `float`, `bool`, `list`, `dict`, `any`,
//!   `date`, `datetime`, `time`, `Decimal`, `UUID`, `None`.
//! - `Optional[T]` and `T | None`.
//! - `Union[A, B, ...]`. Only `T | None` resolves; anything wider is
//!   rejected when the record type is built.
//! - The name of a previously declared enum or record.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use serpens_core::Datum;

use crate::descriptor::{FieldDescriptor, RecordType};
use crate::error::SchemaError;
use crate::load::coerce;
use crate::types::{resolve, EnumType, FieldType};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDocument {
    #[serde(default)]
    enums: Vec<EnumDecl>,
    #[serde(default)]
    records: Vec<RecordDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnumDecl {
    name: String,
    members: Vec<MemberDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MemberDecl {
    name: String,
    value: Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordDecl {
    name: String,
    fields: Vec<FieldDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDecl {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    // Absent and explicit `null` are different: the outer Option tracks presence.
    #[serde(default, deserialize_with = "present")]
    default: Option<Value>,
    default_factory: Option<FactoryDecl>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FactoryDecl {
    List,
    Dict,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn empty_list() -> Datum {
    Datum::List(Vec::new())
}

fn empty_dict() -> Datum {
    Datum::Map(Default::default())
}

/// Enumerations and record types loaded from a catalog document.
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    enums: Vec<Arc<EnumType>>,
    records: Vec<Arc<RecordType>>,
}

impl SchemaCatalog {
    /// Parse a YAML catalog document.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        Self::from_yaml_with_origin(text, "<yaml>")
    }

    /// Parse a JSON catalog document.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        Self::from_json_with_origin(text, "<json>")
    }

    /// Read a catalog file, choosing the parser by extension
    /// (`.yaml`, `.yml` or `.json`).
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let origin = path.display().to_string();
        let catalog_error = |reason: String| SchemaError::Catalog {
            origin: origin.clone(),
            reason,
        };
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let text = std::fs::read_to_string(path).map_err(|e| catalog_error(e.to_string()))?;
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_with_origin(&text, &origin),
            Some("json") => Self::from_json_with_origin(&text, &origin),
            _ => Err(catalog_error(
                "unsupported extension (expected .yaml, .yml or .json)".to_string(),
            )),
        }
    }

    fn from_yaml_with_origin(text: &str, origin: &str) -> Result<Self, SchemaError> {
        let doc: CatalogDocument =
            serde_yaml::from_str(text).map_err(|e| SchemaError::Catalog {
                origin: origin.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_document(doc)
    }

    fn from_json_with_origin(text: &str, origin: &str) -> Result<Self, SchemaError> {
        let doc: CatalogDocument =
            serde_json::from_str(text).map_err(|e| SchemaError::Catalog {
                origin: origin.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_document(doc)
    }

    fn from_document(doc: CatalogDocument) -> Result<Self, SchemaError> {
        let mut catalog = Self::default();

        for decl in doc.enums {
            if catalog.is_declared(&decl.name) {
                return Err(SchemaError::DuplicateType(decl.name));
            }
            let members = decl.members.into_iter().map(|m| (m.name, m.value));
            let enum_type = EnumType::new(decl.name, members);
            tracing::debug!(
                name = enum_type.name(),
                members = enum_type.member_names().count(),
                "declared enum"
            );
            catalog.enums.push(enum_type);
        }

        for decl in doc.records {
            if catalog.is_declared(&decl.name) {
                return Err(SchemaError::DuplicateType(decl.name));
            }
            let mut builder = RecordType::builder(decl.name.clone());
            for field in decl.fields {
                builder = builder.field(catalog.field_descriptor(&decl.name, field)?);
            }
            let record_type = builder.build()?;
            tracing::debug!(
                name = record_type.name(),
                fields = record_type.fields().len(),
                "declared record"
            );
            catalog.records.push(record_type);
        }

        Ok(catalog)
    }

    fn field_descriptor(&self, record: &str, decl: FieldDecl) -> Result<FieldDescriptor, SchemaError> {
        let ty = self.parse_type(&decl.ty)?;
        let descriptor = FieldDescriptor::new(decl.name.clone(), ty.clone());
        match (decl.default, decl.default_factory) {
            (Some(_), Some(_)) => Err(SchemaError::Catalog {
                origin: record.to_string(),
                reason: format!("field '{}' sets both default and default_factory", decl.name),
            }),
            (None, None) => Ok(descriptor),
            (None, Some(FactoryDecl::List)) => Ok(descriptor.with_default_factory(empty_list)),
            (None, Some(FactoryDecl::Dict)) => Ok(descriptor.with_default_factory(empty_dict)),
            (Some(Value::Null), None) => Ok(descriptor.with_default(Datum::Null)),
            (Some(value), None) => {
                let resolved = resolve(&ty).map_err(|e| SchemaError::UnsupportedType {
                    field: decl.name.clone(),
                    type_name: e.0.type_name(),
                })?;
                Ok(descriptor.with_default(coerce(&resolved.inner, &value)?))
            }
        }
    }

    /// Parse a type expression against the declarations seen so far.
    fn parse_type(&self, expr: &str) -> Result<FieldType, SchemaError> {
        let expr = expr.trim();

        let alternatives = split_top_level(expr, '|');
        if alternatives.len() > 1 {
            return alternatives
                .into_iter()
                .map(|a| self.parse_type(a))
                .collect::<Result<Vec<_>, _>>()
                .map(FieldType::Union);
        }

        if let Some(inner) = bracketed(expr, "Optional") {
            return Ok(FieldType::optional(self.parse_type(inner)?));
        }
        if let Some(inner) = bracketed(expr, "Union") {
            return split_top_level(inner, ',')
                .into_iter()
                .map(|a| self.parse_type(a))
                .collect::<Result<Vec<_>, _>>()
                .map(FieldType::Union);
        }

        Ok(match expr {
            "any" | "Any" => FieldType::Any,
            "str" => FieldType::Str,
            "int" => FieldType::Int,
            "float" => FieldType::Float,
            "bool" => FieldType::Bool,
            "list" => FieldType::List,
            "dict" => FieldType::Dict,
            "date" => FieldType::Date,
            "datetime" => FieldType::DateTime,
            "time" => FieldType::Time,
            "Decimal" | "decimal" => FieldType::Decimal,
            "UUID" | "uuid" => FieldType::Uuid,
            "None" | "null" | "NoneType" => FieldType::Null,
            name => {
                if let Some(e) = self.enum_type(name) {
                    FieldType::Enum(Arc::clone(e))
                } else if let Some(r) = self.record(name) {
                    FieldType::Record(Arc::clone(r))
                } else {
                    return Err(SchemaError::UnknownType(name.to_string()));
                }
            }
        })
    }

    fn is_declared(&self, name: &str) -> bool {
        self.enum_type(name).is_some() || self.record(name).is_some()
    }

    /// Look up a record type by name.
    pub fn record(&self, name: &str) -> Option<&Arc<RecordType>> {
        self.records.iter().find(|r| r.name() == name)
    }

    /// Look up an enumeration by name.
    pub fn enum_type(&self, name: &str) -> Option<&Arc<EnumType>> {
        self.enums.iter().find(|e| e.name() == name)
    }

    /// Record types in declaration order.
    pub fn records(&self) -> &[Arc<RecordType>] {
        &self.records
    }

    /// Enumerations in declaration order.
    pub fn enums(&self) -> &[Arc<EnumType>] {
        &self.enums
    }
}

/// `Prefix[inner]` → `inner`.
fn bracketed<'a>(expr: &'a str, prefix: &str) -> Option<&'a str> {
    expr.strip_prefix(prefix)?
        .trim_start()
        .strip_prefix('[')?
        .strip_suffix(']')
}

/// Split on `sep` outside square brackets.
fn split_top_level(expr: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(expr[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(expr[start..].trim());
    parts
}
