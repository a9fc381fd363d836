//! # Field Types and Type Resolution
//!
//! [`FieldType`] is the declared type of a record field. It covers the
//! plain JSON shapes, the special scalars, declared enums and records, and
//! unions (used to express optionality).
//!
//! [`resolve`] reduces a declared type to the concrete type checked at
//! construction time:
//!
//! - a plain type resolves to itself, not optional;
//! - `T | null` resolves to `T`, optional;
//! - any other union is an `UnsupportedType` configuration error.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use serpens_core::{CoercionError, Datum, EnumMember};

use crate::descriptor::RecordType;

/// Declared type of a record field.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// Accepts any value.
    Any,
    /// String.
    Str,
    /// Integer.
    Int,
    /// Floating-point number.
    Float,
    /// Boolean.
    Bool,
    /// Untyped list, passed through on load.
    List,
    /// Untyped mapping, passed through on load.
    Dict,
    /// Calendar date.
    Date,
    /// Naive date-time.
    DateTime,
    /// Time of day.
    Time,
    /// Arbitrary-precision decimal.
    Decimal,
    /// UUID.
    Uuid,
    /// A declared enumeration.
    Enum(Arc<EnumType>),
    /// A nested record type.
    Record(Arc<RecordType>),
    /// The null type. Only meaningful inside a union.
    Null,
    /// Union of several types.
    Union(Vec<FieldType>),
}

impl FieldType {
    /// `inner | null`.
    pub fn optional(inner: FieldType) -> Self {
        Self::Union(vec![inner, Self::Null])
    }

    /// Name used in validation messages.
    pub fn type_name(&self) -> String {
        match self {
            Self::Any => "any".into(),
            Self::Str => "str".into(),
            Self::Int => "int".into(),
            Self::Float => "float".into(),
            Self::Bool => "bool".into(),
            Self::List => "list".into(),
            Self::Dict => "dict".into(),
            Self::Date => "date".into(),
            Self::DateTime => "datetime".into(),
            Self::Time => "time".into(),
            Self::Decimal => "Decimal".into(),
            Self::Uuid => "UUID".into(),
            Self::Enum(e) => e.name().to_string(),
            Self::Record(r) => r.name().to_string(),
            Self::Null => "NoneType".into(),
            Self::Union(members) => {
                let names: Vec<String> = members.iter().map(FieldType::type_name).collect();
                format!("Union[{}]", names.join(", "))
            }
        }
    }

    /// Whether a runtime value is an instance of this type.
    pub fn accepts(&self, datum: &Datum) -> bool {
        match (self, datum) {
            (Self::Any, _) => true,
            (Self::Str, Datum::Str(_))
            | (Self::Int, Datum::Int(_))
            | (Self::Float, Datum::Float(_))
            | (Self::Bool, Datum::Bool(_))
            | (Self::List, Datum::List(_))
            | (Self::Dict, Datum::Map(_))
            | (Self::Date, Datum::Date(_))
            | (Self::DateTime, Datum::DateTime(_))
            | (Self::Time, Datum::Time(_))
            | (Self::Decimal, Datum::Decimal(_))
            | (Self::Uuid, Datum::Uuid(_))
            | (Self::Null, Datum::Null) => true,
            (Self::Enum(e), Datum::Enum(m)) => m.enum_name == e.name(),
            (Self::Record(r), Datum::Record(d)) => d.name() == r.name(),
            (Self::Union(members), d) => members.iter().any(|m| m.accepts(d)),
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

/// A declared type reduced to its concrete form.
#[derive(Debug, Clone)]
pub struct ResolvedType {
    /// The concrete type values are checked against.
    pub inner: FieldType,
    /// Whether null (or absence) is acceptable.
    pub optional: bool,
}

/// The declared type is a union that is not `T | null`.
#[derive(Debug, Clone)]
pub struct UnsupportedType(pub FieldType);

/// Reduce a declared type to its concrete form.
pub fn resolve(ty: &FieldType) -> Result<ResolvedType, UnsupportedType> {
    let FieldType::Union(members) = ty else {
        return Ok(ResolvedType {
            inner: ty.clone(),
            optional: false,
        });
    };

    let mut flat = Vec::new();
    flatten_union(members, &mut flat);
    let has_null = flat.iter().any(|m| matches!(m, FieldType::Null));
    let concrete: Vec<&FieldType> = flat
        .iter()
        .filter(|m| !matches!(m, FieldType::Null))
        .collect();

    match concrete.as_slice() {
        [only] => Ok(ResolvedType {
            inner: (*only).clone(),
            optional: has_null,
        }),
        _ => Err(UnsupportedType(ty.clone())),
    }
}

fn flatten_union(members: &[FieldType], out: &mut Vec<FieldType>) {
    for m in members {
        match m {
            FieldType::Union(inner) => flatten_union(inner, out),
            other => out.push(other.clone()),
        }
    }
}

/// A declared enumeration: a name and its members' wire values.
#[derive(Debug, Clone)]
pub struct EnumType {
    name: String,
    members: Vec<(String, Value)>,
}

impl EnumType {
    /// Declare an enumeration from `(member name, wire value)` pairs.
    pub fn new<I, N, V>(name: impl Into<String>, members: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<Value>,
    {
        Arc::new(Self {
            name: name.into(),
            members: members
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        })
    }

    /// Name of the enumeration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member names, in declaration order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(n, _)| n.as_str())
    }

    /// The member with the given symbolic name.
    pub fn member(&self, name: &str) -> Option<EnumMember> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(n, v)| self.make_member(n, v))
    }

    /// The member whose underlying value equals `value`.
    pub fn member_for_value(&self, value: &Value) -> Result<EnumMember, CoercionError> {
        self.members
            .iter()
            .find(|(_, v)| v == value)
            .map(|(n, v)| self.make_member(n, v))
            .ok_or_else(|| CoercionError::InvalidEnumValue {
                value: value.to_string(),
                enum_name: self.name.clone(),
            })
    }

    fn make_member(&self, name: &str, value: &Value) -> EnumMember {
        EnumMember {
            enum_name: self.name.clone(),
            name: name.to_string(),
            value: value.clone(),
        }
    }
}
