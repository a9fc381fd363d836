//! # Schema Errors
//!
//! Every failure the engine can report, grouped the way callers act on them:
//!
//! - **Configuration** (`UnsupportedType`, `UnknownType`, `DuplicateType`,
//!   `DuplicateField`, `Catalog`) — an authoring bug in a record type.
//! - **Validation** (`Validation`, `RequiredFields`, `UnknownField`) —
//!   batched field-qualified messages, never just the first problem.
//! - **Coercion** (`Coercion`, `Json`, `Shape`) — the input data could not
//!   be parsed. Underlying parse errors are passed through untouched.
//! - **Serialization** (`Encode`) — a value has no wire form.

use std::fmt;

use serpens_core::{CoercionError, EncodeError};
use thiserror::Error;

/// Error raised by record-type construction, load, and dump.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A field declares a type shape the engine cannot resolve.
    #[error("unsupported type for field '{field}': {type_name}")]
    UnsupportedType {
        /// The field whose type failed to resolve.
        field: String,
        /// Rendered form of the declared type.
        type_name: String,
    },

    /// A catalog type expression names a type that was never declared.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// A catalog declares the same enum or record name twice.
    #[error("type '{0}' is declared more than once")]
    DuplicateType(String),

    /// A record type declares the same field name twice, or construction
    /// was given two values for one field.
    #[error("'{field}' is declared more than once on {record}")]
    DuplicateField {
        /// Record type name.
        record: String,
        /// Repeated field name.
        field: String,
    },

    /// Direct construction was given a name that is not a declared field.
    #[error("'{field}' is not a field of {record}")]
    UnknownField {
        /// Record type name.
        record: String,
        /// Undeclared field name.
        field: String,
    },

    /// One or more field values do not match their declared types.
    #[error("{0}")]
    Validation(Violations),

    /// One or more required fields are absent.
    #[error("{0}")]
    RequiredFields(Violations),

    /// A special scalar could not be parsed from its wire value.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// The input text is not valid JSON.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value could not be serialized.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The input has the wrong overall shape (e.g. a list where a mapping
    /// was expected).
    #[error("{record} expects {expected}, got {found}")]
    Shape {
        /// Record type name.
        record: String,
        /// Expected JSON shape.
        expected: &'static str,
        /// JSON type name of the input.
        found: &'static str,
    },

    /// A catalog document could not be read or parsed.
    #[error("catalog error for '{origin}': {reason}")]
    Catalog {
        /// File path or other origin of the document.
        origin: String,
        /// Reason the document was rejected.
        reason: String,
    },
}

impl SchemaError {
    /// Field-qualified messages for validation and required-field errors.
    ///
    /// Other variants yield their display text as a single message.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(v) | Self::RequiredFields(v) => {
                v.iter().map(|v| v.message.clone()).collect()
            }
            other => vec![other.to_string()],
        }
    }
}

/// A single field-qualified problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The field the message is about.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// `'<field>' is a required field`.
    pub fn required(field: &str) -> Self {
        Self {
            field: field.to_string(),
            message: format!("'{field}' is a required field"),
        }
    }

    /// `'<field>' must be of type <type_name>`.
    pub fn wrong_type(field: &str, type_name: &str) -> Self {
        Self {
            field: field.to_string(),
            message: format!("'{field}' must be of type {type_name}"),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Collection of violations, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Iterate over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
