//! # Error Types — Coercion and Encoding Failures
//!
//! Errors raised while turning wire values into special scalars
//! (`CoercionError`) and while turning in-memory values back into JSON
//! (`EncodeError`). Both use `thiserror` derives.
//!
//! Parse failures keep the underlying library error as their source so the
//! caller sees exactly what chrono, uuid or rust_decimal rejected.

use thiserror::Error;

/// A wire value could not be coerced into a special scalar type.
#[derive(Error, Debug)]
pub enum CoercionError {
    /// An ISO-8601 date, datetime or time string did not parse.
    #[error("Invalid isoformat string for {kind}: {input:?} ({source})")]
    Temporal {
        /// Which temporal type was being parsed (`date`, `datetime`, `time`).
        kind: &'static str,
        /// The offending input, after the UTC marker was stripped.
        input: String,
        /// Underlying chrono parse failure.
        #[source]
        source: chrono::ParseError,
    },

    /// A decimal string or number did not fit a `Decimal`.
    #[error("Invalid literal for Decimal: {input:?} ({source})")]
    Decimal {
        /// The offending input rendered as text.
        input: String,
        /// Underlying rust_decimal failure.
        #[source]
        source: rust_decimal::Error,
    },

    /// A UUID string was malformed.
    #[error("badly formed hexadecimal UUID string: {0}")]
    Uuid(#[from] uuid::Error),

    /// No enum member has the given underlying value.
    #[error("{value} is not a valid {enum_name}")]
    InvalidEnumValue {
        /// The unmatched wire value, JSON-encoded.
        value: String,
        /// Name of the enumeration.
        enum_name: String,
    },

    /// The wire value has the wrong JSON shape for the target type.
    #[error("{target} cannot be built from a value of type {found}")]
    WrongInput {
        /// Target type name.
        target: &'static str,
        /// JSON type name of the input.
        found: &'static str,
    },
}

/// An in-memory value has no JSON representation.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// A value of a type without a wire form was encountered.
    #[error("Object of type {type_name} is not JSON serializable")]
    NotSerializable {
        /// Short name of the offending Rust type.
        type_name: String,
    },

    /// NaN and infinities have no JSON number form.
    #[error("Out of range float values are not JSON compliant: {0}")]
    NonFiniteFloat(f64),

    /// JSON text rendering failed.
    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
