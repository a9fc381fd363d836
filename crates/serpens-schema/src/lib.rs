//! # serpens-schema — Load and Dump Between JSON and Typed Records
//!
//! A record type is a descriptor table of named, typed fields with optional
//! defaults. This crate turns plain JSON into validated record instances
//! ("load") and back ("dump"), coercing the special scalars on the way in
//! and encoding them on the way out.
//!
//! ## Building Record Types
//!
//! - [`RecordType::builder`] with [`FieldDescriptor`]s, in Rust code.
//! - [`SchemaCatalog`] from a YAML or JSON document.
//! - [`Record`] / [`Enumeration`] on application structs and enums, for the
//!   typed [`load`] / [`dump`] family of functions.
//!
//! ## Validation
//!
//! Every instance goes through [`RecordValue::new`]. Missing required fields
//! and type mismatches are collected and reported together as
//! [`SchemaError::RequiredFields`] and [`SchemaError::Validation`], one
//! field-qualified message per problem.
//!
//! ## Crate Policy
//!
//! - Depends only on `serpens-core` internally.
//! - Load and dump do no I/O and keep no state; an `Arc<RecordType>` can be
//!   shared freely across threads.
//! - Input data is only borrowed and never modified.

pub mod catalog;
pub mod descriptor;
pub mod dump;
pub mod error;
pub mod load;
pub mod record;
pub mod typed;
pub mod types;

pub use catalog::SchemaCatalog;
pub use descriptor::{DefaultPolicy, Field, FieldDescriptor, RecordType, RecordTypeBuilder};
pub use error::{SchemaError, Violation, Violations};
pub use record::RecordValue;
pub use typed::{
    dump, dump_many, dumps, dumps_many, load, load_many, loads, loads_many, record_datum,
    Enumeration, FieldReader, Record,
};
pub use types::{resolve, EnumType, FieldType, ResolvedType, UnsupportedType};

pub use serpens_core::{Datum, DecimalWire, EncodeOptions};
