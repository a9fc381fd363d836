//! # serpens-core — Foundational Types for serpens
//!
//! The leaf crate of the workspace. It owns the value model shared by the
//! schema engine and by every serializer built on top of it.
//!
//! ## Key Design Principles
//!
//! 1. **One value model.** [`Datum`] holds plain JSON shapes, the special
//!    scalars (date, datetime, time, Decimal, UUID, enum members), nested
//!    records and opaque host values.
//!
//! 2. **One encoder.** [`encode::to_value_with`] is the only place special
//!    scalars get their wire form. Record dumps and ad hoc maps share it.
//!
//! 3. **Parse errors surface as-is.** [`CoercionError`] keeps the chrono,
//!    uuid or rust_decimal error as its source.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `serpens-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod datum;
pub mod encode;
pub mod error;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use datum::{Datum, EnumMember, FromDatum, Opaque, RecordData};
pub use encode::{DecimalWire, EncodeOptions};
pub use error::{CoercionError, EncodeError};
