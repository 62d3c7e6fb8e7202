//! # siso-core — Foundational Types for SISO Entity Taxonomies
//!
//! Leaf crate of the workspace. It defines the classification key that every
//! other crate indexes by, plus the small fixed label tables and the error
//! hierarchy.
//!
//! ## Key Design Principles
//!
//! 1. **One key type.** `EntityKey` is a `u64` newtype with a fixed seven-field
//!    bit layout. All packing goes through [`EntityKey::pack`], which masks each
//!    field to its width. Over-wide inputs lose their high-order bits; they never
//!    raise.
//!
//! 2. **Masks are data.** `FieldMask` names which fields survive a masking step,
//!    so fallback ladders can be written as constant slices and audited.
//!
//! 3. **Text form is strict.** `EntityType::from_str` accepts exactly seven
//!    dot-separated integers that fit their fields. Anything else is a
//!    `FormatError`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `siso-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod domain;
pub mod entity_type;
pub mod error;
pub mod key;
pub mod kind;

// Re-export primary types for ergonomic imports.
pub use domain::EntityDomain;
pub use entity_type::EntityType;
pub use error::{FormatError, LoadError, SisoError};
pub use key::{pack_key, unpack_key, EntityKey, Field, FieldMask};
pub use kind::EntityKind;
