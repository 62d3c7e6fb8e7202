//! # Error Types — Structured Error Hierarchy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - `LoadError` is fatal: the document lacks a collection the index cannot
//!   be built without. Construction aborts.
//! - `FormatError` fails a single parse of textual input. Nothing else is
//!   affected.
//! - Malformed individual rows are not errors. The loader records them in its
//!   load report and continues.

use thiserror::Error;

/// Top-level error type for the SISO taxonomy crates.
#[derive(Error, Debug)]
pub enum SisoError {
    /// The reference document could not be turned into an index.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// Textual input could not be parsed.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Configuration could not be read.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Required top-level structure of the reference document is missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The parsed tree root is not an object.
    #[error("document root must be an object, found {found}")]
    RootNotObject {
        /// JSON type name of what was found instead.
        found: &'static str,
    },

    /// A required container is absent or has the wrong shape.
    #[error("required collection '{name}' is missing from the document")]
    MissingCollection {
        /// Name of the missing container.
        name: String,
    },

    /// A required container exists but holds no usable objects.
    #[error("collection '{name}' contains no objects")]
    EmptyCollection {
        /// Name of the empty container.
        name: String,
    },
}

/// Textual classification input is malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Input was empty or whitespace.
    #[error("empty entity type string")]
    Empty,

    /// Input did not split into exactly seven components.
    #[error("entity type {input:?} has {found} components, expected 7")]
    ComponentCount {
        /// The rejected input.
        input: String,
        /// Number of components found.
        found: usize,
    },

    /// A component is not a non-negative integer.
    #[error("entity type {input:?}: {field} component {component:?} is not an integer")]
    InvalidComponent {
        /// The rejected input.
        input: String,
        /// Field the component belongs to.
        field: &'static str,
        /// The offending component text.
        component: String,
    },

    /// A component does not fit its field width.
    #[error("entity type {input:?}: {field} value {value} exceeds maximum {max}")]
    OutOfRange {
        /// The rejected input.
        input: String,
        /// Field the component belongs to.
        field: &'static str,
        /// Parsed value.
        value: u64,
        /// Largest value the field can hold.
        max: u64,
    },

    /// A kind or domain label is not recognized.
    #[error("unknown {label} name: {input:?}")]
    UnknownLabel {
        /// Which label table was consulted.
        label: &'static str,
        /// The rejected input.
        input: String,
    },
}
