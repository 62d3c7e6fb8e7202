//! # siso-taxonomy — Entity-Type Taxonomy Index
//!
//! Builds an in-memory index from the SISO reference document (already parsed
//! into a generic `serde_json::Value` tree) and answers classification queries
//! against it.
//!
//! ## Pipeline
//!
//! 1. [`TaxonomyIndex::from_parsed_document`] walks the tree once. Enumerated
//!    lists fill the kind, domain and country tables; the entity forest fills
//!    the category table with path-joined descriptions.
//! 2. Resolution masks the requested key through a fallback ladder until a
//!    table entry matches. Fallback hits are memoized per requested key.
//! 3. Enumeration and search read the frozen base tables.
//!
//! ## Crate Policy
//!
//! - Depends only on `siso-core` internally.
//! - Parsing markup into the tree is the caller's job. This crate never reads
//!   XML.
//! - Malformed nodes are skipped and reported, never fatal.

pub mod applicability;
pub mod config;
pub mod index;
pub mod ladder;
mod loader;
pub mod node;
pub mod report;

pub use applicability::{parse_applicability, ApplicabilityError, ApplicabilityExpander};
pub use config::LoaderOptions;
pub use index::TaxonomyIndex;
pub use ladder::{LadderHit, DESCRIPTION_LADDER, DOMAIN_LADDER};
pub use node::{Node, OneOrMany, Row};
pub use report::{Level, LoadReport, MalformedRow};
