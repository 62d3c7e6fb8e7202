//! # siso-cli — Command-Line Access to SISO Entity Taxonomies
//!
//! Provides the `siso` binary: resolve classification keys, browse and search
//! the taxonomy, and move the reference document between XML and the JSON
//! tree the index is built from.
//!
//! ## Subcommands
//!
//! - `siso resolve` / `siso domain`: description or domain for one key.
//! - `siso kinds`, `countries`, `domains`, `categories`, `subcategories`,
//!   `specifics`, `extras`: enumeration.
//! - `siso search`: substring search over descriptions.
//! - `siso convert` / `siso emit`: XML to tree and back.
//!
//! ```bash
//! siso convert SISO-REF-010.xml -o siso.json --check
//! siso resolve -t siso.json 1.2.225.1.3.0.0 --fallback Unknown
//! siso categories -t siso.json 1 4 153
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; taxonomy logic lives in `siso-taxonomy`.
//! - Data goes to stdout, logs to stderr.

pub mod convert;
pub mod query;
pub mod source;
pub mod xml;
