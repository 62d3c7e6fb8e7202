//! # Loader Configuration
//!
//! Which enumerated lists feed the kind, domain and country tables, how
//! attributes are marked in the parsed tree, and how nested descriptions are
//! joined. Every field has a default matching the published reference
//! document, so partial YAML or JSON files are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use siso_core::SisoError;

/// Enumerated list holding country codes.
pub const DEFAULT_COUNTRY_LIST_UID: i64 = 29;
/// Enumerated list holding entity kinds.
pub const DEFAULT_KIND_LIST_UID: i64 = 7;
/// Enumerated lists holding kind-domain rows (platform/other, munition, supply).
pub const DEFAULT_DOMAIN_LIST_UIDS: [i64; 3] = [8, 14, 600];
/// Joins a parent description to a child description.
pub const DEFAULT_DELIMITER: &str = " / ";
/// Marks attribute members in the parsed tree.
pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "__";

/// Options controlling how a parsed document is walked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    pub attribute_prefix: String,
    pub delimiter: String,
    pub country_list_uid: i64,
    pub kind_list_uid: i64,
    pub domain_list_uids: Vec<i64>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            country_list_uid: DEFAULT_COUNTRY_LIST_UID,
            kind_list_uid: DEFAULT_KIND_LIST_UID,
            domain_list_uids: DEFAULT_DOMAIN_LIST_UIDS.to_vec(),
        }
    }
}

impl LoaderOptions {
    /// Parse options from YAML (JSON is valid YAML and is accepted too).
    pub fn from_yaml_str(content: &str) -> Result<Self, SisoError> {
        serde_yaml::from_str(content).map_err(|e| SisoError::Config(format!("invalid options: {e}")))
    }

    /// Read options from a YAML or JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SisoError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = LoaderOptions::default();
        assert_eq!(opts.attribute_prefix, "__");
        assert_eq!(opts.delimiter, " / ");
        assert_eq!(opts.country_list_uid, 29);
        assert_eq!(opts.kind_list_uid, 7);
        assert_eq!(opts.domain_list_uids, vec![8, 14, 600]);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let opts = LoaderOptions::from_yaml_str("delimiter: \" > \"\n").unwrap();
        assert_eq!(opts.delimiter, " > ");
        assert_eq!(opts.country_list_uid, 29);
    }

    #[test]
    fn test_json_accepted() {
        let opts = LoaderOptions::from_yaml_str(r#"{"domain_list_uids": [8]}"#).unwrap();
        assert_eq!(opts.domain_list_uids, vec![8]);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = LoaderOptions::from_yaml_str("kind_list_uid: [not, a, number]").unwrap_err();
        assert!(matches!(err, SisoError::Config(_)), "Expected Config, got: {err}");
    }
}
