//! # Entity Domain — Fixed Label Table
//!
//! Operational domains for platform entities (kind 1), numbered as in the
//! platform-domain list (enum uid 8) of the reference document. Other kinds
//! reuse the domain field with their own lists, which are loaded into the
//! domain table; this enum covers only the platform list.
//!
//! `Sea` is accepted as a name for [`EntityDomain::Surface`]. Cyber has no
//! number in the platform list and is not a variant.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FormatError;
use crate::kind::normalize_label;

/// Operational domain of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityDomain {
    Other,
    Land,
    Air,
    Surface,
    Subsurface,
    Space,
}

impl EntityDomain {
    /// All domains in numeric order.
    pub fn all_domains() -> &'static [EntityDomain] {
        &[
            Self::Other,
            Self::Land,
            Self::Air,
            Self::Surface,
            Self::Subsurface,
            Self::Space,
        ]
    }

    /// The domain field value.
    pub fn number(self) -> u8 {
        match self {
            Self::Other => 0,
            Self::Land => 1,
            Self::Air => 2,
            Self::Surface => 3,
            Self::Subsurface => 4,
            Self::Space => 5,
        }
    }

    /// Look up a domain by field value.
    pub fn from_number(n: u64) -> Option<Self> {
        Self::all_domains()
            .iter()
            .copied()
            .find(|d| u64::from(d.number()) == n)
    }

    /// Look up a domain by name, ignoring case and spaces.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize_label(name);
        if wanted.is_empty() {
            return None;
        }
        if wanted == "sea" {
            return Some(Self::Surface);
        }
        Self::all_domains()
            .iter()
            .copied()
            .find(|d| normalize_label(d.description()) == wanted)
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::Land => "Land",
            Self::Air => "Air",
            Self::Surface => "Surface",
            Self::Subsurface => "Subsurface",
            Self::Space => "Space",
        }
    }
}

impl std::fmt::Display for EntityDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for EntityDomain {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| FormatError::UnknownLabel {
            label: "domain",
            input: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_number() {
        assert_eq!(EntityDomain::from_number(0), Some(EntityDomain::Other));
        assert_eq!(EntityDomain::from_number(1), Some(EntityDomain::Land));
        assert_eq!(EntityDomain::from_number(4), Some(EntityDomain::Subsurface));
        assert_eq!(EntityDomain::from_number(5), Some(EntityDomain::Space));
        assert_eq!(EntityDomain::from_number(10), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(EntityDomain::from_name("Air"), Some(EntityDomain::Air));
        assert_eq!(EntityDomain::from_name("LAND"), Some(EntityDomain::Land));
        assert_eq!(EntityDomain::from_name("space"), Some(EntityDomain::Space));
        assert_eq!(EntityDomain::from_name("Lava"), None);
        assert_eq!(EntityDomain::from_name("Cyber"), None);
        assert_eq!(EntityDomain::from_name(""), None);
    }

    #[test]
    fn test_sea_names_surface() {
        assert_eq!(EntityDomain::from_name("Sea"), Some(EntityDomain::Surface));
        assert_eq!("sea".parse::<EntityDomain>().unwrap(), EntityDomain::Surface);
        assert_eq!(EntityDomain::Surface.to_string(), "Surface");
    }

    #[test]
    fn test_from_str_error() {
        let err = "Lava".parse::<EntityDomain>().unwrap_err();
        assert!(matches!(err, FormatError::UnknownLabel { label: "domain", .. }));
    }
}
