//! # Entity Kind — Fixed Label Table
//!
//! The ten top-level kinds of the entity-type scheme. These labels are fixed
//! by the standard; the reference document carries the same list, and the
//! loaded kind table is authoritative for descriptions. This enum exists for
//! callers that want exhaustive matching on the well-known kinds.
//!
//! | # | Kind |
//! |---|------|
//! | 0 | Other |
//! | 1 | Platform |
//! | 2 | Munition |
//! | 3 | Life form |
//! | 4 | Environmental |
//! | 5 | Cultural feature |
//! | 6 | Supply |
//! | 7 | Radio |
//! | 8 | Expendable |
//! | 9 | Sensor/Emitter |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FormatError;

/// Top-level classification of a simulated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Other,
    Platform,
    Munition,
    LifeForm,
    Environmental,
    CulturalFeature,
    Supply,
    Radio,
    Expendable,
    SensorEmitter,
}

impl EntityKind {
    /// All kinds in numeric order.
    pub fn all_kinds() -> &'static [EntityKind] {
        &[
            Self::Other,
            Self::Platform,
            Self::Munition,
            Self::LifeForm,
            Self::Environmental,
            Self::CulturalFeature,
            Self::Supply,
            Self::Radio,
            Self::Expendable,
            Self::SensorEmitter,
        ]
    }

    /// The kind field value.
    pub fn number(self) -> u8 {
        match self {
            Self::Other => 0,
            Self::Platform => 1,
            Self::Munition => 2,
            Self::LifeForm => 3,
            Self::Environmental => 4,
            Self::CulturalFeature => 5,
            Self::Supply => 6,
            Self::Radio => 7,
            Self::Expendable => 8,
            Self::SensorEmitter => 9,
        }
    }

    /// Look up a kind by field value.
    pub fn from_number(n: u64) -> Option<Self> {
        Self::all_kinds().iter().copied().find(|k| u64::from(k.number()) == n)
    }

    /// Look up a kind by name, ignoring case, spaces and `/`.
    ///
    /// `"life form"`, `"LIFEFORM"` and `"LifeForm"` all resolve to
    /// [`EntityKind::LifeForm`]; `"sensor/EMITTER"` to
    /// [`EntityKind::SensorEmitter`].
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize_label(name);
        if wanted.is_empty() {
            return None;
        }
        Self::all_kinds()
            .iter()
            .copied()
            .find(|k| normalize_label(k.description()) == wanted)
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::Platform => "Platform",
            Self::Munition => "Munition",
            Self::LifeForm => "Life form",
            Self::Environmental => "Environmental",
            Self::CulturalFeature => "Cultural feature",
            Self::Supply => "Supply",
            Self::Radio => "Radio",
            Self::Expendable => "Expendable",
            Self::SensorEmitter => "Sensor/Emitter",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for EntityKind {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| FormatError::UnknownLabel {
            label: "kind",
            input: s.to_string(),
        })
    }
}

/// Lowercase with spaces and slashes removed.
pub(crate) fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '/')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_number() {
        assert_eq!(EntityKind::from_number(0), Some(EntityKind::Other));
        assert_eq!(EntityKind::from_number(1), Some(EntityKind::Platform));
        assert_eq!(EntityKind::from_number(9), Some(EntityKind::SensorEmitter));
        assert_eq!(EntityKind::from_number(10), None);
        assert_eq!(EntityKind::from_number(u64::MAX), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(EntityKind::from_name("Other"), Some(EntityKind::Other));
        assert_eq!(EntityKind::from_name("PLATFORM"), Some(EntityKind::Platform));
        assert_eq!(EntityKind::from_name("life form"), Some(EntityKind::LifeForm));
        assert_eq!(EntityKind::from_name("sensoremitter"), Some(EntityKind::SensorEmitter));
        assert_eq!(EntityKind::from_name("sensor/EMITTER"), Some(EntityKind::SensorEmitter));
    }

    #[test]
    fn test_from_name_invalid() {
        assert_eq!(EntityKind::from_name("Lava"), None);
        assert_eq!(EntityKind::from_name(""), None);
        assert!("Lava".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_number_roundtrip() {
        for kind in EntityKind::all_kinds() {
            assert_eq!(EntityKind::from_number(kind.number().into()), Some(*kind));
        }
    }

    #[test]
    fn test_serde_format() {
        let json = serde_json::to_string(&EntityKind::CulturalFeature).unwrap();
        assert_eq!(json, "\"cultural_feature\"");
    }
}
