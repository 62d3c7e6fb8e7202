//! # Load Report — Skipped Rows
//!
//! The reference document is large and not perfectly regular. A node with an
//! unexpected shape is skipped, logged at `warn`, and recorded here so callers
//! can inspect what the index does not contain.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Where in the document a skipped node sat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    EnumList,
    CountryRow,
    KindRow,
    DomainRow,
    EntityList,
    Entity,
    Category,
    Subcategory,
    Specific,
    Extra,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::EnumList => "enum",
            Level::CountryRow => "country row",
            Level::KindRow => "kind row",
            Level::DomainRow => "domain row",
            Level::EntityList => "cet",
            Level::Entity => "entity",
            Level::Category => "category",
            Level::Subcategory => "subcategory",
            Level::Specific => "specific",
            Level::Extra => "extra",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node that was skipped during loading. Not fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("skipped {level} under {path}: {reason}")]
pub struct MalformedRow {
    /// Taxonomy level of the skipped node.
    pub level: Level,
    /// Location of the parent, as a dotted key or list identifier.
    pub path: String,
    /// Why the node was skipped.
    pub reason: String,
}

/// Every node skipped while building an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    skipped: Vec<MalformedRow>,
}

impl LoadReport {
    pub(crate) fn record(&mut self, row: MalformedRow) {
        tracing::warn!(level = %row.level, path = %row.path, reason = %row.reason, "skipping malformed node");
        self.skipped.push(row);
    }

    /// True if nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Number of skipped nodes.
    pub fn len(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    /// The skipped nodes in document order.
    pub fn skipped(&self) -> &[MalformedRow] {
        &self.skipped
    }

    /// Skipped nodes at one level.
    pub fn at_level(&self, level: Level) -> impl Iterator<Item = &MalformedRow> {
        self.skipped.iter().filter(move |r| r.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let row = MalformedRow {
            level: Level::Subcategory,
            path: "1.4.153.5.0.0.0".to_string(),
            reason: "missing value".to_string(),
        };
        assert_eq!(
            row.to_string(),
            "skipped subcategory under 1.4.153.5.0.0.0: missing value"
        );
    }

    #[test]
    fn test_record_and_filter() {
        let mut report = LoadReport::default();
        assert!(report.is_clean());
        report.record(MalformedRow {
            level: Level::Extra,
            path: "x".to_string(),
            reason: "r".to_string(),
        });
        report.record(MalformedRow {
            level: Level::Category,
            path: "y".to_string(),
            reason: "r".to_string(),
        });
        assert_eq!(report.len(), 2);
        assert_eq!(report.at_level(Level::Extra).count(), 1);
        assert_eq!(report.skipped()[1].path, "y");
    }
}
