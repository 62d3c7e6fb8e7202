//! # Entity Type — The Unpacked Seven-Field Tuple
//!
//! `EntityType` is the decomposed form of an [`EntityKey`], with each field in
//! the narrowest integer type that holds it. Its text form is the dotted
//! `kind.domain.country.category.subcategory.specific.extra` used by
//! simulation tooling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::EntityDomain;
use crate::error::FormatError;
use crate::key::{EntityKey, Field};
use crate::kind::EntityKind;

/// A classification split into its seven fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct EntityType {
    pub kind: u8,
    pub domain: u8,
    pub country: u16,
    pub category: u8,
    pub subcategory: u8,
    pub specific: u8,
    pub extra: u8,
}

impl EntityType {
    /// Construct from field-sized values.
    pub const fn new(
        kind: u8,
        domain: u8,
        country: u16,
        category: u8,
        subcategory: u8,
        specific: u8,
        extra: u8,
    ) -> Self {
        Self {
            kind,
            domain,
            country,
            category,
            subcategory,
            specific,
            extra,
        }
    }

    /// Decompose a packed key.
    pub const fn from_key(key: EntityKey) -> Self {
        // Each field() result is already masked to the target width.
        Self {
            kind: key.field(Field::Kind) as u8,
            domain: key.field(Field::Domain) as u8,
            country: key.field(Field::Country) as u16,
            category: key.field(Field::Category) as u8,
            subcategory: key.field(Field::Subcategory) as u8,
            specific: key.field(Field::Specific) as u8,
            extra: key.field(Field::Extra) as u8,
        }
    }

    /// Pack into a key.
    pub const fn key(&self) -> EntityKey {
        EntityKey::pack(
            self.kind as u64,
            self.domain as u64,
            self.country as u64,
            self.category as u64,
            self.subcategory as u64,
            self.specific as u64,
            self.extra as u64,
        )
    }

    /// Value of a single field, widened.
    pub const fn get(&self, field: Field) -> u64 {
        match field {
            Field::Kind => self.kind as u64,
            Field::Domain => self.domain as u64,
            Field::Country => self.country as u64,
            Field::Category => self.category as u64,
            Field::Subcategory => self.subcategory as u64,
            Field::Specific => self.specific as u64,
            Field::Extra => self.extra as u64,
        }
    }

    /// The standard kind label, if the kind number has one.
    pub fn kind_label(&self) -> Option<EntityKind> {
        EntityKind::from_number(self.kind.into())
    }

    /// The standard platform domain label, if the domain number has one.
    pub fn domain_label(&self) -> Option<EntityDomain> {
        EntityDomain::from_number(self.domain.into())
    }
}

impl From<EntityKey> for EntityType {
    fn from(key: EntityKey) -> Self {
        Self::from_key(key)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}.{}.{}",
            self.kind,
            self.domain,
            self.country,
            self.category,
            self.subcategory,
            self.specific,
            self.extra
        )
    }
}

impl FromStr for EntityType {
    type Err = FormatError;

    /// Parse the dotted seven-component form.
    ///
    /// Components may carry surrounding whitespace. Each must be a
    /// non-negative integer no larger than its field allows.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(FormatError::Empty);
        }

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != Field::ALL.len() {
            return Err(FormatError::ComponentCount {
                input: s.to_string(),
                found: parts.len(),
            });
        }

        let mut values = [0u64; 7];
        for ((slot, part), field) in values.iter_mut().zip(&parts).zip(Field::ALL) {
            let component = part.trim();
            let value: u64 = component.parse().map_err(|_| FormatError::InvalidComponent {
                input: s.to_string(),
                field: field.as_str(),
                component: component.to_string(),
            })?;
            if value > field.max() {
                return Err(FormatError::OutOfRange {
                    input: s.to_string(),
                    field: field.as_str(),
                    value,
                    max: field.max(),
                });
            }
            *slot = value;
        }

        let [kind, domain, country, category, subcategory, specific, extra] = values;
        Ok(EntityKey::pack(kind, domain, country, category, subcategory, specific, extra).unpack())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted() {
        let t: EntityType = "1.2.225.7.8.7.3".parse().unwrap();
        assert_eq!(t, EntityType::new(1, 2, 225, 7, 8, 7, 3));
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let t: EntityType = " 1. 4 .153.5.0.0.0 ".parse().unwrap();
        assert_eq!(t, EntityType::new(1, 4, 153, 5, 0, 0, 0));
    }

    #[test]
    fn test_display_matches_parse() {
        let t = EntityType::new(2, 9, 65535, 1, 0, 255, 4);
        let text = t.to_string();
        assert_eq!(text, "2.9.65535.1.0.255.4");
        assert_eq!(text.parse::<EntityType>().unwrap(), t);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!("".parse::<EntityType>(), Err(FormatError::Empty));
        assert_eq!("   ".parse::<EntityType>(), Err(FormatError::Empty));
    }

    #[test]
    fn test_parse_rejects_wrong_count() {
        let err = "1.2.3".parse::<EntityType>().unwrap_err();
        assert!(matches!(err, FormatError::ComponentCount { found: 3, .. }));
        let err = "1.2.3.4.5.6.7.8".parse::<EntityType>().unwrap_err();
        assert!(matches!(err, FormatError::ComponentCount { found: 8, .. }));
        let err = "1".parse::<EntityType>().unwrap_err();
        assert!(matches!(err, FormatError::ComponentCount { found: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_non_integer() {
        let err = "1.2.x.4.5.6.7".parse::<EntityType>().unwrap_err();
        match err {
            FormatError::InvalidComponent { field, component, .. } => {
                assert_eq!(field, "country");
                assert_eq!(component, "x");
            }
            other => panic!("Expected InvalidComponent, got: {other}"),
        }
        assert!("1..3.4.5.6.7".parse::<EntityType>().is_err());
        assert!("-1.2.3.4.5.6.7".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let err = "256.0.0.0.0.0.0".parse::<EntityType>().unwrap_err();
        assert!(matches!(err, FormatError::OutOfRange { field: "kind", value: 256, max: 255, .. }));
        assert!("0.0.65535.0.0.0.0".parse::<EntityType>().is_ok());
        assert!("0.0.65536.0.0.0.0".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_key_conversion() {
        let t = EntityType::new(1, 4, 153, 5, 2, 0, 0);
        assert_eq!(EntityType::from(t.key()), t);
        assert_eq!(t.get(Field::Country), 153);
    }

    #[test]
    fn test_labels() {
        let t = EntityType::new(1, 2, 0, 0, 0, 0, 0);
        assert_eq!(t.kind_label(), Some(EntityKind::Platform));
        assert_eq!(t.domain_label(), Some(EntityDomain::Air));
        let unknown = EntityType::new(42, 42, 0, 0, 0, 0, 0);
        assert_eq!(unknown.kind_label(), None);
        assert_eq!(unknown.domain_label(), None);
    }
}
