//! # Classification Key — Seven Fields in One `u64`
//!
//! Packs the kind / domain / country / category / subcategory / specific /
//! extra tuple into a single unsigned 64-bit integer, most significant first:
//!
//! | Field | Bits | Width |
//! |-------|------|-------|
//! | kind | 56–63 | 8 |
//! | domain | 48–55 | 8 |
//! | country | 32–47 | 16 |
//! | category | 24–31 | 8 |
//! | subcategory | 16–23 | 8 |
//! | specific | 8–15 | 8 |
//! | extra | 0–7 | 8 |
//!
//! ## Invariant
//!
//! Every field is masked to its width before shifting. Values wider than the
//! field silently lose their high-order bits. Truncation is the defined
//! behavior and is relied on by existing key producers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity_type::EntityType;
use crate::error::FormatError;

/// One of the seven packed fields of a classification key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Kind,
    Domain,
    Country,
    Category,
    Subcategory,
    Specific,
    Extra,
}

impl Field {
    /// All fields, coarsest to finest.
    pub const ALL: [Field; 7] = [
        Field::Kind,
        Field::Domain,
        Field::Country,
        Field::Category,
        Field::Subcategory,
        Field::Specific,
        Field::Extra,
    ];

    /// Bit offset of the field's least significant bit.
    pub const fn shift(self) -> u32 {
        match self {
            Field::Kind => 56,
            Field::Domain => 48,
            Field::Country => 32,
            Field::Category => 24,
            Field::Subcategory => 16,
            Field::Specific => 8,
            Field::Extra => 0,
        }
    }

    /// Width of the field in bits.
    pub const fn width(self) -> u32 {
        match self {
            Field::Country => 16,
            _ => 8,
        }
    }

    /// Largest value the field can hold.
    pub const fn max(self) -> u64 {
        (1u64 << self.width()) - 1
    }

    /// The field's bits in position within a key.
    pub const fn mask(self) -> u64 {
        self.max() << self.shift()
    }

    /// Lowercase field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Kind => "kind",
            Field::Domain => "domain",
            Field::Country => "country",
            Field::Category => "category",
            Field::Subcategory => "subcategory",
            Field::Specific => "specific",
            Field::Extra => "extra",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of fields to keep when masking a key; all other fields are zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMask(u64);

impl FieldMask {
    /// Keeps nothing: masking yields the zero key.
    pub const NONE: FieldMask = FieldMask(0);
    /// Keeps every field.
    pub const ALL: FieldMask = FieldMask(u64::MAX);

    pub const KIND: FieldMask = FieldMask::of(&[Field::Kind]);
    pub const COUNTRY: FieldMask = FieldMask::of(&[Field::Country]);
    pub const KIND_DOMAIN: FieldMask = FieldMask::of(&[Field::Kind, Field::Domain]);
    pub const KIND_DOMAIN_COUNTRY: FieldMask =
        FieldMask::of(&[Field::Kind, Field::Domain, Field::Country]);
    pub const KIND_DOMAIN_COUNTRY_CATEGORY: FieldMask =
        FieldMask::of(&[Field::Kind, Field::Domain, Field::Country, Field::Category]);
    pub const KIND_DOMAIN_COUNTRY_CATEGORY_SUBCATEGORY: FieldMask = FieldMask::of(&[
        Field::Kind,
        Field::Domain,
        Field::Country,
        Field::Category,
        Field::Subcategory,
    ]);
    pub const KIND_DOMAIN_COUNTRY_CATEGORY_SUBCATEGORY_SPECIFIC: FieldMask = FieldMask::of(&[
        Field::Kind,
        Field::Domain,
        Field::Country,
        Field::Category,
        Field::Subcategory,
        Field::Specific,
    ]);
    pub const KIND_DOMAIN_CATEGORY: FieldMask =
        FieldMask::of(&[Field::Kind, Field::Domain, Field::Category]);
    pub const KIND_DOMAIN_CATEGORY_SUBCATEGORY: FieldMask =
        FieldMask::of(&[Field::Kind, Field::Domain, Field::Category, Field::Subcategory]);
    pub const KIND_DOMAIN_CATEGORY_SUBCATEGORY_SPECIFIC: FieldMask = FieldMask::of(&[
        Field::Kind,
        Field::Domain,
        Field::Category,
        Field::Subcategory,
        Field::Specific,
    ]);
    pub const KIND_DOMAIN_CATEGORY_SUBCATEGORY_SPECIFIC_EXTRA: FieldMask = FieldMask::of(&[
        Field::Kind,
        Field::Domain,
        Field::Category,
        Field::Subcategory,
        Field::Specific,
        Field::Extra,
    ]);

    /// Build a mask keeping exactly the given fields.
    pub const fn of(fields: &[Field]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < fields.len() {
            bits |= fields[i].mask();
            i += 1;
        }
        Self(bits)
    }

    /// Raw mask bits.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Whether the mask keeps `field`.
    pub const fn keeps(self, field: Field) -> bool {
        self.0 & field.mask() == field.mask()
    }

    /// The kept fields, coarsest first.
    pub fn fields(self) -> Vec<Field> {
        Field::ALL.into_iter().filter(|f| self.keeps(*f)).collect()
    }
}

impl fmt::Display for FieldMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, field) in self.fields().into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(field.as_str())?;
        }
        f.write_str("}")
    }
}

/// A packed classification key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(u64);

impl EntityKey {
    /// The all-zero key.
    pub const ZERO: EntityKey = EntityKey(0);

    /// Pack seven fields into a key, truncating each to its width.
    #[allow(clippy::too_many_arguments)]
    pub const fn pack(
        kind: u64,
        domain: u64,
        country: u64,
        category: u64,
        subcategory: u64,
        specific: u64,
        extra: u64,
    ) -> Self {
        Self(
            ((kind & Field::Kind.max()) << Field::Kind.shift())
                | ((domain & Field::Domain.max()) << Field::Domain.shift())
                | ((country & Field::Country.max()) << Field::Country.shift())
                | ((category & Field::Category.max()) << Field::Category.shift())
                | ((subcategory & Field::Subcategory.max()) << Field::Subcategory.shift())
                | ((specific & Field::Specific.max()) << Field::Specific.shift())
                | (extra & Field::Extra.max()),
        )
    }

    /// Wrap raw key bits.
    pub const fn from_u64(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw key bits.
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Value of a single field.
    pub const fn field(self, field: Field) -> u64 {
        (self.0 >> field.shift()) & field.max()
    }

    /// Replace one field, truncating `value` to the field's width.
    pub const fn with_field(self, field: Field, value: u64) -> Self {
        Self((self.0 & !field.mask()) | ((value & field.max()) << field.shift()))
    }

    /// Zero every field the mask does not keep.
    pub const fn masked(self, mask: FieldMask) -> Self {
        Self(self.0 & mask.bits())
    }

    /// Decompose into the seven fields.
    pub fn unpack(self) -> EntityType {
        EntityType::from_key(self)
    }
}

impl From<EntityType> for EntityKey {
    fn from(t: EntityType) -> Self {
        t.key()
    }
}

impl From<EntityKey> for u64 {
    fn from(key: EntityKey) -> Self {
        key.0
    }
}

/// Displays in dotted form, `kind.domain.country.category.subcategory.specific.extra`.
impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.unpack(), f)
    }
}

impl FromStr for EntityKey {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<EntityType>().map(|t| t.key())
    }
}

/// Pack seven fields into a key. See [`EntityKey::pack`].
#[allow(clippy::too_many_arguments)]
pub const fn pack_key(
    kind: u64,
    domain: u64,
    country: u64,
    category: u64,
    subcategory: u64,
    specific: u64,
    extra: u64,
) -> EntityKey {
    EntityKey::pack(kind, domain, country, category, subcategory, specific, extra)
}

/// Decompose a key into its seven fields.
pub fn unpack_key(key: EntityKey) -> EntityType {
    key.unpack()
}
