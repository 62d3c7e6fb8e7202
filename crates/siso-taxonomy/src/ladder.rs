//! # Fallback Ladders
//!
//! A ladder is an ordered list of field masks. Resolution applies each mask
//! to the requested key and looks the result up; the first hit wins.
//!
//! ## Description ladder
//!
//! Every step keeps `kind` and `domain`. The steps differ in which of the
//! lower fields survive:
//!
//! | # | Kept fields |
//! |---|-------------|
//! |  1 | all seven |
//! |  2 | kind, domain, category, subcategory, specific, extra |
//! |  3 | kind, domain, country, category, subcategory, specific |
//! |  4 | kind, domain, category, subcategory, specific |
//! |  5 | kind, domain, country, category, subcategory |
//! |  6 | kind, domain, category, subcategory |
//! |  7 | kind, domain, country, category |
//! |  8 | kind, domain, country |
//! |  9 | kind, domain, category |
//! | 10 | kind, domain |
//!
//! Step 8 prefers the country-specific bare entity over a country-agnostic
//! category. Consumers rely on these tie-breaks; the order must not change.
//!
//! ## Domain ladder
//!
//! `{kind, domain}`, then `{kind}`, then the zero key.

use std::collections::HashMap;

use siso_core::{EntityKey, FieldMask};

/// Masks tried by description resolution, most specific first.
pub const DESCRIPTION_LADDER: [FieldMask; 10] = [
    FieldMask::ALL,
    FieldMask::KIND_DOMAIN_CATEGORY_SUBCATEGORY_SPECIFIC_EXTRA,
    FieldMask::KIND_DOMAIN_COUNTRY_CATEGORY_SUBCATEGORY_SPECIFIC,
    FieldMask::KIND_DOMAIN_CATEGORY_SUBCATEGORY_SPECIFIC,
    FieldMask::KIND_DOMAIN_COUNTRY_CATEGORY_SUBCATEGORY,
    FieldMask::KIND_DOMAIN_CATEGORY_SUBCATEGORY,
    FieldMask::KIND_DOMAIN_COUNTRY_CATEGORY,
    FieldMask::KIND_DOMAIN_COUNTRY,
    FieldMask::KIND_DOMAIN_CATEGORY,
    FieldMask::KIND_DOMAIN,
];

/// Masks tried by domain resolution, most specific first.
pub const DOMAIN_LADDER: [FieldMask; 3] = [FieldMask::KIND_DOMAIN, FieldMask::KIND, FieldMask::NONE];

/// A matching ladder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderHit<'a> {
    /// Zero-based position of the step in the ladder.
    pub step: usize,
    /// The mask that produced the hit.
    pub mask: FieldMask,
    /// The key that was found.
    pub matched: EntityKey,
    /// Description stored under `matched`.
    pub description: &'a str,
}

/// Try each mask in order and return the first hit.
pub fn first_match<'a>(
    table: &'a HashMap<EntityKey, String>,
    key: EntityKey,
    ladder: &[FieldMask],
) -> Option<LadderHit<'a>> {
    ladder.iter().enumerate().find_map(|(step, mask)| {
        let candidate = key.masked(*mask);
        table.get(&candidate).map(|description| LadderHit {
            step,
            mask: *mask,
            matched: candidate,
            description: description.as_str(),
        })
    })
}
