//! # Taxonomy Index — Resolution and Queries
//!
//! `TaxonomyIndex` owns the four tables built by the loader and serves every
//! read query against them. The tables are frozen once construction returns.
//!
//! ## Memoization
//!
//! A fallback hit is written to a side cache under the originally requested
//! key, so repeating a query costs one lookup. The cache sits beside the base
//! tables rather than in them: enumeration and search read only the base
//! tables, so memoized entries never show up as taxonomy nodes. A
//! caller-supplied fallback is never cached.
//!
//! ## Thread Safety
//!
//! `TaxonomyIndex` is `Send + Sync`. The side caches use `parking_lot::RwLock`;
//! a racing pair of identical queries can at worst both compute and both write
//! the same value.

use std::collections::{BTreeMap, HashMap};

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use siso_core::{pack_key, EntityKey, Field, FieldMask, LoadError};

use crate::applicability::{ApplicabilityError, ApplicabilityExpander};
use crate::config::LoaderOptions;
use crate::ladder::{self, LadderHit, DESCRIPTION_LADDER, DOMAIN_LADDER};
use crate::loader::{Tables, TaxonomyLoader};
use crate::report::LoadReport;

/// Read-through cache of resolved descriptions.
#[derive(Debug, Default)]
struct MemoCache {
    data: RwLock<HashMap<EntityKey, String>>,
}

impl MemoCache {
    fn get(&self, key: &EntityKey) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    fn insert(&self, key: EntityKey, value: String) {
        self.data.write().insert(key, value);
    }

    fn clear(&self) {
        self.data.write().clear();
    }

    fn len(&self) -> usize {
        self.data.read().len()
    }
}

/// In-memory index over a parsed reference document.
#[derive(Debug)]
pub struct TaxonomyIndex {
    document: Value,
    options: LoaderOptions,
    tables: Tables,
    report: LoadReport,
    description_ladder: Vec<FieldMask>,
    description_memo: MemoCache,
    domain_memo: MemoCache,
    applicability: Mutex<ApplicabilityExpander>,
}

impl TaxonomyIndex {
    /// Build an index from a parsed document using default options.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the `ebv`, `enum` or `cet` container is
    /// missing. Malformed individual nodes are skipped and listed in
    /// [`TaxonomyIndex::report`].
    pub fn from_parsed_document(document: Value) -> Result<Self, LoadError> {
        Self::from_parsed_document_with(document, LoaderOptions::default())
    }

    /// Build an index from a parsed document with explicit options.
    pub fn from_parsed_document_with(
        document: Value,
        options: LoaderOptions,
    ) -> Result<Self, LoadError> {
        let mut expander = ApplicabilityExpander::new();
        let (tables, report) = TaxonomyLoader::new(&options, &mut expander).load(&document)?;

        tracing::info!(
            countries = tables.countries.len(),
            kinds = tables.kinds.len(),
            domains = tables.domains.len(),
            categories = tables.categories.len(),
            skipped = report.len(),
            "taxonomy index built"
        );

        Ok(Self {
            document,
            options,
            tables,
            report,
            description_ladder: DESCRIPTION_LADDER.to_vec(),
            description_memo: MemoCache::default(),
            domain_memo: MemoCache::default(),
            applicability: Mutex::new(expander),
        })
    }

    /// Replace the description fallback ladder. Clears memoized results.
    pub fn with_description_ladder(mut self, ladder: impl Into<Vec<FieldMask>>) -> Self {
        self.description_ladder = ladder.into();
        self.description_memo.clear();
        self
    }

    /// The description fallback ladder in use.
    pub fn description_ladder(&self) -> &[FieldMask] {
        &self.description_ladder
    }

    // -- Resolution -----------------------------------------------------------

    /// Best description for `key`, falling back through the description ladder.
    ///
    /// Returns `fallback` when no ladder step matches.
    pub fn resolve_description(
        &self,
        key: impl Into<EntityKey>,
        fallback: Option<&str>,
    ) -> Option<String> {
        let key = key.into();
        if let Some(text) = self.description_memo.get(&key) {
            return Some(text);
        }
        match ladder::first_match(&self.tables.categories, key, &self.description_ladder) {
            Some(hit) => {
                let text = hit.description.to_string();
                if hit.matched != key {
                    tracing::trace!(%key, matched = %hit.matched, step = hit.step, "memoizing fallback description");
                    self.description_memo.insert(key, text.clone());
                }
                Some(text)
            }
            None => fallback.map(str::to_string),
        }
    }

    /// Which ladder step would resolve `key`, without touching the cache.
    pub fn explain_description(&self, key: impl Into<EntityKey>) -> Option<LadderHit<'_>> {
        ladder::first_match(&self.tables.categories, key.into(), &self.description_ladder)
    }

    /// Domain description for `key`: `{kind, domain}`, then `{kind}`, then the
    /// zero key. Returns `fallback` when none match.
    pub fn resolve_domain(&self, key: impl Into<EntityKey>, fallback: Option<&str>) -> Option<String> {
        let key = key.into();
        if let Some(text) = self.domain_memo.get(&key) {
            return Some(text);
        }
        match ladder::first_match(&self.tables.domains, key, &DOMAIN_LADDER) {
            Some(hit) => {
                let text = hit.description.to_string();
                if hit.matched != key {
                    self.domain_memo.insert(key, text.clone());
                }
                Some(text)
            }
            None => fallback.map(str::to_string),
        }
    }

    /// Number of memoized fallback results across both caches.
    pub fn memoized_count(&self) -> usize {
        self.description_memo.len() + self.domain_memo.len()
    }

    // -- Enumeration ----------------------------------------------------------

    /// Every country, by country code.
    pub fn all_countries(&self) -> BTreeMap<u16, String> {
        self.tables
            .countries
            .iter()
            .map(|(key, text)| (key.field(Field::Country) as u16, text.clone()))
            .collect()
    }

    /// Every kind, by kind number.
    pub fn all_kinds(&self) -> BTreeMap<u8, String> {
        self.tables
            .kinds
            .iter()
            .map(|(key, text)| (key.field(Field::Kind) as u8, text.clone()))
            .collect()
    }

    /// Every domain row, by `(kind, domain)`.
    pub fn all_domains(&self) -> BTreeMap<(u8, u8), String> {
        self.tables
            .domains
            .iter()
            .map(|(key, text)| {
                (
                    (key.field(Field::Kind) as u8, key.field(Field::Domain) as u8),
                    text.clone(),
                )
            })
            .collect()
    }

    /// Domains applicable to one kind, by domain number.
    pub fn domains_of(&self, kind: u8) -> BTreeMap<u8, String> {
        self.tables
            .domains
            .iter()
            .filter(|(key, _)| key.field(Field::Kind) == u64::from(kind))
            .map(|(key, text)| (key.field(Field::Domain) as u8, text.clone()))
            .collect()
    }

    /// Country name by code.
    pub fn country(&self, code: u16) -> Option<&str> {
        self.tables
            .countries
            .get(&pack_key(0, 0, code.into(), 0, 0, 0, 0))
            .map(String::as_str)
    }

    /// Country name by code, or `"Invalid country <code>"`.
    pub fn country_or_invalid(&self, code: u16) -> String {
        self.country(code)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Invalid country {code}"))
    }

    /// Kind description by number.
    pub fn kind(&self, kind: u8) -> Option<&str> {
        self.tables
            .kinds
            .get(&pack_key(kind.into(), 0, 0, 0, 0, 0, 0))
            .map(String::as_str)
    }

    /// Categories of a kind and domain for a country, by category number.
    ///
    /// Country-agnostic categories (stored country 0) are included for every
    /// country. Where both exist for a number, the country-specific one wins.
    pub fn categories_of(&self, kind: u8, domain: u8, country: u16) -> BTreeMap<u8, String> {
        let parent = pack_key(kind.into(), domain.into(), country.into(), 0, 0, 0, 0);
        self.children_of(parent, Field::Category)
    }

    /// Subcategories of a category, by subcategory number.
    ///
    /// The category's own row is included under subcategory `0`.
    pub fn subcategories_of(
        &self,
        kind: u8,
        domain: u8,
        country: u16,
        category: u8,
    ) -> BTreeMap<u8, String> {
        let parent = pack_key(kind.into(), domain.into(), country.into(), category.into(), 0, 0, 0);
        self.children_of(parent, Field::Subcategory)
    }

    /// Specifics of a subcategory, by specific number, with the subcategory's
    /// own row under `0`.
    pub fn specifics_of(
        &self,
        kind: u8,
        domain: u8,
        country: u16,
        category: u8,
        subcategory: u8,
    ) -> BTreeMap<u8, String> {
        let parent = pack_key(
            kind.into(),
            domain.into(),
            country.into(),
            category.into(),
            subcategory.into(),
            0,
            0,
        );
        self.children_of(parent, Field::Specific)
    }

    /// Extras of a specific, by extra number.
    ///
    /// The specific's own row is included under extra `0`.
    #[allow(clippy::too_many_arguments)]
    pub fn extras_of(
        &self,
        kind: u8,
        domain: u8,
        country: u16,
        category: u8,
        subcategory: u8,
        specific: u8,
    ) -> BTreeMap<u8, String> {
        let parent = pack_key(
            kind.into(),
            domain.into(),
            country.into(),
            category.into(),
            subcategory.into(),
            specific.into(),
            0,
        );
        self.children_of(parent, Field::Extra)
    }

    /// Category-table entries that match `parent` on every field but `level`,
    /// with stored country 0 matching any country.
    fn children_of(&self, parent: EntityKey, level: Field) -> BTreeMap<u8, String> {
        let country = parent.field(Field::Country);
        let mut matches: Vec<(bool, u64, &String)> = self
            .tables
            .categories
            .iter()
            .filter(|(key, _)| {
                Field::ALL.iter().all(|field| {
                    if *field == level {
                        true
                    } else if *field == Field::Country {
                        let stored = key.field(Field::Country);
                        stored == country || stored == 0
                    } else {
                        key.field(*field) == parent.field(*field)
                    }
                })
            })
            .map(|(key, text)| (key.field(Field::Country) == country, key.field(level), text))
            .collect();

        // Country-specific entries sort last so they overwrite agnostic ones.
        matches.sort_by_key(|(specific, value, _)| (*specific, *value));
        matches
            .into_iter()
            .map(|(_, value, text)| (value as u8, text.clone()))
            .collect()
    }

    // -- Search ---------------------------------------------------------------

    /// Category-table entries whose description contains `query`, ignoring case.
    pub fn search_description(&self, query: &str) -> BTreeMap<EntityKey, String> {
        let needle = query.to_lowercase();
        self.tables
            .categories
            .iter()
            .filter(|(_, text)| text.to_lowercase().contains(&needle))
            .map(|(key, text)| (*key, text.clone()))
            .collect()
    }

    // -- Introspection --------------------------------------------------------

    /// Expand an applicability expression through the index's shared cache.
    pub fn expand_applicability(&self, expression: &str) -> Result<Vec<u32>, ApplicabilityError> {
        self.applicability
            .lock()
            .expand(Some(expression))
            .map(<[u32]>::to_vec)
    }

    /// Nodes skipped while loading.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// The parsed document the index was built from.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Options the index was built with.
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    pub fn kind_count(&self) -> usize {
        self.tables.kinds.len()
    }

    pub fn domain_count(&self) -> usize {
        self.tables.domains.len()
    }

    pub fn country_count(&self) -> usize {
        self.tables.countries.len()
    }

    pub fn category_count(&self) -> usize {
        self.tables.categories.len()
    }
}
