//! Integration test: build an index from the reduced reference fixture and
//! check table sizes, enumeration queries and search.

use std::path::PathBuf;

use siso_core::pack_key;
use siso_taxonomy::{Level, LoaderOptions, TaxonomyIndex};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/reference.json")
}

fn load_document() -> serde_json::Value {
    let content = std::fs::read_to_string(fixture_path()).expect("fixture readable");
    serde_json::from_str(&content).expect("fixture is valid JSON")
}

fn index() -> TaxonomyIndex {
    TaxonomyIndex::from_parsed_document(load_document()).expect("fixture loads")
}

#[test]
fn test_table_sizes() {
    let idx = index();
    assert_eq!(idx.kind_count(), 10);
    assert_eq!(idx.country_count(), 5);
    // Platform domains replicated over five kinds, four munition domains, one supply domain.
    assert_eq!(idx.domain_count(), 6 * 5 + 4 + 1);
    assert_eq!(idx.category_count(), 28);
}

#[test]
fn test_cross_referenced_row_is_reported() {
    let idx = index();
    let report = idx.report();
    assert_eq!(report.len(), 1);
    let row = &report.skipped()[0];
    assert_eq!(row.level, Level::Specific);
    assert_eq!(row.path, "1.3.153.6.3.0.0");
    assert_eq!(row.reason, "missing value");
    assert!(idx.search_description("F803").is_empty());
}

#[test]
fn test_unrelated_lists_are_ignored() {
    let idx = index();
    assert!(idx.search_description("Friendly").is_empty());
    assert_eq!(idx.all_kinds().len(), 10);
}

#[test]
fn test_countries() {
    let idx = index();
    assert_eq!(idx.country(1), Some("Afghanistan (AFG)"));
    assert_eq!(idx.country(153), Some("Netherlands (NLD)"));
    assert_eq!(idx.country(999), None);
    assert_eq!(idx.country_or_invalid(999), "Invalid country 999");
    let all = idx.all_countries();
    assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![0, 1, 106, 153, 225]);
}

#[test]
fn test_kinds() {
    let idx = index();
    assert_eq!(idx.kind(3), Some("Life form"));
    assert_eq!(idx.all_kinds()[&9], "Sensor/Emitter");
}

#[test]
fn test_domains() {
    let idx = index();
    let platform = idx.domains_of(1);
    assert_eq!(platform.len(), 6);
    assert_eq!(platform[&4], "Subsurface");

    let munition = idx.domains_of(2);
    assert_eq!(munition.len(), 4);
    assert_eq!(munition[&2], "Anti-Armor");

    assert!(idx.domains_of(7).is_empty());
    assert_eq!(idx.all_domains()[&(6, 1)], "Class 1 - Subsistence");
}

#[test]
fn test_categories_of_submarine_domain() {
    let idx = index();
    let cats = idx.categories_of(1, 4, 153);
    assert_eq!(cats.len(), 2);
    assert_eq!(cats[&14], "Semi-Submersible Boats");
    assert_eq!(cats[&5], "SS (Conventional Attack-Torpedo, Patrol)");
}

#[test]
fn test_categories_include_country_agnostic_entries() {
    let idx = index();
    let nl = idx.categories_of(1, 1, 153);
    assert_eq!(nl.len(), 2);
    assert_eq!(nl[&1], "Tank");
    assert_eq!(nl[&2], "Armored Fighting Vehicle");

    let us = idx.categories_of(1, 1, 225);
    assert_eq!(us.len(), 2);

    assert!(idx.categories_of(1, 4, 225).is_empty());
}

#[test]
fn test_subcategories_of() {
    let idx = index();
    let subs = idx.subcategories_of(1, 4, 153, 5);
    assert_eq!(subs.len(), 3);
    assert_eq!(subs[&1], "SS (Conventional Attack-Torpedo, Patrol) / Walrus Class");
    assert_eq!(subs[&2], "SS (Conventional Attack-Torpedo, Patrol) / Hai Lung Class");
    assert_eq!(subs[&0], "SS (Conventional Attack-Torpedo, Patrol)");
}

#[test]
fn test_specifics_of() {
    let idx = index();
    let specifics = idx.specifics_of(1, 2, 106, 20, 2);
    assert_eq!(specifics.len(), 4);
    assert_eq!(
        specifics[&1],
        "Attack Helicopter / Agusta A129 Mangusta / AH-129A"
    );
    assert_eq!(
        specifics[&3],
        "Attack Helicopter / Agusta A129 Mangusta / AH-129D"
    );
}

#[test]
fn test_extras_of_include_specific_row() {
    let idx = index();
    let extras = idx.extras_of(1, 2, 225, 7, 8, 7);
    assert_eq!(extras.len(), 5);
    assert_eq!(extras[&0], "Reconnaissance / Beechcraft King Air / MC-12 Liberty");
    assert_eq!(
        extras[&3],
        "Reconnaissance / Beechcraft King Air / MC-12 Liberty / MC-12S-1 EMARSS-G"
    );
}

#[test]
fn test_search() {
    let idx = index();
    let hits = idx.search_description("MC-12S-1 EMARSS-G");
    assert_eq!(hits.len(), 1);
    assert!(hits.contains_key(&pack_key(1, 2, 225, 7, 8, 7, 3)));

    assert_eq!(idx.search_description("F801 Tromp").len(), 1);
    // Path descriptions carry the class name into every child.
    assert_eq!(idx.search_description("tromp").len(), 3);
    assert_eq!(idx.search_description("mc-12").len(), 5);
    assert!(idx.search_description("Leopard").is_empty());
}

#[test]
fn test_document_is_retained() {
    let doc = load_document();
    let idx = TaxonomyIndex::from_parsed_document(doc.clone()).unwrap();
    assert_eq!(idx.document(), &doc);
}

#[test]
fn test_loader_options_from_yaml() {
    let options = LoaderOptions::from_yaml_str("delimiter: \" > \"\ndomain_list_uids: [8]\n").unwrap();
    let idx = TaxonomyIndex::from_parsed_document_with(load_document(), options).unwrap();
    assert_eq!(idx.options().delimiter, " > ");
    assert_eq!(idx.domain_count(), 30);
    assert_eq!(
        idx.subcategories_of(1, 4, 153, 5)[&1],
        "SS (Conventional Attack-Torpedo, Patrol) > Walrus Class"
    );
}
