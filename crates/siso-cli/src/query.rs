//! # Query Subcommands
//!
//! Resolution, enumeration and search against a loaded taxonomy. Every
//! handler loads the index, runs one query and prints the result as text or
//! JSON. Handlers return the process exit code: `0` on success, `1` when the
//! queried key resolves to nothing.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::{Map, Value};

use siso_core::{EntityKey, EntityType};
use siso_taxonomy::{LoaderOptions, TaxonomyIndex};

use crate::source::{load_index, SourceArgs};

/// How query results are printed.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `key<TAB>description` line per entry.
    #[default]
    Text,
    /// A pretty-printed JSON object.
    Json,
}

/// Arguments shared by resolve and domain.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Entity type as seven dotted fields (`1.2.225.1.3.0.0`) or a raw 64-bit key.
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Printed when nothing matches.
    #[arg(long)]
    pub fallback: Option<String>,

    /// Also report which fallback step matched.
    #[arg(long)]
    pub explain: bool,
}

/// Enumeration and search subcommands.
#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// List every entity kind.
    Kinds {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List countries, or look up one code.
    Countries {
        #[command(flatten)]
        source: SourceArgs,
        /// Country code to look up.
        #[arg(long)]
        code: Option<u16>,
    },

    /// List domains, optionally for one kind.
    Domains {
        #[command(flatten)]
        source: SourceArgs,
        /// Restrict to one kind.
        #[arg(long)]
        kind: Option<u8>,
    },

    /// List categories of a kind and domain for a country.
    Categories {
        #[command(flatten)]
        source: SourceArgs,
        kind: u8,
        domain: u8,
        country: u16,
    },

    /// List subcategories of a category.
    Subcategories {
        #[command(flatten)]
        source: SourceArgs,
        kind: u8,
        domain: u8,
        country: u16,
        category: u8,
    },

    /// List specifics of a subcategory.
    Specifics {
        #[command(flatten)]
        source: SourceArgs,
        kind: u8,
        domain: u8,
        country: u16,
        category: u8,
        subcategory: u8,
    },

    /// List extras of a specific.
    Extras {
        #[command(flatten)]
        source: SourceArgs,
        kind: u8,
        domain: u8,
        country: u16,
        category: u8,
        subcategory: u8,
        specific: u8,
    },

    /// Case-insensitive substring search over entity-type descriptions.
    Search {
        #[command(flatten)]
        source: SourceArgs,
        /// Text to look for.
        text: String,
    },
}

impl ListCommand {
    fn source(&self) -> &SourceArgs {
        match self {
            ListCommand::Kinds { source }
            | ListCommand::Countries { source, .. }
            | ListCommand::Domains { source, .. }
            | ListCommand::Categories { source, .. }
            | ListCommand::Subcategories { source, .. }
            | ListCommand::Specifics { source, .. }
            | ListCommand::Extras { source, .. }
            | ListCommand::Search { source, .. } => source,
        }
    }
}

/// Parse a key given as dotted fields or as a decimal 64-bit integer.
pub fn parse_key(text: &str) -> Result<EntityKey> {
    let text = text.trim();
    if text.contains('.') {
        let ty: EntityType = text.parse()?;
        return Ok(ty.key());
    }
    let raw: u64 = text
        .parse()
        .with_context(|| format!("invalid key {text:?}: expected seven dotted fields or a 64-bit integer"))?;
    Ok(EntityKey::from_u64(raw))
}

/// Execute `siso resolve`.
pub fn run_resolve(args: &ResolveArgs, options: LoaderOptions, format: OutputFormat) -> Result<u8> {
    let key = parse_key(&args.key)?;
    let index = load_index(&args.source.taxonomy, options)?;

    if args.explain {
        match index.explain_description(key) {
            Some(hit) => tracing::info!(
                step = hit.step,
                mask = %hit.mask,
                matched = %hit.matched,
                "resolved through fallback ladder"
            ),
            None => tracing::info!(%key, "no ladder step matched"),
        }
    }

    let description = index.resolve_description(key, args.fallback.as_deref());
    print_resolution(key, description, format)
}

/// Execute `siso domain`.
pub fn run_domain(args: &ResolveArgs, options: LoaderOptions, format: OutputFormat) -> Result<u8> {
    let key = parse_key(&args.key)?;
    let index = load_index(&args.source.taxonomy, options)?;
    let description = index.resolve_domain(key, args.fallback.as_deref());
    print_resolution(key, description, format)
}

fn print_resolution(key: EntityKey, description: Option<String>, format: OutputFormat) -> Result<u8> {
    let Some(description) = description else {
        println!("NOT FOUND: {key}");
        return Ok(1);
    };
    match format {
        OutputFormat::Text => println!("{description}"),
        OutputFormat::Json => {
            let ty = key.unpack();
            let value = serde_json::json!({
                "key": key.to_string(),
                "value": key.as_u64().to_string(),
                "kind": ty.kind_label().map(|k| k.description()),
                "description": description,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(0)
}

/// Execute an enumeration or search subcommand.
pub fn run_list(command: &ListCommand, options: LoaderOptions, format: OutputFormat) -> Result<u8> {
    let index = load_index(&command.source().taxonomy, options)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    list(&index, command, format, &mut out)?;
    Ok(0)
}

/// Run one enumeration or search query and write its entries to `out`.
pub fn list(
    index: &TaxonomyIndex,
    command: &ListCommand,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let rows: Vec<(String, String)> = match command {
        ListCommand::Kinds { .. } => entries(index.all_kinds()),
        ListCommand::Countries { code: Some(code), .. } => {
            vec![(code.to_string(), index.country_or_invalid(*code))]
        }
        ListCommand::Countries { code: None, .. } => entries(index.all_countries()),
        ListCommand::Domains { kind: Some(kind), .. } => entries(index.domains_of(*kind)),
        ListCommand::Domains { kind: None, .. } => index
            .all_domains()
            .into_iter()
            .map(|((kind, domain), text)| (format!("{kind}.{domain}"), text))
            .collect(),
        ListCommand::Categories { kind, domain, country, .. } => {
            entries(index.categories_of(*kind, *domain, *country))
        }
        ListCommand::Subcategories { kind, domain, country, category, .. } => {
            entries(index.subcategories_of(*kind, *domain, *country, *category))
        }
        ListCommand::Specifics { kind, domain, country, category, subcategory, .. } => {
            entries(index.specifics_of(*kind, *domain, *country, *category, *subcategory))
        }
        ListCommand::Extras { kind, domain, country, category, subcategory, specific, .. } => {
            entries(index.extras_of(*kind, *domain, *country, *category, *subcategory, *specific))
        }
        ListCommand::Search { text, .. } => entries(index.search_description(text)),
    };
    tracing::debug!(entries = rows.len(), "query complete");
    write_rows(&rows, format, out)
}

fn entries<K: Display>(map: impl IntoIterator<Item = (K, String)>) -> Vec<(String, String)> {
    map.into_iter().map(|(key, text)| (key.to_string(), text)).collect()
}

fn write_rows(rows: &[(String, String)], format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (key, text) in rows {
                writeln!(out, "{key}\t{text}")?;
            }
        }
        OutputFormat::Json => {
            let object: Map<String, Value> = rows
                .iter()
                .map(|(key, text)| (key.clone(), Value::String(text.clone())))
                .collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&object)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use siso_core::pack_key;
    use std::path::PathBuf;

    fn index() -> TaxonomyIndex {
        let doc = json!({
            "ebv": {
                "enum": [
                    {"__uid": "7", "enumrow": [
                        {"__value": "1", "__description": "Platform"},
                        {"__value": "2", "__description": "Munition"}
                    ]},
                    {"__uid": "29", "enumrow": {"__value": "153", "__description": "Netherlands (NLD)"}},
                    {"__uid": "8", "__applicability": "1", "enumrow": [
                        {"__value": "1", "__description": "Land"},
                        {"__value": "4", "__description": "Subsurface"}
                    ]}
                ],
                "cet": {"entity": {"__kind": "1", "__domain": "4", "__country": "153", "category": [
                    {"__value": "5", "__description": "SS (Conventional Attack-Torpedo, Patrol)",
                     "subcategory": {"__value": "1", "__description": "Walrus Class"}},
                    {"__value": "14", "__description": "Semi-Submersible Boats"}
                ]}}
            }
        });
        TaxonomyIndex::from_parsed_document(doc).unwrap()
    }

    fn source() -> SourceArgs {
        SourceArgs { taxonomy: PathBuf::from("unused.json") }
    }

    fn render(command: ListCommand, format: OutputFormat) -> String {
        let mut out = Vec::new();
        list(&index(), &command, format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_key_forms() {
        assert_eq!(parse_key("1.1.0.0.0.0.0").unwrap(), pack_key(1, 1, 0, 0, 0, 0, 0));
        assert_eq!(parse_key(" 72339069014638592 ").unwrap(), pack_key(1, 1, 0, 0, 0, 0, 0));
        assert!(parse_key("1.1.0").is_err());
        assert!(parse_key("1.1.0.0.0.0.256").is_err());
        assert!(parse_key("tank").is_err());
    }

    #[test]
    fn test_categories_text() {
        let text = render(
            ListCommand::Categories { source: source(), kind: 1, domain: 4, country: 153 },
            OutputFormat::Text,
        );
        assert_eq!(
            text,
            "5\tSS (Conventional Attack-Torpedo, Patrol)\n14\tSemi-Submersible Boats\n"
        );
    }

    #[test]
    fn test_domains_json_keys() {
        let text = render(ListCommand::Domains { source: source(), kind: None }, OutputFormat::Json);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({"1.1": "Land", "1.4": "Subsurface"}));
    }

    #[test]
    fn test_country_lookup() {
        let text = render(
            ListCommand::Countries { source: source(), code: Some(7) },
            OutputFormat::Text,
        );
        assert_eq!(text, "7\tInvalid country 7\n");
    }

    #[test]
    fn test_search_prints_dotted_keys() {
        let text = render(
            ListCommand::Search { source: source(), text: "walrus".to_string() },
            OutputFormat::Text,
        );
        assert_eq!(text, "1.4.153.5.1.0.0\tSS (Conventional Attack-Torpedo, Patrol) / Walrus Class\n");
    }

    #[test]
    fn test_kinds_and_subcategories() {
        assert_eq!(
            render(ListCommand::Kinds { source: source() }, OutputFormat::Text),
            "1\tPlatform\n2\tMunition\n"
        );
        let subs = render(
            ListCommand::Subcategories { source: source(), kind: 1, domain: 4, country: 153, category: 5 },
            OutputFormat::Text,
        );
        assert_eq!(subs.lines().count(), 2);
    }
}
