//! # Convert and Emit Subcommands
//!
//! `convert` turns the reference XML into the JSON tree the index loads from,
//! so the markup is parsed once and the tree shipped. `emit` writes a tree
//! back out as XML.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use siso_taxonomy::{LoaderOptions, TaxonomyIndex};

use crate::source::read_tree;
use crate::xml::tree_to_xml;

/// Arguments for `siso convert`.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Reference document to convert (usually XML).
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Write the JSON tree here instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit compact JSON.
    #[arg(long)]
    pub compact: bool,

    /// Build the index from the converted tree and report table sizes.
    #[arg(long)]
    pub check: bool,
}

/// Arguments for `siso emit`.
#[derive(Args, Debug)]
pub struct EmitArgs {
    /// JSON or YAML tree to serialize.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Write the XML here instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute `siso convert`.
pub fn run_convert(args: &ConvertArgs, options: LoaderOptions) -> Result<u8> {
    let tree = read_tree(&args.input, &options.attribute_prefix)?;
    let json = if args.compact {
        serde_json::to_string(&tree)?
    } else {
        serde_json::to_string_pretty(&tree)?
    };
    write_output(args.output.as_deref(), &json)?;

    if args.check {
        return check_tree(tree, options);
    }
    Ok(0)
}

/// Execute `siso emit`.
pub fn run_emit(args: &EmitArgs, options: LoaderOptions) -> Result<u8> {
    let tree = read_tree(&args.input, &options.attribute_prefix)?;
    let xml = tree_to_xml(&tree, &options.attribute_prefix)
        .with_context(|| format!("failed to emit XML from {}", args.input.display()))?;
    write_output(args.output.as_deref(), &xml)?;
    Ok(0)
}

fn check_tree(tree: Value, options: LoaderOptions) -> Result<u8> {
    let index = TaxonomyIndex::from_parsed_document_with(tree, options)?;
    eprintln!(
        "OK: kinds={} domains={} countries={} categories={} skipped={}",
        index.kind_count(),
        index.domain_count(),
        index.country_count(),
        index.category_count(),
        index.report().len()
    );
    for row in index.report().skipped() {
        eprintln!("  SKIP: {row}");
    }
    Ok(if index.report().is_clean() { 0 } else { 2 })
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, format!("{content}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = content.len() + 1, "wrote output");
        }
        None => println!("{content}"),
    }
    Ok(())
}
