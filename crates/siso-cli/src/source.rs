//! # Taxonomy Sources
//!
//! Reads a reference document from disk into the generic tree and builds the
//! index from it. The file extension picks the parser: `.xml` goes through the
//! XML bridge, `.yaml`/`.yml` through serde_yaml, anything else is JSON.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::Value;

use siso_taxonomy::{LoaderOptions, TaxonomyIndex};

use crate::xml::xml_to_tree;

/// Markup of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Xml,
    Json,
    Yaml,
}

impl SourceFormat {
    /// Choose a format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xml") => SourceFormat::Xml,
            Some("yaml" | "yml") => SourceFormat::Yaml,
            _ => SourceFormat::Json,
        }
    }
}

/// Where the reference document comes from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Reference document (XML, JSON tree or YAML tree).
    #[arg(long, short = 't', value_name = "FILE")]
    pub taxonomy: PathBuf,
}

/// Loader options from `--config`, or the defaults.
pub fn load_options(config: Option<&Path>) -> Result<LoaderOptions> {
    match config {
        Some(path) => {
            let options = LoaderOptions::from_path(path)
                .with_context(|| format!("failed to load config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded loader options");
            Ok(options)
        }
        None => Ok(LoaderOptions::default()),
    }
}

/// Parse text in the given format into the generic tree.
pub fn parse_tree(content: &str, format: SourceFormat, prefix: &str) -> Result<Value> {
    let tree = match format {
        SourceFormat::Xml => xml_to_tree(content, prefix)?,
        SourceFormat::Json => serde_json::from_str(content)?,
        SourceFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(tree)
}

/// Read a document from disk into the generic tree.
pub fn read_tree(path: &Path, prefix: &str) -> Result<Value> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    let format = SourceFormat::from_path(path);
    tracing::debug!(path = %path.display(), ?format, bytes = content.len(), "reading document");
    parse_tree(&content, format, prefix)
        .with_context(|| format!("failed to parse {:?} document: {}", format, path.display()))
}

/// Read a document and build the index from it.
pub fn load_index(path: &Path, options: LoaderOptions) -> Result<TaxonomyIndex> {
    let tree = read_tree(path, &options.attribute_prefix)?;
    let index = TaxonomyIndex::from_parsed_document_with(tree, options)
        .with_context(|| format!("failed to build taxonomy from {}", path.display()))?;
    if !index.report().is_clean() {
        tracing::warn!(skipped = index.report().len(), "some nodes were skipped while loading");
    }
    Ok(index)
}
