//! # Taxonomy Loader
//!
//! One pass over the parsed reference document fills four tables:
//!
//! - **kinds**: rows of the entity-kind list, keyed by `kind` alone.
//! - **domains**: rows of the kind-domain lists, replicated for every kind the
//!   row's applicability expression names, keyed by `kind` + `domain`.
//! - **countries**: rows of the country list, keyed by `country` alone.
//! - **categories**: the entity-type forest. Each category, subcategory,
//!   specific and extra node is keyed by its ancestors' fields plus its own,
//!   and described by its ancestors' descriptions joined with the delimiter.
//!
//! A missing `ebv`, `enum` or `cet` container is a [`LoadError`]. Anything
//! smaller that does not have the expected shape is recorded in the
//! [`LoadReport`] and skipped.

use std::collections::HashMap;

use serde_json::Value;
use siso_core::{pack_key, EntityKey, Field, LoadError};

use crate::applicability::ApplicabilityExpander;
use crate::config::LoaderOptions;
use crate::node::{Node, OneOrMany};
use crate::report::{Level, LoadReport, MalformedRow};

/// Nested levels of the entity-type forest, outermost first.
const TREE_LEVELS: [(Level, Field, &str); 4] = [
    (Level::Category, Field::Category, "category"),
    (Level::Subcategory, Field::Subcategory, "subcategory"),
    (Level::Specific, Field::Specific, "specific"),
    (Level::Extra, Field::Extra, "extra"),
];

/// The four keyed description tables.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub(crate) kinds: HashMap<EntityKey, String>,
    pub(crate) domains: HashMap<EntityKey, String>,
    pub(crate) countries: HashMap<EntityKey, String>,
    pub(crate) categories: HashMap<EntityKey, String>,
}

pub(crate) struct TaxonomyLoader<'a> {
    options: &'a LoaderOptions,
    expander: &'a mut ApplicabilityExpander,
    tables: Tables,
    report: LoadReport,
}

impl<'a> TaxonomyLoader<'a> {
    pub(crate) fn new(options: &'a LoaderOptions, expander: &'a mut ApplicabilityExpander) -> Self {
        Self {
            options,
            expander,
            tables: Tables::default(),
            report: LoadReport::default(),
        }
    }

    /// Walk `document` and return the filled tables with the skip report.
    pub(crate) fn load(mut self, document: &Value) -> Result<(Tables, LoadReport), LoadError> {
        let root = document.as_object().ok_or(LoadError::RootNotObject {
            found: json_type(document),
        })?;

        // Accept the `ebv` container itself as the root too.
        let ebv = match root.get("ebv") {
            Some(ebv) if ebv.is_object() => ebv,
            None if root.contains_key("enum") => document,
            _ => return Err(missing("ebv")),
        };

        let enums = OneOrMany::from_value(ebv.get("enum").ok_or_else(|| missing("enum"))?).into_vec();
        let forest = OneOrMany::from_value(ebv.get("cet").ok_or_else(|| missing("cet"))?).into_vec();
        if !enums.iter().any(|e| e.is_object()) {
            return Err(LoadError::EmptyCollection { name: "enum".to_string() });
        }
        if !forest.iter().any(|c| c.is_object()) {
            return Err(LoadError::EmptyCollection { name: "cet".to_string() });
        }

        for list in enums {
            self.load_enum(list);
        }
        for list in forest {
            self.load_entity_list(list);
        }

        tracing::debug!(
            countries = self.tables.countries.len(),
            kinds = self.tables.kinds.len(),
            domains = self.tables.domains.len(),
            categories = self.tables.categories.len(),
            "tables populated"
        );
        Ok((self.tables, self.report))
    }

    fn load_enum(&mut self, value: &Value) {
        let options = self.options;
        let Some(list) = Node::new(value, &options.attribute_prefix) else {
            self.skip(Level::EnumList, "ebv", "not an object");
            return;
        };
        let Some(uid) = list.attr_int("uid") else {
            self.skip(Level::EnumList, "ebv", "missing uid");
            return;
        };

        let level = if uid == options.country_list_uid {
            Level::CountryRow
        } else if uid == options.kind_list_uid {
            Level::KindRow
        } else if options.domain_list_uids.contains(&uid) {
            Level::DomainRow
        } else {
            return;
        };

        tracing::debug!(uid, level = %level, "parsing enumerated list");
        let Some(rows) = list.children("enumrow") else {
            tracing::debug!(uid, "enumerated list has no rows");
            return;
        };

        let path = format!("enum {uid}");
        let list_applicability = list.attr_text("applicability");
        for value in rows {
            let Some(node) = Node::new(value, &options.attribute_prefix) else {
                self.skip(level, &path, "not an object");
                continue;
            };
            let row = match node.row() {
                Ok(row) => row,
                Err(reason) => {
                    self.skip(level, &path, &reason);
                    continue;
                }
            };
            let code = row.value as u64;

            match level {
                Level::CountryRow => {
                    self.tables
                        .countries
                        .insert(pack_key(0, 0, code, 0, 0, 0, 0), row.description);
                }
                Level::KindRow => {
                    self.tables
                        .kinds
                        .insert(pack_key(code, 0, 0, 0, 0, 0, 0), row.description);
                }
                _ => {
                    let applicability = node
                        .attr_text("applicability")
                        .or_else(|| list_applicability.clone());
                    let kinds = match self.expander.expand(applicability.as_deref()) {
                        Ok(kinds) => kinds.to_vec(),
                        Err(e) => {
                            self.skip(level, &path, &e.to_string());
                            continue;
                        }
                    };
                    if kinds.is_empty() {
                        tracing::debug!(uid, domain = row.value, "domain row applies to no kinds");
                    }
                    for kind in kinds {
                        self.tables.domains.insert(
                            pack_key(kind.into(), code, 0, 0, 0, 0, 0),
                            row.description.clone(),
                        );
                    }
                }
            }
        }
    }

    fn load_entity_list(&mut self, value: &Value) {
        let options = self.options;
        let Some(list) = Node::new(value, &options.attribute_prefix) else {
            self.skip(Level::EntityList, "ebv", "not an object");
            return;
        };
        let path = list
            .attr_text("uid")
            .map(|uid| format!("cet {uid}"))
            .unwrap_or_else(|| "cet".to_string());
        let Some(entities) = list.children("entity") else {
            self.skip(Level::EntityList, &path, "no entity children");
            return;
        };
        for entity in entities {
            self.load_entity(entity, &path);
        }
    }

    fn load_entity(&mut self, value: &Value, path: &str) {
        let options = self.options;
        let Some(entity) = Node::new(value, &options.attribute_prefix) else {
            self.skip(Level::Entity, path, "not an object");
            return;
        };
        let (Some(kind), Some(domain), Some(country)) = (
            entity.attr_int("kind"),
            entity.attr_int("domain"),
            entity.attr_int("country"),
        ) else {
            self.skip(Level::Entity, path, "missing or non-integer kind, domain or country");
            return;
        };

        let base = pack_key(kind as u64, domain as u64, country as u64, 0, 0, 0, 0);
        let Some(categories) = entity.children("category") else {
            self.skip(Level::Entity, &base.to_string(), "no category children");
            return;
        };
        self.load_level(0, base, None, categories);
    }

    /// Insert every node of one tree level and recurse into the next.
    fn load_level(
        &mut self,
        depth: usize,
        parent: EntityKey,
        parent_description: Option<&str>,
        nodes: Vec<&Value>,
    ) {
        let options = self.options;
        let (level, field, _) = TREE_LEVELS[depth];

        for value in nodes {
            let Some(node) = Node::new(value, &options.attribute_prefix) else {
                self.skip(level, &parent.to_string(), "not an object");
                continue;
            };
            let row = match node.row() {
                Ok(row) => row,
                Err(reason) => {
                    self.skip(level, &parent.to_string(), &reason);
                    continue;
                }
            };

            let key = parent.with_field(field, row.value as u64);
            let description = match parent_description {
                Some(parent_text) => format!("{parent_text}{}{}", options.delimiter, row.description),
                None => row.description,
            };
            self.tables.categories.insert(key, description.clone());

            if let Some((_, _, child_name)) = TREE_LEVELS.get(depth + 1) {
                if let Some(children) = node.children(child_name) {
                    self.load_level(depth + 1, key, Some(description.as_str()), children);
                }
            }
        }
    }

    fn skip(&mut self, level: Level, path: &str, reason: &str) {
        self.report.record(MalformedRow {
            level,
            path: path.to_string(),
            reason: reason.to_string(),
        });
    }
}

fn missing(name: &str) -> LoadError {
    LoadError::MissingCollection { name: name.to_string() }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
