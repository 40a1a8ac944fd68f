//! Entity registry: curated agents keyed by canonical name.
//!
//! Identity is exact string equality on the canonical name. The registry is
//! immutable once built; [`EntityRegistry::seed`] writes each record's
//! type, label, and same-as links into a graph so later lookups can refer
//! to nodes that already exist.

use crate::config::Config;
use crate::vocab::{expand_curie, owl, rdf, rdfs};
use crate::{Error, Graph, Iri, Literal, Result, Triple};
use std::collections::HashMap;

/// A registry record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    /// Canonical name as it appears in source data.
    pub name: String,
    /// Node IRI.
    pub uri: Iri,
    /// Primary ontology class.
    pub class: Iri,
    /// Display label.
    pub label: String,
    /// External same-as links.
    pub same_as: Vec<Iri>,
}

impl EntityRecord {
    /// Create a record with no external links; the label is derived from the name.
    pub fn new(name: impl Into<String>, uri: impl Into<Iri>, class: impl Into<Iri>) -> Self {
        let name = name.into();
        Self {
            label: display_name(&name),
            name,
            uri: uri.into(),
            class: class.into(),
            same_as: Vec::new(),
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add an external link.
    pub fn with_same_as(mut self, link: impl Into<Iri>) -> Self {
        self.same_as.push(link.into());
        self
    }

    /// The triples this record contributes when seeded.
    pub fn seed_triples(&self) -> Vec<Triple> {
        let mut out = Vec::with_capacity(2 + self.same_as.len());
        out.push(Triple::new(&self.uri, rdf::TYPE, &self.class));
        out.push(Triple::new(&self.uri, rdfs::LABEL, Literal::new(&self.label)));
        for link in &self.same_as {
            out.push(Triple::new(&self.uri, owl::SAME_AS, link));
        }
        out
    }
}

/// Immutable name → record table.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    records: Vec<EntityRecord>,
    by_name: HashMap<String, usize>,
}

impl EntityRegistry {
    /// Build from records, in order. Duplicate names are rejected.
    pub fn new(records: impl IntoIterator<Item = EntityRecord>) -> Result<Self> {
        let mut registry = Self::default();
        for record in records {
            if registry.by_name.contains_key(&record.name) {
                return Err(Error::Config(format!(
                    "duplicate registry name `{}`",
                    record.name
                )));
            }
            registry
                .by_name
                .insert(record.name.clone(), registry.records.len());
            registry.records.push(record);
        }
        Ok(registry)
    }

    /// Build from the `[[registry]]` entries of a configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let project = config.project();
        let records = config
            .registry
            .iter()
            .map(|entry| {
                let uri = config.expand_node(&entry.uri).ok_or_else(|| {
                    Error::Config(format!("registry `{}`: bad uri `{}`", entry.name, entry.uri))
                })?;
                let class = expand_curie(&entry.class, &project).ok_or_else(|| {
                    Error::Config(format!(
                        "registry `{}`: bad class `{}`",
                        entry.name, entry.class
                    ))
                })?;
                let mut record = EntityRecord::new(&entry.name, uri, class);
                if let Some(ref label) = entry.label {
                    record = record.with_label(label);
                }
                for link in &entry.same_as {
                    record = record.with_same_as(link.as_str());
                }
                Ok(record)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(records)
    }

    /// Exact-match lookup on canonical name.
    pub fn lookup(&self, name: &str) -> Option<&EntityRecord> {
        self.by_name.get(name).map(|&i| &self.records[i])
    }

    /// Write every record's type, label, and same-as triples.
    ///
    /// Returns how many triples were new; seeding the same graph again adds
    /// nothing.
    pub fn seed(&self, graph: &mut Graph) -> usize {
        let added = graph.extend(self.records.iter().flat_map(EntityRecord::seed_triples));
        tracing::debug!(records = self.records.len(), added, "seeded entity registry");
        added
    }

    /// Records in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// `"Swift, Taylor"` → `"Taylor Swift"`; other shapes pass through.
fn display_name(name: &str) -> String {
    match name.split_once(',') {
        Some((surname, given)) if !given.trim().is_empty() => {
            format!("{} {}", given.trim(), surname.trim())
        }
        _ => name.trim().to_string(),
    }
}
