//! Operator configuration.
//!
//! A single TOML document carries everything that is curated rather than
//! derived: the project namespace, the shared anchors, the entity registry,
//! and the title/name rule tables. A default configuration is bundled into
//! the crate.
//!
//! ```toml
//! [namespace]
//! prefix = "my"
//! base = "https://example.org/taylor-project/"
//!
//! [anchors]
//! subject = "Swift, Taylor"
//! document = "item_001"
//!
//! [[registry]]
//! name = "Swift, Taylor"
//! uri = "Taylor_Swift"
//! class = "foaf:Person"
//! same_as = ["http://viaf.org/viaf/88582739"]
//! ```

use crate::catalog::RuleTable;
use crate::registry::EntityRegistry;
use crate::vocab::{expand_curie, Namespace};
use crate::{Error, Iri, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Bundled default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// File looked up in the working directory when no path is given.
pub const LOCAL_CONFIG_FILE: &str = "vellum.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project-local namespace for minted nodes.
    #[serde(default)]
    pub namespace: NamespaceConfig,

    /// Shared anchor convention for both pipelines.
    pub anchors: AnchorConfig,

    /// Default input locations.
    #[serde(default)]
    pub input: InputConfig,

    /// Default output locations.
    #[serde(default)]
    pub output: OutputConfig,

    /// Token rule tables for the catalog classifier.
    #[serde(default)]
    pub rules: RuleTable,

    /// Curated agents, keyed by canonical name.
    #[serde(default)]
    pub registry: Vec<RegistryEntry>,
}

/// Project namespace.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamespaceConfig {
    /// Prefix used in serialized output.
    pub prefix: String,
    /// Base IRI; local ids are appended verbatim.
    pub base: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            prefix: "my".to_string(),
            base: "https://example.org/taylor-project/".to_string(),
        }
    }
}

/// The out-of-band identifiers both pipelines agree on.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnchorConfig {
    /// Registry canonical name of the central biographical subject.
    pub subject: String,
    /// Local id of the manuscript under analysis; matches its catalog row id.
    pub document: String,
}

/// Default input paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Catalog CSV.
    pub catalog: PathBuf,
    /// TEI manuscript.
    pub manuscript: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("data/csv/metadata.csv"),
            manuscript: PathBuf::from("data/tei/manuscript.xml"),
        }
    }
}

/// Default output paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Catalog graph.
    pub catalog: PathBuf,
    /// Manuscript graph.
    pub manuscript: PathBuf,
    /// Both pipelines in one graph.
    pub combined: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("output/catalog.ttl"),
            manuscript: PathBuf::from("output/manuscript.ttl"),
            combined: PathBuf::from("output/graph.ttl"),
        }
    }
}

/// One curated registry entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryEntry {
    /// Canonical name, matched exactly against source strings.
    pub name: String,
    /// Local id, CURIE, or absolute IRI.
    pub uri: String,
    /// Ontology class as CURIE or absolute IRI.
    pub class: String,
    /// Display label; derived from `name` when absent.
    #[serde(default)]
    pub label: Option<String>,
    /// External identity links.
    #[serde(default)]
    pub same_as: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The bundled default configuration.
    pub fn bundled() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Load `path` if given, else `vellum.toml` in the working directory,
    /// else the bundled default.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            tracing::info!("loading config from {}", path.display());
            return Self::from_file(path);
        }

        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            tracing::info!("loading config from {}", local.display());
            return Self::from_file(local);
        }

        tracing::info!("no config file found, using bundled defaults");
        Self::bundled()
    }

    /// The project namespace.
    pub fn project(&self) -> Namespace {
        Namespace::new(&self.namespace.prefix, &self.namespace.base)
    }

    /// Expand a registry `uri` value: absolute IRIs and CURIEs are expanded,
    /// anything else is a local id in the project namespace.
    pub fn expand_node(&self, value: &str) -> Option<Iri> {
        let project = self.project();
        if value.contains(':') {
            expand_curie(value, &project)
        } else {
            Some(project.term(value))
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.namespace.prefix.is_empty() {
            return Err(Error::Config("namespace.prefix must not be empty".into()));
        }
        if Iri::parse(self.namespace.base.as_str()).is_err() {
            return Err(Error::Config(format!(
                "namespace.base must be an absolute IRI, got `{}`",
                self.namespace.base
            )));
        }

        let document = self.anchors.document.trim();
        if document.is_empty() || document.contains(char::is_whitespace) {
            return Err(Error::Config(format!(
                "anchors.document must be a non-empty local id, got `{}`",
                self.anchors.document
            )));
        }

        let mut names = HashSet::new();
        for entry in &self.registry {
            if entry.name.is_empty() {
                return Err(Error::Config("registry entry with empty name".into()));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate registry name `{}`",
                    entry.name
                )));
            }
            if self.expand_node(&entry.uri).is_none() {
                return Err(Error::Config(format!(
                    "registry `{}`: cannot expand uri `{}`",
                    entry.name, entry.uri
                )));
            }
            if let Some(link) = entry.same_as.iter().find(|l| Iri::parse(l.as_str()).is_err()) {
                return Err(Error::Config(format!(
                    "registry `{}`: same_as `{}` is not an absolute IRI",
                    entry.name, link
                )));
            }
            if expand_curie(&entry.class, &self.project()).is_none() {
                return Err(Error::Config(format!(
                    "registry `{}`: unknown class `{}`",
                    entry.name, entry.class
                )));
            }
        }

        if !names.contains(self.anchors.subject.as_str()) {
            return Err(Error::Config(format!(
                "anchors.subject `{}` is not a registry name",
                self.anchors.subject
            )));
        }

        Ok(())
    }
}

/// The resolved shared anchors handed to both pipelines.
///
/// Built once per run from [`Config`]; the catalog pipeline anchors
/// biographical relations on `subject`, the manuscript pipeline anchors
/// annotations on `document`. Because `document` is minted with the same
/// rule as catalog row ids, the manuscript graph and the catalog row for
/// the manuscript meet on one node when merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchors {
    /// Central biographical subject.
    pub subject: Iri,
    /// Document under analysis.
    pub document: Iri,
}

impl Anchors {
    /// Resolve the anchors against a loaded registry.
    pub fn resolve(config: &Config, registry: &EntityRegistry) -> Result<Self> {
        let subject = registry
            .lookup(&config.anchors.subject)
            .map(|record| record.uri.clone())
            .ok_or_else(|| {
                Error::Config(format!(
                    "anchors.subject `{}` is not a registry name",
                    config.anchors.subject
                ))
            })?;
        let document = config.project().term(config.anchors.document.trim());
        Ok(Self { subject, document })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[anchors]
subject = "Doe, Jane"
document = "ms_1"

[[registry]]
name = "Doe, Jane"
uri = "Jane_Doe"
class = "foaf:Person"
"#;

    #[test]
    fn test_bundled_config_is_valid() {
        let config = Config::bundled().unwrap();
        assert_eq!(config.anchors.subject, "Swift, Taylor");
        assert_eq!(config.anchors.document, "item_001");
        assert!(!config.registry.is_empty());
        assert!(!config.rules.work_titles.is_empty());
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.namespace.prefix, "my");
        assert_eq!(config.output.catalog, PathBuf::from("output/catalog.ttl"));
        assert!(config.rules.known_places.is_empty());
    }

    #[test]
    fn test_expand_node() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(
            config.expand_node("Jane_Doe").unwrap().as_str(),
            "https://example.org/taylor-project/Jane_Doe"
        );
        assert_eq!(
            config.expand_node("http://viaf.org/viaf/1").unwrap().as_str(),
            "http://viaf.org/viaf/1"
        );
        assert_eq!(
            config.expand_node("foaf:Person").unwrap().as_str(),
            "http://xmlns.com/foaf/0.1/Person"
        );
    }

    #[test]
    fn test_anchor_subject_must_be_registered() {
        let bad = MINIMAL.replace("subject = \"Doe, Jane\"", "subject = \"Nobody\"");
        assert!(matches!(Config::parse(&bad), Err(Error::Config(_))));
    }

    #[test]
    fn test_duplicate_registry_names_rejected() {
        let bad = format!(
            "{}\n[[registry]]\nname = \"Doe, Jane\"\nuri = \"Other\"\nclass = \"foaf:Person\"\n",
            MINIMAL
        );
        let err = Config::parse(&bad).unwrap_err();
        assert!(err.to_string().contains("duplicate registry name"));
    }

    #[test]
    fn test_unknown_class_prefix_rejected() {
        let bad = MINIMAL.replace("foaf:Person", "zzz:Person");
        assert!(Config::parse(&bad).is_err());
    }

    #[test]
    fn test_document_anchor_must_be_local_id() {
        let bad = MINIMAL.replace("document = \"ms_1\"", "document = \"ms 1\"");
        assert!(Config::parse(&bad).is_err());
    }

    #[test]
    fn test_malformed_iris_rejected() {
        let bad_link = MINIMAL.replace(
            "class = \"foaf:Person\"",
            "class = \"foaf:Person\"\nsame_as = [\"http://viaf.org/viaf/12 34\"]",
        );
        let err = Config::parse(&bad_link).unwrap_err();
        assert!(err.to_string().contains("same_as"));

        let bad_base = format!(
            "[namespace]\nprefix = \"ex\"\nbase = \"https://example.com/my archive/\"\n{}",
            MINIMAL
        );
        assert!(matches!(Config::parse(&bad_base), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let bad = format!("{}\nsurprise = 1\n", MINIMAL);
        assert!(matches!(Config::parse(&bad), Err(Error::Config(_))));
    }

    #[test]
    fn test_anchors_resolve() {
        let config = Config::parse(MINIMAL).unwrap();
        let registry = EntityRegistry::from_config(&config).unwrap();
        let anchors = Anchors::resolve(&config, &registry).unwrap();
        assert_eq!(anchors.subject.as_str(), "https://example.org/taylor-project/Jane_Doe");
        assert_eq!(anchors.document.as_str(), "https://example.org/taylor-project/ms_1");
    }
}
