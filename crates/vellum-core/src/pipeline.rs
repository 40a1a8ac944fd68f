//! Run boundary for the catalog and manuscript pipelines.
//!
//! Inputs are read completely before anything is transformed, and a graph
//! is serialized only after it has been fully assembled. Setup failures
//! (missing or unparsable input, bad configuration) are returned as errors;
//! per-row problems are logged and counted in the report.

use crate::catalog::{Catalog, CatalogRecord, Classifier, EntityClass, RuleTable};
use crate::config::{Anchors, Config};
use crate::formats::Turtle;
use crate::manuscript::{extract, Document, ExtractionStats};
use crate::registry::EntityRegistry;
use crate::resolve::IdentityResolver;
use crate::vocab::Namespace;
use crate::{Graph, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Counts from one catalog run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogReport {
    /// Data rows seen.
    pub rows: usize,
    /// Rows classified into one of the six classes.
    pub classified: usize,
    /// Rows kept with base triples only.
    pub unclassified: usize,
    /// Rows dropped for missing required fields or bad syntax.
    pub skipped: usize,
    /// New triples added by the rows.
    pub triples_added: usize,
}

/// Everything a run needs, built once from configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    project: Namespace,
    registry: EntityRegistry,
    anchors: Anchors,
    rules: RuleTable,
}

impl Pipeline {
    /// Assemble from parts.
    pub fn new(project: Namespace, registry: EntityRegistry, anchors: Anchors, rules: RuleTable) -> Self {
        Self {
            project,
            registry,
            anchors,
            rules,
        }
    }

    /// Load the registry and resolve the shared anchors from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = EntityRegistry::from_config(config)?;
        let anchors = Anchors::resolve(config, &registry)?;
        tracing::info!(
            records = registry.len(),
            subject = %anchors.subject,
            document = %anchors.document,
            "loaded entity registry"
        );
        Ok(Self::new(config.project(), registry, anchors, config.rules.clone()))
    }

    /// The entity registry.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// The shared anchors.
    pub fn anchors(&self) -> &Anchors {
        &self.anchors
    }

    /// A fresh graph with prefixes bound and the registry seeded.
    pub fn new_graph(&self) -> Graph {
        let mut graph = Graph::with_project(&self.project);
        self.registry.seed(&mut graph);
        graph
    }

    /// Classify rows into `graph`, skipping rows that failed validation.
    pub fn classify_rows(
        &self,
        graph: &mut Graph,
        rows: impl IntoIterator<Item = Result<CatalogRecord>>,
    ) -> CatalogReport {
        let classifier = Classifier::new(
            IdentityResolver::new(&self.registry),
            &self.rules,
            &self.anchors,
            &self.project,
        );
        let mut report = CatalogReport::default();

        for row in rows {
            report.rows += 1;
            let record = match row {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("skipping row: {e}");
                    report.skipped += 1;
                    continue;
                }
            };

            let classification = classifier.classify(&record);
            if classification.class == EntityClass::Unclassified {
                report.unclassified += 1;
            } else {
                report.classified += 1;
            }
            tracing::debug!(
                row = record.row,
                id = %record.id,
                class = ?classification.class,
                triples = classification.triples.len(),
                "classified"
            );
            for triple in &classification.triples {
                tracing::trace!("{}", triple.to_ntriples());
            }
            report.triples_added += graph.extend(classification.triples);
        }

        report
    }

    /// Read a catalog and build its graph.
    pub fn catalog_graph(&self, path: &Path) -> Result<(Graph, CatalogReport)> {
        let rows = Catalog::read_path(path)?;
        tracing::info!("read {} catalog rows from {}", rows.len(), path.display());

        let mut graph = self.new_graph();
        let report = self.classify_rows(&mut graph, rows);
        Ok((graph, report))
    }

    /// Extract a parsed manuscript into `graph`.
    pub fn extract_document(&self, graph: &mut Graph, document: &Document) -> ExtractionStats {
        let extraction = extract(document, &self.anchors.document);
        graph.extend(extraction.triples);
        extraction.stats
    }

    /// Read a manuscript and build its graph.
    pub fn manuscript_graph(&self, path: &Path) -> Result<(Graph, ExtractionStats)> {
        let document = Document::from_path(path)?;
        tracing::info!("parsed manuscript {}", path.display());

        let mut graph = self.new_graph();
        let stats = self.extract_document(&mut graph, &document);
        Ok((graph, stats))
    }

    /// Both pipelines into one graph. Both inputs are read before either is
    /// transformed, so a bad manuscript fails the run before any catalog work.
    pub fn combined_graph(
        &self,
        catalog: &Path,
        manuscript: &Path,
    ) -> Result<(Graph, CatalogReport, ExtractionStats)> {
        let rows = Catalog::read_path(catalog)?;
        let document = Document::from_path(manuscript)?;
        tracing::info!(
            "read {} catalog rows from {} and manuscript {}",
            rows.len(),
            catalog.display(),
            manuscript.display()
        );

        let mut graph = self.new_graph();
        let report = self.classify_rows(&mut graph, rows);
        let stats = self.extract_document(&mut graph, &document);
        Ok((graph, report, stats))
    }
}

/// Serialize `graph` as Turtle to `path`, creating parent directories.
///
/// The document is rendered in memory, written to a temporary file next to
/// `path` and renamed into place, so `path` holds either the old content or
/// the complete new document.
pub fn write_turtle(graph: &Graph, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    Turtle::write(graph, &mut buf)?;

    let dir = match path.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            dir
        }
        None => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&buf)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    tracing::info!("wrote {} triples to {}", graph.len(), path.display());
    Ok(())
}

/// Read and union Turtle files.
pub fn merge_files<P: AsRef<Path>>(paths: &[P]) -> Result<Graph> {
    let mut graph = Graph::new();
    for path in paths {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let part = Turtle::read(std::io::BufReader::new(file))?;
        let added = graph.merge(part);
        tracing::info!("merged {} new triples from {}", added, path.display());
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn pipeline() -> Pipeline {
        Pipeline::from_config(&Config::bundled().unwrap()).unwrap()
    }

    #[test]
    fn test_new_graph_is_seeded() {
        let p = pipeline();
        let g = p.new_graph();
        assert!(!g.is_empty());
        assert!(!g.relations_from(&p.anchors().subject).is_empty());
    }

    #[test]
    fn test_bad_rows_skipped_and_counted() {
        let p = pipeline();
        let mut g = p.new_graph();
        let rows = vec![
            Err(Error::MissingField { row: 1, field: "title" }),
            Ok(CatalogRecord::new("item_2", "Eras Tour", "crm:E5_Event")),
            Ok(CatalogRecord::new("item_3", "Mystery", "crm:E77_Persistent_Item")),
        ];
        let report = p.classify_rows(&mut g, rows);
        assert_eq!(
            report,
            CatalogReport {
                rows: 3,
                classified: 1,
                unclassified: 1,
                skipped: 1,
                triples_added: 6 + 4,
            }
        );
    }

    #[test]
    fn test_missing_inputs_are_fatal() {
        let p = pipeline();
        assert!(p.catalog_graph(Path::new("/nope/catalog.csv")).is_err());
        assert!(p.manuscript_graph(Path::new("/nope/ms.xml")).is_err());
    }

    #[test]
    fn test_write_turtle_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out.ttl");
        let p = pipeline();
        write_turtle(&p.new_graph(), &out).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("@prefix crm:"));
    }

    #[test]
    fn test_write_turtle_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.ttl");
        fs::write(&out, "stale").unwrap();

        let p = pipeline();
        let graph = p.new_graph();
        write_turtle(&graph, &out).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(Turtle::parse(&text).unwrap().len(), graph.len());
        // No temporary file is left beside the output.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_turtle_failure_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.ttl");
        fs::create_dir(&out).unwrap();

        assert!(write_turtle(&pipeline().new_graph(), &out).is_err());
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_merge_files_unions() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.ttl");
        let b = dir.path().join("b.ttl");
        fs::write(&a, "<http://x/a> <http://x/p> <http://x/b> .\n").unwrap();
        fs::write(
            &b,
            "@prefix x: <http://x/> .\nx:a x:p x:b .\nx:b x:p \"lit\" .\n",
        )
        .unwrap();

        let g = merge_files(&[&a, &b]).unwrap();
        assert_eq!(g.len(), 2);
        assert!(g.prefixes().iter().any(|(p, _)| p == "x"));
    }
}
