//! Vellum CLI - build heritage knowledge graphs from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Classify a catalog CSV into Turtle
//! vellum catalog data/csv/metadata.csv -o output/catalog.ttl
//!
//! # Extract references and revisions from a TEI manuscript
//! vellum manuscript data/tei/draft.xml -o output/manuscript.ttl
//!
//! # Both pipelines into one graph
//! vellum build --catalog data/csv/metadata.csv --manuscript data/tei/draft.xml
//!
//! # Union graphs built separately
//! vellum merge output/catalog.ttl output/manuscript.ttl -o output/graph.ttl
//!
//! # Show the entity registry
//! vellum --config project.toml registry
//! ```
//!
//! Paths left out fall back to the `[input]` and `[output]` tables of the
//! configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vellum_core::config::Config;
use vellum_core::manuscript::ExtractionStats;
use vellum_core::pipeline::{merge_files, write_turtle, CatalogReport, Pipeline};
use vellum_core::Graph;

#[derive(Parser)]
#[command(name = "vellum", version)]
#[command(about = "Catalogs and TEI manuscripts to CIDOC-CRM Turtle", long_about = None)]
struct Cli {
    /// Configuration file (default: ./vellum.toml, else the bundled one)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level when RUST_LOG is unset
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify catalog rows
    Catalog {
        /// Input file (CSV with header)
        input: Option<PathBuf>,

        /// Output file (Turtle)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract features from a TEI manuscript
    Manuscript {
        /// Input file (TEI XML)
        input: Option<PathBuf>,

        /// Output file (Turtle)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run both pipelines into one graph
    Build {
        /// Catalog CSV
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// TEI manuscript
        #[arg(long)]
        manuscript: Option<PathBuf>,

        /// Output file (Turtle)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Union Turtle files into one graph
    Merge {
        /// Input files (Turtle)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the entity registry
    Registry,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Catalog { input, output } => cmd_catalog(
            &config,
            &input.unwrap_or_else(|| config.input.catalog.clone()),
            &output.unwrap_or_else(|| config.output.catalog.clone()),
        ),
        Commands::Manuscript { input, output } => cmd_manuscript(
            &config,
            &input.unwrap_or_else(|| config.input.manuscript.clone()),
            &output.unwrap_or_else(|| config.output.manuscript.clone()),
        ),
        Commands::Build {
            catalog,
            manuscript,
            output,
        } => cmd_build(
            &config,
            &catalog.unwrap_or_else(|| config.input.catalog.clone()),
            &manuscript.unwrap_or_else(|| config.input.manuscript.clone()),
            &output.unwrap_or_else(|| config.output.combined.clone()),
        ),
        Commands::Merge { inputs, output } => cmd_merge(&inputs, &output),
        Commands::Registry => cmd_registry(&config),
    }
}

/// `RUST_LOG` wins when set; `--verbose` only raises the fallback level.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "vellum=debug" } else { "vellum=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn pipeline(config: &Config) -> Result<Pipeline> {
    Pipeline::from_config(config).context("Invalid registry or anchors")
}

fn cmd_catalog(config: &Config, input: &Path, output: &Path) -> Result<()> {
    let pipeline = pipeline(config)?;
    let (graph, report) = pipeline
        .catalog_graph(input)
        .with_context(|| format!("Failed to read catalog {}", input.display()))?;

    save(&graph, output)?;
    print_catalog(&report);
    print_graph(&graph);
    Ok(())
}

fn cmd_manuscript(config: &Config, input: &Path, output: &Path) -> Result<()> {
    let pipeline = pipeline(config)?;
    let (graph, stats) = pipeline
        .manuscript_graph(input)
        .with_context(|| format!("Failed to read manuscript {}", input.display()))?;

    save(&graph, output)?;
    print_manuscript(&stats);
    print_graph(&graph);
    Ok(())
}

fn cmd_build(config: &Config, catalog: &Path, manuscript: &Path, output: &Path) -> Result<()> {
    let pipeline = pipeline(config)?;
    let (graph, report, stats) = pipeline
        .combined_graph(catalog, manuscript)
        .with_context(|| {
            format!(
                "Failed to read inputs {} and {}",
                catalog.display(),
                manuscript.display()
            )
        })?;

    save(&graph, output)?;
    print_catalog(&report);
    print_manuscript(&stats);
    print_graph(&graph);
    Ok(())
}

fn cmd_merge(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let graph = merge_files(inputs).context("Failed to merge graphs")?;
    save(&graph, output)?;
    println!("Merged {} files", inputs.len());
    print_graph(&graph);
    Ok(())
}

fn cmd_registry(config: &Config) -> Result<()> {
    let pipeline = pipeline(config)?;
    let registry = pipeline.registry();

    println!("Entity Registry ({} entries)", registry.len());
    println!("==========================");
    for record in registry.iter() {
        let marker = if record.uri == pipeline.anchors().subject {
            " (subject)"
        } else {
            ""
        };
        println!("{}{}", record.name, marker);
        println!("  uri:   {}", record.uri.as_str());
        println!("  class: {}", record.class.as_str());
        println!("  label: {}", record.label);
        for link in &record.same_as {
            println!("  same:  {}", link.as_str());
        }
    }
    Ok(())
}

fn save(graph: &Graph, output: &Path) -> Result<()> {
    write_turtle(graph, output).with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn print_catalog(report: &CatalogReport) {
    println!("Catalog");
    println!("=======");
    println!("Rows:           {}", report.rows);
    println!("Classified:     {}", report.classified);
    println!("Unclassified:   {}", report.unclassified);
    println!("Skipped:        {}", report.skipped);
}

fn print_manuscript(stats: &ExtractionStats) {
    println!("Manuscript");
    println!("==========");
    println!("Medium:         {}", if stats.medium { "yes" } else { "no" });
    println!("References:     {}", stats.references);
    println!("Deletions:      {}", stats.deletions);
    println!("Additions:      {}", stats.additions);
}

fn print_graph(graph: &Graph) {
    let stats = graph.stats();
    println!("Graph");
    println!("=====");
    println!("Triples:        {}", stats.triple_count);
    println!("Nodes:          {}", stats.node_count);
    println!("Subjects:       {}", stats.subject_count);
    println!("Predicates:     {}", stats.predicate_count);
    println!("Components:     {}", stats.components);
}
