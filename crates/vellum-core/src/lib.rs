//! Heritage catalogs and TEI manuscripts as a CIDOC-CRM knowledge graph.
//!
//! Two pipelines feed one graph model:
//!
//! - [`catalog`] - classify CSV catalog rows by type code and relate them
//!   to the subject of the collection
//! - [`manuscript`] - pull referenced places, objects, times, and authorial
//!   deletions/additions out of a TEI transcription
//!
//! Both share an [`EntityRegistry`](registry::EntityRegistry) of canonical
//! people, so a name written in a catalog row resolves to the same node the
//! registry seeded. Results serialize as Turtle.
//!
//! # Example
//!
//! ```rust
//! use vellum_core::catalog::CatalogRecord;
//! use vellum_core::config::Config;
//! use vellum_core::pipeline::Pipeline;
//! use vellum_core::formats::Turtle;
//!
//! let config = Config::bundled()?;
//! let pipeline = Pipeline::from_config(&config)?;
//!
//! let mut graph = pipeline.new_graph();
//! let row = CatalogRecord::new("item_002", "Eras Tour", "crm:E5_Event");
//! let report = pipeline.classify_rows(&mut graph, [Ok(row)]);
//! assert_eq!(report.classified, 1);
//!
//! let ttl = Turtle::to_string(&graph)?;
//! assert!(ttl.contains("my:item_002 dcterms:title \"Eras Tour\""));
//! assert!(ttl.contains("a crm:E5_Event"));
//! # Ok::<(), vellum_core::Error>(())
//! ```

mod error;
mod graph;
mod term;
mod triple;

pub mod catalog;
pub mod config;
pub mod formats;
pub mod manuscript;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod vocab;

pub use error::{Error, Result};
pub use graph::{Graph, GraphStats};
pub use term::{escape_literal, Iri, Literal, Term};
pub use triple::Triple;
