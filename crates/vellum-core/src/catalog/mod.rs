//! Tabular catalog input and its classifier.
//!
//! - [`Catalog`] reads the CSV into validated [`CatalogRecord`]s.
//! - [`EntityClass`] dispatches a type code to one of six classes.
//! - [`RuleTable`] holds the curated title and name tokens.
//! - [`Classifier`] turns a record into triples.

mod classify;
mod record;
mod rules;

pub use classify::{Classification, Classifier};
pub use record::{Catalog, CatalogRecord, REQUIRED_COLUMNS};
pub use rules::{Acquaintance, EntityClass, RuleTable, WorkRelation, WorkTitleRule};
