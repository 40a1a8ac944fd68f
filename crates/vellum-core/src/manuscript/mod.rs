//! TEI manuscript input and feature extraction.

mod document;
mod extract;

pub use document::{Descendants, Document, Element, Node};
pub use extract::{
    extract, feature_node, medium_pass, modification_pass, reference_pass, Extraction,
    ExtractionStats, Modification, ReferenceKind,
};
