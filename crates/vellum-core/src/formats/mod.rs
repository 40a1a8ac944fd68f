//! RDF serialization formats.
//!
//! Turtle is the single serialization target. N-Triples lines are available
//! per triple through [`crate::Triple::to_ntriples`] for diagnostics.

mod turtle;

pub use turtle::Turtle;
