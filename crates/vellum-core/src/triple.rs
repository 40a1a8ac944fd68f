//! Triple type for the heritage graph.
//!
//! A triple represents a (subject, predicate, object) statement.

use crate::{Iri, Term};
use std::fmt;

/// A (subject, predicate, object) triple.
///
/// Subjects are always nodes; objects are nodes or literals.
///
/// # Example
///
/// ```rust
/// use vellum_core::{Iri, Term, Triple};
///
/// let t = Triple::new(
///     Iri::new("https://example.org/item_001"),
///     Iri::new("http://purl.org/dc/terms/title"),
///     Term::literal("Fearless (Lyrics Draft)"),
/// );
/// assert_eq!(t.subject.as_str(), "https://example.org/item_001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    /// Subject node.
    pub subject: Iri,

    /// Predicate.
    pub predicate: Iri,

    /// Object node or literal.
    pub object: Term,
}

impl Triple {
    /// Create a new triple.
    pub fn new(subject: impl Into<Iri>, predicate: impl Into<Iri>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Convert to N-Triples format (one line, no trailing newline).
    pub fn to_ntriples(&self) -> String {
        format!("{} {} {} .", self.subject, self.predicate, self.object)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.predicate, self.object)
    }
}
