//! The graph assembler: the single owner of every triple produced in a run.
//!
//! Triples have set semantics (an exact duplicate is dropped) and keep
//! first-insertion order so serialized output is stable across runs.
//! Alongside the triple set a petgraph index over nodes is maintained for
//! structural statistics.

use crate::vocab::{default_prefixes, Namespace, PrefixMap};
use crate::{Iri, Term, Triple};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Triple container for one pipeline run.
///
/// # Example
///
/// ```rust
/// use vellum_core::{Graph, Iri, Term, Triple};
///
/// let mut g = Graph::new();
/// let t = Triple::new(
///     Iri::new("http://example.org/a"),
///     Iri::new("http://example.org/p"),
///     Term::literal("x"),
/// );
/// assert!(g.add(t.clone()));
/// assert!(!g.add(t));
/// assert_eq!(g.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Node/edge view; literal objects are nodes too.
    index: DiGraph<Term, Iri>,

    /// Map from term to node index.
    node_index: HashMap<Term, NodeIndex>,

    /// All triples in insertion order.
    triples: Vec<Triple>,

    /// Membership check for set semantics.
    seen: HashSet<Triple>,

    /// Prefixes bound for serialization.
    prefixes: PrefixMap,
}

impl Graph {
    /// Create an empty graph with no prefixes bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with the standard prefix table for `project`.
    pub fn with_project(project: &Namespace) -> Self {
        Self {
            prefixes: default_prefixes(project),
            ..Self::default()
        }
    }

    /// Bind a prefix for serialization.
    pub fn bind(&mut self, prefix: impl Into<String>, base: impl Into<String>) {
        self.prefixes.bind(prefix, base);
    }

    /// Bound prefixes.
    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Add a triple. Returns `false` if an identical triple was already present.
    pub fn add(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }

        let subject_idx = self.get_or_create_node(Term::Iri(triple.subject.clone()));
        let object_idx = self.get_or_create_node(triple.object.clone());
        self.index
            .add_edge(subject_idx, object_idx, triple.predicate.clone());

        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Add every triple from an iterator. Returns how many were new.
    pub fn extend(&mut self, triples: impl IntoIterator<Item = Triple>) -> usize {
        let mut added = 0;
        for triple in triples {
            if self.add(triple) {
                added += 1;
            }
        }
        added
    }

    /// Union another graph into this one, including its prefix bindings.
    /// Returns how many triples were new.
    pub fn merge(&mut self, other: Graph) -> usize {
        for (prefix, base) in other.prefixes.iter() {
            if self.prefixes.iter().all(|(p, _)| p != prefix) {
                self.prefixes.bind(prefix, base);
            }
        }
        self.extend(other.triples)
    }

    fn get_or_create_node(&mut self, term: Term) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(&term) {
            return idx;
        }
        let idx = self.index.add_node(term.clone());
        self.node_index.insert(term, idx);
        idx
    }

    /// True if the exact triple is present.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.seen.contains(triple)
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// True if the graph holds no triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over all triples in insertion order.
    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// All triples with the given subject.
    pub fn relations_from(&self, subject: &Iri) -> Vec<&Triple> {
        self.triples.iter().filter(|t| t.subject == *subject).collect()
    }

    /// Objects of `(subject, predicate, ?)`.
    pub fn objects(&self, subject: &Iri, predicate: &str) -> Vec<&Term> {
        self.triples
            .iter()
            .filter(|t| t.subject == *subject && t.predicate.as_str() == predicate)
            .map(|t| &t.object)
            .collect()
    }

    /// Compute statistics about the graph.
    pub fn stats(&self) -> GraphStats {
        let subjects: HashSet<&Iri> = self.triples.iter().map(|t| &t.subject).collect();
        let predicates: HashSet<&Iri> = self.triples.iter().map(|t| &t.predicate).collect();
        let literal_count = self
            .index
            .node_weights()
            .filter(|t| matches!(t, Term::Literal(_)))
            .count();

        GraphStats {
            triple_count: self.triples.len(),
            node_count: self.index.node_count() - literal_count,
            subject_count: subjects.len(),
            predicate_count: predicates.len(),
            components: self.node_components(),
        }
    }

    /// Weakly connected components over IRI nodes.
    ///
    /// Literal nodes are left out so two subjects sharing a literal value
    /// (e.g. the same date) are not counted as linked.
    fn node_components(&self) -> usize {
        let mut view = self.index.clone();
        view.retain_nodes(|g, idx| matches!(g[idx], Term::Iri(_)));
        petgraph::algo::connected_components(&view)
    }
}

/// Statistics about a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    /// Number of triples.
    pub triple_count: usize,
    /// Number of distinct IRI nodes.
    pub node_count: usize,
    /// Number of distinct subjects.
    pub subject_count: usize,
    /// Number of distinct predicates.
    pub predicate_count: usize,
    /// Weakly connected components over IRI nodes.
    pub components: usize,
}
