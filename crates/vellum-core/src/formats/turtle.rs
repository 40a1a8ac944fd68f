//! Turtle format.
//!
//! Human-readable RDF serialization with prefix support. This is the only
//! output format; the reader exists so separately built graphs can be merged.
//!
//! Reference: <https://www.w3.org/TR/turtle/>
//!
//! Example:
//! ```turtle
//! @prefix crm: <http://www.cidoc-crm.org/cidoc-crm/> .
//! @prefix my: <https://example.org/taylor-project/> .
//!
//! my:item_001 a crm:E22_Man-Made_Object ;
//!     crm:P51_has_former_or_current_owner my:Taylor_Swift .
//! ```

use crate::vocab::{rdf, PrefixMap};
use crate::{Graph, Iri, Literal, Result, Term, Triple};
use rio_api::model as rio;
use rio_api::parser::TriplesParser;
use rio_turtle::TurtleParser;
use std::collections::HashMap;
use std::io::{BufRead, Write};

/// Turtle format handler.
pub struct Turtle;

impl Turtle {
    /// Write a graph to Turtle using the graph's own prefix table.
    ///
    /// Every bound prefix is declared in the header whether or not it is
    /// used. Triples are grouped by subject in first-seen order.
    pub fn write<W: Write>(graph: &Graph, mut writer: W) -> Result<()> {
        let prefixes = graph.prefixes();

        for (prefix, base) in prefixes.iter() {
            writeln!(writer, "@prefix {}: <{}> .", prefix, base)?;
        }
        if !prefixes.is_empty() {
            writeln!(writer)?;
        }

        let mut order: Vec<&Iri> = Vec::new();
        let mut by_subject: HashMap<&Iri, Vec<&Triple>> = HashMap::new();
        for triple in graph.triples() {
            by_subject
                .entry(&triple.subject)
                .or_insert_with(|| {
                    order.push(&triple.subject);
                    Vec::new()
                })
                .push(triple);
        }

        for subject in order {
            write!(writer, "{}", format_iri(subject, prefixes))?;

            for (i, triple) in by_subject[subject].iter().enumerate() {
                let pred = if triple.predicate.as_str() == rdf::TYPE {
                    "a".to_string()
                } else {
                    format_iri(&triple.predicate, prefixes)
                };
                let obj = format_term(&triple.object, prefixes);

                if i == 0 {
                    write!(writer, " {} {}", pred, obj)?;
                } else {
                    write!(writer, " ;\n    {} {}", pred, obj)?;
                }
            }
            writeln!(writer, " .\n")?;
        }

        Ok(())
    }

    /// Serialize to a string.
    pub fn to_string(graph: &Graph) -> Result<String> {
        let mut buf = Vec::new();
        Self::write(graph, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).to_string())
    }

    /// Parse Turtle into a graph, keeping the document's prefix bindings.
    ///
    /// Blank nodes and quoted triples are never produced by the pipelines;
    /// statements using them are skipped with a warning.
    pub fn read<R: BufRead>(reader: R) -> Result<Graph> {
        let mut parser = TurtleParser::new(reader, None);
        let mut graph = Graph::new();
        let mut skipped = 0usize;

        parser.parse_all(&mut |t| -> Result<()> {
            let subject = match t.subject {
                rio::Subject::NamedNode(n) => Iri::new(n.iri),
                _ => {
                    skipped += 1;
                    return Ok(());
                }
            };
            let object = match t.object {
                rio::Term::NamedNode(n) => Term::Iri(Iri::new(n.iri)),
                rio::Term::Literal(rio::Literal::Simple { value }) => {
                    Term::Literal(Literal::new(value))
                }
                rio::Term::Literal(rio::Literal::LanguageTaggedString { value, language }) => {
                    Term::Literal(Literal::new(value).with_language(language))
                }
                rio::Term::Literal(rio::Literal::Typed { value, datatype }) => {
                    Term::Literal(Literal::new(value).with_datatype(datatype.iri))
                }
                _ => {
                    skipped += 1;
                    return Ok(());
                }
            };
            graph.add(Triple::new(subject, t.predicate.iri, object));
            Ok(())
        })?;

        if skipped > 0 {
            tracing::warn!("skipped {skipped} statements with blank nodes or quoted triples");
        }

        let mut bindings: Vec<_> = parser.prefixes().iter().collect();
        bindings.sort();
        for (prefix, base) in bindings {
            graph.bind(prefix.as_str(), base.as_str());
        }

        Ok(graph)
    }

    /// Parse from a string.
    pub fn parse(s: &str) -> Result<Graph> {
        Self::read(s.as_bytes())
    }
}

/// Format an IRI, compacting with prefixes if possible.
fn format_iri(iri: &Iri, prefixes: &PrefixMap) -> String {
    prefixes
        .compact(iri.as_str())
        .unwrap_or_else(|| iri.to_string())
}

fn format_term(term: &Term, prefixes: &PrefixMap) -> String {
    match term {
        Term::Iri(iri) => format_iri(iri, prefixes),
        Term::Literal(lit) => lit.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{crm, dcterms, Namespace};

    fn sample() -> Graph {
        let ns = Namespace::new("my", "https://example.org/taylor-project/");
        let mut g = Graph::with_project(&ns);
        let item = ns.term("item_001");
        g.add(Triple::new(&item, rdf::TYPE, Iri::new(crm::E22_MAN_MADE_OBJECT)));
        g.add(Triple::new(&item, dcterms::TITLE, Term::literal("Fearless \"Lyrics\"")));
        g.add(Triple::new(&item, dcterms::CREATOR, Iri::new("http://viaf.org/viaf/88582739")));
        g
    }

    #[test]
    fn test_turtle_output() {
        let output = Turtle::to_string(&sample()).unwrap();
        assert!(output.contains("@prefix crm: <http://www.cidoc-crm.org/cidoc-crm/> ."));
        assert!(output.contains("@prefix my: <https://example.org/taylor-project/> ."));
        assert!(output.contains("my:item_001 a crm:E22_Man-Made_Object ;"));
        assert!(output.contains(r#"dcterms:title "Fearless \"Lyrics\"""#));
        assert!(output.contains("dcterms:creator <http://viaf.org/viaf/88582739> ."));
    }

    #[test]
    fn test_read_back() {
        let original = sample();
        let text = Turtle::to_string(&original).unwrap();
        let parsed = Turtle::parse(&text).unwrap();

        assert_eq!(parsed.len(), original.len());
        for t in original.triples() {
            assert!(parsed.contains(t), "lost {}", t);
        }
        assert!(parsed.prefixes().iter().any(|(p, _)| p == "my"));
    }

    #[test]
    fn test_read_skips_blank_nodes() {
        let g = Turtle::parse("<http://a> <http://p> _:b .\n<http://a> <http://p> \"x\"@en .").unwrap();
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_read_rejects_garbage() {
        assert!(Turtle::parse("<http://a> <http://p> .").is_err());
    }
}
