//! Markup feature extraction.
//!
//! Independent passes over a TEI document, all anchored on the document
//! node: the writing medium, place/object/time references, and the
//! author's deletions and additions. Elements without the attribute or
//! text a pass needs are skipped quietly; unmarked elements are normal in
//! a transcription.

use super::document::{Document, Element};
use crate::vocab::{crm, dcterms, rdf, rdfs, TEI_NS};
use crate::{Iri, Literal, Triple};

/// Kinds of reference element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// `placeName`, `rs[@type=place]`
    Place,
    /// `objectName`, `rs[@type=object]`
    Object,
    /// `term[@subtype=time]`, `date[@ref]`, `rs[@type=time]`
    Time,
    /// Any other `rs[@ref]`: linked, but not classified or labelled.
    Other,
}

impl ReferenceKind {
    /// Passes run in this order.
    pub const ALL: [ReferenceKind; 4] = [Self::Place, Self::Object, Self::Time, Self::Other];

    /// Which kind an element is, if any.
    pub fn of(element: &Element) -> Option<Self> {
        if element.namespace.as_deref() != Some(TEI_NS) {
            return None;
        }
        match element.name.as_str() {
            "placeName" => Some(Self::Place),
            "objectName" => Some(Self::Object),
            "term" if is_time(element.attr("subtype")) || is_time(element.attr("type")) => {
                Some(Self::Time)
            }
            "date" => Some(Self::Time),
            "rs" => Some(match element.attr("type").map(str::trim) {
                Some("place") => Self::Place,
                Some("object") => Self::Object,
                Some("time") => Self::Time,
                _ => Self::Other,
            }),
            _ => None,
        }
    }

    /// Class asserted for the referenced IRI.
    pub fn class_iri(self) -> Option<&'static str> {
        match self {
            Self::Place => Some(crm::E53_PLACE),
            Self::Object => Some(crm::E22_MAN_MADE_OBJECT),
            Self::Time => Some(crm::E52_TIME_SPAN),
            Self::Other => None,
        }
    }

    /// Whether the element's text becomes the referenced node's label.
    pub fn labels_target(self) -> bool {
        matches!(self, Self::Place | Self::Object)
    }
}

fn is_time(value: Option<&str>) -> bool {
    value.map(str::trim) == Some("time")
}

/// Compositional modifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modification {
    /// `<del>`
    Deletion,
    /// `<add>`
    Addition,
}

impl Modification {
    /// Element local name.
    pub fn element_name(self) -> &'static str {
        match self {
            Self::Deletion => "del",
            Self::Addition => "add",
        }
    }

    /// Segment used when minting feature node ids.
    fn slug(self) -> &'static str {
        match self {
            Self::Deletion => "deletion",
            Self::Addition => "addition",
        }
    }

    fn label(self, text: &str) -> String {
        match self {
            Self::Deletion => format!("Deletion of '{}'", text),
            Self::Addition => format!("Addition of '{}'", text),
        }
    }

    fn comment(self, element: &Element) -> String {
        match self {
            Self::Deletion => "Author crossed out this text during composition.".to_string(),
            Self::Addition => format!(
                "Author added this text during composition (placement: {}).",
                element.attr_non_empty("place").unwrap_or("unknown")
            ),
        }
    }
}

/// Counts from one extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Whether a medium was found.
    pub medium: bool,
    /// Reference elements linked.
    pub references: usize,
    /// Deletion feature nodes minted.
    pub deletions: usize,
    /// Addition feature nodes minted.
    pub additions: usize,
}

/// Triples and counts from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Emitted triples in pass order.
    pub triples: Vec<Triple>,
    /// Counts.
    pub stats: ExtractionStats,
}

/// Run every pass over `document`, anchoring on `anchor`.
pub fn extract(document: &Document, anchor: &Iri) -> Extraction {
    let mut out = Extraction::default();

    out.stats.medium = medium_pass(document, anchor, &mut out.triples);
    for kind in ReferenceKind::ALL {
        out.stats.references += reference_pass(document, anchor, kind, &mut out.triples);
    }
    out.stats.deletions = modification_pass(document, anchor, Modification::Deletion, &mut out.triples);
    out.stats.additions = modification_pass(document, anchor, Modification::Addition, &mut out.triples);

    tracing::debug!(
        references = out.stats.references,
        deletions = out.stats.deletions,
        additions = out.stats.additions,
        "extracted manuscript features"
    );
    out
}

/// The writing medium: the first `material`, else the first `support`.
pub fn medium_pass(document: &Document, anchor: &Iri, out: &mut Vec<Triple>) -> bool {
    let medium = ["material", "support"].iter().find_map(|name| {
        document
            .elements()
            .filter(|e| e.is(TEI_NS, name))
            .map(Element::text)
            .find(|t| !t.is_empty())
    });

    let Some(medium) = medium else {
        return false;
    };
    out.push(Triple::new(
        anchor,
        crm::P3_HAS_NOTE,
        Literal::new(format!("Written on: {}", medium)),
    ));
    out.push(Triple::new(anchor, dcterms::MEDIUM, Literal::new(medium)));
    true
}

/// Link every `kind` element whose `@ref` is an absolute IRI. Returns how
/// many were linked.
pub fn reference_pass(
    document: &Document,
    anchor: &Iri,
    kind: ReferenceKind,
    out: &mut Vec<Triple>,
) -> usize {
    let mut linked = 0;
    for element in document.elements().filter(|e| ReferenceKind::of(e) == Some(kind)) {
        let Some(target) = element.attr_non_empty("ref") else {
            tracing::trace!(element = %element.name, "no @ref, skipped");
            continue;
        };
        let target = match Iri::parse(target) {
            Ok(target) => target,
            Err(e) => {
                tracing::trace!(element = %element.name, error = %e, "unusable @ref, skipped");
                continue;
            }
        };

        out.push(Triple::new(anchor, crm::P67_REFERS_TO, &target));
        if let Some(class) = kind.class_iri() {
            out.push(Triple::new(&target, rdf::TYPE, Iri::new(class)));
        }
        if kind.labels_target() {
            let text = element.text();
            if !text.is_empty() {
                out.push(Triple::new(&target, rdfs::LABEL, Literal::new(text)));
            }
        }
        linked += 1;
    }
    linked
}

/// Mint one feature node per non-empty `kind` element, numbered from 1 in
/// document order. Returns how many were minted.
pub fn modification_pass(
    document: &Document,
    anchor: &Iri,
    kind: Modification,
    out: &mut Vec<Triple>,
) -> usize {
    let mut count = 0;
    for element in document.elements().filter(|e| e.is(TEI_NS, kind.element_name())) {
        let text = element.text();
        if text.is_empty() {
            tracing::trace!(element = kind.element_name(), "empty, skipped");
            continue;
        }
        count += 1;

        let feature = feature_node(anchor, kind, count);
        out.push(Triple::new(anchor, crm::P56_BEARS_FEATURE, &feature));
        out.push(Triple::new(&feature, rdf::TYPE, Iri::new(crm::E25_MAN_MADE_FEATURE)));
        out.push(Triple::new(&feature, rdfs::LABEL, Literal::new(kind.label(&text))));
        out.push(Triple::new(&feature, rdfs::COMMENT, Literal::new(kind.comment(element))));
    }
    count
}

/// `<anchor>_deletion_3`
pub fn feature_node(anchor: &Iri, kind: Modification, n: usize) -> Iri {
    Iri::new(format!("{}_{}_{}", anchor.as_str(), kind.slug(), n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Term;

    fn anchor() -> Iri {
        Iri::new("https://example.org/taylor-project/item_001")
    }

    fn tei(body: &str) -> Document {
        Document::parse(&format!(
            r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><teiHeader/><text><body>{}</body></text></TEI>"#,
            body
        ))
        .unwrap()
    }

    fn has(out: &[Triple], s: &Iri, p: &str, o: impl Into<Term>) -> bool {
        out.contains(&Triple::new(s, p, o))
    }

    #[test]
    fn test_reference_kinds() {
        let doc = tei(
            r#"<placeName ref="http://wd/Q1">New York</placeName>
               <objectName ref="http://wd/Q2">scarf</objectName>
               <term subtype="time" ref="http://wd/Q3">midnight</term>
               <rs ref="http://wd/Q4">someone</rs>"#,
        );
        let out = extract(&doc, &anchor());
        let t = &out.triples;

        let q1 = Iri::new("http://wd/Q1");
        assert!(has(t, &anchor(), crm::P67_REFERS_TO, &q1));
        assert!(has(t, &q1, rdf::TYPE, Iri::new(crm::E53_PLACE)));
        assert!(has(t, &q1, rdfs::LABEL, Literal::new("New York")));

        let q2 = Iri::new("http://wd/Q2");
        assert!(has(t, &q2, rdf::TYPE, Iri::new(crm::E22_MAN_MADE_OBJECT)));
        assert!(has(t, &q2, rdfs::LABEL, Literal::new("scarf")));

        // Time references are typed but not labelled.
        let q3 = Iri::new("http://wd/Q3");
        assert!(has(t, &q3, rdf::TYPE, Iri::new(crm::E52_TIME_SPAN)));
        assert!(!t.iter().any(|x| x.subject == q3 && x.predicate.as_str() == rdfs::LABEL));

        // Untyped rs: linked only.
        let q4 = Iri::new("http://wd/Q4");
        assert!(has(t, &anchor(), crm::P67_REFERS_TO, &q4));
        assert!(!t.iter().any(|x| x.subject == q4));

        assert_eq!(out.stats.references, 4);
        assert_eq!(t.len(), 3 + 3 + 2 + 1);
    }

    #[test]
    fn test_reference_without_ref_skipped() {
        let doc = tei(r#"<placeName>Somewhere</placeName><placeName ref="  ">Blank</placeName>"#);
        let out = extract(&doc, &anchor());
        assert!(out.triples.is_empty());
        assert_eq!(out.stats.references, 0);
    }

    #[test]
    fn test_reference_with_malformed_ref_skipped() {
        let doc = tei(
            r#"<placeName ref="https://en.wikipedia.org/wiki/New York">NYC</placeName>
               <placeName ref="Q60">town</placeName>
               <placeName ref="http://www.wikidata.org/entity/Q60">town</placeName>"#,
        );
        let out = extract(&doc, &anchor());
        assert_eq!(out.stats.references, 1);
        assert!(out
            .triples
            .iter()
            .all(|t| !t.to_string().contains("New York")));
    }

    #[test]
    fn test_term_without_time_subtype_ignored() {
        let doc = tei(r#"<term ref="http://wd/Q9">lexeme</term>"#);
        assert!(extract(&doc, &anchor()).triples.is_empty());
    }

    #[test]
    fn test_foreign_namespace_ignored() {
        let doc = tei(r#"<x:placeName xmlns:x="urn:other" ref="http://wd/Q1">Nowhere</x:placeName>"#);
        assert!(extract(&doc, &anchor()).triples.is_empty());
    }

    #[test]
    fn test_deletion_scenario() {
        let doc = tei("<del>forever</del>");
        let out = extract(&doc, &anchor());
        let f = feature_node(&anchor(), Modification::Deletion, 1);

        assert_eq!(f.as_str(), "https://example.org/taylor-project/item_001_deletion_1");
        assert_eq!(
            out.triples,
            vec![
                Triple::new(&anchor(), crm::P56_BEARS_FEATURE, &f),
                Triple::new(&f, rdf::TYPE, Iri::new(crm::E25_MAN_MADE_FEATURE)),
                Triple::new(&f, rdfs::LABEL, Literal::new("Deletion of 'forever'")),
                Triple::new(
                    &f,
                    rdfs::COMMENT,
                    Literal::new("Author crossed out this text during composition.")
                ),
            ]
        );
    }

    #[test]
    fn test_addition_placement() {
        let doc = tei(r#"<add place="margin">say</add><add>you'll</add>"#);
        let out = extract(&doc, &anchor());
        let a1 = feature_node(&anchor(), Modification::Addition, 1);
        let a2 = feature_node(&anchor(), Modification::Addition, 2);

        assert!(has(
            &out.triples,
            &a1,
            rdfs::COMMENT,
            Literal::new("Author added this text during composition (placement: margin).")
        ));
        assert!(has(&out.triples, &a2, rdfs::LABEL, Literal::new("Addition of 'you'll'")));
        assert!(has(
            &out.triples,
            &a2,
            rdfs::COMMENT,
            Literal::new("Author added this text during composition (placement: unknown).")
        ));
    }

    #[test]
    fn test_independent_numbering_skips_empty() {
        let doc = tei(
            "<del>a</del><add>x</add><del> </del><del>b</del><add>y</add><del>c</del>",
        );
        let out = extract(&doc, &anchor());
        assert_eq!(out.stats.deletions, 3);
        assert_eq!(out.stats.additions, 2);

        let labels: Vec<_> = out
            .triples
            .iter()
            .filter(|t| t.predicate.as_str() == rdfs::LABEL)
            .map(|t| (t.subject.local_name().to_string(), t.object.clone()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("item_001_deletion_1".to_string(), Term::literal("Deletion of 'a'")),
                ("item_001_deletion_2".to_string(), Term::literal("Deletion of 'b'")),
                ("item_001_deletion_3".to_string(), Term::literal("Deletion of 'c'")),
                ("item_001_addition_1".to_string(), Term::literal("Addition of 'x'")),
                ("item_001_addition_2".to_string(), Term::literal("Addition of 'y'")),
            ]
        );
    }

    #[test]
    fn test_medium() {
        let doc = Document::parse(
            r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><teiHeader><fileDesc><sourceDesc><msDesc>
               <physDesc><objectDesc><supportDesc><support>Notebook, <material>paper</material></support>
               </supportDesc></objectDesc></physDesc></msDesc></sourceDesc></fileDesc></teiHeader>
               <text><body/></text></TEI>"#,
        )
        .unwrap();
        let out = extract(&doc, &anchor());
        assert!(out.stats.medium);
        assert_eq!(
            out.triples,
            vec![
                Triple::new(&anchor(), crm::P3_HAS_NOTE, Literal::new("Written on: paper")),
                Triple::new(&anchor(), dcterms::MEDIUM, Literal::new("paper")),
            ]
        );
    }

    #[test]
    fn test_medium_falls_back_to_support() {
        let doc = tei("<support>napkin</support>");
        let out = extract(&doc, &anchor());
        assert!(has(&out.triples, &anchor(), dcterms::MEDIUM, Literal::new("napkin")));
    }

    #[test]
    fn test_passes_are_idempotent() {
        let doc = tei(r#"<del>x</del><placeName ref="http://wd/Q1">Y</placeName>"#);
        assert_eq!(extract(&doc, &anchor()), extract(&doc, &anchor()));
    }
}
