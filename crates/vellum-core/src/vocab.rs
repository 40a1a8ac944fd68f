//! Vocabulary terms and the prefix table bound on output.
//!
//! The graph mixes CIDOC-CRM (events, places, objects, features), FRBRoo
//! (works and their creation), FOAF (people), Dublin Core terms (catalog
//! metadata), and OWL/RDFS (identity and labels). Project-local nodes live
//! under a configurable namespace, see [`Namespace`].

use crate::Iri;

macro_rules! vocab {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $ns:literal { $($konst:ident = $local:literal),* $(,)? }) => {
        $(#[$meta])*
        pub mod $name {
            /// Conventional prefix.
            pub const PREFIX: &str = $prefix;
            /// Namespace IRI.
            pub const NS: &str = $ns;
            $(
                #[allow(missing_docs)]
                pub const $konst: &str = concat!($ns, $local);
            )*
        }
    };
}

vocab!(
    /// CIDOC Conceptual Reference Model.
    crm, "crm", "http://www.cidoc-crm.org/cidoc-crm/" {
        E5_EVENT = "E5_Event",
        E13_ATTRIBUTE_ASSIGNMENT = "E13_Attribute_Assignment",
        E22_MAN_MADE_OBJECT = "E22_Man-Made_Object",
        E25_MAN_MADE_FEATURE = "E25_Man-Made_Feature",
        E52_TIME_SPAN = "E52_Time-Span",
        E53_PLACE = "E53_Place",
        P3_HAS_NOTE = "P3_has_note",
        P11_HAD_PARTICIPANT = "P11_had_participant",
        P51_HAS_FORMER_OR_CURRENT_OWNER = "P51_has_former_or_current_owner",
        P56_BEARS_FEATURE = "P56_bears_feature",
        P67_REFERS_TO = "P67_refers_to",
        P89_FALLS_WITHIN = "P89_falls_within",
        P129_IS_ABOUT = "P129_is_about",
        P140_ASSIGNED_ATTRIBUTE_TO = "P140_assigned_attribute_to",
    }
);

vocab!(
    /// FRBR object-oriented.
    frbroo, "frbroo", "http://iflastandards.info/ns/fr/frbr/frbroo/" {
        F1_WORK = "F1_Work",
        R17I_WAS_CREATED_BY = "R17i_was_created_by",
    }
);

vocab!(
    /// Friend of a Friend.
    foaf, "foaf", "http://xmlns.com/foaf/0.1/" {
        PERSON = "Person",
        NAME = "name",
        KNOWS = "knows",
        DEPICTS = "depicts",
    }
);

vocab!(
    /// Dublin Core metadata terms.
    dcterms, "dcterms", "http://purl.org/dc/terms/" {
        TITLE = "title",
        DATE = "date",
        DESCRIPTION = "description",
        CREATOR = "creator",
        MEDIUM = "medium",
    }
);

vocab!(
    /// OWL (same-as links).
    owl, "owl", "http://www.w3.org/2002/07/owl#" {
        SAME_AS = "sameAs",
    }
);

vocab!(
    /// RDF Schema (labels, comments).
    rdfs, "rdfs", "http://www.w3.org/2000/01/rdf-schema#" {
        LABEL = "label",
        COMMENT = "comment",
    }
);

vocab!(
    /// RDF core.
    rdf, "rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#" {
        TYPE = "type",
    }
);

/// TEI P5 element namespace.
pub const TEI_NS: &str = "http://www.tei-c.org/ns/1.0";

/// A prefix bound to a base IRI; mints local nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    prefix: String,
    base: String,
}

impl Namespace {
    /// Create a namespace.
    pub fn new(prefix: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            base: base.into(),
        }
    }

    /// The prefix label.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The base IRI.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Mint `base + local`, percent-encoding anything in `local` outside
    /// the unreserved set so row ids with spaces still give a valid IRI.
    pub fn term(&self, local: &str) -> Iri {
        Iri::new(format!("{}{}", self.base, urlencoding::encode(local)))
    }
}

/// Ordered prefix table written at the top of a Turtle document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    entries: Vec<(String, String)>,
}

impl PrefixMap {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `base`, replacing an earlier binding of the same prefix.
    pub fn bind(&mut self, prefix: impl Into<String>, base: impl Into<String>) {
        let prefix = prefix.into();
        let base = base.into();
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = base,
            None => self.entries.push((prefix, base)),
        }
    }

    /// Iterate `(prefix, base)` in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, b)| (p.as_str(), b.as_str()))
    }

    /// Number of bound prefixes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compact an IRI to `prefix:local` if a binding matches.
    ///
    /// The longest matching base wins so nested namespaces compact correctly.
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.entries
            .iter()
            .filter(|(_, base)| iri.starts_with(base.as_str()))
            .max_by_key(|(_, base)| base.len())
            .and_then(|(prefix, base)| {
                let local = &iri[base.len()..];
                is_valid_local_name(local).then(|| format!("{}:{}", prefix, local))
            })
    }
}

/// The prefixes every serialized graph carries: the ontology prefixes,
/// the metadata/identity vocabularies, and the project namespace.
pub fn default_prefixes(project: &Namespace) -> PrefixMap {
    let mut m = PrefixMap::new();
    m.bind(crm::PREFIX, crm::NS);
    m.bind(frbroo::PREFIX, frbroo::NS);
    m.bind(foaf::PREFIX, foaf::NS);
    m.bind(dcterms::PREFIX, dcterms::NS);
    m.bind(owl::PREFIX, owl::NS);
    m.bind(rdfs::PREFIX, rdfs::NS);
    m.bind(rdf::PREFIX, rdf::NS);
    m.bind(project.prefix(), project.base());
    m
}

/// Resolve `prefix:local` against the fixed vocabularies and the project
/// namespace. Absolute IRIs pass through when they parse.
pub fn expand_curie(value: &str, project: &Namespace) -> Option<Iri> {
    if value.contains("://") {
        return Iri::parse(value).ok();
    }
    let (prefix, local) = value.split_once(':')?;
    default_prefixes(project)
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, base)| Iri::new(format!("{}{}", base, local)))
}

/// Check if a string is a valid Turtle local name.
///
/// Conservative subset of PN_LOCAL: no leading `-`, no dots.
fn is_valid_local_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphanumeric() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Namespace {
        Namespace::new("my", "https://example.org/taylor-project/")
    }

    #[test]
    fn test_vocab_constants() {
        assert_eq!(crm::E53_PLACE, "http://www.cidoc-crm.org/cidoc-crm/E53_Place");
        assert_eq!(frbroo::F1_WORK, "http://iflastandards.info/ns/fr/frbr/frbroo/F1_Work");
        assert_eq!(foaf::KNOWS, "http://xmlns.com/foaf/0.1/knows");
    }

    #[test]
    fn test_compact() {
        let m = default_prefixes(&project());
        assert_eq!(m.compact(crm::E22_MAN_MADE_OBJECT).as_deref(), Some("crm:E22_Man-Made_Object"));
        assert_eq!(
            m.compact("https://example.org/taylor-project/item_001").as_deref(),
            Some("my:item_001")
        );
        assert_eq!(m.compact("http://viaf.org/viaf/88582739"), None);
        // Dots are not representable in our local-name subset.
        assert_eq!(m.compact("https://example.org/taylor-project/a.b"), None);
    }

    #[test]
    fn test_default_prefixes_cover_all_vocabularies() {
        let m = default_prefixes(&project());
        let prefixes: Vec<_> = m.iter().map(|(p, _)| p).collect();
        for p in ["crm", "frbroo", "foaf", "dcterms", "owl", "rdfs", "my"] {
            assert!(prefixes.contains(&p), "missing prefix {}", p);
        }
    }

    #[test]
    fn test_rebind_replaces() {
        let mut m = PrefixMap::new();
        m.bind("ex", "http://a/");
        m.bind("ex", "http://b/");
        assert_eq!(m.len(), 1);
        assert_eq!(m.compact("http://b/x").as_deref(), Some("ex:x"));
    }

    #[test]
    fn test_term_encodes_local() {
        let ns = project();
        assert_eq!(
            ns.term("Taylor_Swift").as_str(),
            "https://example.org/taylor-project/Taylor_Swift"
        );
        let spaced = ns.term("item 010");
        assert_eq!(spaced.as_str(), "https://example.org/taylor-project/item%20010");
        assert!(Iri::parse(spaced.as_str()).is_ok());
        assert!(Iri::parse(ns.term("a<b>{c}\"d").as_str()).is_ok());
        // Percent escapes fall outside the local-name subset.
        assert_eq!(default_prefixes(&ns).compact(spaced.as_str()), None);
    }

    #[test]
    fn test_expand_curie() {
        let ns = project();
        assert_eq!(expand_curie("foaf:Person", &ns), Some(Iri::new(foaf::PERSON)));
        assert_eq!(
            expand_curie("my:Taylor_Swift", &ns),
            Some(Iri::new("https://example.org/taylor-project/Taylor_Swift"))
        );
        assert_eq!(
            expand_curie("http://viaf.org/viaf/1", &ns),
            Some(Iri::new("http://viaf.org/viaf/1"))
        );
        assert_eq!(expand_curie("http://viaf.org/viaf/1 2", &ns), None);
        assert_eq!(expand_curie("nope:x", &ns), None);
        assert_eq!(expand_curie("bare", &ns), None);
    }
}
