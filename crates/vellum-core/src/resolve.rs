//! Identity resolution for names found in source records.

use crate::registry::EntityRegistry;
use crate::{Iri, Term};

/// What a raw name (plus optional inline URI) resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRef {
    /// A curated registry node.
    RegistryNode(Iri),
    /// An IRI given inline in the source.
    ExternalUri(Iri),
    /// No identity; keep the text.
    TextLiteral(String),
}

impl ResolvedRef {
    /// The graph term for this reference.
    pub fn into_term(self) -> Term {
        match self {
            Self::RegistryNode(iri) | Self::ExternalUri(iri) => Term::Iri(iri),
            Self::TextLiteral(value) => Term::literal(value),
        }
    }
}

/// Resolves names against the registry.
///
/// Priority: registry name, then an inline URI containing `http` that parses
/// as an absolute IRI, then the raw text.
#[derive(Debug, Clone, Copy)]
pub struct IdentityResolver<'a> {
    registry: &'a EntityRegistry,
}

impl<'a> IdentityResolver<'a> {
    /// Create a resolver over `registry`.
    pub fn new(registry: &'a EntityRegistry) -> Self {
        Self { registry }
    }

    /// The registry being resolved against.
    pub fn registry(&self) -> &'a EntityRegistry {
        self.registry
    }

    /// Resolve `raw_name`, with `raw_uri` as the fallback identity.
    pub fn resolve(&self, raw_name: &str, raw_uri: Option<&str>) -> ResolvedRef {
        if let Some(record) = self.registry.lookup(raw_name) {
            return ResolvedRef::RegistryNode(record.uri.clone());
        }
        match raw_uri.map(str::trim) {
            Some(uri) if uri.contains("http") => match Iri::parse(uri) {
                Ok(iri) => ResolvedRef::ExternalUri(iri),
                Err(e) => {
                    tracing::debug!(name = raw_name, error = %e, "inline URI rejected, kept as text");
                    ResolvedRef::TextLiteral(raw_name.to_string())
                }
            },
            _ => ResolvedRef::TextLiteral(raw_name.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EntityRecord;
    use crate::vocab::foaf;

    fn registry() -> EntityRegistry {
        EntityRegistry::new([EntityRecord::new(
            "Swift, Taylor",
            "https://example.org/p/Taylor_Swift",
            foaf::PERSON,
        )])
        .unwrap()
    }

    #[test]
    fn test_registry_wins_over_inline_uri() {
        let reg = registry();
        let r = IdentityResolver::new(&reg);
        assert_eq!(
            r.resolve("Swift, Taylor", Some("http://viaf.org/viaf/1")),
            ResolvedRef::RegistryNode(Iri::new("https://example.org/p/Taylor_Swift"))
        );
    }

    #[test]
    fn test_inline_uri_wins_over_text() {
        let reg = registry();
        let r = IdentityResolver::new(&reg);
        assert_eq!(
            r.resolve("Big Machine Records", Some(" https://www.wikidata.org/wiki/Q1 ")),
            ResolvedRef::ExternalUri(Iri::new("https://www.wikidata.org/wiki/Q1"))
        );
    }

    #[test]
    fn test_non_http_uri_falls_back_to_text() {
        let reg = registry();
        let r = IdentityResolver::new(&reg);
        assert_eq!(
            r.resolve("Anon", Some("urn:isbn:123")),
            ResolvedRef::TextLiteral("Anon".into())
        );
        assert_eq!(r.resolve("Anon", None), ResolvedRef::TextLiteral("Anon".into()));
        assert_eq!(r.resolve("Anon", Some("")), ResolvedRef::TextLiteral("Anon".into()));
    }

    #[test]
    fn test_malformed_http_uri_falls_back_to_text() {
        let reg = registry();
        let r = IdentityResolver::new(&reg);
        for uri in [
            "http://viaf.org/viaf/88 58",
            "see http://viaf.org/viaf/1",
            "http://example.org/<x>",
        ] {
            assert_eq!(
                r.resolve("Wilson, Lana", Some(uri)),
                ResolvedRef::TextLiteral("Wilson, Lana".into()),
                "{}",
                uri
            );
        }
    }

    #[test]
    fn test_into_term() {
        assert_eq!(
            ResolvedRef::TextLiteral("x".into()).into_term(),
            Term::literal("x")
        );
        assert_eq!(
            ResolvedRef::ExternalUri(Iri::new("http://a")).into_term(),
            Term::Iri(Iri::new("http://a"))
        );
    }
}
