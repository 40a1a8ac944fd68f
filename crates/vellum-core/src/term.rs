//! RDF terms: IRIs and literals.

use crate::{Error, Result};
use std::fmt;

/// An absolute IRI naming a graph node or predicate.
///
/// Nodes are referenced by value; two `Iri`s are the same node exactly
/// when their strings are byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    /// Create a new IRI.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Create an IRI from untrusted input, rejecting anything that is not
    /// an absolute RFC 3987 IRI (spaces, `<`, `>`, `"`, `{`, `}` and so on).
    pub fn parse(iri: impl Into<String>) -> Result<Self> {
        let iri = iri.into();
        if let Err(e) = oxiri::Iri::parse(iri.as_str()) {
            return Err(Error::InvalidIri(format!("`{}`: {}", iri, e)));
        }
        Ok(Self(iri))
    }

    /// Get the IRI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after the last `/` or `#`.
    pub fn local_name(&self) -> &str {
        self.0
            .rsplit(|c| c == '/' || c == '#')
            .next()
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&Iri> for Iri {
    fn from(iri: &Iri) -> Self {
        iri.clone()
    }
}

/// A literal value, optionally language-tagged or typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    /// Lexical form.
    pub value: String,

    /// Language tag (e.g. `en`).
    pub language: Option<String>,

    /// Datatype IRI for typed literals.
    pub datatype: Option<Iri>,
}

impl Literal {
    /// A plain string literal.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Set the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the datatype.
    pub fn with_datatype(mut self, datatype: impl Into<Iri>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_literal(&self.value))?;
        if let Some(ref lang) = self.language {
            write!(f, "@{}", lang)
        } else if let Some(ref dt) = self.datatype {
            write!(f, "^^{}", dt)
        } else {
            Ok(())
        }
    }
}

/// Escape a string for use inside a double-quoted Turtle/N-Triples literal.
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// The object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// A node.
    Iri(Iri),
    /// A value.
    Literal(Literal),
}

impl Term {
    /// Plain string literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(Literal::new(value))
    }

    /// The IRI, if this term is a node.
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Literal(_) => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => iri.fmt(f),
            Self::Literal(lit) => lit.fmt(f),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<&Iri> for Term {
    fn from(iri: &Iri) -> Self {
        Self::Iri(iri.clone())
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}
