//! In-memory XML element tree with resolved namespaces.
//!
//! The whole document is read up front; extraction passes then walk the
//! tree as often as they like.

use crate::{Error, Result};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use std::path::Path;

/// Empty line, page and column breaks.
const MILESTONES: [&str; 3] = ["lb", "pb", "cb"];

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Character data (entities already unescaped).
    Text(String),
}

/// An element with its namespace resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Namespace IRI, if the element is in one.
    pub namespace: Option<String>,
    /// Local name.
    pub name: String,
    /// Attributes by local name, in document order. Namespace declarations are dropped.
    pub attributes: Vec<(String, String)>,
    /// Children in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// True if this element is `{namespace}name`.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value, trimmed, or `None` if absent or blank.
    pub fn attr_non_empty(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// All descendant text, with runs of whitespace collapsed to one space.
    ///
    /// Inline markup joins its neighbours as written, so `for<hi>ev</hi>er`
    /// reads `forever`. An empty `<lb/>`, `<pb/>` or `<cb/>` counts as a space
    /// unless it carries `break="no"`.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        self.collect_text(&mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                // Milestones stand for whitespace unless they sit mid-word.
                Node::Element(e) if e.is_milestone() => {
                    if e.attr("break") != Some("no") {
                        out.push(' ');
                    }
                }
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    fn is_milestone(&self) -> bool {
        self.children.is_empty() && MILESTONES.contains(&self.name.as_str())
    }

    /// Child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// This element and every element below it, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Pre-order element iterator.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let before = self.stack.len();
        self.stack.extend(next.child_elements());
        self.stack[before..].reverse();
        Some(next)
    }
}

/// A parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Read and parse a file. A missing file or bad XML is fatal.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a document from a string.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let (ns, event) = reader.read_resolved_event()?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let mut attributes = Vec::new();
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.as_namespace_binding().is_some() {
                            continue;
                        }
                        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
                        attributes.push((key, attr.unescape_value()?.into_owned()));
                    }
                    let element = Element {
                        namespace: namespace_of(&ns),
                        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                        attributes,
                        children: Vec::new(),
                    };
                    if matches!(event, Event::Start(_)) {
                        stack.push(element);
                    } else {
                        attach(&mut stack, &mut root, element)?;
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::InvalidDocument("unbalanced end tag".into()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(ref t) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(t.unescape()?.into_owned()));
                    }
                }
                Event::CData(t) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                        parent.children.push(Node::Text(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::InvalidDocument(format!(
                "unclosed element <{}>",
                open.name
            )));
        }
        let root = root.ok_or_else(|| Error::InvalidDocument("no root element".into()))?;
        Ok(Self { root })
    }

    /// The root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Every element in document order.
    pub fn elements(&self) -> Descendants<'_> {
        self.root.descendants()
    }

    /// The first element `{namespace}name` in document order.
    pub fn find_first(&self, namespace: &str, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(namespace, name))
    }
}

fn namespace_of(ns: &ResolveResult<'_>) -> Option<String> {
    match ns {
        ResolveResult::Bound(Namespace(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Close `element`: hang it on its parent, or make it the root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(Error::InvalidDocument("multiple root elements".into())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::TEI_NS;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0" xmlns:xlink="http://www.w3.org/1999/xlink">
  <text>
    <body>
      <p>Standing in a <placeName ref="http://www.wikidata.org/entity/Q60">nice
        dress</placeName> &amp; <del>forever</del><add place="above">for <hi>now</hi></add></p>
      <other:x xmlns:other="urn:other">skip</other:x>
    </body>
  </text>
</TEI>"#;

    #[test]
    fn test_parse_namespaces() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert!(doc.root().is(TEI_NS, "TEI"));
        let other = doc.elements().find(|e| e.name == "x").unwrap();
        assert_eq!(other.namespace.as_deref(), Some("urn:other"));
        // Namespace declarations are not attributes.
        assert!(doc.root().attributes.is_empty());
    }

    #[test]
    fn test_text_collapses_whitespace() {
        let doc = Document::parse(SAMPLE).unwrap();
        let place = doc.find_first(TEI_NS, "placeName").unwrap();
        assert_eq!(place.text(), "nice dress");
        assert_eq!(place.attr("ref"), Some("http://www.wikidata.org/entity/Q60"));

        let add = doc.find_first(TEI_NS, "add").unwrap();
        assert_eq!(add.text(), "for now");
        assert_eq!(add.attr_non_empty("place"), Some("above"));
    }

    #[test]
    fn test_document_order() {
        let doc = Document::parse(SAMPLE).unwrap();
        let names: Vec<_> = doc.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["TEI", "text", "body", "p", "placeName", "del", "add", "hi", "x"]
        );
    }

    #[test]
    fn test_text_keeps_words_across_inline_markup() {
        let doc = Document::parse(
            r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><del>for<hi>ev</hi>er</del><l>line<lb/>break and hy<lb break="no"/>phen</l></TEI>"#,
        )
        .unwrap();
        let del = doc.find_first(TEI_NS, "del").unwrap();
        assert_eq!(del.text(), "forever");
        let l = doc.find_first(TEI_NS, "l").unwrap();
        assert_eq!(l.text(), "line break and hyphen");
    }

    #[test]
    fn test_entities_unescaped() {
        let doc = Document::parse(SAMPLE).unwrap();
        let p = doc.find_first(TEI_NS, "p").unwrap();
        assert!(p.text().contains("& forever"));
    }

    #[test]
    fn test_malformed_is_error() {
        assert!(Document::parse("<TEI><p></TEI>").is_err());
        assert!(Document::parse("<TEI>").is_err());
        assert!(Document::parse("").is_err());
        assert!(Document::parse("<a/><b/>").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Document::from_path("/definitely/not/here.xml"),
            Err(Error::Io(_))
        ));
    }
}
