//! Type-code dispatch and the token rule tables.
//!
//! Every free-text match the classifier performs lives here as data: the
//! ordered marker table that maps a type code to an [`EntityClass`], and the
//! [`RuleTable`] of title/name tokens loaded from configuration.

use crate::vocab::{crm, foaf, frbroo};
use serde::Deserialize;

/// The class a catalog record is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    /// `crm:E53_Place`
    Place,
    /// `crm:E22_Man-Made_Object`
    ManMadeObject,
    /// `frbroo:F1_Work`
    Work,
    /// `crm:E5_Event`
    Event,
    /// `crm:E13_Attribute_Assignment`
    AttributeAssignment,
    /// `foaf:Person`
    Person,
    /// No marker matched; the record keeps only its base triples.
    Unclassified,
}

/// Markers per class, in dispatch precedence. First hit wins.
const MARKERS: [(EntityClass, &[&str]); 6] = [
    (EntityClass::Place, &["E53_Place"]),
    (
        EntityClass::ManMadeObject,
        &["E22_Man-Made_Object", "E22_Man_Made_Object"],
    ),
    (EntityClass::Work, &["F1_Work"]),
    (EntityClass::Event, &["E5_Event"]),
    (EntityClass::AttributeAssignment, &["E13_Attribute_Assignment"]),
    (EntityClass::Person, &["Person"]),
];

impl EntityClass {
    /// The six dispatchable classes in precedence order.
    pub const ALL: [EntityClass; 6] = [
        Self::Place,
        Self::ManMadeObject,
        Self::Work,
        Self::Event,
        Self::AttributeAssignment,
        Self::Person,
    ];

    /// Dispatch a free-text type code.
    pub fn from_type_code(code: &str) -> Self {
        MARKERS
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| code.contains(m)))
            .map_or(Self::Unclassified, |(class, _)| *class)
    }

    /// The canonical marker for this class (what a well-formed type code contains).
    pub fn marker(self) -> Option<&'static str> {
        MARKERS
            .iter()
            .find(|(class, _)| *class == self)
            .map(|(_, markers)| markers[0])
    }

    /// The ontology class IRI.
    pub fn class_iri(self) -> Option<&'static str> {
        match self {
            Self::Place => Some(crm::E53_PLACE),
            Self::ManMadeObject => Some(crm::E22_MAN_MADE_OBJECT),
            Self::Work => Some(frbroo::F1_WORK),
            Self::Event => Some(crm::E5_EVENT),
            Self::AttributeAssignment => Some(crm::E13_ATTRIBUTE_ASSIGNMENT),
            Self::Person => Some(foaf::PERSON),
            Self::Unclassified => None,
        }
    }
}

/// How a work relates to the subject when its title matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkRelation {
    /// `crm:P129_is_about`
    IsAbout,
    /// `foaf:depicts`
    Depicts,
}

impl WorkRelation {
    /// Predicate IRI.
    pub fn predicate(self) -> &'static str {
        match self {
            Self::IsAbout => crm::P129_IS_ABOUT,
            Self::Depicts => foaf::DEPICTS,
        }
    }
}

/// Title token → work relation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkTitleRule {
    /// Substring looked for in the title.
    pub token: String,
    /// Relation to add on a hit.
    pub relation: WorkRelation,
}

/// First name → registry entry of a person the subject knows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Acquaintance {
    /// Substring looked for in a person record's title.
    pub first_name: String,
    /// Registry canonical name to link as same-as.
    pub registry_name: String,
}

/// Curated token tables, in the order they are checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleTable {
    /// An object whose creator contains this is owned by the subject.
    pub subject_surname: String,
    /// An object whose title contains one of these is a manuscript the subject created.
    pub manuscript_markers: Vec<String>,
    /// Place names recognised in `coverage_place`.
    pub known_places: Vec<String>,
    /// Work title rules; first hit wins.
    pub work_titles: Vec<WorkTitleRule>,
    /// Person title rules; first hit wins.
    pub acquaintances: Vec<Acquaintance>,
}

impl RuleTable {
    /// The first known place contained in `coverage`.
    pub fn known_place(&self, coverage: &str) -> Option<&str> {
        self.known_places
            .iter()
            .find(|p| !p.is_empty() && coverage.contains(p.as_str()))
            .map(String::as_str)
    }

    /// True if `creator` names the subject.
    pub fn is_subject_owned(&self, creator: &str) -> bool {
        !self.subject_surname.is_empty() && creator.contains(&self.subject_surname)
    }

    /// True if `title` marks a manuscript.
    pub fn is_manuscript(&self, title: &str) -> bool {
        self.manuscript_markers
            .iter()
            .any(|m| !m.is_empty() && title.contains(m.as_str()))
    }

    /// The relation of the first work rule whose token is in `title`.
    pub fn work_relation(&self, title: &str) -> Option<WorkRelation> {
        self.work_titles
            .iter()
            .find(|r| !r.token.is_empty() && title.contains(r.token.as_str()))
            .map(|r| r.relation)
    }

    /// The first acquaintance whose first name is in `title`.
    pub fn acquaintance(&self, title: &str) -> Option<&Acquaintance> {
        self.acquaintances
            .iter()
            .find(|a| !a.first_name.is_empty() && title.contains(a.first_name.as_str()))
    }
}
