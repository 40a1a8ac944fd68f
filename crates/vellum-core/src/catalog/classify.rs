//! Tabular classifier: one catalog record in, its triples out.

use super::record::CatalogRecord;
use super::rules::{EntityClass, RuleTable};
use crate::config::Anchors;
use crate::resolve::IdentityResolver;
use crate::vocab::{crm, dcterms, foaf, frbroo, owl, rdf, Namespace};
use crate::{Iri, Literal, Triple};

/// Result of classifying one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The record's node.
    pub node: Iri,
    /// The dispatched class.
    pub class: EntityClass,
    /// Base triples followed by class-specific ones.
    pub triples: Vec<Triple>,
}

/// Maps catalog records onto the ontology.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    resolver: IdentityResolver<'a>,
    rules: &'a RuleTable,
    anchors: &'a Anchors,
    project: &'a Namespace,
}

impl<'a> Classifier<'a> {
    /// Create a classifier.
    pub fn new(
        resolver: IdentityResolver<'a>,
        rules: &'a RuleTable,
        anchors: &'a Anchors,
        project: &'a Namespace,
    ) -> Self {
        Self {
            resolver,
            rules,
            anchors,
            project,
        }
    }

    /// Classify a record.
    ///
    /// Title, date, description, and creator triples are always emitted. The
    /// type code then picks at most one class; an unmatched code is logged
    /// and leaves the record with its base triples only.
    pub fn classify(&self, record: &CatalogRecord) -> Classification {
        let node = self.project.term(&record.id);
        let mut triples = self.base_triples(&node, record);

        let class = EntityClass::from_type_code(&record.type_code);
        if let Some(class_iri) = class.class_iri() {
            triples.push(Triple::new(&node, rdf::TYPE, Iri::new(class_iri)));
        }

        let subject = &self.anchors.subject;
        match class {
            EntityClass::Place => {
                if let Some(coverage) = record.coverage_place.as_deref() {
                    if self.rules.known_place(coverage).is_some() {
                        triples.push(Triple::new(&node, crm::P89_FALLS_WITHIN, Literal::new(coverage)));
                    }
                }
            }
            EntityClass::ManMadeObject => {
                if self.rules.is_subject_owned(&record.creator) {
                    triples.push(Triple::new(&node, crm::P51_HAS_FORMER_OR_CURRENT_OWNER, subject));
                }
                if self.rules.is_manuscript(&record.title) {
                    triples.push(Triple::new(&node, frbroo::R17I_WAS_CREATED_BY, subject));
                }
            }
            EntityClass::Work => {
                if let Some(relation) = self.rules.work_relation(&record.title) {
                    triples.push(Triple::new(&node, relation.predicate(), subject));
                }
            }
            EntityClass::Event => {
                triples.push(Triple::new(&node, crm::P11_HAD_PARTICIPANT, subject));
            }
            EntityClass::AttributeAssignment => {
                triples.push(Triple::new(&node, crm::P140_ASSIGNED_ATTRIBUTE_TO, subject));
            }
            EntityClass::Person => {
                if let Some(acquaintance) = self.rules.acquaintance(&record.title) {
                    match self.resolver.registry().lookup(&acquaintance.registry_name) {
                        Some(known) => {
                            triples.push(Triple::new(&node, owl::SAME_AS, &known.uri));
                        }
                        None => tracing::debug!(
                            row = record.row,
                            name = %acquaintance.registry_name,
                            "acquaintance not in registry, no same-as link"
                        ),
                    }
                    triples.push(Triple::new(&node, foaf::KNOWS, subject));
                }
            }
            EntityClass::Unclassified => {
                tracing::warn!(
                    row = record.row,
                    id = %record.id,
                    type_code = %record.type_code,
                    "unrecognised type code, emitting base triples only"
                );
            }
        }

        Classification {
            node,
            class,
            triples,
        }
    }

    fn base_triples(&self, node: &Iri, record: &CatalogRecord) -> Vec<Triple> {
        let creator = self
            .resolver
            .resolve(&record.creator, record.creator_uri.as_deref());
        vec![
            Triple::new(node, dcterms::TITLE, Literal::new(&record.title)),
            Triple::new(node, dcterms::DATE, Literal::new(&record.date)),
            Triple::new(node, dcterms::DESCRIPTION, Literal::new(&record.description)),
            Triple::new(node, dcterms::CREATOR, creator.into_term()),
        ]
    }
}
