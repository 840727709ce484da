//! The ontology store: an append-only axiom set with signature queries.
//!
//! Every assembler in the engine talks to an [`OntologyStore`]; the engine
//! never reaches into a concrete store. [`MemoryStore`] is the default
//! implementation and the one the build driver uses.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Write;

use crate::model::{
    AnnotationProperty, Axiom, ClassExpression, Entity, EntityKind, OntologyHeader,
};
use crate::serializer::{self, Format};

/// Query and append interface over an ontology.
///
/// Adding an axiom that is already present is a no-op. Entities enter the
/// signature when a declaration or a logical axiom mentions them; label and
/// other annotation assertions do not make an entity part of the signature.
pub trait OntologyStore {
    /// The ontology header (IRI, version, label).
    fn header(&self) -> &OntologyHeader;

    /// All axioms, in insertion order.
    fn axioms(&self) -> &[Axiom];

    /// Adds an axiom. Returns `true` when it was not already present.
    fn add_axiom(&mut self, axiom: Axiom) -> bool;

    /// Returns `true` when the entity is in the ontology signature.
    fn contains_in_signature(&self, entity: &Entity) -> bool;

    /// Names of all entities of the given kind in the signature, sorted.
    fn signature(&self, kind: EntityKind) -> Vec<String>;

    /// Declares an entity. Returns `true` when the declaration is new.
    fn declare(&mut self, entity: Entity) -> bool {
        self.add_axiom(Axiom::Declaration(entity))
    }

    /// Adds every axiom from `axioms`, returning how many were new.
    fn add_axioms<I>(&mut self, axioms: I) -> usize
    where
        I: IntoIterator<Item = Axiom>,
        Self: Sized,
    {
        axioms.into_iter().map(|a| self.add_axiom(a)).filter(|added| *added).count()
    }

    /// Equivalent-classes axioms that mention the named class as an operand.
    fn equivalence_axioms_for(&self, class: &str) -> Vec<&Axiom> {
        let needle = ClassExpression::named(class);
        self.axioms()
            .iter()
            .filter(|a| matches!(a, Axiom::EquivalentClasses(set) if set.contains(&needle)))
            .collect()
    }

    /// Declared domains of an object property.
    fn object_property_domains(&self, property: &str) -> BTreeSet<ClassExpression> {
        self.axioms()
            .iter()
            .filter_map(|a| match a {
                Axiom::ObjectPropertyDomain {
                    property: p,
                    domain,
                } if p == property => Some(domain.clone()),
                _ => None,
            })
            .collect()
    }

    /// Declared ranges of an object property.
    fn object_property_ranges(&self, property: &str) -> BTreeSet<ClassExpression> {
        self.axioms()
            .iter()
            .filter_map(|a| match a {
                Axiom::ObjectPropertyRange { property: p, range } if p == property => {
                    Some(range.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Properties asserted as inverse of `property`, in either position.
    fn inverses_of(&self, property: &str) -> BTreeSet<String> {
        self.axioms()
            .iter()
            .filter_map(|a| match a {
                Axiom::InverseObjectProperties(first, second) if first == property => {
                    Some(second.clone())
                }
                Axiom::InverseObjectProperties(first, second) if second == property => {
                    Some(first.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// `rdfs:label` texts of every entity of `kind` that is in the signature.
    fn labels_of(&self, kind: EntityKind) -> Vec<String> {
        let mut labels: Vec<String> = self
            .axioms()
            .iter()
            .filter_map(|a| match a {
                Axiom::AnnotationAssertion {
                    subject,
                    property: AnnotationProperty::Label,
                    value,
                } if subject.kind == kind && self.contains_in_signature(subject) => {
                    Some(value.lexical.clone())
                }
                _ => None,
            })
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }

    /// Returns `true` when the entity carries an `rdfs:label`.
    fn has_label(&self, entity: &Entity) -> bool {
        self.axioms().iter().any(|a| {
            matches!(a, Axiom::AnnotationAssertion {
                subject,
                property: AnnotationProperty::Label,
                ..
            } if subject == entity)
        })
    }

    /// Serializes the ontology in `format` to `out`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the writer.
    fn save(&self, out: &mut dyn Write, format: Format) -> std::io::Result<()> {
        let text = serializer::render(self, format);
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

/// In-memory [`OntologyStore`] with a hashed axiom index.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    header: OntologyHeader,
    axioms: Vec<Axiom>,
    seen: HashSet<Axiom>,
    signature: BTreeMap<EntityKind, BTreeSet<String>>,
}

impl MemoryStore {
    /// Creates an empty ontology with the given header.
    #[must_use]
    pub fn new(header: OntologyHeader) -> Self {
        Self {
            header,
            axioms: Vec::new(),
            seen: HashSet::new(),
            signature: BTreeMap::new(),
        }
    }

    /// Number of axioms held.
    #[must_use]
    pub fn axiom_count(&self) -> usize {
        self.axioms.len()
    }

    /// Number of signature entities of `kind`.
    #[must_use]
    pub fn entity_count(&self, kind: EntityKind) -> usize {
        self.signature.get(&kind).map_or(0, BTreeSet::len)
    }

    /// Axiom counts grouped by axiom type name, sorted by name.
    #[must_use]
    pub fn axiom_type_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for axiom in &self.axioms {
            *counts.entry(axiom.type_name()).or_insert(0) += 1;
        }
        counts
    }
}

impl OntologyStore for MemoryStore {
    fn header(&self) -> &OntologyHeader {
        &self.header
    }

    fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    fn add_axiom(&mut self, axiom: Axiom) -> bool {
        if self.seen.contains(&axiom) {
            return false;
        }
        for entity in axiom.signature() {
            self.signature
                .entry(entity.kind)
                .or_default()
                .insert(entity.name);
        }
        self.seen.insert(axiom.clone());
        self.axioms.push(axiom);
        true
    }

    fn contains_in_signature(&self, entity: &Entity) -> bool {
        self.signature
            .get(&entity.kind)
            .is_some_and(|names| names.contains(&entity.name))
    }

    fn signature(&self, kind: EntityKind) -> Vec<String> {
        self.signature
            .get(&kind)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Literal;

    fn store() -> MemoryStore {
        MemoryStore::new(OntologyHeader::new("http://localhost/", "Test", "1"))
    }

    #[test]
    fn duplicate_axioms_are_ignored() {
        let mut s = store();
        assert!(s.declare(Entity::class("Noun")));
        assert!(!s.declare(Entity::class("Noun")));
        assert_eq!(s.axiom_count(), 1);
    }

    #[test]
    fn signature_tracks_logical_axioms_only() {
        let mut s = store();
        s.add_axiom(Axiom::AnnotationAssertion {
            subject: Entity::class("Ghost"),
            property: AnnotationProperty::Label,
            value: Literal::en("Ghost"),
        });
        assert!(!s.contains_in_signature(&Entity::class("Ghost")));

        s.add_axiom(Axiom::SubClassOf {
            sub: ClassExpression::named("Noun"),
            sup: ClassExpression::named("Word"),
        });
        assert!(s.contains_in_signature(&Entity::class("Noun")));
        assert!(s.contains_in_signature(&Entity::class("Word")));
        assert_eq!(s.signature(EntityKind::Class), vec!["Noun", "Word"]);
        assert!(s.has_label(&Entity::class("Ghost")));
    }

    #[test]
    fn labels_of_requires_signature_membership() {
        let mut s = store();
        for name in ["Noun", "Ghost"] {
            s.add_axiom(Axiom::AnnotationAssertion {
                subject: Entity::class(name),
                property: AnnotationProperty::Label,
                value: Literal::en(name),
            });
        }
        s.declare(Entity::class("Noun"));
        assert_eq!(s.labels_of(EntityKind::Class), vec!["Noun"]);
    }

    #[test]
    fn domain_range_and_inverse_queries() {
        let mut s = store();
        s.add_axiom(Axiom::ObjectPropertyDomain {
            property: "hasPart".into(),
            domain: ClassExpression::named("Word"),
        });
        s.add_axiom(Axiom::ObjectPropertyRange {
            property: "hasPart".into(),
            range: ClassExpression::named("Morpheme"),
        });
        s.add_axiom(Axiom::InverseObjectProperties(
            "isPartOf".into(),
            "hasPart".into(),
        ));
        assert_eq!(
            s.object_property_domains("hasPart"),
            BTreeSet::from([ClassExpression::named("Word")])
        );
        assert_eq!(
            s.object_property_ranges("hasPart"),
            BTreeSet::from([ClassExpression::named("Morpheme")])
        );
        assert_eq!(s.inverses_of("hasPart"), BTreeSet::from(["isPartOf".to_owned()]));
        assert_eq!(s.inverses_of("isPartOf"), BTreeSet::from(["hasPart".to_owned()]));
    }

    #[test]
    fn equivalence_lookup_by_operand() {
        let mut s = store();
        s.add_axiom(Axiom::EquivalentClasses(BTreeSet::from([
            ClassExpression::named("Cat"),
            ClassExpression::named("Feline"),
        ])));
        assert_eq!(s.equivalence_axioms_for("Feline").len(), 1);
        assert!(s.equivalence_axioms_for("Dog").is_empty());
    }
}
