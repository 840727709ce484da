//! OWL 2 functional-style syntax serializer.
//!
//! Renders axioms directly rather than through the RDF mapping, one axiom
//! per line, in insertion order.

use std::collections::BTreeSet;

use crate::model::{Axiom, ClassExpression, DataRange, Entity, OntologyHeader};
use crate::serializer::{is_plain_local, prefixed_literal, PREFIXES};
use crate::store::OntologyStore;

/// Serializes the ontology to an OWL functional-syntax document.
#[must_use]
pub fn to_functional<S: OntologyStore + ?Sized>(store: &S) -> String {
    let header = store.header();
    let mut out = String::with_capacity(256 + store.axioms().len() * 64);
    out.push_str(&format!("Prefix(:=<{}>)\n", header.namespace()));
    for (prefix, iri) in PREFIXES {
        out.push_str(&format!("Prefix({}:=<{}>)\n", prefix, iri));
    }
    out.push_str(&format!(
        "\nOntology(<{}>\n<{}>\n",
        header.iri, header.version_iri
    ));
    out.push_str(&format!(
        "Annotation(rdfs:label \"{}\"@en)\n",
        header.label.replace('"', "\\\"")
    ));
    out.push_str(&format!(
        "Annotation(owl:versionInfo \"{}\"@en)\n\n",
        header.version_info
    ));
    let w = Writer { header };
    for axiom in store.axioms() {
        out.push_str(&w.axiom(axiom));
        out.push('\n');
    }
    out.push_str(")\n");
    out
}

struct Writer<'a> {
    header: &'a OntologyHeader,
}

impl Writer<'_> {
    fn name(&self, name: &str) -> String {
        if is_plain_local(name) {
            format!(":{}", name)
        } else {
            format!("<{}>", self.header.entity_iri(name))
        }
    }

    fn names<'n>(&self, names: impl IntoIterator<Item = &'n String>) -> String {
        names
            .into_iter()
            .map(|n| self.name(n))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn entity(&self, e: &Entity) -> String {
        format!("{}({})", e.kind.as_str(), self.name(&e.name))
    }

    fn class_set(&self, set: &BTreeSet<ClassExpression>) -> String {
        set.iter()
            .map(|ce| self.class_expression(ce))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn class_expression(&self, ce: &ClassExpression) -> String {
        match ce {
            ClassExpression::Class(name) => self.name(name),
            ClassExpression::UnionOf(ops) => format!("ObjectUnionOf({})", self.class_set(ops)),
            ClassExpression::IntersectionOf(ops) => {
                format!("ObjectIntersectionOf({})", self.class_set(ops))
            }
            ClassExpression::ObjectAllValuesFrom { property, filler } => format!(
                "ObjectAllValuesFrom({} {})",
                self.name(property),
                self.class_expression(filler)
            ),
            ClassExpression::ObjectSomeValuesFrom { property, filler } => format!(
                "ObjectSomeValuesFrom({} {})",
                self.name(property),
                self.class_expression(filler)
            ),
            ClassExpression::ObjectMaxCardinality {
                cardinality,
                property,
                filler,
            } => format!(
                "ObjectMaxCardinality({} {} {})",
                cardinality,
                self.name(property),
                self.class_expression(filler)
            ),
            ClassExpression::DataSomeValuesFrom { property, range } => format!(
                "DataSomeValuesFrom({} {})",
                self.name(property),
                self.data_range(range)
            ),
            ClassExpression::DataAllValuesFrom { property, range } => format!(
                "DataAllValuesFrom({} {})",
                self.name(property),
                self.data_range(range)
            ),
            ClassExpression::DataHasValue { property, value } => format!(
                "DataHasValue({} {})",
                self.name(property),
                prefixed_literal(value)
            ),
            ClassExpression::DataExactCardinality {
                cardinality,
                property,
                range,
            } => match range {
                Some(range) => format!(
                    "DataExactCardinality({} {} {})",
                    cardinality,
                    self.name(property),
                    self.data_range(range)
                ),
                None => format!("DataExactCardinality({} {})", cardinality, self.name(property)),
            },
            ClassExpression::DataMinCardinality {
                cardinality,
                property,
            } => format!("DataMinCardinality({} {})", cardinality, self.name(property)),
            ClassExpression::DataMaxCardinality {
                cardinality,
                property,
            } => format!("DataMaxCardinality({} {})", cardinality, self.name(property)),
        }
    }

    fn data_range(&self, range: &DataRange) -> String {
        match range {
            DataRange::Datatype(dt) => format!("xsd:{}", dt.local_name()),
            DataRange::OneOf(values) => format!(
                "DataOneOf({})",
                values
                    .iter()
                    .map(prefixed_literal)
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            DataRange::UnionOf(ranges) => format!(
                "DataUnionOf({})",
                ranges
                    .iter()
                    .map(|r| self.data_range(r))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            DataRange::IntegerInclusive { min, max } => format!(
                "DatatypeRestriction(xsd:integer xsd:minInclusive \"{}\"^^xsd:integer xsd:maxInclusive \"{}\"^^xsd:integer)",
                min, max
            ),
        }
    }

    fn axiom(&self, axiom: &Axiom) -> String {
        match axiom {
            Axiom::Declaration(e) => format!("Declaration({})", self.entity(e)),
            Axiom::AnnotationAssertion {
                subject,
                property,
                value,
            } => format!(
                "AnnotationAssertion({} {} {})",
                property.as_str(),
                self.name(&subject.name),
                prefixed_literal(value)
            ),
            Axiom::SubClassOf { sub, sup } => format!(
                "SubClassOf({} {})",
                self.class_expression(sub),
                self.class_expression(sup)
            ),
            Axiom::EquivalentClasses(set) => format!("EquivalentClasses({})", self.class_set(set)),
            Axiom::DisjointClasses(set) => format!("DisjointClasses({})", self.class_set(set)),
            Axiom::EquivalentObjectProperties(names) => {
                format!("EquivalentObjectProperties({})", self.names(names))
            }
            Axiom::EquivalentDataProperties(names) => {
                format!("EquivalentDataProperties({})", self.names(names))
            }
            Axiom::SameIndividual(names) => format!("SameIndividual({})", self.names(names)),
            Axiom::ObjectPropertyDomain { property, domain } => format!(
                "ObjectPropertyDomain({} {})",
                self.name(property),
                self.class_expression(domain)
            ),
            Axiom::ObjectPropertyRange { property, range } => format!(
                "ObjectPropertyRange({} {})",
                self.name(property),
                self.class_expression(range)
            ),
            Axiom::DataPropertyDomain { property, domain } => format!(
                "DataPropertyDomain({} {})",
                self.name(property),
                self.class_expression(domain)
            ),
            Axiom::DataPropertyRange { property, range } => format!(
                "DataPropertyRange({} {})",
                self.name(property),
                self.data_range(range)
            ),
            Axiom::InverseObjectProperties(a, b) => format!(
                "InverseObjectProperties({} {})",
                self.name(a),
                self.name(b)
            ),
            Axiom::SubObjectPropertyOf { sub, sup } => format!(
                "SubObjectPropertyOf({} {})",
                self.name(sub),
                self.name(sup)
            ),
            Axiom::ObjectPropertyCharacteristic {
                property,
                characteristic,
            } => format!("{}({})", characteristic.axiom_name(), self.name(property)),
            Axiom::ClassAssertion { class, individual } => format!(
                "ClassAssertion({} {})",
                self.class_expression(class),
                self.name(individual)
            ),
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => format!(
                "ObjectPropertyAssertion({} {} {})",
                self.name(property),
                self.name(subject),
                self.name(object)
            ),
            Axiom::DataPropertyAssertion {
                property,
                subject,
                value,
            } => format!(
                "DataPropertyAssertion({} {} {})",
                self.name(property),
                self.name(subject),
                prefixed_literal(value)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::fixtures::sample_store;

    #[test]
    fn wraps_axioms_in_ontology_block() {
        let ofn = to_functional(&sample_store());
        assert!(ofn.starts_with("Prefix(:=<http://localhost/Sample#>)\n"));
        assert!(ofn.contains("Ontology(<http://localhost/Sample>\n<http://localhost/Sample/20240101>"));
        assert!(ofn.trim_end().ends_with(')'));
    }

    #[test]
    fn renders_nested_expressions() {
        let ofn = to_functional(&sample_store());
        assert!(ofn.contains("Declaration(Class(:Word))"));
        assert!(ofn.contains("SubClassOf(:Noun :Word)"));
        assert!(ofn.contains("DisjointClasses(:Adjective :Noun :Verb)"));
        assert!(ofn.contains(
            "SubClassOf(:Word ObjectAllValuesFrom(:hasPart ObjectUnionOf(:Affix :Root)))"
        ));
        assert!(ofn.contains(
            "DataPropertyRange(:isGrammatical DataUnionOf(xsd:boolean DataOneOf(\"blue\" \"red\")))"
        ));
        assert!(ofn.contains("DataPropertyAssertion(:isGrammatical :noun_1 \"true\"^^xsd:boolean)"));
    }
}
