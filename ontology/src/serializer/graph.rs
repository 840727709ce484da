//! OWL 2 to RDF mapping.
//!
//! Turns the header and axiom list of a store into a flat triple list with
//! numbered blank nodes. Restrictions, boolean class constructors, data
//! ranges and n-ary disjointness use the standard W3C mapping; lists become
//! `rdf:first` / `rdf:rest` chains.

use crate::model::{
    iris, Axiom, ClassExpression, DataRange, Datatype, Literal, OntologyHeader,
};
use crate::store::OntologyStore;

/// Subject or IRI-valued object of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// Absolute IRI.
    Iri(String),
    /// Blank node, numbered per document.
    Blank(usize),
}

/// Object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    /// IRI or blank node.
    Node(Node),
    /// Literal value.
    Literal(Literal),
}

/// A single RDF triple with an absolute predicate IRI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    /// Subject.
    pub subject: Node,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: Object,
}

/// Maps the whole ontology, header first, to RDF triples.
#[must_use]
pub fn to_triples<S: OntologyStore + ?Sized>(store: &S) -> Vec<Triple> {
    let mut mapper = Mapper {
        header: store.header(),
        triples: Vec::with_capacity(store.axioms().len() * 3),
        next_blank: 0,
    };
    mapper.ontology_header();
    for axiom in store.axioms() {
        mapper.axiom(axiom);
    }
    mapper.triples
}

/// Groups triples by subject, keeping the order in which subjects first appear.
#[must_use]
pub fn group_by_subject(triples: &[Triple]) -> Vec<(&Node, Vec<&Triple>)> {
    let mut index: std::collections::HashMap<&Node, usize> = std::collections::HashMap::new();
    let mut groups: Vec<(&Node, Vec<&Triple>)> = Vec::new();
    for t in triples {
        match index.get(&t.subject) {
            Some(&i) => groups[i].1.push(t),
            None => {
                index.insert(&t.subject, groups.len());
                groups.push((&t.subject, vec![t]));
            }
        }
    }
    groups
}

fn owl(local: &str) -> String {
    format!("{}{}", iris::OWL, local)
}

fn rdf(local: &str) -> String {
    format!("{}{}", iris::RDF, local)
}

fn rdfs(local: &str) -> String {
    format!("{}{}", iris::RDFS, local)
}

fn count(n: u32) -> Object {
    Object::Literal(Literal {
        lexical: n.to_string(),
        kind: crate::model::LiteralKind::Typed(Datatype::NonNegativeInteger),
    })
}

struct Mapper<'a> {
    header: &'a OntologyHeader,
    triples: Vec<Triple>,
    next_blank: usize,
}

impl Mapper<'_> {
    fn emit(&mut self, subject: Node, predicate: String, object: Object) {
        self.triples.push(Triple {
            subject,
            predicate,
            object,
        });
    }

    fn typed(&mut self, subject: Node, class_iri: String) {
        self.emit(subject, rdf("type"), Object::Node(Node::Iri(class_iri)));
    }

    fn blank(&mut self) -> Node {
        self.next_blank += 1;
        Node::Blank(self.next_blank)
    }

    fn entity(&self, name: &str) -> Node {
        Node::Iri(self.header.entity_iri(name))
    }

    fn ontology_header(&mut self) {
        let onto = Node::Iri(self.header.iri.clone());
        self.typed(onto.clone(), owl("Ontology"));
        let version = Object::Node(Node::Iri(self.header.version_iri.clone()));
        self.emit(onto.clone(), owl("versionIRI"), version);
        let label = Object::Literal(Literal::en(self.header.label.clone()));
        self.emit(onto.clone(), rdfs("label"), label);
        let info = Object::Literal(Literal::en(self.header.version_info.clone()));
        self.emit(onto, owl("versionInfo"), info);
    }

    fn list(&mut self, items: Vec<Object>) -> Node {
        let mut head = Node::Iri(rdf("nil"));
        for item in items.into_iter().rev() {
            let cell = self.blank();
            self.emit(cell.clone(), rdf("first"), item);
            self.emit(cell.clone(), rdf("rest"), Object::Node(head));
            head = cell;
        }
        head
    }

    fn restriction(&mut self, property: &str) -> Node {
        let node = self.blank();
        self.typed(node.clone(), owl("Restriction"));
        let p = Object::Node(self.entity(property));
        self.emit(node.clone(), owl("onProperty"), p);
        node
    }

    fn class_expression(&mut self, ce: &ClassExpression) -> Node {
        match ce {
            ClassExpression::Class(name) => self.entity(name),
            ClassExpression::UnionOf(ops) | ClassExpression::IntersectionOf(ops) => {
                let keyword = if matches!(ce, ClassExpression::UnionOf(_)) {
                    "unionOf"
                } else {
                    "intersectionOf"
                };
                let items = ops
                    .iter()
                    .map(|op| Object::Node(self.class_expression(op)))
                    .collect();
                let list = self.list(items);
                let node = self.blank();
                self.typed(node.clone(), owl("Class"));
                self.emit(node.clone(), owl(keyword), Object::Node(list));
                node
            }
            ClassExpression::ObjectAllValuesFrom { property, filler }
            | ClassExpression::ObjectSomeValuesFrom { property, filler } => {
                let keyword = if matches!(ce, ClassExpression::ObjectAllValuesFrom { .. }) {
                    "allValuesFrom"
                } else {
                    "someValuesFrom"
                };
                let filler = self.class_expression(filler);
                let node = self.restriction(property);
                self.emit(node.clone(), owl(keyword), Object::Node(filler));
                node
            }
            ClassExpression::ObjectMaxCardinality {
                cardinality,
                property,
                filler,
            } => {
                let filler = self.class_expression(filler);
                let node = self.restriction(property);
                self.emit(node.clone(), owl("maxQualifiedCardinality"), count(*cardinality));
                self.emit(node.clone(), owl("onClass"), Object::Node(filler));
                node
            }
            ClassExpression::DataSomeValuesFrom { property, range }
            | ClassExpression::DataAllValuesFrom { property, range } => {
                let keyword = if matches!(ce, ClassExpression::DataAllValuesFrom { .. }) {
                    "allValuesFrom"
                } else {
                    "someValuesFrom"
                };
                let range = self.data_range(range);
                let node = self.restriction(property);
                self.emit(node.clone(), owl(keyword), Object::Node(range));
                node
            }
            ClassExpression::DataHasValue { property, value } => {
                let node = self.restriction(property);
                self.emit(node.clone(), owl("hasValue"), Object::Literal(value.clone()));
                node
            }
            ClassExpression::DataExactCardinality {
                cardinality,
                property,
                range,
            } => match range {
                Some(range) => {
                    let range = self.data_range(range);
                    let node = self.restriction(property);
                    self.emit(node.clone(), owl("qualifiedCardinality"), count(*cardinality));
                    self.emit(node.clone(), owl("onDataRange"), Object::Node(range));
                    node
                }
                None => {
                    let node = self.restriction(property);
                    self.emit(node.clone(), owl("cardinality"), count(*cardinality));
                    node
                }
            },
            ClassExpression::DataMinCardinality {
                cardinality,
                property,
            } => {
                let node = self.restriction(property);
                self.emit(node.clone(), owl("minCardinality"), count(*cardinality));
                node
            }
            ClassExpression::DataMaxCardinality {
                cardinality,
                property,
            } => {
                let node = self.restriction(property);
                self.emit(node.clone(), owl("maxCardinality"), count(*cardinality));
                node
            }
        }
    }

    fn data_range(&mut self, range: &DataRange) -> Node {
        match range {
            DataRange::Datatype(dt) => Node::Iri(dt.iri()),
            DataRange::OneOf(values) => {
                let items = values.iter().cloned().map(Object::Literal).collect();
                let list = self.list(items);
                let node = self.blank();
                self.typed(node.clone(), rdfs("Datatype"));
                self.emit(node.clone(), owl("oneOf"), Object::Node(list));
                node
            }
            DataRange::UnionOf(ranges) => {
                let items = ranges
                    .iter()
                    .map(|r| Object::Node(self.data_range(r)))
                    .collect();
                let list = self.list(items);
                let node = self.blank();
                self.typed(node.clone(), rdfs("Datatype"));
                self.emit(node.clone(), owl("unionOf"), Object::Node(list));
                node
            }
            DataRange::IntegerInclusive { min, max } => {
                let low = self.blank();
                let xsd = |local: &str| format!("{}{}", iris::XSD, local);
                self.emit(low.clone(), xsd("minInclusive"), Object::Literal(Literal::integer(*min)));
                let high = self.blank();
                self.emit(high.clone(), xsd("maxInclusive"), Object::Literal(Literal::integer(*max)));
                let facets = self.list(vec![Object::Node(low), Object::Node(high)]);
                let node = self.blank();
                self.typed(node.clone(), rdfs("Datatype"));
                self.emit(node.clone(), owl("onDatatype"), Object::Node(Node::Iri(Datatype::Integer.iri())));
                self.emit(node.clone(), owl("withRestrictions"), Object::Node(facets));
                node
            }
        }
    }

    /// Emits `first <predicate> other` for every other member of an n-ary set.
    fn pairwise(&mut self, nodes: Vec<Node>, predicate: &str) {
        let mut iter = nodes.into_iter();
        if let Some(first) = iter.next() {
            for other in iter {
                self.emit(first.clone(), owl(predicate), Object::Node(other));
            }
        }
    }

    fn axiom(&mut self, axiom: &Axiom) {
        match axiom {
            Axiom::Declaration(entity) => {
                let node = self.entity(&entity.name);
                self.typed(node, owl(entity.kind.rdf_type()));
            }
            Axiom::AnnotationAssertion {
                subject,
                property,
                value,
            } => {
                let node = self.entity(&subject.name);
                self.emit(node, property.iri(), Object::Literal(value.clone()));
            }
            Axiom::SubClassOf { sub, sup } => {
                let sub = self.class_expression(sub);
                let sup = self.class_expression(sup);
                self.emit(sub, rdfs("subClassOf"), Object::Node(sup));
            }
            Axiom::EquivalentClasses(set) => {
                let nodes = set.iter().map(|ce| self.class_expression(ce)).collect();
                self.pairwise(nodes, "equivalentClass");
            }
            Axiom::DisjointClasses(set) => {
                let nodes: Vec<Node> = set.iter().map(|ce| self.class_expression(ce)).collect();
                if nodes.len() == 2 {
                    self.pairwise(nodes, "disjointWith");
                } else {
                    let members = self.list(nodes.into_iter().map(Object::Node).collect());
                    let node = self.blank();
                    self.typed(node.clone(), owl("AllDisjointClasses"));
                    self.emit(node, owl("members"), Object::Node(members));
                }
            }
            Axiom::EquivalentObjectProperties(names) | Axiom::EquivalentDataProperties(names) => {
                let nodes = names.iter().map(|n| self.entity(n)).collect();
                self.pairwise(nodes, "equivalentProperty");
            }
            Axiom::SameIndividual(names) => {
                let nodes = names.iter().map(|n| self.entity(n)).collect();
                self.pairwise(nodes, "sameAs");
            }
            Axiom::ObjectPropertyDomain { property, domain: ce }
            | Axiom::DataPropertyDomain { property, domain: ce } => {
                let p = self.entity(property);
                let ce = self.class_expression(ce);
                self.emit(p, rdfs("domain"), Object::Node(ce));
            }
            Axiom::ObjectPropertyRange { property, range } => {
                let p = self.entity(property);
                let ce = self.class_expression(range);
                self.emit(p, rdfs("range"), Object::Node(ce));
            }
            Axiom::DataPropertyRange { property, range } => {
                let p = self.entity(property);
                let dr = self.data_range(range);
                self.emit(p, rdfs("range"), Object::Node(dr));
            }
            Axiom::InverseObjectProperties(first, second) => {
                let a = self.entity(first);
                let b = self.entity(second);
                self.emit(a, owl("inverseOf"), Object::Node(b));
            }
            Axiom::SubObjectPropertyOf { sub, sup } => {
                let a = self.entity(sub);
                let b = self.entity(sup);
                self.emit(a, rdfs("subPropertyOf"), Object::Node(b));
            }
            Axiom::ObjectPropertyCharacteristic {
                property,
                characteristic,
            } => {
                let p = self.entity(property);
                self.typed(p, owl(characteristic.rdf_type()));
            }
            Axiom::ClassAssertion { class, individual } => {
                let ce = self.class_expression(class);
                let ind = self.entity(individual);
                self.emit(ind, rdf("type"), Object::Node(ce));
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => {
                let s = self.entity(subject);
                let o = self.entity(object);
                self.emit(s, self.header.entity_iri(property), Object::Node(o));
            }
            Axiom::DataPropertyAssertion {
                property,
                subject,
                value,
            } => {
                let s = self.entity(subject);
                self.emit(s, self.header.entity_iri(property), Object::Literal(value.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::fixtures::sample_store;

    #[test]
    fn header_comes_first() {
        let store = sample_store();
        let triples = to_triples(&store);
        assert_eq!(triples[0].subject, Node::Iri("http://localhost/Sample".into()));
        assert_eq!(triples[0].object, Object::Node(Node::Iri(owl("Ontology"))));
    }

    #[test]
    fn three_way_disjointness_uses_all_disjoint_classes() {
        let store = sample_store();
        let triples = to_triples(&store);
        assert!(triples
            .iter()
            .any(|t| t.object == Object::Node(Node::Iri(owl("AllDisjointClasses")))));
        assert!(!triples.iter().any(|t| t.predicate == owl("disjointWith")));
    }

    #[test]
    fn lists_terminate_in_nil() {
        let store = sample_store();
        let triples = to_triples(&store);
        let firsts = triples.iter().filter(|t| t.predicate == rdf("first")).count();
        let nils = triples
            .iter()
            .filter(|t| t.object == Object::Node(Node::Iri(rdf("nil"))))
            .count();
        assert!(firsts > 0);
        assert!(nils > 0 && nils <= firsts);
    }

    #[test]
    fn grouping_preserves_first_appearance() {
        let store = sample_store();
        let triples = to_triples(&store);
        let groups = group_by_subject(&triples);
        assert_eq!(groups[0].0, &Node::Iri("http://localhost/Sample".into()));
        let total: usize = groups.iter().map(|(_, ts)| ts.len()).sum();
        assert_eq!(total, triples.len());
    }
}
