//! Turtle 1.1 serializer.
//!
//! Writes the standard prefixes plus the ontology namespace as the empty
//! prefix, then one block per subject in first-appearance order. Blank nodes
//! are labelled `_:bN`.

use crate::model::{iris, LiteralKind};
use crate::serializer::graph::{group_by_subject, to_triples, Node, Object};
use crate::serializer::{compact, escape_string, PREFIXES};
use crate::store::OntologyStore;

/// Serializes the ontology to a Turtle string.
#[must_use]
pub fn to_turtle<S: OntologyStore + ?Sized>(store: &S) -> String {
    let namespace = store.header().namespace();
    let triples = to_triples(store);
    let mut out = String::with_capacity(64 + triples.len() * 64);

    for (prefix, iri) in PREFIXES {
        out.push_str(&format!("@prefix {}: <{}> .\n", prefix, iri));
    }
    out.push_str(&format!("@prefix : <{}> .\n\n", namespace));

    let rdf_type = format!("{}type", iris::RDF);
    for (subject, group) in group_by_subject(&triples) {
        out.push_str(&node(subject, &namespace));
        for (i, t) in group.iter().enumerate() {
            out.push_str(if i == 0 { "\n  " } else { " ;\n  " });
            if t.predicate == rdf_type {
                out.push('a');
            } else {
                out.push_str(&iri(&t.predicate, &namespace));
            }
            out.push(' ');
            out.push_str(&object(&t.object, &namespace));
        }
        out.push_str(" .\n\n");
    }
    out
}

fn iri(iri: &str, namespace: &str) -> String {
    compact(iri, namespace).unwrap_or_else(|| format!("<{}>", iri))
}

fn node(n: &Node, namespace: &str) -> String {
    match n {
        Node::Iri(i) => iri(i, namespace),
        Node::Blank(id) => format!("_:b{}", id),
    }
}

fn object(o: &Object, namespace: &str) -> String {
    match o {
        Object::Node(n) => node(n, namespace),
        Object::Literal(lit) => {
            let quoted = escape_string(&lit.lexical);
            match &lit.kind {
                LiteralKind::Plain => quoted,
                LiteralKind::Lang(tag) => format!("{}@{}", quoted, tag),
                LiteralKind::Typed(dt) => format!("{}^^xsd:{}", quoted, dt.local_name()),
            }
        }
    }
}
