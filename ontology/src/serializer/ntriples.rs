//! N-Triples serializer.
//!
//! One triple per line with absolute IRIs; blank nodes are labelled `_:bN`.

use crate::model::LiteralKind;
use crate::serializer::escape_string;
use crate::serializer::graph::{to_triples, Node, Object};
use crate::store::OntologyStore;

/// Serializes the ontology to an N-Triples string.
#[must_use]
pub fn to_ntriples<S: OntologyStore + ?Sized>(store: &S) -> String {
    let triples = to_triples(store);
    let mut out = String::with_capacity(triples.len() * 128);
    for t in &triples {
        out.push_str(&node(&t.subject));
        out.push_str(&format!(" <{}> ", t.predicate));
        match &t.object {
            Object::Node(n) => out.push_str(&node(n)),
            Object::Literal(lit) => {
                out.push_str(&escape_string(&lit.lexical));
                match &lit.kind {
                    LiteralKind::Plain => {}
                    LiteralKind::Lang(tag) => out.push_str(&format!("@{}", tag)),
                    LiteralKind::Typed(dt) => out.push_str(&format!("^^<{}>", dt.iri())),
                }
            }
        }
        out.push_str(" .\n");
    }
    out
}

fn node(n: &Node) -> String {
    match n {
        Node::Iri(iri) => format!("<{}>", iri),
        Node::Blank(id) => format!("_:b{}", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::fixtures::sample_store;

    #[test]
    fn every_line_ends_with_period() {
        let nt = to_ntriples(&sample_store());
        assert!(!nt.is_empty());
        for line in nt.lines() {
            assert!(line.ends_with(" ."), "Line does not end with ' .': {line}");
        }
    }

    #[test]
    fn typed_literals_use_full_datatype_iri() {
        let nt = to_ntriples(&sample_store());
        assert!(nt.contains(
            "<http://localhost/Sample#noun_1> <http://localhost/Sample#isGrammatical> \
             \"true\"^^<http://www.w3.org/2001/XMLSchema#boolean> ."
        ));
    }

    #[test]
    fn subclass_triple_is_present() {
        let nt = to_ntriples(&sample_store());
        assert!(nt.contains(
            "<http://localhost/Sample#Noun> <http://www.w3.org/2000/01/rdf-schema#subClassOf> \
             <http://localhost/Sample#Word> ."
        ));
    }
}
