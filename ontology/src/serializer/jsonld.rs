//! JSON-LD 1.1 serializer.
//!
//! Produces a single document with a `@context` of the standard prefixes and
//! a flat `@graph` holding one node object per subject.

use serde_json::{json, Map, Value};

use crate::model::{iris, LiteralKind};
use crate::serializer::graph::{group_by_subject, to_triples, Node, Object};
use crate::serializer::{compact, PREFIXES};
use crate::store::OntologyStore;

/// Serializes the ontology to a JSON-LD `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json_ld<S: OntologyStore + ?Sized>(store: &S) -> Value {
    let namespace = store.header().namespace();
    let mut ctx = Map::new();
    for (prefix, iri) in PREFIXES {
        ctx.insert(prefix.to_owned(), json!(iri));
    }

    let triples = to_triples(store);
    let rdf_type = format!("{}type", iris::RDF);
    let mut graph = Vec::new();
    for (subject, group) in group_by_subject(&triples) {
        let mut node = Map::new();
        node.insert("@id".to_owned(), json!(node_id(subject, &namespace)));
        for t in group {
            let (key, value) = if t.predicate == rdf_type {
                let type_id = match &t.object {
                    Object::Node(n) => json!(node_id(n, &namespace)),
                    Object::Literal(lit) => json!(lit.lexical),
                };
                ("@type".to_owned(), type_id)
            } else {
                (key_for(&t.predicate, &namespace), object_value(&t.object, &namespace))
            };
            push_value(&mut node, key, value);
        }
        graph.push(Value::Object(node));
    }

    json!({
        "@context": Value::Object(ctx),
        "@graph": graph
    })
}

/// Adds `value` under `key`, promoting to an array on repeated keys.
fn push_value(node: &mut Map<String, Value>, key: String, value: Value) {
    if let Some(existing) = node.get_mut(&key) {
        let prev = std::mem::replace(existing, Value::Null);
        *existing = match prev {
            Value::Array(mut arr) => {
                arr.push(value);
                Value::Array(arr)
            }
            other => json!([other, value]),
        };
    } else {
        node.insert(key, value);
    }
}

/// Predicates keep standard prefixes; entity predicates stay absolute.
fn key_for(predicate: &str, namespace: &str) -> String {
    if predicate.starts_with(namespace) {
        predicate.to_owned()
    } else {
        compact(predicate, namespace).unwrap_or_else(|| predicate.to_owned())
    }
}

fn node_id(n: &Node, namespace: &str) -> String {
    match n {
        Node::Iri(iri) if iri.starts_with(namespace) => iri.clone(),
        Node::Iri(iri) => compact(iri, namespace).unwrap_or_else(|| iri.clone()),
        Node::Blank(id) => format!("_:b{}", id),
    }
}

fn object_value(o: &Object, namespace: &str) -> Value {
    match o {
        Object::Node(n) => json!({ "@id": node_id(n, namespace) }),
        Object::Literal(lit) => match &lit.kind {
            LiteralKind::Plain => json!(lit.lexical),
            LiteralKind::Lang(tag) => json!({ "@value": lit.lexical, "@language": tag }),
            LiteralKind::Typed(dt) => {
                json!({ "@value": lit.lexical, "@type": format!("xsd:{}", dt.local_name()) })
            }
        },
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::serializer::fixtures::sample_store;

    #[test]
    fn produces_context_and_graph() {
        let json = to_json_ld(&sample_store());
        assert!(json["@context"].is_object());
        assert!(json["@graph"].is_array());
        assert_eq!(json["@context"]["owl"], json!("http://www.w3.org/2002/07/owl#"));
    }

    #[test]
    fn all_nodes_have_ids() {
        let json = to_json_ld(&sample_store());
        let graph = json["@graph"].as_array().expect("@graph must be array");
        for (i, node) in graph.iter().enumerate() {
            assert!(!node["@id"].is_null(), "Node at index {i} is missing @id");
        }
    }

    #[test]
    fn labels_carry_language_tags() {
        let json = to_json_ld(&sample_store());
        let graph = json["@graph"].as_array().expect("@graph must be array");
        let word = graph
            .iter()
            .find(|n| n["@id"] == json!("http://localhost/Sample#Word"))
            .expect("Word node");
        assert_eq!(word["@type"], json!("owl:Class"));
        assert_eq!(word["rdfs:label"]["@language"], json!("en"));
    }
}
