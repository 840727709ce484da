//! OWL 2 ontologies as typed Rust values.
//!
//! The `owlgen-ontology` crate holds the axiom model the table translation
//! engine produces, the [`OntologyStore`] interface it writes through, an
//! in-memory [`MemoryStore`], and serializers for Turtle, N-Triples,
//! JSON-LD and OWL functional syntax.
//!
//! # Entry Point
//!
//! ```
//! use owlgen_ontology::{Entity, MemoryStore, OntologyHeader, OntologyStore};
//!
//! let header = OntologyHeader::new("http://localhost/", "LUO - OntoLing", "20240101");
//! let mut store = MemoryStore::new(header);
//! store.declare(Entity::class("Noun"));
//! assert!(store.contains_in_signature(&Entity::class("Noun")));
//! ```
//!
//! # Serialization
//!
//! ```
//! # use owlgen_ontology::{MemoryStore, OntologyHeader};
//! # let store = MemoryStore::new(OntologyHeader::new("http://localhost/", "X", "1"));
//! let turtle = owlgen_ontology::serializer::turtle::to_turtle(&store);
//! let json_ld = owlgen_ontology::serializer::jsonld::to_json_ld(&store);
//! assert!(turtle.contains("owl:Ontology"));
//! assert!(json_ld["@graph"].is_array());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod model;
pub mod serializer;
pub mod store;

pub use model::{
    AnnotationProperty, Axiom, ClassExpression, DataRange, Datatype, Entity, EntityKind, Literal,
    LiteralKind, ObjectCharacteristic, OntologyHeader,
};
pub use serializer::Format;
pub use store::{MemoryStore, OntologyStore};
