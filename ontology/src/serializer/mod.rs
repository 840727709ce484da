//! Serializers for generated ontologies.
//!
//! Four formats are supported:
//! - **Turtle** ([`turtle`]), the default artifact format
//! - **N-Triples** ([`ntriples`]) for bulk loading and diffing
//! - **JSON-LD** ([`jsonld`]) as a `@context` + `@graph` document
//! - **OWL functional syntax** ([`functional`]), axiom-per-line
//!
//! The three RDF formats share the OWL 2 to RDF mapping in [`graph`].

pub mod functional;
pub mod graph;
pub mod jsonld;
pub mod ntriples;
pub mod turtle;

use std::fmt;
use std::str::FromStr;

use crate::model::{iris, Literal, LiteralKind};
use crate::store::OntologyStore;

/// Output format of a serialized ontology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Turtle 1.1.
    #[default]
    Turtle,
    /// N-Triples.
    NTriples,
    /// JSON-LD 1.1.
    JsonLd,
    /// OWL 2 functional-style syntax.
    Functional,
}

impl Format {
    /// All formats.
    pub const ALL: [Format; 4] = [
        Format::Turtle,
        Format::NTriples,
        Format::JsonLd,
        Format::Functional,
    ];

    /// File extension used for artifacts in this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Format::Turtle => "ttl",
            Format::NTriples => "nt",
            Format::JsonLd => "jsonld",
            Format::Functional => "ofn",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Turtle => "turtle",
            Format::NTriples => "ntriples",
            Format::JsonLd => "jsonld",
            Format::Functional => "functional",
        })
    }
}

/// Error returned when a format name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ontology format `{0}` (expected turtle, ntriples, jsonld or functional)")]
pub struct UnknownFormat(pub String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(Format::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(Format::NTriples),
            "jsonld" | "json-ld" => Ok(Format::JsonLd),
            "functional" | "ofn" | "owl" => Ok(Format::Functional),
            other => Err(UnknownFormat(other.to_owned())),
        }
    }
}

/// Renders the whole ontology in the given format.
#[must_use]
pub fn render<S: OntologyStore + ?Sized>(store: &S, format: Format) -> String {
    match format {
        Format::Turtle => turtle::to_turtle(store),
        Format::NTriples => ntriples::to_ntriples(store),
        Format::JsonLd => {
            let value = jsonld::to_json_ld(store);
            let mut text = serde_json::to_string_pretty(&value).unwrap_or_default();
            text.push('\n');
            text
        }
        Format::Functional => functional::to_functional(store),
    }
}

/// Escapes a lexical form for a double-quoted Turtle / N-Triples string.
pub(crate) fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Renders a literal with the `xsd:` prefix for typed values.
pub(crate) fn prefixed_literal(lit: &Literal) -> String {
    let quoted = escape_string(&lit.lexical);
    match &lit.kind {
        LiteralKind::Plain => quoted,
        LiteralKind::Lang(tag) => format!("{}@{}", quoted, tag),
        LiteralKind::Typed(dt) => format!("{}^^xsd:{}", quoted, dt.local_name()),
    }
}

/// Returns `true` when `name` can be written as a prefixed local name.
pub(crate) fn is_plain_local(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphanumeric() || c == '_' => {}
        _ => return false,
    }
    !name.ends_with('.') && name.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Standard prefixes shared by the textual formats.
pub(crate) const PREFIXES: [(&str, &str); 4] = [
    ("owl", iris::OWL),
    ("rdf", iris::RDF),
    ("rdfs", iris::RDFS),
    ("xsd", iris::XSD),
];

/// Compacts an IRI against the standard prefixes and the ontology namespace.
///
/// The ontology namespace uses the empty prefix.
pub(crate) fn compact(iri: &str, namespace: &str) -> Option<String> {
    if let Some(local) = iri.strip_prefix(namespace) {
        return is_plain_local(local).then(|| format!(":{}", local));
    }
    PREFIXES.iter().find_map(|(prefix, ns)| {
        iri.strip_prefix(ns)
            .filter(|local| is_plain_local(local))
            .map(|local| format!("{}:{}", prefix, local))
    })
}
