//! Translation of `~~`-delimited knowledge tables into OWL 2 axioms.
//!
//! The `owlgen-engine` crate reads tables written in a small textual
//! mini-language (a two-character field separator, `--` for "nothing", `%`
//! inside cells, `$CRLF` record continuations, `[Continued in Table N]`
//! jumps) and turns each layout into axioms in an
//! [`owlgen_ontology::OntologyStore`].
//!
//! A [`Generator`] holds one build's state. Each table layout is a method on
//! it, implemented in its own module:
//!
//! | Layout | Method |
//! |---|---|
//! | taxonomy (chain / pair) | [`Generator::add_taxonomy_from_table`] |
//! | decomposition | [`Generator::add_decompositions_from_table`], [`Generator::add_grouped_decompositions_from_table`] |
//! | part-of | [`Generator::add_part_of_axioms_from_table`] |
//! | attributes, ad-hoc relations, attribute rules | [`Generator::add_attributes_from_table`], [`Generator::add_ad_hoc_relations_from_table`], [`Generator::add_attribute_rules_from_table`] |
//! | class individuals | [`Generator::add_class_individuals_from_table`] |
//! | glossaries | [`Generator::add_glossary_from_table`] |
//! | structured attribute / relation / instance tables | [`Generator::add_structured_attributes_from_table`], ... |
//! | footnotes | [`Generator::add_footnotes_from_table`] |
//!
//! Inverse relations are inferred with [`Generator::infer_inverse_relations`].
//! A [`BuildPlan`] strings steps together from a TOML file.
//!
//! # Entry Point
//!
//! ```no_run
//! use owlgen_engine::{Generator, GeneratorConfig, TaxonomyLayout};
//!
//! # fn main() -> owlgen_engine::Result<()> {
//! let config = GeneratorConfig::new("http://localhost/", "tables", "LUO - OntoLing");
//! let mut generator = Generator::new(config)?;
//! generator.add_taxonomy_from_table("Table 1. Linguistic Units.txt", TaxonomyLayout::Chain)?;
//! generator.infer_inverse_relations();
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod annotate;
pub mod builder;
pub mod config;
pub mod decomposition;
pub mod error;
pub mod footnotes;
pub mod generator;
pub mod glossary;
pub mod grammar;
pub mod individuals;
pub mod inverse;
pub mod naming;
pub mod part_of;
pub mod plan;
pub mod properties;
pub mod structured;
pub mod syntax;
pub mod table;
pub mod taxonomy;

pub use annotate::{Annotation, GazetteerAnnotator, Tag, TextAnnotator};
pub use config::{GeneratorConfig, TaxonomyLabels};
pub use decomposition::DecompositionKind;
pub use error::{Error, Result};
pub use footnotes::{FootnoteGrammar, FootnoteKind};
pub use generator::Generator;
pub use glossary::GlossaryKind;
pub use grammar::CellGrammar;
pub use inverse::InverseCandidate;
pub use plan::{BuildPlan, BuildSummary, Step};
pub use taxonomy::TaxonomyLayout;
