//! Glossary assembler.
//!
//! A glossary table lists one entity per row with its synonyms and a
//! description. The same layout serves concepts, attributes, ad-hoc
//! relations and instances; only the entity kind and the way the name cell
//! is read differ.

use owlgen_ontology::{Axiom, Entity, EntityKind, OntologyStore};
use serde::Deserialize;
use tracing::info;

use crate::builder;
use crate::error::Result;
use crate::generator::Generator;
use crate::syntax::{self, INNER_SEPARATOR};
use crate::table::{Column, ColumnRule, RowMode, Table};

/// What a glossary table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlossaryKind {
    /// Concepts, as classes.
    Concepts,
    /// Class and instance attributes, as data properties.
    Attributes,
    /// Ad-hoc relations, as object properties.
    Relations,
    /// Instances, as named individuals.
    Instances,
}

impl GlossaryKind {
    /// Entity kind the rows become.
    #[must_use]
    pub fn entity_kind(self) -> EntityKind {
        match self {
            GlossaryKind::Concepts => EntityKind::Class,
            GlossaryKind::Attributes => EntityKind::DataProperty,
            GlossaryKind::Relations => EntityKind::ObjectProperty,
            GlossaryKind::Instances => EntityKind::NamedIndividual,
        }
    }
}

const GLOSSARY_RULES: &[ColumnRule] = &[
    ColumnRule::contains(Column::Name, &["NAME"]),
    ColumnRule::contains(Column::Synonym, &["SYNONYM"]),
    ColumnRule::contains(Column::Description, &["DESCRIPTION"]),
];

impl<S: OntologyStore> Generator<S> {
    /// Adds declared, labelled entities from a `NAME~~SYNONYMS~~DESCRIPTION`
    /// glossary table.
    ///
    /// Synonyms are `%`-separated and become one equivalence axiom of the
    /// matching flavor. Attribute names written `Concept: attribute` use the
    /// attribute part; relation names written `relation (Source, Target)`
    /// use the relation part.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read or has no `NAME` column.
    pub fn add_glossary_from_table(&mut self, file: &str, kind: GlossaryKind) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::Plain)?;
        let columns = table.columns(GLOSSARY_RULES);
        let name_col = columns.require(Column::Name, &table.path)?;
        let entity_kind = kind.entity_kind();

        let mut axioms = Vec::new();
        for row in &table.rows {
            let Some(cell) = row.cell(name_col) else {
                continue;
            };
            let text = self.glossary_name(cell, kind);
            let entity = Entity::new(entity_kind, builder::entity_name(entity_kind, text));
            if entity.name.is_empty() {
                continue;
            }
            axioms.push(Axiom::Declaration(entity.clone()));
            axioms.push(builder::label(entity.clone(), text));
            if let Some(synonyms) = row.get(&columns, Column::Synonym) {
                if !syntax::is_nothing(synonyms) {
                    let synonyms = synonyms.replace(INNER_SEPARATOR, ",");
                    axioms.extend(builder::synonym_cluster(entity_kind, &entity.name, synonyms.split(',')));
                }
            }
            if let Some(description) = row.get(&columns, Column::Description) {
                if !syntax::is_nothing(description) {
                    axioms.push(builder::comment(entity, description));
                }
            }
        }
        let added = self.add(axioms);
        info!(table = file, ?kind, axioms = added, "glossary added");
        Ok(added)
    }

    fn glossary_name<'a>(&self, cell: &'a str, kind: GlossaryKind) -> &'a str {
        let named = match kind {
            GlossaryKind::Attributes => self.grammar.concept_attribute(cell),
            GlossaryKind::Relations => self.grammar.relation_signature(cell),
            GlossaryKind::Concepts | GlossaryKind::Instances => None,
        };
        named.unwrap_or(cell).trim()
    }
}
