//! Property assembler: attribute tables, ad-hoc relation tables and
//! attribute rule tables.
//!
//! Domains and ranges are looked up in the same table: every row whose text
//! mentions the property contributes its concept (or target) cell, and more
//! than one distinct class is wrapped in a union.

use std::collections::{BTreeSet, HashSet};

use owlgen_ontology::{Axiom, ClassExpression, DataRange, Entity, OntologyStore};
use tracing::{debug, info, warn};

use crate::builder::{self, RuleValue};
use crate::error::Result;
use crate::generator::Generator;
use crate::naming;
use crate::syntax;
use crate::table::{Column, ColumnRule, RowMode, Table};

const ATTRIBUTE_RULES: &[ColumnRule] = &[
    ColumnRule::exact(Column::Attribute, &["ATTRIBUTE"]),
    ColumnRule::exact(Column::Concept, &["CONCEPT"]),
    ColumnRule::exact(Column::ValueType, &["VALUE TYPE", "VALUES", "COMPUTATIONAL TYPE"]),
    ColumnRule::exact(Column::Description, &["DESCRIPTION"]),
];

/// The explicit inverse column is tried before the relation column, so an
/// `INVERSE RELATION` header is not taken for the relation itself.
const RELATION_RULES: &[ColumnRule] = &[
    ColumnRule::contains(Column::Inverse, &["INVERSE"]),
    ColumnRule::contains(Column::Source, &["SOURCE"]),
    ColumnRule::contains(Column::Relation, &["RELATION"]),
    ColumnRule::contains(Column::Target, &["TARGET"]),
];

const RULE_RULES: &[ColumnRule] = &[
    ColumnRule::contains(Column::Concept, &["CONCEPT"]),
    ColumnRule::contains(Column::Attribute, &["ATTRIBUTE"]),
    ColumnRule::contains(Column::Value, &["VALUE"]).excluding(&["TYPE"]),
];

const DOMAIN_RULES: &[ColumnRule] = &[
    ColumnRule::contains(Column::Concept, &["CONCEPT"]).excluding(&["TARGET"]),
    ColumnRule::contains(Column::Source, &["SOURCE"]),
];

const VALUE_TYPE_RULES: &[ColumnRule] = &[ColumnRule::contains(
    Column::ValueType,
    &["VALUE TYPE", "VALUES", "COMPUTATIONAL TYPE"],
)];

impl<S: OntologyStore> Generator<S> {
    /// Adds data properties from an attribute table.
    ///
    /// Each attribute gets a label, a domain and a data range looked up in
    /// the same table, and a comment per described row.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read or has no `ATTRIBUTE` column.
    pub fn add_attributes_from_table(&mut self, file: &str) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::Plain)?;
        let columns = table.columns(ATTRIBUTE_RULES);
        let attribute_col = columns.require(Column::Attribute, &table.path)?;
        let domain_col = table.columns(DOMAIN_RULES).get(Column::Concept);
        let range_col = table.columns(VALUE_TYPE_RULES).get(Column::ValueType);

        let mut axioms = Vec::new();
        let mut seen = HashSet::new();
        for row in &table.rows {
            let Some(raw) = row.cell(attribute_col) else {
                continue;
            };
            let name = naming::property_name(raw);
            if name.is_empty() {
                continue;
            }
            let property = Entity::data_property(&name);
            if seen.insert(name.clone()) {
                axioms.push(builder::label(property.clone(), &raw.trim().replace('_', " ")));
                if let Some(col) = domain_col {
                    let domains = self.classes_mentioning(&table, col, raw.trim(), &mut axioms);
                    match ClassExpression::union_or_single(domains.into_iter().map(ClassExpression::Class)) {
                        Some(domain) => axioms.push(Axiom::DataPropertyDomain {
                            property: name.clone(),
                            domain,
                        }),
                        None => warn!(table = file, attribute = %name, "no domain found"),
                    }
                }
                if let Some(col) = range_col {
                    if let Some(range) = self.data_range_of(&table, col, &name) {
                        axioms.push(Axiom::DataPropertyRange {
                            property: name.clone(),
                            range,
                        });
                    }
                }
            }
            if let Some(description) = row.get(&columns, Column::Description) {
                if !syntax::is_nothing(description) && !description.trim().is_empty() {
                    axioms.push(builder::comment(property, description.trim()));
                }
            }
        }
        let added = self.add(axioms);
        info!(table = file, attributes = seen.len(), axioms = added, "attributes added");
        Ok(added)
    }

    /// Adds object properties from a `SOURCE~~RELATION~~TARGET` table.
    ///
    /// An `INVERSE` column, when present, asserts the inverse of each
    /// relation; otherwise inverses are inferred once the table is done.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read or lacks the source, relation or
    /// target column.
    pub fn add_ad_hoc_relations_from_table(&mut self, file: &str) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::Plain)?;
        let columns = table.columns(RELATION_RULES);
        columns.require(Column::Source, &table.path)?;
        let relation_col = columns.require(Column::Relation, &table.path)?;
        let target_col = columns.require(Column::Target, &table.path)?;
        let domain_col = table
            .columns(DOMAIN_RULES)
            .get(Column::Concept)
            .or(columns.get(Column::Source));

        let mut axioms = Vec::new();
        let mut seen = HashSet::new();
        for row in &table.rows {
            let Some(raw) = row.cell(relation_col) else {
                continue;
            };
            let name = naming::property_name(raw);
            if name.is_empty() || !seen.insert(name.clone()) {
                continue;
            }
            let property = Entity::object_property(&name);
            axioms.push(Axiom::Declaration(property.clone()));
            axioms.push(builder::label(property, &raw.trim().replace('_', " ")));
            if let Some(col) = domain_col {
                let domains = self.classes_mentioning(&table, col, raw.trim(), &mut axioms);
                if let Some(domain) =
                    ClassExpression::union_or_single(domains.into_iter().map(ClassExpression::Class))
                {
                    axioms.push(Axiom::ObjectPropertyDomain {
                        property: name.clone(),
                        domain,
                    });
                }
            }
            let ranges = self.classes_mentioning(&table, target_col, raw.trim(), &mut axioms);
            if let Some(range) =
                ClassExpression::union_or_single(ranges.into_iter().map(ClassExpression::Class))
            {
                axioms.push(Axiom::ObjectPropertyRange {
                    property: name.clone(),
                    range,
                });
            }
            if let Some(inverse) = row.get(&columns, Column::Inverse) {
                let inverse = naming::property_name(inverse);
                if !inverse.is_empty() && !syntax::is_nothing(&inverse) && inverse != name {
                    axioms.push(Axiom::Declaration(Entity::object_property(&inverse)));
                    axioms.push(Axiom::InverseObjectProperties(name.clone(), inverse));
                }
            }
        }
        let mut added = self.add(axioms);
        info!(table = file, relations = seen.len(), axioms = added, "ad-hoc relations added");
        if !columns.has(Column::Inverse) {
            added += self.infer_inverse_relations();
        }
        Ok(added)
    }

    /// Adds `SubClassOf(concept, restriction)` rules from a
    /// `CONCEPT~~ATTRIBUTE~~VALUE` table.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read or lacks one of the three columns.
    pub fn add_attribute_rules_from_table(&mut self, file: &str) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::Plain)?;
        let columns = table.columns(RULE_RULES);
        let concept_col = columns.require(Column::Concept, &table.path)?;
        let attribute_col = columns.require(Column::Attribute, &table.path)?;
        let value_col = columns.require(Column::Value, &table.path)?;

        let axioms = self.attribute_rule_axioms(&table, concept_col, attribute_col, value_col);
        let added = self.add(axioms);
        info!(table = file, axioms = added, "attribute rules added");
        Ok(added)
    }

    /// One `SubClassOf(concept, restriction)` per row with all three cells.
    ///
    /// Empty and `--` values restrict nothing.
    pub(crate) fn attribute_rule_axioms(
        &self,
        table: &Table,
        concept_col: usize,
        attribute_col: usize,
        value_col: usize,
    ) -> Vec<Axiom> {
        let mut axioms = Vec::new();
        for row in &table.rows {
            let (Some(concept), Some(attribute), Some(value)) = (
                row.cell(concept_col),
                row.cell(attribute_col),
                row.cell(value_col),
            ) else {
                continue;
            };
            let (domain, _) = self.class_cell(concept);
            let property = naming::property_name(attribute);
            let value = naming::dehyphenate(value.trim());
            if domain.is_empty() || property.is_empty() || value.is_empty() || syntax::is_nothing(&value) {
                continue;
            }
            if let Some(restriction) = RuleValue::from_cell(&value, &self.grammar).restriction(&property) {
                debug!(class = %domain, %property, line = row.line, "attribute rule");
                axioms.push(Axiom::SubClassOf {
                    sub: ClassExpression::named(&domain),
                    sup: restriction,
                });
            }
        }
        axioms
    }

    /// Classes named in `column` of every row mentioning `needle`.
    ///
    /// Mentions are plain substring matches on the raw row text, so `colour`
    /// also selects rows about `colourful`.
    ///
    /// Classes not yet in the signature get a label pushed to `labels`.
    pub(crate) fn classes_mentioning(
        &self,
        table: &Table,
        column: usize,
        needle: &str,
        labels: &mut Vec<Axiom>,
    ) -> BTreeSet<String> {
        let mut classes = BTreeSet::new();
        for row in table.rows.iter().filter(|row| row.mentions(needle)) {
            let Some(cell) = row.cell(column) else {
                continue;
            };
            let (class, text) = self.class_cell(cell);
            if class.is_empty() || syntax::is_nothing(&class) {
                continue;
            }
            if classes.insert(class.clone()) {
                labels.extend(self.label_if_new(&Entity::class(&class), &text));
            }
        }
        classes
    }

    /// Data range of `property` from the value-type cells of rows mentioning it.
    ///
    /// Several distinct ranges are unioned.
    pub(crate) fn data_range_of(&self, table: &Table, column: usize, property: &str) -> Option<DataRange> {
        let capitalized = naming::capitalize(property);
        let ranges: BTreeSet<DataRange> = table
            .rows
            .iter()
            .filter(|row| row.mentions(&capitalized) || row.mentions(property))
            .filter_map(|row| row.cell(column))
            .filter_map(|cell| builder::value_type_range(cell, &self.grammar))
            .collect();
        match ranges.len() {
            0 => None,
            1 => ranges.into_iter().next(),
            _ => Some(DataRange::UnionOf(ranges)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use owlgen_ontology::{Datatype, EntityKind, Literal};

    use super::*;
    use crate::config::GeneratorConfig;

    fn setup(name: &str, body: &str) -> (tempfile::TempDir, Generator) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(name), body).unwrap();
        let cfg = GeneratorConfig::new("http://localhost/", dir.path(), "T").with_version("1");
        (dir, Generator::new(cfg).unwrap())
    }

    #[test]
    fn attribute_domains_union_and_boolean_extension() {
        let (_dir, mut g) = setup(
            "attributes.txt",
            "Attributes\nATTRIBUTE~~CONCEPT~~VALUE TYPE~~DESCRIPTION\n\
             colour~~Noun~~{TRUE, red, blue}~~The colour\n\
             colour~~Verb~~{TRUE, red, blue}~~--\n",
        );
        g.add_attributes_from_table("attributes.txt").unwrap();
        let axioms = g.store().axioms();
        assert!(axioms.contains(&Axiom::DataPropertyDomain {
            property: "colour".into(),
            domain: ClassExpression::union_of([
                ClassExpression::named("Noun"),
                ClassExpression::named("Verb")
            ]),
        }));
        assert!(axioms.contains(&Axiom::DataPropertyRange {
            property: "colour".into(),
            range: DataRange::union_of([
                DataRange::one_of([Literal::plain("red"), Literal::plain("blue")]),
                DataRange::Datatype(Datatype::Boolean),
            ]),
        }));
        let comments = axioms
            .iter()
            .filter(|a| matches!(a, Axiom::AnnotationAssertion { property: owlgen_ontology::AnnotationProperty::Comment, .. }))
            .count();
        assert_eq!(comments, 1);
        assert!(g.store().has_label(&Entity::class("Noun")));
    }

    #[test]
    fn attribute_domains_match_rows_by_substring() {
        let (_dir, mut g) = setup(
            "attributes.txt",
            "Attributes\nATTRIBUTE~~CONCEPT~~VALUE TYPE\n\
             colour~~Noun~~string\n\
             colourful~~Verb~~string\n",
        );
        g.add_attributes_from_table("attributes.txt").unwrap();
        let axioms = g.store().axioms();
        assert!(axioms.contains(&Axiom::DataPropertyDomain {
            property: "colour".into(),
            domain: ClassExpression::union_of([
                ClassExpression::named("Noun"),
                ClassExpression::named("Verb")
            ]),
        }));
        assert!(axioms.contains(&Axiom::DataPropertyDomain {
            property: "colourful".into(),
            domain: ClassExpression::named("Verb"),
        }));
    }

    #[test]
    fn existing_classes_are_not_relabelled() {
        let (_dir, mut g) = setup(
            "attributes.txt",
            "Attributes\nATTRIBUTE~~CONCEPT~~VALUE TYPE\nnumber_value~~Noun~~cardinal\n",
        );
        g.store_mut().declare(Entity::class("Noun"));
        g.add_attributes_from_table("attributes.txt").unwrap();
        assert!(!g.store().has_label(&Entity::class("Noun")));
        assert!(g.store().axioms().contains(&builder::label(
            Entity::data_property("number_value"),
            "number value"
        )));
        assert!(g.store().axioms().contains(&Axiom::DataPropertyRange {
            property: "number_value".into(),
            range: DataRange::Datatype(Datatype::Integer),
        }));
    }

    #[test]
    fn attribute_table_without_attribute_column_fails() {
        let (_dir, mut g) = setup("a.txt", "A\nCONCEPT~~VALUE TYPE\nNoun~~string\n");
        assert!(g.add_attributes_from_table("a.txt").is_err());
    }

    #[test]
    fn ad_hoc_relations_infer_inverses_without_inverse_column() {
        let (_dir, mut g) = setup(
            "relations.txt",
            "Relations\nSOURCE CONCEPT~~RELATION~~TARGET CONCEPT\n\
             Sentence~~hasSubject~~Noun Phrase\n\
             Noun Phrase~~isSubjectOf~~Sentence\n",
        );
        g.add_ad_hoc_relations_from_table("relations.txt").unwrap();
        let store = g.store();
        assert_eq!(
            store.object_property_domains("hasSubject"),
            BTreeSet::from([ClassExpression::named("Sentence")])
        );
        assert_eq!(
            store.object_property_ranges("hasSubject"),
            BTreeSet::from([ClassExpression::named("NounPhrase")])
        );
        assert!(store.inverses_of("hasSubject").contains("isSubjectOf"));
        assert_eq!(store.signature(EntityKind::ObjectProperty).len(), 2);
    }

    #[test]
    fn explicit_inverse_column_is_asserted() {
        let (_dir, mut g) = setup(
            "relations.txt",
            "Relations\nSOURCE CONCEPT~~RELATION~~TARGET CONCEPT~~INVERSE RELATION\n\
             Clause~~contains~~Phrase~~isContainedIn\n",
        );
        g.add_ad_hoc_relations_from_table("relations.txt").unwrap();
        assert!(g.store().axioms().contains(&Axiom::InverseObjectProperties(
            "contains".into(),
            "isContainedIn".into()
        )));
    }

    #[test]
    fn attribute_rules_restrict_values() {
        let (_dir, mut g) = setup(
            "rules.txt",
            "Rules\nCONCEPT~~ATTRIBUTE~~VALUE\n\
             Proper Noun (PN)~~countable~~false\n\
             Noun~~gender~~{masculine, feminine}\n\
             Verb~~tense~~past simple\n",
        );
        g.add_attribute_rules_from_table("rules.txt").unwrap();
        let axioms = g.store().axioms();
        assert!(axioms.contains(&Axiom::SubClassOf {
            sub: ClassExpression::named("ProperNoun"),
            sup: ClassExpression::DataHasValue {
                property: "countable".into(),
                value: Literal::boolean(false),
            },
        }));
        assert!(axioms.contains(&Axiom::SubClassOf {
            sub: ClassExpression::named("Noun"),
            sup: ClassExpression::DataExactCardinality {
                cardinality: 2,
                property: "gender".into(),
                range: Some(DataRange::one_of([
                    Literal::plain("masculine"),
                    Literal::plain("feminine")
                ])),
            },
        }));
        assert!(axioms.contains(&Axiom::SubClassOf {
            sub: ClassExpression::named("Verb"),
            sup: ClassExpression::DataHasValue {
                property: "tense".into(),
                value: Literal::plain("past_simple"),
            },
        }));
    }
}
