//! Structured table assembler.
//!
//! Structured tables come from an ontology editor export: attribute, ad-hoc
//! relation and instance tables with fixed, named columns (`ATTRIBUTE NAME`,
//! `SOURCE CARDINALITY`, `INSTANCE NAME`, ...). Unlike the free tables read
//! by [`crate::properties`], rows are matched on the exact name cell.

use std::collections::BTreeSet;

use owlgen_ontology::{Axiom, ClassExpression, DataRange, Datatype, Literal, OntologyStore};
use tracing::{debug, info};

use crate::builder;
use crate::error::Result;
use crate::generator::Generator;
use crate::naming;
use crate::syntax::{self, INNER_SEPARATOR};
use crate::table::{Column, ColumnMap, ColumnRule, Row, RowMode, Table};

const ATTRIBUTE_RULES: &[ColumnRule] = &[
    ColumnRule::contains(Column::Attribute, &["ATTRIBUTE NAME"]),
    ColumnRule::contains(Column::Concept, &["CONCEPT NAME"]),
    ColumnRule::contains(Column::ValueType, &["VALUE TYPE"]),
    ColumnRule::contains(Column::ValueRange, &["VALUE RANGE"]),
    ColumnRule::contains(Column::Values, &["VALUES"]),
    ColumnRule::contains(Column::Cardinality, &["CARDINALITY"]),
];

const RELATION_RULES: &[ColumnRule] = &[
    ColumnRule::contains(Column::Relation, &["RELATION NAME"]),
    ColumnRule::contains(Column::Cardinality, &["SOURCE CARDINALITY"]),
    ColumnRule::contains(Column::Source, &["SOURCE CONCEPT"]),
    ColumnRule::contains(Column::Target, &["TARGET CONCEPT"]),
    ColumnRule::contains(Column::Characteristics, &["MATHEMATIC PROPERTIES"]),
];

const INSTANCE_RULES: &[ColumnRule] = &[
    ColumnRule::contains(Column::Instance, &["INSTANCE NAME"]),
    ColumnRule::contains(Column::Concept, &["CONCEPT NAME"]),
    ColumnRule::contains(Column::Attribute, &["ATTRIBUTE", "INSTANCED RELATION"]),
    ColumnRule::contains(Column::Value, &["VALUE", "TARGET INSTANCE"]),
];

/// Distinct trimmed cells of `column`, in first-seen order.
fn distinct_names(table: &Table, column: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cell in table.rows.iter().filter_map(|row| row.cell(column)) {
        let cell = cell.trim();
        if !cell.is_empty() && !names.iter().any(|n| n == cell) {
            names.push(cell.to_owned());
        }
    }
    names
}

/// Rows whose `column` cell is exactly `name` once trimmed.
fn rows_named<'t>(table: &'t Table, column: usize, name: &'t str) -> impl Iterator<Item = &'t Row> {
    table
        .rows
        .iter()
        .filter(move |row| row.cell(column).is_some_and(|c| c.trim() == name))
}

impl<S: OntologyStore> Generator<S> {
    /// Adds domain, range and cardinality of every attribute of a
    /// structured attribute table.
    ///
    /// When the table has a `VALUES` column, its values also become
    /// attribute rules on the concepts.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read or has no `ATTRIBUTE NAME` column.
    pub fn add_structured_attributes_from_table(&mut self, file: &str) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::Plain)?;
        let columns = table.columns(ATTRIBUTE_RULES);
        let name_col = columns.require(Column::Attribute, &table.path)?;

        let names = distinct_names(&table, name_col);
        let mut axioms = Vec::new();
        for name in &names {
            let property = naming::property_name(name);
            let rows: Vec<&Row> = rows_named(&table, name_col, name).collect();
            let domain = columns.get(Column::Concept).and_then(|col| {
                let classes: BTreeSet<ClassExpression> = rows
                    .iter()
                    .filter_map(|row| row.cell(col))
                    .map(naming::class_name)
                    .filter(|c| !c.is_empty())
                    .map(ClassExpression::Class)
                    .collect();
                ClassExpression::union_or_single(classes)
            });
            let range = self.structured_range(&rows, &columns);
            if let Some(domain) = &domain {
                axioms.push(Axiom::DataPropertyDomain {
                    property: property.clone(),
                    domain: domain.clone(),
                });
            }
            if let Some(range) = &range {
                axioms.push(Axiom::DataPropertyRange {
                    property: property.clone(),
                    range: range.clone(),
                });
            }
            let cardinality = rows
                .first()
                .and_then(|row| row.get(&columns, Column::Cardinality))
                .and_then(|cell| self.grammar.cardinality(cell));
            if let (Some(domain), Some(cardinality)) = (domain, cardinality) {
                match builder::cardinality_restriction(&property, cardinality, range.as_ref()) {
                    Some(restriction) => axioms.push(Axiom::SubClassOf {
                        sub: domain,
                        sup: restriction,
                    }),
                    None => debug!(%property, ?cardinality, "cardinality needs a range"),
                }
            }
        }
        if let (Some(concept_col), Some(values_col)) = (columns.get(Column::Concept), columns.get(Column::Values)) {
            axioms.extend(self.attribute_rule_axioms(&table, concept_col, name_col, values_col));
        }
        let added = self.add(axioms);
        info!(table = file, attributes = names.len(), axioms = added, "structured attributes added");
        Ok(added)
    }

    /// Data range from the value type of the first row that names one.
    fn structured_range(&self, rows: &[&Row], columns: &ColumnMap) -> Option<DataRange> {
        for row in rows {
            let Some(value_type) = row.get(columns, Column::ValueType) else {
                continue;
            };
            match value_type.trim().to_lowercase().as_str() {
                "boolean" => return Some(DataRange::Datatype(Datatype::Boolean)),
                "cardinal" => {
                    let bounded = row
                        .get(columns, Column::ValueRange)
                        .filter(|cell| !syntax::is_nothing(cell))
                        .and_then(|cell| self.grammar.value_range(cell));
                    return Some(match bounded {
                        Some((min, max)) => DataRange::IntegerInclusive { min, max },
                        None => DataRange::Datatype(Datatype::Integer),
                    });
                }
                "date" => return Some(DataRange::Datatype(Datatype::Date)),
                "url" => return Some(DataRange::Datatype(Datatype::AnyUri)),
                "string" if columns.has(Column::Values) => {
                    let values: BTreeSet<Literal> = rows
                        .iter()
                        .filter_map(|row| row.get(columns, Column::Values))
                        .flat_map(|cell| cell.split(INNER_SEPARATOR))
                        .map(str::trim)
                        .filter(|v| !v.is_empty() && !syntax::is_nothing(v))
                        .map(Literal::plain)
                        .collect();
                    return Some(if values.is_empty() {
                        DataRange::Datatype(Datatype::String)
                    } else {
                        DataRange::OneOf(values)
                    });
                }
                "string" => return Some(DataRange::Datatype(Datatype::String)),
                _ => {}
            }
        }
        None
    }

    /// Adds domain, range, source cardinality and characteristics of every
    /// relation of a structured relation table.
    ///
    /// Domain, range and cardinality come from the last row of a relation.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read or has no `RELATION NAME` column.
    pub fn add_structured_relations_from_table(&mut self, file: &str) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::Plain)?;
        let columns = table.columns(RELATION_RULES);
        let name_col = columns.require(Column::Relation, &table.path)?;

        let names = distinct_names(&table, name_col);
        let mut axioms = Vec::new();
        for name in &names {
            let property = naming::property_name(name);
            let rows: Vec<&Row> = rows_named(&table, name_col, name).collect();
            let Some(last) = rows.last() else {
                continue;
            };
            let domain = last
                .get(&columns, Column::Source)
                .map(naming::class_name)
                .filter(|c| !c.is_empty());
            if let Some(domain) = &domain {
                axioms.push(Axiom::ObjectPropertyDomain {
                    property: property.clone(),
                    domain: ClassExpression::named(domain),
                });
            }
            if let Some(range) = last
                .get(&columns, Column::Target)
                .map(naming::class_name)
                .filter(|c| !c.is_empty())
            {
                axioms.push(Axiom::ObjectPropertyRange {
                    property: property.clone(),
                    range: ClassExpression::Class(range),
                });
            }
            let bound = last
                .get(&columns, Column::Cardinality)
                .and_then(|cell| cell.trim().parse::<u32>().ok());
            if let (Some(domain), Some(bound)) = (domain, bound) {
                axioms.push(Axiom::ObjectPropertyDomain {
                    property: property.clone(),
                    domain: ClassExpression::ObjectMaxCardinality {
                        cardinality: bound,
                        property: property.clone(),
                        filler: Box::new(ClassExpression::Class(domain)),
                    },
                });
            }
            for row in &rows {
                if let Some(characteristic) = row
                    .get(&columns, Column::Characteristics)
                    .and_then(builder::characteristic)
                {
                    axioms.push(Axiom::ObjectPropertyCharacteristic {
                        property: property.clone(),
                        characteristic,
                    });
                }
            }
        }
        let added = self.add(axioms);
        info!(table = file, relations = names.len(), axioms = added, "structured relations added");
        Ok(added)
    }

    /// Adds class and property assertions of a structured instance table.
    ///
    /// An attribute starting with an upper-case letter is an instanced
    /// relation whose value names another individual; any other attribute
    /// is a boolean data property.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read or has no `INSTANCE NAME` column.
    pub fn add_structured_instances_from_table(&mut self, file: &str) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::Plain)?;
        let columns = table.columns(INSTANCE_RULES);
        let name_col = columns.require(Column::Instance, &table.path)?;

        let mut axioms = Vec::new();
        for row in &table.rows {
            let individual = row.cell(name_col).map(naming::individual_name).unwrap_or_default();
            if individual.is_empty() {
                continue;
            }
            if let Some(class) = row
                .get(&columns, Column::Concept)
                .map(naming::class_name)
                .filter(|c| !c.is_empty())
            {
                axioms.push(Axiom::ClassAssertion {
                    class: ClassExpression::Class(class),
                    individual: individual.clone(),
                });
            }
            let (Some(attribute), Some(value)) = (
                row.get(&columns, Column::Attribute).map(str::trim),
                row.get(&columns, Column::Value).map(str::trim),
            ) else {
                continue;
            };
            if attribute.is_empty() || value.is_empty() || syntax::is_nothing(value) {
                continue;
            }
            let property = naming::property_name(attribute);
            if attribute.starts_with(char::is_uppercase) {
                axioms.push(Axiom::ObjectPropertyAssertion {
                    property,
                    subject: individual,
                    object: naming::individual_name(value),
                });
            } else {
                axioms.push(Axiom::DataPropertyAssertion {
                    property,
                    subject: individual,
                    value: Literal::boolean(value.eq_ignore_ascii_case("true")),
                });
            }
        }
        let added = self.add(axioms);
        info!(table = file, axioms = added, "structured instances added");
        Ok(added)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use owlgen_ontology::ObjectCharacteristic;

    use super::*;
    use crate::config::GeneratorConfig;

    fn run(body: &str, step: fn(&mut Generator, &str) -> Result<usize>) -> Generator {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("table.txt"), body).unwrap();
        let cfg = GeneratorConfig::new("http://localhost/", dir.path(), "T").with_version("1");
        let mut g = Generator::new(cfg).unwrap();
        step(&mut g, "table.txt").unwrap();
        g
    }

    #[test]
    fn attribute_ranges_and_cardinalities() {
        let g = run(
            "Instance attributes\nATTRIBUTE NAME~~CONCEPT NAME~~VALUE TYPE~~VALUE RANGE~~CARDINALITY\n\
             arity~~Verb~~Cardinal~~0 .. 3~~(1, 1)\n\
             arity~~Noun~~Cardinal~~0 .. 3~~(1, 1)\n\
             lemma~~Word~~String~~--~~(1, n)\n\
             gloss~~Word~~String~~--~~(0, 2)\n",
            Generator::add_structured_attributes_from_table,
        );
        let axioms = g.store().axioms();
        let arity_domain = ClassExpression::union_of([ClassExpression::named("Noun"), ClassExpression::named("Verb")]);
        assert!(axioms.contains(&Axiom::DataPropertyDomain {
            property: "arity".into(),
            domain: arity_domain.clone(),
        }));
        assert!(axioms.contains(&Axiom::DataPropertyRange {
            property: "arity".into(),
            range: DataRange::IntegerInclusive { min: 0, max: 3 },
        }));
        assert!(axioms.contains(&Axiom::SubClassOf {
            sub: arity_domain,
            sup: ClassExpression::DataExactCardinality {
                cardinality: 1,
                property: "arity".into(),
                range: None,
            },
        }));
        assert!(axioms.contains(&Axiom::SubClassOf {
            sub: ClassExpression::named("Word"),
            sup: ClassExpression::DataSomeValuesFrom {
                property: "lemma".into(),
                range: DataRange::Datatype(Datatype::String),
            },
        }));
        assert!(axioms.contains(&Axiom::SubClassOf {
            sub: ClassExpression::named("Word"),
            sup: ClassExpression::intersection_of([
                ClassExpression::DataMinCardinality {
                    cardinality: 0,
                    property: "gloss".into()
                },
                ClassExpression::DataMaxCardinality {
                    cardinality: 2,
                    property: "gloss".into()
                },
            ]),
        }));
    }

    #[test]
    fn class_attribute_values_become_enumerations_and_rules() {
        let g = run(
            "Class attributes\nATTRIBUTE NAME~~CONCEPT NAME~~VALUE TYPE~~VALUES~~CARDINALITY\n\
             gender~~Noun~~String~~masculine%feminine~~(0, n)\n",
            Generator::add_structured_attributes_from_table,
        );
        let enumeration = DataRange::one_of([Literal::plain("masculine"), Literal::plain("feminine")]);
        let axioms = g.store().axioms();
        assert!(axioms.contains(&Axiom::DataPropertyRange {
            property: "gender".into(),
            range: enumeration.clone(),
        }));
        assert!(axioms.contains(&Axiom::SubClassOf {
            sub: ClassExpression::named("Noun"),
            sup: ClassExpression::DataAllValuesFrom {
                property: "gender".into(),
                range: enumeration.clone(),
            },
        }));
        assert!(axioms.contains(&Axiom::SubClassOf {
            sub: ClassExpression::named("Noun"),
            sup: ClassExpression::DataExactCardinality {
                cardinality: 2,
                property: "gender".into(),
                range: Some(enumeration),
            },
        }));
    }

    #[test]
    fn relations_with_source_cardinality_and_characteristics() {
        let g = run(
            "Relations\nRELATION NAME~~SOURCE CONCEPT~~TARGET CONCEPT~~SOURCE CARDINALITY~~MATHEMATIC PROPERTIES\n\
             hasHead~~Phrase~~Word~~1~~Functional\n\
             precedes~~Word~~Word~~N~~Transitive\n",
            Generator::add_structured_relations_from_table,
        );
        let axioms = g.store().axioms();
        assert!(axioms.contains(&Axiom::ObjectPropertyDomain {
            property: "hasHead".into(),
            domain: ClassExpression::ObjectMaxCardinality {
                cardinality: 1,
                property: "hasHead".into(),
                filler: Box::new(ClassExpression::named("Phrase")),
            },
        }));
        assert!(axioms.contains(&Axiom::ObjectPropertyCharacteristic {
            property: "precedes".into(),
            characteristic: ObjectCharacteristic::Transitive,
        }));
        assert!(!axioms.iter().any(|a| matches!(
            a,
            Axiom::ObjectPropertyDomain { property, domain: ClassExpression::ObjectMaxCardinality { .. } } if property == "precedes"
        )));
    }

    #[test]
    fn instance_assertions() {
        let g = run(
            "Instances\nINSTANCE NAME~~CONCEPT NAME~~ATTRIBUTE~~VALUE\n\
             First Person~~Person~~Precedes~~Second Person\n\
             First Person~~Person~~isDeictic~~TRUE\n\
             Second Person~~Person~~isDeictic~~--\n",
            Generator::add_structured_instances_from_table,
        );
        let axioms = g.store().axioms();
        assert!(axioms.contains(&Axiom::ObjectPropertyAssertion {
            property: "precedes".into(),
            subject: "FirstPerson".into(),
            object: "SecondPerson".into(),
        }));
        assert!(axioms.contains(&Axiom::DataPropertyAssertion {
            property: "isDeictic".into(),
            subject: "FirstPerson".into(),
            value: Literal::boolean(true),
        }));
        assert_eq!(
            axioms.iter().filter(|a| matches!(a, Axiom::DataPropertyAssertion { .. })).count(),
            1
        );
        assert_eq!(
            axioms.iter().filter(|a| matches!(a, Axiom::ClassAssertion { .. })).count(),
            2
        );
    }
}
