//! Part-of assembler.
//!
//! Follows the simple part-whole pattern: a transitive `partOf` with its
//! inverse `hasPart`, and non-transitive `_directly` sub-properties. Each
//! holonym is closed over its meronyms with a universal `hasPart`
//! restriction.

use std::collections::BTreeSet;

use owlgen_ontology::{Axiom, ClassExpression, Entity, ObjectCharacteristic, OntologyStore};
use tracing::{debug, info};

use crate::builder;
use crate::error::Result;
use crate::generator::Generator;
use crate::naming;
use crate::table::{Column, ColumnRule, RowMode, Table};

/// Whole-to-part property.
pub const HAS_PART: &str = "hasPart";
/// Part-to-whole property.
pub const PART_OF: &str = "partOf";

const PART_OF_RULES: &[ColumnRule] = &[
    ColumnRule::contains(Column::Holonym, &["HOLONYM"]),
    ColumnRule::contains(Column::Meronym, &["MERONYM"]),
];

/// The meronymy property set, with labels.
#[must_use]
pub fn meronymy_property_set() -> Vec<Axiom> {
    let part_of_directly = format!("{PART_OF}_directly");
    let has_part_directly = format!("{HAS_PART}_directly");
    let mut axioms = vec![
        Axiom::ObjectPropertyCharacteristic {
            property: PART_OF.into(),
            characteristic: ObjectCharacteristic::Transitive,
        },
        Axiom::InverseObjectProperties(PART_OF.into(), HAS_PART.into()),
        Axiom::ObjectPropertyCharacteristic {
            property: HAS_PART.into(),
            characteristic: ObjectCharacteristic::Transitive,
        },
        Axiom::SubObjectPropertyOf {
            sub: part_of_directly.clone(),
            sup: PART_OF.into(),
        },
        Axiom::SubObjectPropertyOf {
            sub: has_part_directly.clone(),
            sup: HAS_PART.into(),
        },
        Axiom::InverseObjectProperties(part_of_directly.clone(), has_part_directly.clone()),
    ];
    for name in [PART_OF, HAS_PART, part_of_directly.as_str(), has_part_directly.as_str()] {
        axioms.push(builder::label(Entity::object_property(name), &name.replace('_', " ")));
    }
    axioms
}

impl<S: OntologyStore> Generator<S> {
    /// Adds the meronymy property set and one `hasPart` closure per holonym
    /// of a `HOLONYM~~MERONYM` table.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read or lacks either column.
    pub fn add_part_of_axioms_from_table(&mut self, file: &str) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::Plain)?;
        let columns = table.columns(PART_OF_RULES);
        let holonym_col = columns.require(Column::Holonym, &table.path)?;
        let meronym_col = columns.require(Column::Meronym, &table.path)?;

        // holonyms in first-seen order, each with its meronym cells
        let mut wholes: Vec<(&str, Vec<&str>)> = Vec::new();
        for row in &table.rows {
            let (Some(holonym), Some(meronym)) = (row.cell(holonym_col), row.cell(meronym_col)) else {
                continue;
            };
            match wholes.iter_mut().find(|(h, _)| *h == holonym) {
                Some((_, parts)) => parts.push(meronym),
                None => wholes.push((holonym, vec![meronym])),
            }
        }

        let mut axioms = meronymy_property_set();
        for (holonym, meronyms) in &wholes {
            let mut parts = BTreeSet::new();
            for meronym in meronyms {
                let (class, text) = self.part_cell(meronym);
                if class.is_empty() {
                    continue;
                }
                axioms.extend(self.label_if_new(&Entity::class(&class), &text));
                parts.insert(ClassExpression::Class(class));
            }
            let filler = match parts.len() {
                0 => continue,
                1 => parts.into_iter().next(),
                _ => Some(ClassExpression::IntersectionOf(parts)),
            };
            let (whole, text) = self.part_cell(holonym);
            if whole.is_empty() {
                continue;
            }
            axioms.extend(self.label_if_new(&Entity::class(&whole), &text));
            if let Some(filler) = filler {
                debug!(class = %whole, parts = meronyms.len(), "part-of closure");
                axioms.push(Axiom::SubClassOf {
                    sub: ClassExpression::named(&whole),
                    sup: ClassExpression::ObjectAllValuesFrom {
                        property: HAS_PART.into(),
                        filler: Box::new(filler),
                    },
                });
            }
        }
        let added = self.add(axioms);
        info!(table = file, holonyms = wholes.len(), axioms = added, "part-of axioms added");
        Ok(added)
    }

    fn part_cell(&self, cell: &str) -> (String, String) {
        let text = match self.grammar.part_detail(cell) {
            Some(d) => naming::dehyphenate(d.name).trim().to_owned(),
            None => cell.trim().to_owned(),
        };
        (naming::class_name(&text), text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;

    #[test]
    fn property_set_is_complete() {
        let axioms = meronymy_property_set();
        assert!(axioms.contains(&Axiom::InverseObjectProperties(
            "partOf_directly".into(),
            "hasPart_directly".into()
        )));
        assert!(axioms.contains(&builder::label(
            Entity::object_property("hasPart_directly"),
            "hasPart directly"
        )));
        assert_eq!(axioms.len(), 10);
    }

    #[test]
    fn holonyms_close_over_their_meronyms() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("parts.txt"),
            "Part-Of\nHOLONYM~~MERONYM\nWord~~Root (s.t.)\nWord~~Affix\nClause~~Verb Phrase\n",
        )
        .unwrap();
        let cfg = GeneratorConfig::new("http://localhost/", dir.path(), "T").with_version("1");
        let mut g = Generator::new(cfg).unwrap();
        g.add_part_of_axioms_from_table("parts.txt").unwrap();
        let axioms = g.store().axioms();
        assert!(axioms.contains(&Axiom::SubClassOf {
            sub: ClassExpression::named("Word"),
            sup: ClassExpression::ObjectAllValuesFrom {
                property: HAS_PART.into(),
                filler: Box::new(ClassExpression::intersection_of([
                    ClassExpression::named("Root"),
                    ClassExpression::named("Affix"),
                ])),
            },
        }));
        assert!(axioms.contains(&Axiom::SubClassOf {
            sub: ClassExpression::named("Clause"),
            sup: ClassExpression::ObjectAllValuesFrom {
                property: HAS_PART.into(),
                filler: Box::new(ClassExpression::named("VerbPhrase")),
            },
        }));
        assert!(axioms.contains(&builder::label(Entity::class("VerbPhrase"), "Verb Phrase")));
    }
}
