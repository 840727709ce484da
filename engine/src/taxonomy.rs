//! Taxonomy assembler.
//!
//! Two row layouts produce subclass hierarchies:
//!
//! - **Chain**: each row is a path `generalization~~specialization~~...`,
//!   walked pairwise. A specialization cell may jump to another table
//!   (`[Continued in Table N]`) or end the walk (`$TOP`).
//! - **Pair**: each row is `specialization~~generalization`.
//!
//! Jump targets are processed at most once per run.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use owlgen_ontology::{Axiom, Entity, EntityKind, OntologyStore};
use serde::Deserialize;
use tracing::{debug, info};

use crate::builder;
use crate::config::TaxonomyLabels;
use crate::error::Result;
use crate::generator::Generator;
use crate::naming;
use crate::syntax::STOP;
use crate::table::{RowMode, TableReader};

/// Row layout of a taxonomy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyLayout {
    /// `generalization~~specialization~~...` paths.
    #[default]
    Chain,
    /// `specialization~~generalization` pairs.
    Pair,
}

/// One side of a subclass pair after cell parsing.
struct Side {
    class: String,
    text: String,
}

impl<S: OntologyStore> Generator<S> {
    /// Adds the subclass hierarchy of a taxonomy table.
    ///
    /// Returns the number of new axioms, including those of jumped-to tables.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read or a jump target does not exist.
    pub fn add_taxonomy_from_table(&mut self, file: &str, layout: TaxonomyLayout) -> Result<usize> {
        let path = self.config.table_path(file);
        let before = self.store.axioms().len();
        let reader = TableReader::open(&path, RowMode::Records)?;
        self.mark_processed(&path);
        self.process_taxonomy(reader, &path, layout)?;
        let added = self.store.axioms().len() - before;
        info!(table = file, axioms = added, "taxonomy added");
        Ok(added)
    }

    /// Tables are marked processed only once their header has been read.
    fn process_taxonomy(
        &mut self,
        reader: TableReader<BufReader<File>>,
        path: &Path,
        layout: TaxonomyLayout,
    ) -> Result<()> {
        let mut axioms = Vec::new();
        for row in reader {
            let row = row?;
            let cells: Vec<&str> = row.cells().iter().map(String::as_str).collect();
            match layout {
                TaxonomyLayout::Chain => axioms.extend(self.chain_axioms(&cells)?),
                TaxonomyLayout::Pair => axioms.extend(self.pair_axioms(&cells)),
            }
        }
        let added = self.add(axioms);
        debug!(table = %path.display(), axioms = added, "taxonomy table processed");
        Ok(())
    }

    /// Walks one chain row pairwise.
    fn chain_axioms(&mut self, cells: &[&str]) -> Result<Vec<Axiom>> {
        let mut axioms = Vec::new();
        for pair in cells.windows(2) {
            let (generalization, specialization) = (pair[0], pair[1]);
            if let Some(reference) = self.grammar.jump(specialization) {
                let target = self.resolve_jump(&reference)?;
                if !self.processed.contains(&target) {
                    let reader = TableReader::open(&target, RowMode::Records)?;
                    self.mark_processed(&target);
                    debug!(jump = %reference, file = %target.display(), "following table jump");
                    self.process_taxonomy(reader, &target, TaxonomyLayout::Chain)?;
                }
                break;
            }
            if specialization.trim() == STOP {
                break;
            }
            if generalization.trim().is_empty() || specialization.trim().is_empty() {
                continue;
            }
            let mut gen = self.chain_side(generalization, &mut axioms);
            let mut spec = self.chain_side(specialization, &mut axioms);
            if self.config.taxonomy_labels == TaxonomyLabels::Cross {
                std::mem::swap(&mut gen.text, &mut spec.text);
            }
            axioms.push(builder::subclass(&spec.class, &gen.class));
            axioms.push(builder::label(Entity::class(&gen.class), &gen.text));
            axioms.push(builder::label(Entity::class(&spec.class), &spec.text));
        }
        Ok(axioms)
    }

    /// Parses one chain cell, pushing its synonym cluster if it has one.
    fn chain_side(&self, cell: &str, axioms: &mut Vec<Axiom>) -> Side {
        let cell = naming::dehyphenate(cell.trim());
        match self.grammar.detail(&cell) {
            Some(d) if d.is_open_close() => {
                let text = d.suffixed_name();
                Side {
                    class: naming::class_name(&text),
                    text,
                }
            }
            Some(d) => {
                let class = naming::class_name(d.name);
                axioms.extend(builder::synonym_cluster(EntityKind::Class, &class, d.details()));
                Side {
                    class,
                    text: d.name.to_owned(),
                }
            }
            None => Side {
                class: naming::class_name(&cell),
                text: cell,
            },
        }
    }

    /// One `specialization~~generalization` row, each side labelled with its own text.
    fn pair_axioms(&self, cells: &[&str]) -> Vec<Axiom> {
        let (Some(specialization), Some(generalization)) = (cells.first(), cells.get(1)) else {
            return Vec::new();
        };
        let [spec, gen] = [specialization, generalization].map(|cell| {
            let cell = naming::dehyphenate(cell.trim());
            let text = match self.grammar.detail(&cell) {
                Some(d) if d.is_open_close() => d.suffixed_name(),
                Some(d) => d.name.to_owned(),
                None => cell,
            };
            Side {
                class: naming::class_name(&text),
                text,
            }
        });
        if spec.class.is_empty() || gen.class.is_empty() {
            return Vec::new();
        }
        vec![
            builder::subclass(&spec.class, &gen.class),
            builder::label(Entity::class(&spec.class), &spec.text),
            builder::label(Entity::class(&gen.class), &gen.text),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use owlgen_ontology::{AnnotationProperty, ClassExpression, Literal};

    use super::*;
    use crate::config::GeneratorConfig;

    fn setup(files: &[(&str, &str)]) -> (tempfile::TempDir, Generator) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        let cfg = GeneratorConfig::new("http://localhost/", dir.path(), "T").with_version("1");
        let g = Generator::new(cfg).unwrap();
        (dir, g)
    }

    fn labels_of(g: &Generator, class: &str) -> BTreeSet<String> {
        g.store()
            .axioms()
            .iter()
            .filter_map(|a| match a {
                Axiom::AnnotationAssertion {
                    subject,
                    property: AnnotationProperty::Label,
                    value,
                } if subject == &Entity::class(class) => Some(value.lexical.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn stop_token_ends_the_walk() {
        let (_dir, mut g) = setup(&[("Table 1.txt", "Words\nGEN~~SPEC~~SPEC\nVerb~~Noun~~$TOP\n")]);
        g.add_taxonomy_from_table("Table 1.txt", TaxonomyLayout::Chain).unwrap();
        let subclasses: Vec<_> = g
            .store()
            .axioms()
            .iter()
            .filter(|a| matches!(a, Axiom::SubClassOf { .. }))
            .collect();
        assert_eq!(subclasses, vec![&builder::subclass("Noun", "Verb")]);
        assert_eq!(labels_of(&g, "Verb"), BTreeSet::from(["Noun".to_owned()]));
        assert_eq!(labels_of(&g, "Noun"), BTreeSet::from(["Verb".to_owned()]));
        assert_eq!(g.store().axioms().len(), 3);
    }

    #[test]
    fn own_labels_mode() {
        let (dir, _) = setup(&[("Table 1.txt", "Words\nGEN~~SPEC\nVerb~~Noun\n")]);
        let cfg = GeneratorConfig::new("http://localhost/", dir.path(), "T")
            .with_version("1")
            .with_taxonomy_labels(TaxonomyLabels::Own);
        let mut g = Generator::new(cfg).unwrap();
        g.add_taxonomy_from_table("Table 1.txt", TaxonomyLayout::Chain).unwrap();
        assert_eq!(labels_of(&g, "Verb"), BTreeSet::from(["Verb".to_owned()]));
    }

    #[test]
    fn synonyms_and_open_close_suffixes() {
        let (_dir, mut g) = setup(&[(
            "Table 1.txt",
            "Marks\nGEN~~SPEC\nPunctuation Mark (Punctuation)~~Bracket (Open)~~Round/Square\n",
        )]);
        g.add_taxonomy_from_table("Table 1.txt", TaxonomyLayout::Chain).unwrap();
        let axioms = g.store().axioms();
        assert!(axioms.contains(&builder::subclass("Bracket_Open", "PunctuationMark")));
        assert!(axioms.contains(&builder::subclass("Round-Square", "Bracket_Open")));
        assert!(axioms.contains(&Axiom::EquivalentClasses(BTreeSet::from([
            ClassExpression::named("Punctuation"),
            ClassExpression::named("PunctuationMark"),
        ]))));
        assert!(!g.store().contains_in_signature(&Entity::class("Open")));
    }

    #[test]
    fn repeated_jumps_process_the_target_once() {
        let (_dir, mut g) = setup(&[
            (
                "Table 1 - Words.txt",
                "Words\nGEN~~SPEC\nWord~~Noun~~[Continued in Table 2]\nWord~~Verb~~[Continued in Table 2]\n",
            ),
            ("Table 2 - Nouns.txt", "Nouns\nGEN~~SPEC\nNoun~~Proper Noun\n"),
        ]);
        let added = g
            .add_taxonomy_from_table("Table 1 - Words.txt", TaxonomyLayout::Chain)
            .unwrap();
        let proper: Vec<_> = g
            .store()
            .axioms()
            .iter()
            .filter(|a| **a == builder::subclass("ProperNoun", "Noun"))
            .collect();
        assert_eq!(proper.len(), 1);
        assert_eq!(g.processed_tables().len(), 2);
        assert_eq!(added, g.store().axioms().len());
    }

    #[test]
    fn missing_jump_target_is_fatal() {
        let (_dir, mut g) = setup(&[(
            "Table 1.txt",
            "Words\nGEN~~SPEC\nWord~~Noun~~[Continued in Table 9]\n",
        )]);
        let err = g
            .add_taxonomy_from_table("Table 1.txt", TaxonomyLayout::Chain)
            .unwrap_err();
        assert!(err.to_string().contains("Table 9"));
    }

    #[test]
    fn unreadable_jump_target_stays_unprocessed() {
        let (dir, mut g) = setup(&[
            ("Table 1.txt", "Words\nGEN~~SPEC\nWord~~Noun~~[Continued in Table 2]\n"),
            ("Table 2.txt", "Nouns\n"),
            ("Table 3.txt", "Nouns again\nGEN~~SPEC\nWord~~Noun~~[Continued in Table 2]\n"),
        ]);
        assert!(g.add_taxonomy_from_table("Table 1.txt", TaxonomyLayout::Chain).is_err());
        let table_2 = dir.path().join("Table 2.txt");
        assert!(!g.processed_tables().contains(&table_2));

        std::fs::write(&table_2, "Nouns\nGEN~~SPEC\nNoun~~Proper Noun\n").unwrap();
        g.add_taxonomy_from_table("Table 3.txt", TaxonomyLayout::Chain).unwrap();
        assert!(g.processed_tables().contains(&table_2));
        assert!(g.store().axioms().contains(&builder::subclass("ProperNoun", "Noun")));
    }

    #[test]
    fn pair_layout_labels_each_side_with_its_own_text() {
        let (_dir, mut g) = setup(&[(
            "taxonomy.txt",
            "Taxonomy\nSUBCLASS~~SUPERCLASS\nProper Noun~~Noun\nBracket (Open)~~Mark (Close)\n",
        )]);
        g.add_taxonomy_from_table("taxonomy.txt", TaxonomyLayout::Pair).unwrap();
        let axioms = g.store().axioms();
        assert!(axioms.contains(&builder::subclass("ProperNoun", "Noun")));
        assert!(axioms.contains(&builder::subclass("Bracket_Open", "Mark_Close")));
        assert!(axioms.contains(&Axiom::AnnotationAssertion {
            subject: Entity::class("ProperNoun"),
            property: AnnotationProperty::Label,
            value: Literal::en("Proper Noun"),
        }));
    }
}
