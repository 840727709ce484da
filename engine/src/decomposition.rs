//! Decomposition assembler.
//!
//! A decomposition states that a target class is covered by its components
//! (exhaustive), and additionally that the components are pairwise disjoint
//! subclasses of it (disjoint). Rows are grouped by a key with a
//! flush-on-change sweep; the last group is flushed after the loop.

use std::collections::BTreeSet;

use owlgen_ontology::{Axiom, ClassExpression, OntologyStore};
use serde::Deserialize;
use tracing::{debug, info};

use crate::builder;
use crate::error::Result;
use crate::generator::Generator;
use crate::naming;
use crate::table::{Column, ColumnRule, RowMode, Table};

/// Which axioms a decomposition group produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionKind {
    /// Disjointness, equivalence to the union, and one subclass per component.
    Disjoint,
    /// Equivalence to the union only.
    Exhaustive,
}

/// One flushed group: a target and its components, as class names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompositionGroup {
    /// Target class.
    pub target: String,
    /// Component classes.
    pub components: BTreeSet<String>,
}

impl DecompositionGroup {
    /// The axioms this group contributes.
    #[must_use]
    pub fn axioms(&self, kind: DecompositionKind) -> Vec<Axiom> {
        let members = self.components.iter().cloned().map(ClassExpression::Class);
        let mut axioms = Vec::new();
        if kind == DecompositionKind::Disjoint && self.components.len() > 1 {
            axioms.push(Axiom::DisjointClasses(members.clone().collect()));
        }
        if let Some(union) = ClassExpression::union_or_single(members) {
            let pair = BTreeSet::from([ClassExpression::named(&self.target), union]);
            if pair.len() == 2 {
                axioms.push(Axiom::EquivalentClasses(pair));
            }
        }
        if kind == DecompositionKind::Disjoint {
            axioms.extend(
                self.components
                    .iter()
                    .map(|component| builder::subclass(component, &self.target)),
            );
        }
        axioms
    }
}

/// Groups consecutive rows sharing a key.
///
/// Each row is `(key, target, component)`; a new group starts whenever the
/// key differs from the previous row's. Callers wanting one group per
/// distinct key sort the rows first.
pub fn sweep<K: PartialEq>(
    rows: impl IntoIterator<Item = (K, String, String)>,
) -> Vec<DecompositionGroup> {
    let mut groups = Vec::new();
    let mut current: Option<(K, DecompositionGroup)> = None;
    for (key, target, component) in rows {
        match &mut current {
            Some((reference, group)) if *reference == key => {
                group.components.insert(component);
            }
            _ => {
                if let Some((_, group)) = current.take() {
                    groups.push(group);
                }
                current = Some((
                    key,
                    DecompositionGroup {
                        target,
                        components: BTreeSet::from([component]),
                    },
                ));
            }
        }
    }
    // the last group never sees a key change
    groups.extend(current.map(|(_, group)| group));
    groups
}

const GROUPED_RULES: &[ColumnRule] = &[
    ColumnRule::contains(Column::GroupComponents, &["GROUP COMPONENTS"]),
    ColumnRule::contains(Column::Group, &["GROUP"]),
    ColumnRule::contains(Column::Target, &["TARGET"]),
];

impl<S: OntologyStore> Generator<S> {
    /// Adds decompositions from a `target~~component` record table.
    ///
    /// Only record lines (`...$CRLF~~...`) are read. Pairs are sorted by target
    /// so every target yields exactly one group.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read.
    pub fn add_decompositions_from_table(
        &mut self,
        file: &str,
        kind: DecompositionKind,
    ) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::RecordsOnly)?;
        let mut pairs: Vec<(String, String)> = table
            .rows
            .iter()
            .filter_map(|row| {
                let target = naming::class_name(row.cell(0)?);
                let component = naming::class_name(row.cell(1)?);
                (!target.is_empty() && !component.is_empty()).then_some((target, component))
            })
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let groups = sweep(pairs.into_iter().map(|(t, c)| (t.clone(), t, c)));
        Ok(self.add_groups(file, &groups, kind))
    }

    /// Adds decompositions from a table with `GROUP`, `GROUP COMPONENTS` and
    /// `TARGET` columns, grouping consecutive rows by `(group, target)`.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read or lacks one of the three columns.
    pub fn add_grouped_decompositions_from_table(
        &mut self,
        file: &str,
        kind: DecompositionKind,
    ) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::Plain)?;
        let columns = table.columns(GROUPED_RULES);
        let group_col = columns.require(Column::Group, &table.path)?;
        let component_col = columns.require(Column::GroupComponents, &table.path)?;
        let target_col = columns.require(Column::Target, &table.path)?;
        let rows = table.rows.iter().filter_map(|row| {
            let group = row.cell(group_col)?.trim().to_owned();
            let target = row.cell(target_col)?.trim().to_owned();
            let component = naming::class_name(row.cell(component_col)?);
            Some(((group, target.clone()), naming::class_name(&target), component))
        });
        let groups = sweep(rows);
        Ok(self.add_groups(file, &groups, kind))
    }

    fn add_groups(&mut self, file: &str, groups: &[DecompositionGroup], kind: DecompositionKind) -> usize {
        let mut added = 0;
        for group in groups {
            let n = self.add(group.axioms(kind));
            debug!(class = %group.target, components = group.components.len(), axioms = n, "decomposition group flushed");
            added += n;
        }
        info!(table = file, ?kind, groups = groups.len(), axioms = added, "decompositions added");
        added
    }
}
