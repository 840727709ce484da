//! Class individuals assembler.

use owlgen_ontology::{Axiom, ClassExpression, Entity, OntologyStore};
use tracing::info;

use crate::builder;
use crate::error::Result;
use crate::generator::Generator;
use crate::naming;
use crate::syntax;
use crate::table::{Column, ColumnRule, RowMode, Table};

const INDIVIDUAL_RULES: &[ColumnRule] = &[
    ColumnRule::contains(Column::Concept, &["CONCEPTS", "CONCEPT NAME"]),
    ColumnRule::contains(Column::Instance, &["INSTANCES", "INSTANCE NAME"]),
    ColumnRule::contains(Column::Description, &["DESCRIPTION"]),
];

/// Subscript marker in instance labels: `X_csubY` reads `X(Y)`.
const SUBSCRIPT: &str = "_csub";

/// Label text with the subscript marker rendered as parentheses.
fn render_subscript(label: &str) -> String {
    if label.contains(SUBSCRIPT) {
        format!("{})", label.replace(SUBSCRIPT, "("))
    } else {
        label.to_owned()
    }
}

impl<S: OntologyStore> Generator<S> {
    /// Adds named individuals from a `CONCEPT NAME~~INSTANCE NAME` table.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read or lacks the concept or instance column.
    pub fn add_class_individuals_from_table(&mut self, file: &str) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::Plain)?;
        let columns = table.columns(INDIVIDUAL_RULES);
        let class_col = columns.require(Column::Concept, &table.path)?;
        let instance_col = columns.require(Column::Instance, &table.path)?;

        let mut axioms = Vec::new();
        for row in &table.rows {
            let (Some(class), Some(instance)) = (row.cell(class_col), row.cell(instance_col)) else {
                continue;
            };
            let class = match self.grammar.class_detail(class) {
                Some(d) => d.name.to_owned(),
                None => class.trim().to_owned(),
            };
            let mut label = instance.trim().to_owned();
            let name = match self.grammar.instance_detail(&label) {
                Some(d) if d.is_open_close() => format!("{}_{}", d.name, d.detail),
                Some(d) => {
                    let name = d.name.to_owned();
                    label.clone_from(&name);
                    name
                }
                None => label.clone(),
            };
            let individual = naming::individual_name(&name);
            if class.is_empty() || individual.is_empty() {
                continue;
            }
            axioms.push(Axiom::ClassAssertion {
                class: ClassExpression::named(naming::class_name(&class)),
                individual: individual.clone(),
            });
            axioms.push(builder::label(Entity::individual(&individual), &render_subscript(&label)));
            if let Some(description) = row.get(&columns, Column::Description) {
                if !syntax::is_nothing(description) {
                    axioms.push(builder::comment(Entity::individual(&individual), description));
                }
            }
        }
        let added = self.add(axioms);
        info!(table = file, axioms = added, "class individuals added");
        Ok(added)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;

    #[test]
    fn subscripts_render_as_parentheses() {
        assert_eq!(render_subscript("H_csub2O"), "H(2O)");
        assert_eq!(render_subscript("plain"), "plain");
    }

    #[test]
    fn individuals_with_details() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("individuals.txt"),
            "Individuals\nCONCEPT NAME~~INSTANCE NAME~~DESCRIPTION\n\
             Bracket~~Parenthesis (Open)~~An opening one\n\
             Person (Grammatical)~~First Person (1st)~~--\n",
        )
        .unwrap();
        let cfg = GeneratorConfig::new("http://localhost/", dir.path(), "T").with_version("1");
        let mut g = Generator::new(cfg).unwrap();
        g.add_class_individuals_from_table("individuals.txt").unwrap();
        let axioms = g.store().axioms();
        assert!(axioms.contains(&Axiom::ClassAssertion {
            class: ClassExpression::named("Bracket"),
            individual: "Parenthesis_Open".into(),
        }));
        assert!(axioms.contains(&Axiom::ClassAssertion {
            class: ClassExpression::named("Person"),
            individual: "FirstPerson".into(),
        }));
        assert!(axioms.contains(&builder::label(Entity::individual("FirstPerson"), "First Person")));
        assert!(axioms.contains(&builder::comment(
            Entity::individual("Parenthesis_Open"),
            "An opening one"
        )));
        assert_eq!(axioms.len(), 5);
    }
}
