//! Build plans.
//!
//! A build plan is a TOML document naming the ontology and the ordered
//! table steps that produce it:
//!
//! ```toml
//! [ontology]
//! base_url = "http://localhost/"
//! source_dir = "tables"
//! ontology_name = "Linguistic Units"
//!
//! [[step]]
//! kind = "taxonomy"
//! table = "Table 1. Units.txt"
//!
//! [[step]]
//! kind = "decomposition"
//! table = "Table 2. Unit Decomposition.txt"
//! flavor = "disjoint"
//! ```
//!
//! Steps run in order against one generator. A failing step is logged and
//! skipped; the axioms of the steps before it stay in the store.

use std::fmt;
use std::path::Path;

use owlgen_ontology::OntologyStore;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::decomposition::DecompositionKind;
use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::glossary::GlossaryKind;
use crate::taxonomy::TaxonomyLayout;

/// One table operation of a build plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// [`Generator::add_taxonomy_from_table`].
    Taxonomy {
        /// Table file.
        table: String,
        /// Row layout, `chain` by default.
        #[serde(default)]
        layout: TaxonomyLayout,
    },
    /// [`Generator::add_decompositions_from_table`].
    Decomposition {
        /// Table file.
        table: String,
        /// `disjoint` or `exhaustive`.
        flavor: DecompositionKind,
    },
    /// [`Generator::add_grouped_decompositions_from_table`].
    GroupedDecomposition {
        /// Table file.
        table: String,
        /// `disjoint` or `exhaustive`.
        flavor: DecompositionKind,
    },
    /// [`Generator::add_part_of_axioms_from_table`].
    PartOf {
        /// Table file.
        table: String,
    },
    /// [`Generator::add_attributes_from_table`].
    Attributes {
        /// Table file.
        table: String,
    },
    /// [`Generator::add_ad_hoc_relations_from_table`].
    AdHocRelations {
        /// Table file.
        table: String,
    },
    /// [`Generator::add_attribute_rules_from_table`].
    AttributeRules {
        /// Table file.
        table: String,
    },
    /// [`Generator::add_class_individuals_from_table`].
    ClassIndividuals {
        /// Table file.
        table: String,
    },
    /// [`Generator::add_glossary_from_table`].
    Glossary {
        /// Table file.
        table: String,
        /// What the glossary lists.
        of: GlossaryKind,
    },
    /// [`Generator::add_structured_attributes_from_table`].
    StructuredAttributes {
        /// Table file.
        table: String,
    },
    /// [`Generator::add_structured_relations_from_table`].
    StructuredRelations {
        /// Table file.
        table: String,
    },
    /// [`Generator::add_structured_instances_from_table`].
    StructuredInstances {
        /// Table file.
        table: String,
    },
    /// [`Generator::add_footnotes_from_table`].
    Footnotes {
        /// Table file.
        table: String,
    },
    /// [`Generator::infer_inverse_relations`] over the whole store.
    InferInverses,
}

impl Step {
    /// The table file the step reads, if any.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        match self {
            Step::Taxonomy { table, .. }
            | Step::Decomposition { table, .. }
            | Step::GroupedDecomposition { table, .. }
            | Step::PartOf { table }
            | Step::Attributes { table }
            | Step::AdHocRelations { table }
            | Step::AttributeRules { table }
            | Step::ClassIndividuals { table }
            | Step::Glossary { table, .. }
            | Step::StructuredAttributes { table }
            | Step::StructuredRelations { table }
            | Step::StructuredInstances { table }
            | Step::Footnotes { table } => Some(table),
            Step::InferInverses => None,
        }
    }

    /// Short operation name, as written in plans.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Taxonomy { .. } => "taxonomy",
            Step::Decomposition { .. } => "decomposition",
            Step::GroupedDecomposition { .. } => "grouped_decomposition",
            Step::PartOf { .. } => "part_of",
            Step::Attributes { .. } => "attributes",
            Step::AdHocRelations { .. } => "ad_hoc_relations",
            Step::AttributeRules { .. } => "attribute_rules",
            Step::ClassIndividuals { .. } => "class_individuals",
            Step::Glossary { .. } => "glossary",
            Step::StructuredAttributes { .. } => "structured_attributes",
            Step::StructuredRelations { .. } => "structured_relations",
            Step::StructuredInstances { .. } => "structured_instances",
            Step::Footnotes { .. } => "footnotes",
            Step::InferInverses => "infer_inverses",
        }
    }

    /// Runs the step, returning the number of new axioms.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying table operation.
    pub fn execute<S: OntologyStore>(&self, generator: &mut Generator<S>) -> Result<usize> {
        match self {
            Step::Taxonomy { table, layout } => generator.add_taxonomy_from_table(table, *layout),
            Step::Decomposition { table, flavor } => {
                generator.add_decompositions_from_table(table, *flavor)
            }
            Step::GroupedDecomposition { table, flavor } => {
                generator.add_grouped_decompositions_from_table(table, *flavor)
            }
            Step::PartOf { table } => generator.add_part_of_axioms_from_table(table),
            Step::Attributes { table } => generator.add_attributes_from_table(table),
            Step::AdHocRelations { table } => generator.add_ad_hoc_relations_from_table(table),
            Step::AttributeRules { table } => generator.add_attribute_rules_from_table(table),
            Step::ClassIndividuals { table } => generator.add_class_individuals_from_table(table),
            Step::Glossary { table, of } => generator.add_glossary_from_table(table, *of),
            Step::StructuredAttributes { table } => {
                generator.add_structured_attributes_from_table(table)
            }
            Step::StructuredRelations { table } => {
                generator.add_structured_relations_from_table(table)
            }
            Step::StructuredInstances { table } => {
                generator.add_structured_instances_from_table(table)
            }
            Step::Footnotes { table } => generator.add_footnotes_from_table(table),
            Step::InferInverses => Ok(generator.infer_inverse_relations()),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table() {
            Some(table) => write!(f, "{}({table})", self.kind()),
            None => f.write_str(self.kind()),
        }
    }
}

/// A parsed build plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildPlan {
    /// Ontology configuration.
    pub ontology: GeneratorConfig,
    /// Steps in execution order.
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

/// A step that failed during [`BuildPlan::run_on`].
#[derive(Debug)]
pub struct StepFailure {
    /// Position of the step in the plan.
    pub index: usize,
    /// The step, as displayed.
    pub step: String,
    /// What went wrong.
    pub error: Error,
}

/// Outcome of running a plan.
#[derive(Debug, Default)]
pub struct BuildSummary {
    /// Steps attempted.
    pub steps_run: usize,
    /// New axioms over all successful steps.
    pub axioms_added: usize,
    /// Steps that failed, in order.
    pub failures: Vec<StepFailure>,
}

impl BuildSummary {
    /// Returns `true` when every step succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

impl BuildPlan {
    /// Parses a plan from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlanSyntax`] for malformed TOML or a schema mismatch,
    /// and [`Error::Plan`] for a plan without an ontology name or base URL or
    /// with a step naming an empty table.
    pub fn from_toml(text: &str) -> Result<Self> {
        let plan: BuildPlan = toml::from_str(text)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Reads a plan file. A relative `source_dir` is taken relative to the
    /// directory holding the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read, and the errors of
    /// [`BuildPlan::from_toml`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut plan = Self::from_toml(&text)?;
        if plan.ontology.source_dir.is_relative() {
            if let Some(base) = path.parent() {
                plan.ontology.source_dir = base.join(&plan.ontology.source_dir);
            }
        }
        debug!(plan = %path.display(), steps = plan.steps.len(), "build plan loaded");
        Ok(plan)
    }

    fn validate(&self) -> Result<()> {
        if self.ontology.ontology_name.trim().is_empty() {
            return Err(Error::Plan("ontology_name is empty".into()));
        }
        if self.ontology.base_url.trim().is_empty() {
            return Err(Error::Plan("base_url is empty".into()));
        }
        if let Some((index, step)) = self
            .steps
            .iter()
            .enumerate()
            .find(|(_, step)| step.table().is_some_and(|t| t.trim().is_empty()))
        {
            return Err(Error::Plan(format!("step {index} ({}) names no table", step.kind())));
        }
        Ok(())
    }

    /// Runs every step against a fresh in-memory generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if the generator cannot be created. Step
    /// failures are reported in the summary instead.
    pub fn run(&self) -> Result<(Generator, BuildSummary)> {
        let mut generator = Generator::new(self.ontology.clone())?;
        let summary = self.run_on(&mut generator);
        Ok((generator, summary))
    }

    /// Runs every step against `generator`, continuing past failures.
    pub fn run_on<S: OntologyStore>(&self, generator: &mut Generator<S>) -> BuildSummary {
        let mut summary = BuildSummary::default();
        for (index, step) in self.steps.iter().enumerate() {
            summary.steps_run += 1;
            match step.execute(generator) {
                Ok(added) => {
                    debug!(%step, axioms = added, "step finished");
                    summary.axioms_added += added;
                }
                Err(error) => {
                    warn!(%step, %error, "step failed, continuing");
                    summary.failures.push(StepFailure {
                        index,
                        step: step.to_string(),
                        error,
                    });
                }
            }
        }
        info!(
            steps = summary.steps_run,
            failed = summary.failures.len(),
            axioms = summary.axioms_added,
            "build plan finished"
        );
        summary
    }
}
