//! Per-run generator configuration.

use std::path::{Path, PathBuf};

use owlgen_ontology::OntologyHeader;
use serde::Deserialize;

/// How the chain taxonomy walk labels the two classes of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyLabels {
    /// The generalization carries the specialization's text and vice versa.
    #[default]
    Cross,
    /// Each class is labelled with its own text.
    Own,
}

/// Configuration fixed once per ontology build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratorConfig {
    /// Base URL the ontology IRI is built on (e.g. `http://localhost/`).
    pub base_url: String,
    /// Directory holding the table files.
    pub source_dir: PathBuf,
    /// Human-readable ontology name.
    pub ontology_name: String,
    /// Version stamp; defaults to today's date as `yyyyMMdd`.
    #[serde(default = "today_stamp")]
    pub version: String,
    /// Label mode of the chain taxonomy walk.
    #[serde(default)]
    pub taxonomy_labels: TaxonomyLabels,
}

impl GeneratorConfig {
    /// Creates a configuration stamped with today's date.
    pub fn new(
        base_url: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        ontology_name: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            source_dir: source_dir.into(),
            ontology_name: ontology_name.into(),
            version: today_stamp(),
            taxonomy_labels: TaxonomyLabels::default(),
        }
    }

    /// Replaces the version stamp.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Replaces the taxonomy label mode.
    #[must_use]
    pub fn with_taxonomy_labels(mut self, labels: TaxonomyLabels) -> Self {
        self.taxonomy_labels = labels;
        self
    }

    /// The ontology header derived from base URL, name and version.
    #[must_use]
    pub fn header(&self) -> OntologyHeader {
        OntologyHeader::new(&self.base_url, &self.ontology_name, &self.version)
    }

    /// Path of a table file inside the source directory.
    #[must_use]
    pub fn table_path(&self, file: impl AsRef<Path>) -> PathBuf {
        self.source_dir.join(file)
    }

    /// Artifact file stem: `<ontology name> - <version>`.
    #[must_use]
    pub fn artifact_stem(&self) -> String {
        format!("{} - {}", self.ontology_name, self.version)
    }
}

/// Today's date formatted as `yyyyMMdd`.
#[must_use]
pub fn today_stamp() -> String {
    chrono::Local::now().format("%Y%m%d").to_string()
}
