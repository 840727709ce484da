//! The generator: one ontology build's state.
//!
//! A [`Generator`] owns the configuration, the compiled cell grammar, the
//! target store and the set of table files already processed. Every table
//! operation is a method on it; the operations live in the assembler
//! modules ([`crate::taxonomy`], [`crate::decomposition`], ...).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use owlgen_ontology::{Axiom, Entity, MemoryStore, OntologyStore};

use crate::builder;
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::grammar::{CellGrammar, TableRef};
use crate::naming;

/// State of one ontology build run.
#[derive(Debug)]
pub struct Generator<S = MemoryStore> {
    pub(crate) config: GeneratorConfig,
    pub(crate) grammar: CellGrammar,
    pub(crate) store: S,
    pub(crate) processed: BTreeSet<PathBuf>,
}

impl Generator<MemoryStore> {
    /// Creates a generator over a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if the cell grammar fails to compile.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let store = MemoryStore::new(config.header());
        Self::with_store(config, store)
    }
}

impl<S: OntologyStore> Generator<S> {
    /// Creates a generator writing into `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if the cell grammar fails to compile.
    pub fn with_store(config: GeneratorConfig, store: S) -> Result<Self> {
        Ok(Self {
            config,
            grammar: CellGrammar::new()?,
            store,
            processed: BTreeSet::new(),
        })
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The compiled cell grammar.
    #[must_use]
    pub fn grammar(&self) -> &CellGrammar {
        &self.grammar
    }

    /// The ontology built so far.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the ontology, for callers adding their own axioms.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the generator, returning the ontology.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Table files whose axioms have been added in this run.
    #[must_use]
    pub fn processed_tables(&self) -> &BTreeSet<PathBuf> {
        &self.processed
    }

    /// Adds axioms to the store, returning how many were new.
    pub(crate) fn add(&mut self, axioms: impl IntoIterator<Item = Axiom>) -> usize {
        self.store.add_axioms(axioms)
    }

    /// Label axiom for `entity`, only when it is not yet in the signature.
    ///
    /// This is the "define labels only for new concepts" guard: an entity
    /// introduced by an earlier table keeps the label it got there.
    pub(crate) fn label_if_new(&self, entity: &Entity, text: &str) -> Option<Axiom> {
        (!self.store.contains_in_signature(entity)).then(|| builder::label(entity.clone(), text))
    }

    /// Resolves a table jump to a file in the source directory.
    ///
    /// Candidates are tried in file-name order.
    pub(crate) fn resolve_jump(&self, reference: &TableRef) -> Result<PathBuf> {
        let dir = &self.config.source_dir;
        let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
            .into_iter()
            .find(|name| reference.matches_file(name))
            .map(|name| dir.join(name))
            .ok_or_else(|| Error::JumpTargetNotFound {
                reference: reference.to_string(),
                dir: dir.clone(),
            })
    }

    /// Marks a table as processed. Returns `false` when it already was.
    pub(crate) fn mark_processed(&mut self, path: &Path) -> bool {
        self.processed.insert(path.to_path_buf())
    }

    /// Class named by a concept cell: `/` becomes `-` and a parenthesized
    /// detail is dropped. Returns the class name and its label text.
    pub(crate) fn class_cell(&self, cell: &str) -> (String, String) {
        let text = naming::dehyphenate(cell.trim());
        let text = match self.grammar.detail(&text) {
            Some(d) => d.name.to_owned(),
            None => text,
        };
        (naming::class_name(&text), text)
    }
}
