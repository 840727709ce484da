//! Conformance checks for generated ontologies.
//!
//! Two kinds of input are validated:
//!
//! | Input | Checks |
//! |-------|--------|
//! | Turtle artifacts (`.ttl`) | well-formed prefixes, `owl:Ontology`, terminated blocks |
//! | N-Triples artifacts (`.nt`) | one `subject predicate object .` triple per line |
//! | JSON-LD artifacts (`.jsonld`) | parses, `@context`, non-empty `@graph`, absolute ids |
//! | Functional syntax (`.ofn`) | `Ontology(` block, balanced parentheses |
//! | A built store | n-ary axioms have two members, inverse pairs are in the signature |
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let report = owlgen_conformance::run_all(Path::new("public"))?;
//! assert!(report.all_passed());
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::path::Path;

use owlgen_ontology::OntologyStore;

pub use report::{ConformanceReport, Severity, TestResult};

/// Runs every artifact validator over the files in `artifacts`.
///
/// # Errors
///
/// Returns an error only if a file system operation fails.
pub fn run_all(artifacts: &Path) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    report.extend(validators::rdf::validate(artifacts)?);
    report.extend(validators::jsonld::validate(artifacts)?);
    report.extend(validators::functional::validate(artifacts)?);
    Ok(report)
}

/// Runs the store checks over a built ontology.
pub fn check_store<S: OntologyStore + ?Sized>(store: &S) -> ConformanceReport {
    validators::store::validate(store)
}
