//! `owlgen-build`: runs a build plan and writes the ontology artifacts.
//!
//! **Outputs** (`<stem>` is `<ontology name> - <version>`):
//! - `<out>/<stem>.ttl`: Turtle
//! - `<out>/<stem>.nt`: N-Triples
//! - `<out>/<stem>.jsonld`: JSON-LD
//! - `<out>/<stem>.ofn`: OWL functional syntax
//!
//! **Usage:**
//! ```text
//! owlgen-build --plan <file> [--out <path>] [--format turtle,ntriples] [--verbose]
//! ```
//!
//! Failing steps are reported and skipped. The exit code is non-zero only
//! when the plan cannot be loaded or an artifact cannot be written.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owlgen_engine::BuildPlan;
use owlgen_ontology::{EntityKind, Format, MemoryStore, OntologyStore};
use tracing_subscriber::EnvFilter;

/// Build an OWL ontology from knowledge tables.
#[derive(Parser)]
#[command(name = "owlgen-build", about = "Build an OWL ontology from a table build plan")]
struct Args {
    /// Build plan (TOML).
    #[arg(long)]
    plan: PathBuf,

    /// Output directory for generated artifacts.
    #[arg(long, default_value = "public")]
    out: PathBuf,

    /// Formats to write, comma separated. Defaults to all of them.
    #[arg(long, value_delimiter = ',')]
    format: Vec<Format>,

    /// Log each table as it is processed.
    #[arg(long, short)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(store: &MemoryStore, verbose: bool) {
    let header = store.header();
    println!(
        "{} v{}: {} classes, {} object properties, {} data properties, {} individuals, {} axioms",
        header.label,
        header.version_info,
        store.entity_count(EntityKind::Class),
        store.entity_count(EntityKind::ObjectProperty),
        store.entity_count(EntityKind::DataProperty),
        store.entity_count(EntityKind::NamedIndividual),
        store.axiom_count()
    );
    if verbose {
        for (kind, count) in store.axiom_type_counts() {
            println!("  {kind}: {count}");
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let plan = BuildPlan::load(&args.plan)
        .with_context(|| format!("Failed to load build plan {}", args.plan.display()))?;
    let stem = plan.ontology.artifact_stem();
    let (generator, summary) = plan.run().context("Failed to start the build")?;

    let store = generator.into_store();
    print_summary(&store, args.verbose);
    for failure in &summary.failures {
        eprintln!("  Step {} {} failed: {}", failure.index, failure.step, failure.error);
    }
    println!(
        "{} steps run, {} failed, {} axioms added",
        summary.steps_run,
        summary.failures.len(),
        summary.axioms_added
    );

    let out = &args.out;
    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;

    let formats = if args.format.is_empty() {
        Format::ALL.to_vec()
    } else {
        args.format
    };
    for format in formats {
        let path = out.join(format!("{stem}.{}", format.extension()));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        store
            .save(&mut writer, format)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  Written: {}", path.display());
    }

    println!("Build complete.");
    Ok(())
}
