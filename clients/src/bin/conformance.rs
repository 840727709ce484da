//! `owlgen-conformance`: validates ontology artifacts.
//!
//! Checks every `.ttl`, `.nt`, `.jsonld` and `.ofn` file in the artifacts
//! directory. With `--plan`, the plan is also rebuilt in memory and the
//! resulting store is checked before serialization.
//!
//! **Usage:**
//! ```text
//! owlgen-conformance [--artifacts <path>] [--plan <file>]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use owlgen_conformance::{check_store, run_all, Severity};
use owlgen_engine::BuildPlan;
use tracing_subscriber::EnvFilter;

/// Validate ontology artifacts.
#[derive(Parser)]
#[command(name = "owlgen-conformance", about = "Validate generated ontology artifacts")]
struct Args {
    /// Directory holding the built artifacts.
    #[arg(long, default_value = "public")]
    artifacts: PathBuf,

    /// Build plan to rebuild and check in memory.
    #[arg(long)]
    plan: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .with_writer(std::io::stderr)
        .init();

    let mut report = run_all(&args.artifacts)?;
    if let Some(plan_path) = &args.plan {
        let plan = BuildPlan::load(plan_path)
            .with_context(|| format!("Failed to load build plan {}", plan_path.display()))?;
        let (generator, _) = plan.run().context("Failed to rebuild the ontology")?;
        report.extend(check_store(generator.store()));
    }

    println!("Ontology Conformance Report");
    println!("===========================");
    println!();
    for result in &report.results {
        println!("[{}] {}: {}", result.severity, result.validator, result.message);
        for detail in &result.details {
            println!("       {detail}");
        }
    }

    let failed = report.failure_count();
    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        report.count(Severity::Pass),
        report.count(Severity::Warning),
        failed
    );

    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
