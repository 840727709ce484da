//! JSON-LD artifact validator.
//!
//! Every `.jsonld` artifact must parse as JSON, carry an `@context` object
//! and a non-empty `@graph` array whose nodes all have an absolute `@id`.

use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use crate::report::{ConformanceReport, TestResult};
use crate::validators::{file_name, find_artifacts, read};

const VALIDATOR: &str = "artifacts/jsonld";

/// Validates every `.jsonld` file in `artifacts`.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be read.
pub fn validate(artifacts: &Path) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let paths = find_artifacts(artifacts, "jsonld")?;
    if paths.is_empty() {
        report.push(TestResult::fail(VALIDATOR, "no .jsonld artifact found"));
    }
    for path in &paths {
        report.extend(check_document(&file_name(path), &read(path)?));
    }
    Ok(report)
}

/// Checks one JSON-LD document.
pub fn check_document(name: &str, content: &str) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            report.push(TestResult::fail(VALIDATOR, format!("{name} is not JSON: {e}")));
            return report;
        }
    };

    if value.get("@context").is_some_and(Value::is_object) {
        report.push(TestResult::pass(VALIDATOR, format!("{name} has an @context")));
    } else {
        report.push(TestResult::fail(VALIDATOR, format!("{name} has no @context object")));
    }

    let Some(graph) = value.get("@graph").and_then(Value::as_array) else {
        report.push(TestResult::fail(VALIDATOR, format!("{name} has no @graph array")));
        return report;
    };
    if graph.is_empty() {
        report.push(TestResult::fail(VALIDATOR, format!("{name} has an empty @graph")));
        return report;
    }

    let bad_ids: Vec<String> = graph
        .iter()
        .enumerate()
        .filter_map(|(i, node)| match node.get("@id").and_then(Value::as_str) {
            Some(id) if id.contains(':') => None,
            Some(id) => Some(format!("node {i}: relative @id `{id}`")),
            None => Some(format!("node {i}: missing @id")),
        })
        .take(10)
        .collect();
    if bad_ids.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("{name}: {} graph nodes with absolute ids", graph.len()),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            format!("{name} has nodes without usable ids"),
            bad_ids,
        ));
    }
    report
}
