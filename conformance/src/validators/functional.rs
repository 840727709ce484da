//! OWL functional-syntax artifact validator.

use std::path::Path;

use anyhow::Result;

use crate::report::{ConformanceReport, TestResult};
use crate::validators::{file_name, find_artifacts, read};

const VALIDATOR: &str = "artifacts/functional";

/// Validates every `.ofn` file in `artifacts`. Absent files are a warning:
/// functional syntax is optional output.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be read.
pub fn validate(artifacts: &Path) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let paths = find_artifacts(artifacts, "ofn")?;
    if paths.is_empty() {
        report.push(TestResult::warn(VALIDATOR, "no .ofn artifact found"));
    }
    for path in &paths {
        report.push(check_document(&file_name(path), &read(path)?));
    }
    Ok(report)
}

/// Checks that the document opens an `Ontology(` and that parentheses
/// outside string literals balance.
pub fn check_document(name: &str, content: &str) -> TestResult {
    if !content.lines().any(|l| l.starts_with("Ontology(")) {
        return TestResult::fail(VALIDATOR, format!("{name} has no Ontology( block"));
    }
    match unbalanced_line(content) {
        None => TestResult::pass(
            VALIDATOR,
            format!("{name}: {} lines, parentheses balanced", content.lines().count()),
        ),
        Some(line) => TestResult::fail(
            VALIDATOR,
            format!("{name}: unbalanced parentheses at line {line}"),
        ),
    }
}

/// 1-based line where nesting first goes negative, or the last line when
/// parentheses stay open.
fn unbalanced_line(content: &str) -> Option<usize> {
    let mut depth = 0i64;
    let mut in_string = false;
    let mut escaped = false;
    let mut line = 1;
    for c in content.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Some(line);
                }
            }
            '\n' => line += 1,
            _ => {}
        }
    }
    (depth != 0 || in_string).then_some(line)
}
