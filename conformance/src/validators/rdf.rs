//! Turtle and N-Triples artifact validator.
//!
//! Structural checks only:
//! - every `@prefix` line is well formed and `owl:` is declared
//! - the document declares an `owl:Ontology` and has subject blocks
//! - every block ends with `.`
//! - every N-Triples line is `subject <predicate> object .`

use std::path::Path;

use anyhow::Result;
use regex::Regex;

use crate::report::{ConformanceReport, TestResult};
use crate::validators::{file_name, find_artifacts, read};

const TURTLE: &str = "artifacts/turtle";
const NTRIPLES: &str = "artifacts/ntriples";

/// Reported offending lines are capped at this many.
const MAX_DETAILS: usize = 10;

/// Validates every `.ttl` and `.nt` file in `artifacts`.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be read.
pub fn validate(artifacts: &Path) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    let turtle = find_artifacts(artifacts, "ttl")?;
    if turtle.is_empty() {
        report.push(TestResult::fail(TURTLE, "no .ttl artifact found"));
    }
    for path in &turtle {
        report.extend(check_turtle(&file_name(path), &read(path)?)?);
    }

    let ntriples = find_artifacts(artifacts, "nt")?;
    if ntriples.is_empty() {
        report.push(TestResult::fail(NTRIPLES, "no .nt artifact found"));
    }
    for path in &ntriples {
        report.extend(check_ntriples(&file_name(path), &read(path)?)?);
    }

    Ok(report)
}

/// Checks one Turtle document.
///
/// # Errors
///
/// Returns an error if the prefix pattern fails to compile.
pub fn check_turtle(name: &str, content: &str) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let prefix_line = Regex::new(r"^@prefix\s+(?:[A-Za-z][\w.-]*)?:\s+<[^>\s]*>\s*\.$")?;

    let mut issues = Vec::new();
    let mut prefixes = 0usize;
    let mut has_owl = false;
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if !line.starts_with("@prefix") {
            continue;
        }
        prefixes += 1;
        has_owl |= line.starts_with("@prefix owl:");
        if !prefix_line.is_match(line) {
            issues.push(format!("line {}: malformed prefix declaration", i + 1));
        }
    }
    if prefixes == 0 {
        issues.push("no @prefix declarations".to_owned());
    } else if !has_owl {
        issues.push("owl: prefix not declared".to_owned());
    }
    if !content.contains("a owl:Ontology") {
        issues.push("no owl:Ontology declaration".to_owned());
    }

    let blocks: Vec<&str> = content
        .split("\n\n")
        .map(str::trim)
        .filter(|b| !b.is_empty() && !b.starts_with("@prefix"))
        .collect();
    for block in &blocks {
        if !block.ends_with('.') {
            let first = block.lines().next().unwrap_or_default();
            issues.push(format!("unterminated block starting `{first}`"));
        }
    }

    if issues.is_empty() {
        report.push(TestResult::pass(
            TURTLE,
            format!("{name}: {prefixes} prefixes, {} subject blocks", blocks.len()),
        ));
    } else {
        issues.truncate(MAX_DETAILS);
        report.push(TestResult::fail_with_details(
            TURTLE,
            format!("{name} has structural issues"),
            issues,
        ));
    }
    Ok(report)
}

/// Checks one N-Triples document.
///
/// # Errors
///
/// Returns an error if the triple pattern fails to compile.
pub fn check_ntriples(name: &str, content: &str) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let triple = Regex::new(r#"^(?:<[^>\s]*>|_:\S+) <[^>\s]*> (?:<[^>\s]*>|_:\S+|".*) \.$"#)?;

    let mut malformed = Vec::new();
    let mut count = 0usize;
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if triple.is_match(line) {
            count += 1;
        } else {
            malformed.push(format!("line {}: not a `subject predicate object .` triple", i + 1));
        }
    }

    if count > 0 && malformed.is_empty() {
        report.push(TestResult::pass(NTRIPLES, format!("{name}: {count} triples")));
    } else {
        if count == 0 {
            malformed.insert(0, "no triples".to_owned());
        }
        malformed.truncate(MAX_DETAILS);
        report.push(TestResult::fail_with_details(
            NTRIPLES,
            format!("{name} has malformed lines"),
            malformed,
        ));
    }
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TTL: &str = "@prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
                       @prefix : <http://localhost/T#> .\n\n\
                       <http://localhost/T>\n  a owl:Ontology .\n\n\
                       :Noun\n  rdfs:subClassOf :Word .\n";

    #[test]
    fn well_formed_turtle_passes() {
        let report = check_turtle("t.ttl", TTL).unwrap();
        assert!(report.all_passed(), "{:?}", report.results);
        assert!(report.results[0].message.contains("2 prefixes, 2 subject blocks"));
    }

    #[test]
    fn unterminated_turtle_block_fails() {
        let broken = TTL.replace(":Word .", ":Word");
        let report = check_turtle("t.ttl", &broken).unwrap();
        assert_eq!(report.failure_count(), 1);
        assert!(report.results[0].details[0].contains(":Noun"));
    }

    #[test]
    fn ntriples_lines_must_be_triples() {
        let good = "<http://a> <http://p> <http://b> .\n\
                    _:b0 <http://p> \"x\"@en .\n";
        assert!(check_ntriples("t.nt", good).unwrap().all_passed());

        let bad = format!("{good}<http://a> <http://p> <http://b>\n");
        let report = check_ntriples("t.nt", &bad).unwrap();
        assert_eq!(report.results[0].details, vec!["line 3: not a `subject predicate object .` triple"]);
        assert!(!check_ntriples("t.nt", "").unwrap().all_passed());
    }
}
