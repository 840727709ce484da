//! Checks over a built ontology, before serialization.
//!
//! Failures:
//! - n-ary equivalence, disjointness and sameness axioms need two members
//! - both sides of an inverse pair must be object properties in the signature
//!
//! Warnings:
//! - `SubClassOf(A, A)`
//! - inverse pairs whose domains and ranges do not mirror each other
//! - classes without an `rdfs:label`

use owlgen_ontology::{Axiom, ClassExpression, Entity, EntityKind, OntologyStore};

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "ontology/store";

/// Runs every store check.
pub fn validate<S: OntologyStore + ?Sized>(store: &S) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    report.push(check_nary_members(store));
    report.push(check_inverse_signature(store));
    report.push(check_reflexive_subclasses(store));
    report.push(check_inverse_signatures_mirror(store));
    report.push(check_class_labels(store));
    report
}

fn nary_size(axiom: &Axiom) -> Option<usize> {
    match axiom {
        Axiom::EquivalentClasses(set) | Axiom::DisjointClasses(set) => Some(set.len()),
        Axiom::EquivalentObjectProperties(set)
        | Axiom::EquivalentDataProperties(set)
        | Axiom::SameIndividual(set) => Some(set.len()),
        _ => None,
    }
}

/// Every n-ary axiom has at least two members.
pub fn check_nary_members<S: OntologyStore + ?Sized>(store: &S) -> TestResult {
    let mut checked = 0usize;
    let mut short = Vec::new();
    for axiom in store.axioms() {
        let Some(size) = nary_size(axiom) else {
            continue;
        };
        checked += 1;
        if size < 2 {
            short.push(format!("{} with {size} member(s): {axiom:?}", axiom.type_name()));
        }
    }
    if short.is_empty() {
        TestResult::pass(VALIDATOR, format!("{checked} n-ary axioms have at least two members"))
    } else {
        TestResult::fail_with_details(
            VALIDATOR,
            format!("{} n-ary axioms have fewer than two members", short.len()),
            short,
        )
    }
}

fn inverse_pairs<S: OntologyStore + ?Sized>(store: &S) -> impl Iterator<Item = (&String, &String)> {
    store.axioms().iter().filter_map(|a| match a {
        Axiom::InverseObjectProperties(first, second) => Some((first, second)),
        _ => None,
    })
}

/// Both sides of every inverse pair are object properties in the signature.
pub fn check_inverse_signature<S: OntologyStore + ?Sized>(store: &S) -> TestResult {
    let mut missing = Vec::new();
    for (first, second) in inverse_pairs(store) {
        for name in [first, second] {
            if !store.contains_in_signature(&Entity::object_property(name)) {
                missing.push(format!("{name} (inverse pair {first} / {second})"));
            }
        }
    }
    if missing.is_empty() {
        TestResult::pass(VALIDATOR, "every inverse property is in the signature")
    } else {
        TestResult::fail_with_details(VALIDATOR, "inverse properties missing from the signature", missing)
    }
}

/// No class is asserted a subclass of itself.
pub fn check_reflexive_subclasses<S: OntologyStore + ?Sized>(store: &S) -> TestResult {
    let reflexive: Vec<String> = store
        .axioms()
        .iter()
        .filter_map(|a| match a {
            Axiom::SubClassOf {
                sub: ClassExpression::Class(sub),
                sup: ClassExpression::Class(sup),
            } if sub == sup => Some(sub.clone()),
            _ => None,
        })
        .collect();
    if reflexive.is_empty() {
        TestResult::pass(VALIDATOR, "no class is a subclass of itself")
    } else {
        TestResult::warn_with_details(VALIDATOR, "classes asserted as their own subclass", reflexive)
    }
}

/// Each inverse pair has the domains of one equal to the ranges of the other.
pub fn check_inverse_signatures_mirror<S: OntologyStore + ?Sized>(store: &S) -> TestResult {
    let skewed: Vec<String> = inverse_pairs(store)
        .filter(|(first, second)| {
            store.object_property_domains(first) != store.object_property_ranges(second)
                || store.object_property_ranges(first) != store.object_property_domains(second)
        })
        .map(|(first, second)| format!("{first} / {second}"))
        .collect();
    if skewed.is_empty() {
        TestResult::pass(VALIDATOR, "inverse pairs have mirrored domains and ranges")
    } else {
        TestResult::warn_with_details(
            VALIDATOR,
            "inverse pairs whose domains and ranges do not mirror",
            skewed,
        )
    }
}

/// Every class in the signature carries a label.
pub fn check_class_labels<S: OntologyStore + ?Sized>(store: &S) -> TestResult {
    let classes = store.signature(EntityKind::Class);
    let unlabelled: Vec<String> = classes
        .iter()
        .filter(|name| !store.has_label(&Entity::class(name.as_str())))
        .cloned()
        .collect();
    if unlabelled.is_empty() {
        TestResult::pass(VALIDATOR, format!("all {} classes are labelled", classes.len()))
    } else {
        TestResult::warn_with_details(
            VALIDATOR,
            format!("{} of {} classes have no label", unlabelled.len(), classes.len()),
            unlabelled,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use owlgen_ontology::{MemoryStore, OntologyHeader};

    use super::*;
    use crate::report::Severity;

    fn store(axioms: Vec<Axiom>) -> MemoryStore {
        let mut store = MemoryStore::new(OntologyHeader::new("http://localhost/", "T", "1"));
        store.add_axioms(axioms);
        store
    }

    #[test]
    fn single_member_equivalence_fails() {
        let s = store(vec![
            Axiom::EquivalentClasses(BTreeSet::from([ClassExpression::named("Noun")])),
            Axiom::SameIndividual(BTreeSet::from(["a".to_owned(), "b".to_owned()])),
        ]);
        let result = check_nary_members(&s);
        assert!(result.is_failure());
        assert_eq!(result.details.len(), 1);
        assert!(result.details[0].starts_with("EquivalentClasses with 1 member(s)"));
    }

    #[test]
    fn skewed_inverse_pairs_and_missing_labels_warn() {
        let s = store(vec![
            Axiom::ObjectPropertyDomain {
                property: "hasPart".into(),
                domain: ClassExpression::named("Sentence"),
            },
            Axiom::ObjectPropertyRange {
                property: "isPartOf".into(),
                range: ClassExpression::named("Word"),
            },
            Axiom::InverseObjectProperties("hasPart".into(), "isPartOf".into()),
            Axiom::SubClassOf {
                sub: ClassExpression::named("Word"),
                sup: ClassExpression::named("Word"),
            },
        ]);
        let report = validate(&s);
        assert!(report.all_passed(), "{:?}", report.results);
        assert_eq!(report.count(Severity::Warning), 3);
        assert_eq!(check_inverse_signatures_mirror(&s).details, vec!["hasPart / isPartOf"]);
        assert_eq!(
            check_class_labels(&s).details,
            vec!["Sentence".to_owned(), "Word".to_owned()]
        );
    }
}
