//! Serialized artifacts of a small ontology pass every artifact validator.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::fs::File;

use owlgen_conformance::{check_store, run_all, Severity};
use owlgen_ontology::{
    AnnotationProperty, Axiom, ClassExpression, Entity, Format, Literal, MemoryStore,
    OntologyHeader, OntologyStore,
};

fn sample() -> MemoryStore {
    let mut store = MemoryStore::new(OntologyHeader::new("http://localhost/", "Sample", "1"));
    let label = |entity: Entity, text: &str| Axiom::AnnotationAssertion {
        subject: entity,
        property: AnnotationProperty::Label,
        value: Literal::en(text),
    };
    store.add_axioms([
        Axiom::Declaration(Entity::class("Word")),
        label(Entity::class("Word"), "Word"),
        label(Entity::class("Noun"), "Noun (common)"),
        label(Entity::class("Verb"), "Verb"),
        Axiom::EquivalentClasses(BTreeSet::from([
            ClassExpression::named("Word"),
            ClassExpression::union_of([ClassExpression::named("Noun"), ClassExpression::named("Verb")]),
        ])),
        Axiom::DisjointClasses(BTreeSet::from([
            ClassExpression::named("Noun"),
            ClassExpression::named("Verb"),
        ])),
        Axiom::ObjectPropertyDomain {
            property: "hasPart".into(),
            domain: ClassExpression::named("Word"),
        },
        Axiom::ObjectPropertyRange {
            property: "hasPart".into(),
            range: ClassExpression::named("Noun"),
        },
        Axiom::ObjectPropertyDomain {
            property: "isPartOf".into(),
            domain: ClassExpression::named("Noun"),
        },
        Axiom::ObjectPropertyRange {
            property: "isPartOf".into(),
            range: ClassExpression::named("Word"),
        },
        Axiom::InverseObjectProperties("hasPart".into(), "isPartOf".into()),
    ]);
    store
}

#[test]
fn every_written_format_validates() {
    let dir = tempfile::tempdir().unwrap();
    let store = sample();
    for format in Format::ALL {
        let path = dir.path().join(format!("Sample - 1.{}", format.extension()));
        let mut file = File::create(&path).unwrap();
        store.save(&mut file, format).unwrap();
    }

    let report = run_all(dir.path()).unwrap();
    let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
    assert!(failures.is_empty(), "artifact failures: {failures:#?}");
    assert_eq!(report.count(Severity::Warning), 0);

    let store_report = check_store(&store);
    assert!(store_report.all_passed(), "{:#?}", store_report.results);
    assert_eq!(store_report.count(Severity::Warning), 0);
}

#[test]
fn empty_directory_fails_every_required_format() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_all(dir.path()).unwrap();
    assert_eq!(report.failure_count(), 3);
    assert_eq!(report.count(Severity::Warning), 1);
}
