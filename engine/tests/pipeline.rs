//! End-to-end table scenarios against the public generator API.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::path::Path;

use owlgen_engine::{BuildPlan, DecompositionKind, Error, Generator, GeneratorConfig, TaxonomyLayout};
use owlgen_ontology::{
    AnnotationProperty, Axiom, ClassExpression, DataRange, Datatype, Entity, EntityKind, Format,
    Literal, OntologyStore,
};

fn write(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).unwrap();
}

fn generator(dir: &Path) -> Generator {
    let config = GeneratorConfig::new("http://localhost/", dir, "Pipeline").with_version("1");
    Generator::new(config).unwrap()
}

fn label(name: &str, text: &str) -> Axiom {
    Axiom::AnnotationAssertion {
        subject: Entity::class(name),
        property: AnnotationProperty::Label,
        value: Literal::en(text),
    }
}

fn subclass(sub: &str, sup: &str) -> Axiom {
    Axiom::SubClassOf {
        sub: ClassExpression::named(sub),
        sup: ClassExpression::named(sup),
    }
}

#[test]
fn stop_token_ends_the_chain_with_cross_labels() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Table 1.txt", "Table 1\nA~~B~~C\nVerb~~Noun~~$TOP\n");
    let mut g = generator(dir.path());
    let added = g.add_taxonomy_from_table("Table 1.txt", TaxonomyLayout::Chain).unwrap();
    assert_eq!(added, 3);
    let axioms = g.store().axioms();
    assert!(axioms.contains(&subclass("Noun", "Verb")));
    assert!(axioms.contains(&label("Verb", "Noun")));
    assert!(axioms.contains(&label("Noun", "Verb")));
}

#[test]
fn jumped_tables_are_processed_once() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Table 1. Units.txt",
        "Table 1. Units\nGENERALIZATION~~SPECIALIZATION\nUnit~~[Continued in Table 2]\nUnit~~[Continued in Table 2]\n",
    );
    write(
        dir.path(),
        "Table 2. Words.txt",
        "Table 2. Words\nGENERALIZATION~~SPECIALIZATION\nUnit~~Word\n",
    );
    let mut g = generator(dir.path());
    let added = g
        .add_taxonomy_from_table("Table 1. Units.txt", TaxonomyLayout::Chain)
        .unwrap();
    assert_eq!(added, 3);
    assert_eq!(g.processed_tables().len(), 2);
    let subclasses = g
        .store()
        .axioms()
        .iter()
        .filter(|a| matches!(a, Axiom::SubClassOf { .. }))
        .count();
    assert_eq!(subclasses, 1);
}

#[test]
fn missing_jump_target_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Table 1. Units.txt",
        "Table 1. Units\nGENERALIZATION~~SPECIALIZATION\nUnit~~[Continued in Table 9]\n",
    );
    let mut g = generator(dir.path());
    let err = g
        .add_taxonomy_from_table("Table 1. Units.txt", TaxonomyLayout::Chain)
        .unwrap_err();
    assert!(matches!(err, Error::JumpTargetNotFound { ref reference, .. } if reference == "Table 9"));
}

#[test]
fn decomposition_yields_one_group_per_target() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Decompositions.txt",
        "Decompositions\nTARGET~~COMPONENT\nWord~~Noun$CRLF~~Phrase~~NounPhrase$CRLF~~Word~~Verb$CRLF~~\n",
    );
    let mut g = generator(dir.path());
    g.add_decompositions_from_table("Decompositions.txt", DecompositionKind::Disjoint)
        .unwrap();
    let axioms = g.store().axioms();
    let nouns_and_verbs = BTreeSet::from([ClassExpression::named("Noun"), ClassExpression::named("Verb")]);
    assert!(axioms.contains(&Axiom::DisjointClasses(nouns_and_verbs.clone())));
    assert!(axioms.contains(&Axiom::EquivalentClasses(BTreeSet::from([
        ClassExpression::named("Word"),
        ClassExpression::UnionOf(nouns_and_verbs),
    ]))));
    assert!(axioms.contains(&Axiom::EquivalentClasses(BTreeSet::from([
        ClassExpression::named("NounPhrase"),
        ClassExpression::named("Phrase"),
    ]))));
    let equivalences = axioms
        .iter()
        .filter(|a| matches!(a, Axiom::EquivalentClasses(_)))
        .count();
    assert_eq!(equivalences, 2);
    assert!(axioms.contains(&subclass("Noun", "Word")));
    assert!(axioms.contains(&subclass("Verb", "Word")));
}

#[test]
fn single_record_flushes_one_group_and_exhaustive_only_equates() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Decompositions.txt",
        "Decompositions\nTARGET~~COMPONENT\nWord~~Noun$CRLF~~\n",
    );
    let mut g = generator(dir.path());
    let added = g
        .add_decompositions_from_table("Decompositions.txt", DecompositionKind::Exhaustive)
        .unwrap();
    assert_eq!(added, 1);
    assert_eq!(
        g.store().axioms(),
        &[Axiom::EquivalentClasses(BTreeSet::from([
            ClassExpression::named("Noun"),
            ClassExpression::named("Word"),
        ]))]
    );
}

#[test]
fn also_referred_footnote_equates_every_synonym() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Table 1.txt",
        "Table 1\nGENERALIZATION~~SPECIALIZATION\nOrganism~~Animal\n",
    );
    write(
        dir.path(),
        "Footnotes.txt",
        "Footnotes\nINDEX~~PROCESS~~REFERENCE~~TEXT\n1~~false~~Animal~~This concept is also referred to as Cat, Feline\n",
    );
    let mut g = generator(dir.path());
    g.add_taxonomy_from_table("Table 1.txt", TaxonomyLayout::Chain).unwrap();
    g.add_footnotes_from_table("Footnotes.txt").unwrap();
    let axioms = g.store().axioms();
    assert!(axioms.contains(&Axiom::EquivalentClasses(BTreeSet::from([
        ClassExpression::named("Animal"),
        ClassExpression::named("Cat"),
        ClassExpression::named("Feline"),
    ]))));
    assert!(!axioms.iter().any(|a| matches!(
        a,
        Axiom::AnnotationAssertion { property: AnnotationProperty::SeeAlso, .. }
    )));
}

#[test]
fn boolean_extension_ranges_union_enumeration_and_boolean() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Attributes.txt",
        "Attributes\nATTRIBUTE~~CONCEPT~~VALUE TYPE~~DESCRIPTION\ncolour~~Noun~~{TRUE, red, blue}~~The colour\n",
    );
    let mut g = generator(dir.path());
    g.add_attributes_from_table("Attributes.txt").unwrap();
    assert!(g.store().axioms().contains(&Axiom::DataPropertyRange {
        property: "colour".into(),
        range: DataRange::union_of([
            DataRange::one_of([Literal::plain("red"), Literal::plain("blue")]),
            DataRange::Datatype(Datatype::Boolean),
        ]),
    }));
}

#[test]
fn spaced_and_camel_case_names_are_one_entity() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Table 1.txt",
        "Table 1\nGENERALIZATION~~SPECIALIZATION\nPhrase~~Noun Phrase\n",
    );
    write(
        dir.path(),
        "Table 2.txt",
        "Table 2\nGENERALIZATION~~SPECIALIZATION\nNounPhrase~~Bare NP\n",
    );
    let mut g = generator(dir.path());
    g.add_taxonomy_from_table("Table 1.txt", TaxonomyLayout::Chain).unwrap();
    g.add_taxonomy_from_table("Table 2.txt", TaxonomyLayout::Chain).unwrap();
    let axioms = g.store().axioms();
    assert!(axioms.contains(&subclass("NounPhrase", "Phrase")));
    assert!(axioms.contains(&subclass("BareNP", "NounPhrase")));
    assert_eq!(
        g.store()
            .signature(EntityKind::Class)
            .iter()
            .filter(|c| c.as_str() == "NounPhrase")
            .count(),
        1
    );
}

#[test]
fn ad_hoc_relations_infer_their_inverse() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Relations.txt",
        "Relations\nSOURCE~~RELATION~~TARGET\nSentence~~hasPart~~Word\nWord~~isPartOf~~Sentence\n",
    );
    let mut g = generator(dir.path());
    g.add_ad_hoc_relations_from_table("Relations.txt").unwrap();
    assert!(!g.store().inverses_of("hasPart").is_empty());
    assert!(!g.store().inverses_of("isPartOf").is_empty());
}

#[test]
fn plan_builds_and_serializes_an_ontology() {
    let dir = tempfile::tempdir().unwrap();
    let tables = dir.path().join("tables");
    std::fs::create_dir(&tables).unwrap();
    write(
        &tables,
        "Table 1. Units.txt",
        "Table 1. Units\nGENERALIZATION~~SPECIALIZATION\nUnit~~Word~~Noun\n",
    );
    write(
        &tables,
        "Relations.txt",
        "Relations\nSOURCE~~RELATION~~TARGET\nNoun~~hasHead~~Word\n",
    );
    let plan_path = dir.path().join("plan.toml");
    std::fs::write(
        &plan_path,
        r#"
            [ontology]
            base_url = "http://localhost/"
            source_dir = "tables"
            ontology_name = "Units"
            version = "1"

            [[step]]
            kind = "taxonomy"
            table = "Table 1. Units.txt"

            [[step]]
            kind = "ad_hoc_relations"
            table = "Relations.txt"

            [[step]]
            kind = "infer_inverses"
        "#,
    )
    .unwrap();

    let (generator, summary) = BuildPlan::load(&plan_path).unwrap().run().unwrap();
    assert!(summary.all_succeeded(), "{:?}", summary.failures);
    assert_eq!(summary.steps_run, 3);

    let store = generator.into_store();
    assert!(store.contains_in_signature(&Entity::object_property("hasHead")));
    let mut turtle = Vec::new();
    store.save(&mut turtle, Format::Turtle).unwrap();
    let turtle = String::from_utf8(turtle).unwrap();
    assert!(turtle.contains("a owl:Ontology"));
    assert!(turtle.contains("owl:ObjectProperty"));
    assert!(turtle.contains("rdfs:subClassOf"));
}
