//! Axiom builder: pure mappings from recognized cell values to axioms.
//!
//! Nothing here touches a store. Assemblers decide what to build, these
//! functions decide how it is expressed in OWL.

use std::collections::BTreeSet;

use owlgen_ontology::{
    AnnotationProperty, Axiom, ClassExpression, DataRange, Datatype, Entity, EntityKind, Literal,
    ObjectCharacteristic,
};

use crate::grammar::{Cardinality, CellGrammar};
use crate::naming;
use crate::syntax::INNER_SEPARATOR;

/// Entity name for `raw` under the naming rule of `kind`.
#[must_use]
pub fn entity_name(kind: EntityKind, raw: &str) -> String {
    match kind {
        EntityKind::Class | EntityKind::NamedIndividual => naming::class_name(raw),
        EntityKind::ObjectProperty | EntityKind::DataProperty => naming::property_name(raw),
    }
}

/// `rdfs:label` with the trimmed text as an `@en` literal.
#[must_use]
pub fn label(subject: Entity, text: &str) -> Axiom {
    annotation(subject, AnnotationProperty::Label, text.trim())
}

/// `rdfs:comment` with an `@en` literal.
#[must_use]
pub fn comment(subject: Entity, text: &str) -> Axiom {
    annotation(subject, AnnotationProperty::Comment, text)
}

/// `rdfs:seeAlso` with an `@en` literal.
#[must_use]
pub fn see_also(subject: Entity, text: &str) -> Axiom {
    annotation(subject, AnnotationProperty::SeeAlso, text)
}

fn annotation(subject: Entity, property: AnnotationProperty, text: &str) -> Axiom {
    Axiom::AnnotationAssertion {
        subject,
        property,
        value: Literal::en(text),
    }
}

/// `SubClassOf(sub, sup)` between named classes.
#[must_use]
pub fn subclass(sub: &str, sup: &str) -> Axiom {
    Axiom::SubClassOf {
        sub: ClassExpression::named(sub),
        sup: ClassExpression::named(sup),
    }
}

/// N-ary equivalence of the given names, in the flavor of `kind`.
///
/// Returns `None` for fewer than two distinct members.
#[must_use]
pub fn equivalence(kind: EntityKind, names: BTreeSet<String>) -> Option<Axiom> {
    if names.len() < 2 {
        return None;
    }
    Some(match kind {
        EntityKind::Class => {
            Axiom::EquivalentClasses(names.into_iter().map(ClassExpression::Class).collect())
        }
        EntityKind::ObjectProperty => Axiom::EquivalentObjectProperties(names),
        EntityKind::DataProperty => Axiom::EquivalentDataProperties(names),
        EntityKind::NamedIndividual => Axiom::SameIndividual(names),
    })
}

/// A synonym cluster: `source` plus every synonym, declared equivalent.
///
/// Each synonym is declared and labelled with its trimmed text. The
/// equivalence is one axiom over the whole set.
pub fn synonym_cluster<'a>(
    kind: EntityKind,
    source: &str,
    synonyms: impl IntoIterator<Item = &'a str>,
) -> Vec<Axiom> {
    let mut axioms = Vec::new();
    let mut members = BTreeSet::from([source.to_owned()]);
    for synonym in synonyms {
        if synonym.trim().is_empty() {
            continue;
        }
        let entity = Entity::new(kind, entity_name(kind, synonym));
        members.insert(entity.name.clone());
        axioms.push(Axiom::Declaration(entity.clone()));
        axioms.push(label(entity, synonym));
    }
    axioms.extend(equivalence(kind, members));
    axioms
}

/// Restriction expressing a `(lower, upper)` cardinality on a data property.
///
/// The unbounded cases need the property range; without one they yield `None`.
#[must_use]
pub fn cardinality_restriction(
    property: &str,
    cardinality: Cardinality,
    range: Option<&DataRange>,
) -> Option<ClassExpression> {
    let property = property.to_owned();
    match cardinality {
        Cardinality::SomeValues => Some(ClassExpression::DataSomeValuesFrom {
            property,
            range: range?.clone(),
        }),
        Cardinality::AllValues => Some(ClassExpression::DataAllValuesFrom {
            property,
            range: range?.clone(),
        }),
        Cardinality::AtLeast(k) => Some(ClassExpression::DataMinCardinality {
            cardinality: k,
            property,
        }),
        Cardinality::Exact(k) => Some(ClassExpression::DataExactCardinality {
            cardinality: k,
            property,
            range: None,
        }),
        Cardinality::Between { min, max } => Some(ClassExpression::intersection_of([
            ClassExpression::DataMinCardinality {
                cardinality: min,
                property: property.clone(),
            },
            ClassExpression::DataMaxCardinality {
                cardinality: max,
                property,
            },
        ])),
    }
}

/// Mathematical characteristic named by free text, if recognized.
#[must_use]
pub fn characteristic(text: &str) -> Option<ObjectCharacteristic> {
    match text.trim().to_lowercase().as_str() {
        "functional" => Some(ObjectCharacteristic::Functional),
        "inverse functional" | "inverse-functional" => Some(ObjectCharacteristic::InverseFunctional),
        "transitive" => Some(ObjectCharacteristic::Transitive),
        "symmetric" | "symmetrical" => Some(ObjectCharacteristic::Symmetric),
        "asymmetric" | "asymmetrical" => Some(ObjectCharacteristic::Asymmetric),
        "reflexive" => Some(ObjectCharacteristic::Reflexive),
        "irreflexive" => Some(ObjectCharacteristic::Irreflexive),
        _ => None,
    }
}

/// Parses `true`/`false`, ignoring case.
#[must_use]
pub fn boolean(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Literal for an enumerated value: spaces become `_`.
#[must_use]
pub fn enumerated_literal(value: &str) -> Literal {
    Literal::plain(value.replace(' ', "_"))
}

/// Data range named by a value-type cell.
///
/// `boolean`, `cardinal` and `string` name datatypes. A `{...}` set becomes
/// a `DataOneOf`; when it also lists `TRUE`/`FALSE`, those are removed and
/// the remainder is unioned with `xsd:boolean`. Anything else has no range.
#[must_use]
pub fn value_type_range(value_type: &str, grammar: &CellGrammar) -> Option<DataRange> {
    match value_type.trim().to_lowercase().as_str() {
        "boolean" => return Some(DataRange::Datatype(Datatype::Boolean)),
        "cardinal" => return Some(DataRange::Datatype(Datatype::Integer)),
        "string" => return Some(DataRange::Datatype(Datatype::String)),
        _ => {}
    }
    let mut values = grammar.set_literal(value_type)?;
    let boolean_extension = values.iter().any(|v| boolean(v).is_some());
    if boolean_extension {
        values.retain(|v| boolean(v).is_none());
    }
    let one_of = (!values.is_empty())
        .then(|| DataRange::one_of(values.iter().map(|v| enumerated_literal(v))));
    match (one_of, boolean_extension) {
        (Some(one_of), true) => Some(DataRange::union_of([
            one_of,
            DataRange::Datatype(Datatype::Boolean),
        ])),
        (Some(one_of), false) => Some(one_of),
        (None, true) => Some(DataRange::Datatype(Datatype::Boolean)),
        (None, false) => None,
    }
}

/// The value side of an attribute rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleValue {
    /// `true` / `false`.
    Boolean(bool),
    /// An enumerated set of values.
    Values(Vec<Literal>),
    /// A single value.
    Single(Literal),
}

impl RuleValue {
    /// Classifies a table cell: booleans, `{...}` sets, `%` lists, else one value.
    ///
    /// Values have spaces replaced by `_`.
    #[must_use]
    pub fn from_cell(value: &str, grammar: &CellGrammar) -> Self {
        if let Some(b) = boolean(value) {
            return RuleValue::Boolean(b);
        }
        let listed: Option<Vec<String>> = if value.contains(INNER_SEPARATOR) {
            Some(value.split(INNER_SEPARATOR).map(str::to_owned).collect())
        } else {
            grammar.set_literal(value)
        };
        match listed {
            Some(values) => RuleValue::Values(values.iter().map(|v| enumerated_literal(v)).collect()),
            None => RuleValue::Single(enumerated_literal(value)),
        }
    }

    /// `SubClassOf` filler restricting `property` to this value.
    ///
    /// Several distinct values need exactly that many values from their
    /// enumeration; a one-element set degrades to a has-value.
    #[must_use]
    pub fn restriction(&self, property: &str) -> Option<ClassExpression> {
        let property = property.to_owned();
        match self {
            RuleValue::Boolean(b) => Some(ClassExpression::DataHasValue {
                property,
                value: Literal::boolean(*b),
            }),
            RuleValue::Single(value) => Some(ClassExpression::DataHasValue {
                property,
                value: value.clone(),
            }),
            RuleValue::Values(values) => {
                let distinct: BTreeSet<Literal> = values.iter().cloned().collect();
                match distinct.len() {
                    0 => None,
                    1 => distinct
                        .into_iter()
                        .next()
                        .map(|value| ClassExpression::DataHasValue { property, value }),
                    n => Some(ClassExpression::DataExactCardinality {
                        cardinality: u32::try_from(n).unwrap_or(u32::MAX),
                        property,
                        range: Some(DataRange::OneOf(distinct)),
                    }),
                }
            }
        }
    }
}
