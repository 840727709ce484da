//! Inverse relation inferrer.
//!
//! Two object properties are inverse candidates when their names share a
//! stem once direction affixes are stripped (`hasPart` / `isPartOf`) and the
//! domain of each equals the range of the other. An inverse is asserted only
//! when a property has exactly one candidate.

use std::collections::BTreeSet;

use owlgen_ontology::{Axiom, EntityKind, OntologyStore};
use rust_stemmers::{Algorithm, Stemmer};
use tracing::{debug, info};

use crate::generator::Generator;
use crate::grammar::{CellGrammar, RelationAffixes};
use crate::naming;

/// Outcome of looking for the inverse of one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InverseCandidate {
    /// Exactly one compatible property.
    Unique(String),
    /// No compatible property.
    None,
    /// More than one compatible property; nothing is asserted.
    Ambiguous(usize),
}

/// Stem key of a relation core: camel-case words, stemmed, space-joined.
fn stem_key(stemmer: &Stemmer, core: &str) -> String {
    naming::split_camel_case(core)
        .into_iter()
        .map(|word| stemmer.stem(&word.to_lowercase()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns `true` when `source` and `input` name the same relation in
/// opposite directions, judged by name alone.
#[must_use]
pub fn contains_stem(grammar: &CellGrammar, source: &str, input: &str) -> bool {
    let (Some(active), Some(passive)) = (grammar.active_relation(source), grammar.passive_relation(input)) else {
        return false;
    };
    let RelationAffixes { core: a, affixed: a_affixed } = active;
    let RelationAffixes { core: p, affixed: p_affixed } = passive;
    if !(a_affixed || p_affixed) {
        return false;
    }
    let stemmer = Stemmer::create(Algorithm::English);
    stem_key(&stemmer, a) == stem_key(&stemmer, p)
}

impl<S: OntologyStore> Generator<S> {
    /// Properties without an asserted inverse.
    fn properties_without_inverse(&self) -> BTreeSet<String> {
        self.store
            .signature(EntityKind::ObjectProperty)
            .into_iter()
            .filter(|p| self.store.inverses_of(p).is_empty())
            .collect()
    }

    /// Looks for the single inverse of `property` among `pool`.
    #[must_use]
    pub fn inverse_candidate(&self, property: &str, pool: &BTreeSet<String>) -> InverseCandidate {
        let domains = self.store.object_property_domains(property);
        let ranges = self.store.object_property_ranges(property);
        let candidates: Vec<&String> = pool
            .iter()
            .filter(|other| other.as_str() != property)
            .filter(|other| contains_stem(&self.grammar, property, other))
            .filter(|other| {
                self.store.object_property_ranges(other) == domains
                    && self.store.object_property_domains(other) == ranges
            })
            .collect();
        match candidates.as_slice() {
            [] => InverseCandidate::None,
            [only] => InverseCandidate::Unique((*only).clone()),
            many => InverseCandidate::Ambiguous(many.len()),
        }
    }

    /// Asserts inverses between object properties that are unambiguous
    /// stem-and-signature matches. Returns the number of inverses asserted.
    pub fn infer_inverse_relations(&mut self) -> usize {
        let mut pool = self.properties_without_inverse();
        let mut inferred = 0;
        for property in pool.clone() {
            if !pool.contains(&property) {
                continue;
            }
            match self.inverse_candidate(&property, &pool) {
                InverseCandidate::Unique(inverse) => {
                    if self.store.add_axiom(Axiom::InverseObjectProperties(property.clone(), inverse.clone())) {
                        debug!(%property, %inverse, "inverse inferred");
                        inferred += 1;
                    }
                    pool = self.properties_without_inverse();
                }
                InverseCandidate::Ambiguous(n) => {
                    debug!(%property, candidates = n, "ambiguous inverse skipped");
                }
                InverseCandidate::None => {}
            }
        }
        info!(inverses = inferred, "inverse relations inferred");
        inferred
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use owlgen_ontology::{ClassExpression, Entity};

    use super::*;
    use crate::config::GeneratorConfig;

    fn grammar() -> CellGrammar {
        CellGrammar::new().unwrap()
    }

    fn generator() -> Generator {
        Generator::new(GeneratorConfig::new("http://localhost/", ".", "T").with_version("1")).unwrap()
    }

    fn relate(g: &mut Generator, property: &str, domain: &str, range: &str) {
        g.store_mut().declare(Entity::object_property(property));
        g.store_mut().add_axiom(Axiom::ObjectPropertyDomain {
            property: property.into(),
            domain: ClassExpression::named(domain),
        });
        g.store_mut().add_axiom(Axiom::ObjectPropertyRange {
            property: property.into(),
            range: ClassExpression::named(range),
        });
    }

    #[test]
    fn stems_compare_after_affix_stripping() {
        let g = grammar();
        assert!(contains_stem(&g, "hasPart", "isPartOf"));
        assert!(contains_stem(&g, "hasModifiers", "isModifierOf"));
        assert!(!contains_stem(&g, "contains", "contains"));
    }

    #[test]
    fn unique_candidate_is_asserted() {
        let mut g = generator();
        relate(&mut g, "hasHead", "Phrase", "Word");
        relate(&mut g, "isHeadOf", "Word", "Phrase");
        assert_eq!(g.infer_inverse_relations(), 1);
        assert!(g.store().inverses_of("hasHead").contains("isHeadOf"));
        assert!(g.store().inverses_of("isHeadOf").contains("hasHead"));
        assert_eq!(g.infer_inverse_relations(), 0);
    }

    #[test]
    fn ambiguous_candidates_are_skipped() {
        let mut g = generator();
        relate(&mut g, "hasHead", "Phrase", "Word");
        relate(&mut g, "isHeadOf", "Word", "Phrase");
        relate(&mut g, "headOf", "Word", "Phrase");
        let pool = g.properties_without_inverse();
        assert_eq!(g.inverse_candidate("hasHead", &pool), InverseCandidate::Ambiguous(2));
        assert_eq!(g.infer_inverse_relations(), 0);
        assert!(g.store().inverses_of("hasHead").is_empty());
        assert!(g.store().inverses_of("isHeadOf").is_empty());
        assert!(g.store().inverses_of("headOf").is_empty());
    }

    #[test]
    fn mismatched_signatures_are_not_inverses() {
        let mut g = generator();
        relate(&mut g, "hasHead", "Phrase", "Word");
        relate(&mut g, "isHeadOf", "Word", "Clause");
        assert_eq!(g.infer_inverse_relations(), 0);
    }
}
