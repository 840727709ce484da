//! Footnote resolver.
//!
//! A footnote table has one note per row, laid out as
//! `index~~needs-processing~~reference~~text`. Each note is classified by
//! the markers in its text and turned into axioms about the entity its
//! reference names. References flagged as needing processing are free text
//! and go through a [`TextAnnotator`]. A reference that resolves to
//! anything but one entity (or one synonym set) drops the note.

use std::collections::BTreeSet;

use owlgen_ontology::{Axiom, ClassExpression, Entity, OntologyStore};
use regex::Regex;
use tracing::{debug, info, warn};
use url::Url;

use crate::annotate::{GazetteerAnnotator, Tag, TextAnnotator};
use crate::builder::{self, RuleValue};
use crate::error::Result;
use crate::generator::Generator;
use crate::naming;
use crate::syntax::INNER_SEPARATOR;
use crate::table::{Row, RowMode, Table};

const SUBCLASS_OF: &str = "Subclass-Of";

/// What a footnote says about its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FootnoteKind {
    /// `X is a Subclass-Of Y`.
    SubclassOf,
    /// `also referred to as` / `also known as`: synonyms.
    AlsoReferred,
    /// `A takes the value V for C1, C2`: attribute rules.
    TakesValue,
    /// A `see` pointer to a URL or a neighbouring footnote.
    SeeAlso,
    /// Anything else.
    Comment,
}

/// One note of a footnote table.
///
/// A row whose text is `%`-separated yields one note per part, all sharing
/// the row's index, flag and reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote {
    /// Footnote number, when the index cell is numeric.
    pub index: Option<u32>,
    /// Whether the reference is free text to annotate.
    pub needs_processing: bool,
    /// The entity the note is about, or text naming it.
    pub reference: String,
    /// Note text.
    pub text: String,
}

impl Footnote {
    /// Notes of one table row; rows with fewer than four cells have none.
    #[must_use]
    pub fn from_row(row: &Row) -> Vec<Footnote> {
        let (Some(index), Some(flag), Some(reference), Some(text)) =
            (row.cell(0), row.cell(1), row.cell(2), row.cell(3))
        else {
            return Vec::new();
        };
        let index = index.trim().parse().ok();
        let needs_processing = flag.trim().eq_ignore_ascii_case("true");
        text.split(INNER_SEPARATOR)
            .map(|part| Footnote {
                index,
                needs_processing,
                reference: reference.to_owned(),
                text: part.to_owned(),
            })
            .collect()
    }

    fn is_blank(&self) -> bool {
        self.reference.trim().is_empty() || self.text.trim().is_empty()
    }
}

/// A parsed `A takes the value V for C1, C2` note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueRule {
    /// Attribute text.
    pub attribute: String,
    /// Value text.
    pub value: String,
    /// Domain texts.
    pub domains: Vec<String>,
}

/// Patterns for reading footnote text.
#[derive(Debug, Clone)]
pub struct FootnoteGrammar {
    section: Regex,
    subclass_marker: Regex,
    subclass_of: Regex,
    type_of_aside: Regex,
    takes_value: Regex,
    footnote_reference: Regex,
    also_referred: Regex,
    or_composition: Regex,
    synonym_separator: Regex,
    domain_separator: Regex,
    set_reference: Regex,
}

impl FootnoteGrammar {
    /// Compiles the footnote patterns.
    ///
    /// # Errors
    ///
    /// Returns the compilation error of the first invalid pattern.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            section: Regex::new(r"[Ss]ection\s(?:\d\.*)+")?,
            subclass_marker: Regex::new(r"[Ss]ubclass-?[Oo]f")?,
            subclass_of: Regex::new(
                r"([\s*\w+\-/]+)((?:is\s+|are\s+)(?:also\s+)?a?\s*Subclass-Of\s+)([\s*\w+\-/]+)",
            )?,
            type_of_aside: Regex::new(r"\(\s*[Aa]\s*[Tt]ype\s*[Oo]f(?:\s+\w+-*)+\)")?,
            takes_value: Regex::new(
                r"^([\w\s\-/]+)(\s+takes\s+the\s+value\s+)([\w\s\-/]+)\s+for\s+([\w\s\-/]+(?:,[\w\s\-/]*)*)\s*.*$",
            )?,
            footnote_reference: Regex::new(r"([Pp]revious|[Nn]ext)\s+[Ff]ootnote")?,
            also_referred: Regex::new(
                r"(?:[Aa]lso\s+referred\s+to\s+as|[Aa]lso\s+known\s+as)((?:\s+|\w+|-+|,)+)(\s*\(\s*or\s*\w+-*\))?((?:\s+\w+-*)+)?",
            )?,
            or_composition: Regex::new(r"^\(\s*or\s+(\w+-*\s*)+\)$")?,
            synonym_separator: Regex::new(r"\s+and\s+|\s+or\s+|\s*,\s*")?,
            domain_separator: Regex::new(r"\s+and\s+|\s*,\s*")?,
            set_reference: Regex::new(r"^\{[\w+\-/,\s]*\}$")?,
        })
    }

    /// Classifies a note; the first matching category wins.
    ///
    /// Notes pointing at a numbered document section return `None`: they
    /// carry no ontology content. So do subclass markers without the full
    /// `X is a Subclass-Of Y` shape.
    #[must_use]
    pub fn classify(&self, text: &str) -> Option<FootnoteKind> {
        if self.section.is_match(text) {
            return None;
        }
        if self.subclass_marker.is_match(text) {
            return self.subclass_of.is_match(text).then_some(FootnoteKind::SubclassOf);
        }
        let lower = text.to_lowercase();
        if lower.contains("also referred to as") || lower.contains("also known as") {
            return Some(FootnoteKind::AlsoReferred);
        }
        if lower.contains("takes the value") {
            return Some(if self.takes_value.is_match(text) {
                FootnoteKind::TakesValue
            } else {
                FootnoteKind::Comment
            });
        }
        let mut tokens = text.split_whitespace();
        if tokens.clone().any(|t| t == "See" || t == "see")
            && (self.footnote_reference.is_match(text) || tokens.any(is_url))
        {
            return Some(FootnoteKind::SeeAlso);
        }
        Some(FootnoteKind::Comment)
    }

    /// Synonyms listed after `also referred to as` / `also known as`.
    ///
    /// `X (or Y) Z` composes into `X Z` and `Y Z`; plain lists split on
    /// commas, `and` and `or`. Each item is cut down to its name.
    #[must_use]
    pub fn synonyms(&self, text: &str) -> Option<Vec<String>> {
        let caps = self.also_referred.captures(text)?;
        let head = caps.get(1).map_or("", |m| m.as_str()).trim();
        let tail = caps.get(3).map_or("", |m| m.as_str()).trim();
        let listed: Vec<String> = match caps.get(2) {
            Some(alternative) => {
                let inner = self.or_composition.captures(alternative.as_str().trim())?;
                let alternative = inner.get(1)?.as_str().trim();
                vec![format!("{head} {tail}"), format!("{alternative} {tail}")]
            }
            None => self.synonym_separator.split(head).map(str::to_owned).collect(),
        };
        let synonyms: Vec<String> = listed.iter().filter_map(|s| sanitize(s)).collect();
        (!synonyms.is_empty()).then_some(synonyms)
    }

    /// Parses an `A takes the value V for C1, C2 and C3` note.
    #[must_use]
    pub fn value_rule(&self, text: &str) -> Option<ValueRule> {
        let caps = self.takes_value.captures(text)?;
        let domains = self
            .domain_separator
            .split(caps.get(4)?.as_str())
            .filter_map(sanitize)
            .collect();
        Some(ValueRule {
            attribute: caps.get(1)?.as_str().trim().to_owned(),
            value: caps.get(3)?.as_str().trim().to_owned(),
            domains,
        })
    }

    /// Superclass text of a subclass hint: what follows the last
    /// `Subclass-Of` in the first sentence, without `(a type of ...)` asides.
    #[must_use]
    pub fn superclass_text(&self, text: &str) -> Option<String> {
        let text = text.trim();
        let sentence = text.split_once('.').map_or(text, |(head, _)| head);
        let start = sentence.rfind(SUBCLASS_OF)? + SUBCLASS_OF.len();
        Some(self.type_of_aside.replace_all(&sentence[start..], "").trim().to_owned())
    }
}

/// Keeps the name at the start of a phrase: a run of capitalized words, or
/// else the first word.
fn sanitize(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let first = *words.first()?;
    if !is_capitalized(first) {
        return Some(first.to_owned());
    }
    let name: Vec<&str> = words.into_iter().take_while(|w| is_capitalized(w)).collect();
    Some(name.join(" "))
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn is_url(token: &str) -> bool {
    let token = token
        .trim_start_matches(['(', '<', '"'])
        .trim_end_matches(['.', ',', ';', ':', ')', '>', '"']);
    Url::parse(token).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https" | "ftp") && url.host_str().is_some()
    })
}

/// Full text of the last row numbered `index`.
fn nth_footnote(table: &Table, index: u32) -> Option<&str> {
    table
        .rows
        .iter()
        .rev()
        .find(|row| row.cell(0).and_then(|c| c.trim().parse().ok()) == Some(index))
        .and_then(|row| row.cell(3))
}

impl<S: OntologyStore> Generator<S> {
    /// Adds the axioms a footnote table implies, resolving free-text
    /// references against the labels of the classes already in the store.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read.
    pub fn add_footnotes_from_table(&mut self, file: &str) -> Result<usize> {
        let annotator = GazetteerAnnotator::from_store(&self.store)?;
        self.add_footnotes_with(file, &annotator)
    }

    /// [`Generator::add_footnotes_from_table`] with a caller-supplied annotator.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be read.
    pub fn add_footnotes_with(&mut self, file: &str, annotator: &dyn TextAnnotator) -> Result<usize> {
        let table = Table::load(&self.config.table_path(file), RowMode::Plain)?;
        let grammar = FootnoteGrammar::new()?;

        let mut axioms = Vec::new();
        let mut discarded = 0usize;
        for row in &table.rows {
            for note in Footnote::from_row(row) {
                let Some(kind) = grammar.classify(&note.text) else {
                    debug!(line = row.line, "section reference skipped");
                    continue;
                };
                let resolved = if note.is_blank() {
                    None
                } else {
                    match kind {
                        FootnoteKind::SubclassOf => self.subclass_hint(&grammar, annotator, &note),
                        FootnoteKind::AlsoReferred => self.synonym_note(&grammar, annotator, &note),
                        FootnoteKind::TakesValue => self.value_rule_note(&grammar, &note),
                        FootnoteKind::SeeAlso => self.see_also_note(&grammar, annotator, &note, &table),
                        FootnoteKind::Comment => self.comment_note(&grammar, annotator, &note),
                    }
                };
                match resolved {
                    Some(found) => {
                        debug!(line = row.line, ?kind, axioms = found.len(), "footnote resolved");
                        axioms.extend(found);
                    }
                    None => {
                        debug!(line = row.line, ?kind, reference = %note.reference, "footnote discarded");
                        discarded += 1;
                    }
                }
            }
        }
        if discarded > 0 {
            warn!(table = file, discarded, "footnotes discarded");
        }
        let added = self.add(axioms);
        info!(table = file, axioms = added, "footnote axioms added");
        Ok(added)
    }

    fn subclass_hint(
        &self,
        grammar: &FootnoteGrammar,
        annotator: &dyn TextAnnotator,
        note: &Footnote,
    ) -> Option<Vec<Axiom>> {
        let subjects = if note.needs_processing {
            self.resolve_reference(annotator, &note.reference)?
        } else {
            let reference = match note.reference.split_once('(') {
                Some((head, rest)) if rest.contains(')') => head,
                _ => note.reference.as_str(),
            };
            BTreeSet::from([naming::class_name(&naming::dehyphenate(reference))])
        };
        let superclasses = self.annotated_classes(annotator, &grammar.superclass_text(&note.text)?);
        let axioms: Vec<Axiom> = subjects
            .iter()
            .flat_map(|sub| superclasses.iter().map(move |sup| (sub, sup)))
            .filter(|(sub, sup)| !sub.is_empty() && sub != sup)
            .map(|(sub, sup)| builder::subclass(sub, sup))
            .collect();
        (!axioms.is_empty()).then_some(axioms)
    }

    fn synonym_note(
        &self,
        grammar: &FootnoteGrammar,
        annotator: &dyn TextAnnotator,
        note: &Footnote,
    ) -> Option<Vec<Axiom>> {
        let synonyms = grammar.synonyms(&note.text)?;
        let subjects = if note.needs_processing {
            self.resolve_reference(annotator, &note.reference)?
        } else {
            BTreeSet::from([note.reference.trim().to_owned()])
        };
        let see_also = note.text.contains("See ") || note.text.contains("see ");
        let mut axioms = Vec::new();
        for subject in &subjects {
            let entity = self.footnote_entity(subject)?;
            axioms.extend(builder::synonym_cluster(
                entity.kind,
                &entity.name,
                synonyms.iter().map(String::as_str),
            ));
            if see_also {
                axioms.push(builder::see_also(entity, &note.text));
            }
        }
        Some(axioms)
    }

    fn value_rule_note(&self, grammar: &FootnoteGrammar, note: &Footnote) -> Option<Vec<Axiom>> {
        if note.needs_processing {
            return None;
        }
        let rule = grammar.value_rule(&note.text)?;
        let property = naming::property_name(&rule.attribute);
        if !self.store.contains_in_signature(&Entity::data_property(&property)) {
            return None;
        }
        let value = naming::class_name(&rule.value);
        let restriction = RuleValue::from_cell(&value, &self.grammar).restriction(&property)?;
        let axioms: Vec<Axiom> = rule
            .domains
            .iter()
            .map(|domain| naming::class_name(domain))
            .filter(|class| self.store.contains_in_signature(&Entity::class(class)))
            .map(|class| Axiom::SubClassOf {
                sub: ClassExpression::Class(class),
                sup: restriction.clone(),
            })
            .collect();
        (!axioms.is_empty()).then_some(axioms)
    }

    fn see_also_note(
        &self,
        grammar: &FootnoteGrammar,
        annotator: &dyn TextAnnotator,
        note: &Footnote,
        table: &Table,
    ) -> Option<Vec<Axiom>> {
        let subjects = self.annotation_subjects(grammar, annotator, note)?;
        let mut text = note.text.as_str();
        if grammar.footnote_reference.is_match(text) {
            let upper = text.to_uppercase();
            let index = note.index?;
            let target = if upper.contains("PREVIOUS") {
                index.checked_sub(1)
            } else {
                index.checked_add(1)
            };
            text = nth_footnote(table, target?)?;
        }
        let entities = subjects
            .iter()
            .map(|subject| self.footnote_entity(subject))
            .collect::<Option<Vec<Entity>>>()?;
        Some(entities.into_iter().map(|e| builder::see_also(e, text)).collect())
    }

    fn comment_note(
        &self,
        grammar: &FootnoteGrammar,
        annotator: &dyn TextAnnotator,
        note: &Footnote,
    ) -> Option<Vec<Axiom>> {
        let subjects = self.annotation_subjects(grammar, annotator, note)?;
        let axioms: Vec<Axiom> = subjects
            .iter()
            .filter_map(|subject| self.footnote_entity(subject))
            .map(|e| builder::comment(e, &note.text))
            .collect();
        (!axioms.is_empty()).then_some(axioms)
    }

    /// Subjects of a see-also or comment note.
    ///
    /// A reference with a parenthesized aside is annotated; a `{...}` set
    /// names no single entity.
    fn annotation_subjects(
        &self,
        grammar: &FootnoteGrammar,
        annotator: &dyn TextAnnotator,
        note: &Footnote,
    ) -> Option<BTreeSet<String>> {
        if note.needs_processing {
            return self.resolve_reference(annotator, &note.reference);
        }
        let reference = note.reference.trim();
        if reference.contains('(') && reference.contains(')') {
            return Some(self.annotated_classes(annotator, reference));
        }
        if grammar.set_reference.is_match(reference) {
            return None;
        }
        Some(BTreeSet::from([reference.to_owned()]))
    }

    /// The entities a free-text reference names, if it names exactly one
    /// or only mutual synonyms.
    fn resolve_reference(&self, annotator: &dyn TextAnnotator, reference: &str) -> Option<BTreeSet<String>> {
        let entities = self.annotated_classes(annotator, reference);
        match entities.len() {
            1 => Some(entities),
            n if n > 1 && self.all_synonyms(&entities) => Some(entities),
            _ => None,
        }
    }

    /// Class names among the annotated spans of `text`.
    ///
    /// Spans tagged as ontology classes name the class spelled like them.
    /// Any other entity span is kept when its singular, capitalized form
    /// names a class already in the signature.
    fn annotated_classes(&self, annotator: &dyn TextAnnotator, text: &str) -> BTreeSet<String> {
        annotator
            .annotate(text)
            .into_iter()
            .filter_map(|span| match span.tag {
                Tag::Outside => None,
                Tag::OntologyClass => {
                    let name = naming::class_name(&naming::dehyphenate(&span.surface));
                    if self.store.contains_in_signature(&Entity::class(&name)) {
                        Some(name)
                    } else {
                        self.known_class(&span.surface)
                    }
                }
                _ => self.known_class(&span.surface),
            })
            .collect()
    }

    fn known_class(&self, surface: &str) -> Option<String> {
        let key = naming::entity_class_key(surface);
        self.store.contains_in_signature(&Entity::class(&key)).then_some(key)
    }

    /// Whether one equivalent-classes axiom covers all `names`.
    fn all_synonyms(&self, names: &BTreeSet<String>) -> bool {
        let Some(first) = names.first() else {
            return false;
        };
        let Some(Axiom::EquivalentClasses(members)) = self.store.equivalence_axioms_for(first).first().copied() else {
            return false;
        };
        names.iter().all(|name| members.contains(&ClassExpression::named(name)))
    }

    /// The existing entity a subject text names: class, object property,
    /// data property or individual, in that order.
    fn footnote_entity(&self, subject: &str) -> Option<Entity> {
        let name = naming::class_name(subject);
        [
            Entity::class(naming::dehyphenate(&name)),
            Entity::object_property(naming::uncapitalize(&name)),
            Entity::data_property(naming::uncapitalize(&name)),
            Entity::individual(name.clone()),
        ]
        .into_iter()
        .find(|entity| self.store.contains_in_signature(entity))
    }
}
