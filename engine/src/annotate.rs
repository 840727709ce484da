//! Text annotation.
//!
//! Footnote references and superclass hints are free text. An annotator
//! splits such text into surface forms and tags each one; the footnote
//! resolver keeps the forms that name ontology classes.

use std::collections::BTreeMap;
use std::fmt;

use owlgen_ontology::{EntityKind, OntologyStore};
use regex::Regex;

/// Tag attached to an annotated surface form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Matches the label of a class in the current ontology.
    OntologyClass,
    /// An organization name.
    Organization,
    /// A person name.
    Person,
    /// A location name.
    Location,
    /// A numeric token.
    Number,
    /// Any other proper-looking name.
    Misc,
    /// Not an entity.
    Outside,
}

impl Tag {
    /// Conventional tag name, `O` for [`Tag::Outside`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::OntologyClass => "ONTOLOGY_CLASS",
            Tag::Organization => "ORGANIZATION",
            Tag::Person => "PERSON",
            Tag::Location => "LOCATION",
            Tag::Number => "NUMBER",
            Tag::Misc => "MISC",
            Tag::Outside => "O",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tagged span of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// The span as written, tokens joined by single spaces.
    pub surface: String,
    /// Its tag.
    pub tag: Tag,
}

impl Annotation {
    /// Creates an annotation.
    #[must_use]
    pub fn new(surface: impl Into<String>, tag: Tag) -> Self {
        Self {
            surface: surface.into(),
            tag,
        }
    }
}

/// Named-entity tagging over free text.
pub trait TextAnnotator {
    /// Splits `text` into tagged spans, in text order.
    fn annotate(&self, text: &str) -> Vec<Annotation>;
}

/// Annotator backed by a gazetteer of class labels.
///
/// The longest run of tokens equal to a known label is tagged
/// [`Tag::OntologyClass`]. Remaining numeric tokens are [`Tag::Number`];
/// runs of capitalized tokens are one [`Tag::Misc`] span; everything else
/// is [`Tag::Outside`].
#[derive(Debug, Clone)]
pub struct GazetteerAnnotator {
    token: Regex,
    /// Label token sequences keyed by their first token, longest first.
    entries: BTreeMap<String, Vec<Vec<String>>>,
}

impl GazetteerAnnotator {
    /// Builds a gazetteer from label texts.
    ///
    /// # Errors
    ///
    /// Returns the compilation error of the tokenizer pattern.
    pub fn new<I, T>(labels: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let token = Regex::new(r"\w+(?:[-/']\w+)*")?;
        let mut entries: BTreeMap<String, Vec<Vec<String>>> = BTreeMap::new();
        for label in labels {
            let tokens: Vec<String> = token
                .find_iter(label.as_ref())
                .map(|m| m.as_str().to_owned())
                .collect();
            let Some(first) = tokens.first() else {
                continue;
            };
            entries.entry(first.clone()).or_default().push(tokens);
        }
        for sequences in entries.values_mut() {
            sequences.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
            sequences.dedup();
        }
        Ok(Self { token, entries })
    }

    /// Builds a gazetteer from the labels of every class in `store`'s signature.
    ///
    /// # Errors
    ///
    /// Returns the compilation error of the tokenizer pattern.
    pub fn from_store<S: OntologyStore>(store: &S) -> Result<Self, regex::Error> {
        Self::new(store.labels_of(EntityKind::Class))
    }

    /// Number of distinct label entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns `true` when the gazetteer knows no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn longest_match(&self, tokens: &[&str]) -> Option<usize> {
        let candidates = self.entries.get(*tokens.first()?)?;
        candidates
            .iter()
            .find(|seq| seq.len() <= tokens.len() && seq.iter().zip(tokens).all(|(a, b)| a.as_str() == *b))
            .map(Vec::len)
    }
}

fn is_number(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit())
}

fn is_capitalized(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}

impl TextAnnotator for GazetteerAnnotator {
    fn annotate(&self, text: &str) -> Vec<Annotation> {
        let tokens: Vec<&str> = self.token.find_iter(text).map(|m| m.as_str()).collect();
        let mut spans: Vec<Annotation> = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if let Some(len) = self.longest_match(&tokens[i..]) {
                spans.push(Annotation::new(tokens[i..i + len].join(" "), Tag::OntologyClass));
                i += len;
                continue;
            }
            let token = tokens[i];
            let tag = if is_number(token) {
                Tag::Number
            } else if is_capitalized(token) {
                Tag::Misc
            } else {
                Tag::Outside
            };
            match spans.last_mut() {
                Some(last) if tag == Tag::Misc && last.tag == Tag::Misc => {
                    last.surface.push(' ');
                    last.surface.push_str(token);
                }
                _ => spans.push(Annotation::new(token, tag)),
            }
            i += 1;
        }
        spans
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tags(annotator: &GazetteerAnnotator, text: &str) -> Vec<(String, Tag)> {
        annotator
            .annotate(text)
            .into_iter()
            .map(|a| (a.surface, a.tag))
            .collect()
    }

    #[test]
    fn longest_label_wins() {
        let a = GazetteerAnnotator::new(["Noun", "Noun Phrase", "Verb"]).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(
            tags(&a, "a Noun Phrase or a Noun"),
            vec![
                ("a".into(), Tag::Outside),
                ("Noun Phrase".into(), Tag::OntologyClass),
                ("or".into(), Tag::Outside),
                ("a".into(), Tag::Outside),
                ("Noun".into(), Tag::OntologyClass),
            ]
        );
    }

    #[test]
    fn capitalized_runs_are_one_misc_span() {
        let a = GazetteerAnnotator::new(["Verb"]).unwrap();
        assert_eq!(
            tags(&a, "Proper Nouns, 42 and Verb-like Verb"),
            vec![
                ("Proper Nouns".into(), Tag::Misc),
                ("42".into(), Tag::Number),
                ("and".into(), Tag::Outside),
                ("Verb-like".into(), Tag::Misc),
                ("Verb".into(), Tag::OntologyClass),
            ]
        );
    }

    #[test]
    fn empty_gazetteer_tags_nothing_as_class() {
        let a = GazetteerAnnotator::new(Vec::<String>::new()).unwrap();
        assert!(a.is_empty());
        assert!(a.annotate("Noun").iter().all(|s| s.tag != Tag::OntologyClass));
    }
}
