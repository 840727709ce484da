//! Entity naming.
//!
//! Name equality is entity identity: two cells that normalize to the same
//! key denote the same entity. The rules here are therefore load-bearing
//! and must stay idempotent.

use cruet::Inflector;

/// Class (and individual) name for a raw cell.
///
/// All-uppercase text is treated as an acronym or code and keeps its word
/// boundaries as `_`; anything else is camel-joined by dropping spaces.
///
/// ```
/// use owlgen_engine::naming::class_name;
/// assert_eq!(class_name("Noun Phrase"), "NounPhrase");
/// assert_eq!(class_name("NOUN PHRASE"), "NOUN_PHRASE");
/// assert_eq!(class_name(class_name("Noun Phrase").as_str()), "NounPhrase");
/// ```
#[must_use]
pub fn class_name(raw: &str) -> String {
    let text = raw.trim();
    if text.to_uppercase() == text {
        text.replace(' ', "_")
    } else {
        text.replace(' ', "")
    }
}

/// Individual name for a raw cell; same rule as [`class_name`].
#[must_use]
pub fn individual_name(raw: &str) -> String {
    class_name(raw)
}

/// Object or data property name: spaces dropped, first letter lower-cased.
///
/// ```
/// use owlgen_engine::naming::property_name;
/// assert_eq!(property_name("Has Part"), "hasPart");
/// ```
#[must_use]
pub fn property_name(raw: &str) -> String {
    uncapitalize(&raw.trim().replace(' ', ""))
}

/// Replaces `/` by `-`, as taxonomy and domain cells require before naming.
#[must_use]
pub fn dehyphenate(raw: &str) -> String {
    raw.replace('/', "-")
}

/// Upper-cases the first character.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character.
#[must_use]
pub fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Splits a camel-case identifier into its words.
///
/// A boundary falls before an upper-case letter that follows a non-upper-case
/// one, and before the last capital of an acronym that starts a new word.
///
/// ```
/// use owlgen_engine::naming::split_camel_case;
/// assert_eq!(split_camel_case("MarkedUp"), vec!["Marked", "Up"]);
/// assert_eq!(split_camel_case("HTMLParser"), vec!["HTML", "Parser"]);
/// ```
#[must_use]
pub fn split_camel_case(s: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut words = Vec::new();
    let mut start = 0;
    for i in 1..chars.len() {
        let (offset, c) = chars[i];
        if !c.is_uppercase() {
            continue;
        }
        let prev = chars[i - 1].1;
        let next_is_lower = chars.get(i + 1).is_some_and(|(_, n)| n.is_lowercase());
        if !prev.is_uppercase() || next_is_lower {
            words.push(&s[start..offset]);
            start = offset;
        }
    }
    if start < s.len() {
        words.push(&s[start..]);
    }
    words
}

/// Singular form of an English noun phrase.
#[must_use]
pub fn singular(s: &str) -> String {
    s.to_singular()
}

/// Class name an annotated entity points at: singular, capitalized, joined.
///
/// Delimiters between words are spaces, `-` and `/`.
#[must_use]
pub fn entity_class_key(entity: &str) -> String {
    entity
        .split([' ', '-', '/'])
        .filter(|w| !w.is_empty())
        .map(|w| capitalize(&singular(w)))
        .collect()
}
