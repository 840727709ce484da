//! Cell grammar: the patterns that pull structured values out of one cell.
//!
//! Every matcher returns `None` on a miss; callers then use the cell text
//! verbatim. Patterns are anchored on the whole trimmed cell unless a method
//! says it searches.

use regex::Regex;

use crate::syntax;

/// A `name (detail, ...)` cell split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detailed<'a> {
    /// Text before the parenthesis, trimmed.
    pub name: &'a str,
    /// Text inside the parenthesis, as written.
    pub detail: &'a str,
}

impl<'a> Detailed<'a> {
    /// Returns `true` when the detail is the `Open` or `Close` sentinel.
    #[must_use]
    pub fn is_open_close(&self) -> bool {
        syntax::is_open_close(self.detail)
    }

    /// The comma-separated details.
    pub fn details(&self) -> impl Iterator<Item = &'a str> {
        self.detail.split(',')
    }

    /// Primary name with the `Open`/`Close` sentinel appended as a suffix.
    #[must_use]
    pub fn suffixed_name(&self) -> String {
        format!("{}_{}", self.name, self.detail.trim())
    }
}

/// Parsed `(lower, upper)` cardinality tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// `(1, n)`: at least one value, of the range.
    SomeValues,
    /// `(0, n)`: any number of values, all of the range.
    AllValues,
    /// `(k, n)` with `k > 1`.
    AtLeast(u32),
    /// `(k, k)`.
    Exact(u32),
    /// `(lower, upper)` with distinct finite bounds.
    Between {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },
}

/// A `[Continued in Table N]` reference, normalized to `Table N`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableRef(pub String);

impl TableRef {
    /// Returns `true` when `file_name` contains this reference as a whole token.
    ///
    /// `Table 1` matches `Table 1 - Nouns.txt` but not `Table 12.txt`.
    #[must_use]
    pub fn matches_file(&self, file_name: &str) -> bool {
        file_name.match_indices(&self.0).any(|(at, m)| {
            !file_name[at + m.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric())
        })
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A relation name split around the affixes that mark its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationAffixes<'a> {
    /// The name without its affixes.
    pub core: &'a str,
    /// Whether any prefix or suffix was present.
    pub affixed: bool,
}

/// Compiled cell patterns. Build once per run and share.
#[derive(Debug, Clone)]
pub struct CellGrammar {
    synonym: Regex,
    part_detail: Regex,
    class_detail: Regex,
    instance_detail: Regex,
    set_literal: Regex,
    cardinality: Regex,
    value_range: Regex,
    jump: Regex,
    concept_attribute: Regex,
    relation_signature: Regex,
    active_relation: Regex,
    passive_relation: Regex,
}

impl CellGrammar {
    /// Compiles every cell pattern.
    ///
    /// # Errors
    ///
    /// Returns the compilation error of the first invalid pattern.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            synonym: Regex::new(r"^([\s*\w+\-/]+)\(([\w+,\-/\s*]+)\)$")?,
            part_detail: Regex::new(r"^([\s*\w+\-/]+)\(([\w+.\-/\s*]+)\)$")?,
            class_detail: Regex::new(r"^([\s*\w+\-/]+)%?\s*\(([\w+,\-/\s*]+)\)$")?,
            instance_detail: Regex::new(r"^([\s*\w+\-]+)\(([\w+,\-\s*]+)\)$")?,
            set_literal: Regex::new(r"^\{([\w+\-/,\s]+)\}$")?,
            cardinality: Regex::new(r"^\((\d+),\s*(\d+|n|N)\)$")?,
            value_range: Regex::new(r"^(\d+)\s+\.{2}\s+(\d+)$")?,
            jump: Regex::new(r"(?i)^\[\s*continue[sd]?\s*in\s*table\s*(\d+\w?)\s*\]$")?,
            concept_attribute: Regex::new(r"(\w*\s*\w+)\s*:\s*(\w+)%?")?,
            relation_signature: Regex::new(r"^(\w+)\s*\((\w+-*[\s\w]*),\s(\w+-*[\s\w]*)\)$")?,
            active_relation: Regex::new(r"^(has|use(?:s|dTo))?(\w+?)(At)?(_directly)?\b$")?,
            passive_relation: Regex::new(r"^(is)?(\w+?)(Of|To|By|In|With)?(_directly)?\b$")?,
        })
    }

    fn split<'a>(re: &Regex, cell: &'a str) -> Option<Detailed<'a>> {
        let caps = re.captures(cell.trim())?;
        Some(Detailed {
            name: caps.get(1)?.as_str().trim(),
            detail: caps.get(2)?.as_str(),
        })
    }

    /// `name (synonym, ...)` or `name (Open|Close)`.
    #[must_use]
    pub fn detail<'a>(&self, cell: &'a str) -> Option<Detailed<'a>> {
        Self::split(&self.synonym, cell)
    }

    /// `name (detail)` where the detail may contain dots, as in part-of tables.
    #[must_use]
    pub fn part_detail<'a>(&self, cell: &'a str) -> Option<Detailed<'a>> {
        Self::split(&self.part_detail, cell)
    }

    /// `name% (detail)`: the class cell of an individuals table.
    #[must_use]
    pub fn class_detail<'a>(&self, cell: &'a str) -> Option<Detailed<'a>> {
        Self::split(&self.class_detail, cell)
    }

    /// `name (detail)`: the instance cell of an individuals table.
    #[must_use]
    pub fn instance_detail<'a>(&self, cell: &'a str) -> Option<Detailed<'a>> {
        Self::split(&self.instance_detail, cell)
    }

    /// `{v1, v2, ...}`: the enumerated values, in written order.
    ///
    /// A single space after each comma is dropped; values are otherwise kept as written.
    #[must_use]
    pub fn set_literal(&self, cell: &str) -> Option<Vec<String>> {
        let caps = self.set_literal.captures(cell.trim())?;
        let inner = caps.get(1)?.as_str().replace(", ", ",");
        Some(inner.split(',').map(str::to_owned).collect())
    }

    /// `(lower, upper)` with `n`/`N` as an unbounded upper.
    #[must_use]
    pub fn cardinality(&self, cell: &str) -> Option<Cardinality> {
        let caps = self.cardinality.captures(cell.trim())?;
        let lower: u32 = caps.get(1)?.as_str().parse().ok()?;
        let upper = caps.get(2)?.as_str();
        if upper.eq_ignore_ascii_case("n") {
            return Some(match lower {
                0 => Cardinality::AllValues,
                1 => Cardinality::SomeValues,
                k => Cardinality::AtLeast(k),
            });
        }
        let upper: u32 = upper.parse().ok()?;
        Some(if lower == upper {
            Cardinality::Exact(lower)
        } else {
            Cardinality::Between {
                min: lower,
                max: upper,
            }
        })
    }

    /// `lo .. hi`: inclusive integer bounds.
    #[must_use]
    pub fn value_range(&self, cell: &str) -> Option<(i64, i64)> {
        let caps = self.value_range.captures(cell.trim())?;
        Some((caps.get(1)?.as_str().parse().ok()?, caps.get(2)?.as_str().parse().ok()?))
    }

    /// `[Continued in Table N]`, tolerant of case and of `continue`/`continues`.
    #[must_use]
    pub fn jump(&self, cell: &str) -> Option<TableRef> {
        let caps = self.jump.captures(cell.trim())?;
        // "table12" and "Table 12" name the same file token
        Some(TableRef(format!("Table {}", caps.get(1)?.as_str())))
    }

    /// Searches `Concept: attribute` and returns the attribute part.
    #[must_use]
    pub fn concept_attribute<'a>(&self, cell: &'a str) -> Option<&'a str> {
        Some(self.concept_attribute.captures(cell)?.get(2)?.as_str())
    }

    /// `relation (Source, Target)`: returns the relation name.
    #[must_use]
    pub fn relation_signature<'a>(&self, cell: &'a str) -> Option<&'a str> {
        Some(self.relation_signature.captures(cell.trim())?.get(1)?.as_str())
    }

    /// `hasX`, `usesX`, `usedToX`, `XAt`, `X_directly`.
    #[must_use]
    pub fn active_relation<'a>(&self, name: &'a str) -> Option<RelationAffixes<'a>> {
        Self::affixes(&self.active_relation, name)
    }

    /// `isX`, `XOf`, `XTo`, `XBy`, `XIn`, `XWith`, `X_directly`.
    #[must_use]
    pub fn passive_relation<'a>(&self, name: &'a str) -> Option<RelationAffixes<'a>> {
        Self::affixes(&self.passive_relation, name)
    }

    fn affixes<'a>(re: &Regex, name: &'a str) -> Option<RelationAffixes<'a>> {
        let caps = re.captures(name)?;
        Some(RelationAffixes {
            core: caps.get(2)?.as_str(),
            affixed: [1, 3, 4].iter().any(|&i| caps.get(i).is_some()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn grammar() -> CellGrammar {
        CellGrammar::new().unwrap()
    }

    #[test]
    fn synonym_details_split_on_commas() {
        let g = grammar();
        let d = g.detail("Noun Phrase (NP, Nominal)").unwrap();
        assert_eq!(d.name, "Noun Phrase");
        assert_eq!(d.details().map(str::trim).collect::<Vec<_>>(), vec!["NP", "Nominal"]);
        assert!(!d.is_open_close());
    }

    #[test]
    fn open_close_is_a_suffix_not_a_synonym() {
        let g = grammar();
        let d = g.detail("Bracket (Open)").unwrap();
        assert!(d.is_open_close());
        assert_eq!(d.suffixed_name(), "Bracket_Open");
    }

    #[test]
    fn patterns_anchor_on_the_whole_cell() {
        let g = grammar();
        assert!(g.detail("a word (see below) and more").is_none());
        assert!(g.set_literal("values {a, b}").is_none());
        assert!(g.cardinality("(0, n) maybe").is_none());
        assert!(g.jump("see [Continued in Table 3]").is_none());
    }

    #[test]
    fn set_literals_keep_order() {
        let g = grammar();
        assert_eq!(
            g.set_literal("{TRUE, red, dark blue}").unwrap(),
            vec!["TRUE", "red", "dark blue"]
        );
    }

    #[test]
    fn cardinality_boundaries() {
        let g = grammar();
        assert_eq!(g.cardinality("(1, n)"), Some(Cardinality::SomeValues));
        assert_eq!(g.cardinality("(0, N)"), Some(Cardinality::AllValues));
        assert_eq!(g.cardinality("(3,n)"), Some(Cardinality::AtLeast(3)));
        assert_eq!(g.cardinality("(0, 1)"), Some(Cardinality::Between { min: 0, max: 1 }));
        assert_eq!(g.cardinality("(2, 2)"), Some(Cardinality::Exact(2)));
        assert_eq!(g.cardinality("(a, 2)"), None);
    }

    #[test]
    fn value_ranges() {
        let g = grammar();
        assert_eq!(g.value_range("1 .. 12"), Some((1, 12)));
        assert_eq!(g.value_range("1..12"), None);
    }

    #[test]
    fn jump_references_are_normalized() {
        let g = grammar();
        for cell in [
            "[Continued in Table 12]",
            "[ continues in table 12 ]",
            "[Continue in Table12]",
        ] {
            assert_eq!(g.jump(cell), Some(TableRef("Table 12".into())), "{cell}");
        }
        assert_eq!(g.jump("[Continued in Table 4b]"), Some(TableRef("Table 4b".into())));
    }

    #[test]
    fn table_refs_match_whole_tokens() {
        let r = TableRef("Table 1".into());
        assert!(r.matches_file("Table 1 - Word classes.txt"));
        assert!(r.matches_file("Core Table 1.txt"));
        assert!(!r.matches_file("Table 12 - Nouns.txt"));
    }

    #[test]
    fn glossary_cells() {
        let g = grammar();
        assert_eq!(g.concept_attribute("Word: gender%"), Some("gender"));
        assert_eq!(g.relation_signature("hasPart (Word, Morpheme)"), Some("hasPart"));
        assert_eq!(g.relation_signature("hasPart"), None);
    }

    #[test]
    fn relation_affixes() {
        let g = grammar();
        let active = g.active_relation("hasPart_directly").unwrap();
        assert_eq!(active.core, "Part");
        assert!(active.affixed);
        let passive = g.passive_relation("isPartOf").unwrap();
        assert_eq!(passive.core, "Part");
        assert!(!g.active_relation("contains").unwrap().affixed);
    }
}
