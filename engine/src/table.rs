//! Table reader.
//!
//! A table file is line oriented: line 1 is a title and is discarded, line 2
//! is the header, data starts at line 3. Column roles are inferred once from
//! the header into a [`ColumnMap`]; rows are then read lazily in one forward
//! pass.
//!
//! A physical line may carry several logical rows joined by the
//! `$CRLF~~` record marker. Depending on the [`RowMode`] such lines are split
//! into one row per fragment, and in [`RowMode::RecordsOnly`] they are the
//! only lines read at all.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::syntax::{self, CARRIAGE_RETURN, SEPARATOR};

/// Header keyword that marks a trailing example column.
const EXAMPLE: &str = "EXAMPLE";

/// The header line of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    cells: Vec<String>,
}

impl Header {
    /// Splits a header line into its cells.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        Self {
            cells: syntax::split_fields(line, SEPARATOR)
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Header cells, in column order.
    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Returns `true` when the last column is an example column.
    #[must_use]
    pub fn ends_with_example(&self) -> bool {
        self.cells
            .last()
            .is_some_and(|c| c.to_uppercase().contains(EXAMPLE))
    }

    /// Infers a role-to-index map from this header.
    #[must_use]
    pub fn columns(&self, rules: &[ColumnRule]) -> ColumnMap {
        ColumnMap::infer(self, rules)
    }
}

/// Semantic role of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    /// Class (concept) column.
    Concept,
    /// Attribute name column.
    Attribute,
    /// Relation name column.
    Relation,
    /// Source concept of a relation.
    Source,
    /// Target concept of a relation or decomposition.
    Target,
    /// Explicit inverse relation.
    Inverse,
    /// Value of an attribute rule or instance assertion.
    Value,
    /// Value type of an attribute.
    ValueType,
    /// `lo .. hi` value range.
    ValueRange,
    /// `%`-separated enumerated values.
    Values,
    /// `(m, n)` cardinality.
    Cardinality,
    /// Mathematical characteristics of a relation.
    Characteristics,
    /// Free-text description.
    Description,
    /// Synonym list.
    Synonym,
    /// Entity name.
    Name,
    /// Whole in a part-of table.
    Holonym,
    /// Part in a part-of table.
    Meronym,
    /// Decomposition group.
    Group,
    /// Components of a grouped decomposition.
    GroupComponents,
    /// Individual name.
    Instance,
}

impl Column {
    /// Human-readable role name, used in error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Concept => "CONCEPT",
            Column::Attribute => "ATTRIBUTE",
            Column::Relation => "RELATION",
            Column::Source => "SOURCE",
            Column::Target => "TARGET",
            Column::Inverse => "INVERSE",
            Column::Value => "VALUE",
            Column::ValueType => "VALUE TYPE",
            Column::ValueRange => "VALUE RANGE",
            Column::Values => "VALUES",
            Column::Cardinality => "CARDINALITY",
            Column::Characteristics => "MATHEMATIC PROPERTIES",
            Column::Description => "DESCRIPTION",
            Column::Synonym => "SYNONYM",
            Column::Name => "NAME",
            Column::Holonym => "HOLONYM",
            Column::Meronym => "MERONYM",
            Column::Group => "GROUP",
            Column::GroupComponents => "GROUP COMPONENTS",
            Column::Instance => "INSTANCE",
        }
    }
}

/// How a header cell is recognized as a column role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRule {
    column: Column,
    any_of: &'static [&'static str],
    none_of: &'static [&'static str],
    exact: bool,
}

impl ColumnRule {
    /// Matches a header cell containing any keyword, ignoring case.
    #[must_use]
    pub const fn contains(column: Column, any_of: &'static [&'static str]) -> Self {
        Self {
            column,
            any_of,
            none_of: &[],
            exact: false,
        }
    }

    /// Matches a header cell equal to any keyword, ignoring case and padding.
    #[must_use]
    pub const fn exact(column: Column, any_of: &'static [&'static str]) -> Self {
        Self {
            column,
            any_of,
            none_of: &[],
            exact: true,
        }
    }

    /// Rejects header cells containing any of `none_of`.
    #[must_use]
    pub const fn excluding(mut self, none_of: &'static [&'static str]) -> Self {
        self.none_of = none_of;
        self
    }

    fn matches(&self, cell: &str) -> bool {
        let cell = cell.trim().to_uppercase();
        let hit = if self.exact {
            self.any_of.iter().any(|k| cell == *k)
        } else {
            self.any_of.iter().any(|k| cell.contains(k))
        };
        hit && !self.none_of.iter().any(|k| cell.contains(k))
    }
}

/// Role-to-index mapping inferred from a header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: BTreeMap<Column, usize>,
}

impl ColumnMap {
    /// Classifies each header cell by the first rule it matches.
    ///
    /// Rules are tried in order, so an earlier rule shadows later ones for
    /// the same cell. A role keeps the first column assigned to it.
    #[must_use]
    pub fn infer(header: &Header, rules: &[ColumnRule]) -> Self {
        let mut columns = BTreeMap::new();
        for (index, cell) in header.cells().iter().enumerate() {
            if let Some(rule) = rules.iter().find(|r| r.matches(cell)) {
                columns.entry(rule.column).or_insert(index);
            }
        }
        Self { columns }
    }

    /// Index of a role, if present.
    #[must_use]
    pub fn get(&self, column: Column) -> Option<usize> {
        self.columns.get(&column).copied()
    }

    /// Returns `true` when the role is present.
    #[must_use]
    pub fn has(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    /// Index of a role the caller cannot work without.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] when the header lacks the role.
    pub fn require(&self, column: Column, path: &Path) -> Result<usize> {
        self.get(column).ok_or_else(|| Error::MissingColumn {
            column: column.as_str(),
            path: path.to_path_buf(),
        })
    }
}

/// Which physical lines become rows, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowMode {
    /// One row per line.
    #[default]
    Plain,
    /// Record lines are split into one row per fragment; other lines are plain rows.
    Records,
    /// Only record lines are read, one row per fragment.
    RecordsOnly,
}

/// One logical data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based physical line number.
    pub line: usize,
    /// The text the cells were split from.
    pub raw: String,
    cells: Vec<String>,
}

impl Row {
    fn new(line: usize, raw: &str) -> Self {
        Self {
            line,
            raw: raw.to_owned(),
            cells: syntax::split_fields(raw, SEPARATOR)
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Cell at `index`, as written.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Cell of a role, as written.
    #[must_use]
    pub fn get(&self, columns: &ColumnMap, column: Column) -> Option<&str> {
        self.cell(columns.get(column)?)
    }

    /// All cells.
    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Returns `true` when the raw text contains `needle`.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.raw.contains(needle)
    }
}

/// Lazy, single-pass reader over the rows of one table file.
#[derive(Debug)]
pub struct TableReader<R> {
    path: PathBuf,
    reader: R,
    header: Header,
    mode: RowMode,
    drop_example: bool,
    line: usize,
    pending: std::vec::IntoIter<Row>,
}

impl TableReader<BufReader<File>> {
    /// Opens a table file and reads its header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableNotFound`] when the file does not exist, and
    /// [`Error::Io`] or [`Error::MissingHeader`] when it cannot be read.
    pub fn open(path: &Path, mode: RowMode) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::TableNotFound(path.to_path_buf()),
            _ => Error::io(path, e),
        })?;
        Self::from_reader(path, BufReader::new(file), mode)
    }
}

impl<R: BufRead> TableReader<R> {
    /// Wraps a reader, consuming the title and header lines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on a read failure and [`Error::MissingHeader`]
    /// when the input ends before line 2.
    pub fn from_reader(path: &Path, reader: R, mode: RowMode) -> Result<Self> {
        let mut this = Self {
            path: path.to_path_buf(),
            reader,
            header: Header { cells: Vec::new() },
            mode,
            drop_example: false,
            line: 0,
            pending: Vec::new().into_iter(),
        };
        this.next_line()?
            .ok_or_else(|| Error::MissingHeader(this.path.clone()))?;
        let header = this
            .next_line()?
            .ok_or_else(|| Error::MissingHeader(this.path.clone()))?;
        this.header = Header::parse(&header);
        this.drop_example = this.header.ends_with_example();
        Ok(this)
    }

    /// The table header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Path of the file being read.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| Error::io(&self.path, e))?;
        if read == 0 {
            return Ok(None);
        }
        self.line += 1;
        let text = String::from_utf8_lossy(&buf);
        Ok(Some(text.trim_end_matches(['\n', '\r']).to_owned()))
    }

    fn rows_of(&self, text: &str) -> Vec<Row> {
        if text.contains(CARRIAGE_RETURN) && self.mode != RowMode::Plain {
            let marker = format!("{}{}", CARRIAGE_RETURN, SEPARATOR);
            return syntax::split_fields(text, &marker)
                .into_iter()
                .map(|fragment| Row::new(self.line, fragment))
                .collect();
        }
        if self.mode == RowMode::RecordsOnly {
            return Vec::new();
        }
        let mut row = Row::new(self.line, text);
        if self.drop_example && row.cells.len() > 1 {
            row.cells.pop();
        }
        vec![row]
    }
}

impl<R: BufRead> Iterator for TableReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            let text = match self.next_line() {
                Ok(Some(text)) => text,
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            };
            self.pending = self.rows_of(&text).into_iter();
        }
    }
}

/// A fully read table: header plus rows.
#[derive(Debug, Clone)]
pub struct Table {
    /// Source file.
    pub path: PathBuf,
    /// Header line.
    pub header: Header,
    /// Data rows in file order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Reads every row of a table file.
    ///
    /// # Errors
    ///
    /// See [`TableReader::open`]; read errors on data lines are returned too.
    pub fn load(path: &Path, mode: RowMode) -> Result<Self> {
        let reader = TableReader::open(path, mode)?;
        let header = reader.header().clone();
        let rows = reader.collect::<Result<Vec<_>>>()?;
        Ok(Self {
            path: path.to_path_buf(),
            header,
            rows,
        })
    }

    /// Infers the column map of this table.
    #[must_use]
    pub fn columns(&self, rules: &[ColumnRule]) -> ColumnMap {
        self.header.columns(rules)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn read(text: &str, mode: RowMode) -> Vec<Row> {
        TableReader::from_reader(Path::new("t.txt"), text.as_bytes(), mode)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn preamble_is_skipped() {
        let rows = read("Table 1. Words\nA~~B\nVerb~~Noun\n", RowMode::Plain);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 3);
        assert_eq!(rows[0].cells(), ["Verb", "Noun"]);
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = TableReader::from_reader(Path::new("t.txt"), "title only\n".as_bytes(), RowMode::Plain)
            .unwrap_err();
        assert!(matches!(err, Error::MissingHeader(_)));
    }

    #[test]
    fn trailing_example_column_is_dropped() {
        let rows = read(
            "title\nGEN~~SPEC~~EXAMPLE\nVerb~~Noun~~to run~~\n",
            RowMode::Plain,
        );
        assert_eq!(rows[0].cells(), ["Verb", "Noun"]);
    }

    #[test]
    fn record_lines_split_into_fragments() {
        let text = "title\nTARGET~~COMPONENT\nWord~~Noun$CRLF~~Word~~Verb$CRLF~~\nplain~~line\n";
        let rows = read(text, RowMode::Records);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].cells(), ["Word", "Verb"]);
        assert_eq!(rows[1].line, 3);

        let only = read(text, RowMode::RecordsOnly);
        assert_eq!(only.len(), 2);
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let rows = read("title\r\nA~~B\r\nx~~y\r\n", RowMode::Plain);
        assert_eq!(rows[0].cells(), ["x", "y"]);
    }

    #[test]
    fn column_rules_shadow_in_order() {
        let header = Header::parse("SOURCE CONCEPT~~RELATION NAME~~TARGET CONCEPT");
        let map = header.columns(&[
            ColumnRule::contains(Column::Target, &["TARGET"]),
            ColumnRule::contains(Column::Concept, &["CONCEPT"]),
            ColumnRule::contains(Column::Relation, &["RELATION"]),
        ]);
        assert_eq!(map.get(Column::Concept), Some(0));
        assert_eq!(map.get(Column::Target), Some(2));
        assert_eq!(map.get(Column::Relation), Some(1));
    }

    #[test]
    fn exclusions_and_exact_rules() {
        let header = Header::parse("VALUE TYPE~~value~~ATTRIBUTES");
        let map = header.columns(&[
            ColumnRule::contains(Column::Value, &["VALUE"]).excluding(&["TYPE"]),
            ColumnRule::exact(Column::Attribute, &["ATTRIBUTE"]),
        ]);
        assert_eq!(map.get(Column::Value), Some(1));
        assert!(!map.has(Column::Attribute));
        assert!(map.require(Column::Attribute, Path::new("t.txt")).is_err());
    }
}
