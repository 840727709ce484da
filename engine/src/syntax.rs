//! Tokens of the table mini-language.

/// Field separator between cells.
pub const SEPARATOR: &str = "~~";

/// An empty cell.
pub const NOTHING: &str = "--";

/// Separator between values inside one cell.
pub const INNER_SEPARATOR: &str = "%";

/// Ends the generalization walk of a taxonomy row.
pub const STOP: &str = "$TOP";

/// Record-continuation marker: one physical line holding several logical rows.
pub const CARRIAGE_RETURN: &str = "$CRLF";

/// Detail token that turns into an `_Open` name suffix.
pub const OPEN: &str = "Open";

/// Detail token that turns into a `_Close` name suffix.
pub const CLOSE: &str = "Close";

/// Splits `line` on `separator`, dropping trailing empty fields.
///
/// A line ending in the separator therefore yields no empty last cell.
#[must_use]
pub fn split_fields<'a>(line: &'a str, separator: &str) -> Vec<&'a str> {
    let mut fields: Vec<&str> = line.split(separator).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// Returns `true` for an `Open` / `Close` detail, ignoring case.
#[must_use]
pub fn is_open_close(detail: &str) -> bool {
    let detail = detail.trim();
    detail.eq_ignore_ascii_case(OPEN) || detail.eq_ignore_ascii_case(CLOSE)
}

/// Returns `true` when a cell holds the empty-cell token.
#[must_use]
pub fn is_nothing(cell: &str) -> bool {
    cell.trim() == NOTHING
}
