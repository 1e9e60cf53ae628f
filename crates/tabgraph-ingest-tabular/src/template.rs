//! URL templates with row placeholders.
//!
//! The only placeholder recognised is `{_row}`; it expands to the row number.
//! Row numbers are 1-based and count data rows only, so the first data row is
//! row 1 whether or not the input had a header line. Any other `{...}`
//! segment is left untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const ROW_PLACEHOLDER: &str = "{_row}";

/// Number of the first data row.
pub const ROW_INDEX_BASE: usize = 1;

/// Row number for the data row at 0-based `position`.
pub fn row_number(position: usize) -> usize {
    position + ROW_INDEX_BASE
}

/// Physical line of a data row in the source, counting a consumed header line.
pub fn source_line(row: usize, header_consumed: bool) -> usize {
    if header_consumed {
        row + 1
    } else {
        row
    }
}

/// Replace every `{_row}` occurrence in `template` with `row`.
pub fn expand_template(template: &str, row: usize) -> String {
    if template.contains(ROW_PLACEHOLDER) {
        template.replace(ROW_PLACEHOLDER, &row.to_string())
    } else {
        template.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// `<source>#row-{_row}`: one subject per row, anchored on the source.
    pub fn default_about(source_locator: &str) -> Self {
        Self(format!("{source_locator}#row-{ROW_PLACEHOLDER}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_row_dependent(&self) -> bool {
        self.0.contains(ROW_PLACEHOLDER)
    }

    /// Names of all `{...}` placeholders, in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut rest = self.0.as_str();
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                break;
            };
            out.push(&after[..close]);
            rest = &after[close + 1..];
        }
        out
    }

    /// Placeholders other than `_row`; these pass through expansion verbatim.
    pub fn unsupported_placeholders(&self) -> Vec<&str> {
        self.placeholders()
            .into_iter()
            .filter(|name| *name != "_row")
            .collect()
    }

    pub fn expand(&self, row: usize) -> String {
        expand_template(&self.0, row)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UrlTemplate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UrlTemplate {
    fn from(value: String) -> Self {
        Self(value)
    }
}
