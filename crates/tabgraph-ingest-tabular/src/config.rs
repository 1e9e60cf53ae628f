//! Module configuration.
//!
//! Every knob the conversion reads is carried explicitly in
//! [`TabularConfig`]; nothing is read from process-wide state. Field names
//! deserialize in kebab-case (`data-prefix`, `skip-header`, ...) so pipeline
//! files stay close to the module's parameter names.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabularError};
use crate::reader::Dialect;

/// How much of the conversion result is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Table group, table, schema, column and row metadata plus cell edges.
    #[default]
    Standard,
    /// Cell edges only.
    Minimal,
}

impl OutputMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" => Some(OutputMode::Standard),
            "minimal" => Some(OutputMode::Minimal),
            _ => None,
        }
    }
}

/// What to do with recoverable defects (schema mismatches, ragged rows).
///
/// Duplicate column names ignore the policy: they are always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop and return the defect as an error.
    #[default]
    Abort,
    /// Log the defect, record it in the report and carry on with defaults.
    Continue,
}

impl ErrorPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "abort" | "fail" => Some(ErrorPolicy::Abort),
            "continue" | "log" => Some(ErrorPolicy::Continue),
            _ => None,
        }
    }
}

fn default_delimiter() -> char {
    '\t'
}

fn default_quote_character() -> char {
    '"'
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TabularConfig {
    /// Locator of the tabular resource; also the base of default URLs.
    pub source_locator: String,
    /// Prefix for default property URLs. Required; empty means "use the
    /// source locator".
    pub data_prefix: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_quote_character")]
    pub quote_character: char,
    /// Treat the first line as data instead of a header.
    #[serde(default)]
    pub skip_header: bool,
    /// Replace the input graph instead of adding to it.
    #[serde(default)]
    pub replace: bool,
    #[serde(default)]
    pub output_mode: OutputMode,
    #[serde(default)]
    pub error_policy: ErrorPolicy,
    /// External identifier for the table group node (blank node otherwise).
    #[serde(default)]
    pub table_group_id: Option<String>,
    /// External identifier for the table node (blank node otherwise).
    #[serde(default)]
    pub table_id: Option<String>,
}

impl TabularConfig {
    pub fn new(source_locator: impl Into<String>, data_prefix: impl Into<String>) -> Self {
        Self {
            source_locator: source_locator.into(),
            data_prefix: data_prefix.into(),
            delimiter: default_delimiter(),
            quote_character: default_quote_character(),
            skip_header: false,
            replace: false,
            output_mode: OutputMode::default(),
            error_policy: ErrorPolicy::default(),
            table_group_id: None,
            table_id: None,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote_character(mut self, quote: char) -> Self {
        self.quote_character = quote;
        self
    }

    pub fn with_skip_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }

    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_table_group_id(mut self, id: impl Into<String>) -> Self {
        self.table_group_id = Some(id.into());
        self
    }

    pub fn with_table_id(mut self, id: impl Into<String>) -> Self {
        self.table_id = Some(id.into());
        self
    }

    /// Validate the configuration and derive the reader dialect.
    pub fn dialect(&self) -> Result<Dialect> {
        if self.source_locator.trim().is_empty() {
            return Err(TabularError::InvalidConfig(
                "source locator must not be empty".to_string(),
            ));
        }
        let delimiter = ascii_byte("delimiter", self.delimiter)?;
        let quote = ascii_byte("quote character", self.quote_character)?;
        if delimiter == quote {
            return Err(TabularError::InvalidConfig(format!(
                "delimiter and quote character are both {:?}",
                self.delimiter
            )));
        }
        Ok(Dialect {
            delimiter,
            quote,
            has_header: !self.skip_header,
        })
    }
}

fn ascii_byte(what: &str, c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(TabularError::InvalidConfig(format!(
            "{what} must be a single ASCII character, got {c:?}"
        )))
    }
}
