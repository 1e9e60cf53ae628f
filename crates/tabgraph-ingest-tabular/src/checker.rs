//! Consistency checks on resolved columns and the error-policy dispatch.

use std::collections::HashMap;

use tracing::error;

use crate::config::ErrorPolicy;
use crate::error::{Result, TabularError};
use crate::model::Column;

/// Route a recoverable defect through the error policy.
///
/// `Abort` turns it into an error; `Continue` logs it and keeps it in
/// `defects`.
pub fn report_defect(
    policy: ErrorPolicy,
    defect: TabularError,
    defects: &mut Vec<TabularError>,
) -> Result<()> {
    match policy {
        ErrorPolicy::Abort => Err(defect),
        ErrorPolicy::Continue => {
            error!(%defect, "continuing past defect");
            defects.push(defect);
            Ok(())
        }
    }
}

/// Compare the schema's declared column count against the data width.
pub fn check_column_count(
    schema_columns: usize,
    data_columns: usize,
    policy: ErrorPolicy,
    defects: &mut Vec<TabularError>,
) -> Result<()> {
    if schema_columns == data_columns {
        return Ok(());
    }
    report_defect(
        policy,
        TabularError::SchemaColumnCountMismatch {
            schema_columns,
            data_columns,
        },
        defects,
    )
}

/// Normalized names seen so far, each with the title that introduced it.
#[derive(Debug, Default)]
pub struct ColumnNameChecker {
    seen: HashMap<String, String>,
}

impl ColumnNameChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `column` or fail with [`TabularError::DuplicateColumnName`].
    ///
    /// Duplicates are fatal whatever the error policy.
    pub fn check(&mut self, column: &Column) -> Result<()> {
        if let Some(first_title) = self.seen.get(&column.name) {
            return Err(TabularError::DuplicateColumnName {
                first_title: first_title.clone(),
                second_title: column.title.clone(),
                name: column.name.clone(),
                property_url: column.property_url.clone(),
            });
        }
        self.seen.insert(column.name.clone(), column.title.clone());
        Ok(())
    }
}

/// Check a whole column list for duplicate names.
pub fn check_unique_names(columns: &[Column]) -> Result<()> {
    let mut checker = ColumnNameChecker::new();
    columns.iter().try_for_each(|c| checker.check(c))
}
