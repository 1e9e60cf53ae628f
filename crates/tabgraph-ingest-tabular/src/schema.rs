//! Schema resolution: first record + optional external schema -> columns.
//!
//! Resolution is a straight pipeline: titles are chosen, each title is
//! normalized and matched against the external schema, the resulting column
//! is checked for name collisions, and the table's subject template is picked.
//! Nothing is mutated after it is returned.

use tracing::{debug, info};

use crate::checker::{check_column_count, report_defect, ColumnNameChecker};
use crate::config::{ErrorPolicy, TabularConfig};
use crate::discovery::{ExternalColumn, ExternalSchema};
use crate::error::{Result, TabularError};
use crate::model::{Column, SchemaOrigin, TableSchema};
use crate::normalize::{encode_name, normalize_column_name, positional_title};
use crate::template::UrlTemplate;

/// The parts of the configuration resolution depends on.
#[derive(Debug, Clone, Copy)]
pub struct SchemaContext<'a> {
    pub source_locator: &'a str,
    pub data_prefix: &'a str,
    pub skip_header: bool,
    pub policy: ErrorPolicy,
}

impl<'a> SchemaContext<'a> {
    pub fn from_config(config: &'a TabularConfig) -> Self {
        Self {
            source_locator: &config.source_locator,
            data_prefix: &config.data_prefix,
            skip_header: config.skip_header,
            policy: config.error_policy,
        }
    }

    /// `<data-prefix><name>`, or `<source>#<name>` when there is no prefix.
    pub fn default_property_url(&self, name: &str) -> String {
        let encoded = encode_name(name);
        if self.data_prefix.is_empty() {
            format!("{}#{encoded}", self.source_locator)
        } else {
            format!("{}{encoded}", self.data_prefix)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub schema: TableSchema,
    /// Defects passed over under [`ErrorPolicy::Continue`].
    pub defects: Vec<TabularError>,
}

/// Resolve the table schema for data whose first record is `first_record`.
pub fn resolve_schema(
    first_record: &[String],
    external: Option<&ExternalSchema>,
    ctx: &SchemaContext<'_>,
) -> Result<ResolvedSchema> {
    let width = first_record.len();
    let mut defects = Vec::new();

    if let Some(schema) = external {
        check_column_count(schema.column_count(), width, ctx.policy, &mut defects)?;
    }

    // Without a header, the schema's declared order alone identifies columns.
    let ordered = if ctx.skip_header {
        external.and_then(declared_order)
    } else {
        None
    };
    let titles = column_titles(first_record, ordered.as_deref(), ctx.skip_header);
    let mut checker = ColumnNameChecker::new();
    let mut columns = Vec::with_capacity(width);
    for (position, title) in titles.into_iter().enumerate() {
        let pinned = ordered.as_ref().and_then(|cols| cols.get(position).copied());
        let column = resolve_column(position, title, pinned, external, ctx, &mut defects)?;
        checker.check(&column)?;
        columns.push(column);
    }

    let about_url = external
        .and_then(|s| s.about_url.clone())
        .map(UrlTemplate::from)
        .unwrap_or_else(|| UrlTemplate::default_about(ctx.source_locator));

    let schema = TableSchema {
        columns,
        about_url,
        origin: if external.is_some() {
            SchemaOrigin::External
        } else {
            SchemaOrigin::Synthesized
        },
    };
    log_unsupported_placeholders(&schema);

    Ok(ResolvedSchema { schema, defects })
}

fn declared_order(schema: &ExternalSchema) -> Option<Vec<&ExternalColumn>> {
    let ordered = schema.ordered_columns();
    if ordered.is_none() {
        info!("table schema gives no column order; using positional column names");
    }
    ordered
}

fn column_titles(
    first_record: &[String],
    ordered: Option<&[&ExternalColumn]>,
    skip_header: bool,
) -> Vec<String> {
    if !skip_header {
        return first_record.to_vec();
    }
    (0..first_record.len())
        .map(|i| {
            ordered
                .and_then(|cols| cols.get(i))
                .and_then(|c| c.name.clone().or_else(|| c.title.clone()))
                .unwrap_or_else(|| positional_title(i))
        })
        .collect()
}

fn resolve_column<'s>(
    position: usize,
    title: String,
    pinned: Option<&'s ExternalColumn>,
    external: Option<&'s ExternalSchema>,
    ctx: &SchemaContext<'_>,
    defects: &mut Vec<TabularError>,
) -> Result<Column> {
    let name = normalize_column_name(&title);

    let matched: Option<&ExternalColumn> = match (pinned, external) {
        (Some(column), _) => Some(column),
        (None, Some(schema)) => {
            let found = schema.find_column(&name, position);
            if found.is_none() {
                report_defect(
                    ctx.policy,
                    TabularError::SchemaColumnMissing {
                        name: name.clone(),
                        title: title.clone(),
                    },
                    defects,
                )?;
            }
            found
        }
        (None, None) => None,
    };

    let title = match matched.and_then(|c| c.title.clone()) {
        Some(schema_title) if ctx.skip_header => schema_title,
        _ => title,
    };
    let property_url = matched
        .and_then(|c| c.property_url.clone())
        .unwrap_or_else(|| ctx.default_property_url(&name));

    Ok(Column {
        about_url: matched.and_then(|c| c.about_url.clone()).map(UrlTemplate::from),
        value_url: matched.and_then(|c| c.value_url.clone()).map(UrlTemplate::from),
        name,
        title,
        property_url,
    })
}

fn log_unsupported_placeholders(schema: &TableSchema) {
    let templates = std::iter::once(&schema.about_url).chain(
        schema
            .columns
            .iter()
            .flat_map(|c| c.about_url.iter().chain(c.value_url.iter())),
    );
    for template in templates {
        for placeholder in template.unsupported_placeholders() {
            debug!(%template, placeholder, "placeholder is not expanded");
        }
    }
}
