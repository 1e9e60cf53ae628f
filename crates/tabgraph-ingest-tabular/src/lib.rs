//! Tabular ingestion for Tabgraph.
//!
//! Converts one delimited-text resource into graph edges, CSVW style:
//!
//! 1. the first record and any `csvw:TableSchema` in the input graph are
//!    resolved into columns ([`schema`], [`discovery`], [`checker`]),
//! 2. each data row is mapped to per-cell edges ([`mapper`], [`template`]),
//! 3. metadata and edges are assembled into the output graph ([`assemble`]).
//!
//! [`TabularModule`] ties these together behind a [`TabularConfig`].

pub mod assemble;
pub mod checker;
pub mod config;
pub mod discovery;
pub mod error;
pub mod mapper;
pub mod model;
pub mod normalize;
pub mod reader;
pub mod schema;
pub mod template;

use tabgraph_graph::Graph;
use tracing::{error, info, warn};

pub use config::{ErrorPolicy, OutputMode, TabularConfig};
pub use error::{Result, TabularError};
pub use model::{Column, Row, SchemaOrigin, Table, TableGroup, TableSchema};
pub use normalize::normalize_column_name;
pub use reader::{
    CsvTabularReader, Dialect, RowSource, StreamResource, StreamResourceRegistry, TabularReader,
};
pub use template::{expand_template, UrlTemplate, ROW_INDEX_BASE};

use assemble::OutputAssembler;
use mapper::RowMapper;
use schema::{resolve_schema, SchemaContext};

/// What happened during a conversion besides the graph itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub rows: usize,
    /// Triples produced by this conversion (before merging with the input).
    pub triples: usize,
    pub warnings: Vec<String>,
    /// Defects passed over under [`ErrorPolicy::Continue`], plus any read
    /// failure that cut the scan short.
    pub defects: Vec<TabularError>,
}

impl ConversionReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.defects.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularOutcome {
    pub graph: Graph,
    pub table_group: TableGroup,
    pub report: ConversionReport,
}

#[derive(Debug, Clone)]
pub struct TabularModule {
    config: TabularConfig,
}

impl TabularModule {
    pub fn new(config: TabularConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TabularConfig {
        &self.config
    }

    /// Convert the configured resource with the `csv`-backed reader.
    pub fn execute(
        &self,
        input: &Graph,
        resources: &StreamResourceRegistry,
    ) -> Result<TabularOutcome> {
        self.execute_with(input, resources, &CsvTabularReader)
    }

    pub fn execute_with(
        &self,
        input: &Graph,
        resources: &StreamResourceRegistry,
        reader: &dyn TabularReader,
    ) -> Result<TabularOutcome> {
        let cfg = &self.config;
        let dialect = cfg.dialect()?;
        let resource = resources.get(&cfg.source_locator)?;
        let mut source = reader.open(resource, &dialect)?;

        let mut report = ConversionReport::default();
        let mut table = Table {
            url: cfg.source_locator.clone(),
            id: cfg.table_id.clone(),
            schema: None,
            row_count: 0,
        };
        let mut assembler =
            OutputAssembler::new(cfg.output_mode, &cfg.source_locator, cfg.table_id.as_deref());
        assembler.begin_table(cfg.table_group_id.as_deref(), &cfg.source_locator);

        let first = match source.first_record() {
            Ok(Some(first)) => Some(first),
            Ok(None) => {
                let message = format!(
                    "stream resource {} holds no tabular data",
                    cfg.source_locator
                );
                warn!("{message}");
                report.warnings.push(message);
                None
            }
            Err(err) => {
                error!(%err, "could not read the first record");
                report.defects.push(err);
                None
            }
        };

        if let Some(first) = first {
            let external = discovery::select_schema(input, &mut report.warnings)?;
            let resolved = resolve_schema(&first, external.as_ref(), &SchemaContext::from_config(cfg))?;
            report.defects.extend(resolved.defects);
            assembler.add_schema(&resolved.schema);

            let mapper = RowMapper::new(
                &resolved.schema,
                &cfg.source_locator,
                dialect.has_header,
                cfg.error_policy,
            );
            let mut position = 0;
            while let Some(next) = source.next_row() {
                match next {
                    Ok(cells) => {
                        let row = mapper.map_row(position, &cells, &mut report.defects)?;
                        assembler.add_row(row);
                        position += 1;
                    }
                    Err(err) => {
                        error!(%err, "stopping after a read failure");
                        report.defects.push(err);
                        break;
                    }
                }
            }
            table.row_count = position;
            table.schema = Some(resolved.schema);
        }

        report.rows = table.row_count;
        report.triples = assembler.len();
        info!(
            source = %cfg.source_locator,
            rows = report.rows,
            triples = report.triples,
            defects = report.defects.len(),
            "tabular conversion finished"
        );

        Ok(TabularOutcome {
            graph: assembler.finish(input, cfg.replace),
            table_group: TableGroup {
                id: cfg.table_group_id.clone(),
                table,
            },
            report,
        })
    }
}
