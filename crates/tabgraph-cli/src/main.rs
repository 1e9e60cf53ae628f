//! Tabgraph CLI
//!
//! - `tabgraph tabular <file>`: convert one CSV/TSV file into a graph
//! - `tabgraph run <pipeline.json>`: run a JSON-described module pipeline

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tabgraph_graph::OutputFormat;
use tabgraph_ingest_tabular::{ConversionReport, ErrorPolicy, OutputMode, TabularConfig};
use tracing_subscriber::EnvFilter;

use tabgraph_cli::{
    convert_file, file_locator, read_input_graph, write_graph, ModuleRegistry, Pipeline,
};

#[derive(Parser)]
#[command(name = "tabgraph")]
#[command(author, version, about = "Tabgraph: schema-driven tabular to graph conversion")]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a delimited-text file into a graph.
    ///
    /// A `csvw:TableSchema` found in `--schema` drives the mapping; without
    /// one the header row is used.
    Tabular {
        /// Input CSV/TSV file
        file: PathBuf,
        /// Prefix for default property URLs (may be empty)
        #[arg(long)]
        data_prefix: String,
        /// Source locator (default: the file's `file://` URL)
        #[arg(long)]
        source: Option<String>,
        /// Cell delimiter: a single character, `tab` or `comma`
        #[arg(long, default_value = "tab", value_parser = parse_delimiter)]
        delimiter: char,
        /// Quote character
        #[arg(long, default_value_t = '"')]
        quote: char,
        /// Treat the first line as data
        #[arg(long)]
        skip_header: bool,
        /// Emit only the produced graph instead of adding it to the input graph
        #[arg(long)]
        replace: bool,
        /// Output mode: standard|minimal
        #[arg(long, default_value = "standard", value_parser = parse_mode)]
        mode: OutputMode,
        /// Defect handling: abort|continue
        #[arg(long, default_value = "abort", value_parser = parse_policy)]
        on_error: ErrorPolicy,
        /// Input graph (Turtle or N-Triples), searched for a table schema
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Identifier for the table group node
        #[arg(long)]
        table_group_id: Option<String>,
        /// Identifier for the table node
        #[arg(long)]
        table_id: Option<String>,
        /// Output format: nt|ttl
        #[arg(long, default_value = "nt", value_parser = parse_format)]
        format: OutputFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run a pipeline file.
    Run {
        /// Pipeline JSON
        pipeline: PathBuf,
        /// Initial graph (Turtle or N-Triples)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output format: nt|ttl
        #[arg(long, default_value = "nt", value_parser = parse_format)]
        format: OutputFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    match s {
        "tab" | "\\t" => Ok('\t'),
        "comma" => Ok(','),
        "semicolon" => Ok(';'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("expected a single character, got `{s}`")),
            }
        }
    }
}

fn parse_mode(s: &str) -> Result<OutputMode, String> {
    OutputMode::from_name(s).ok_or_else(|| format!("unknown output mode `{s}`"))
}

fn parse_policy(s: &str) -> Result<ErrorPolicy, String> {
    ErrorPolicy::from_name(s).ok_or_else(|| format!("unknown error policy `{s}`"))
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_name(s).ok_or_else(|| format!("unknown output format `{s}`"))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_report(label: &str, report: &ConversionReport) {
    eprintln!(
        "{} {}: {} rows, {} triples",
        "ok".green().bold(),
        label.bold(),
        report.rows,
        report.triples
    );
    for warning in &report.warnings {
        eprintln!("  {} {warning}", "warning:".yellow().bold());
    }
    for defect in &report.defects {
        eprintln!("  {} {defect}", "defect:".red().bold());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Tabular {
            file,
            data_prefix,
            source,
            delimiter,
            quote,
            skip_header,
            replace,
            mode,
            on_error,
            schema,
            table_group_id,
            table_id,
            format,
            out,
        } => {
            let locator = match source {
                Some(source) => source,
                None => file_locator(&file)?,
            };
            let mut config = TabularConfig::new(locator.clone(), data_prefix)
                .with_delimiter(delimiter)
                .with_quote_character(quote)
                .with_skip_header(skip_header)
                .with_replace(replace)
                .with_output_mode(mode)
                .with_error_policy(on_error);
            config.table_group_id = table_group_id;
            config.table_id = table_id;

            let input = read_input_graph(schema.as_deref())?;
            let outcome = convert_file(&file, config, &input)?;
            print_report(&locator, &outcome.report);
            write_graph(&outcome.graph, format, out.as_deref())?;
            if let Some(out) = out {
                eprintln!("{} {}", "wrote".green().bold(), out.display().to_string().bold());
            }
        }

        Commands::Run {
            pipeline,
            input,
            format,
            out,
        } => {
            if !pipeline.exists() {
                return Err(anyhow!("pipeline file {} not found", pipeline.display()));
            }
            let registry = ModuleRegistry::with_builtins();
            let runner = Pipeline::load(&pipeline, &registry)?;
            eprintln!(
                "{} {} ({} modules)",
                "Running".green().bold(),
                pipeline.display(),
                runner.len()
            );
            let graph = read_input_graph(input.as_deref())?;
            let (graph, reports) = runner.run(graph)?;
            for (position, report) in &reports {
                print_report(&format!("module #{}", position + 1), report);
            }
            write_graph(&graph, format, out.as_deref())?;
            if let Some(out) = out {
                eprintln!("{} {}", "wrote".green().bold(), out.display().to_string().bold());
            }
        }
    }

    Ok(())
}
