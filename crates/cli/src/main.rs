//! # sheetbind-cli
//!
//! Command-line tools around sheetbind: inspect the header row a decoder
//! would see, and write header-only workbooks from field tags.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use sheetbind_core::{column_name, Encoder, FieldDescriptor, TableSink, TableSource};
use sheetbind_xlsx::{XlsxReader, XlsxWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// sheetbind - map spreadsheet rows to typed records
#[derive(Parser)]
#[command(name = "sheetbind")]
#[command(author, version, about = "Map spreadsheet rows to typed records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show the sheets and the header row of a workbook
    Inspect {
        /// Workbook path or http(s) URL
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Output format (json, table)
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: OutputFormat,
    },
    /// Write an empty workbook whose header row is built from field tags
    Template {
        /// Output xlsx file
        #[arg(value_name = "OUT")]
        out: PathBuf,

        /// Field tag such as "手机号;width:16", repeated in column order
        #[arg(short = 'c', long = "column", value_name = "TAG", required = true)]
        columns: Vec<String>,

        /// Sheet name
        #[arg(long, default_value = sheetbind_core::DEFAULT_SHEET_NAME)]
        sheet: String,
    },
}

/// Output format for `inspect`.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Plain table output (default)
    #[default]
    Table,
}

/// What `inspect` reports about a workbook.
#[derive(Debug, Serialize, PartialEq)]
struct Inspection {
    sheets: Vec<String>,
    header: Vec<HeaderCell>,
    data_rows: usize,
}

#[derive(Debug, Serialize, PartialEq)]
struct HeaderCell {
    column: String,
    label: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    match cli.command {
        Command::Inspect { source, format } => {
            let bytes = load(&source).await?;
            let inspection = inspect(bytes)?;
            print_inspection(&inspection, format)?;
        }
        Command::Template {
            out,
            columns,
            sheet,
        } => {
            write_template(&out, &columns, &sheet)?;
            println!(
                "{} {} ({} columns)",
                "Wrote".green().bold(),
                out.display(),
                columns.len()
            );
        }
    }

    Ok(())
}

/// Read workbook bytes from a local path or an http(s) URL.
async fn load(source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        sheetbind_http::fetch_bytes(source)
            .await
            .with_context(|| format!("Failed to fetch: {source}"))
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read file: {source}"))
    }
}

/// Describe the first sheet the way the decoder sees it.
fn inspect(bytes: Vec<u8>) -> Result<Inspection> {
    let mut reader = XlsxReader::from_bytes(bytes).context("Not an xlsx workbook")?;
    let sheets = reader.sheet_names()?;

    let Some(first) = sheets.first().cloned() else {
        return Ok(Inspection {
            sheets,
            header: Vec::new(),
            data_rows: 0,
        });
    };

    let rows = reader.read_rows(&first)?;
    let header = rows
        .first()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(index, label)| HeaderCell {
                    column: column_name(index),
                    label: label.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Inspection {
        sheets,
        header,
        data_rows: rows.len().saturating_sub(1),
    })
}

fn print_inspection(inspection: &Inspection, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(inspection)?);
        }
        OutputFormat::Table => {
            println!("{} {}", "Sheets:".bold(), inspection.sheets.join(", "));
            println!("{}", "Header:".bold());
            for cell in &inspection.header {
                println!("  {:>4}  {}", cell.column.cyan(), cell.label);
            }
            println!("{} {}", "Data rows:".bold(), inspection.data_rows);
        }
    }
    Ok(())
}

/// Write a workbook holding only the header row described by `tags`.
fn write_template(out: &Path, tags: &[String], sheet: &str) -> Result<()> {
    let fields: Vec<FieldDescriptor> = tags
        .iter()
        .enumerate()
        .map(|(slot, tag)| FieldDescriptor::from_tag(tag, slot))
        .collect();

    let mut writer = XlsxWriter::new();
    Encoder::new()
        .with_sheet_name(sheet)
        .write_header(&mut writer, &fields)?;
    writer.set_active_sheet(sheet)?;
    writer
        .save(out)
        .with_context(|| format!("Failed to write: {}", out.display()))?;

    tracing::info!(path = %out.display(), columns = fields.len(), "wrote template");
    Ok(())
}
