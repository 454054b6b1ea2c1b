//! Inspect command - show the inferred record for one PDF with its evidence.

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use shelfmark_core::inference::FrontMatter;
use shelfmark_core::{Cataloguer, Inference, Record};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// PDF file to inspect
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: InspectFormat,

    /// Also print the acquired front-matter text
    #[arg(long)]
    show_text: bool,

    /// Run OCR on pages with little or no embedded text
    #[arg(long)]
    ocr: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum InspectFormat {
    /// Field table
    Text,
    /// JSON document
    Json,
}

#[derive(Serialize)]
struct Inspection<'a> {
    record: &'a Record,
    evidence: &'a Inference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pages: Option<&'a [String]>,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    if args.ocr {
        config.acquisition.ocr_enabled = true;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Inspecting {}", args.input.display());

    let cataloguer = Cataloguer::from_config(&config)?;
    let document = cataloguer.load(&args.input)?;
    let evidence = cataloguer.engine().explain(&document.metadata, &document.pages);
    let record = evidence
        .clone()
        .into_record(document.page_count, document.source_path());

    match args.format {
        InspectFormat::Json => {
            let inspection = Inspection {
                record: &record,
                evidence: &evidence,
                pages: args.show_text.then_some(document.pages.as_slice()),
            };
            println!("{}", serde_json::to_string_pretty(&inspection)?);
        }
        InspectFormat::Text => {
            let front = FrontMatter::new(&document.pages);
            print_record(&record, &evidence, &front);

            if args.show_text {
                for (i, page) in document.pages.iter().enumerate() {
                    println!();
                    println!("{}", style(format!("--- page {} ---", i + 1)).dim());
                    println!("{}", page.trim_end());
                }
            }
        }
    }

    Ok(())
}

fn print_record(record: &Record, evidence: &Inference, front: &FrontMatter<'_>) {
    let row = record.to_row();
    let sources = [
        source(evidence.title.as_ref().map(|c| (c.rule, c.line)), front),
        source(evidence.author.as_ref().map(|c| (c.rule, c.line)), front),
        source(evidence.editor.as_ref().map(|c| (c.rule, c.line)), front),
        source(evidence.year.as_ref().map(|c| (c.rule, c.line)), front),
        source(evidence.publisher.as_ref().map(|c| (c.rule, c.line)), front),
        source(evidence.language.as_ref().map(|c| (c.rule, c.line)), front),
    ];

    for (i, (column, value)) in Record::COLUMNS.iter().zip(row.iter()).enumerate() {
        let value = if value == shelfmark_core::UNKNOWN {
            style(value.as_str()).yellow()
        } else {
            style(value.as_str()).green()
        };
        match sources.get(i).and_then(|s| s.as_ref()) {
            Some(source) => println!("{:>20}: {}  {}", column, value, style(source).dim()),
            None => println!("{:>20}: {}", column, value),
        }
    }
}

fn source(found: Option<(shelfmark_core::Rule, Option<usize>)>, front: &FrontMatter<'_>) -> Option<String> {
    let (rule, line) = found?;
    Some(match line.and_then(|i| front.lines().get(i)) {
        Some(line) => format!("[{} p{}: {:?}]", rule, line.page + 1, line.text),
        None => format!("[{}]", rule),
    })
}
