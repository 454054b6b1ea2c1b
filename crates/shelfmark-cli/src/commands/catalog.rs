//! Catalog command - infer a record for every PDF under a directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::{glob, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use shelfmark_core::{CatalogReport, Cataloguer, Record, UnreadablePolicy};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Directory to scan recursively for PDFs (or a single PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: catalog.csv or catalog.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Run OCR on pages with little or no embedded text
    #[arg(long)]
    ocr: bool,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Number of leading pages read as front matter
    #[arg(long)]
    max_pages: Option<usize>,

    /// Leave unreadable PDFs out instead of writing an all-Unknown row
    #[arg(long)]
    skip_unreadable: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One row per book, spreadsheet columns
    Csv,
    /// Records plus the list of skipped files
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

pub async fn run(args: CatalogArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if args.ocr {
        config.acquisition.ocr_enabled = true;
    }
    if let Some(dir) = &args.model_dir {
        config.ocr.model_dir = dir.clone();
    }
    if let Some(max_pages) = args.max_pages {
        config.acquisition.max_pages = max_pages;
    }
    if args.skip_unreadable {
        config.batch.on_unreadable = UnreadablePolicy::Skip;
    }

    if config.acquisition.ocr_enabled {
        if !cfg!(feature = "ocr") {
            println!(
                "{} OCR requested but shelfmark was built without the `ocr` feature; using embedded text only",
                style("⚠").yellow()
            );
        } else if !config.ocr.models_present() {
            println!(
                "{} OCR models not found in {}; using embedded text only",
                style("⚠").yellow(),
                config.ocr.model_dir.display()
            );
        }
    }

    let files = find_pdfs(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No PDF files found under {}", args.input.display());
    }

    println!(
        "{} Found {} PDF files to catalogue",
        style("ℹ").blue(),
        files.len()
    );

    let cataloguer = Cataloguer::from_config(&config)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut report = CatalogReport::default();
    for path in &files {
        pb.set_message(file_label(path));
        report.push(path, cataloguer.process_path(path), cataloguer.policy());
        pb.inc(1);
    }
    pb.finish_and_clear();

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("catalog.{}", args.format.extension())));
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match args.format {
        OutputFormat::Csv => write_csv(&output, &report.records)?,
        OutputFormat::Json => write_json(&output, &report)?,
    }
    info!("Wrote {} records to {}", report.records.len(), output.display());

    println!(
        "{} Catalogued {} files in {:?}",
        style("✓").green(),
        files.len(),
        start.elapsed()
    );
    println!(
        "   {} records written to {}, {} unreadable",
        style(report.records.len()).green(),
        output.display(),
        style(report.failures.len()).red()
    );

    if !report.is_clean() {
        println!();
        println!("{}", style("Unreadable files:").red());
        for failure in &report.failures {
            println!("  - {}: {}", failure.path.display(), failure.error);
        }
    }

    Ok(())
}

/// Every `*.pdf` under `input`, sorted by lower-cased file name.
fn find_pdfs(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![canonical(input.to_path_buf())]);
    }
    if !input.is_dir() {
        anyhow::bail!("Input not found: {}", input.display());
    }

    let pattern = format!("{}/**/*", Pattern::escape(&input.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && is_pdf(p))
        .map(canonical)
        .collect();

    files.sort_by_cached_key(|p| (file_label(p).to_lowercase(), p.clone()));
    debug!("Scan of {} found {} PDFs", input.display(), files.len());

    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn canonical(path: PathBuf) -> PathBuf {
    fs::canonicalize(&path).unwrap_or(path)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_csv(path: &Path, records: &[Record]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(Record::COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_json(path: &Path, report: &CatalogReport) -> anyhow::Result<()> {
    let document = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "records": report.records,
        "skipped": report.failures,
    });

    fs::write(path, serde_json::to_string_pretty(&document)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_pdfs_sorts_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.pdf"), b"x").unwrap();
        fs::write(dir.path().join("nested").join("A.PDF"), b"x").unwrap();
        fs::write(dir.path().join("c.txt"), b"x").unwrap();

        let names: Vec<String> = find_pdfs(dir.path())
            .unwrap()
            .iter()
            .map(|p| file_label(p))
            .collect();
        assert_eq!(names, vec!["A.PDF", "b.pdf"]);
    }

    #[test]
    fn test_missing_input() {
        assert!(find_pdfs(Path::new("/definitely/not/here")).is_err());
    }
}
