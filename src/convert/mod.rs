//! Batch PDF to markdown conversion.

pub mod markdown;

use anyhow::{anyhow, Context, Result};
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::dirs::ensure_dir;
use crate::utils::progress::ProgressTracker;

pub use markdown::text_to_markdown;

pub trait MarkdownConverter {
    fn convert(&self, pdf: &Path) -> Result<String>;
}

/// Text layer extraction through `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractConverter;

impl MarkdownConverter for PdfExtractConverter {
    fn convert(&self, pdf: &Path) -> Result<String> {
        let text = pdf_extract::extract_text(pdf)
            .map_err(|e| anyhow!("PDF parse failed for {:?}: {}", pdf, e))?;
        let markdown = text_to_markdown(&text);
        if markdown.trim().is_empty() {
            log::warn!("{:?} has no text layer", pdf);
        }
        Ok(markdown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failing file.
    Abort,
    #[default]
    Continue,
}

#[derive(Debug)]
pub struct ConversionOutcome {
    pub source: PathBuf,
    /// Path of the written markdown file.
    pub result: Result<PathBuf>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ConversionOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failed_names(&self) -> String {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .filter_map(|o| o.source.file_name())
            .map(|name| name.to_string_lossy())
            .join(", ")
    }
}

/// `*.pdf` files directly under `dir`, sorted by name.
pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))?;
    let mut pdfs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"));
        if path.is_file() && is_pdf {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

pub fn markdown_path(pdf: &Path, output_dir: &Path) -> PathBuf {
    let stem = pdf.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.md", stem))
}

fn convert_one<C: MarkdownConverter>(
    converter: &C,
    pdf: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let markdown = converter.convert(pdf)?;
    let output = markdown_path(pdf, output_dir);
    fs::write(&output, markdown).with_context(|| format!("Failed to write {:?}", output))?;
    Ok(output)
}

/// Converts every PDF in `input_dir` into `output_dir`.
///
/// With `FailurePolicy::Abort` the first failure is returned as the error and
/// later files are not attempted. With `Continue` every failure is recorded in
/// the report.
pub fn convert_directory<C: MarkdownConverter>(
    converter: &C,
    input_dir: &Path,
    output_dir: &Path,
    policy: FailurePolicy,
    show_progress: bool,
) -> Result<BatchReport> {
    ensure_dir(output_dir)?;

    let pdfs = find_pdfs(input_dir)?;
    let mut report = BatchReport::default();
    if pdfs.is_empty() {
        log::warn!("No PDF files found in {:?}", input_dir);
        return Ok(report);
    }
    log::info!("Found {} PDF files to process", pdfs.len());

    let progress = ProgressTracker::new(pdfs.len() as u64, "pdf-to-md", show_progress);
    for pdf in pdfs {
        let name = pdf.file_name().unwrap_or_default().to_string_lossy().to_string();
        progress.update_message(&name);

        let result = match convert_one(converter, &pdf, output_dir) {
            Ok(output) => {
                progress.println(&format!("Saved {}", output.display()));
                Ok(output)
            }
            Err(e) => {
                log::error!("Failed to convert {}: {:#}", name, e);
                if policy == FailurePolicy::Abort {
                    progress.finish();
                    return Err(e.context(format!("Aborted at {}", name)));
                }
                Err(e)
            }
        };
        report.outcomes.push(ConversionOutcome { source: pdf, result });
        progress.increment(1);
    }
    progress.finish();

    log::info!("Processed {} files, {} failed", report.succeeded(), report.failed());
    Ok(report)
}
