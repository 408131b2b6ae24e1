//! Cash-flow statement randomizer.
//!
//! One source filing is parsed once into an [`Extraction`]; every variant then
//! draws fresh independent values and recomputes the subtotals from them, so
//! the accounting identities hold in each output.

pub mod audit;
pub mod compute;
pub mod exclude;
pub mod extract;
pub mod generate;
pub mod randomize;
pub mod statement;
pub mod taxonomy;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::dirs::{self, ensure_scramble_dirs};
use crate::utils::encoding::read_to_string_with;
use crate::utils::progress::ProgressTracker;

pub use extract::{extract_facts, Extraction, Fact, PeriodOrder};
pub use generate::{generate_variants, ScrambleConfig, Scrambler, Variant};
pub use statement::StatementLayout;

/// Where a run reads from and writes to.
#[derive(Debug, Clone, PartialEq)]
pub struct ScramblePaths {
    pub input: PathBuf,
    pub html_out: PathBuf,
    pub json_out: PathBuf,
}

impl Default for ScramblePaths {
    fn default() -> Self {
        Self {
            input: PathBuf::from(dirs::SCRAMBLE_INPUT),
            html_out: PathBuf::from(dirs::HTML_OUT_DIR),
            json_out: PathBuf::from(dirs::JSON_OUT_DIR),
        }
    }
}

impl ScramblePaths {
    pub fn variant_html(&self, number: usize) -> PathBuf {
        self.html_out.join(format!("{}.html", number))
    }

    pub fn variant_json(&self, number: usize) -> PathBuf {
        self.json_out.join(format!("{}.json", number))
    }

    pub fn mapping(&self) -> PathBuf {
        self.html_out.join(dirs::MAPPING_FILE)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrambleReport {
    pub independent: usize,
    pub dependent: usize,
    pub html_files: Vec<PathBuf>,
    pub json_files: Vec<PathBuf>,
    /// Variants whose statement export failed.
    pub export_failures: Vec<usize>,
    /// Placeholders filled without a computed value, summed over variants.
    pub filled: usize,
    pub mapping_file: PathBuf,
}

pub fn run(
    paths: &ScramblePaths,
    config: &ScrambleConfig,
    layout: &StatementLayout,
    show_progress: bool,
) -> Result<ScrambleReport> {
    let content = read_to_string_with(&paths.input, "utf-8")
        .with_context(|| format!("Failed to load {:?}", paths.input))?;
    let extraction = extract_facts(&content, &config.exclusion, config.period_order);
    ensure_scramble_dirs(&paths.html_out, &paths.json_out)?;

    let mut report = ScrambleReport {
        independent: extraction.independent_count(),
        dependent: extraction.dependent_count(),
        mapping_file: paths.mapping(),
        ..ScrambleReport::default()
    };

    let progress = ProgressTracker::new(config.variants as u64, "variants", show_progress);
    let mut scrambler = Scrambler::new(&extraction, config.rng());
    for number in 1..=config.variants {
        progress.update_message(&format!("variant {}", number));
        let variant = scrambler.generate(number);
        let path = paths.variant_html(number);
        fs::write(&path, &variant.html).with_context(|| format!("Failed to write {:?}", path))?;
        report.filled += variant.filled.len();
        report.html_files.push(path);
        progress.increment(1);
    }
    progress.finish();

    for (number, html_path) in (1..).zip(&report.html_files) {
        let json_path = paths.variant_json(number);
        match statement::export_statement(html_path, &json_path, layout) {
            Ok(()) => report.json_files.push(json_path),
            Err(e) => {
                log::error!("Statement export failed for variant {}: {:#}", number, e);
                report.export_failures.push(number);
            }
        }
    }

    audit::write_mapping_file(&report.mapping_file, &extraction.facts)?;
    log_summary(&report, paths);
    Ok(report)
}

fn log_summary(report: &ScrambleReport, paths: &ScramblePaths) {
    log::info!(
        "Generated {} variants in {:?} ({} independent facts randomized, {} dependent recomputed)",
        report.html_files.len(),
        paths.html_out,
        report.independent,
        report.dependent
    );
    log::info!("Maintained per period: cash_change = operating + investing + financing");
    log::info!("Maintained per period: ending_cash = beginning_cash + cash_change");
    if report.filled > 0 {
        log::warn!("{} placeholders were filled without a computed value", report.filled);
    }
    log::info!("Mapping written to {:?}", report.mapping_file);
}

/// Loads a source file into an extraction without writing anything.
pub fn inspect(input: &Path, config: &ScrambleConfig) -> Result<Extraction> {
    let content = read_to_string_with(input, "utf-8")?;
    Ok(extract_facts(&content, &config.exclusion, config.period_order))
}
