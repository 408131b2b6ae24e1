use colored::*;
use ixtools::core::config::ToolsConfig;
use ixtools::scramble::{
    self, exclude::ExclusionPolicy, PeriodOrder, ScrambleConfig, ScramblePaths, StatementLayout,
};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "ix-scramble",
    about = "Generate randomized cash-flow statements that keep their totals consistent"
)]
struct Opt {
    /// Source filing [default: aapl_p33.html]
    #[structopt(long, parse(from_os_str))]
    input: Option<PathBuf>,

    /// Directory for the HTML variants and the mapping CSV [default: html_out]
    #[structopt(long, parse(from_os_str))]
    html_out: Option<PathBuf>,

    /// Directory for the statement JSON files [default: json_out]
    #[structopt(long, parse(from_os_str))]
    json_out: Option<PathBuf>,

    #[structopt(long, default_value = "10")]
    variants: usize,

    /// Seed for reproducible output
    #[structopt(long)]
    seed: Option<u64>,

    /// How same-tag values map to periods: magnitude or document
    #[structopt(long, default_value = "magnitude")]
    period_order: PeriodOrder,

    /// Also leave digit strings of 8 or more digits untouched
    #[structopt(long)]
    exclude_identifiers: bool,

    /// Print the extracted facts and exit without writing anything
    #[structopt(long)]
    dry_run: bool,
}

fn main() {
    env_logger::init();
    let opt = Opt::from_args();
    let config = ToolsConfig::from_env();
    let input = opt.input.unwrap_or_else(|| ScramblePaths::default().input);

    let scramble_config = ScrambleConfig {
        variants: opt.variants,
        seed: opt.seed,
        period_order: opt.period_order,
        exclusion: ExclusionPolicy {
            identifiers: opt.exclude_identifiers,
            ..ExclusionPolicy::default()
        },
    };

    if opt.dry_run {
        match scramble::inspect(&input, &scramble_config) {
            Ok(extraction) => {
                for fact in &extraction.facts {
                    println!(
                        "{}\t{}\t{}\t{}",
                        fact.tag,
                        fact.original_value,
                        fact.role,
                        fact.period + 1
                    );
                }
                println!(
                    "{} independent, {} dependent, {} periods",
                    extraction.independent_count(),
                    extraction.dependent_count(),
                    extraction.period_count()
                );
            }
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                std::process::exit(1);
            }
        }
        return;
    }

    let paths = ScramblePaths {
        input,
        html_out: opt.html_out.unwrap_or(config.html_out_dir),
        json_out: opt.json_out.unwrap_or(config.json_out_dir),
    };

    match scramble::run(&paths, &scramble_config, &StatementLayout::default(), true) {
        Ok(report) => {
            println!(
                "{} {} variants in {}",
                "Generated".green().bold(),
                report.html_files.len(),
                paths.html_out.display()
            );
            println!(
                "Statements: {} written to {}",
                report.json_files.len(),
                paths.json_out.display()
            );
            if !report.export_failures.is_empty() {
                println!(
                    "{} statement export failed for {} variants",
                    "Warning:".yellow().bold(),
                    report.export_failures.len()
                );
            }
            println!("Mapping: {}", report.mapping_file.display());
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
