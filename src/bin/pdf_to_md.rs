use colored::*;
use ixtools::convert::{self, FailurePolicy, PdfExtractConverter};
use ixtools::core::config::ToolsConfig;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "ix-pdf-to-md", about = "Convert a directory of PDFs to markdown")]
struct Opt {
    /// Directory holding the PDFs [default: pdf_out]
    #[structopt(long, parse(from_os_str))]
    input_dir: Option<PathBuf>,

    /// Directory for the markdown files [default: docling_md]
    #[structopt(long, parse(from_os_str))]
    output_dir: Option<PathBuf>,

    /// Stop at the first file that fails to convert
    #[structopt(long)]
    fail_fast: bool,
}

fn main() {
    env_logger::init();
    let opt = Opt::from_args();
    let config = ToolsConfig::from_env();

    let input_dir = opt.input_dir.unwrap_or(config.pdf_in_dir);
    let output_dir = opt.output_dir.unwrap_or(config.markdown_out_dir);
    let policy = if opt.fail_fast {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Continue
    };

    let report = match convert::convert_directory(
        &PdfExtractConverter,
        &input_dir,
        &output_dir,
        policy,
        true,
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    if report.outcomes.is_empty() {
        println!("No PDF files found in {} directory", input_dir.display());
        return;
    }

    println!(
        "{} Processed {} files.",
        "All done!".green().bold(),
        report.succeeded()
    );
    if report.failed() > 0 {
        println!("{} {}", "Failed:".yellow().bold(), report.failed_names());
    }
}
