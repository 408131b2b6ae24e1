use colored::*;
use ixtools::{core::config::ToolsConfig, filing};
use std::path::PathBuf;
use structopt::clap::ErrorKind;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "ix-split-page",
    about = "Extract one page of an Inline XBRL filing as a standalone document"
)]
struct Opt {
    /// Source filing
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Where to write the page
    #[structopt(parse(from_os_str))]
    output: PathBuf,

    /// 1-based page number
    page: usize,

    /// Source encoding label (defaults to IXTOOLS_ENCODING or windows-1252)
    #[structopt(long)]
    encoding: Option<String>,
}

fn main() {
    env_logger::init();

    let opt = match Opt::from_iter_safe(std::env::args()) {
        Ok(opt) => opt,
        Err(e) if matches!(e.kind, ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{}", e.message);
            std::process::exit(1);
        }
    };

    let config = ToolsConfig::from_env();
    let encoding = opt.encoding.unwrap_or(config.encoding);

    match filing::split_file(&opt.input, &opt.output, opt.page, &encoding) {
        Ok(split) => println!(
            "{} {} (page {}/{}).",
            "Saved".green().bold(),
            opt.output.display(),
            split.page,
            split.page_count
        ),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
