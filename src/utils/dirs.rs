use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

// Statement randomizer directories
pub const HTML_OUT_DIR: &str = "html_out";
pub const JSON_OUT_DIR: &str = "json_out";
pub const MAPPING_FILE: &str = "cash_flow_mapping.csv";
pub const SCRAMBLE_INPUT: &str = "aapl_p33.html";

// PDF converter directories
pub const PDF_IN_DIR: &str = "pdf_out";
pub const MARKDOWN_OUT_DIR: &str = "docling_md";

pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).with_context(|| format!("Failed to create directory {:?}", path))?;
    Ok(())
}

pub fn ensure_scramble_dirs(html_out: &Path, json_out: &Path) -> Result<()> {
    ensure_dir(html_out)?;
    ensure_dir(json_out)?;
    Ok(())
}
