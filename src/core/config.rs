use std::path::PathBuf;

use crate::utils::dirs;
use crate::utils::encoding::DEFAULT_ENCODING;

/// Directory and encoding defaults shared by the binaries.
/// CLI flags take precedence over these values.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolsConfig {
    pub html_out_dir: PathBuf,
    pub json_out_dir: PathBuf,
    pub pdf_in_dir: PathBuf,
    pub markdown_out_dir: PathBuf,
    pub encoding: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            html_out_dir: PathBuf::from(dirs::HTML_OUT_DIR),
            json_out_dir: PathBuf::from(dirs::JSON_OUT_DIR),
            pdf_in_dir: PathBuf::from(dirs::PDF_IN_DIR),
            markdown_out_dir: PathBuf::from(dirs::MARKDOWN_OUT_DIR),
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl ToolsConfig {
    /// Reads `IXTOOLS_*` overrides, loading a `.env` file first if one exists.
    pub fn from_env() -> Self {
        if dotenv::dotenv().is_ok() {
            log::debug!("Loaded environment from .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let path_or =
            |key: &str, default: PathBuf| lookup(key).map(PathBuf::from).unwrap_or(default);

        Self {
            html_out_dir: path_or("IXTOOLS_HTML_OUT", defaults.html_out_dir),
            json_out_dir: path_or("IXTOOLS_JSON_OUT", defaults.json_out_dir),
            pdf_in_dir: path_or("IXTOOLS_PDF_IN", defaults.pdf_in_dir),
            markdown_out_dir: path_or("IXTOOLS_MD_OUT", defaults.markdown_out_dir),
            encoding: lookup("IXTOOLS_ENCODING").unwrap_or(defaults.encoding),
        }
    }
}
