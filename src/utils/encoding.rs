use anyhow::{anyhow, Context, Result};
use encoding_rs::Encoding;
use std::fs;
use std::path::Path;

/// Legacy EDGAR HTML is frequently cp1252 even when it claims otherwise.
pub const DEFAULT_ENCODING: &str = "windows-1252";

/// Decodes raw bytes, letting a BOM override the requested label.
/// Malformed sequences are replaced rather than rejected.
pub fn decode_bytes(bytes: &[u8], label: &str) -> Result<String> {
    let fallback = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| anyhow!("Unknown text encoding: {}", label))?;

    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((fallback, 0));
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        log::warn!("Replaced malformed {} sequences while decoding", encoding.name());
    }
    Ok(text.into_owned())
}

pub fn read_to_string_with<P: AsRef<Path>>(path: P, label: &str) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    decode_bytes(&bytes, label)
}
