use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::extract::Fact;

pub const AUDIT_HEADER: [&str; 4] = ["XBRL Tag", "Original Value", "Value Type", "Placeholder"];

/// One row per extracted fact, in document order.
pub fn write_mapping<W: Write>(writer: W, facts: &[Fact]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    writer.write_record(AUDIT_HEADER)?;

    for fact in facts {
        writer.write_record([
            fact.tag.as_str(),
            fact.original_value.as_str(),
            fact.role.label(),
            fact.placeholder.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_mapping_file(path: &Path, facts: &[Fact]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_mapping(file, facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scramble::exclude::ExclusionPolicy;
    use crate::scramble::extract::{extract_facts, PeriodOrder};

    #[test]
    fn test_mapping_rows() {
        let html = concat!(
            r#"<ix:nonFraction name="us-gaap:NetIncomeLoss">99,803</ix:nonFraction>"#,
            r#"<ix:nonFraction name="us-gaap:NetCashProvidedByUsedInOperatingActivities">122,151</ix:nonFraction>"#,
        );
        let extraction = extract_facts(html, &ExclusionPolicy::default(), PeriodOrder::Document);

        let mut out = Vec::new();
        write_mapping(&mut out, &extraction.facts).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "XBRL Tag,Original Value,Value Type,Placeholder");
        assert_eq!(
            lines[1],
            r#"us-gaap:NetIncomeLoss,"99,803",Independent (Randomized),{{VALUE_1_FINANCIAL_VALUE}}"#
        );
        assert_eq!(
            lines[2],
            r#"us-gaap:NetCashProvidedByUsedInOperatingActivities,"122,151",Dependent (Calculated),{{CALC_2_NETCASHPROVIDEDBYUSEDINOPERATINGACTIVITIES}}"#
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_mapping_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.csv");
        write_mapping_file(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), "XBRL Tag,Original Value,Value Type,Placeholder");
    }
}
