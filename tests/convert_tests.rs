use anyhow::{bail, Result};
use ixtools::convert::{convert_directory, FailurePolicy, MarkdownConverter};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Echoes the file body as markdown; bodies starting with "bad" fail.
struct FakeConverter;

impl MarkdownConverter for FakeConverter {
    fn convert(&self, pdf: &Path) -> Result<String> {
        let body = fs::read_to_string(pdf)?;
        if body.starts_with("bad") {
            bail!("corrupt PDF");
        }
        Ok(format!("# {}\n", body.trim()))
    }
}

fn write_pdfs(dir: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(dir).unwrap();
    for (name, body) in files {
        fs::write(dir.join(name), body).unwrap();
    }
}

#[test]
fn test_converts_every_pdf() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("pdf_out");
    let output = dir.path().join("docling_md");
    write_pdfs(&input, &[("2.pdf", "second"), ("1.pdf", "first"), ("readme.txt", "skip")]);

    let report = convert_directory(&FakeConverter, &input, &output, FailurePolicy::Continue, false)
        .unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 0);
    let sources: Vec<String> = report
        .outcomes
        .iter()
        .map(|o| o.source.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(sources, vec!["1.pdf", "2.pdf"]);
    assert_eq!(fs::read_to_string(output.join("1.md")).unwrap(), "# first\n");
    assert_eq!(fs::read_to_string(output.join("2.md")).unwrap(), "# second\n");
    assert!(!output.join("readme.md").exists());
}

#[test]
fn test_continue_records_failures() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    write_pdfs(&input, &[("a.pdf", "alpha"), ("b.pdf", "bad bytes"), ("c.pdf", "gamma")]);

    let report = convert_directory(&FakeConverter, &input, &output, FailurePolicy::Continue, false)
        .unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failed_names(), "b.pdf");
    assert!(output.join("c.md").exists());
    assert!(!output.join("b.md").exists());
}

#[test]
fn test_abort_stops_at_first_failure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    write_pdfs(&input, &[("a.pdf", "alpha"), ("b.pdf", "bad bytes"), ("c.pdf", "gamma")]);

    let err = convert_directory(&FakeConverter, &input, &output, FailurePolicy::Abort, false)
        .unwrap_err();

    assert!(format!("{:#}", err).contains("b.pdf"));
    assert!(format!("{:#}", err).contains("corrupt PDF"));
    assert!(output.join("a.md").exists());
    assert!(!output.join("c.md").exists());
}

#[test]
fn test_empty_directory_is_not_an_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    write_pdfs(&input, &[]);

    let report = convert_directory(&FakeConverter, &input, &output, FailurePolicy::Abort, false)
        .unwrap();

    assert!(report.outcomes.is_empty());
    assert!(output.is_dir());
}
