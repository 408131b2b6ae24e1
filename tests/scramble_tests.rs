use ixtools::scramble::compute::MIN_ENDING_CASH;
use ixtools::scramble::randomize::parse_amount;
use ixtools::scramble::taxonomy::{Concept, Role};
use ixtools::scramble::{
    self, extract_facts, generate_variants, PeriodOrder, ScrambleConfig, ScramblePaths,
    StatementLayout,
};
use std::fs;
use tempfile::tempdir;

// Rows in statement order, one value per fiscal year (2022, 2021, 2020)
const ROWS: &[(Concept, [&str; 3])] = &[
    (Concept::CashBalance, ["35,929", "39,789", "50,224"]),
    (Concept::NetIncome, ["99,803", "94,680", "57,411"]),
    (Concept::Depreciation, ["11,104", "11,284", "11,056"]),
    (Concept::OperatingTotal, ["122,151", "104,038", "80,674"]),
    (Concept::CapitalExpenditure, ["10,708", "11,085", "7,309"]),
    (Concept::InvestingTotal, ["22,354", "14,545", "4,289"]),
    (Concept::Dividends, ["14,841", "14,467", "14,081"]),
    (Concept::FinancingTotal, ["110,749", "93,353", "86,820"]),
    (Concept::CashChange, ["10,952", "3,860", "10,435"]),
    (Concept::CashBalance, ["24,977", "35,929", "39,789"]),
];

fn row_index(concept: Concept, occurrence: usize) -> usize {
    ROWS.iter()
        .enumerate()
        .filter(|(_, (c, _))| *c == concept)
        .nth(occurrence)
        .map(|(i, _)| i)
        .unwrap()
}

fn statement_html() -> String {
    let mut html = String::from(
        r#"<html><body><div style="margin-top: 12pt"><p>Fiscal year <ix:nonNumeric name="dei:DocumentFiscalYearFocus">2022</ix:nonNumeric></p>
<p>Years ended September <ix:nonFraction name="dei:PeriodEndDay" contextRef="c-0">24</ix:nonFraction>, <ix:nonFraction name="dei:DocumentFiscalYear" contextRef="c-0">2022</ix:nonFraction></p>
<p>Effective rate <ix:nonFraction name="us-gaap:EffectiveIncomeTaxRate" contextRef="c-0">16</ix:nonFraction>%</p>
</div><table>"#,
    );
    for (concept, values) in ROWS {
        html.push_str("<tr>");
        for (column, value) in values.iter().enumerate() {
            html.push_str(&format!(
                r#"<td style="width:9%"><ix:nonFraction unitRef="usd" contextRef="c-{}" decimals="-6" name="{}" scale="6">{}</ix:nonFraction></td>"#,
                column + 1,
                concept.tag(),
                value
            ));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table></body></html>");
    html
}

fn config(seed: u64) -> ScrambleConfig {
    ScrambleConfig {
        variants: 5,
        seed: Some(seed),
        period_order: PeriodOrder::Document,
        ..ScrambleConfig::default()
    }
}

#[test]
fn test_extraction_roles() {
    let html = statement_html();
    let extraction = extract_facts(&html, &config(1).exclusion, PeriodOrder::Document);

    assert_eq!(extraction.facts.len(), 30);
    assert_eq!(extraction.period_count(), 3);
    // Net income, depreciation, capex, dividends and the opening balances
    assert_eq!(extraction.independent_count(), 15);
    assert_eq!(extraction.dependent_count(), 15);

    let ending = &extraction.facts[row_index(Concept::CashBalance, 1) * 3];
    assert_eq!(ending.role, Role::Dependent);
    assert_eq!(ending.original_value, "24,977");
}

#[test]
fn test_identities_hold_in_every_variant() {
    let html = statement_html();
    let config = config(2024);
    let extraction = extract_facts(&html, &config.exclusion, config.period_order);

    for variant in generate_variants(&extraction, &config) {
        let value = |concept: Concept, occurrence: usize, period: usize| {
            parse_amount(&variant.values[row_index(concept, occurrence) * 3 + period]).unwrap()
        };

        for period in 0..3 {
            let operating =
                value(Concept::NetIncome, 0, period) + value(Concept::Depreciation, 0, period);
            let investing = -value(Concept::CapitalExpenditure, 0, period);
            let financing = -value(Concept::Dividends, 0, period);
            let change = operating + investing + financing;
            let ending = (value(Concept::CashBalance, 0, period) + change).max(MIN_ENDING_CASH);

            assert_eq!(value(Concept::OperatingTotal, 0, period), operating.abs());
            assert_eq!(value(Concept::InvestingTotal, 0, period), investing.abs());
            assert_eq!(value(Concept::FinancingTotal, 0, period), financing.abs());
            assert_eq!(value(Concept::CashChange, 0, period), change.abs());
            assert_eq!(value(Concept::CashBalance, 1, period), ending);

            let totals = variant.periods[period];
            assert_eq!(totals.cash_change, totals.operating + totals.investing + totals.financing);
            assert_eq!(
                totals.ending_cash_unfloored,
                value(Concept::CashBalance, 0, period) + totals.cash_change
            );
        }
        assert!(variant.filled.is_empty());
    }
}

#[test]
fn test_excluded_numbers_are_unchanged() {
    let html = statement_html();
    let config = config(7);
    let extraction = extract_facts(&html, &config.exclusion, config.period_order);

    for variant in generate_variants(&extraction, &config) {
        assert!(variant.html.contains(">2022</ix:nonNumeric>"));
        assert!(variant.html.contains(
            r#"September <ix:nonFraction name="dei:PeriodEndDay" contextRef="c-0">24</ix:nonFraction>"#
        ));
        assert!(variant.html.contains(">2022</ix:nonFraction></p>"));
        assert!(variant.html.contains(">16</ix:nonFraction>%"));
        assert!(variant.html.contains(r#"style="width:9%""#));
        assert!(variant.html.contains("margin-top: 12pt"));
    }
}

#[test]
fn test_run_writes_all_outputs() {
    let dir = tempdir().unwrap();
    let paths = ScramblePaths {
        input: dir.path().join("aapl_p33.html"),
        html_out: dir.path().join("html_out"),
        json_out: dir.path().join("json_out"),
    };
    fs::write(&paths.input, statement_html()).unwrap();

    let config = ScrambleConfig {
        variants: 3,
        ..config(99)
    };
    let report = scramble::run(&paths, &config, &StatementLayout::default(), false).unwrap();

    assert_eq!(report.html_files.len(), 3);
    assert_eq!(report.json_files.len(), 3);
    assert!(report.export_failures.is_empty());
    for number in 1..=3 {
        let html = fs::read_to_string(paths.html_out.join(format!("{}.html", number))).unwrap();
        assert!(!html.contains("{{"));

        let json = fs::read_to_string(paths.json_out.join(format!("{}.json", number))).unwrap();
        let rows: Vec<Vec<String>> = serde_json::from_str(&json).unwrap();
        assert!(rows.iter().all(|row| row.len() == 4));
        assert_eq!(rows[0], vec!["", "", "Years ended", ""]);

        let investing = rows
            .iter()
            .find(|row| row[0] == "Cash used in investing activities")
            .unwrap();
        assert!(investing[1..].iter().all(|v| v.starts_with('(') && v.ends_with(')')));
    }

    let mapping = fs::read_to_string(paths.html_out.join("cash_flow_mapping.csv")).unwrap();
    let lines: Vec<&str> = mapping.lines().collect();
    assert_eq!(lines[0], "XBRL Tag,Original Value,Value Type,Placeholder");
    assert_eq!(lines.len(), 31);
    assert_eq!(
        lines[1],
        concat!(
            "us-gaap:CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents,",
            r#""35,929",Independent (Randomized),{{VALUE_1_FINANCIAL_VALUE}}"#
        )
    );
}

#[test]
fn test_run_missing_input_fails() {
    let dir = tempdir().unwrap();
    let paths = ScramblePaths {
        input: dir.path().join("missing.html"),
        html_out: dir.path().join("html_out"),
        json_out: dir.path().join("json_out"),
    };
    assert!(scramble::run(&paths, &config(1), &StatementLayout::default(), false).is_err());
    assert!(!paths.html_out.exists());
}

#[test]
fn test_failed_statement_export_is_skipped() {
    let dir = tempdir().unwrap();
    let paths = ScramblePaths {
        input: dir.path().join("aapl_p33.html"),
        html_out: dir.path().join("html_out"),
        json_out: dir.path().join("json_out"),
    };
    fs::write(&paths.input, statement_html()).unwrap();
    // A directory where the second statement should go makes that write fail
    fs::create_dir_all(paths.json_out.join("2.json")).unwrap();

    let config = ScrambleConfig {
        variants: 3,
        ..config(5)
    };
    let report = scramble::run(&paths, &config, &StatementLayout::default(), false).unwrap();

    assert_eq!(report.export_failures, vec![2]);
    assert_eq!(report.html_files.len(), 3);
    assert_eq!(
        report.json_files,
        vec![paths.json_out.join("1.json"), paths.json_out.join("3.json")]
    );
    assert!(paths.json_out.join("1.json").is_file());
    assert!(paths.json_out.join("3.json").is_file());
    assert!(paths.html_out.join("cash_flow_mapping.csv").is_file());
}

#[test]
fn test_inspect_matches_extraction_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("aapl_p33.html");
    let html = statement_html();
    fs::write(&input, &html).unwrap();

    let config = config(3);
    let inspected = scramble::inspect(&input, &config).unwrap();
    let extracted = extract_facts(&html, &config.exclusion, config.period_order);

    assert_eq!(inspected.facts, extracted.facts);
    assert_eq!(inspected.template, extracted.template);

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}
