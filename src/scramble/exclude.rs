use once_cell::sync::Lazy;
use regex::Regex;

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

static CSS_PROPERTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        concat!(
            r"(width|height|margin|padding|font-size|line-height|top|left|right|bottom|border|",
            r"text-indent|min-height|max-width|max-height|min-width):\s*$",
        ),
    )
    .expect("CSS property pattern is valid")
});

static CSS_UNIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(pt|px|em)").expect("CSS unit pattern is valid"));

// Only this much context counts as "directly part of" a CSS declaration
const CSS_CONTEXT: usize = 50;

const IDENTIFIER_DIGITS: usize = 8;

/// Which numeric tokens are never treated as financial facts.
///
/// This is a heuristic, not a grammar: a reported value of `2,021` reads as a
/// year and is left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPolicy {
    pub years: bool,
    pub dates: bool,
    pub css: bool,
    pub identifiers: bool,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            years: true,
            dates: true,
            css: true,
            identifiers: false,
        }
    }
}

impl ExclusionPolicy {
    pub fn should_exclude(&self, number: &str, before: &str, after: &str) -> bool {
        let clean = number.replace(',', "");
        let value = if clean.chars().all(|c| c.is_ascii_digit()) {
            clean.parse::<u64>().ok()
        } else {
            None
        };

        if self.years && value.map_or(false, is_calendar_year) {
            return true;
        }

        let day_of_month = value.map_or(false, |v| (1..=31).contains(&v));
        if self.dates && day_of_month && mentions_month(before, after) {
            return true;
        }

        if self.css && is_css_length(before, after) {
            return true;
        }

        if self.identifiers
            && !number.contains(',')
            && clean.len() >= IDENTIFIER_DIGITS
            && value.is_some()
        {
            return true;
        }

        false
    }
}

pub fn is_calendar_year(value: u64) -> bool {
    (2010..=2019).contains(&value) || (2020..=2029).contains(&value)
}

fn mentions_month(before: &str, after: &str) -> bool {
    let context = format!("{}{}", before, after).to_lowercase();
    MONTHS.iter().any(|month| context.contains(month))
}

fn is_css_length(before: &str, after: &str) -> bool {
    let immediate_before = tail(before, CSS_CONTEXT);
    let immediate_after = head(after, CSS_CONTEXT);

    CSS_PROPERTY_RE.is_match(immediate_before)
        || immediate_after.starts_with('%')
        || CSS_UNIT_RE.is_match(immediate_after)
}

/// Last `n` bytes of `s`, widened to a char boundary.
pub(crate) fn tail(s: &str, n: usize) -> &str {
    let mut start = s.len().saturating_sub(n);
    while !s.is_char_boundary(start) {
        start -= 1;
    }
    &s[start..]
}

/// First `n` bytes of `s`, widened to a char boundary.
pub(crate) fn head(s: &str, n: usize) -> &str {
    let mut end = n.min(s.len());
    while !s.is_char_boundary(end) {
        end += 1;
    }
    &s[..end]
}
