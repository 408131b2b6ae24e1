use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use strum::{Display, EnumString};

use super::exclude::{head, tail, ExclusionPolicy};
use super::randomize::parse_amount;
use super::taxonomy::{classify, local_name, Concept, Role};

// A comma-grouped or plain integer closing an inline numeric fact
static FACT_VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)>([0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)</ix:nonfraction>")
        .expect("fact pattern is valid")
});

static NAME_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name="([^"]+)""#).expect("name pattern is valid"));

const CONTEXT_BEFORE: usize = 500;
const CONTEXT_AFTER: usize = 200;

/// How same-tag facts are matched to reporting periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PeriodOrder {
    /// Descending original value. Assumes larger figures belong to earlier
    /// columns; nothing verifies that.
    #[default]
    Magnitude,
    /// Order of appearance in the document.
    Document,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub index: usize,
    pub tag: String,
    pub concept: Option<Concept>,
    pub original_value: String,
    /// Byte offset of the value in the source document.
    pub position: usize,
    pub role: Role,
    /// Column within the statement, as assigned by `PeriodOrder`.
    pub period: usize,
    pub placeholder: String,
}

impl Fact {
    pub fn original_amount(&self) -> Option<i64> {
        parse_amount(&self.original_value)
    }

    pub fn is_dependent(&self) -> bool {
        self.role == Role::Dependent
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Fact(usize),
}

/// The source document cut at every fact value.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Writes each fact slot exactly once from `values`, indexed by fact index.
    pub fn render<S: AsRef<str>>(&self, values: &[S]) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Fact(index) => out.push_str(values[*index].as_ref()),
            }
        }
        out
    }

    pub fn with_placeholders(&self, facts: &[Fact]) -> String {
        let placeholders: Vec<&str> = facts.iter().map(|f| f.placeholder.as_str()).collect();
        self.render(&placeholders)
    }

    pub fn slot_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Fact(_)))
            .count()
    }
}

/// Result of the parse phase; read-only for the rest of the run.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub template: Template,
    pub facts: Vec<Fact>,
}

impl Extraction {
    pub fn independent_count(&self) -> usize {
        self.facts.iter().filter(|f| !f.is_dependent()).count()
    }

    pub fn dependent_count(&self) -> usize {
        self.facts.iter().filter(|f| f.is_dependent()).count()
    }

    /// Longest series of known independent inputs.
    pub fn period_count(&self) -> usize {
        self.facts
            .iter()
            .filter(|f| f.concept.is_some() && !f.is_dependent())
            .map(|f| f.period + 1)
            .max()
            .unwrap_or(0)
    }
}

struct Candidate {
    tag: String,
    value: String,
    position: usize,
}

pub fn extract_facts(content: &str, policy: &ExclusionPolicy, order: PeriodOrder) -> Extraction {
    let mut segments = Vec::new();
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut cursor = 0;

    for captures in FACT_VALUE_RE.captures_iter(content) {
        let (Some(whole), Some(number)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        let before = tail(&content[..whole.start()], CONTEXT_BEFORE);
        let after = head(&content[whole.end()..], CONTEXT_AFTER);

        if policy.should_exclude(number.as_str(), before, after) {
            log::debug!("Excluded {} at {}", number.as_str(), number.start());
            continue;
        }

        let Some(tag) = find_tag(before, after) else {
            log::debug!("No tag name near {} at {}", number.as_str(), number.start());
            continue;
        };

        segments.push(Segment::Literal(content[cursor..number.start()].to_string()));
        segments.push(Segment::Fact(candidates.len()));
        cursor = number.end();

        candidates.push(Candidate {
            tag: tag.to_string(),
            value: number.as_str().to_string(),
            position: number.start(),
        });
    }
    segments.push(Segment::Literal(content[cursor..].to_string()));

    let facts = classify_candidates(candidates, order);
    log::info!(
        "Extracted {} facts ({} independent, {} dependent)",
        facts.len(),
        facts.iter().filter(|f| !f.is_dependent()).count(),
        facts.iter().filter(|f| f.is_dependent()).count()
    );

    Extraction {
        template: Template { segments },
        facts,
    }
}

/// Nearest preceding `name="..."`, else the first one following.
fn find_tag<'a>(before: &'a str, after: &'a str) -> Option<&'a str> {
    NAME_ATTR_RE
        .captures_iter(before)
        .last()
        .or_else(|| NAME_ATTR_RE.captures_iter(after).next())
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

fn classify_candidates(candidates: Vec<Candidate>, order: PeriodOrder) -> Vec<Fact> {
    let mut roles: Vec<(Option<Concept>, Role)> =
        candidates.iter().map(|c| classify(&c.tag)).collect();

    // Balance tags open and close the statement: the trailing half are ending balances
    let mut by_tag: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, candidate) in candidates.iter().enumerate() {
        by_tag.entry(candidate.tag.as_str()).or_default().push(index);
    }
    for indices in by_tag.values() {
        let is_balance = roles[indices[0]].0.map_or(false, |c| c.is_balance());
        if is_balance {
            let beginning = indices.len() - indices.len() / 2;
            for index in &indices[beginning..] {
                roles[*index].1 = Role::Dependent;
            }
        }
    }

    let periods = assign_periods(&candidates, &roles, order);

    let mut independent_counter = 0;
    candidates
        .into_iter()
        .zip(roles)
        .zip(periods)
        .enumerate()
        .map(|(index, ((candidate, (concept, role)), period))| {
            let placeholder = match role {
                Role::Independent => {
                    independent_counter += 1;
                    format!("{{{{VALUE_{}_FINANCIAL_VALUE}}}}", independent_counter)
                }
                Role::Dependent => format!(
                    "{{{{CALC_{}_{}}}}}",
                    index + 1,
                    local_name(&candidate.tag).to_uppercase()
                ),
            };
            Fact {
                index,
                tag: candidate.tag,
                concept,
                original_value: candidate.value,
                position: candidate.position,
                role,
                period,
                placeholder,
            }
        })
        .collect()
}

fn assign_periods(
    candidates: &[Candidate],
    roles: &[(Option<Concept>, Role)],
    order: PeriodOrder,
) -> Vec<usize> {
    let mut groups: HashMap<(&str, Role), Vec<usize>> = HashMap::new();
    for (index, candidate) in candidates.iter().enumerate() {
        groups
            .entry((candidate.tag.as_str(), roles[index].1))
            .or_default()
            .push(index);
    }

    let mut periods = vec![0; candidates.len()];
    for mut members in groups.into_values() {
        if order == PeriodOrder::Magnitude {
            // Stable, so equal values keep document order
            members.sort_by_key(|&i| {
                std::cmp::Reverse(parse_amount(&candidates[i].value).unwrap_or(0))
            });
        }
        for (period, index) in members.into_iter().enumerate() {
            periods[index] = period;
        }
    }
    periods
}
