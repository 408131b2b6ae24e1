use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::compute::{PeriodInputs, PeriodTotals};
use super::exclude::ExclusionPolicy;
use super::extract::{Extraction, Fact, PeriodOrder};
use super::randomize::{format_grouped, parse_amount, randomize_value};
use super::taxonomy::Concept;

pub const DEFAULT_VARIANTS: usize = 10;

/// Investing filler when no investing total was computed.
pub const INVESTING_FALLBACK: i64 = 25_000;
pub const FILLER_RANGE: std::ops::RangeInclusive<i64> = 5_000..=50_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ScrambleConfig {
    pub variants: usize,
    pub seed: Option<u64>,
    pub period_order: PeriodOrder,
    pub exclusion: ExclusionPolicy,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            variants: DEFAULT_VARIANTS,
            seed: None,
            period_order: PeriodOrder::default(),
            exclusion: ExclusionPolicy::default(),
        }
    }
}

impl ScrambleConfig {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// One generated document and the figures behind it.
#[derive(Debug, Clone)]
pub struct Variant {
    pub number: usize,
    pub html: String,
    /// Rendered value per fact, indexed like `Extraction::facts`.
    pub values: Vec<String>,
    pub periods: Vec<PeriodTotals>,
    /// Dependent facts that fell back to filler values.
    pub filled: Vec<usize>,
}

pub struct Scrambler<'a, R: Rng> {
    extraction: &'a Extraction,
    rng: R,
}

impl<'a, R: Rng> Scrambler<'a, R> {
    pub fn new(extraction: &'a Extraction, rng: R) -> Self {
        Self { extraction, rng }
    }

    pub fn generate(&mut self, number: usize) -> Variant {
        let extraction = self.extraction;
        let facts = &extraction.facts;
        let mut values: Vec<Option<String>> = vec![None; facts.len()];

        for fact in facts.iter().filter(|f| !f.is_dependent()) {
            values[fact.index] = Some(randomize_value(&fact.original_value, &mut self.rng));
        }

        let periods = self.compute_periods(&values);

        let mut filled = Vec::new();
        for fact in facts.iter().filter(|f| f.is_dependent()) {
            let computed = fact
                .concept
                .and_then(|concept| periods.get(fact.period).and_then(|t| t.value_for(concept)));
            let amount = match computed {
                Some(amount) => amount,
                None => {
                    filled.push(fact.index);
                    self.filler(fact, &periods)
                }
            };
            // The sign is carried by the markup around the value
            values[fact.index] = Some(format_grouped(amount.saturating_abs()));
        }

        if !filled.is_empty() {
            log::warn!("Variant {}: {} unresolved placeholders filled", number, filled.len());
        }

        let values: Vec<String> = values.into_iter().map(Option::unwrap_or_default).collect();
        let html = extraction.template.render(&values);

        Variant {
            number,
            html,
            values,
            periods,
            filled,
        }
    }

    fn compute_periods(&self, values: &[Option<String>]) -> Vec<PeriodTotals> {
        let mut inputs = vec![PeriodInputs::default(); self.extraction.period_count()];
        for fact in self.extraction.facts.iter().filter(|f| !f.is_dependent()) {
            let Some(concept) = fact.concept else {
                continue;
            };
            let Some(input) = inputs.get_mut(fact.period) else {
                continue;
            };
            match values[fact.index].as_deref().and_then(parse_amount) {
                Some(amount) => {
                    input.set(concept, amount);
                }
                None => log::warn!("{} is not an integer; counted as zero", fact.original_value),
            }
        }
        inputs.iter().map(PeriodInputs::totals).collect()
    }

    fn filler(&mut self, fact: &Fact, periods: &[PeriodTotals]) -> i64 {
        let investing = fact.concept == Some(Concept::InvestingTotal)
            || fact.tag.to_lowercase().contains("investing");
        if investing {
            periods
                .first()
                .map(|totals| totals.investing.saturating_abs())
                .unwrap_or(INVESTING_FALLBACK)
        } else {
            self.rng.gen_range(FILLER_RANGE)
        }
    }
}

/// Generates `config.variants` documents, numbered from 1.
pub fn generate_variants(extraction: &Extraction, config: &ScrambleConfig) -> Vec<Variant> {
    let mut scrambler = Scrambler::new(extraction, config.rng());
    (1..=config.variants).map(|number| scrambler.generate(number)).collect()
}
