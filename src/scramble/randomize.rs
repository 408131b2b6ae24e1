use rand::Rng;

/// Originals above this never change sign.
pub const LARGE_VALUE_THRESHOLD: i64 = 10_000;

const SMALL_TIER: i64 = 1_000;
const MEDIUM_TIER: i64 = 10_000;
const SMALL_MIN_RANGE: i64 = 100;

/// Half-width of the uniform delta applied to `original`.
///
/// | magnitude     | range               |
/// |---------------|---------------------|
/// | `< 1,000`     | `max(100, 50%)`     |
/// | `< 10,000`    | `40%`               |
/// | otherwise     | `30%`               |
pub fn variation_bound(original: i64) -> i64 {
    let magnitude = original.unsigned_abs() as i128;
    let bound = if magnitude < SMALL_TIER as i128 {
        (magnitude * 5 / 10).max(SMALL_MIN_RANGE as i128)
    } else if magnitude < MEDIUM_TIER as i128 {
        magnitude * 4 / 10
    } else {
        magnitude * 3 / 10
    };
    bound.min(i64::MAX as i128) as i64
}

pub fn randomize_number<R: Rng>(original: i64, rng: &mut R) -> i64 {
    let bound = variation_bound(original);
    let delta = rng.gen_range(-bound..=bound);
    let value = original.saturating_add(delta);

    if original > LARGE_VALUE_THRESHOLD && value < 0 {
        value.saturating_abs()
    } else {
        value
    }
}

/// Randomizes a textual amount, keeping comma grouping if the original had it.
/// Text that is not an integer comes back unchanged.
pub fn randomize_value<R: Rng>(raw: &str, rng: &mut R) -> String {
    match parse_amount(raw) {
        Some(original) => {
            let value = randomize_number(original, rng);
            if raw.contains(',') {
                format_grouped(value)
            } else {
                value.to_string()
            }
        }
        None => raw.to_string(),
    }
}

pub fn parse_amount(raw: &str) -> Option<i64> {
    raw.trim().replace(',', "").parse::<i64>().ok()
}

/// `1234567` -> `1,234,567`; the sign is kept.
pub fn format_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
