use once_cell::sync::Lazy;
use regex::Regex;

/// A line that is exactly a four-digit number.
pub static YEAR_EXACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());

/// A plausible four-digit year anywhere in a line.
pub static YEAR_ANYWHERE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(18|19|20)\d{2}\b").unwrap());

/// A set-header line: four-digit year first, the set text after it.
pub static SET_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((?:18|19|20)\d{2})\s+\S").unwrap());

/// Prefixed card-number markings: `#12`, `No. 12`, `Card #12`. The `\b`
/// sits inside the alternation because `#` has no word boundary of its own.
pub static CARD_NUMBER_PREFIXED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:\bcard\s*)?(?:\bno\.?\s*|#\s*)(\d{1,4})\b").unwrap());

/// A line that is exactly one bare 1-4 digit token.
pub static CARD_NUMBER_PLAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,4}$").unwrap());

/// Authority-and-value grade on one line: `PSA 10`, `BGS-9.5`, `SGC 96`.
pub static GRADE_SAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(PSA|BGS|SGC)\b\s*-?\s*(\d{1,3}(?:\.\d)?)\b").unwrap());

/// A printed score value: `SCORE 9`, `Score: 95`.
pub static SCORE_SAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bscore\b\s*[:#-]?\s*(\d{1,3})\b").unwrap());

/// A line that is nothing but a number (grade values on slab labels).
pub static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}(?:\.\d)?$").unwrap());

/// Characters allowed in a printed name line: letters, periods, apostrophes,
/// hyphens, spaces.
pub static NAME_CHARACTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z.'\-\s]+$").unwrap());

/// Parse a bare-number line into a value usable as a paired grade, bounded
/// at 200.
pub fn bare_number_value(text: &str) -> Option<f64> {
    if !BARE_NUMBER.is_match(text) {
        return None;
    }
    let value: f64 = text.parse().ok()?;
    (value <= 200.0).then_some(value)
}
