// Display formatting for tooltip and label values

use num_format::{Locale, ToFormattedString};

use crate::value::Value;

/// Fractional digits shown at most; trailing zeros are dropped.
const MAX_FRACTION_DIGITS: u32 = 2;

/// Locale-aware number formatting with digit grouping.
#[derive(Debug, Clone, Copy)]
pub struct NumberFormat {
    locale: &'static Locale,
    decimal: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::from_tag("en")
    }
}

impl NumberFormat {
    /// Map a locale tag to a format.
    ///
    /// Supported tags (case-insensitive): `en`, `en_us`, `de`, `fr`, `es`,
    /// `it`, `pt`, `nl`. Anything else falls back to English.
    pub fn from_tag(tag: &str) -> Self {
        let (locale, decimal) = match tag.to_lowercase().replace('-', "_").as_str() {
            "de" | "de_de" => (&Locale::de, ','),
            "fr" | "fr_fr" => (&Locale::fr, ','),
            "es" | "es_es" => (&Locale::es, ','),
            "it" | "it_it" => (&Locale::it, ','),
            "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
            "nl" | "nl_nl" => (&Locale::nl, ','),
            _ => (&Locale::en, '.'),
        };
        NumberFormat { locale, decimal }
    }

    /// Grouped integer part, zero to two fractional digits.
    ///
    /// Rounds half up on the shortest decimal form of `n`, so `1.005`
    /// shows as `1.01` even though its binary value is slightly lower.
    pub fn format_number(&self, n: f64) -> String {
        if !n.is_finite() {
            return n.to_string();
        }
        let Some(scaled) = round_decimal(n.abs()) else {
            return n.to_string();
        };

        let scale = 10u64.pow(MAX_FRACTION_DIGITS);
        let whole = scaled / scale;
        let fraction = scaled % scale;

        let mut out = String::new();
        if n.is_sign_negative() && scaled != 0 {
            out.push('-');
        }
        out.push_str(&whole.to_formatted_string(self.locale));
        if fraction != 0 {
            let digits = format!("{:0width$}", fraction, width = MAX_FRACTION_DIGITS as usize);
            out.push(self.decimal);
            out.push_str(digits.trim_end_matches('0'));
        }
        out
    }

    /// Numbers are formatted; every other value keeps its native string form.
    pub fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Number(n) => self.format_number(*n),
            other => other.to_string(),
        }
    }
}

/// Non-negative `n` scaled by 10^MAX_FRACTION_DIGITS and rounded half up
/// on its decimal digits. `None` when the result does not fit in a u64.
fn round_decimal(n: f64) -> Option<u64> {
    // f64 Display never uses exponent notation
    let repr = n.to_string();
    let (int_digits, frac_digits) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let places = MAX_FRACTION_DIGITS as usize;

    let whole: u64 = int_digits.parse().ok()?;
    let kept: String = frac_digits
        .chars()
        .chain(std::iter::repeat('0'))
        .take(places)
        .collect();
    let mut fraction: u64 = kept.parse().ok()?;
    if frac_digits.as_bytes().get(places).is_some_and(|d| *d >= b'5') {
        fraction += 1;
    }

    whole
        .checked_mul(10u64.pow(MAX_FRACTION_DIGITS))?
        .checked_add(fraction)
}
