// Numeric coercion shared by every ingestion path

use crate::value::Value;

/// Parse a string as a plain numeric literal.
///
/// Accepts decimal and scientific notation after trimming. Rejects empty
/// input, `NaN`/`inf` spellings, currency symbols, grouping separators and
/// percent signs.
pub fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    // f64::from_str also understands "inf" and "nan"
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a raw value to its canonical form.
///
/// Strings that are fully numeric become `Number`; everything else passes
/// through unchanged. Pure and per-field, so `normalize(normalize(v)) ==
/// normalize(v)`.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_number(&s) {
            Some(n) => Value::Number(n),
            None => Value::String(s),
        },
        other => other,
    }
}

/// Normalize every value of a row in place.
pub fn normalize_row(values: &mut [Value]) {
    for value in values.iter_mut() {
        let raw = std::mem::replace(value, Value::Null);
        *value = normalize(raw);
    }
}
