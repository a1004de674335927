use crate::error::{IngestError, Result};
use crate::value::Value;

/// Decoder output shared by the delimited-text and spreadsheet paths.
///
/// Values are raw: no numeric coercion has happened yet. Every row has
/// exactly `headers.len()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Parse comma-delimited text into a raw table.
///
/// Whitespace-only lines are dropped (blank data rows included). The first
/// surviving line is the header. Short rows are padded with empty strings and
/// extra fields beyond the header count are ignored.
pub fn parse_delimited(text: &str) -> Result<RawTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header_line = lines.next().ok_or(IngestError::EmptyInput)?;
    let headers = split_fields(header_line);

    let rows = lines
        .map(|line| {
            let mut fields = split_fields(line).into_iter();
            headers
                .iter()
                .map(|_| Value::String(fields.next().unwrap_or_default()))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

/// Split one line on commas that are not inside double quotes.
///
/// Each field is trimmed and loses one leading and one trailing quote if
/// present. Doubled quotes inside a field are left as they are.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                fields.push(clean_field(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(clean_field(&current));

    fields
}

fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);
    unquoted.to_string()
}
