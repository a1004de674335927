// First-sheet extraction from xlsx/xls workbooks via calamine

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Range, Reader};
use tracing::debug;

use crate::csv_reader::RawTable;
use crate::error::{IngestError, Result};
use crate::value::Value;

/// Header used for an empty header cell; repeats get `_1`, `_2`, ...
const EMPTY_HEADER: &str = "__EMPTY";

/// Decode a workbook held in memory and return its first sheet as a raw table.
pub fn decode_workbook(bytes: Vec<u8>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestError::DecodeError(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(IngestError::DecodeError("Workbook has no sheets".to_string()));
    }
    debug!(sheet = %sheet_names[0], sheets = sheet_names.len(), "Reading first sheet");

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::DecodeError("Workbook has no sheets".to_string()))?
        .map_err(|e| IngestError::DecodeError(e.to_string()))?;

    Ok(range_to_table(&range))
}

/// Convert a sheet range to header-keyed rows.
///
/// The first row that holds any value supplies the headers. Fully blank rows
/// after it are skipped and blank cells become `Null`.
pub fn range_to_table(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows().skip_while(|row| is_blank_row(row));

    let headers = match rows.next() {
        Some(header_row) => build_headers(header_row),
        None => {
            return RawTable {
                headers: Vec::new(),
                rows: Vec::new(),
            }
        }
    };

    let rows = rows
        .filter(|row| !is_blank_row(row))
        .map(|row| {
            (0..headers.len())
                .map(|idx| row.get(idx).map(cell_to_value).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    RawTable { headers, rows }
}

fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

fn build_headers(row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    row.iter()
        .map(|cell| {
            let base = match cell_to_value(cell) {
                Value::Null => EMPTY_HEADER.to_string(),
                value => {
                    let text = value.to_string();
                    if text.is_empty() {
                        EMPTY_HEADER.to_string()
                    } else {
                        text
                    }
                }
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base.clone()
            } else {
                format!("{}_{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

/// Map one cell to a raw value. Date-times keep their serial day number.
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::String(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Boolean(*b),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) | Data::Empty => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_from(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_range_to_table_basic() {
        let range = range_from(&[
            &[s("Region"), s("Sales")],
            &[s("North"), Data::Float(12.5)],
            &[s("South"), Data::Int(7)],
        ]);
        let table = range_to_table(&range);
        assert_eq!(table.headers, vec!["Region", "Sales"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec![Value::from("North"), Value::Number(12.5)]);
        assert_eq!(table.rows[1], vec![Value::from("South"), Value::Number(7.0)]);
    }

    #[test]
    fn test_range_to_table_blank_cells_become_null() {
        let range = range_from(&[
            &[s("a"), s("b"), s("c")],
            &[Data::Int(1), Data::Empty, Data::Bool(true)],
        ]);
        let table = range_to_table(&range);
        assert_eq!(
            table.rows[0],
            vec![Value::Number(1.0), Value::Null, Value::Boolean(true)]
        );
    }

    #[test]
    fn test_range_to_table_skips_blank_rows() {
        let range = range_from(&[
            &[Data::Empty, Data::Empty],
            &[s("x"), s("y")],
            &[Data::Empty, Data::Empty],
            &[Data::Int(1), Data::Int(2)],
        ]);
        let table = range_to_table(&range);
        assert_eq!(table.headers, vec!["x", "y"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_range_to_table_header_names_deduplicated() {
        let range = range_from(&[
            &[s("value"), s("value"), Data::Empty, Data::Empty],
            &[Data::Int(1), Data::Int(2), Data::Int(3), Data::Int(4)],
        ]);
        let table = range_to_table(&range);
        assert_eq!(table.headers, vec!["value", "value_1", "__EMPTY", "__EMPTY_1"]);
    }

    #[test]
    fn test_range_to_table_keeps_numeric_strings_raw() {
        let range = range_from(&[&[s("n")], &[s("42")]]);
        let table = range_to_table(&range);
        // coercion happens in the shared normalizer, not here
        assert_eq!(table.rows[0], vec![Value::from("42")]);
    }

    #[test]
    fn test_range_to_table_empty_range() {
        let range: Range<Data> = Range::empty();
        let table = range_to_table(&range);
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    fn fixture(name: &str) -> Vec<u8> {
        let path = format!("{}/test/{}", env!("CARGO_MANIFEST_DIR"), name);
        std::fs::read(&path).unwrap()
    }

    #[test]
    fn test_decode_workbook_reads_first_sheet_only() {
        let table = decode_workbook(fixture("regions.xlsx")).unwrap();
        assert_eq!(table.headers, vec!["Region", "Amount", "Note"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(
            table.rows[0],
            vec![Value::from("North"), Value::Number(120.0), Value::from("first")]
        );
        // text cell in the sheet, missing trailing cell
        assert_eq!(table.rows[1], vec![Value::from("South"), Value::from("80"), Value::Null]);
        assert_eq!(table.rows[2][1], Value::Number(200.5));
        assert!(!table.headers.iter().any(|h| h == "Code"));
    }

    #[test]
    fn test_decode_workbook_without_sheets() {
        let result = decode_workbook(fixture("no_sheets.xlsx"));
        assert!(matches!(result, Err(IngestError::DecodeError(_))));
    }

    #[test]
    fn test_decode_workbook_rejects_garbage() {
        let result = decode_workbook(b"definitely not a workbook".to_vec());
        assert!(matches!(result, Err(IngestError::DecodeError(_))));
    }
}
