//! Workbook decoding: header mapping, row extraction, coercion.
//!
//! Every published workbook has the same layout: two preamble rows (a title
//! and a blank), a header row, then data. Columns are located by header
//! text rather than position, so a reordered column in a future publication
//! keeps decoding while a renamed one fails loudly.

use std::io::Cursor;
use std::sync::LazyLock;

use calamine::{Data, Range, Reader, Xlsx};
use regex::Regex;

use crate::records::{cell_to_date, cell_to_int, cell_to_text, Holding, Lodgement, Refund};
use crate::DataError;

/// Rows before the header in every published workbook.
const PREAMBLE_ROWS: usize = 2;

const LODGEMENT_COLUMNS: [&str; 5] = [
    "Lodgement Date",
    "Postcode",
    "Dwelling Type",
    "Bedrooms",
    "Weekly Rent",
];

const REFUND_COLUMNS: [&str; 7] = [
    "Payment Date",
    "Postcode",
    "Dwelling Type",
    "Bedrooms",
    "Payment To Agent",
    "Payment To Tenant",
    "Days Bond Held",
];

const HOLDING_COLUMNS: [&str; 2] = ["Postcode", "Bonds Held"];

static EMPTY_CELL: Data = Data::Empty;

/// Month-and-year label in a holdings workbook title, e.g. "June 2024".
static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s*\d{4}\b",
    )
    .expect("Invalid month regex")
});

/// Decode a lodgements workbook into records.
pub fn decode_lodgements(bytes: &[u8], source: &str) -> Result<Vec<Lodgement>, DataError> {
    lodgements_from_range(&first_sheet(bytes, source)?, source)
}

/// Decode a refunds workbook into records.
pub fn decode_refunds(bytes: &[u8], source: &str) -> Result<Vec<Refund>, DataError> {
    refunds_from_range(&first_sheet(bytes, source)?, source)
}

/// Decode a holdings workbook into records. The month label comes from the
/// workbook's title cell and is stamped onto every row.
pub fn decode_holdings(bytes: &[u8], source: &str) -> Result<Vec<Holding>, DataError> {
    holdings_from_range(&first_sheet(bytes, source)?, source)
}

fn lodgements_from_range(range: &Range<Data>, source: &str) -> Result<Vec<Lodgement>, DataError> {
    let (columns, rows) = header_and_rows(range, &LODGEMENT_COLUMNS, source)?;
    let mut records = Vec::new();
    for row in rows {
        if row_is_empty(row, &columns) {
            continue;
        }
        records.push(Lodgement {
            date_lodged: cell_to_date(cell(row, columns[0])),
            postcode: cell_to_text(cell(row, columns[1])),
            dwelling_type: cell_to_text(cell(row, columns[2])),
            num_bedrooms: cell_to_int(cell(row, columns[3])),
            weekly_rent: cell_to_int(cell(row, columns[4])),
        });
    }
    Ok(records)
}

fn refunds_from_range(range: &Range<Data>, source: &str) -> Result<Vec<Refund>, DataError> {
    let (columns, rows) = header_and_rows(range, &REFUND_COLUMNS, source)?;
    let mut records = Vec::new();
    for row in rows {
        if row_is_empty(row, &columns) {
            continue;
        }
        records.push(Refund {
            date_paid: cell_to_date(cell(row, columns[0])),
            postcode: cell_to_text(cell(row, columns[1])),
            dwelling_type: cell_to_text(cell(row, columns[2])),
            num_bedrooms: cell_to_int(cell(row, columns[3])),
            agent_payment: cell_to_int(cell(row, columns[4])),
            tenant_payment: cell_to_int(cell(row, columns[5])),
            num_days_held: cell_to_int(cell(row, columns[6])),
        });
    }
    Ok(records)
}

fn holdings_from_range(range: &Range<Data>, source: &str) -> Result<Vec<Holding>, DataError> {
    let month = range
        .rows()
        .next()
        .and_then(|row| row.first())
        .map(|title| month_label(&cell_to_text(title)))
        .unwrap_or_default();
    let (columns, rows) = header_and_rows(range, &HOLDING_COLUMNS, source)?;
    let mut records = Vec::new();
    for row in rows {
        if row_is_empty(row, &columns) {
            continue;
        }
        records.push(Holding {
            postcode: cell_to_text(cell(row, columns[0])),
            bonds_held: cell_to_int(cell(row, columns[1])),
            month: month.clone(),
        });
    }
    Ok(records)
}

/// Open the first worksheet of an xlsx payload.
fn first_sheet(bytes: &[u8], source: &str) -> Result<Range<Data>, DataError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| DataError::Workbook(format!("{source}: {e}")))?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataError::Workbook(format!("{source}: workbook has no sheets")))?
        .map_err(|e| DataError::Workbook(format!("{source}: {e}")))
}

/// Locate the expected columns in the header row and return their indices
/// together with the data rows that follow. Header text is matched
/// case-insensitively with surrounding whitespace ignored.
fn header_and_rows<'a>(
    range: &'a Range<Data>,
    expected: &[&str],
    source: &str,
) -> Result<(Vec<usize>, calamine::Rows<'a, Data>), DataError> {
    let mut rows = range.rows();
    let header = rows
        .nth(PREAMBLE_ROWS)
        .ok_or_else(|| DataError::Workbook(format!("{source}: no header row")))?;
    let names: Vec<String> = header
        .iter()
        .map(|cell| cell_to_text(cell).to_ascii_lowercase())
        .collect();
    let columns = expected
        .iter()
        .map(|want| {
            names
                .iter()
                .position(|have| have == &want.to_ascii_lowercase())
                .ok_or_else(|| DataError::MissingColumn {
                    column: want.to_string(),
                    workbook: source.to_string(),
                })
        })
        .collect::<Result<Vec<usize>, DataError>>()?;
    Ok((columns, rows))
}

fn cell(row: &[Data], index: usize) -> &Data {
    row.get(index).unwrap_or(&EMPTY_CELL)
}

fn row_is_empty(row: &[Data], columns: &[usize]) -> bool {
    columns
        .iter()
        .all(|&index| matches!(row.get(index), None | Some(Data::Empty)))
}

fn month_label(title: &str) -> String {
    MONTH_RE
        .find(title)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
