//! Typed dataset rows and cell coercion.
//!
//! The published workbooks mix cell types freely: postcodes arrive as
//! floats, rents as text, dates as serials or ISO strings depending on the
//! month the file was produced. Coercion is deliberately lenient so one
//! malformed cell never aborts a refresh; unparseable numbers become `-1`
//! and unparseable dates the Unix epoch.

use calamine::Data;
use chrono::NaiveDate;
use serde::Serialize;

/// One bond lodgement. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lodgement {
    pub date_lodged: NaiveDate,
    pub postcode: String,
    pub dwelling_type: String,
    pub num_bedrooms: i64,
    pub weekly_rent: i64,
}

/// One bond refund. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Refund {
    pub date_paid: NaiveDate,
    pub postcode: String,
    pub dwelling_type: String,
    pub num_bedrooms: i64,
    pub agent_payment: i64,
    pub tenant_payment: i64,
    pub num_days_held: i64,
}

/// Bonds held in one postcode for one published month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub postcode: String,
    pub bonds_held: i64,
    /// Month label from the workbook title, e.g. "June 2024"; empty when
    /// the title carries none.
    pub month: String,
}

/// Lenient integer coercion: numeric cells truncate, numeric text parses,
/// anything else is `-1`.
pub(crate) fn cell_to_int(cell: &Data) -> i64 {
    match cell {
        Data::Int(i) => *i,
        Data::Float(f) => *f as i64,
        Data::String(s) => s.trim().parse().unwrap_or(-1),
        _ => -1,
    }
}

/// Lenient date coercion: Excel datetimes convert, ISO text parses by its
/// date part, anything else is the epoch.
pub(crate) fn cell_to_date(cell: &Data) -> NaiveDate {
    match cell {
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|naive| naive.date())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => parse_iso_date(s),
        Data::String(s) => parse_iso_date(s),
        _ => NaiveDate::default(),
    }
}

/// Text coercion: strings trim, integral floats print without the decimal
/// point so float-typed postcodes stay four digits.
pub(crate) fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Int(i) => i.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn parse_iso_date(s: &str) -> NaiveDate {
    let s = s.trim();
    let date_part = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").unwrap_or_default()
}
