use jiff::civil::Date;

use crate::error::ValidationError;
use crate::models::language::{DateStyle, Language};
use crate::models::record::Field;

/// Parse the record's ISO date (`YYYY-MM-DD`).
pub fn parse_report_date(iso: &str) -> Result<Date, ValidationError> {
    iso.trim()
        .parse::<Date>()
        .map_err(|e| ValidationError::InvalidDate {
            field: Field::ReportDate,
            reason: e.to_string(),
        })
}

/// Format an ISO date for display in the given language.
///
/// `2024-03-01` becomes `March 1, 2024` in English and `2024年3月1日` in
/// Chinese.
pub fn format_report_date(iso: &str, language: Language) -> Result<String, ValidationError> {
    let date = parse_report_date(iso)?;
    Ok(format_date(date, language))
}

pub fn format_date(date: Date, language: Language) -> String {
    match language.bundle().date_style {
        DateStyle::MonthDayYear => date.strftime("%B %-d, %Y").to_string(),
        DateStyle::CjkYearMonthDay => {
            format!("{}年{}月{}日", date.year(), date.month(), date.day())
        }
    }
}
