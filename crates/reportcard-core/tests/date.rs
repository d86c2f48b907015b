use reportcard_core::date::format_report_date;
use reportcard_core::models::language::Language;

#[test]
fn english_dates_use_month_names() {
    assert_eq!(format_report_date("2024-03-01", Language::En).unwrap(), "March 1, 2024");
    assert_eq!(format_report_date("2023-12-25", Language::En).unwrap(), "December 25, 2023");
}

#[test]
fn chinese_dates_use_year_month_day_markers() {
    assert_eq!(format_report_date("2024-03-01", Language::Zh).unwrap(), "2024年3月1日");
}

#[test]
fn surrounding_whitespace_is_ignored() {
    assert_eq!(format_report_date(" 2024-03-01 ", Language::En).unwrap(), "March 1, 2024");
}

#[test]
fn invalid_dates_fail() {
    assert!(format_report_date("2024-02-30", Language::En).is_err());
    assert!(format_report_date("", Language::En).is_err());
}
