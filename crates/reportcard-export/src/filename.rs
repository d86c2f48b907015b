use std::sync::LazyLock;

use jiff::Timestamp;
use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// `Tutorial_Report_<name>_<unix millis>.pdf`, with whitespace runs in the
/// name replaced by `_` and path separators by `-`.
pub fn pdf_filename(student_name: &str, now: Timestamp) -> String {
    let name = WHITESPACE_RUN
        .replace_all(student_name.trim(), "_")
        .replace(['/', '\\'], "-");
    format!("Tutorial_Report_{name}_{}.pdf", now.as_millisecond())
}
