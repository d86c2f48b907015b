//! Live HTML preview of the form state.
//!
//! Unlike the exports, the preview never fails on incomplete input: blank
//! fields show a placeholder and a missing or invalid date falls back.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jiff::civil::Date;
use reportcard_core::date::{format_date, parse_report_date};
use reportcard_core::models::record::{Logo, ReportRecord, SectionId};
use reportcard_core::text::{escape_html, visible_text};
use regex::Regex;
use serde::Serialize;

use crate::error::ExportError;

const PREVIEW_TEMPLATE: &str = include_str!("../templates/preview.html");

/// Shown in place of a blank field.
pub const BLANK_FIELD: &str = "________";

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").expect("valid regex")
});
static SCRIPT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)</?(?:script|style)\b[^>]*>").expect("valid regex")
});

/// Section markup with `script` and `style` elements removed. An unclosed
/// opening tag is dropped on its own.
fn strip_scripts(html: &str) -> String {
    let without_blocks = SCRIPT_BLOCK.replace_all(html, "");
    SCRIPT_TAG.replace_all(&without_blocks, "").into_owned()
}

#[derive(Serialize)]
struct Labels {
    date: String,
    name: String,
    subject: String,
    class_grade: String,
    teacher: String,
}

#[derive(Serialize)]
struct Section {
    title: &'static str,
    body: String,
}

#[derive(Serialize)]
struct PreviewContext {
    lang: &'static str,
    logo: Option<String>,
    title: String,
    date: String,
    labels: Labels,
    student_name: String,
    subject: String,
    class_grade: String,
    teacher_name: String,
    sections: Vec<Section>,
}

fn or_blank(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        BLANK_FIELD.to_string()
    } else {
        value.to_string()
    }
}

fn logo_src(logo: &Logo) -> Option<String> {
    match logo {
        Logo::DataUri(uri) => Some(uri.clone()),
        Logo::File(path) => match std::fs::read(path) {
            Ok(bytes) => {
                let mime = image::guess_format(&bytes)
                    .map(|format| format.to_mime_type())
                    .unwrap_or("image/png");
                Some(format!("data:{mime};base64,{}", STANDARD.encode(&bytes)))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "logo missing from preview");
                None
            }
        },
    }
}

/// Render the preview page. `today` stands in for a blank date.
pub fn render_preview(record: &ReportRecord, today: Date) -> Result<String, ExportError> {
    let bundle = record.language.bundle();

    let date = if record.report_date.trim().is_empty() {
        format_date(today, record.language)
    } else {
        match parse_report_date(&record.report_date) {
            Ok(date) => format_date(date, record.language),
            Err(_) => record.report_date.trim().to_string(),
        }
    };

    let label = |text: &str| bundle.labelled(text).trim_end().to_string();

    let context = PreviewContext {
        lang: match record.language.code() {
            "zh" => "zh-TW",
            other => other,
        },
        logo: record.logo.as_ref().and_then(logo_src),
        title: or_blank(&record.report_title),
        date,
        labels: Labels {
            date: label(bundle.date_label),
            name: label(bundle.name_label),
            subject: label(bundle.subject_label),
            class_grade: label(bundle.class_grade_label),
            teacher: label(bundle.teacher_label),
        },
        student_name: or_blank(&record.student_name),
        subject: or_blank(&record.subject),
        class_grade: or_blank(&record.class_grade),
        teacher_name: or_blank(&record.teacher_name),
        sections: SectionId::ALL
            .iter()
            .map(|&id| {
                let html = record.section(id);
                Section {
                    title: bundle.section_titles[id.index()],
                    body: if visible_text(html).trim().is_empty() {
                        format!("<p>{}</p>", escape_html(bundle.no_content))
                    } else {
                        strip_scripts(html)
                    },
                }
            })
            .collect(),
    };

    crate::render::render_template("preview.html", PREVIEW_TEMPLATE, &context)
}
