//! LaTeX document assembly.

use std::path::{Path, PathBuf};

use reportcard_core::date::format_report_date;
use reportcard_core::models::record::{ReportRecord, SectionId};
use reportcard_core::validate::validate_record;
use serde::Serialize;

use crate::error::ExportError;
use crate::latex::{escape_latex, html_to_latex};
use crate::logo::logo_png;
use crate::render::render_template;

const REPORT_TEMPLATE: &str = include_str!("../../templates/report.tex");

/// File name of the LaTeX source inside an export directory.
pub const SOURCE_FILE_NAME: &str = "report.tex";

/// File name the document's `\includegraphics` expects next to the source.
pub const LOGO_FILE_NAME: &str = "logo.png";

/// An image the LaTeX source references by relative file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoFile {
    pub file_name: &'static str,
    pub png: Vec<u8>,
}

/// An assembled document, ready to be written next to its logo.
#[derive(Debug, Clone)]
pub struct LatexExport {
    pub source: String,
    pub logo: Option<LogoFile>,
}

impl LatexExport {
    /// Write `report.tex` (and `logo.png` when present) into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let source_path = dir.join(SOURCE_FILE_NAME);
        write_file(&source_path, self.source.as_bytes())?;

        if let Some(logo) = &self.logo {
            write_file(&dir.join(logo.file_name), &logo.png)?;
        }

        tracing::info!(path = %source_path.display(), logo = self.logo.is_some(), "LaTeX source written");
        Ok(source_path)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Template context ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct Labels {
    header: String,
    date: String,
    date_prefix: String,
    student_info: String,
    name: String,
    subject: String,
    class_grade: String,
    teacher: String,
    signature: String,
}

#[derive(Serialize)]
struct Section {
    title: String,
    body: String,
}

#[derive(Serialize)]
struct DocumentContext {
    cjk_font: Option<&'static str>,
    labels: Labels,
    title: String,
    date: String,
    student_name: String,
    subject: String,
    class_grade: String,
    teacher_name: String,
    logo: Option<&'static str>,
    sections: Vec<Section>,
}

/// Assemble the complete LaTeX source for a record.
///
/// The record must pass validation. A logo that cannot be decoded is left
/// out of the document rather than failing the export.
pub fn build_latex(record: &ReportRecord) -> Result<LatexExport, ExportError> {
    validate_record(record)?;

    let bundle = record.language.bundle();
    let date = format_report_date(&record.report_date, record.language)?;

    let logo = record.logo.as_ref().and_then(|logo| match logo_png(logo) {
        Ok(png) => Some(LogoFile {
            file_name: LOGO_FILE_NAME,
            png,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "omitting logo from LaTeX export");
            None
        }
    });

    let label = |text: &str| escape_latex(&bundle.labelled(text));

    let context = DocumentContext {
        cjk_font: bundle.cjk_font,
        labels: Labels {
            header: escape_latex(bundle.header),
            date: label(bundle.date_label).trim_end().to_string(),
            date_prefix: label(bundle.date_label),
            student_info: escape_latex(bundle.student_info_heading),
            name: label(bundle.name_label).trim_end().to_string(),
            subject: label(bundle.subject_label).trim_end().to_string(),
            class_grade: label(bundle.class_grade_label).trim_end().to_string(),
            teacher: label(bundle.teacher_label).trim_end().to_string(),
            signature: escape_latex(bundle.signature_label),
        },
        title: escape_latex(record.report_title.trim()),
        date: escape_latex(&date),
        student_name: escape_latex(record.student_name.trim()),
        subject: escape_latex(record.subject.trim()),
        class_grade: escape_latex(record.class_grade.trim()),
        teacher_name: escape_latex(record.teacher_name.trim()),
        logo: logo.as_ref().map(|l| l.file_name),
        sections: SectionId::ALL
            .iter()
            .map(|&id| {
                let body = html_to_latex(record.section(id));
                Section {
                    title: escape_latex(bundle.section_titles[id.index()]),
                    body: if body.is_empty() {
                        escape_latex(bundle.no_content)
                    } else {
                        body
                    },
                }
            })
            .collect(),
    };

    let source = render_template(SOURCE_FILE_NAME, REPORT_TEMPLATE, &context)?;
    tracing::debug!(language = %record.language, bytes = source.len(), "LaTeX document assembled");

    Ok(LatexExport { source, logo })
}
