//! PDF export.
//!
//! Two strategies produce the same [`PdfOutput`]: [`render_pdf`] lays the
//! report out as selectable text with built-in fonts, and
//! [`paginate_raster`] slices an already-rendered image of the report
//! across A4 pages.

pub mod fonts;
pub mod layout;
pub mod raster;
pub mod wrap;
pub mod writer;

use jiff::Timestamp;
use reportcard_core::models::record::ReportRecord;
use reportcard_core::validate::validate_record;

use crate::error::ExportError;
use crate::filename::pdf_filename;
use crate::styles::DocumentStyles;

pub use layout::{ReportLayout, layout_report};
pub use raster::{layout_raster, raster_page_count};

/// A finished PDF and the name it should be saved under.
#[derive(Debug, Clone)]
pub struct PdfOutput {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub filename: String,
}

impl PdfOutput {
    fn from_layout(layout: &ReportLayout, student_name: &str) -> Self {
        Self {
            bytes: writer::write_pdf(layout),
            page_count: layout.page_count(),
            filename: pdf_filename(student_name, Timestamp::now()),
        }
    }
}

/// Native-text strategy.
pub fn render_pdf(record: &ReportRecord, styles: &DocumentStyles) -> Result<PdfOutput, ExportError> {
    let layout = layout_report(record, styles)?;
    let output = PdfOutput::from_layout(&layout, &record.student_name);
    tracing::info!(pages = output.page_count, filename = %output.filename, "PDF rendered");
    Ok(output)
}

/// Raster strategy. `image_bytes` is a PNG or JPEG rendering of the report
/// at page width. The record must still pass validation.
pub fn paginate_raster(
    image_bytes: &[u8],
    record: &ReportRecord,
    styles: &DocumentStyles,
) -> Result<PdfOutput, ExportError> {
    validate_record(record)?;
    let layout = layout_raster(image_bytes, record.report_title.trim(), styles)?;
    let output = PdfOutput::from_layout(&layout, &record.student_name);
    tracing::info!(pages = output.page_count, filename = %output.filename, "raster PDF rendered");
    Ok(output)
}
