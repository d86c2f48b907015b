//! Page layout for the native-text strategy.
//!
//! A report is laid out into a list of pages, each holding positioned draw
//! operations. Nothing here touches PDF syntax; [`super::writer`] turns the
//! finished layout into bytes.

use reportcard_core::date::format_report_date;
use reportcard_core::models::language::LanguageBundle;
use reportcard_core::models::record::{ReportRecord, SectionId};
use reportcard_core::text::{BlockKind, html_to_blocks};
use reportcard_core::validate::validate_record;

use crate::error::ExportError;
use crate::logo::{RasterImage, load_logo};
use crate::pdf::fonts::{FontFace, text_width};
use crate::pdf::wrap::wrap_text;
use crate::styles::{DocumentStyles, PT_PER_MM, Rgb};

// ── Types ────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in PDF user space (origin bottom left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// One line of text; `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        face: FontFace,
        color: Rgb,
        text: String,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    },
    FillRect {
        area: Area,
        color: Rgb,
    },
    /// Paint `ReportLayout::images[index]` into `area`, optionally clipped.
    Image {
        index: usize,
        area: Area,
        clip: Option<Area>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    /// Text of every line on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A fully paginated document.
#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub title: String,
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<PageLayout>,
    pub images: Vec<RasterImage>,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

// ── Composer ─────────────────────────────────────────────────────────────

/// Running vertical cursor over a growing list of pages.
struct Composer<'a> {
    styles: &'a DocumentStyles,
    pages: Vec<PageLayout>,
    /// Top of the remaining free space on the current page.
    y: f32,
}

impl<'a> Composer<'a> {
    fn new(styles: &'a DocumentStyles) -> Self {
        Self {
            styles,
            pages: vec![PageLayout::default()],
            y: styles.content_top(),
        }
    }

    fn left(&self) -> f32 {
        self.styles.margin()
    }

    fn width(&self) -> f32 {
        self.styles.content_width()
    }

    fn at_page_top(&self) -> bool {
        self.y >= self.styles.content_top()
    }

    /// Start a new page unless `height` still fits on the current one.
    /// A block taller than a whole page is placed at the top of a fresh page.
    fn ensure(&mut self, height: f32) {
        if self.y - height < self.styles.content_bottom() && !self.at_page_top() {
            self.pages.push(PageLayout::default());
            self.y = self.styles.content_top();
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    /// Add vertical space, dropping it at the top of a page.
    fn gap(&mut self, dy: f32) {
        if !self.at_page_top() {
            self.y = (self.y - dy).max(self.styles.content_bottom());
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Reserve one line of `size` and return its baseline.
    fn line(&mut self, size: f32) -> f32 {
        let height = self.styles.line_height(size);
        self.ensure(height);
        let baseline = baseline_in(self.y, height, size);
        self.advance(height);
        baseline
    }

    fn text(&mut self, x: f32, y: f32, size: f32, face: FontFace, color: Rgb, text: impl Into<String>) {
        self.push(DrawOp::Text {
            x,
            y,
            size,
            face,
            color,
            text: text.into(),
        });
    }

    /// Wrapped text, each line horizontally centred on the content box.
    fn centered(&mut self, text: &str, face: FontFace, size: f32, color: Rgb) {
        for line in wrap_text(text, face, size, self.width()) {
            let baseline = self.line(size);
            let x = self.left() + (self.width() - text_width(&line, face, size)) / 2.0;
            self.text(x, baseline, size, face, color, line);
        }
    }

    fn finish(self) -> Vec<PageLayout> {
        self.pages
    }
}

/// Baseline for text of `size` vertically centred in a line box whose top
/// edge is `top`.
fn baseline_in(top: f32, line_height: f32, size: f32) -> f32 {
    top - (line_height - size) / 2.0 - size * 0.8
}

// ── Report ───────────────────────────────────────────────────────────────

/// Lay out a validated record on A4 pages.
///
/// A logo that cannot be decoded is skipped with a warning.
pub fn layout_report(
    record: &ReportRecord,
    styles: &DocumentStyles,
) -> Result<ReportLayout, ExportError> {
    validate_record(record)?;

    let bundle = record.language.bundle();
    let date = format_report_date(&record.report_date, record.language)?;

    let mut images = Vec::new();
    let mut composer = Composer::new(styles);

    if let Some(logo) = &record.logo {
        match load_logo(logo) {
            Ok(image) => {
                place_logo(&mut composer, &image, images.len());
                images.push(image);
            }
            Err(e) => tracing::warn!(error = %e, "logo could not be loaded, continuing without it"),
        }
    }

    composer.centered(record.report_title.trim(), FontFace::Bold, styles.title_size, styles.accent);
    composer.gap(4.0);
    composer.centered(
        &format!("{}{date}", bundle.labelled(bundle.date_label)),
        FontFace::Regular,
        styles.body_size,
        styles.muted,
    );
    composer.gap(16.0);

    info_panel(&mut composer, record, bundle);
    composer.gap(20.0);

    for id in SectionId::ALL {
        section(&mut composer, bundle.section_titles[id.index()], record.section(id), bundle);
        composer.gap(14.0);
    }

    signatures(&mut composer, record.teacher_name.trim(), &format!("{}{date}", bundle.labelled(bundle.date_label)), bundle);

    let mut pages = composer.finish();
    write_footers(&mut pages, styles, bundle);

    tracing::debug!(pages = pages.len(), language = %record.language, "report laid out");

    Ok(ReportLayout {
        title: record.report_title.trim().to_string(),
        page_width: styles.page_width,
        page_height: styles.page_height,
        pages,
        images,
    })
}

fn place_logo(composer: &mut Composer, image: &RasterImage, index: usize) {
    let max = composer.styles.logo_max_mm * PT_PER_MM;
    let (width, height) = if image.aspect() > 1.0 {
        (max / image.aspect(), max)
    } else {
        (max, max * image.aspect())
    };

    composer.ensure(height);
    let area = Area {
        x: composer.left() + (composer.width() - width) / 2.0,
        y: composer.y - height,
        width,
        height,
    };
    composer.push(DrawOp::Image {
        index,
        area,
        clip: None,
    });
    composer.advance(height);
    composer.gap(10.0);
}

/// Most wrapped lines a single info-panel value may take. Four full rows
/// still leave the panel well inside one page.
const MAX_VALUE_LINES: usize = 4;

/// Shaded student-information panel. The panel is never split, so each
/// value is capped at [`MAX_VALUE_LINES`] and ellipsised past that.
fn info_panel(composer: &mut Composer, record: &ReportRecord, bundle: &LanguageBundle) {
    let styles = composer.styles;
    let size = styles.body_size;
    let padding = 12.0;
    let line_height = styles.line_height(size);
    let heading_height = styles.line_height(styles.heading_size);

    let rows = [
        (bundle.name_label, record.student_name.trim()),
        (bundle.subject_label, record.subject.trim()),
        (bundle.class_grade_label, record.class_grade.trim()),
        (bundle.teacher_label, record.teacher_name.trim()),
    ];
    let labels: Vec<String> = rows.iter().map(|(label, _)| bundle.labelled(label)).collect();
    let label_width = labels
        .iter()
        .map(|label| text_width(label, FontFace::Bold, size))
        .fold(0.0_f32, f32::max);

    let inner_width = composer.width() - 2.0 * padding;
    let value_width = (inner_width - label_width).max(inner_width / 2.0);
    let wrapped: Vec<Vec<String>> = rows
        .iter()
        .map(|(_, value)| {
            let lines = wrap_text(value, FontFace::Regular, size, value_width);
            cap_lines(lines, MAX_VALUE_LINES, FontFace::Regular, size, value_width)
        })
        .collect();
    let row_lines: usize = wrapped.iter().map(Vec::len).sum();

    let height = 2.0 * padding + heading_height + 4.0 + row_lines as f32 * line_height;
    composer.ensure(height);

    let top = composer.y;
    let left = composer.left();
    composer.push(DrawOp::FillRect {
        area: Area {
            x: left,
            y: top - height,
            width: composer.width(),
            height,
        },
        color: styles.panel,
    });

    let mut y = top - padding;
    let heading = bundle.student_info_heading;
    let heading_x = left + (composer.width() - text_width(heading, FontFace::Bold, styles.heading_size)) / 2.0;
    composer.text(
        heading_x,
        baseline_in(y, heading_height, styles.heading_size),
        styles.heading_size,
        FontFace::Bold,
        styles.accent,
        heading,
    );
    y -= heading_height + 4.0;

    for (label, lines) in labels.into_iter().zip(wrapped) {
        composer.text(left + padding, baseline_in(y, line_height, size), size, FontFace::Bold, styles.text, label);
        for line in lines {
            composer.text(
                left + padding + label_width,
                baseline_in(y, line_height, size),
                size,
                FontFace::Regular,
                styles.text,
                line,
            );
            y -= line_height;
        }
    }

    composer.advance(height);
}

/// Keep at most `max` lines, marking the cut with an ellipsis that still
/// fits in `width`.
fn cap_lines(mut lines: Vec<String>, max: usize, face: FontFace, size: f32, width: f32) -> Vec<String> {
    if lines.len() <= max {
        return lines;
    }
    lines.truncate(max);
    if let Some(last) = lines.last_mut() {
        let mut kept = last.trim_end().to_string();
        while !kept.is_empty() && text_width(&format!("{kept}…"), face, size) > width {
            kept.pop();
        }
        *last = format!("{}…", kept.trim_end());
    }
    lines
}

fn section(composer: &mut Composer, title: &str, html: &str, bundle: &LanguageBundle) {
    let styles = composer.styles;
    let title_lines = wrap_text(title, FontFace::Bold, styles.heading_size, composer.width());
    let rule_gap = 8.0;

    // Keep the title with its rule and at least one body line.
    composer.ensure(
        title_lines.len() as f32 * styles.line_height(styles.heading_size)
            + rule_gap
            + styles.line_height(styles.body_size),
    );

    for line in title_lines {
        let baseline = composer.line(styles.heading_size);
        let x = composer.left();
        composer.text(x, baseline, styles.heading_size, FontFace::Bold, styles.accent, line);
    }

    let rule_y = composer.y - 2.0;
    let (left, right) = (composer.left(), composer.left() + composer.width());
    composer.push(DrawOp::Line {
        from: (left, rule_y),
        to: (right, rule_y),
        width: 1.0,
        color: styles.accent,
    });
    composer.advance(rule_gap);

    let blocks = html_to_blocks(html);
    if blocks.is_empty() {
        for line in wrap_text(bundle.no_content, FontFace::Regular, styles.body_size, composer.width()) {
            let baseline = composer.line(styles.body_size);
            let x = composer.left();
            composer.text(x, baseline, styles.body_size, FontFace::Regular, styles.muted, line);
        }
        return;
    }

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            composer.gap(4.0);
        }

        let (marker, face) = match block.kind {
            BlockKind::Heading => (None, FontFace::Bold),
            BlockKind::Paragraph => (None, FontFace::Regular),
            BlockKind::Bullet => (Some("•".to_string()), FontFace::Regular),
            BlockKind::Numbered(n) => (Some(format!("{n}.")), FontFace::Regular),
        };
        let indent = if marker.is_some() { 16.0 } else { 0.0 };
        let size = styles.body_size;

        let lines = wrap_text(&block.text, face, size, composer.width() - indent);
        for (n, line) in lines.into_iter().enumerate() {
            let baseline = composer.line(size);
            let x = composer.left();
            if n == 0 {
                if let Some(marker) = &marker {
                    composer.text(x + 4.0, baseline, size, FontFace::Regular, styles.text, marker.clone());
                }
            }
            composer.text(x + indent, baseline, size, face, styles.text, line);
        }
    }
}

/// Two signature lines side by side: teacher on the left, date on the right.
/// Both texts wrap within their own column.
fn signatures(composer: &mut Composer, teacher: &str, date_line: &str, bundle: &LanguageBundle) {
    let styles = composer.styles;
    let size = styles.body_size;
    let space_above = 36.0;
    let line_height = styles.line_height(size);
    let small_height = styles.line_height(styles.footer_size);

    let column = composer.width() * 0.45;
    let teacher_lines = wrap_text(teacher, FontFace::Bold, size, column);
    let date_lines = wrap_text(date_line, FontFace::Regular, size, column);
    let label_lines = wrap_text(bundle.signature_label, FontFace::Regular, styles.footer_size, column);
    let left_height = teacher_lines.len() as f32 * line_height + label_lines.len() as f32 * small_height;
    let text_height = left_height.max(date_lines.len() as f32 * line_height);

    composer.ensure(space_above + 6.0 + text_height);
    composer.gap(space_above);

    let left = composer.left();
    let right = left + composer.width() - column;
    let rule_y = composer.y;

    for x in [left, right] {
        composer.push(DrawOp::Line {
            from: (x, rule_y),
            to: (x + column, rule_y),
            width: 0.6,
            color: styles.text,
        });
    }
    composer.advance(6.0);

    let top = composer.y;
    let center = |x: f32, text: &str, face: FontFace, size: f32| {
        x + ((column - text_width(text, face, size)) / 2.0).max(0.0)
    };

    for (n, line) in teacher_lines.iter().enumerate() {
        let baseline = baseline_in(top - n as f32 * line_height, line_height, size);
        composer.text(center(left, line, FontFace::Bold, size), baseline, size, FontFace::Bold, styles.text, line.as_str());
    }
    for (n, line) in date_lines.iter().enumerate() {
        let baseline = baseline_in(top - n as f32 * line_height, line_height, size);
        composer.text(center(right, line, FontFace::Regular, size), baseline, size, FontFace::Regular, styles.text, line.as_str());
    }

    let label_top = top - teacher_lines.len() as f32 * line_height;
    for (n, line) in label_lines.iter().enumerate() {
        let baseline = baseline_in(label_top - n as f32 * small_height, small_height, styles.footer_size);
        composer.text(
            center(left, line, FontFace::Regular, styles.footer_size),
            baseline,
            styles.footer_size,
            FontFace::Regular,
            styles.muted,
            line.as_str(),
        );
    }

    composer.advance(text_height);
}

/// Number every page once the total is known.
fn write_footers(pages: &mut [PageLayout], styles: &DocumentStyles, bundle: &LanguageBundle) {
    let total = pages.len();
    let y = styles.margin() / 2.0;
    for (i, page) in pages.iter_mut().enumerate() {
        let text = bundle.page_footer(i + 1, total);
        let x = (styles.page_width - text_width(&text, FontFace::Regular, styles.footer_size)) / 2.0;
        page.ops.push(DrawOp::Text {
            x,
            y,
            size: styles.footer_size,
            face: FontFace::Regular,
            color: styles.muted,
            text,
        });
    }
}
