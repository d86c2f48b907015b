use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use reportcard_core::models::language::Language;
use reportcard_core::models::record::{Logo, ReportRecord};
use reportcard_export::error::ExportError;
use reportcard_export::latex::document::{LOGO_FILE_NAME, SOURCE_FILE_NAME};
use reportcard_export::latex::build_latex;

fn jane_doe() -> ReportRecord {
    ReportRecord {
        student_name: "Jane Doe".into(),
        subject: "Math".into(),
        class_grade: "Grade 5".into(),
        report_title: "Progress & Goals_2024".into(),
        report_date: "2024-03-01".into(),
        teacher_name: "Mr. Smith".into(),
        section1: "<p>Solid work on <strong>fractions</strong>.</p>".into(),
        section2: "<p>Attentive in class.</p>".into(),
        section3: "<ul><li>Decimals</li><li>Percentages</li></ul>".into(),
        section4: "<p>Keep practising.</p>".into(),
        ..ReportRecord::default()
    }
}

fn png_data_uri() -> String {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([30, 64, 175])));
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Braces not preceded by a backslash must balance.
fn assert_balanced_braces(source: &str) {
    let mut depth = 0i64;
    let mut escaped = false;
    for c in source.chars() {
        match c {
            '\\' => {
                escaped = !escaped;
                continue;
            }
            '{' if !escaped => depth += 1,
            '}' if !escaped => depth -= 1,
            _ => {}
        }
        assert!(depth >= 0, "closing brace without opener");
        escaped = false;
    }
    assert_eq!(depth, 0, "unbalanced braces");
}

#[test]
fn english_export_contains_escaped_title_and_date() {
    let export = build_latex(&jane_doe()).unwrap();
    let tex = &export.source;

    assert!(tex.starts_with(r"\documentclass[12pt,a4paper]{article}"));
    assert!(tex.contains(r"\textcolor{primaryblue}{Progress \& Goals\_2024}}}"));
    assert!(tex.contains("March 1, 2024"));
    assert!(tex.contains(r"\textbf{Date:} March 1, 2024"));
    assert!(tex.contains(r"\textbf{Name:} & Jane Doe \\"));
    assert!(tex.contains(r"\textbf{Subject:} & Math \\"));
    assert!(tex.contains(r"\fancyhead[C]{\textcolor{primaryblue}{\textbf{Tutorial Report}}}"));
    assert!(tex.trim_end().ends_with(r"\end{document}"));
    assert!(!tex.contains("xeCJK"));
    assert!(export.logo.is_none());
    assert!(!tex.contains(r"\includegraphics"));
    assert_balanced_braces(tex);
}

#[test]
fn sections_appear_in_order_with_converted_bodies() {
    let tex = build_latex(&jane_doe()).unwrap().source;

    let positions: Vec<usize> = [
        r"\section*{Section 1: Academic Performance Assessment}",
        r"\section*{Section 2: In-class Behavioral Performance}",
        r"\section*{Section 3: Learning Plan for Next 4 Lessons}",
        r"\section*{Section 4: Teacher's Final Remarks \& Action Items}",
    ]
    .iter()
    .map(|heading| tex.find(heading).unwrap_or_else(|| panic!("missing {heading}")))
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert!(tex.contains(r"Solid work on \textbf{fractions}."));
    assert!(tex.contains("\\begin{itemize}\n\\item Decimals\n\\item Percentages"));
}

#[test]
fn signature_block_names_teacher_and_date() {
    let tex = build_latex(&jane_doe()).unwrap().source;
    assert!(tex.contains(r"\textbf{Mr. Smith} \\[0.2cm]"));
    assert!(tex.contains("Teacher's Signature"));
    assert!(tex.contains("Date: March 1, 2024"));
    assert_eq!(tex.matches(r"\rule{6cm}{0.4pt}").count(), 2);
}

#[test]
fn chinese_export_configures_cjk_fonts() {
    let record = ReportRecord {
        language: Language::Zh,
        student_name: "王小明".into(),
        ..jane_doe()
    };
    let tex = build_latex(&record).unwrap().source;

    assert!(tex.contains(r"\usepackage{xeCJK}"));
    assert!(tex.contains(r"\setCJKmainfont{Microsoft JhengHei}"));
    assert!(tex.contains(r"\setCJKsansfont{Microsoft JhengHei}"));
    assert!(tex.contains(r"\setCJKmonofont{Microsoft JhengHei}"));
    assert!(tex.contains("2024年3月1日"));
    assert!(tex.contains(r"\textbf{日期：} 2024年3月1日"));
    assert!(tex.contains(r"\section*{第一部分：學業表現評估}"));
    assert!(tex.contains("教師簽名"));
    assert!(tex.contains(r"\textbf{姓名：} & 王小明 \\"));
    assert_balanced_braces(&tex);
}

#[test]
fn special_characters_in_fields_are_escaped() {
    let record = ReportRecord {
        student_name: r"A_B {C} 100% #1 $5 ~x^y \z".into(),
        ..jane_doe()
    };
    let tex = build_latex(&record).unwrap().source;
    assert!(tex.contains(
        r"A\_B \{C\} 100\% \#1 \$5 \textasciitilde{}x\textasciicircum{}y \textbackslash{}z"
    ));
    assert_balanced_braces(&tex);
}

#[test]
fn invalid_record_is_not_exported() {
    let record = ReportRecord {
        subject: "  ".into(),
        ..jane_doe()
    };
    assert!(matches!(build_latex(&record), Err(ExportError::Validation(_))));
}

#[test]
fn logo_is_included_and_reencoded_as_png() {
    let record = ReportRecord {
        logo: Some(Logo::DataUri(png_data_uri())),
        ..jane_doe()
    };
    let export = build_latex(&record).unwrap();

    let logo = export.logo.as_ref().expect("logo kept");
    assert_eq!(logo.file_name, LOGO_FILE_NAME);
    assert!(logo.png.starts_with(b"\x89PNG"));
    assert!(export
        .source
        .contains(r"\includegraphics[width=0.3\textwidth]{logo.png}"));
}

#[test]
fn undecodable_logo_is_omitted() {
    let record = ReportRecord {
        logo: Some(Logo::DataUri("data:image/png;base64,bm90IGFuIGltYWdl".into())),
        ..jane_doe()
    };
    let export = build_latex(&record).unwrap();
    assert!(export.logo.is_none());
    assert!(!export.source.contains(r"\includegraphics"));
}

#[test]
fn write_to_places_logo_next_to_source() {
    let dir = tempfile::tempdir().unwrap();
    let record = ReportRecord {
        logo: Some(Logo::DataUri(png_data_uri())),
        ..jane_doe()
    };
    let export = build_latex(&record).unwrap();

    let path = export.write_to(dir.path()).unwrap();
    assert_eq!(path, dir.path().join(SOURCE_FILE_NAME));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), export.source);
    assert!(dir.path().join(LOGO_FILE_NAME).exists());
}
