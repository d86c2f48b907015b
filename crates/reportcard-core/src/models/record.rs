use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::language::Language;

/// Snapshot of every form field and section editor at one point in time.
///
/// Field names serialize in camelCase so that snapshots stay compatible with
/// the browser tool's `reportFormData` JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub class_grade: String,
    #[serde(default)]
    pub report_title: String,
    /// ISO date, `YYYY-MM-DD`.
    #[serde(default)]
    pub report_date: String,
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<Logo>,
    #[serde(default)]
    pub section1: String,
    #[serde(default)]
    pub section2: String,
    #[serde(default)]
    pub section3: String,
    #[serde(default)]
    pub section4: String,
    #[serde(default)]
    pub language: Language,
}

impl ReportRecord {
    pub fn section(&self, id: SectionId) -> &str {
        match id {
            SectionId::Assessment => &self.section1,
            SectionId::Behavior => &self.section2,
            SectionId::Plan => &self.section3,
            SectionId::Remarks => &self.section4,
        }
    }

    pub fn section_mut(&mut self, id: SectionId) -> &mut String {
        match id {
            SectionId::Assessment => &mut self.section1,
            SectionId::Behavior => &mut self.section2,
            SectionId::Plan => &mut self.section3,
            SectionId::Remarks => &mut self.section4,
        }
    }

    /// Value of a field as stored. Sections return their raw markup.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::StudentName => &self.student_name,
            Field::Subject => &self.subject,
            Field::ClassGrade => &self.class_grade,
            Field::ReportTitle => &self.report_title,
            Field::ReportDate => &self.report_date,
            Field::TeacherName => &self.teacher_name,
            Field::Section(id) => self.section(id),
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::StudentName => &mut self.student_name,
            Field::Subject => &mut self.subject,
            Field::ClassGrade => &mut self.class_grade,
            Field::ReportTitle => &mut self.report_title,
            Field::ReportDate => &mut self.report_date,
            Field::TeacherName => &mut self.teacher_name,
            Field::Section(id) => self.section_mut(id),
        }
    }

    /// Sections in report order, paired with their id.
    pub fn sections(&self) -> impl Iterator<Item = (SectionId, &str)> {
        SectionId::ALL.into_iter().map(|id| (id, self.section(id)))
    }
}

/// Logo payload. Absent means no logo is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Logo {
    /// `data:image/png;base64,...`
    DataUri(String),
    /// Path to an image file on disk.
    File(PathBuf),
}

/// One of the four fixed report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Assessment,
    Behavior,
    Plan,
    Remarks,
}

impl SectionId {
    pub const ALL: [SectionId; 4] = [
        SectionId::Assessment,
        SectionId::Behavior,
        SectionId::Plan,
        SectionId::Remarks,
    ];

    /// Zero-based position in the report.
    pub fn index(self) -> usize {
        match self {
            SectionId::Assessment => 0,
            SectionId::Behavior => 1,
            SectionId::Plan => 2,
            SectionId::Remarks => 3,
        }
    }

    /// Form key, `section1` through `section4`.
    pub fn key(self) -> &'static str {
        match self {
            SectionId::Assessment => "section1",
            SectionId::Behavior => "section2",
            SectionId::Plan => "section3",
            SectionId::Remarks => "section4",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "section1" | "assessment" => Ok(SectionId::Assessment),
            "2" | "section2" | "behavior" | "behaviour" => Ok(SectionId::Behavior),
            "3" | "section3" | "plan" => Ok(SectionId::Plan),
            "4" | "section4" | "remarks" => Ok(SectionId::Remarks),
            _ => Err(format!(
                "unknown section '{s}'. Valid options: section1..section4, assessment, behavior, plan, remarks"
            )),
        }
    }
}

/// Every user-editable field of a [`ReportRecord`] except the logo and
/// language selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    StudentName,
    Subject,
    ClassGrade,
    ReportTitle,
    ReportDate,
    TeacherName,
    Section(SectionId),
}

impl Field {
    /// The six scalar fields, in form order.
    pub const SCALARS: [Field; 6] = [
        Field::StudentName,
        Field::Subject,
        Field::ClassGrade,
        Field::ReportTitle,
        Field::ReportDate,
        Field::TeacherName,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::StudentName => "studentName",
            Field::Subject => "subject",
            Field::ClassGrade => "classGrade",
            Field::ReportTitle => "reportTitle",
            Field::ReportDate => "reportDate",
            Field::TeacherName => "teacherName",
            Field::Section(id) => id.key(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept `studentName`, `student_name` and `student-name` alike.
        let normalized: String = s.trim().chars().filter(|c| *c != '_' && *c != '-').collect();
        let scalar = Field::SCALARS
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(&normalized));
        if let Some(field) = scalar {
            return Ok(field);
        }
        s.parse::<SectionId>()
            .map(Field::Section)
            .map_err(|_| format!("unknown field '{s}'"))
    }
}
