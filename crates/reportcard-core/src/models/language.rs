use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Report language. Selects wording, date locale and fonts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    /// Traditional Chinese (zh-TW).
    Zh,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    /// The label/template bundle for this language.
    pub fn bundle(self) -> &'static LanguageBundle {
        match self {
            Language::En => &ENGLISH,
            Language::Zh => &CHINESE,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Language::En),
            "zh" | "zh-tw" | "zh-hant" | "chinese" => Ok(Language::Zh),
            _ => Err(format!("unknown language '{s}'. Valid options: en, zh")),
        }
    }
}

/// How a report date is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `March 1, 2024`
    MonthDayYear,
    /// `2024年3月1日`
    CjkYearMonthDay,
}

/// Everything language-dependent about a rendered report, looked up once
/// per render.
#[derive(Debug)]
pub struct LanguageBundle {
    pub language: Language,
    /// Running page header.
    pub header: &'static str,
    /// Separator placed between a label and its value (`": "` or `"："`).
    pub label_separator: &'static str,
    pub date_label: &'static str,
    pub student_info_heading: &'static str,
    pub name_label: &'static str,
    pub subject_label: &'static str,
    pub class_grade_label: &'static str,
    pub teacher_label: &'static str,
    pub section_titles: [&'static str; 4],
    pub signature_label: &'static str,
    pub no_content: &'static str,
    pub default_title: &'static str,
    pub default_sections: [&'static str; 4],
    pub date_style: DateStyle,
    /// CJK font requested from `xeCJK`, if the language needs one.
    pub cjk_font: Option<&'static str>,
    /// Footer pattern with `{page}` and `{total}` placeholders.
    pub page_footer: &'static str,
}

impl LanguageBundle {
    /// `label` followed by the language's separator, e.g. `Date: `.
    pub fn labelled(&self, label: &str) -> String {
        format!("{label}{}", self.label_separator)
    }

    pub fn page_footer(&self, page: usize, total: usize) -> String {
        self.page_footer
            .replace("{page}", &page.to_string())
            .replace("{total}", &total.to_string())
    }
}

static ENGLISH: LanguageBundle = LanguageBundle {
    language: Language::En,
    header: "Tutorial Report",
    label_separator: ": ",
    date_label: "Date",
    student_info_heading: "Student Information",
    name_label: "Name",
    subject_label: "Subject",
    class_grade_label: "Class/Grade",
    teacher_label: "Teacher",
    section_titles: [
        "Section 1: Academic Performance Assessment",
        "Section 2: In-class Behavioral Performance",
        "Section 3: Learning Plan for Next 4 Lessons",
        "Section 4: Teacher's Final Remarks & Action Items",
    ],
    signature_label: "Teacher's Signature",
    no_content: "No content provided.",
    default_title: "學生進度報告",
    default_sections: [
        "The student has shown consistent effort in their academic work. They demonstrate a good understanding of the fundamental concepts covered in class.",
        "The student displays positive behavior during class sessions. They are attentive, participate actively, and show respect towards peers and the teacher.",
        "In the next four lessons, we will focus on reinforcing key concepts, practicing problem-solving skills, and preparing for upcoming assessments.",
        "Overall, the student is making steady progress. Continued practice and engagement will help them achieve their learning goals. Action items: Complete assigned homework and review previous lessons.",
    ],
    date_style: DateStyle::MonthDayYear,
    cjk_font: None,
    page_footer: "Page {page} of {total}",
};

static CHINESE: LanguageBundle = LanguageBundle {
    language: Language::Zh,
    header: "補習報告",
    label_separator: "：",
    date_label: "日期",
    student_info_heading: "學生資料",
    name_label: "姓名",
    subject_label: "科目",
    class_grade_label: "班級/年級",
    teacher_label: "教師",
    section_titles: [
        "第一部分：學業表現評估",
        "第二部分：課堂行為表現",
        "第三部分：未來四節課學習計劃",
        "第四部分：教師總結及行動項目",
    ],
    signature_label: "教師簽名",
    no_content: "未提供內容。",
    default_title: "學生進度報告",
    default_sections: [
        "學生在學業方面表現出持續的努力。他們對課堂上涵蓋的基本概念有良好的理解。",
        "學生在課堂上表現出積極的行為。他們專心聽講，積極參與，並對同學和老師表現出尊重。",
        "在接下來的四節課中，我們將重點加強關鍵概念，練習解決問題的技能，並為即將到來的評估做準備。",
        "總體而言，學生正在穩步進步。持續的練習和參與將幫助他們實現學習目標。行動項目：完成指定的作業並複習之前的課程。",
    ],
    date_style: DateStyle::CjkYearMonthDay,
    cjk_font: Some("Microsoft JhengHei"),
    page_footer: "第 {page} 頁，共 {total} 頁",
};
