use reportcard_core::models::language::Language;

const EN_SYSTEM: &str = "You are an experienced teacher and educational assessment writer. \
Your task is to improve student assessment sections to be more professional, constructive, and helpful. \
IMPORTANT: Return ONLY plain text with no formatting (no bold, italic, underline, headers, sections, or markdown). \
Keep responses between 50-100 words. \
Maintain the original meaning while enhancing clarity, professionalism, and educational value.";

const ZH_SYSTEM: &str = "你是一位經驗豐富的教師和教育評估撰寫者。\
你的任務是改進學生評估內容，使其更加專業、建設性和有幫助。\
重要：只返回純文字，不要任何格式（不要粗體、斜體、底線、標題、章節或標記）。\
保持在40-80個中文字。\
在保持原意的同時，增強清晰度、專業性和教育價值。";

/// The instructions sent for one enhancement request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
    /// Completion budget; tighter for Chinese, which packs more per token.
    pub max_tokens: u32,
}

impl Prompt {
    pub fn new(language: Language, text: &str) -> Self {
        match language {
            Language::En => Self {
                system: EN_SYSTEM,
                user: format!(
                    "As an experienced teacher, improve this student assessment section to be more \
                     professional and constructive. Write ONLY plain text (no bold, italic, underline, \
                     headers, or formatting). Keep it between 50-100 words. Original text: {text}"
                ),
                max_tokens: 150,
            },
            Language::Zh => Self {
                system: ZH_SYSTEM,
                user: format!(
                    "作為一位經驗豐富的教師，請改進這段學生評估內容，使其更加專業和建設性。\
                     只寫純文字（不要粗體、斜體、底線、標題或任何格式）。保持在40-80個中文字。原文：{text}"
                ),
                max_tokens: 120,
            },
        }
    }
}
