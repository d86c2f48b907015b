//! Clean-up of model output.
//!
//! Models are asked for plain text but do not always comply, so markdown and
//! HTML are stripped and the result is cut to the requested length.

use std::sync::LazyLock;

use regex::Regex;
use reportcard_core::models::language::Language;

/// English replies are cut to this many words.
pub const MAX_WORDS: usize = 100;

/// Chinese replies longer than this many non-whitespace characters are cut.
pub const MAX_CJK_CHARS: usize = 160;

/// A sentence boundary found after this character position is preferred
/// over a hard cut.
pub const MIN_CJK_BOUNDARY: usize = 120;

static FORMATTING: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\*\*(.*?)\*\*", "${1}"),
        (r"\*(.*?)\*", "${1}"),
        (r"__(.*?)__", "${1}"),
        (r"_([^_]+)_", "${1}"),
        (r"(?m)#{1,6}[ \t]*", ""),
        (r"\[(.*?)\]\(.*?\)", "${1}"),
        (r"<[^>]+>", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
    .collect()
});

/// Strip markdown emphasis, headers, links, HTML tags and common entities.
pub fn strip_formatting(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in FORMATTING.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Bound the length of an enhanced section.
///
/// English keeps the first [`MAX_WORDS`] words. Chinese text over
/// [`MAX_CJK_CHARS`] characters keeps that many characters, then backs up
/// to the last `。`, `，` or space when one falls after
/// [`MIN_CJK_BOUNDARY`].
pub fn truncate(text: &str, language: Language) -> String {
    match language {
        Language::En => {
            let words: Vec<&str> = text.split_whitespace().collect();
            if words.len() > MAX_WORDS {
                words[..MAX_WORDS].join(" ")
            } else {
                text.to_string()
            }
        }
        Language::Zh => {
            let count = text.chars().filter(|c| !c.is_whitespace()).count();
            if count <= MAX_CJK_CHARS {
                return text.to_string();
            }

            let head: Vec<char> = text.chars().take(MAX_CJK_CHARS).collect();
            let boundary = head.iter().rposition(|c| matches!(c, '。' | '，' | ' '));
            let kept = match boundary {
                Some(i) if i > MIN_CJK_BOUNDARY => &head[..=i],
                _ => &head[..],
            };
            kept.iter().collect::<String>().trim_end().to_string()
        }
    }
}

/// Full clean-up applied to a model reply.
pub fn normalize(text: &str, language: Language) -> String {
    truncate(&strip_formatting(text), language)
}
