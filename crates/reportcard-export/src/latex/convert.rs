//! Rich-text section markup to LaTeX.
//!
//! Section bodies use a small HTML subset (headings, inline emphasis, lists,
//! paragraphs and line breaks). The fragment is parsed into a tree and each
//! node kind has exactly one conversion rule.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Convert section markup to a LaTeX fragment.
///
/// Unknown tags are unwrapped and their content kept. Malformed markup is
/// repaired by the parser, so this never fails.
pub fn html_to_latex(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    convert_children(fragment.root_element(), &mut out);
    normalize_whitespace(&out)
}

fn convert_children(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            push_text(text, out);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            convert_element(child_element, out);
        }
    }
}

fn convert_element(element: ElementRef, out: &mut String) {
    match element.value().name() {
        "h1" => wrap(element, out, "\n\\subsection*{", "}\n"),
        "h2" => wrap(element, out, "\n\\subsubsection*{", "}\n"),
        "h3" | "h4" | "h5" | "h6" => wrap(element, out, "\n\\textbf{", "}\n\n"),
        "strong" | "b" => wrap(element, out, "\\textbf{", "}"),
        "em" | "i" => wrap(element, out, "\\textit{", "}"),
        "u" => wrap(element, out, "\\underline{", "}"),
        "ul" => wrap(element, out, "\n\\begin{itemize}\n", "\n\\end{itemize}\n"),
        "ol" => wrap(element, out, "\n\\begin{enumerate}\n", "\n\\end{enumerate}\n"),
        "li" => wrap(element, out, "\\item ", "\n"),
        // An empty editor line (`<p><br></p>`) is only a paragraph break.
        "p" if element.text().all(|t| t.trim().is_empty()) => out.push_str("\n\n"),
        "p" => wrap(element, out, "", "\n\n"),
        "br" => out.push_str(" \\\\\n"),
        "div" => wrap(element, out, "", "\n"),
        "script" | "style" => {}
        _ => convert_children(element, out),
    }
}

fn wrap(element: ElementRef, out: &mut String, open: &str, close: &str) {
    out.push_str(open);
    convert_children(element, out);
    out.push_str(close);
}

/// Entities are already decoded by the parser. Only `&` and non-breaking
/// spaces need mapping.
fn push_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("\\&"),
            '\u{a0}' => out.push(' '),
            _ => out.push(c),
        }
    }
}

fn normalize_whitespace(latex: &str) -> String {
    let collapsed = HORIZONTAL_SPACE.replace_all(latex, " ");
    let lines = collapsed
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    EXCESS_NEWLINES
        .replace_all(&lines, "\n\n")
        .trim()
        .to_string()
}
