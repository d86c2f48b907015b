//! Greedy line breaking against font metrics.

use crate::pdf::fonts::{FontFace, needs_cjk, text_width};

/// A breakable unit: a word, or a single ideograph.
struct Token<'a> {
    text: &'a str,
    space_before: bool,
}

fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;
    let mut space_before = false;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            end_word(line, &mut tokens, &mut word_start, i, &mut space_before);
            space_before = !tokens.is_empty();
        } else if needs_cjk(c) {
            end_word(line, &mut tokens, &mut word_start, i, &mut space_before);
            tokens.push(Token {
                text: &line[i..i + c.len_utf8()],
                space_before,
            });
            space_before = false;
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    end_word(line, &mut tokens, &mut word_start, line.len(), &mut space_before);
    tokens
}

fn end_word<'a>(
    line: &'a str,
    tokens: &mut Vec<Token<'a>>,
    word_start: &mut Option<usize>,
    end: usize,
    space_before: &mut bool,
) {
    if let Some(start) = word_start.take() {
        tokens.push(Token {
            text: &line[start..end],
            space_before: *space_before,
        });
        *space_before = false;
    }
}

/// Break `text` into lines no wider than `max_width` points.
///
/// Explicit `\n` always breaks. Latin text breaks between words and CJK text
/// between any two characters. A single word wider than the line is split
/// between characters.
pub fn wrap_text(text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for hard_line in text.split('\n') {
        let mut current = String::new();

        for token in tokenize(hard_line) {
            let candidate = if current.is_empty() {
                token.text.to_string()
            } else if token.space_before {
                format!("{current} {}", token.text)
            } else {
                format!("{current}{}", token.text)
            };

            if text_width(&candidate, face, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(token.text, face, size) <= max_width {
                current = token.text.to_string();
            } else {
                let mut pieces = split_chars(token.text, face, size, max_width);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        lines.push(current);
    }

    lines
}

fn split_chars(word: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if current.chars().count() > 1 && text_width(&current, face, size) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    pieces.push(current);
    pieces
}
