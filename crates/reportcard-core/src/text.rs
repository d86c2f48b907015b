//! Plain-text views of section markup.
//!
//! Sections are stored as a constrained HTML subset. Validation needs their
//! visible text, the PDF layout engine needs paragraph-level blocks, and the
//! enhancement flow needs to turn plain text back into paragraphs.

use scraper::{ElementRef, Html};

/// Visible text content of an HTML fragment, the equivalent of the DOM's
/// `textContent`. Entities are decoded.
pub fn visible_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect()
}

/// The kind of a plain-text block extracted from section markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Paragraph,
    Bullet,
    /// Ordered list item with its 1-based number.
    Numbered(usize),
}

/// One block of plain text. `text` may contain `\n` for forced line breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub text: String,
}

/// Flatten section markup into paragraph-level blocks of plain text.
///
/// Block elements (`p`, `div`, headings, list items) start new blocks, `br`
/// becomes a line break inside the current block, and every other element is
/// unwrapped. Whitespace runs collapse to a single space.
pub fn html_to_blocks(html: &str) -> Vec<TextBlock> {
    let fragment = Html::parse_fragment(html);
    let mut collector = BlockCollector::default();
    collector.walk(fragment.root_element());
    collector.flush();
    collector.blocks
}

#[derive(Default)]
struct BlockCollector {
    blocks: Vec<TextBlock>,
    current: String,
    kind: Option<BlockKind>,
    /// `None` for a bulleted list, `Some(counter)` for an ordered one.
    lists: Vec<Option<usize>>,
}

impl BlockCollector {
    fn walk(&mut self, element: ElementRef) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.push_inline(text);
            } else if let Some(child_element) = ElementRef::wrap(child) {
                match child_element.value().name() {
                    "br" => self.current.push('\n'),
                    "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                        self.flush();
                        self.kind = Some(BlockKind::Heading);
                        self.walk(child_element);
                        self.flush();
                    }
                    "p" | "div" => {
                        self.flush();
                        self.walk(child_element);
                        self.flush();
                    }
                    "ul" | "ol" => {
                        self.flush();
                        let ordered = child_element.value().name() == "ol";
                        self.lists.push(ordered.then_some(0));
                        self.walk(child_element);
                        self.lists.pop();
                        self.flush();
                    }
                    "li" => {
                        self.flush();
                        let kind = match self.lists.last_mut() {
                            Some(Some(counter)) => {
                                *counter += 1;
                                BlockKind::Numbered(*counter)
                            }
                            _ => BlockKind::Bullet,
                        };
                        self.kind = Some(kind);
                        self.walk(child_element);
                        self.flush();
                    }
                    "script" | "style" => {}
                    _ => self.walk(child_element),
                }
            }
        }
    }

    fn push_inline(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                if !self.current.is_empty()
                    && !self.current.ends_with(' ')
                    && !self.current.ends_with('\n')
                {
                    self.current.push(' ');
                }
            } else {
                self.current.push(c);
            }
        }
    }

    fn flush(&mut self) {
        let kind = self.kind.take().unwrap_or(BlockKind::Paragraph);
        let text = self
            .current
            .split('\n')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
            .trim_matches('\n')
            .to_string();
        self.current.clear();
        if !text.is_empty() {
            self.blocks.push(TextBlock { kind, text });
        }
    }
}

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Turn plain text into paragraph markup: blank lines separate paragraphs,
/// single newlines inside a paragraph become spaces.
pub fn paragraphs_to_html(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    if paragraphs.is_empty() {
        return format!("<p>{}</p>", escape_html(text.trim()));
    }

    paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", escape_html(p)))
        .collect()
}
