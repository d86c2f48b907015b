//! Built-in PDF fonts and their metrics.
//!
//! Latin text is set in the standard Helvetica faces with WinAnsi encoding,
//! so no font program has to be embedded. Anything WinAnsi cannot encode
//! (CJK in particular) falls back to the predefined CID font `MSung-Light`,
//! addressed through the `UniCNS-UTF16-H` CMap.

use pdf_writer::Name;

/// Weight of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

pub(crate) const HELVETICA: Name<'static> = Name(b"F1");
pub(crate) const HELVETICA_BOLD: Name<'static> = Name(b"F2");
pub(crate) const CJK: Name<'static> = Name(b"F3");

pub(crate) const CJK_BASE_FONT: Name<'static> = Name(b"MSung-Light");
pub(crate) const CJK_CMAP: Name<'static> = Name(b"UniCNS-UTF16-H");

/// Advance of a CJK ideograph, in thousandths of an em.
const CJK_WIDTH: u16 = 1000;

// Helvetica AFM advances for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

// Helvetica-Bold AFM advances for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// WinAnsi code for `c`, if the encoding has one.
pub(crate) fn win_ansi(c: char) -> Option<u8> {
    let code = match c {
        ' '..='~' | '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(code)
}

fn latin_width(c: char, face: FontFace) -> u16 {
    let table = match face {
        FontFace::Regular => &HELVETICA_WIDTHS,
        FontFace::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    match c {
        ' '..='~' => table[(c as usize) - 0x20],
        '\u{a0}' => 278,
        '•' => 350,
        '‘' | '’' | '‚' => 222,
        '“' | '”' | '„' => 333,
        '…' | '—' | '‰' => 1000,
        _ => 556,
    }
}

/// Whether `c` is set in the CJK fallback font.
pub(crate) fn needs_cjk(c: char) -> bool {
    win_ansi(c).is_none()
}

/// Advance of a single character in thousandths of an em.
pub fn char_width(c: char, face: FontFace) -> u16 {
    if needs_cjk(c) {
        CJK_WIDTH
    } else {
        latin_width(c, face)
    }
}

/// Width of `text` set at `size` points.
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c, face))).sum();
    units as f32 * size / 1000.0
}

/// A maximal stretch of text set in one font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Run<'a> {
    pub cjk: bool,
    pub text: &'a str,
}

impl Run<'_> {
    pub fn font(&self, face: FontFace) -> Name<'static> {
        match (self.cjk, face) {
            (true, _) => CJK,
            (false, FontFace::Regular) => HELVETICA,
            (false, FontFace::Bold) => HELVETICA_BOLD,
        }
    }

    /// The run's bytes in its font's encoding.
    pub fn encode(&self) -> Vec<u8> {
        if self.cjk {
            self.text
                .encode_utf16()
                .flat_map(|unit| unit.to_be_bytes())
                .collect()
        } else {
            self.text
                .chars()
                .map(|c| win_ansi(c).unwrap_or(b'?'))
                .collect()
        }
    }
}

/// Split `text` into runs that each use a single font.
pub(crate) fn runs(text: &str) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let cjk = needs_cjk(c);
        match current {
            Some(kind) if kind != cjk => {
                runs.push(Run {
                    cjk: kind,
                    text: &text[start..i],
                });
                start = i;
                current = Some(cjk);
            }
            None => current = Some(cjk),
            _ => {}
        }
    }

    if let Some(cjk) = current {
        runs.push(Run {
            cjk,
            text: &text[start..],
        });
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_uses_afm_widths() {
        assert_eq!(char_width('A', FontFace::Regular), 667);
        assert_eq!(char_width('a', FontFace::Bold), 556);
        assert_eq!(char_width('~', FontFace::Regular), 584);
        assert!((text_width("Hello", FontFace::Regular, 10.0) - 22.78).abs() < 0.001);
    }

    #[test]
    fn ideographs_are_full_width() {
        assert_eq!(char_width('學', FontFace::Regular), 1000);
        assert!((text_width("學生", FontFace::Bold, 12.0) - 24.0).abs() < 0.001);
    }

    #[test]
    fn mixed_text_splits_into_runs() {
        let runs = runs("Name：王小明 (5A)");
        let kinds: Vec<_> = runs.iter().map(|r| (r.cjk, r.text)).collect();
        assert_eq!(
            kinds,
            vec![(false, "Name"), (true, "：王小明"), (false, " (5A)")]
        );
    }

    #[test]
    fn encodings() {
        let latin = Run { cjk: false, text: "café •" };
        assert_eq!(latin.encode(), vec![b'c', b'a', b'f', 0xe9, b' ', 0x95]);
        let cjk = Run { cjk: true, text: "學" };
        assert_eq!(cjk.encode(), vec![0x5b, 0x78]);
    }
}
