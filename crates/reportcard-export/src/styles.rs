use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to `0.0..=1.0`.
    pub fn unit(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

/// Page geometry and typography for PDF exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyles {
    /// Page width in points (A4).
    pub page_width: f32,

    /// Page height in points (A4).
    pub page_height: f32,

    /// Page margin in millimetres (applied uniformly).
    pub margin_mm: f32,

    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub footer_size: f32,

    /// Line height as a multiple of the font size.
    pub leading: f32,

    /// Largest logo box in millimetres.
    pub logo_max_mm: f32,

    pub accent: Rgb,
    pub panel: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin_mm: 20.0,
            title_size: 22.0,
            heading_size: 14.0,
            body_size: 11.0,
            footer_size: 9.0,
            leading: 1.5,
            logo_max_mm: 35.0,
            accent: Rgb::new(30, 64, 175),
            panel: Rgb::new(245, 245, 245),
            text: Rgb::new(31, 41, 55),
            muted: Rgb::new(107, 114, 128),
        }
    }
}

impl DocumentStyles {
    pub fn margin(&self) -> f32 {
        self.margin_mm * PT_PER_MM
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin()
    }

    pub fn content_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin()
    }

    /// Top edge of the content box.
    pub fn content_top(&self) -> f32 {
        self.page_height - self.margin()
    }

    /// Lowest y a body line may reach; the footer lives below it.
    pub fn content_bottom(&self) -> f32 {
        self.margin() + self.footer_size * self.leading
    }

    pub fn line_height(&self, size: f32) -> f32 {
        size * self.leading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_with_twenty_millimetre_margin() {
        let styles = DocumentStyles::default();
        assert!((styles.margin() - 56.69).abs() < 0.01);
        assert!((styles.content_width() - 481.89).abs() < 0.01);
    }
}
