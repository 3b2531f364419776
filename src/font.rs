//! # Standard Font Metrics
//!
//! The report sets all text in the two standard PDF Helvetica faces, which
//! viewers ship built-in — no embedding, no subsetting. What the engine does
//! need is accurate advance widths for line wrapping, so the AFM width tables
//! for the WinAnsi-reachable glyphs live here, expressed in 1/1000ths of the
//! font size.

/// The two faces used on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// The /BaseFont name for the PDF font dictionary.
    pub fn pdf_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Advance width of one character at `font_size` points.
    pub fn char_width(self, ch: char, font_size: f64) -> f64 {
        self.advance_millis(ch) as f64 / 1000.0 * font_size
    }

    /// Width of a string at `font_size` points.
    pub fn measure(self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }

    /// AFM advance in font units (1000/em).
    fn advance_millis(self, ch: char) -> u16 {
        let code = ch as u32;
        if (0x20..=0x7E).contains(&code) {
            let table = match self {
                Font::Helvetica => &HELVETICA_ASCII,
                Font::HelveticaBold => &HELVETICA_BOLD_ASCII,
            };
            return table[(code - 0x20) as usize];
        }
        match (self, ch) {
            (_, '\u{2026}') => 1000,        // ellipsis
            (_, '\u{2022}') => 350,         // bullet
            (_, '\u{b7}') => 278,           // middle dot
            (Font::Helvetica, '\u{2019}') => 222,
            (Font::HelveticaBold, '\u{2019}') => 278,
            (Font::Helvetica, '\u{2013}') => 556,
            (Font::HelveticaBold, '\u{2013}') => 556,
            // Accented Latin-1 letters track their base glyph closely enough
            // for wrapping; anything else gets the average lowercase width.
            _ => 556,
        }
    }
}

/// Helvetica AFM widths for ASCII 0x20..=0x7E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // sp..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, // A..P
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // Q..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, // a..p
    556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // q..z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold AFM widths for ASCII 0x20..=0x7E.
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // sp..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, // A..P
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // Q..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, // a..p
    611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // q..z
    389, 280, 389, 584, // {..~
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_width() {
        let w = Font::Helvetica.char_width(' ', 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_bold_wider() {
        let regular = Font::Helvetica.char_width('A', 12.0);
        let bold = Font::HelveticaBold.char_width('A', 12.0);
        assert!(bold > regular, "bold A should be wider than regular A");
    }

    #[test]
    fn test_measure_sums_advances() {
        let size = 10.0;
        let expected = (278 + 556 + 222) as f64 / 1000.0 * size; // " 0i"
        let w = Font::Helvetica.measure(" 0i", size);
        assert!((w - expected).abs() < 1e-9);
    }

    #[test]
    fn test_ellipsis_has_width() {
        assert!(Font::Helvetica.char_width('\u{2026}', 9.0) > 0.0);
    }

    #[test]
    fn test_unknown_char_uses_fallback() {
        let w = Font::Helvetica.char_width('\u{4e2d}', 10.0);
        assert!((w - 5.56).abs() < 1e-9);
    }
}
