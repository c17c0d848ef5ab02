//! Static font-metric tables for the print font families, plus page geometry.
//!
//! Character widths are in em units (relative to font size). Static tables are an
//! approximation of real glyph metrics; the export column is flowed with them and
//! the rasterizer draws each laid-out line at its measured position, so a few
//! percent of error only shows up as slightly uneven right edges.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Humanist sans-serif.
    Inter,
    /// Old-style serif.
    EbGaramond,
    /// Traditional TeX serif. Default print font.
    ComputerModern,
}

impl FontFamily {
    /// Family list written into the rasterized SVG. Ends in a generic family so
    /// the rasterizer always finds something.
    pub fn svg_family(self) -> &'static str {
        match self {
            FontFamily::Inter => "Inter, Helvetica, Arial, sans-serif",
            FontFamily::EbGaramond => "EB Garamond, Garamond, Georgia, serif",
            FontFamily::ComputerModern => {
                "CMU Serif, Latin Modern Roman, Times New Roman, serif"
            }
        }
    }
}

impl FromStr for FontFamily {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inter" => Ok(FontFamily::Inter),
            "eb_garamond" | "ebgaramond" | "garamond" => Ok(FontFamily::EbGaramond),
            "computer_modern" | "computermodern" | "cm" => Ok(FontFamily::ComputerModern),
            other => Err(anyhow::anyhow!(
                "unknown font family '{other}' (expected inter, eb_garamond or computer_modern)"
            )),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page format
// ────────────────────────────────────────────────────────────────────────────

pub const PT_PER_IN: f32 = 72.0;

/// A fixed page size with a uniform margin on all four sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageFormat {
    pub width_in: f32,
    pub height_in: f32,
    pub margin_in: f32,
}

impl PageFormat {
    /// US Letter with 0.5" margins.
    pub const LETTER: PageFormat = PageFormat {
        width_in: 8.5,
        height_in: 11.0,
        margin_in: 0.5,
    };

    pub fn width_pt(&self) -> f32 {
        self.width_in * PT_PER_IN
    }

    pub fn height_pt(&self) -> f32 {
        self.height_in * PT_PER_IN
    }

    pub fn margin_pt(&self) -> f32 {
        self.margin_in * PT_PER_IN
    }

    pub fn printable_width_pt(&self) -> f32 {
        self.width_pt() - 2.0 * self.margin_pt()
    }

    pub fn printable_height_pt(&self) -> f32 {
        self.height_pt() - 2.0 * self.margin_pt()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Bold glyphs run about 5% wider than regular ones.
const BOLD_WIDTH_FACTOR: f32 = 1.05;

/// Static character-width table for a font family.
///
/// `widths[i]` = width of ASCII character `(i + 32)`, covering 0x20 (space) through 0x7E (~).
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub font: FontFamily,
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters fall back to `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Width in points at `size_pt`.
    pub fn measure_pt(&self, s: &str, size_pt: f32, bold: bool) -> f32 {
        let factor = if bold { BOLD_WIDTH_FACTOR } else { 1.0 };
        self.measure_str(s) * size_pt * factor
    }

    pub fn space_pt(&self, size_pt: f32) -> f32 {
        self.space_width * size_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static INTER_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Inter,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
    space_width: 0.25,
};

/// Approx. 85% of Inter.
static EB_GARAMOND_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::EbGaramond,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.21, 0.26, 0.32, 0.48, 0.48, 0.76, 0.57, 0.19, 0.28, 0.28, 0.33, 0.50, 0.24, 0.28, 0.24, 0.26,
        // 0     1     2     3     4     5     6     7     8     9
        0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48,
        // :     ;     <     =     >     ?     @
        0.24, 0.24, 0.50, 0.50, 0.50, 0.43, 0.87,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.57, 0.52, 0.52, 0.57, 0.48, 0.43, 0.57, 0.57, 0.21, 0.33, 0.52, 0.45, 0.66,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.57, 0.61, 0.48, 0.61, 0.52, 0.43, 0.48, 0.57, 0.57, 0.76, 0.52, 0.52, 0.48,
        // [     \     ]     ^     _     `
        0.24, 0.26, 0.24, 0.40, 0.48, 0.29,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.48, 0.48, 0.43, 0.48, 0.48, 0.26, 0.48, 0.48, 0.19, 0.19, 0.45, 0.19, 0.71,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.48, 0.48, 0.48, 0.48, 0.28, 0.37, 0.33, 0.48, 0.43, 0.61, 0.43, 0.43, 0.37,
        // {     |     }     ~
        0.28, 0.22, 0.28, 0.50,
    ],
    average_char_width: 0.44,
    space_width: 0.21,
};

/// Approx. 90% of Inter.
static COMPUTER_MODERN_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::ComputerModern,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.23, 0.27, 0.34, 0.50, 0.50, 0.80, 0.60, 0.20, 0.30, 0.30, 0.35, 0.53, 0.25, 0.30, 0.25, 0.28,
        // 0     1     2     3     4     5     6     7     8     9
        0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50,
        // :     ;     <     =     >     ?     @
        0.25, 0.25, 0.53, 0.53, 0.53, 0.45, 0.92,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.60, 0.55, 0.55, 0.60, 0.50, 0.45, 0.60, 0.60, 0.23, 0.35, 0.55, 0.48, 0.70,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.60, 0.65, 0.50, 0.65, 0.55, 0.45, 0.50, 0.60, 0.60, 0.80, 0.55, 0.55, 0.50,
        // [     \     ]     ^     _     `
        0.25, 0.28, 0.25, 0.42, 0.50, 0.31,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.50, 0.50, 0.45, 0.50, 0.50, 0.28, 0.50, 0.50, 0.20, 0.20, 0.48, 0.20, 0.75,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.50, 0.50, 0.50, 0.50, 0.30, 0.40, 0.35, 0.50, 0.45, 0.65, 0.45, 0.45, 0.40,
        // {     |     }     ~
        0.30, 0.23, 0.30, 0.53,
    ],
    average_char_width: 0.47,
    space_width: 0.23,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Inter => &INTER_TABLE,
        FontFamily::EbGaramond => &EB_GARAMOND_TABLE,
        FontFamily::ComputerModern => &COMPUTER_MODERN_TABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(get_metrics(FontFamily::Inter).measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFamily::Inter);
        // "Rust" = R(0.61) + u(0.56) + s(0.44) + t(0.39) = 2.00
        let width = metrics.measure_str("Rust");
        assert!((width - 2.00).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_measure_str_non_ascii_falls_back() {
        let metrics = get_metrics(FontFamily::ComputerModern);
        let width = metrics.measure_str("é");
        assert!((width - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_measure_pt_scales_with_size_and_weight() {
        let metrics = get_metrics(FontFamily::Inter);
        let regular = metrics.measure_pt("Rust", 10.0, false);
        assert!((regular - 20.0).abs() < 1e-3);
        assert!(metrics.measure_pt("Rust", 10.0, true) > regular);
    }

    #[test]
    fn test_serif_narrower_than_sans() {
        let text = "Architected distributed caching layer";
        assert!(
            get_metrics(FontFamily::EbGaramond).measure_str(text)
                < get_metrics(FontFamily::Inter).measure_str(text)
        );
    }

    #[test]
    fn test_font_family_from_str() {
        assert_eq!("inter".parse::<FontFamily>().unwrap(), FontFamily::Inter);
        assert_eq!(
            " EB_Garamond ".parse::<FontFamily>().unwrap(),
            FontFamily::EbGaramond
        );
        assert_eq!(
            "computer_modern".parse::<FontFamily>().unwrap(),
            FontFamily::ComputerModern
        );
        assert!("comic_sans".parse::<FontFamily>().is_err());
    }

    #[test]
    fn test_letter_geometry() {
        let page = PageFormat::LETTER;
        assert_eq!(page.width_pt(), 612.0);
        assert_eq!(page.height_pt(), 792.0);
        assert_eq!(page.margin_pt(), 36.0);
        assert_eq!(page.printable_width_pt(), 540.0);
        assert_eq!(page.printable_height_pt(), 720.0);
    }
}
