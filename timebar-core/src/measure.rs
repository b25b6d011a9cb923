//! Text measurement port

use crate::{FontFamily, FontSpec};

/// Measures rendered text width for a font.
///
/// Implemented by the host, which owns the actual font metrics. Results must
/// be deterministic for fixed inputs.
pub trait TextMeasure {
    /// Width of `text` in pixels when drawn with `font`
    fn measure_width(&self, text: &str, font: &FontSpec) -> u32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, &FontSpec) -> u32,
{
    fn measure_width(&self, text: &str, font: &FontSpec) -> u32 {
        self(text, font)
    }
}

/// Approximate measurer built on a per-glyph advance table.
///
/// Advances are in thousandths of an em, close to common sans-serif and
/// serif faces. Bold text is widened by 5%.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvanceTableMeasure;

impl AdvanceTableMeasure {
    fn advance(ch: char, family: FontFamily) -> u64 {
        match family {
            FontFamily::SansSerif => match ch {
                '0'..='9' | 'd' | 'h' => 556,
                ':' | '.' | ' ' => 278,
                '-' => 333,
                'm' => 833,
                's' => 500,
                _ => 600,
            },
            FontFamily::Serif => match ch {
                '0'..='9' | 'd' | 'h' => 500,
                ':' => 278,
                '.' | ' ' => 250,
                '-' => 333,
                'm' => 778,
                's' => 389,
                _ => 600,
            },
        }
    }
}

impl TextMeasure for AdvanceTableMeasure {
    fn measure_width(&self, text: &str, font: &FontSpec) -> u32 {
        let ems: u64 = text.chars().map(|c| Self::advance(c, font.family)).sum();
        let weight = if font.bold { 105 } else { 100 };
        let scaled = ems * u64::from(font.size_px) * weight;
        u32::try_from(scaled.div_ceil(100_000)).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(family: FontFamily, bold: bool) -> FontSpec {
        FontSpec {
            family,
            size_px: 20,
            bold,
            italic: false,
        }
    }

    #[test]
    fn test_advance_table_widths() {
        let measure = AdvanceTableMeasure;
        // 4 digits + ':' = 2224 + 278 = 2502 thousandths of an em
        assert_eq!(measure.measure_width("00:00", &font(FontFamily::SansSerif, false)), 51);
        assert_eq!(measure.measure_width("", &font(FontFamily::SansSerif, true)), 0);
        assert!(
            measure.measure_width("00:00", &font(FontFamily::SansSerif, true))
                > measure.measure_width("00:00", &font(FontFamily::SansSerif, false))
        );
        assert!(
            measure.measure_width("00:00", &font(FontFamily::Serif, false))
                < measure.measure_width("00:00", &font(FontFamily::SansSerif, false))
        );
    }

    #[test]
    fn test_huge_font_saturates() {
        let huge = FontSpec {
            size_px: u32::MAX,
            ..font(FontFamily::SansSerif, true)
        };
        assert_eq!(AdvanceTableMeasure.measure_width("00:00", &huge), u32::MAX);
    }

    #[test]
    fn test_closure_measure() {
        let per_char = |text: &str, font: &FontSpec| text.len() as u32 * font.size_px / 2;
        assert_eq!(per_char.measure_width("abcd", &font(FontFamily::Serif, false)), 40);
    }
}
