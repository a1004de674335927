// Categorical colours for bars and pie slices

use plotters::style::RGBColor;

/// Fixed 8-colour palette, reused cyclically by index.
pub const CHART_COLORS: [&str; 8] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884D8", "#82CA9D", "#FFC658", "#FF6B9D",
];

/// Color palette for categorical data
pub struct ColorPalette {
    colors: &'static [&'static str],
}

impl Default for ColorPalette {
    fn default() -> Self {
        ColorPalette {
            colors: &CHART_COLORS,
        }
    }
}

impl ColorPalette {
    /// Hex colour for an index (wraps around past the palette size)
    pub fn get_color(&self, index: usize) -> &'static str {
        self.colors[index % self.colors.len()]
    }

    /// Same colour as `get_color`, ready for plotters
    pub fn rgb(&self, index: usize) -> RGBColor {
        parse_hex(self.get_color(index)).unwrap_or(RGBColor(0, 0, 0))
    }
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_palette_wraps() {
        let palette = ColorPalette::default();
        assert_eq!(palette.get_color(0), "#0088FE");
        assert_eq!(palette.get_color(7), "#FF6B9D");
        assert_eq!(palette.get_color(8), "#0088FE");
        assert_eq!(palette.get_color(17), "#00C49F");
    }

    #[test]
    fn test_color_palette_rgb() {
        let palette = ColorPalette::default();
        assert_eq!(palette.rgb(0), RGBColor(0x00, 0x88, 0xFE));
        assert_eq!(palette.rgb(10), RGBColor(0xFF, 0xBB, 0x28));
    }

    #[test]
    fn test_parse_hex_rejects_bad_input() {
        assert_eq!(parse_hex("0088FE"), None);
        assert_eq!(parse_hex("#12"), None);
        assert_eq!(parse_hex("#GG0000"), None);
    }
}
