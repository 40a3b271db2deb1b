#[cfg(test)]
#[path = "theme_detector_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::PageStyle;

pub const DARK_MARKER_CLASSES: [&str; 2] = ["dark", "dark-theme"];
const DARK_BRIGHTNESS_THRESHOLD: f64 = 128.0;

static RGB_TRIPLE: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"([0-9]+),\s*([0-9]+),\s*([0-9]+)").unwrap());

pub struct ThemeDetector {}

impl ThemeDetector {
    /// Finds the first `r, g, b` integer triple in a CSS colour string, e.g.
    /// `rgb(10, 10, 10)` or `rgba(0, 0, 0, 0.5)`. Hex colours and keywords
    /// don't parse. Channels too large for a `u32` saturate.
    pub fn parse_rgb(color: &str) -> Option<(u32, u32, u32)> {
        let captures = RGB_TRIPLE.captures(color)?;
        let channel = |idx: usize| {
            return captures
                .get(idx)
                .map(|e| return e.as_str().parse::<u32>().unwrap_or(u32::MAX))
                .unwrap_or_default();
        };

        return Some((channel(1), channel(2), channel(3)));
    }

    pub fn brightness(r: u32, g: u32, b: u32) -> f64 {
        return (r as f64 * 299.0 + g as f64 * 587.0 + b as f64 * 114.0) / 1000.0;
    }

    pub fn has_dark_marker(style: &PageStyle) -> bool {
        return style
            .body_classes
            .iter()
            .chain(style.root_classes.iter())
            .any(|class| return DARK_MARKER_CLASSES.contains(&class.as_str()));
    }

    /// Dark when the background is darker than mid-grey or the page carries a
    /// dark marker class. A background that can't be read counts as dark.
    pub fn is_dark(style: &PageStyle) -> bool {
        if let Some((r, g, b)) = ThemeDetector::parse_rgb(&style.background_color) {
            return ThemeDetector::brightness(r, g, b) < DARK_BRIGHTNESS_THRESHOLD
                || ThemeDetector::has_dark_marker(style);
        }

        return true;
    }
}
