use super::LanguageName;

pub const FONT_SIZES: [u32; 5] = [12, 14, 16, 18, 20];
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Global editor preferences. Not scoped to a problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserPreferences {
    pub language: LanguageName,
    pub font_size: u32,
}

impl Default for UserPreferences {
    fn default() -> UserPreferences {
        return UserPreferences {
            language: LanguageName::default(),
            font_size: DEFAULT_FONT_SIZE,
        };
    }
}

/// Font sizes are persisted the way the selector renders them, e.g. `16px`.
pub fn format_font_size(font_size: u32) -> String {
    return format!("{font_size}px");
}

pub fn parse_font_size(text: &str) -> Option<u32> {
    let size = text.trim().trim_end_matches("px").parse::<u32>().ok()?;
    if !FONT_SIZES.contains(&size) {
        return None;
    }

    return Some(size);
}
