use super::ThemeDetector;
use crate::domain::models::PageStyle;

fn style(background_color: &str, body_classes: &[&str]) -> PageStyle {
    return PageStyle {
        background_color: background_color.to_string(),
        body_classes: body_classes.iter().map(|e| return e.to_string()).collect(),
        root_classes: vec![],
    };
}

#[test]
fn it_parses_rgb_triples() {
    assert_eq!(ThemeDetector::parse_rgb("rgb(10, 20, 30)"), Some((10, 20, 30)));
    assert_eq!(ThemeDetector::parse_rgb("rgba(0,0,0,0.5)"), Some((0, 0, 0)));
    assert_eq!(ThemeDetector::parse_rgb("rgb(255,  255,  255)"), Some((255, 255, 255)));
    assert_eq!(ThemeDetector::parse_rgb("#ffffff"), None);
    assert_eq!(ThemeDetector::parse_rgb("transparent"), None);
    assert_eq!(ThemeDetector::parse_rgb(""), None);
}

#[test]
fn it_skips_partial_numbers() {
    assert_eq!(ThemeDetector::parse_rgb("x1, y 2, 3, 4"), Some((2, 3, 4)));
    assert_eq!(ThemeDetector::parse_rgb("color(12 34, 56, 78)"), Some((34, 56, 78)));
}

#[test]
fn it_classifies_dark_backgrounds() {
    assert!(ThemeDetector::is_dark(&style("rgb(10, 10, 10)", &[])));
}

#[test]
fn it_classifies_light_backgrounds() {
    assert!(!ThemeDetector::is_dark(&style("rgb(250, 250, 250)", &[])));
}

#[test]
fn it_uses_marker_classes_on_light_backgrounds() {
    assert!(ThemeDetector::is_dark(&style("rgb(250, 250, 250)", &["dark"])));
    assert!(ThemeDetector::is_dark(&style("rgb(250, 250, 250)", &["dark-theme"])));
    assert!(!ThemeDetector::is_dark(&style("rgb(250, 250, 250)", &["darkish"])));

    let mut root_marked = style("rgb(250, 250, 250)", &[]);
    root_marked.root_classes = vec!["dark".to_string()];
    assert!(ThemeDetector::is_dark(&root_marked));
}

#[test]
fn it_defaults_to_dark_when_unparsable() {
    assert!(ThemeDetector::is_dark(&style("transparent", &["dark"])));
    assert!(ThemeDetector::is_dark(&style("transparent", &[])));
}

#[test]
fn it_weights_channels_perceptually() {
    // Pure green is bright, pure blue is dark.
    assert!(!ThemeDetector::is_dark(&style("rgb(0, 255, 0)", &[])));
    assert!(ThemeDetector::is_dark(&style("rgb(0, 0, 255)", &[])));
    assert_eq!(ThemeDetector::brightness(255, 255, 255), 255.0);
}

#[test]
fn it_saturates_oversized_channels() {
    assert_eq!(
        ThemeDetector::parse_rgb("rgb(99999999999, 0, 0)"),
        Some((u32::MAX, 0, 0))
    );
    assert!(!ThemeDetector::is_dark(&style("rgb(99999999999, 0, 0)", &[])));
}
