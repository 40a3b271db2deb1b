use super::LanguageName;
use super::LanguageProfile;

#[test]
fn it_parses_language_names() {
    assert_eq!(LanguageName::parse("cpp"), Some(LanguageName::Cpp));
    assert_eq!(LanguageName::parse("java"), Some(LanguageName::Java));
    assert_eq!(LanguageName::parse("python"), Some(LanguageName::Python));
    assert_eq!(LanguageName::parse("rust"), None);
}

#[test]
fn it_maps_profiles_to_native_labels() {
    let labels = LanguageProfile::all()
        .iter()
        .map(|profile| return format!("{}={}", profile.id, profile.submission_label))
        .collect::<Vec<String>>()
        .join(", ");

    insta::assert_snapshot!(labels, @"cpp=C++, java=Java, python=Python 3");
}

#[test]
fn it_uses_canonical_filenames() {
    assert_eq!(LanguageName::Cpp.profile().filename, "solution.cpp");
    assert_eq!(LanguageName::Java.profile().filename, "Solution.java");
    assert_eq!(LanguageName::Python.profile().filename, "solution.py");
}

#[test]
fn it_resolves_profiles_from_editor_ids() {
    let profile = LanguageProfile::from_editor_language_id("java").unwrap();
    assert_eq!(profile.id, LanguageName::Java);
    assert!(LanguageProfile::from_editor_language_id("go").is_none());
}
