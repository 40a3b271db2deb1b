#[cfg(test)]
#[path = "language_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumVariantNames,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LanguageName {
    Cpp,
    Java,
    Python,
}

impl LanguageName {
    pub fn parse(text: &str) -> Option<LanguageName> {
        return LanguageName::iter().find(|e| return e.to_string() == text);
    }

    pub fn profile(&self) -> &'static LanguageProfile {
        return LanguageProfile::get(*self);
    }
}

impl Default for LanguageName {
    fn default() -> LanguageName {
        return LanguageName::Cpp;
    }
}

/// Static description of a supported language: how the editor highlights it,
/// what the uploaded file is called and which label the native submission
/// form uses for it.
#[derive(Debug, PartialEq, Eq)]
pub struct LanguageProfile {
    pub id: LanguageName,
    pub display_name: &'static str,
    pub editor_language_id: &'static str,
    pub filename: &'static str,
    pub submission_label: &'static str,
}

static PROFILES: [LanguageProfile; 3] = [
    LanguageProfile {
        id: LanguageName::Cpp,
        display_name: "C++",
        editor_language_id: "cpp",
        filename: "solution.cpp",
        submission_label: "C++",
    },
    LanguageProfile {
        id: LanguageName::Java,
        display_name: "Java",
        editor_language_id: "java",
        filename: "Solution.java",
        submission_label: "Java",
    },
    LanguageProfile {
        id: LanguageName::Python,
        display_name: "Python",
        editor_language_id: "python",
        filename: "solution.py",
        submission_label: "Python 3",
    },
];

impl LanguageProfile {
    pub fn get(name: LanguageName) -> &'static LanguageProfile {
        return PROFILES
            .iter()
            .find(|profile| return profile.id == name)
            .unwrap_or(&PROFILES[0]);
    }

    pub fn all() -> &'static [LanguageProfile] {
        return &PROFILES;
    }

    pub fn from_editor_language_id(id: &str) -> Option<&'static LanguageProfile> {
        return PROFILES
            .iter()
            .find(|profile| return profile.editor_language_id == id);
    }
}
