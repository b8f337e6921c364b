//! Language type: a UI language validated against the registry.

use crate::i18n::strings::{ENGLISH_STRINGS, FRENCH_STRINGS};
use crate::i18n::{LanguageConfig, LanguageRegistry, LanguageStrings};
use anyhow::{bail, Result};

/// A validated UI language.
///
/// Only supported, enabled languages can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "fr", "en")
    code: &'static str,
}

impl Language {
    pub const FRENCH: Language = Language { code: "fr" };

    pub const ENGLISH: Language = Language { code: "en" };

    /// Create a Language from a language code string.
    ///
    /// The code is trimmed and lowercased before the registry lookup, so
    /// `"FR"` and `" fr "` both resolve to French.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is valid and the language is enabled
    /// * `Err` if the code is not found or the language is disabled
    pub fn from_code(code: &str) -> Result<Language> {
        let normalized = code.trim().to_lowercase();
        let registry = LanguageRegistry::get();

        match registry.get_by_code(&normalized) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Resolve an optional request parameter, falling back to `default`
    /// when it is absent or unknown.
    pub fn from_code_or(code: Option<&str>, default: Language) -> Language {
        code.and_then(|c| Language::from_code(c).ok())
            .unwrap_or(default)
    }

    /// The registry's default language.
    pub fn default_language() -> Language {
        Language {
            code: LanguageRegistry::get().default_language().code,
        }
    }

    /// All enabled languages, in selector order.
    pub fn all() -> Vec<Language> {
        LanguageRegistry::get()
            .list_enabled()
            .into_iter()
            .map(|config| Language { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is not registered, which cannot happen for a
    /// Language built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// UI labels for this language.
    pub fn strings(&self) -> &'static LanguageStrings {
        match self.code {
            "fr" => &FRENCH_STRINGS,
            _ => &ENGLISH_STRINGS,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::default_language()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_french() {
        let language = Language::from_code("fr").expect("Should succeed");
        assert_eq!(language, Language::FRENCH);
    }

    #[test]
    fn test_from_code_is_case_insensitive() {
        assert_eq!(Language::from_code("EN").unwrap(), Language::ENGLISH);
        assert_eq!(Language::from_code(" Fr ").unwrap(), Language::FRENCH);
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("es");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Language::from_code("").is_err());
    }

    // ==================== Fallback Tests ====================

    #[test]
    fn test_from_code_or_uses_default_when_absent() {
        assert_eq!(
            Language::from_code_or(None, Language::FRENCH),
            Language::FRENCH
        );
    }

    #[test]
    fn test_from_code_or_uses_default_when_unknown() {
        assert_eq!(
            Language::from_code_or(Some("de"), Language::ENGLISH),
            Language::ENGLISH
        );
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(Language::default(), Language::ENGLISH);
    }

    #[test]
    fn test_all_languages() {
        assert_eq!(Language::all(), vec![Language::FRENCH, Language::ENGLISH]);
    }

    // ==================== Strings Access Tests ====================

    #[test]
    fn test_strings_follow_language() {
        assert_eq!(Language::FRENCH.strings().archive, "Archives");
        assert_eq!(Language::ENGLISH.strings().archive, "Archive");
    }

    #[test]
    fn test_native_name() {
        assert_eq!(Language::FRENCH.native_name(), "Français");
        assert_eq!(Language::ENGLISH.native_name(), "English");
    }

    #[test]
    fn test_english_name() {
        assert_eq!(Language::FRENCH.name(), "French");
        assert_eq!(Language::ENGLISH.name(), "English");
    }
}
