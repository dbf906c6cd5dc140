//! Language code table and validation.

use crate::translation::error::TranslateError;
use crate::ui::Style;

/// Supported language codes and their display names.
///
/// Codes follow the host application's convention: BCP-47-style tags for
/// the Chinese variants plus ISO 639-1 two-letter codes. The Chinese
/// variants carry Chinese display names because the prompt builder embeds
/// them verbatim in Chinese instructions.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("wyw", "文言文"),
    ("yue", "粤语"),
    ("zh-Hans", "简体中文"),
    ("zh-Hant", "繁体中文"),
];

/// Looks up the display name for a language code.
pub fn display_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Validates that the given language code is supported.
///
/// # Errors
///
/// Returns [`TranslateError::UnsupportedLanguage`] if the code is not in
/// the table.
pub fn validate_language(code: &str) -> Result<(), TranslateError> {
    if display_name(code).is_some() {
        Ok(())
    } else {
        Err(TranslateError::UnsupportedLanguage(code.to_string()))
    }
}

/// Prints all supported language codes to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Supported language codes"));
    for (code, name) in SUPPORTED_LANGUAGES {
        println!("  {:8} {}", Style::code(code), Style::secondary(name));
    }
}
