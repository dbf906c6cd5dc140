//! Post-processing of translated text returned by the model.
//!
//! Models habitually echo the request's quoting back: the translation
//! arrives wrapped in corner or curly quotes, or with a stray `" =>`
//! tail when the prompt contained one. This strips those artifacts from
//! the string ends only and splits the result into paragraphs.

/// Quote characters stripped from the very start of the text.
const LEADING_QUOTES: &[char] = &['『', '「', '"', '“'];

/// Quote characters stripped from the very end of the text.
const TRAILING_QUOTES: &[char] = &['』', '」', '"', '”'];

/// Artifact suffix occasionally echoed by the model.
const ARROW_SUFFIX: &str = "\" =>";

/// Normalizes a complete translation into paragraphs.
///
/// Trims surrounding whitespace, strips at most one leading and one
/// trailing quote character, removes a single trailing `" =>`, and splits
/// on newlines.
pub fn normalize(text: &str) -> Vec<String> {
    normalize_text(text).split('\n').map(str::to_string).collect()
}

fn normalize_text(text: &str) -> String {
    let trimmed = text.trim();

    let stripped = trimmed.strip_prefix(LEADING_QUOTES).unwrap_or(trimmed);
    let stripped = stripped.strip_suffix(TRAILING_QUOTES).unwrap_or(stripped);

    let stripped = stripped.strip_suffix(ARROW_SUFFIX).unwrap_or(stripped);

    stripped.to_string()
}
