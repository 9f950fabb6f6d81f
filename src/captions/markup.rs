/*!
 * Inline markup handling for caption text.
 *
 * `<font ...>` tags are never allowed in output; every other inline tag is
 * kept verbatim around the translated text.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static FONT_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?font\b[^>]*>").unwrap());

static EMPTY_FONT_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<font\b[^>]*>\s*</font>").unwrap());

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

static LEADING_TAGS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:<[^>]+>)+").unwrap());

static TRAILING_TAGS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:<[^>]+>)+$").unwrap());

static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[\r\n]+\s*").unwrap());

static HORIZONTAL_WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Remove every `<font ...>` and `</font>` tag.
///
/// Empty font pairs go first so no stray whitespace is left between them.
pub fn remove_font_tags(content: &str) -> String {
    let cleaned = EMPTY_FONT_TAG_REGEX.replace_all(content, "");
    FONT_TAG_REGEX.replace_all(&cleaned, "").into_owned()
}

/// Strip every inline tag and trim the result
pub fn strip_tags(line: &str) -> String {
    TAG_REGEX.replace_all(line, "").trim().to_string()
}

/// Contiguous tag run at the very start of the line, font tags removed
pub fn leading_markup(line: &str) -> String {
    LEADING_TAGS_REGEX
        .find(line)
        .map(|m| remove_font_tags(m.as_str()))
        .unwrap_or_default()
}

/// Contiguous tag run at the very end of the line, font tags removed
pub fn trailing_markup(line: &str) -> String {
    TRAILING_TAGS_REGEX
        .find(line)
        .map(|m| remove_font_tags(m.as_str()))
        .unwrap_or_default()
}

/// Collapse runs of spaces and tabs into a single space
pub fn collapse_horizontal_whitespace(text: &str) -> String {
    HORIZONTAL_WHITESPACE_REGEX.replace_all(text, " ").into_owned()
}

/// Force text onto one physical line
pub fn single_line(text: &str) -> String {
    let joined = LINE_BREAK_REGEX.replace_all(text, " ");
    collapse_horizontal_whitespace(&joined).trim().to_string()
}
