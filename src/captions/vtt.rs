/*!
 * Line-oriented caption dialect (WebVTT, and SRT which shares its shape).
 *
 * The document is kept as its original lines. Structural lines pass through
 * untouched, timing lines are normalized, and only text-bearing lines are
 * rewritten once translations are available.
 */

use std::collections::BTreeMap;

use super::markup::{
    leading_markup, remove_font_tags, single_line, strip_tags, trailing_markup,
};
use super::timestamp::{is_timing_line, normalize_timing_line};

/// Prefixes of header, comment and style blocks
const STRUCTURAL_PREFIXES: [&str; 3] = ["WEBVTT", "NOTE", "STYLE"];

/// A text-bearing line and the markup around it
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Position among the translatable texts of the document
    pub slot: usize,

    /// Text with every inline tag stripped; this is what gets translated
    pub clean: String,

    /// Tag run immediately before the text
    pub leading_markup: String,

    /// Tag run immediately after the text
    pub trailing_markup: String,
}

impl TextLine {
    fn from_line(line: &str, slot: usize) -> Option<Self> {
        let clean = strip_tags(line);
        if clean.is_empty() {
            return None;
        }

        Some(Self {
            slot,
            clean,
            leading_markup: leading_markup(line),
            trailing_markup: trailing_markup(line),
        })
    }

    /// Rebuild the line around a translation, falling back to the source text
    pub fn render(&self, translation: Option<&str>) -> String {
        let mut body = translation
            .map(|t| single_line(&remove_font_tags(t)))
            .unwrap_or_default();
        if body.is_empty() {
            body = self.clean.clone();
        }

        remove_font_tags(&format!(
            "{}{}{}",
            self.leading_markup, body, self.trailing_markup
        ))
    }
}

/// One line of a line-oriented document
#[derive(Debug, Clone, PartialEq)]
pub enum VttLine {
    /// Emitted exactly as stored
    Verbatim(String),

    /// Timing line, already normalized
    Timing(String),

    /// Translatable text line
    Text(TextLine),
}

/// Parsed line-oriented caption document
#[derive(Debug, Clone, Default)]
pub struct VttDocument {
    pub lines: Vec<VttLine>,
}

impl VttDocument {
    /// Parse raw WebVTT/SRT content.
    ///
    /// Line endings are normalized to `\n`.
    pub fn parse(content: &str) -> Self {
        let mut lines = Vec::new();
        let mut slot = 0;

        for raw in content.split('\n') {
            let line = remove_font_tags(raw.strip_suffix('\r').unwrap_or(raw));
            let trimmed = line.trim();

            if is_timing_line(trimmed) {
                lines.push(VttLine::Timing(normalize_timing_line(&line)));
                continue;
            }

            if Self::is_structural(&line) {
                lines.push(VttLine::Verbatim(line));
                continue;
            }

            match TextLine::from_line(&line, slot) {
                Some(text_line) => {
                    slot += 1;
                    lines.push(VttLine::Text(text_line));
                }
                None => lines.push(VttLine::Verbatim(line)),
            }
        }

        Self { lines }
    }

    fn is_structural(line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty()
            || trimmed.bytes().all(|b| b.is_ascii_digit())
            || STRUCTURAL_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
    }

    /// Clean texts in document order, one per text line
    pub fn texts(&self) -> Vec<String> {
        self.text_lines().map(|t| t.clean.clone()).collect()
    }

    /// Iterate over the translatable lines
    pub fn text_lines(&self) -> impl Iterator<Item = &TextLine> {
        self.lines.iter().filter_map(|line| match line {
            VttLine::Text(text_line) => Some(text_line),
            _ => None,
        })
    }

    /// Reassemble the document; `translations` is keyed by text slot
    pub fn render(&self, translations: &BTreeMap<usize, String>) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                VttLine::Verbatim(text) | VttLine::Timing(text) => text.clone(),
                VttLine::Text(text_line) => {
                    text_line.render(translations.get(&text_line.slot).map(String::as_str))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
