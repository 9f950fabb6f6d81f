/*!
 * Dialogue-table caption dialect (ASS/SSA).
 *
 * Only `Dialogue:` records are read. Each record with visible text becomes one
 * cue, and the document is always written back out as WebVTT.
 */

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::Cue;
use super::markup::{remove_font_tags, single_line};
use super::timestamp::normalize_ass_timestamp;

/// `Dialogue: Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text`
static DIALOGUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Dialogue:\s*\d+,(\d[^,]*),(\d[^,]*),[^,]*,[^,]*,[^,]*,[^,]*,[^,]*,[^,]*,(.*)$")
        .unwrap()
});

/// `{\i1}`, `{\pos(10,20)}` and friends
static OVERRIDE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// Header written at the top of every converted document
pub const VTT_HEADER: &str = "WEBVTT";

/// Parsed ASS/SSA document
#[derive(Debug, Clone, Default)]
pub struct AssDocument {
    pub cues: Vec<Cue>,
}

impl AssDocument {
    /// Parse raw ASS/SSA content, keeping dialogue records that carry text
    pub fn parse(content: &str) -> Self {
        let cues = content
            .lines()
            .filter_map(|line| Self::parse_dialogue(line.trim()))
            .enumerate()
            .map(|(i, (start, end, text))| Cue {
                index: i + 1,
                start,
                end,
                text,
            })
            .collect();

        Self { cues }
    }

    fn parse_dialogue(line: &str) -> Option<(String, String, String)> {
        let caps = DIALOGUE_REGEX.captures(line)?;
        let text = Self::clean_text(&caps[3]);
        if text.is_empty() {
            return None;
        }

        Some((
            normalize_ass_timestamp(&caps[1]),
            normalize_ass_timestamp(&caps[2]),
            text,
        ))
    }

    /// Drop override blocks and turn `\N` / `\n` into real line breaks
    pub fn clean_text(raw: &str) -> String {
        let without_overrides = OVERRIDE_BLOCK_REGEX.replace_all(raw, "");
        let with_breaks = without_overrides.replace("\\N", "\n").replace("\\n", "\n");

        with_breaks
            .split('\n')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// Clean cue texts in document order
    pub fn texts(&self) -> Vec<String> {
        self.cues.iter().map(|cue| cue.text.clone()).collect()
    }

    /// Synthesize a WebVTT document; `translations` is keyed by cue position (0-based)
    pub fn render(&self, translations: &BTreeMap<usize, String>) -> String {
        let mut out = String::from(VTT_HEADER);
        out.push_str("\n\n");

        for (i, cue) in self.cues.iter().enumerate() {
            let mut text = translations
                .get(&i)
                .map(|t| single_line(&remove_font_tags(t)))
                .unwrap_or_default();
            if text.is_empty() {
                text = single_line(&remove_font_tags(&cue.text));
            }

            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                i + 1,
                cue.start,
                cue.end,
                text
            ));
        }

        out
    }
}
