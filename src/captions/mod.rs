/*!
 * Caption parsing and reassembly.
 *
 * Two input dialects are understood:
 * - `vtt`: line-oriented WebVTT (SRT files share the same shape)
 * - `ass`: dialogue-table ASS/SSA
 *
 * Both expose their translatable texts in document order and are rendered
 * back out as WebVTT.
 */

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;

pub mod ass;
pub mod markup;
pub mod timestamp;
pub mod vtt;

pub use self::ass::AssDocument;
pub use self::vtt::{TextLine, VttDocument, VttLine};

/// One timed, translatable caption unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// 1-based position in output order
    pub index: usize,

    /// Canonical start time (`HH:MM:SS.mmm`)
    pub start: String,

    /// Canonical end time (`HH:MM:SS.mmm`)
    pub end: String,

    /// Display text with override codes stripped
    pub text: String,
}

/// Input caption dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionFormat {
    /// Line-oriented WebVTT/SRT
    #[default]
    Vtt,
    /// Dialogue-table ASS/SSA
    Ass,
}

impl CaptionFormat {
    /// Lowercase identifier, also used in fingerprints and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vtt => "vtt",
            Self::Ass => "ass",
        }
    }

    /// Guess the dialect from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for CaptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptionFormat {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vtt" | "webvtt" | "srt" => Ok(Self::Vtt),
            "ass" | "ssa" => Ok(Self::Ass),
            other => Err(SubtitleError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A parsed caption document of either dialect
#[derive(Debug, Clone)]
pub enum CaptionDocument {
    Vtt(VttDocument),
    Ass(AssDocument),
}

impl CaptionDocument {
    /// Parse raw content in the given dialect; parsing never fails
    pub fn parse(content: &str, format: CaptionFormat) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        match format {
            CaptionFormat::Vtt => Self::Vtt(VttDocument::parse(content)),
            CaptionFormat::Ass => Self::Ass(AssDocument::parse(content)),
        }
    }

    /// Translatable texts in document order
    pub fn texts(&self) -> Vec<String> {
        match self {
            Self::Vtt(doc) => doc.texts(),
            Self::Ass(doc) => doc.texts(),
        }
    }

    /// Render as WebVTT; `translations` maps text position to translated text
    pub fn render(&self, translations: &BTreeMap<usize, String>) -> String {
        match self {
            Self::Vtt(doc) => doc.render(translations),
            Self::Ass(doc) => doc.render(translations),
        }
    }
}
