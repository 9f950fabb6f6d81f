/*!
 * Timestamp normalization.
 *
 * Every timestamp written to output uses the canonical WebVTT form
 * `HH:MM:SS.mmm`. Normalization is best-effort: anything that cannot be
 * understood is handed back unchanged.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// WebVTT/SRT timing line: `<start> --> <end><cue settings>`
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:\d{1,2}:)?\d{2}:\d{2}[.,]\d{3})\s*-->\s*((?:\d{1,2}:)?\d{2}:\d{2}[.,]\d{3})(.*)$",
    )
    .unwrap()
});

static MINUTES_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}:\d{2}\.\d{3}$").unwrap());

static SINGLE_DIGIT_HOUR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d:\d{2}:\d{2}\.\d{3}$").unwrap());

static CANONICAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}\.\d{3}$").unwrap());

/// Check whether a (trimmed) line is a timing line
pub fn is_timing_line(line: &str) -> bool {
    TIMING_LINE_REGEX.is_match(line.trim())
}

/// Rewrite a timing line with canonical endpoints, keeping any trailing cue settings.
///
/// Lines that are not timing lines are returned as given.
pub fn normalize_timing_line(line: &str) -> String {
    let Some(caps) = TIMING_LINE_REGEX.captures(line.trim()) else {
        return line.to_string();
    };

    let start = normalize_vtt_timestamp(&caps[1]);
    let end = normalize_vtt_timestamp(&caps[2]);
    let rest = caps.get(3).map_or("", |m| m.as_str());

    format!("{} --> {}{}", start, end, rest)
}

/// Normalize a WebVTT/SRT timestamp token.
///
/// - `00:01:02,345` -> `00:01:02.345`
/// - `02:03.100` -> `00:02:03.100`
/// - `1:02:03.450` -> `01:02:03.450`
pub fn normalize_vtt_timestamp(token: &str) -> String {
    let t = token.trim().replace(',', ".");

    if MINUTES_ONLY_REGEX.is_match(&t) {
        return format!("00:{}", t);
    }
    if SINGLE_DIGIT_HOUR_REGEX.is_match(&t) {
        return format!("0{}", t);
    }
    if CANONICAL_REGEX.is_match(&t) {
        return t;
    }

    token.to_string()
}

/// Normalize an ASS/SSA timestamp (`H:MM:SS.cc`, centiseconds) to `HH:MM:SS.mmm`.
///
/// The fraction is read as centiseconds and multiplied by 10, so `.5` is 50 ms.
/// A fraction wider than two digits is malformed.
pub fn normalize_ass_timestamp(token: &str) -> String {
    let t = token.trim();
    let parts: Vec<&str> = t.split(':').collect();
    if parts.len() != 3 {
        return token.to_string();
    }

    let (Ok(hours), Ok(minutes)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) else {
        return token.to_string();
    };

    let (secs_part, fraction) = match parts[2].split_once(['.', ',']) {
        Some((secs, fraction)) => (secs, fraction),
        None => (parts[2], ""),
    };

    let Ok(seconds) = secs_part.parse::<u32>() else {
        return token.to_string();
    };

    let millis = if fraction.is_empty() {
        0
    } else {
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return token.to_string();
        }
        let centis: u32 = match fraction.parse() {
            Ok(centis) => centis,
            Err(_) => return token.to_string(),
        };
        centis * 10
    };

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}
