//! Text rules shared by both ends of the rewrite protocol.
//!
//! The gateway validates model output with [`count_words`] and the client
//! uses the same function to pick targets, so the two can never disagree.
//! All arithmetic here is integer; every rounding rule is explicit.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Content padding of the output panel, top + bottom, in pixels.
pub const PANEL_PADDING_PX: i64 = 32;
/// Rendered line height in pixels.
pub const LINE_HEIGHT_PX: i64 = 24;
/// Average characters per rendered line.
pub const CHARS_PER_LINE: i64 = 85;
/// Average characters per word.
pub const CHARS_PER_WORD: i64 = 5;
/// Smallest target the height mapper will ever produce.
pub const MIN_TARGET_WORDS: u32 = 20;
/// Tokens per word, in tenths (1.3).
pub const TOKENS_PER_WORD_TENTHS: u64 = 13;

/// Whitespace as the counter sees it: Unicode whitespace plus the BOM.
fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Collapse every whitespace run (line breaks included) to a single space
/// and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for token in text.split(is_space).filter(|t| !t.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

/// Count words under the fixed rule set.
///
/// Contractions (`don't`), hyphenated compounds (`state-of-the-art`),
/// numerals and acronyms are one word each.
pub fn count_words(text: &str) -> usize {
    count_tokens(normalize_whitespace(text).split(' '))
}

/// Count pre-split tokens.
///
/// A token that still holds an internal space and no hyphen is a joined
/// phrase (`"high school"`) and counts once per sub-token. Empty tokens
/// count zero.
pub fn count_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> usize {
    tokens.into_iter().map(token_weight).sum()
}

fn token_weight(token: &str) -> usize {
    if token.trim_matches(is_space).is_empty() {
        return 0;
    }
    if token.contains(' ') && !token.contains('-') {
        return token.split(' ').filter(|part| !part.is_empty()).count();
    }
    1
}

/// Map a panel height in pixels to a target word count.
///
/// Always a multiple of 5, never below [`MIN_TARGET_WORDS`], and
/// non-decreasing in `height_px`.
pub fn words_for_height(height_px: u32) -> u32 {
    let available = i64::from(height_px) - PANEL_PADDING_PX;
    let lines = available.div_euclid(LINE_HEIGHT_PX);
    let words_per_line = CHARS_PER_LINE / CHARS_PER_WORD;
    let raw = lines * words_per_line;
    // Round half-up to the nearest multiple of 5.
    let rounded = (raw + 2).div_euclid(5) * 5;
    u32::try_from(rounded)
        .unwrap_or(0)
        .max(MIN_TARGET_WORDS)
}

/// `ceil(value * tenths / 10)` without floating point.
pub fn ceil_tenths(value: u64, tenths: u64) -> u64 {
    (value * tenths).div_ceil(10)
}

/// Estimated prompt tokens for `text`: `ceil(words * 1.3)`.
pub fn estimate_tokens(text: &str) -> u64 {
    ceil_tenths(count_words(text) as u64, TOKENS_PER_WORD_TENTHS)
}

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.*?)`").expect("valid regex"));

/// `_emphasis_` opening at a word start; removed along with its text.
static UNDERSCORE_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|\s|\(|\[)_[^_\s][^_\n]*_(\W|$)").expect("valid regex")
});

static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}").expect("valid regex"));

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}[ \t]+").expect("valid regex"));

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").expect("valid regex"));

/// Strip lightweight markup a model may emit and trim the result.
///
/// Every pass only ever removes characters, so repeating until nothing
/// changes terminates and makes `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_pass(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = UNDERSCORE_EMPHASIS.replace_all(&text, "${1}${2}");
    let text = UNDERSCORE_RUN.replace_all(&text, "");
    let text = HEADING.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    text.trim().to_string()
}
