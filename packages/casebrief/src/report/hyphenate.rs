//! German hyphenation for long words.
//!
//! Break opportunities are marked with U+00AD (soft hyphen). The line
//! wrapper turns a soft hyphen into a visible `-` only where it breaks a
//! line and drops it everywhere else, so no glyph for U+00AD is needed.

use hyphenation::{Hyphenator, Language, Load, Standard};

use crate::error::{ReportError, ReportResult};

/// Soft hyphen.
pub const SOFT_HYPHEN: char = '\u{00AD}';

/// Words of this many characters or fewer are left alone.
pub const MIN_WORD_CHARS: usize = 12;

/// Dictionary-driven hyphenator (German, 1996 orthography).
pub struct GermanHyphenator {
    dictionary: Standard,
}

impl GermanHyphenator {
    /// Load the embedded dictionary.
    pub fn new() -> ReportResult<Self> {
        let dictionary = Standard::from_embedded(Language::German1996)
            .map_err(|e| ReportError::Dictionary(e.to_string()))?;
        Ok(Self { dictionary })
    }

    /// Insert soft hyphens into every long word of `text`.
    pub fn hyphenate_text(&self, text: &str) -> String {
        insert_soft_hyphens(text, |word| self.dictionary.hyphenate(word).breaks)
    }
}

/// Insert soft hyphens at the byte offsets `breaks` returns for each word.
///
/// Whitespace is preserved, leading and trailing punctuation is split off
/// before lookup, and only purely alphabetic cores longer than
/// [`MIN_WORD_CHARS`] are hyphenated. Numbers, URLs and compounds already
/// containing `-` pass through unchanged.
pub fn insert_soft_hyphens<F>(text: &str, breaks: F) -> String
where
    F: Fn(&str) -> Vec<usize>,
{
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut token_start = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = token_start.take() {
                push_token(&mut out, &text[start..i], &breaks);
            }
            out.push(c);
        } else if token_start.is_none() {
            token_start = Some(i);
        }
    }
    if let Some(start) = token_start {
        push_token(&mut out, &text[start..], &breaks);
    }

    out
}

fn push_token<F>(out: &mut String, token: &str, breaks: &F)
where
    F: Fn(&str) -> Vec<usize>,
{
    let core_start = token.find(char::is_alphabetic).unwrap_or(token.len());
    let core_end = token
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphabetic())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(core_start);

    if core_start >= core_end {
        out.push_str(token);
        return;
    }

    let core = &token[core_start..core_end];
    if core.chars().count() <= MIN_WORD_CHARS || !core.chars().all(char::is_alphabetic) {
        out.push_str(token);
        return;
    }

    out.push_str(&token[..core_start]);
    let mut last = 0;
    let mut points = breaks(core);
    points.sort_unstable();
    for point in points {
        if point <= last || point >= core.len() || !core.is_char_boundary(point) {
            continue;
        }
        out.push_str(&core[last..point]);
        out.push(SOFT_HYPHEN);
        last = point;
    }
    out.push_str(&core[last..]);
    out.push_str(&token[core_end..]);
}

/// Remove all soft hyphens.
pub fn strip_soft_hyphens(text: &str) -> String {
    text.chars().filter(|&c| c != SOFT_HYPHEN).collect()
}
