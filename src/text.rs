// src/text.rs
//! Text helpers shared by the matcher and the notifier.

use once_cell::sync::OnceCell;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Accent-insensitive, case-folded form used for every text comparison.
///
/// NFD-decomposes, drops combining marks, lowercases and trims.
/// `normalize(normalize(s)) == normalize(s)` holds for every input.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let stripped: String = text.nfd().filter(|c| !is_combining_mark(*c)).collect();
    // Lowercasing can produce new combining sequences (e.g. `İ` → `i̇`), so strip once more.
    let lowered: String = stripped
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    lowered.trim().to_string()
}

/// Strip HTML tags, decode entities and collapse whitespace.
pub fn strip_html(s: &str) -> String {
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)<[^<]+?>").unwrap());
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());

    let no_tags = re_tags.replace_all(s, " ");
    let decoded = html_escape::decode_html_entities(&no_tags);
    re_ws.replace_all(&decoded, " ").trim().to_string()
}

/// Take at most `max` chars, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_accents_and_case() {
        assert_eq!(normalize("  São PAULO → Recife "), "sao paulo → recife");
        assert_eq!(normalize("Promoção AÉREA"), "promocao aerea");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn idempotent_on_tricky_inputs() {
        for s in ["İstanbul", "ÇAÇA", "  Ünïcödé  ", "ß", "e\u{0301}", "✈️ voo"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn strip_html_decodes_and_collapses() {
        let s = "<p>Passagens&nbsp;<b>baratas</b>\n para   Recife</p>";
        assert_eq!(strip_html(s), "Passagens baratas para Recife");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("promoção", 7), "promoçã");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
