// src/price.rs
//! Brazilian-locale price extraction (`R$ 1.234,56`).

use once_cell::sync::Lazy;
use regex::Regex;

// Thousands separator `.`, decimal separator `,`.
const BRL_AMOUNT: &str = r"(\d{1,3}(?:\.\d{3})*(?:,\d{2})?)";

/// Tried in order; the first pattern with any match wins.
static PRICE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"(?i)R\$\s*{BRL_AMOUNT}"),
        format!(r"(?i){BRL_AMOUNT}\s*reais"),
        format!(r"(?i)por\s*R\$\s*{BRL_AMOUNT}"),
        format!(r"(?i)partir\s+de\s*R\$\s*{BRL_AMOUNT}"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("price regex"))
    .collect()
});

/// Extract the first price mentioned in `text`, in BRL.
///
/// Returns `None` when nothing matches or the matched amount does not parse.
pub fn extract_price(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    for re in PRICE_PATTERNS.iter() {
        let Some(caps) = re.captures(text) else {
            continue;
        };
        if let Some(v) = caps.get(1).and_then(|m| parse_brl(m.as_str())) {
            return Some(v);
        }
    }
    None
}

/// Convert `1.234,56` into `1234.56`.
pub fn parse_brl(raw: &str) -> Option<f64> {
    let standard = raw.trim().replace('.', "").replace(',', ".");
    standard.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_symbol_with_thousands() {
        assert_eq!(extract_price("R$ 1.234,56"), Some(1234.56));
        assert_eq!(extract_price("r$99"), Some(99.0));
    }

    #[test]
    fn reais_suffix() {
        assert_eq!(extract_price("Voo por 349,90 reais ida e volta"), Some(349.90));
    }

    #[test]
    fn first_match_in_document_order() {
        let t = "De R$ 899,00 por R$ 459,00";
        assert_eq!(extract_price(t), Some(899.0));
    }

    #[test]
    fn symbol_pattern_beats_reais_pattern() {
        // "reais" appears first in the text but the R$ pattern is tried first.
        let t = "Economize 100 reais: passagens a R$ 250";
        assert_eq!(extract_price(t), Some(250.0));
    }

    #[test]
    fn none_without_price() {
        assert_eq!(extract_price("no price here"), None);
        assert_eq!(extract_price(""), None);
    }

    #[test]
    fn parse_brl_handles_plain_and_grouped() {
        assert_eq!(parse_brl("12.345"), Some(12345.0));
        assert_eq!(parse_brl("0,99"), Some(0.99));
        assert_eq!(parse_brl("abc"), None);
    }
}
