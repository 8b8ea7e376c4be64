// src/rules.rs
//! Rule predicates over a post's text (title + summary).
//!
//! Each predicate passes when its config section is disabled. They are independent
//! building blocks; `relevance` decides which ones feed the admit decision.

use crate::config::{AirlinesSection, FilterConfig, MatchTables, RoutesSection};
use crate::price::extract_price;
use crate::text::normalize;

/// Outcome of every predicate for one text, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub route: bool,
    pub keyword: bool,
    pub price: bool,
    pub airline: bool,
}

impl Verdict {
    pub fn all(&self) -> bool {
        self.route && self.keyword && self.price && self.airline
    }
}

pub fn evaluate_all(text: &str, cfg: &FilterConfig) -> Verdict {
    Verdict {
        route: route_matches(text, &cfg.routes),
        keyword: keyword_matches(text, cfg),
        price: price_matches(text, cfg),
        airline: airline_matches(text, &cfg.airlines),
    }
}

/// Include list is a whitelist gate: when non-empty, the text must mention one entry
/// and the exclude list is not consulted. Otherwise any excluded entry rejects.
pub fn route_matches(text: &str, routes: &RoutesSection) -> bool {
    if !routes.enabled {
        return true;
    }
    let normalized = normalize(text);

    if !routes.include.is_empty() {
        return routes
            .include
            .iter()
            .any(|r| r.is_mentioned_in(&normalized));
    }

    !routes
        .exclude
        .iter()
        .any(|r| r.is_mentioned_in(&normalized))
}

/// Destination indicator AND (travel vocabulary OR a mileage keyword).
pub fn keyword_matches(text: &str, cfg: &FilterConfig) -> bool {
    if !cfg.keywords.enabled {
        return true;
    }
    let normalized = normalize(text);
    let tables = &cfg.tables;

    if !mentions_destination(&normalized, tables) {
        return false;
    }
    let has_travel = tables
        .travel_terms
        .iter()
        .any(|t| normalized.contains(t.as_str()));
    // Keywords may come from a config that skipped `prepared()`.
    let has_miles = cfg.keywords.miles_keywords.iter().any(|k| {
        let k = normalize(k);
        !k.is_empty() && normalized.contains(k.as_str())
    });
    has_travel || has_miles
}

/// Recife/PE/REC indicator on already normalized text.
pub fn mentions_destination(normalized: &str, tables: &MatchTables) -> bool {
    tables
        .destination_names
        .iter()
        .any(|n| normalized.contains(n.as_str()))
        || tables
            .destination_codes
            .iter()
            .any(|c| contains_word(normalized, c))
        || tables
            .destination_hyphen_codes
            .iter()
            .any(|c| contains_bounded(normalized, c))
        || tables
            .destination_compounds
            .iter()
            .any(|c| normalized.contains(c.as_str()))
}

/// Fail-open when no price is found; otherwise the price must not exceed the cap
/// for its class (international vs. domestic).
pub fn price_matches(text: &str, cfg: &FilterConfig) -> bool {
    if !cfg.price.enabled {
        return true;
    }
    let Some(price) = extract_price(text) else {
        return true;
    };
    let max = if is_international(text, &cfg.tables) {
        cfg.price.international_max
    } else {
        cfg.price.domestic_max
    };
    price <= max
}

pub fn is_international(text: &str, tables: &MatchTables) -> bool {
    let normalized = normalize(text);
    tables
        .international_terms
        .iter()
        .any(|t| normalized.contains(t.as_str()))
}

/// Include gate (any listed airline must appear), then exclude (none may appear).
pub fn airline_matches(text: &str, airlines: &AirlinesSection) -> bool {
    if !airlines.enabled {
        return true;
    }
    let lowered = text.to_lowercase();
    let mentions = |name: &String| {
        let n = name.trim().to_lowercase();
        !n.is_empty() && lowered.contains(&n)
    };

    if !airlines.include.is_empty() && !airlines.include.iter().any(mentions) {
        return false;
    }
    !airlines.exclude.iter().any(mentions)
}

/// Narrow "flights to the destination" check run before fare enrichment.
///
/// Corridor indicators may carry significant padding (`" pe "`), so they are matched
/// against the unpadded normalized text, as written.
pub fn is_corridor_flight_post(text: &str, tables: &MatchTables) -> bool {
    let normalized = normalize(text);
    let indicator = tables
        .corridor_indicators
        .iter()
        .any(|t| normalized.contains(t.as_str()));
    indicator
        && tables
            .corridor_flight_terms
            .iter()
            .any(|t| normalized.contains(t.as_str()))
}

/// True if `token` occurs in `text` as a whole word: whitespace or the text edge on
/// both sides. "pe" in "pe-de-meia" does not count.
pub fn contains_word(text: &str, token: &str) -> bool {
    occurs_between(text, token, |c| c.is_whitespace())
}

/// Like [`contains_word`], but a hyphen also bounds the token ("gru-rec", "rec-sp").
pub fn contains_bounded(text: &str, token: &str) -> bool {
    occurs_between(text, token, |c| c.is_whitespace() || c == '-')
}

fn occurs_between(text: &str, token: &str, boundary: impl Fn(char) -> bool) -> bool {
    if token.is_empty() {
        return false;
    }
    let is_edge = |c: Option<char>| c.map_or(true, &boundary);
    text.match_indices(token).any(|(start, m)| {
        let before = text[..start].chars().next_back();
        let after = text[start + m.len()..].chars().next();
        is_edge(before) && is_edge(after)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KeywordsSection, PriceSection, RouteSpec};

    fn keyword_cfg(miles: &[&str]) -> FilterConfig {
        FilterConfig {
            enabled: true,
            keywords: KeywordsSection {
                enabled: true,
                miles_keywords: miles.iter().map(|s| s.to_string()).collect(),
            },
            ..FilterConfig::default()
        }
        .prepared()
    }

    #[test]
    fn bounded_tokens() {
        assert!(contains_bounded("voo gru-rec hoje", "rec"));
        assert!(contains_bounded("rec", "rec"));
        assert!(contains_bounded("ida para pe", "pe"));
        assert!(contains_word("ida para pe", "pe"));
        assert!(contains_word("pe no feriado", "pe"));
        assert!(!contains_word("pe-de-meia", "pe"));
        assert!(!contains_word("sp-pe", "pe"));
        assert!(!contains_bounded("recorde de vendas", "rec"));
        assert!(!contains_bounded("pessoas no pelourinho", "pe"));
        assert!(!contains_bounded("abc", ""));
    }

    #[test]
    fn keyword_needs_destination_and_travel() {
        let cfg = keyword_cfg(&[]);
        assert!(keyword_matches("Promoção de passagem para Recife", &cfg));
        assert!(!keyword_matches("Promoção de passagem para Salvador", &cfg));
        assert!(!keyword_matches("Recife é linda", &cfg));
    }

    #[test]
    fn keyword_accepts_codes_and_compounds() {
        let cfg = keyword_cfg(&[]);
        assert!(keyword_matches("Voos SP-REC em oferta", &cfg));
        assert!(keyword_matches("Passagens GRU REC a partir de R$ 300", &cfg));
        assert!(keyword_matches("Viagem rumo PE no feriado", &cfg));
        assert!(!keyword_matches("Passagens com recorde de pessoas", &cfg));
    }

    #[test]
    fn keyword_accepts_miles_terms_instead_of_travel() {
        let cfg = keyword_cfg(&["milhas", "Smiles"]);
        assert!(keyword_matches("Resgate com milhas para Recife", &cfg));
        assert!(!keyword_matches("Resgate com pontos para Recife", &cfg));
    }

    #[test]
    fn miles_keywords_match_without_prepared() {
        let cfg = FilterConfig {
            enabled: true,
            keywords: KeywordsSection {
                enabled: true,
                miles_keywords: vec!["Milhas".into(), "  ".into()],
            },
            ..FilterConfig::default()
        };
        assert!(keyword_matches("Resgate com milhas para Recife", &cfg));
        assert!(!keyword_matches("Resgate com pontos para Recife", &cfg));
    }

    #[test]
    fn disabled_sections_pass() {
        let cfg = FilterConfig::default();
        assert!(keyword_matches("nada a ver", &cfg));
        assert!(route_matches("nada a ver", &cfg.routes));
        assert!(price_matches("R$ 99.999,00", &cfg));
        assert!(airline_matches("nada", &cfg.airlines));
        assert!(evaluate_all("nada", &cfg).all());
    }

    #[test]
    fn route_include_short_circuits_exclude() {
        let routes = RoutesSection {
            enabled: true,
            include: vec![RouteSpec::parse("São Paulo -> Recife")],
            exclude: vec![RouteSpec::parse("Salvador")],
        };
        assert!(!route_matches("Passagens para Recife", &routes));
        assert!(route_matches("Sao Paulo para Recife e Salvador", &routes));
    }

    #[test]
    fn route_exclude_when_no_include() {
        let routes = RoutesSection {
            enabled: true,
            include: vec![],
            exclude: vec![RouteSpec::parse("Rio -> Lisboa"), RouteSpec::parse("Orlando")],
        };
        assert!(!route_matches("Voos Rio para Lisboa", &routes));
        assert!(!route_matches("Parques de Orlando", &routes));
        assert!(route_matches("Voos Rio para Recife", &routes));
    }

    #[test]
    fn price_threshold_by_class() {
        let cfg = FilterConfig {
            price: PriceSection {
                enabled: true,
                domestic_max: 800.0,
                international_max: 2500.0,
            },
            ..FilterConfig::default()
        }
        .prepared();
        assert!(price_matches("Recife por R$ 799", &cfg));
        assert!(price_matches("Recife por R$ 800", &cfg));
        assert!(!price_matches("Recife por R$ 801", &cfg));
        assert!(price_matches("Europa por R$ 2.400", &cfg));
        assert!(!price_matches("Paris por R$ 2.600", &cfg));
        assert!(price_matches("Sem preço no texto", &cfg));
    }

    #[test]
    fn airline_include_then_exclude() {
        let airlines = AirlinesSection {
            enabled: true,
            include: vec!["Azul".into(), "GOL".into()],
            exclude: vec!["Latam".into()],
        };
        assert!(airline_matches("Promo da azul", &airlines));
        assert!(!airline_matches("Promo da TAP", &airlines));
        assert!(!airline_matches("Gol e LATAM em guerra de preços", &airlines));

        let only_exclude = AirlinesSection {
            enabled: true,
            include: vec![],
            exclude: vec!["latam".into()],
        };
        assert!(airline_matches("Promo da TAP", &only_exclude));
        assert!(!airline_matches("LATAM pass", &only_exclude));
    }

    #[test]
    fn corridor_gate_needs_flight_terms() {
        let t = MatchTables::default().normalized();
        assert!(is_corridor_flight_post("Passagens para Recife", &t));
        assert!(is_corridor_flight_post("Voos aéreos GRU-REC", &t));
        assert!(!is_corridor_flight_post("Hotel em Recife", &t));
        assert!(!is_corridor_flight_post("Passagens para Natal", &t));
    }
}
