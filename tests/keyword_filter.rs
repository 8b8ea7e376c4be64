// tests/keyword_filter.rs
// Relevance gate and rule predicates against an inline filters config.

use chrono::Utc;
use promo_alerts::config::FilterConfig;
use promo_alerts::rules::{
    airline_matches, is_corridor_flight_post, keyword_matches, price_matches, route_matches,
};
use promo_alerts::{Post, RelevanceFilter};

const TEST_TOML: &str = r#"
enabled = true

[routes]
enabled = true
include = ["São Paulo -> Recife"]
exclude = ["Recife"]

[keywords]
enabled = true
miles_keywords = ["milhas", "smiles"]

[price]
enabled = true
domestic_max = 800.0
international_max = 2500.0

[airlines]
enabled = true
include = ["Azul", "GOL"]
exclude = ["TAP"]

[advanced]
log_rejected_posts = true
"#;

fn cfg() -> FilterConfig {
    FilterConfig::from_toml_str(TEST_TOML).expect("valid test config")
}

fn post(title: &str, summary: &str) -> Post {
    Post {
        id: format!("Test:{title}"),
        feed_name: "Test".into(),
        title: title.into(),
        link: "https://example.com".into(),
        summary: summary.into(),
        published_at: None,
        discovered_at: Utc::now(),
        price_analysis: None,
    }
}

#[test]
fn recife_with_travel_term_is_admitted() {
    let cfg = cfg();
    let mut f = RelevanceFilter::new(&cfg);
    assert!(f.admit(&post("Promoção de passagem para Recife", "")));
}

#[test]
fn travel_term_without_destination_is_rejected() {
    let cfg = cfg();
    let mut f = RelevanceFilter::new(&cfg);
    assert!(!f.admit(&post("Promoção de passagem para Salvador", "")));
}

#[test]
fn destination_without_travel_term_is_rejected() {
    let cfg = cfg();
    let mut f = RelevanceFilter::new(&cfg);
    assert!(!f.admit(&post("Recife é linda", "")));
}

#[test]
fn miles_keyword_counts_as_travel_term() {
    let cfg = cfg();
    assert!(keyword_matches("Compre milhas com bônus e vá a Pernambuco", &cfg));
}

#[test]
fn bounded_codes_need_separators() {
    let cfg = cfg();
    assert!(keyword_matches("Voos GRU-REC em julho", &cfg));
    assert!(keyword_matches("Passagens baratas para PE", &cfg));
    // "pe" inside a word is not the state code.
    assert!(!keyword_matches("Passagens para Peru", &cfg));
}

#[test]
fn pe_next_to_a_hyphen_is_not_the_state_code() {
    let cfg = cfg();
    assert!(!keyword_matches("Dicas de viagem: monte seu pé-de-meia", &cfg));
    assert!(!keyword_matches("Passagem barata: pe-de-moleque", &cfg));
    // The hyphen rule still applies to "rec", and compounds still count.
    assert!(keyword_matches("Passagens REC-SP em promoção", &cfg));
    assert!(keyword_matches("Voos SP-PE no feriado", &cfg));
}

#[test]
fn admit_ignores_route_price_and_airline() {
    let cfg = cfg();
    let mut f = RelevanceFilter::new(&cfg);
    // Fails route (no São Paulo), price (over cap) and airline (no Azul/GOL).
    let p = post("Passagem para Recife por R$ 1.999", "");
    let v = f.verdict(&p);
    assert!(v.keyword);
    assert!(!v.route && !v.price && !v.airline);
    assert!(!v.all());
    assert!(f.admit(&p));
}

#[test]
fn disabled_filtering_admits_everything() {
    let cfg = FilterConfig::default();
    let mut f = RelevanceFilter::new(&cfg);
    assert!(f.admit(&post("Qualquer coisa", "")));
}

#[test]
fn rejections_are_counted_per_feed() {
    let cfg = cfg();
    let mut f = RelevanceFilter::new(&cfg);
    for i in 0..6 {
        assert!(!f.admit(&post(&format!("Notícia {i}"), "")));
    }
    // Counting stops after the summary line.
    assert_eq!(f.rejections().count("Test"), 4);
    assert_eq!(f.rejections().count("Other"), 0);
}

#[test]
fn route_include_short_circuits_exclude() {
    let cfg = cfg();
    // Only "Recife": the pair entry needs both ends, and exclude is never consulted.
    assert!(!route_matches("Voos baratos para Recife", &cfg.routes));
    assert!(route_matches("De São Paulo para Recife", &cfg.routes));
}

#[test]
fn route_exclude_applies_without_include() {
    let mut cfg = cfg();
    cfg.routes.include.clear();
    assert!(!route_matches("Voos para Recife", &cfg.routes));
    assert!(route_matches("Voos para Natal", &cfg.routes));
}

#[test]
fn price_threshold_is_inclusive() {
    let cfg = cfg();
    assert!(price_matches("Voo por R$ 799", &cfg));
    assert!(price_matches("Voo por R$ 800", &cfg));
    assert!(!price_matches("Voo por R$ 801", &cfg));
    assert!(price_matches("Voo sem preço divulgado", &cfg));
}

#[test]
fn international_posts_use_the_higher_cap() {
    let cfg = cfg();
    assert!(price_matches("Passagem para Paris por R$ 2.400", &cfg));
    assert!(!price_matches("Passagem para Recife por R$ 2.400", &cfg));
}

#[test]
fn airline_include_then_exclude() {
    let cfg = cfg();
    assert!(airline_matches("Promo Azul para Recife", &cfg.airlines));
    assert!(!airline_matches("Promo LATAM para Recife", &cfg.airlines));
    assert!(!airline_matches("GOL e TAP em promoção", &cfg.airlines));
}

#[test]
fn corridor_gate_requires_both_sides() {
    let cfg = cfg();
    assert!(is_corridor_flight_post("Passagens para Recife em agosto", &cfg.tables));
    assert!(!is_corridor_flight_post("Hotéis em Recife", &cfg.tables));
    assert!(!is_corridor_flight_post("Passagens para Salvador", &cfg.tables));
}
