// tests/notify_format.rs
use chrono::{TimeZone, Utc};
use promo_alerts::deal::{DealQuality, MarketRating};
use promo_alerts::model::{DealAnalysis, MilesAlternative};
use promo_alerts::notify::{format_no_results, format_summary};
use promo_alerts::Post;

fn post(feed: &str, n: usize) -> Post {
    Post {
        id: format!("{feed}:{n}"),
        feed_name: feed.to_string(),
        title: format!("Passagens para Recife #{n}"),
        link: format!("https://{feed}.example.com/{n}"),
        summary: String::new(),
        published_at: None,
        discovered_at: Utc::now(),
        price_analysis: None,
    }
}

#[test]
fn summary_caps_per_feed_and_total() {
    let now = Utc.with_ymd_and_hms(2025, 9, 6, 8, 5, 0).unwrap();
    // 3 feeds x 4 posts, interleaved so feed order is a, b, c.
    let mut posts = Vec::new();
    for n in 0..4 {
        for feed in ["a", "b", "c"] {
            posts.push(post(feed, n));
        }
    }

    let msg = format_summary(&posts, &now).expect("non-empty run");
    assert!(msg.starts_with("🔥 *NOVAS PROMOÇÕES ENCONTRADAS!*"));
    assert_eq!(msg.matches("📝 ").count(), 6);
    assert!(msg.contains("[Passagens para Recife #1](https://a.example.com/1)"));
    assert!(!msg.contains("https://a.example.com/2"));

    let a = msg.find("📰 *a*").unwrap();
    let b = msg.find("📰 *b*").unwrap();
    let c = msg.find("📰 *c*").unwrap();
    assert!(a < b && b < c);

    assert!(msg.contains("... e mais 6 promoções!"));
    assert!(msg.contains("📊 *Total:* 12 novas promoções"));
    assert!(msg.ends_with("⏰ *Detectado em:* 08:05 - 06/09/2025"));
}

#[test]
fn summary_stops_at_eight_posts() {
    let now = Utc::now();
    let posts: Vec<_> = (0..6)
        .flat_map(|f| (0..2).map(move |n| post(&format!("f{f}"), n)))
        .collect();
    let msg = format_summary(&posts, &now).unwrap();
    assert_eq!(msg.matches("📝 ").count(), 8);
    assert!(!msg.contains("📰 *f4*"));
    assert!(msg.contains("... e mais 4 promoções!"));
}

#[test]
fn priced_posts_show_the_deal_line() {
    let mut p = post("a", 1);
    p.price_analysis = Some(DealAnalysis {
        market_price_brl: 600.0,
        market_price_rating: MarketRating::Regular,
        promo_price_brl: Some(399.0),
        savings_vs_market: Some(201.0),
        discount_percentage: Some(33.5),
        is_good_deal: Some(true),
        deal_quality: Some(DealQuality::Excellent),
        miles_alternative: Some(MilesAlternative {
            best_program: "TudoAzul (Azul)".into(),
            estimated_miles: 12_000,
            worth_using_miles: true,
        }),
    });
    let msg = format_summary(&[p], &Utc::now()).unwrap();
    assert!(msg.contains("💰 R$ 399 vs mercado R$ 600 (33.5%, EXCELLENT) · TudoAzul (Azul) 12000 pts"));
}

#[test]
fn no_results_message_reports_counts() {
    let now = Utc.with_ymd_and_hms(2025, 9, 6, 21, 40, 0).unwrap();
    let msg = format_no_results(14, 14, &now);
    assert!(msg.contains("• 14 posts analisados"));
    assert!(msg.contains("• 14 posts rejeitados"));
    assert!(msg.ends_with("Verificado em: 21:40 - 06/09/2025"));
}
