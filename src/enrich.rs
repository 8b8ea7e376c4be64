// src/enrich.rs
//! Fare enrichment for admitted posts.

use crate::deal;
use crate::mileage::{self, MileageProgram};
use crate::model::{DealAnalysis, MarketPriceSnapshot, MilesAlternative, Post};
use crate::price::extract_price;

/// Build the deal analysis for `post` against `market`.
///
/// Without a readable promo price only the market fields are filled in.
pub fn analyze(
    post: &Post,
    market: &MarketPriceSnapshot,
    programs: &[MileageProgram],
) -> DealAnalysis {
    let promo = extract_price(&post.text());
    analyze_price(promo, market, programs)
}

pub fn analyze_price(
    promo: Option<f64>,
    market: &MarketPriceSnapshot,
    programs: &[MileageProgram],
) -> DealAnalysis {
    let market_price = market.cheapest_price_brl;
    let mut analysis = DealAnalysis {
        market_price_brl: market_price,
        market_price_rating: market.price_rating,
        promo_price_brl: promo,
        savings_vs_market: None,
        discount_percentage: None,
        is_good_deal: None,
        deal_quality: None,
        miles_alternative: None,
    };

    let Some(promo) = promo else {
        return analysis;
    };

    let s = deal::score(promo, market_price);
    analysis.savings_vs_market = Some(s.savings);
    analysis.discount_percentage = Some(s.discount_pct);
    analysis.is_good_deal = Some(s.is_good_deal);
    analysis.deal_quality = Some(s.quality);

    let estimate = mileage::estimate(promo, programs);
    analysis.miles_alternative = estimate.best_quote().map(|q| MilesAlternative {
        best_program: q.program.clone(),
        estimated_miles: q.estimated_points,
        worth_using_miles: q.worth_using_points,
    });
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{DealQuality, MarketRating};
    use crate::mileage::builtin_programs;
    use chrono::Utc;

    fn market(price: f64) -> MarketPriceSnapshot {
        MarketPriceSnapshot {
            cheapest_price_brl: price,
            price_rating: deal::rate_market_price(price),
            timestamp: Utc::now(),
            best_origin: Some("GRU".into()),
            airline: Some("G3".into()),
        }
    }

    #[test]
    fn without_promo_only_market_fields() {
        let a = analyze_price(None, &market(520.0), &builtin_programs());
        assert_eq!(a.market_price_brl, 520.0);
        assert_eq!(a.market_price_rating, MarketRating::Regular);
        assert!(!a.has_promotion_price());
        assert!(a.deal_quality.is_none());
        assert!(a.miles_alternative.is_none());
    }

    #[test]
    fn with_promo_scores_and_quotes_miles() {
        let a = analyze_price(Some(399.0), &market(650.0), &builtin_programs());
        assert_eq!(a.savings_vs_market, Some(251.0));
        assert_eq!(a.discount_percentage, Some(38.6));
        assert_eq!(a.is_good_deal, Some(true));
        assert_eq!(a.deal_quality, Some(DealQuality::Excellent));
        let miles = a.miles_alternative.unwrap();
        assert_eq!(miles.best_program, "TudoAzul (Azul)");
        assert_eq!(miles.estimated_miles, 12_000);
        assert!(miles.worth_using_miles);
    }

    #[test]
    fn empty_program_table_skips_miles() {
        let a = analyze_price(Some(300.0), &market(400.0), &[]);
        assert!(a.deal_quality.is_some());
        assert!(a.miles_alternative.is_none());
    }
}
