//! "You may also like" scoring for product pages.

use rust_decimal::Decimal;

use crate::domain::product::Product;

const SAME_CATEGORY_WEIGHT: u32 = 2;
const SAME_BRAND_WEIGHT: u32 = 1;
const PRICE_BAND_WEIGHT: u32 = 1;

fn price_band() -> Decimal {
    Decimal::from(50)
}

/// Scores every other product against `product` and returns the top `limit`
/// by descending score. The product itself is always excluded; score ties
/// keep the catalog's original relative order (stable sort).
pub fn related_products(product: &Product, all: &[Product], limit: usize) -> Vec<Product> {
    let mut scored: Vec<(u32, &Product)> = all
        .iter()
        .filter(|candidate| candidate.id != product.id)
        .map(|candidate| (relevance_score(product, candidate), candidate))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, candidate)| candidate.clone()).collect()
}

fn relevance_score(product: &Product, candidate: &Product) -> u32 {
    let mut score = 0;
    if candidate.category.eq_ignore_ascii_case(&product.category) {
        score += SAME_CATEGORY_WEIGHT;
    }
    if let (Some(brand), Some(candidate_brand)) = (&product.brand, &candidate.brand) {
        if brand.eq_ignore_ascii_case(candidate_brand) {
            score += SAME_BRAND_WEIGHT;
        }
    }
    if (candidate.price - product.price).abs() < price_band() {
        score += PRICE_BAND_WEIGHT;
    }
    score
}
