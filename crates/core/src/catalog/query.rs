use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Gender, Product, ProductStatus};

/// Per-query filter criteria. Every omitted option imposes no constraint;
/// supplied options combine with logical AND.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterOptions {
    pub category: Option<String>,
    pub gender: Option<Gender>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<f64>,
    pub brand: Option<String>,
    pub status: Option<ProductStatus>,
    pub featured: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Price,
    Rating,
    CreatedAt,
    SalesCount,
}

impl SortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "rating" => Some(Self::Rating),
            "created_at" | "newest" => Some(Self::CreatedAt),
            "sales_count" | "bestselling" => Some(Self::SalesCount),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOptions {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Free-text search. An empty or whitespace-only query returns the input
/// unchanged. Matching is case-insensitive substring containment, no
/// stemming and no ranking beyond inclusion: a product matches when the
/// combined name+description+category+brand+tags text contains the full
/// query, when every token appears somewhere in that text, or when any
/// single token appears in the name or description alone.
pub fn search(products: &[Product], query: &str) -> Vec<Product> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return products.to_vec();
    }

    let needle = trimmed.to_lowercase();
    let tokens: Vec<&str> = needle.split_whitespace().collect();

    products.iter().filter(|product| matches_query(product, &needle, &tokens)).cloned().collect()
}

fn combined_text(product: &Product) -> String {
    let mut text = String::new();
    for part in [&product.name, &product.description, &product.category] {
        text.push_str(&part.to_lowercase());
        text.push(' ');
    }
    if let Some(brand) = &product.brand {
        text.push_str(&brand.to_lowercase());
        text.push(' ');
    }
    for tag in &product.tags {
        text.push_str(&tag.to_lowercase());
        text.push(' ');
    }
    text
}

fn matches_query(product: &Product, needle: &str, tokens: &[&str]) -> bool {
    let text = combined_text(product);
    if text.contains(needle) {
        return true;
    }
    if tokens.iter().all(|token| text.contains(token)) {
        return true;
    }

    let name = product.name.to_lowercase();
    let description = product.description.to_lowercase();
    tokens.iter().any(|token| name.contains(token) || description.contains(token))
}

/// Multi-field filter; see [`FilterOptions`]. With no options supplied the
/// input comes back unchanged.
pub fn filter(products: &[Product], options: &FilterOptions) -> Vec<Product> {
    products.iter().filter(|product| matches_filter(product, options)).cloned().collect()
}

fn matches_filter(product: &Product, options: &FilterOptions) -> bool {
    if let Some(category) = &options.category {
        if !product.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }
    if let Some(gender) = options.gender {
        if product.gender != gender && product.gender != Gender::Unisex {
            return false;
        }
    }
    if let Some(min_price) = options.min_price {
        if product.price < min_price {
            return false;
        }
    }
    if let Some(max_price) = options.max_price {
        if product.price > max_price {
            return false;
        }
    }
    if let Some(min_rating) = options.min_rating {
        // Unrated products never clear a rating threshold.
        match product.average_rating {
            Some(rating) if rating >= min_rating => {}
            _ => return false,
        }
    }
    if let Some(brand) = &options.brand {
        match &product.brand {
            Some(product_brand) if product_brand.eq_ignore_ascii_case(brand) => {}
            _ => return false,
        }
    }
    if let Some(status) = options.status {
        if product.status != Some(status) {
            return false;
        }
    }
    if let Some(featured) = options.featured {
        if product.featured != featured {
            return false;
        }
    }
    true
}

/// Sorted copy of the input; the input slice is never modified. The
/// underlying sort is stable, so equal keys keep their original relative
/// order and repeated calls are deterministic.
pub fn sort(products: &[Product], options: &SortOptions) -> Vec<Product> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_by_field(a, b, options.field);
        match options.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare_by_field(a: &Product, b: &Product, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Price => a.price.cmp(&b.price),
        SortField::Rating => rating_key(a)
            .partial_cmp(&rating_key(b))
            .unwrap_or(Ordering::Equal),
        SortField::CreatedAt => created_key(a).cmp(&created_key(b)),
        SortField::SalesCount => sales_key(a).cmp(&sales_key(b)),
    }
}

fn rating_key(product: &Product) -> f64 {
    product.average_rating.unwrap_or(0.0)
}

fn created_key(product: &Product) -> DateTime<Utc> {
    product.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn sales_key(product: &Product) -> u32 {
    product.sales_count.unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{filter, search, sort, FilterOptions, SortDirection, SortField, SortOptions};
    use crate::catalog::fixtures::demo_products;
    use crate::domain::product::Gender;

    #[test]
    fn empty_query_is_identity() {
        let products = demo_products();
        assert_eq!(search(&products, ""), products);
        assert_eq!(search(&products, "   "), products);
    }

    #[test]
    fn search_is_case_insensitive() {
        let products = demo_products();
        assert_eq!(search(&products, "KOLZO"), search(&products, "kolzo"));
        assert!(!search(&products, "SILK").is_empty());
    }

    #[test]
    fn search_matches_across_combined_fields() {
        let products = demo_products();

        // "leather wallet": both tokens appear across fields of the wallet.
        let hits = search(&products, "leather wallet");
        assert!(hits.iter().any(|p| p.id.0 == "men-wallet-grain"));

        // A single token that only appears in a description still matches.
        let description_hits = search(&products, "hand-stitched");
        assert!(!description_hits.is_empty());
    }

    #[test]
    fn search_with_no_matches_is_empty() {
        let products = demo_products();
        assert!(search(&products, "submarine").is_empty());
    }

    #[test]
    fn filter_with_no_options_is_identity() {
        let products = demo_products();
        assert_eq!(filter(&products, &FilterOptions::default()), products);
    }

    #[test]
    fn filter_criteria_combine_with_and() {
        let products = demo_products();
        let options = FilterOptions {
            gender: Some(Gender::Women),
            max_price: Some(Decimal::from(500)),
            ..FilterOptions::default()
        };

        let hits = filter(&products, &options);
        assert!(!hits.is_empty());
        for product in &hits {
            assert!(matches!(product.gender, Gender::Women | Gender::Unisex));
            assert!(product.price <= Decimal::from(500));
        }
    }

    #[test]
    fn gender_filter_admits_unisex() {
        let products = demo_products();
        let options =
            FilterOptions { gender: Some(Gender::Men), ..FilterOptions::default() };

        let hits = filter(&products, &options);
        assert!(hits.iter().any(|p| p.gender == Gender::Unisex));
        assert!(hits.iter().all(|p| p.gender != Gender::Women));
    }

    #[test]
    fn rating_threshold_excludes_unrated_products() {
        let products = demo_products();
        let options = FilterOptions { min_rating: Some(4.0), ..FilterOptions::default() };

        for product in filter(&products, &options) {
            assert!(product.average_rating.expect("only rated products pass") >= 4.0);
        }
    }

    #[test]
    fn category_and_brand_match_case_insensitively() {
        let products = demo_products();
        let options = FilterOptions {
            category: Some("handbag".to_string()),
            brand: Some("kolzo".to_string()),
            ..FilterOptions::default()
        };

        assert!(!filter(&products, &options).is_empty());
    }

    #[test]
    fn price_sort_is_monotonic_and_non_mutating() {
        let products = demo_products();
        let before = products.clone();

        let ascending = sort(
            &products,
            &SortOptions { field: SortField::Price, direction: SortDirection::Asc },
        );
        assert_eq!(products, before, "sort must not mutate its input");
        for pair in ascending.windows(2) {
            assert!(pair[0].price <= pair[1].price);
        }

        let descending = sort(
            &products,
            &SortOptions { field: SortField::Price, direction: SortDirection::Desc },
        );
        for pair in descending.windows(2) {
            assert!(pair[0].price >= pair[1].price);
        }
    }

    #[test]
    fn name_sort_ignores_case() {
        let products = demo_products();
        let sorted = sort(
            &products,
            &SortOptions { field: SortField::Name, direction: SortDirection::Asc },
        );
        for pair in sorted.windows(2) {
            assert!(pair[0].name.to_lowercase() <= pair[1].name.to_lowercase());
        }
    }

    #[test]
    fn missing_sort_keys_fall_back_to_zero_values() {
        let products = demo_products();

        let by_rating = sort(
            &products,
            &SortOptions { field: SortField::Rating, direction: SortDirection::Asc },
        );
        assert!(by_rating.first().expect("non-empty").average_rating.is_none());

        let by_sales = sort(
            &products,
            &SortOptions { field: SortField::SalesCount, direction: SortDirection::Desc },
        );
        for pair in by_sales.windows(2) {
            assert!(pair[0].sales_count.unwrap_or(0) >= pair[1].sales_count.unwrap_or(0));
        }
    }

    #[test]
    fn sort_is_deterministic_across_calls() {
        let products = demo_products();
        let options = SortOptions { field: SortField::Rating, direction: SortDirection::Desc };
        assert_eq!(sort(&products, &options), sort(&products, &options));
    }

    #[test]
    fn sort_field_parse_accepts_storefront_aliases() {
        assert_eq!(SortField::parse("newest"), Some(SortField::CreatedAt));
        assert_eq!(SortField::parse("bestselling"), Some(SortField::SalesCount));
        assert_eq!(SortField::parse("PRICE"), Some(SortField::Price));
        assert_eq!(SortField::parse("unknown"), None);
    }
}
