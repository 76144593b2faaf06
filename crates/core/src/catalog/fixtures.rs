//! Deterministic demo catalog used when no data file is configured.
//!
//! The set intentionally covers every category the concierge can offer, both
//! gendered storefronts plus unisex pieces, and a spread of optional fields
//! (missing ratings, missing sales counts, missing creation dates) so query
//! edge cases stay exercised.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::product::{Gender, Product, ProductId, ProductStatus};

fn created(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|value| value.with_timezone(&Utc))
}

fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn product(
    id: &str,
    name: &str,
    description: &str,
    price_cents: i64,
    category: &str,
    brand: &str,
    gender: Gender,
    tags: &[&str],
) -> Product {
    Product {
        id: ProductId(id.to_string()),
        name: name.to_string(),
        description: description.to_string(),
        price: price(price_cents),
        original_price: None,
        category: category.to_string(),
        brand: Some(brand.to_string()),
        gender,
        images: vec![format!("/images/products/{id}.jpg")],
        tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        status: Some(ProductStatus::Active),
        average_rating: None,
        total_reviews: None,
        sales_count: None,
        featured: false,
        created_at: None,
    }
}

pub fn demo_products() -> Vec<Product> {
    vec![
        Product {
            average_rating: Some(4.8),
            total_reviews: Some(214),
            sales_count: Some(1_820),
            featured: true,
            created_at: created("2025-02-14T09:00:00Z"),
            ..product(
                "women-lipstick-rouge",
                "Rouge Signature Lipstick",
                "A velvet-matte lipstick in the maison's signature rouge, cast in a \
                 refillable gold case.",
                6_500,
                "Lipstick",
                "Kolzo",
                Gender::Women,
                &["beauty", "matte", "refillable"],
            )
        },
        Product {
            average_rating: Some(4.9),
            total_reviews: Some(96),
            sales_count: Some(410),
            featured: true,
            created_at: created("2025-03-02T09:00:00Z"),
            original_price: Some(price(248_000)),
            ..product(
                "women-handbag-soiree",
                "Soirée Leather Handbag",
                "Hand-stitched calfskin handbag with a sculpted clasp, lined in silk.",
                219_000,
                "Handbag",
                "Kolzo",
                Gender::Women,
                &["leather", "evening", "silk-lined"],
            )
        },
        Product {
            average_rating: Some(4.6),
            total_reviews: Some(58),
            sales_count: Some(260),
            created_at: created("2025-05-20T09:00:00Z"),
            ..product(
                "women-dress-columne",
                "Colonne Silk Dress",
                "A floor-length column dress cut from double silk crepe.",
                98_000,
                "Dress",
                "Kolzo Atelier",
                Gender::Women,
                &["silk", "evening"],
            )
        },
        Product {
            average_rating: Some(4.7),
            total_reviews: Some(131),
            sales_count: Some(540),
            created_at: created("2025-01-28T09:00:00Z"),
            ..product(
                "women-shoes-pump",
                "Opéra Satin Pump",
                "Satin pump on a sculpted 85mm heel, finished with a crystal buckle.",
                79_000,
                "Shoes",
                "Kolzo",
                Gender::Women,
                &["satin", "heels"],
            )
        },
        Product {
            average_rating: Some(4.5),
            total_reviews: Some(44),
            sales_count: Some(170),
            created_at: created("2025-06-09T09:00:00Z"),
            ..product(
                "women-jewelry-riviere",
                "Rivière Diamond Pendant",
                "An 18k white-gold pendant set with a river of brilliants.",
                342_000,
                "Jewelry",
                "Kolzo",
                Gender::Women,
                &["diamond", "white-gold"],
            )
        },
        Product {
            created_at: created("2025-07-15T09:00:00Z"),
            ..product(
                "women-jewelry-halo",
                "Halo Pearl Earrings",
                "Akoya pearls circled in pavé, a quiet counterpoint to the Rivière line.",
                44_000,
                "Jewelry",
                "Kolzo Atelier",
                Gender::Women,
                &["pearl", "earrings"],
            )
        },
        Product {
            average_rating: Some(4.4),
            total_reviews: Some(77),
            sales_count: Some(630),
            created_at: created("2025-02-03T09:00:00Z"),
            ..product(
                "men-shirt-poplin",
                "Poplin Dress Shirt",
                "Two-ply Egyptian cotton poplin with mother-of-pearl buttons.",
                29_000,
                "Shirt",
                "Kolzo",
                Gender::Men,
                &["cotton", "tailoring"],
            )
        },
        Product {
            average_rating: Some(4.3),
            total_reviews: Some(39),
            sales_count: Some(290),
            created_at: created("2025-04-11T09:00:00Z"),
            ..product(
                "men-pants-flannel",
                "Flannel Pleated Trouser",
                "Single-pleat trousers in brushed wool flannel, finished by hand.",
                47_000,
                "Pants",
                "Kolzo Atelier",
                Gender::Men,
                &["wool", "tailoring"],
            )
        },
        Product {
            average_rating: Some(4.8),
            total_reviews: Some(112),
            sales_count: Some(480),
            created_at: created("2025-03-27T09:00:00Z"),
            ..product(
                "men-shoes-derby",
                "Derby Calfskin Shoe",
                "Hand-stitched derby in museum calfskin on a leather sole.",
                84_000,
                "Shoes",
                "Kolzo",
                Gender::Men,
                &["leather", "formal"],
            )
        },
        Product {
            average_rating: Some(4.6),
            total_reviews: Some(68),
            sales_count: Some(720),
            created_at: created("2025-01-19T09:00:00Z"),
            ..product(
                "men-wallet-grain",
                "Grained Leather Wallet",
                "Eight-card wallet in grained leather with a palladium corner.",
                38_000,
                "Wallet",
                "Kolzo",
                Gender::Men,
                &["leather", "small-goods"],
            )
        },
        Product {
            average_rating: Some(4.9),
            total_reviews: Some(25),
            sales_count: Some(90),
            featured: true,
            created_at: created("2025-06-30T09:00:00Z"),
            ..product(
                "men-watch-reserve",
                "Réserve Automatic Watch",
                "A 38mm automatic with a 70-hour power reserve and alligator strap.",
                680_000,
                "Watch",
                "Kolzo",
                Gender::Men,
                &["automatic", "dress-watch"],
            )
        },
        Product {
            average_rating: Some(4.7),
            total_reviews: Some(203),
            sales_count: Some(1_340),
            created_at: created("2025-05-05T09:00:00Z"),
            ..product(
                "unisex-fragrance-nuit",
                "Nuit de Kolzo Eau de Parfum",
                "Iris, vetiver and smoked cedar in a weighted glass flacon.",
                21_000,
                "Fragrance",
                "Kolzo",
                Gender::Unisex,
                &["fragrance", "iris"],
            )
        },
        product(
            "unisex-scarf-twill",
            "Silk Twill Scarf",
            "Ninety-centimetre silk twill square, hand-rolled edges.",
            36_000,
            "Scarf",
            "Kolzo Atelier",
            Gender::Unisex,
            &["silk", "printed"],
        ),
        Product {
            average_rating: Some(4.2),
            total_reviews: Some(18),
            sales_count: Some(140),
            created_at: created("2025-07-01T09:00:00Z"),
            ..product(
                "women-shoes-ballet",
                "Ballet Leather Flat",
                "Quilted leather ballet flat with a grosgrain bow.",
                42_000,
                "Shoes",
                "Kolzo Atelier",
                Gender::Women,
                &["leather", "flats"],
            )
        },
    ]
}
