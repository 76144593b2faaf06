use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::fixtures;
use crate::domain::product::Product;

/// A record dropped while building a snapshot, kept so callers can log what
/// was left out instead of silently shrinking the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub id: String,
    pub reason: String,
}

/// The read-only catalog loaded at startup. Snapshot invariants: every price
/// is zero or greater and every id is unique; records violating either are
/// rejected at construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogSnapshot {
    products: Vec<Product>,
}

impl CatalogSnapshot {
    pub fn from_records(records: Vec<Product>) -> (Self, Vec<RejectedRecord>) {
        let mut seen: HashSet<String> = HashSet::new();
        let mut products = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            if record.price < Decimal::ZERO {
                rejected.push(RejectedRecord {
                    index,
                    id: record.id.0.clone(),
                    reason: "price must be zero or greater".to_string(),
                });
                continue;
            }
            if !seen.insert(record.id.0.clone()) {
                rejected.push(RejectedRecord {
                    index,
                    id: record.id.0.clone(),
                    reason: "duplicate product id".to_string(),
                });
                continue;
            }
            products.push(record);
        }

        (Self { products }, rejected)
    }

    /// Parses a JSON array of product records, applying the same per-record
    /// validation as [`CatalogSnapshot::from_records`].
    pub fn from_json_str(raw: &str) -> Result<(Self, Vec<RejectedRecord>), serde_json::Error> {
        let records: Vec<Product> = serde_json::from_str(raw)?;
        Ok(Self::from_records(records))
    }

    /// The built-in demo catalog.
    pub fn demo() -> Self {
        Self::from_records(fixtures::demo_products()).0
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id.0 == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::CatalogSnapshot;
    use crate::catalog::fixtures::demo_products;

    #[test]
    fn demo_catalog_loads_without_rejections() {
        let (snapshot, rejected) = CatalogSnapshot::from_records(demo_products());
        assert!(rejected.is_empty());
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected_keeping_the_first() {
        let mut records = demo_products();
        let duplicate = records[0].clone();
        records.push(duplicate);

        let (snapshot, rejected) = CatalogSnapshot::from_records(records);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].reason, "duplicate product id");
        assert_eq!(snapshot.len(), demo_products().len());
    }

    #[test]
    fn negative_prices_are_rejected_without_dropping_valid_records() {
        let mut records = demo_products();
        records[0].price = Decimal::from(-1);

        let (snapshot, rejected) = CatalogSnapshot::from_records(records);
        assert_eq!(rejected.len(), 1);
        assert_eq!(snapshot.len(), demo_products().len() - 1);
    }

    #[test]
    fn json_loading_round_trips_the_demo_catalog() {
        let raw = serde_json::to_string(&demo_products()).expect("serialize");
        let (snapshot, rejected) = CatalogSnapshot::from_json_str(&raw).expect("parse");
        assert!(rejected.is_empty());
        assert_eq!(snapshot.products(), demo_products().as_slice());
    }

    #[test]
    fn lookup_by_id() {
        let snapshot = CatalogSnapshot::demo();
        assert!(snapshot.by_id("women-shoes-pump").is_some());
        assert!(snapshot.by_id("no-such-product").is_none());
    }
}
