use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::product::ProductDraft;

/// Result of validating a candidate product record. Always returned, never
/// raised: callers branch on `is_valid` and surface `errors` as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Checks the fields every catalog record must carry: id, name, category,
/// description, and a numeric price that is zero or greater. All problems
/// are collected into one report.
pub fn validate_product(draft: &ProductDraft) -> ValidationReport {
    let mut errors = Vec::new();

    if is_blank(&draft.id) {
        errors.push("id is required".to_string());
    }
    if is_blank(&draft.name) {
        errors.push("name is required".to_string());
    }
    if is_blank(&draft.category) {
        errors.push("category is required".to_string());
    }
    if is_blank(&draft.description) {
        errors.push("description is required".to_string());
    }
    match draft.price {
        None => errors.push("price is required".to_string()),
        Some(price) if price < Decimal::ZERO => {
            errors.push("price must be zero or greater".to_string());
        }
        Some(_) => {}
    }

    ValidationReport { is_valid: errors.is_empty(), errors }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |value| value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::validate_product;
    use crate::domain::product::ProductDraft;

    #[test]
    fn empty_draft_reports_every_missing_field() {
        let report = validate_product(&ProductDraft::default());
        assert!(!report.is_valid);
        assert!(report.errors.len() >= 4);
        assert!(report.errors.iter().any(|e| e.contains("id")));
        assert!(report.errors.iter().any(|e| e.contains("price")));
    }

    #[test]
    fn negative_price_is_rejected() {
        let draft = ProductDraft {
            id: Some("p-1".to_string()),
            name: Some("Silk Scarf".to_string()),
            description: Some("Hand-rolled silk twill".to_string()),
            category: Some("Accessories".to_string()),
            price: Some(Decimal::from(-10)),
            ..ProductDraft::default()
        };

        let report = validate_product(&draft);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["price must be zero or greater".to_string()]);
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        let draft = ProductDraft {
            id: Some("  ".to_string()),
            name: Some("Silk Scarf".to_string()),
            description: Some("Hand-rolled silk twill".to_string()),
            category: Some("Accessories".to_string()),
            price: Some(Decimal::ZERO),
            ..ProductDraft::default()
        };

        let report = validate_product(&draft);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["id is required".to_string()]);
    }

    #[test]
    fn complete_draft_passes() {
        let draft = ProductDraft {
            id: Some("p-1".to_string()),
            name: Some("Silk Scarf".to_string()),
            description: Some("Hand-rolled silk twill".to_string()),
            category: Some("Accessories".to_string()),
            price: Some(Decimal::from(180)),
            ..ProductDraft::default()
        };

        let report = validate_product(&draft);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }
}
