//! Catalog query utility: pure, stateless functions over a read-only
//! snapshot of [`crate::domain::product::Product`] records. Safe to call from
//! any number of call sites, nothing here holds shared mutable state.

pub mod fixtures;
pub mod query;
pub mod related;
pub mod snapshot;
pub mod validate;

pub use query::{filter, search, sort, FilterOptions, SortDirection, SortField, SortOptions};
pub use related::related_products;
pub use snapshot::{CatalogSnapshot, RejectedRecord};
pub use validate::{validate_product, ValidationReport};
