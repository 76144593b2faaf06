//! Catalog routes: product listing with filter/search/sort, single-product
//! lookup, and related-product suggestions. Every response uses the
//! `{success, data|message}` envelope the storefront client expects.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kolzo_core::catalog::query::{
    filter, search, sort, FilterOptions, SortDirection, SortField, SortOptions,
};
use kolzo_core::catalog::related::related_products;
use kolzo_core::domain::product::{Gender, Product, ProductStatus};

use crate::bootstrap::ApiState;

const DEFAULT_RELATED_LIMIT: usize = 4;

#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RelatedQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/{product_id}", get(get_product))
        .route("/api/v1/products/{product_id}/related", get(get_related))
        .with_state(state)
}

fn bad_request<T>(message: impl Into<String>) -> (StatusCode, Json<ApiEnvelope<T>>) {
    (StatusCode::BAD_REQUEST, Json(ApiEnvelope::fail(message)))
}

fn parse_filter(query: &ProductQuery) -> Result<FilterOptions, String> {
    let gender = match query.gender.as_deref() {
        Some(raw) => Some(
            Gender::parse(raw).ok_or_else(|| format!("unknown gender `{raw}`"))?,
        ),
        None => None,
    };
    let status = match query.status.as_deref() {
        Some(raw) => Some(
            ProductStatus::parse(raw).ok_or_else(|| format!("unknown status `{raw}`"))?,
        ),
        None => None,
    };

    Ok(FilterOptions {
        category: query.category.clone(),
        gender,
        min_price: query.min_price,
        max_price: query.max_price,
        min_rating: query.min_rating,
        brand: query.brand.clone(),
        status,
        featured: query.featured,
    })
}

fn parse_sort(query: &ProductQuery) -> Result<Option<SortOptions>, String> {
    let Some(raw_field) = query.sort.as_deref() else {
        return Ok(None);
    };

    let field =
        SortField::parse(raw_field).ok_or_else(|| format!("unknown sort field `{raw_field}`"))?;
    let direction = match query.direction.as_deref() {
        Some(raw) => SortDirection::parse(raw)
            .ok_or_else(|| format!("unknown sort direction `{raw}`"))?,
        None => SortDirection::Asc,
    };

    Ok(Some(SortOptions { field, direction }))
}

pub async fn list_products(
    State(state): State<ApiState>,
    Query(query): Query<ProductQuery>,
) -> (StatusCode, Json<ApiEnvelope<Vec<Product>>>) {
    let options = match parse_filter(&query) {
        Ok(options) => options,
        Err(message) => return bad_request(message),
    };
    let sort_options = match parse_sort(&query) {
        Ok(sort_options) => sort_options,
        Err(message) => return bad_request(message),
    };

    let mut products = filter(state.catalog.products(), &options);
    if let Some(q) = query.q.as_deref() {
        products = search(&products, q);
    }
    if let Some(sort_options) = sort_options {
        products = sort(&products, &sort_options);
    }
    if let Some(limit) = query.limit {
        products.truncate(limit);
    }

    (StatusCode::OK, Json(ApiEnvelope::ok(products)))
}

pub async fn get_product(
    State(state): State<ApiState>,
    Path(product_id): Path<String>,
) -> (StatusCode, Json<ApiEnvelope<Product>>) {
    match state.catalog.by_id(&product_id) {
        Some(product) => (StatusCode::OK, Json(ApiEnvelope::ok(product.clone()))),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiEnvelope::fail(format!("product `{product_id}` not found"))),
        ),
    }
}

pub async fn get_related(
    State(state): State<ApiState>,
    Path(product_id): Path<String>,
    Query(query): Query<RelatedQuery>,
) -> (StatusCode, Json<ApiEnvelope<Vec<Product>>>) {
    let Some(product) = state.catalog.by_id(&product_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiEnvelope::fail(format!("product `{product_id}` not found"))),
        );
    };

    let limit = query.limit.unwrap_or(DEFAULT_RELATED_LIMIT);
    let related = related_products(product, state.catalog.products(), limit);
    (StatusCode::OK, Json(ApiEnvelope::ok(related)))
}
