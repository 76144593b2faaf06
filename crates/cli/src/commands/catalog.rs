use std::fs;
use std::path::PathBuf;

use kolzo_core::catalog::query::{
    filter, search, sort, FilterOptions, SortDirection, SortField, SortOptions,
};
use kolzo_core::catalog::snapshot::CatalogSnapshot;
use kolzo_core::config::{AppConfig, LoadOptions};
use kolzo_core::domain::product::{Gender, Product};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug, Default)]
pub struct CatalogArgs {
    pub query: Option<String>,
    pub category: Option<String>,
    pub gender: Option<String>,
    pub brand: Option<String>,
    pub featured: bool,
    pub sort: Option<String>,
    pub direction: String,
    pub limit: Option<usize>,
    pub data: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CatalogRow<'a> {
    id: &'a str,
    name: &'a str,
    price: String,
    category: &'a str,
    gender: &'a str,
    brand: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CatalogOutput<'a> {
    command: &'static str,
    status: &'static str,
    count: usize,
    products: Vec<CatalogRow<'a>>,
}

pub fn run(args: CatalogArgs) -> CommandResult {
    let snapshot = match load_snapshot(&args) {
        Ok(snapshot) => snapshot,
        Err(message) => return CommandResult::failure("catalog", "catalog_load", message, 1),
    };

    let options = match build_filter(&args) {
        Ok(options) => options,
        Err(message) => return CommandResult::failure("catalog", "invalid_argument", message, 2),
    };
    let sort_options = match build_sort(&args) {
        Ok(sort_options) => sort_options,
        Err(message) => return CommandResult::failure("catalog", "invalid_argument", message, 2),
    };

    let mut products = filter(snapshot.products(), &options);
    if let Some(query) = args.query.as_deref() {
        products = search(&products, query);
    }
    if let Some(sort_options) = sort_options {
        products = sort(&products, &sort_options);
    }
    if let Some(limit) = args.limit {
        products.truncate(limit);
    }

    let output = CatalogOutput {
        command: "catalog",
        status: "ok",
        count: products.len(),
        products: products.iter().map(row).collect(),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(rendered) => CommandResult { exit_code: 0, output: rendered },
        Err(error) => CommandResult::failure("catalog", "serialization", error.to_string(), 1),
    }
}

fn load_snapshot(args: &CatalogArgs) -> Result<CatalogSnapshot, String> {
    let data_path = match &args.data {
        Some(path) => Some(path.clone()),
        None => AppConfig::load(LoadOptions::default())
            .map_err(|error| error.to_string())?
            .catalog
            .data_path,
    };

    let Some(path) = data_path else {
        return Ok(CatalogSnapshot::demo());
    };

    let raw = fs::read_to_string(&path)
        .map_err(|error| format!("could not read `{}`: {error}", path.display()))?;
    let (snapshot, _rejected) = CatalogSnapshot::from_json_str(&raw)
        .map_err(|error| format!("could not parse `{}`: {error}", path.display()))?;
    Ok(snapshot)
}

fn build_filter(args: &CatalogArgs) -> Result<FilterOptions, String> {
    let gender = match args.gender.as_deref() {
        Some(raw) => {
            Some(Gender::parse(raw).ok_or_else(|| format!("unknown gender `{raw}`"))?)
        }
        None => None,
    };

    Ok(FilterOptions {
        category: args.category.clone(),
        gender,
        brand: args.brand.clone(),
        featured: args.featured.then_some(true),
        ..FilterOptions::default()
    })
}

fn build_sort(args: &CatalogArgs) -> Result<Option<SortOptions>, String> {
    let Some(raw_field) = args.sort.as_deref() else {
        return Ok(None);
    };

    let field =
        SortField::parse(raw_field).ok_or_else(|| format!("unknown sort field `{raw_field}`"))?;
    let direction = SortDirection::parse(&args.direction)
        .ok_or_else(|| format!("unknown sort direction `{}`", args.direction))?;

    Ok(Some(SortOptions { field, direction }))
}

fn row(product: &Product) -> CatalogRow<'_> {
    CatalogRow {
        id: &product.id.0,
        name: &product.name,
        price: product.price.to_string(),
        category: &product.category,
        gender: product.gender.as_str(),
        brand: product.brand.as_deref(),
    }
}

#[cfg(test)]
mod tests {
    use super::{run, CatalogArgs};

    #[test]
    fn demo_catalog_query_renders_rows() {
        let result = run(CatalogArgs {
            query: Some("silk".to_string()),
            gender: Some("women".to_string()),
            sort: Some("price".to_string()),
            direction: "asc".to_string(),
            ..CatalogArgs::default()
        });

        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("\"command\": \"catalog\""));
        assert!(result.output.contains("women-dress-columne"));
    }

    #[test]
    fn unknown_gender_fails_with_a_structured_error() {
        let result = run(CatalogArgs {
            gender: Some("kids".to_string()),
            direction: "asc".to_string(),
            ..CatalogArgs::default()
        });

        assert_eq!(result.exit_code, 2);
        assert!(result.output.contains("invalid_argument"));
    }
}
