use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use kolzo_core::catalog::snapshot::CatalogSnapshot;
use kolzo_core::config::{AppConfig, ConfigError, LoadOptions};
use kolzo_core::newsletter::{NewsletterService, NoopNewsletterService};
use thiserror::Error;
use tracing::{info, warn};

use crate::newsletter_api::HttpNewsletterService;

/// Shared state handed to every router.
#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<CatalogSnapshot>,
    pub newsletter: Arc<dyn NewsletterService>,
    pub newsletter_enabled: bool,
}

pub struct Application {
    pub config: AppConfig,
    pub api_state: ApiState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not read catalog data file `{path}`: {source}")]
    CatalogRead { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog data file `{path}`: {source}")]
    CatalogParse { path: PathBuf, source: serde_json::Error },
    #[error("newsletter client construction failed: {0}")]
    NewsletterClient(#[source] reqwest::Error),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = Arc::new(load_catalog(&config)?);
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        products = catalog.len(),
        "catalog snapshot loaded"
    );

    let newsletter = build_newsletter_service(&config)?;

    Ok(Application {
        api_state: ApiState {
            catalog,
            newsletter,
            newsletter_enabled: config.newsletter.enabled,
        },
        config,
    })
}

fn load_catalog(config: &AppConfig) -> Result<CatalogSnapshot, BootstrapError> {
    let Some(path) = &config.catalog.data_path else {
        return Ok(CatalogSnapshot::demo());
    };

    let raw = fs::read_to_string(path)
        .map_err(|source| BootstrapError::CatalogRead { path: path.clone(), source })?;
    let (snapshot, rejected) = CatalogSnapshot::from_json_str(&raw)
        .map_err(|source| BootstrapError::CatalogParse { path: path.clone(), source })?;

    for record in &rejected {
        warn!(
            event_name = "system.bootstrap.catalog_record_rejected",
            correlation_id = "bootstrap",
            record_index = record.index,
            record_id = %record.id,
            reason = %record.reason,
            "catalog record rejected"
        );
    }

    Ok(snapshot)
}

fn build_newsletter_service(
    config: &AppConfig,
) -> Result<Arc<dyn NewsletterService>, BootstrapError> {
    if !config.newsletter.enabled {
        return Ok(Arc::new(NoopNewsletterService));
    }

    let service = HttpNewsletterService::from_config(&config.newsletter)
        .map_err(BootstrapError::NewsletterClient)?;
    Ok(Arc::new(service))
}
