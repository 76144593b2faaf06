use std::env;
use std::io::Write;
use std::sync::{Mutex, OnceLock};

use kolzo_cli::commands::{catalog, doctor};
use serde_json::Value;

#[test]
fn catalog_query_returns_structured_rows() {
    with_env(&[], || {
        let result = catalog::run(catalog::CatalogArgs {
            query: Some("silk".to_string()),
            gender: Some("women".to_string()),
            sort: Some("price".to_string()),
            direction: "asc".to_string(),
            ..catalog::CatalogArgs::default()
        });
        assert_eq!(result.exit_code, 0, "expected successful catalog query");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "catalog");
        assert_eq!(payload["status"], "ok");
        assert!(payload["count"].as_u64().unwrap_or(0) > 0);
    });
}

#[test]
fn catalog_honors_the_data_path_environment_override() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"[{{"id": "p-1", "name": "Archive Trench", "description": "Gabardine trench coat",
             "price": "1200.00", "category": "Outerwear", "gender": "women"}}]"#
    )
    .expect("write catalog");
    let path = file.path().display().to_string();

    with_env(&[("KOLZO_CATALOG_DATA_PATH", path.as_str())], || {
        let result = catalog::run(catalog::CatalogArgs {
            direction: "asc".to_string(),
            ..catalog::CatalogArgs::default()
        });
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["count"], 1);
        assert_eq!(payload["products"][0]["id"], "p-1");
    });
}

#[test]
fn catalog_rejects_unknown_sort_fields() {
    with_env(&[], || {
        let result = catalog::run(catalog::CatalogArgs {
            sort: Some("popularity".to_string()),
            direction: "asc".to_string(),
            ..catalog::CatalogArgs::default()
        });
        assert_eq!(result.exit_code, 2, "expected invalid-argument failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_argument");
    });
}

#[test]
fn doctor_passes_on_the_default_configuration() {
    with_env(&[], || {
        let report = parse_payload(&doctor::run(true));
        assert_eq!(report["overall_status"], "pass");
        assert_eq!(report["checks"][0]["name"], "config_validation");
        assert_eq!(report["checks"][0]["status"], "pass");
        assert_eq!(report["checks"][1]["name"], "catalog_data");
        assert_eq!(report["checks"][1]["status"], "pass");
    });
}

#[test]
fn doctor_reports_config_failures_and_skips_downstream_checks() {
    with_env(&[("KOLZO_LOGGING_LEVEL", "verbose")], || {
        let report = parse_payload(&doctor::run(true));
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][0]["status"], "fail");
        assert_eq!(report["checks"][1]["status"], "skipped");
        assert_eq!(report["checks"][2]["status"], "skipped");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "KOLZO_SERVER_BIND_ADDRESS",
        "KOLZO_SERVER_PORT",
        "KOLZO_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "KOLZO_NEWSLETTER_ENABLED",
        "KOLZO_NEWSLETTER_BASE_URL",
        "KOLZO_NEWSLETTER_API_KEY",
        "KOLZO_NEWSLETTER_TIMEOUT_SECS",
        "KOLZO_CATALOG_DATA_PATH",
        "KOLZO_WIDGET_TYPING_DELAY_MS",
        "KOLZO_LOGGING_LEVEL",
        "KOLZO_LOGGING_FORMAT",
        "KOLZO_LOG_LEVEL",
        "KOLZO_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
