use std::fs;

use kolzo_core::catalog::snapshot::CatalogSnapshot;
use kolzo_core::config::{AppConfig, LoadOptions};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog_data(&config));
            checks.push(check_newsletter_readiness(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "catalog_data",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "newsletter_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status != CheckStatus::Fail);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog_data(config: &AppConfig) -> DoctorCheck {
    let Some(path) = &config.catalog.data_path else {
        let snapshot = CatalogSnapshot::demo();
        return DoctorCheck {
            name: "catalog_data",
            status: CheckStatus::Pass,
            details: format!("built-in demo catalog with {} products", snapshot.len()),
        };
    };

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            return DoctorCheck {
                name: "catalog_data",
                status: CheckStatus::Fail,
                details: format!("could not read `{}`: {error}", path.display()),
            };
        }
    };

    match CatalogSnapshot::from_json_str(&raw) {
        Ok((snapshot, rejected)) if rejected.is_empty() => DoctorCheck {
            name: "catalog_data",
            status: CheckStatus::Pass,
            details: format!("{} products loaded from `{}`", snapshot.len(), path.display()),
        },
        Ok((snapshot, rejected)) => DoctorCheck {
            name: "catalog_data",
            status: CheckStatus::Fail,
            details: format!(
                "{} products loaded, {} records rejected (first: `{}`: {})",
                snapshot.len(),
                rejected.len(),
                rejected[0].id,
                rejected[0].reason
            ),
        },
        Err(error) => DoctorCheck {
            name: "catalog_data",
            status: CheckStatus::Fail,
            details: format!("could not parse `{}`: {error}", path.display()),
        },
    }
}

fn check_newsletter_readiness(config: &AppConfig) -> DoctorCheck {
    if !config.newsletter.enabled {
        return DoctorCheck {
            name: "newsletter_readiness",
            status: CheckStatus::Skipped,
            details: "integration disabled".to_string(),
        };
    }

    // Credential shape is enforced by config validation once enabled.
    DoctorCheck {
        name: "newsletter_readiness",
        status: CheckStatus::Pass,
        details: format!(
            "subscribe proxy configured for `{}`",
            config.newsletter.base_url.as_deref().unwrap_or_default()
        ),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::{render_human, CheckStatus, DoctorCheck, DoctorReport};

    #[test]
    fn human_rendering_marks_each_check() {
        let report = DoctorReport {
            overall_status: CheckStatus::Fail,
            summary: "doctor: one or more readiness checks failed".to_string(),
            checks: vec![
                DoctorCheck {
                    name: "config_validation",
                    status: CheckStatus::Pass,
                    details: "configuration loaded and validated".to_string(),
                },
                DoctorCheck {
                    name: "catalog_data",
                    status: CheckStatus::Fail,
                    details: "could not read `catalog.json`".to_string(),
                },
                DoctorCheck {
                    name: "newsletter_readiness",
                    status: CheckStatus::Skipped,
                    details: "integration disabled".to_string(),
                },
            ],
        };

        let rendered = render_human(&report);
        assert!(rendered.contains("- [ok] config_validation"));
        assert!(rendered.contains("- [fail] catalog_data"));
        assert!(rendered.contains("- [skip] newsletter_readiness"));
    }
}
