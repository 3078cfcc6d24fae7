//! SARIF (Static Analysis Results Interchange Format) output for GitHub Actions integration.
//!
//! Each affected package becomes one rule and one error-level result located
//! at the checked manifest, so code scanning annotates the `package.json`.

use super::STDIN_LABEL;
use crate::model::{CheckReport, MatchResult};
use anyhow::Result;
use serde::Serialize;

const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// SARIF v2.1.0 schema root
#[derive(Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: &'static str,
    version: &'static str,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    name: String,
    short_description: SarifMessage,
    default_configuration: SarifRuleConfiguration,
}

#[derive(Serialize)]
struct SarifRuleConfiguration {
    level: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: &'static str,
    message: SarifMessage,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

fn rule_id(hit: &MatchResult) -> String {
    format!("affected-package/{}", hit.package_name)
}

fn result_message(hit: &MatchResult) -> String {
    format!(
        "{} {} is declared in {}; affected versions: {}",
        hit.package_name,
        hit.installed_version,
        hit.kind(),
        hit.affected_versions.join(", ")
    )
}

fn locations(manifest: &str) -> Vec<SarifLocation> {
    if manifest == STDIN_LABEL {
        return Vec::new();
    }
    vec![SarifLocation {
        physical_location: SarifPhysicalLocation {
            artifact_location: SarifArtifactLocation {
                uri: manifest.to_string(),
            },
        },
    }]
}

/// Generate and print SARIF output
pub fn print_sarif(report: &CheckReport, manifest: &str) -> Result<()> {
    println!("{}", generate_sarif_string(report, manifest)?);
    Ok(())
}

/// Generate SARIF as a string (for file output)
pub fn generate_sarif_string(report: &CheckReport, manifest: &str) -> Result<String> {
    let mut rules = Vec::new();
    let mut results = Vec::new();

    for hit in &report.affected_packages {
        rules.push(SarifRule {
            id: rule_id(hit),
            name: hit.package_name.clone(),
            short_description: SarifMessage {
                text: format!("{} is listed as an affected package", hit.package_name),
            },
            default_configuration: SarifRuleConfiguration { level: "error" },
        });

        results.push(SarifResult {
            rule_id: rule_id(hit),
            level: "error",
            message: SarifMessage {
                text: result_message(hit),
            },
            locations: locations(manifest),
        });
    }

    let sarif = SarifReport {
        schema: SARIF_SCHEMA,
        version: "2.1.0",
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "pkgguard",
                    version: env!("CARGO_PKG_VERSION"),
                    rules,
                },
            },
            results,
        }],
    };

    Ok(serde_json::to_string_pretty(&sarif)?)
}
