use crate::model::{CheckReport, DependencyKind};
use anyhow::Result;
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct AffectedRow {
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Installed")]
    installed: String,
    #[tabled(rename = "Affected Versions")]
    affected_versions: String,
    #[tabled(rename = "Declared In")]
    declared_in: String,
}

pub fn print_cli_table(report: &CheckReport, manifest: &str) -> Result<()> {
    print!("{}", format_cli_table(report, manifest)?);
    Ok(())
}

/// Renders the table view of a report.
pub fn format_cli_table(report: &CheckReport, manifest: &str) -> Result<String> {
    let mut out = String::new();

    writeln!(out)?;
    writeln!(out, "Checked {} packages in {}", report.total_packages, manifest)?;
    writeln!(out)?;

    if report.is_clean() {
        writeln!(out, "\x1b[32mNo affected packages found.\x1b[0m")?;
    } else {
        writeln!(
            out,
            "\x1b[31mFound {} affected packages:\x1b[0m",
            report.affected_packages.len()
        )?;
        writeln!(out)?;

        let rows: Vec<AffectedRow> = report
            .affected_packages
            .iter()
            .map(|m| AffectedRow {
                package: truncate(&m.package_name, 40),
                installed: m.installed_version.clone(),
                affected_versions: truncate(&m.affected_versions.join(", "), 50),
                declared_in: format_kind(m.kind()),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        writeln!(out, "{}", table)?;
    }

    writeln!(out)?;
    write_summary(&mut out, report)?;

    Ok(out)
}

fn write_summary(out: &mut String, report: &CheckReport) -> std::fmt::Result {
    let runtime = report.runtime_matches().count();
    let development = report.development_matches().count();

    writeln!(out, "Summary:")?;
    writeln!(out, "  Total packages: {}", report.total_packages)?;
    if report.is_clean() {
        writeln!(out, "  Affected: 0")?;
    } else {
        writeln!(
            out,
            "  Affected: {} ({} in dependencies, {} in devDependencies)",
            report.affected_packages.len(),
            runtime,
            development
        )?;
    }
    writeln!(out, "  Safe: {}", report.safe_packages)
}

fn format_kind(kind: DependencyKind) -> String {
    match kind {
        DependencyKind::Runtime => "dependencies".to_string(),
        DependencyKind::Development => "devDependencies".to_string(),
        DependencyKind::Both => "dependencies, devDependencies".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
