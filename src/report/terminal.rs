use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{DependencyRecord, RiskLevel, ScanReport};

/// Render a colored terminal report.
pub fn render(report: &ScanReport, verbose: bool, quiet: bool) -> Result<()> {
    let low_count = report.risk_counts.low;
    let medium_count = report.risk_counts.medium;
    let high_count = report.risk_counts.high;

    if quiet {
        println!("{}", summary_line(report));
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "license-scanner".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Project: {}\n", report.project_name);

    let languages: Vec<String> = report.ecosystems_seen.iter().map(|e| e.to_string()).collect();

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Total dependencies : {}", report.total_dependency_count)
    );
    println!(
        " │  {:<48} │",
        format!("Unique licenses    : {}", report.unique_license_count)
    );
    println!(
        " │  {:<48} │",
        format!("Languages          : {}", languages.join(", "))
    );
    println!(
        " │  {:<48} │",
        format!("{}  Low             : {:>4}", "✓".green(), low_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Medium          : {:>4}", "⚠".yellow(), medium_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  High            : {:>4}", "✗".red(), high_count)
    );
    println!(" └────────────────────────────────────────────────────┘");
    println!(" Overall risk: {}\n", colored_risk(report.overall_risk));

    if report.total_dependency_count > report.dependencies.len() {
        println!(
            " {} showing the first {} of {} dependencies\n",
            "note:".dimmed(),
            report.dependencies.len(),
            report.total_dependency_count
        );
    }

    if high_count > 0 {
        println!(" {} High-risk dependencies:\n", "[HIGH]".red().bold());
        render_table(&report.dependencies, RiskLevel::High);
        print_hidden_note(report, RiskLevel::High);
        println!();
    }

    if medium_count > 0 {
        println!(" {} Dependencies needing review:\n", "[MEDIUM]".yellow().bold());
        render_table(&report.dependencies, RiskLevel::Medium);
        print_hidden_note(report, RiskLevel::Medium);
        println!();
    }

    if verbose && low_count > 0 {
        println!(" {} Low-risk dependencies:\n", "[LOW]".green().bold());
        render_table(&report.dependencies, RiskLevel::Low);
        print_hidden_note(report, RiskLevel::Low);
        println!();
    }

    if !report.issues.is_empty() {
        println!(" {}\n", "Issues".bold());
        for issue in &report.issues {
            println!(
                "  {} {} ({})",
                colored_risk(issue.severity),
                issue.title.bold(),
                issue.package
            );
            println!("      {}", issue.description);
            println!("      {} {}", "→".cyan(), issue.recommendation);
        }
        println!();
    }

    for failure in &report.manifest_errors {
        println!(
            " {} {}: {}",
            "[SKIPPED]".magenta().bold(),
            failure.manifest,
            failure.reason
        );
    }

    Ok(())
}

/// One-line summary printed with `--quiet`. Tier counts cover every dependency,
/// not only the rows kept in the report.
fn summary_line(report: &ScanReport) -> String {
    format!(
        "Total: {}  Low: {}  Medium: {}  High: {}  Risk: {}",
        report.total_dependency_count,
        report.risk_counts.low.to_string().green(),
        report.risk_counts.medium.to_string().yellow(),
        report.risk_counts.high.to_string().red(),
        colored_risk(report.overall_risk),
    )
}

/// Dependencies of `risk` that were cut from the report's `dependencies` list.
fn hidden_in_tier(report: &ScanReport, risk: RiskLevel) -> usize {
    let shown = report.dependencies.iter().filter(|d| d.risk == risk).count();
    report.risk_counts.get(risk).saturating_sub(shown)
}

fn print_hidden_note(report: &ScanReport, risk: RiskLevel) {
    let hidden = hidden_in_tier(report, risk);
    if hidden > 0 {
        println!(
            " {} {} more {}-risk dependencies not shown",
            "note:".dimmed(),
            hidden,
            risk
        );
    }
}

fn render_table(deps: &[DependencyRecord], risk_filter: RiskLevel) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("Language").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
        ]);

    for dep in deps.iter().filter(|d| d.risk == risk_filter) {
        let risk_color = match dep.risk {
            RiskLevel::Low => Color::Green,
            RiskLevel::Medium => Color::Yellow,
            RiskLevel::High => Color::Red,
        };

        table.add_row(vec![
            Cell::new(&dep.name),
            Cell::new(&dep.declared_version),
            Cell::new(dep.ecosystem.to_string()),
            Cell::new(&dep.license),
            Cell::new(dep.license_source.to_string()).fg(Color::DarkGrey),
            Cell::new(dep.risk.to_string())
                .fg(risk_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

fn colored_risk(risk: RiskLevel) -> ColoredString {
    let label = risk.to_string().to_uppercase();
    match risk {
        RiskLevel::Low => label.green(),
        RiskLevel::Medium => label.yellow(),
        RiskLevel::High => label.red().bold(),
    }
}
