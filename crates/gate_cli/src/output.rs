use colored::*;
use gate_core::{TableRef, ValidationConfig, ValidationReport};
use serde_json::json;

pub fn print_validation_report(report: &ValidationReport, format: &str) {
    match format {
        "json" => print_json_report(report),
        _ => print_text_report(report),
    }
}

fn verdict(passed: bool) -> ColoredString {
    if passed { "ok".green() } else { "failed".red() }
}

fn print_text_report(report: &ValidationReport) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  DEPLOYMENT VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if report.passed {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !report.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for (i, error) in report.errors.iter().enumerate() {
            println!("  {}. {}", i + 1, error.red());
        }
    }

    if !report.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for (i, warning) in report.warnings.iter().enumerate() {
            println!("  {}. {}", i + 1, warning.yellow());
        }
    }

    println!("\n{}", "Summary:".bold());
    println!(
        "  Tables:         {} checked, {}",
        report.stats.tables_checked,
        verdict(report.tables_passed)
    );
    println!(
        "  Jobs:           {} checked, {}",
        report.stats.jobs_checked,
        verdict(report.jobs_passed)
    );
    println!("  Total errors:   {}", report.errors.len());
    println!("  Total warnings: {}", report.warnings.len());
    println!("  Duration:       {} ms", report.stats.duration_ms);
    println!("  Checked at:     {}", report.checked_at.to_rfc3339());
    println!("{}", "═".repeat(60));
}

fn print_json_report(report: &ValidationReport) {
    let output = json!({
        "passed": report.passed,
        "tables_passed": report.tables_passed,
        "jobs_passed": report.jobs_passed,
        "errors": report.errors,
        "warnings": report.warnings,
        "summary": {
            "tables_checked": report.stats.tables_checked,
            "jobs_checked": report.stats.jobs_checked,
            "error_count": report.errors.len(),
            "warning_count": report.warnings.len(),
            "duration_ms": report.stats.duration_ms,
        },
        "checked_at": report.checked_at.to_rfc3339(),
    });

    println!("{:#}", output);
}

pub fn print_config_summary(config: &ValidationConfig, tables: &[TableRef], format: &str) {
    if format == "json" {
        let output = json!({
            "valid": true,
            "tables": config
                .tables
                .iter()
                .zip(tables)
                .map(|(expectation, table)| json!({
                    "name": table.full_name(),
                    "min_rows": expectation.min_rows,
                }))
                .collect::<Vec<_>>(),
            "jobs": config
                .jobs
                .iter()
                .map(|job| json!({
                    "name": job.name,
                    "must_be_active": job.must_be_active,
                }))
                .collect::<Vec<_>>(),
        });
        println!("{:#}", output);
        return;
    }

    print_success("Validation config is valid");

    println!("\nConfig Summary:");
    println!("  Tables: {}", config.tables.len());
    for (expectation, table) in config.tables.iter().zip(tables) {
        println!("    - {} (min_rows: {})", table, expectation.min_rows);
    }

    println!("  Jobs:   {}", config.jobs.len());
    for job in &config.jobs {
        if job.must_be_active {
            println!("    - {} (must_be_active)", job.name);
        } else {
            println!("    - {}", job.name);
        }
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}
