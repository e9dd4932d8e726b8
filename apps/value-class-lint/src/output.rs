use colored::Colorize;
use value_class_rules::{AnalysisReport, Severity};

pub fn print_json_results(report: &AnalysisReport, programs_checked: usize) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "programs_checked": programs_checked,
        "classes_checked": report.classes_checked,
        "constructions_checked": report.constructions_checked,
        "violations_count": report.violations.len(),
        "ok": report.is_clean(),
        "violations": report.violations,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_results(report: &AnalysisReport, programs_checked: usize) {
    println!();
    println!("{}", "=".repeat(80));
    println!("  {}", "VALUE CLASS LINT".bold());
    println!("{}", "=".repeat(80));
    println!();
    println!("  Programs checked:      {programs_checked}");
    println!("  Classes checked:       {}", report.classes_checked);
    println!("  Constructions checked: {}", report.constructions_checked);
    println!("  Violations found:      {}", report.violations.len());
    println!();

    if !report.is_clean() {
        println!("{}", "-".repeat(80));
        println!("  {}", "VIOLATIONS".red().bold());
        println!("{}", "-".repeat(80));

        for violation in &report.violations {
            let line = violation.format_human_readable();
            match violation.severity {
                Severity::Error => println!("{}", line.red()),
                Severity::Warning => println!("{}", line.yellow()),
            }
        }
        println!();

        for (rule, count) in report.count_by_rule() {
            println!("  {rule:<26} {count}");
        }
        println!();
    }

    println!("{}", "=".repeat(80));
    if report.is_clean() {
        println!(
            "{}",
            format!("\u{2713} All {programs_checked} programs passed").green()
        );
    } else {
        println!(
            "{}",
            format!("\u{2717} {} violations found", report.violations.len()).red()
        );
        println!();
        println!("  To fix:");
        println!("    - Declare marked classes final and readonly");
        println!("    - Make their constructors private");
        println!("    - Create instances through the factory function instead of `new`");
    }
    println!("{}", "=".repeat(80));
}
