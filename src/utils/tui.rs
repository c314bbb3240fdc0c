//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use crate::math::dot_product::bench::BenchReport;
use crate::utils::timer::VariantResult;
use terminal_size::{terminal_size, Width};

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

fn verdict(correct: bool) -> &'static str {
    if correct {
        "correct"
    } else {
        "incorrect"
    }
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80); // Cap header at 80
    let title = " Fork-Join Dot Product Benchmarks ";
    let padding = term_width.saturating_sub(title.len() + 2) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!(
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    );
    println!("╚{}╝", border);
    println!();
}

/// Run parameters and the variants being compared, one line each.
pub fn run_info_lines(report: &BenchReport) -> Vec<String> {
    let seed = report
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut lines = vec![
        format!("Vector length: {}", report.len),
        format!("Coarseness:    {}", report.coarseness),
        format!("Iterations:    {}", report.iterations),
        format!("Workers:       {}", report.workers),
        format!("Seed:          {}", seed),
    ];
    for result in std::iter::once(&report.baseline).chain(&report.variants) {
        lines.push(format!("{:<14} {}", format!("{}:", result.name), result.description));
    }
    lines
}

/// Print the run parameters in a box
pub fn print_run_info_box(report: &BenchReport) {
    let term_width = get_term_width();
    let max_content_width = term_width.saturating_sub(4).max(40);

    let lines = run_info_lines(report);
    let content_width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(40)
        .min(max_content_width);
    let border = "─".repeat(content_width + 2);

    println!("┌{}┐", border);
    for (i, line) in lines.iter().enumerate() {
        if i == 5 {
            println!("├{}┤", border);
        }
        println!(
            "│ {:<width$} │",
            truncate(line, content_width),
            width = content_width
        );
    }
    println!("└{}┘", border);
    println!();
}

/// The report lines for the sequential baseline.
pub fn baseline_lines(baseline: &VariantResult) -> Vec<String> {
    vec![format!(
        "Sequential time: {} seconds",
        baseline.timing.avg_secs()
    )]
}

/// The report lines for one parallel strategy.
pub fn strategy_lines(baseline: &VariantResult, result: &VariantResult) -> Vec<String> {
    vec![
        format!("{} time: {} seconds", result.label, result.timing.avg_secs()),
        format!("Speedup is: {}", result.speedup),
        format!("Sequential result is: {}", baseline.result),
        format!("{} result is: {}", result.label, result.result),
        format!("Result is {}", verdict(result.correct)),
    ]
}

/// One row of the results table.
fn table_row(result: &VariantResult, variant_col_width: usize) -> String {
    format!(
        "  {:<v_width$} {:>12} {:>12} {:>12} {:>12} {:>8.2}x {:>8.2}% {:>9}",
        truncate(result.name, variant_col_width),
        format!("{:.2?}", result.timing.avg_time),
        format!("{:.2?}", result.timing.median_time),
        format!("{:.2?}", result.timing.min_time),
        format!("{:.2?}", result.timing.max_time),
        result.speedup,
        result.timing.cv() * 100.0,
        if result.correct { "ok" } else { "FAIL" },
        v_width = variant_col_width
    )
}

/// Print results table, one row per variant, baseline first
pub fn print_results_table(report: &BenchReport) {
    let term_width = get_term_width();
    let fixed_width = 85;
    let variant_col_width = term_width.saturating_sub(fixed_width).max(15);
    let table_width = variant_col_width + 73 + 7;

    println!("  {}", "─".repeat(table_width));
    println!(
        "  {:<v_width$} {:>12} {:>12} {:>12} {:>12} {:>9} {:>9} {:>9}",
        "Variant",
        "Average",
        "Median",
        "Min",
        "Max",
        "Speedup",
        "CV",
        "Verdict",
        v_width = variant_col_width
    );
    println!("  {}", "─".repeat(table_width));

    for result in std::iter::once(&report.baseline).chain(&report.variants) {
        println!("{}", table_row(result, variant_col_width));
    }
    println!();
}

/// Print a full report: run info, per-strategy lines and the summary table
pub fn print_report(report: &BenchReport) {
    print_run_info_box(report);

    for line in baseline_lines(&report.baseline) {
        println!("{}", line);
    }
    for result in &report.variants {
        for line in strategy_lines(&report.baseline, result) {
            println!("{}", line);
        }
    }
    println!();

    print_results_table(report);
    println!("Note: Speedup is relative to the sequential baseline.");
}
