//! Terminal styling for command output

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("housefit").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Learned preprocessing and Lasso training for house prices").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print a configuration card of labelled values
pub fn print_config(rows: &[(&str, String)]) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("Configuration").cyan().bold(),
        " ".repeat(box_width - 16)
    );
    println!("    ├{}┤", line);
    for (label, value) in rows {
        println!(
            "    │  {:<22}{:<30}│",
            label,
            style(truncate_string(value, 29)).yellow()
        );
    }
    println!("    └{}┘", line);
    println!();
}

/// Labelled path row for [`print_config`]
pub fn path_row<'a>(label: &'a str, path: &Path) -> (&'a str, String) {
    (label, truncate_path(path, 29))
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print the elapsed time of a step
pub fn print_step_time(elapsed: Duration) {
    println!("    {}", style(format!("({:.2}s)", elapsed.as_secs_f64())).dim());
}

/// Print the final completion message
pub fn print_completion(what: &str) {
    println!();
    println!("    {} {}", ROCKET, style(format!("{what} complete!")).green().bold());
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_keeps_tail() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("data/raw/train.csv", 10), "...ain.csv");
    }
}
