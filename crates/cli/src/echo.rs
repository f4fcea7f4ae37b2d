use std::time::Duration;

use owo_colors::OwoColorize;
use pagechunk_core::ScrapeResult;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "PageChunk".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Web pages to frontmatter Markdown and overlapping chunks\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print a labelled value under a step
pub fn print_field(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{label}:").dimmed(), value.bright_white());
}

/// Print elapsed time, coloured by how long the scrape took
pub fn print_timing(label: &str, duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{label}:");

    if ms < 1000.0 {
        eprintln!("  {} {:>9.2}ms ({})", label.dimmed(), ms, "fast".green());
    } else if ms < 5000.0 {
        eprintln!("  {} {:>9.2}ms ({})", label.dimmed(), ms, "moderate".yellow());
    } else {
        eprintln!("  {} {:>9.2}ms ({})", label.dimmed(), ms, "slow".red());
    }
}

/// Print a summary of a finished scrape
pub fn print_result_summary(result: &ScrapeResult) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Scrape Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    print_field("Title", &result.meta.title);
    print_field("URL", &result.meta.url);
    print_field("Status", &result.fetched.status.to_string());
    print_field("Content hash", &result.meta.content_hash);
    print_field("Chunks", &result.chunks.len().to_string());
    let words: usize = result.chunks.iter().map(|c| c.approx_word_count).sum();
    print_field("Words (incl. overlap)", &words.to_string());
    eprintln!();
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
