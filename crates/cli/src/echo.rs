use std::time::Duration;

use datacat_core::{Conversion, MetadataMap};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Datacat".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Convert open-dataset pages into DCAT records\n".dimmed());
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

/// Print timing information with color coding
fn print_timing(label: &str, duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 50.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 100.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print a summary of the assembled record
pub fn print_record_details(conversion: &Conversion) {
    let dataset = &conversion.record.dataset;

    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Record Details".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("  {} {}", "Site:".dimmed(), conversion.site.to_string().bright_white());
    eprintln!("  {} {}", "Title:".dimmed(), dataset.title.bright_white());
    eprintln!("  {} {}", "Publisher:".dimmed(), dataset.publisher.name.bright_white());
    let fields = conversion.raw.primary_metadata().map_or(0, MetadataMap::len);
    eprintln!("  {} {}", "Metadata fields:".dimmed(), fields.to_string().bright_white());
    if let Some(issued) = &dataset.issued {
        eprintln!("  {} {}", "Issued:".dimmed(), issued.bright_white());
    }
    if let Some(modified) = &dataset.modified {
        eprintln!("  {} {}", "Modified:".dimmed(), modified.bright_white());
    }
    eprintln!("  {} {}", "Keywords:".dimmed(), dataset.keywords.len().to_string().bright_white());
    eprintln!("  {} {}", "Distributions:".dimmed(), dataset.distributions.len().to_string().bright_white());
    for distribution in &dataset.distributions {
        eprintln!("    {} {}", distribution.format.dimmed(), distribution.access_url);
    }
    eprintln!();
}

/// Print timing summary
pub fn print_timing_summary(total: Duration, timings: &[(String, Duration)]) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Timing Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (label, duration) in timings {
        print_timing(label, *duration);
    }

    eprintln!("  {} {:>8.2}ms\n", format!("{}:", "Total").bold().dimmed(), total.as_secs_f64() * 1000.0);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 / 2), "1.5 MB");
    }
}
