use colored::Colorize;
use log::debug;
use std::io::{self, Write};

use crate::types::SizeReport;

/// Formats a byte count with binary units, e.g. `18 B`, `1.5 KB`, `1.18 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;
    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        return format!("{} {}", bytes, UNITS[0]);
    }
    let fixed = format!("{:.2}", size);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit_idx])
}

/// One line per category: name in yellow, size in green.
pub fn print_sizes<W: Write>(writer: &mut W, report: &SizeReport) -> io::Result<()> {
    debug!("Printing {} category sizes", report.sizes.len());
    for entry in &report.sizes {
        writeln!(
            writer,
            "{} {}",
            entry.category.as_str().yellow(),
            format_size(entry.bytes).green()
        )?;
    }
    writer.flush()?;
    Ok(())
}
