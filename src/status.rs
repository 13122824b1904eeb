// Cache status display — location, size and verdict counts.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::cache::VerdictCache;
use crate::moderation::verdict::Verdict;

/// Display cache status to the terminal.
///
/// `db_display_path` is `None` for the in-memory backend.
pub async fn show(cache: &Arc<dyn VerdictCache>, db_display_path: Option<&str>) -> Result<()> {
    match db_display_path {
        Some(path) => {
            let file_size = std::fs::metadata(Path::new(path))
                .map(|m| format_bytes(m.len()))
                .unwrap_or_else(|_| "unknown".to_string());
            println!("Cache: {} ({})", path, file_size);
        }
        None => println!("Cache: in-memory (nothing persists between runs)"),
    }

    let summary = cache.summary().await?;
    let total: u64 = summary.iter().map(|(_, n)| n).sum();
    if total == 0 {
        println!("Verdicts: none cached yet");
        println!("  Run `safegate check <files>` to classify images");
        return Ok(());
    }

    println!("Verdicts: {} cached", total);
    for (value, count) in &summary {
        let verdict = Verdict::parse(value);
        let note = if verdict.is_transient() {
            " (unusable, will be re-classified)"
        } else {
            ""
        };
        println!("  {:<18} {:>8}{}", value, count, note);
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
