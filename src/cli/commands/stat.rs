//! Stat command - inspect cache entries

use crate::cache::{CacheBinding, EntryKind, StatResult};
use crate::cli::args::{OutputFormat, StatArgs};
use crate::config::Config;
use crate::error::{KitbagError, KitbagResult};
use crate::ui::Reporter;
use console::style;

/// Execute the stat command
pub async fn execute(args: StatArgs, config: &Config, reporter: &Reporter) -> KitbagResult<()> {
    let binding = CacheBinding::from_config(config, "kitbag", reporter)?;

    let pathname = args.path.as_deref().unwrap_or("");
    let Some(result) = binding.store().stat(pathname).await else {
        return Err(KitbagError::User(format!(
            "no cache entry at {:?} (run with -vv for details)",
            pathname
        )));
    };

    match args.format {
        OutputFormat::Table => print_table(&result),
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Plain => print_plain(&result),
    }
    Ok(())
}

/// Format bytes as human-readable size (e.g., "1.5 GB")
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::File => "file",
        EntryKind::Directory => "dir",
    }
}

fn print_table(result: &StatResult) {
    let modified = result
        .stat
        .modified
        .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{} ({}, {}, modified {})",
        style(&result.name).bold(),
        kind_label(result.stat.kind),
        format_bytes(result.stat.size),
        modified
    );

    let Some(children) = &result.children else {
        return;
    };
    if children.is_empty() {
        println!("  (empty)");
        return;
    }

    println!("{:<32} {:<6} {:>10} {:<17}", "NAME", "KIND", "SIZE", "MODIFIED");
    println!("{}", "-".repeat(68));
    for child in children {
        let modified = child
            .stat
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<32} {:<6} {:>10} {:<17}",
            child.name,
            kind_label(child.stat.kind),
            format_bytes(child.stat.size),
            modified
        );
    }
    println!();
    println!("Total: {} entr{}", children.len(), if children.len() == 1 { "y" } else { "ies" });
}

fn print_json(result: &StatResult) -> KitbagResult<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

fn print_plain(result: &StatResult) {
    match &result.children {
        Some(children) => {
            for child in children {
                println!("{}", child.name);
            }
        }
        None => println!("{}", result.name),
    }
}
