use crate::analysis::{Analysis, AnalysisColumn};
use crate::record::DomainRecord;
use crate::session::{Notice, NoticeKind};
use crate::stats::{CollectionStats, SyncSummary};
use crate::utils::format_number;

pub fn print_analysis(analysis: &Analysis) {
    println!("\n--- Analysis ---");
    for column in [AnalysisColumn::Unique, AnalysisColumn::Duplicates] {
        let items = analysis.column(column);
        println!("\n{} ({}):", column, format_number(items.len()));
        if items.is_empty() {
            println!("  (none)");
        }
        for (index, item) in items.iter().enumerate() {
            println!("  {:>4}. {}", index + 1, item);
        }
    }
}

pub fn print_records<'a>(records: impl Iterator<Item = &'a DomainRecord>, total: usize) {
    let mut shown = 0;
    for record in records {
        println!(
            "{}  {:<7}  {}  {}",
            record.id,
            record.status,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.url
        );
        shown += 1;
    }
    println!("\n{} / {} domains", format_number(shown), format_number(total));
}

pub fn print_stats(stats: &CollectionStats, store: &str) {
    println!("\n--- Collection ({store}) ---");
    println!("Total domains: {}", format_number(stats.total));
    println!("Pending: {}", format_number(stats.pending));
    println!(
        "Copied: {} ({}%)",
        format_number(stats.copied),
        stats.copied_percent
    );
}

pub fn print_summary(summary: &SyncSummary) {
    println!(
        "\nAdded {} new domains, skipped {} duplicates, {} total",
        format_number(summary.added),
        format_number(summary.skipped),
        format_number(summary.total)
    );
    match summary.last_sync {
        Some(at) => println!("Last sync: {}", at.format("%B %-d, %Y %H:%M:%S UTC")),
        None => println!("Not synced"),
    }
}

/// Notices go to stderr so stdout stays usable in pipes.
pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        let tag = match notice.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
        };
        eprintln!("[{tag}] {}", notice.message);
    }
}
