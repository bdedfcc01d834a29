//! Command dispatch for the `domainsift` binary.
//!
//! [`execute`] runs one parsed [`Command`] against a loaded [`Session`] and
//! writes any unsaved changes back when the run ends, unless `--no-save` is
//! set.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::info;

use crate::args::{Command, FilterArgs};
use crate::collection::DomainFilter;
use crate::gateway::open_gateway;
use crate::record::DomainStatus;
use crate::report;
use crate::session::Session;
use crate::settings::Settings;
use crate::stats::SyncSummary;

/// Reads a whole input file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read input file {:?}", path))
    }
}

fn to_filter(args: &FilterArgs) -> DomainFilter {
    DomainFilter {
        search: args.search.clone(),
        status: args.status,
    }
}

pub fn execute(session: &mut Session, command: &Command, settings: &Settings) -> Result<()> {
    match command {
        Command::Analyze { input } => {
            let text = read_input(input)?;
            report::print_analysis(session.analyze(&text));
        }
        Command::Import { input, dry_run } => {
            let text = read_input(input)?;
            report::print_analysis(session.analyze(&text));
            if *dry_run {
                return Ok(());
            }

            let skipped = session.analysis().duplicates.len();
            let added = session.append_unique();
            if settings.persist {
                session.sync_if_dirty()?;
            }

            report::print_summary(&SyncSummary {
                total: session.collection().len(),
                added,
                skipped,
                last_sync: session.last_sync(),
            });
        }
        Command::List { filter } => {
            let filter = to_filter(filter);
            report::print_records(
                session.collection().filtered(&filter),
                session.collection().len(),
            );
        }
        Command::Export {
            filter,
            mark_copied,
        } => {
            let filter = to_filter(filter);
            let text = session.collection().export(&filter);
            if !text.is_empty() {
                println!("{text}");
            }

            if *mark_copied {
                let ids: Vec<String> = session
                    .collection()
                    .filtered(&filter)
                    .map(|record| record.id.clone())
                    .collect();
                let changed =
                    session.set_status_many(ids.iter().map(String::as_str), DomainStatus::Copied)?;
                info!(action = "export", component = "cli", exported = ids.len(), changed, "Marked exported domains as copied");
            }
        }
        Command::Remove { id } => {
            if !session.remove_domain(id) {
                eprintln!("No domain with id {id}");
            }
        }
        Command::Edit { id, url } => {
            if !session.update_domain(id, url.trim()) {
                eprintln!("No domain with id {id}");
            }
        }
        Command::Status { id, status } => {
            if !session.set_status(id, *status)? {
                eprintln!("No domain with id {id}");
            }
        }
        Command::Stats => {
            report::print_stats(&session.stats(), &session.store());
        }
        Command::Sync => {
            session.sync()?;
        }
        Command::Transfer { to, to_store } => {
            let target_path = to_store.clone().unwrap_or_else(|| to.default_store());
            let target = open_gateway(*to, target_path, settings.on_missing);
            target
                .save_all(session.collection().records())
                .with_context(|| format!("Failed to write {}", target.describe()))?;
            println!(
                "Copied {} domains from {} to {}",
                session.collection().len(),
                session.store(),
                target.describe()
            );
        }
    }

    if settings.persist {
        session.sync_if_dirty()?;
    } else if session.has_unsaved_changes() {
        eprintln!("Changes kept in memory only (--no-save)");
    }
    Ok(())
}
