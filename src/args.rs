use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::gateway::{Backend, MissingDataPolicy};
use crate::record::DomainStatus;
use crate::session::SavePolicy;

#[derive(Parser, Debug)]
#[command(
    name = "domainsift",
    about = "Deduplicate pasted domain lists against a stored collection",
    version,
    long_about = None
)]
pub struct Args {
    /// Storage backend holding the collection
    #[arg(long, global = true, value_enum, env = "DOMAINSIFT_BACKEND", default_value_t = Backend::Json)]
    pub backend: Backend,

    /// Path of the stored collection (defaults to domains.json or domains.db)
    #[arg(long, global = true, env = "DOMAINSIFT_STORE")]
    pub store: Option<PathBuf>,

    /// What to do when the store holds no collection yet
    #[arg(long, global = true, value_enum, env = "DOMAINSIFT_ON_MISSING", default_value_t = MissingDataPolicy::Empty)]
    pub on_missing: MissingDataPolicy,

    /// When status changes are written to the store
    #[arg(long, global = true, value_enum, env = "DOMAINSIFT_SAVE_POLICY", default_value_t = SavePolicy::OnStatusChange)]
    pub save_policy: SavePolicy,

    /// Keep changes in memory only, unless the save policy writes them
    #[arg(long, global = true)]
    pub no_save: bool,

    /// Number of worker threads used to normalize input
    #[arg(short, long, global = true, env = "DOMAINSIFT_WORKERS")]
    pub workers: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show which lines are new and which are duplicates, without storing anything
    Analyze {
        /// Input file with one domain per line, or - for stdin
        input: PathBuf,
    },

    /// Analyze input and append the new unique domains to the collection
    Import {
        /// Input file with one domain per line, or - for stdin
        input: PathBuf,

        /// Stop after the analysis
        #[arg(long)]
        dry_run: bool,
    },

    /// List stored domains
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print matching domains one per line
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Mark every exported domain as copied
        #[arg(long)]
        mark_copied: bool,
    },

    /// Delete a domain by id
    Remove { id: String },

    /// Replace the url of a domain
    Edit { id: String, url: String },

    /// Set the status of a domain
    Status { id: String, status: DomainStatus },

    /// Show collection statistics
    Stats,

    /// Write the collection back to the store
    Sync,

    /// Copy the whole collection into another store
    Transfer {
        /// Target backend
        #[arg(long, value_enum)]
        to: Backend,

        /// Target path (defaults to the backend's default file)
        #[arg(long)]
        to_store: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive substring to match
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show domains with this status
    #[arg(long)]
    pub status: Option<DomainStatus>,
}
