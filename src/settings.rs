use std::path::PathBuf;

use crate::args::Args;
use crate::gateway::{open_gateway, Backend, MissingDataPolicy, SyncGateway};
use crate::session::SavePolicy;

/// Upper bound for the default worker count.
const MAX_DEFAULT_WORKERS: usize = 8;

/// Resolved runtime configuration, after defaults and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: Backend,
    pub store: PathBuf,
    pub on_missing: MissingDataPolicy,
    pub save_policy: SavePolicy,
    pub persist: bool,
    pub workers: usize,
    pub verbose: bool,
}

impl Settings {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        if args.workers == Some(0) {
            anyhow::bail!("--workers must be greater than 0");
        }

        Ok(Self {
            backend: args.backend,
            store: args
                .store
                .clone()
                .unwrap_or_else(|| args.backend.default_store()),
            on_missing: args.on_missing,
            save_policy: args.save_policy,
            persist: !args.no_save,
            workers: args.workers.unwrap_or_else(default_workers),
            verbose: args.verbose,
        })
    }

    pub fn gateway(&self) -> Box<dyn SyncGateway> {
        open_gateway(self.backend, self.store.clone(), self.on_missing)
    }
}

pub fn default_workers() -> usize {
    std::cmp::min(num_cpus::get(), MAX_DEFAULT_WORKERS)
}
