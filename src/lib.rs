pub mod analysis;
pub mod args;
pub mod cli;
pub mod collection;
pub mod domain;
pub mod gateway;
pub mod record;
pub mod report;
pub mod session;
pub mod settings;
pub mod stats;
pub mod utils;

pub use analysis::{analyze, Analysis, AnalysisColumn};
pub use args::Args;
pub use collection::{DomainCollection, DomainFilter};
pub use domain::normalize_domain;
pub use gateway::{open_gateway, Backend, MissingDataPolicy, SyncError, SyncGateway};
pub use record::{DomainRecord, DomainStatus};
pub use session::{SavePolicy, Session};
pub use settings::Settings;
pub use stats::{CollectionStats, SyncSummary};
