pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{FoursquareSession, LocalStorage};
pub use app::pipelines::FetchPipeline;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::Settings;
pub use core::{
    etl::EtlEngine,
    migration::{MigrationRun, ProgressFiles, RunOutcome},
};
pub use utils::error::{RefileError, Result};
