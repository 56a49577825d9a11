pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};

pub use adapters::ScimClient;
pub use app::pipelines::bulk_delete::BulkDeletePipeline;
pub use app::progress::{LogProgress, NoProgress};
pub use core::engine::{BulkDeleteEngine, Preview, RunReport, RunState};
pub use domain::model::{ApiToken, Credentials, DeletionOutcome, RunSummary, UserRecord};
pub use utils::error::{DeleteError, Result};
