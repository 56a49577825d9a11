pub mod engine;

pub use crate::domain::model::{DeletionOutcome, RunSummary, UserRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ProgressSink, Storage, UserDirectory};
pub use crate::utils::error::Result;
