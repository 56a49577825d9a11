use crate::core::{Pipeline, RunSummary, UserRecord};
use crate::utils::error::Result;
use std::fmt;

/// Lifecycle of one run. Errors while `Validating` end the run before
/// `Processing` is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Validating,
    Processing,
    Reported,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Processing => "processing",
            Self::Reported => "reported",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub summary: RunSummary,
    pub report_path: Option<String>,
    /// Set when the failure report could not be written; the run itself
    /// still completed.
    pub report_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Preview {
    pub total: usize,
    /// First rows, each with the URL its deletion request would target.
    pub sample: Vec<(UserRecord, Option<String>)>,
}

pub const PREVIEW_ROWS: usize = 5;

pub struct BulkDeleteEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BulkDeleteEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RunReport> {
        let mut state = RunState::Idle;
        tracing::info!("Starting bulk delete run");

        transition(&mut state, RunState::Validating);
        let records = self.pipeline.extract().await.inspect_err(|e| {
            tracing::error!("❌ Run stopped while {}: {}", state, e);
        })?;

        transition(&mut state, RunState::Processing);
        let summary = self.pipeline.transform(records).await?;

        let (report_path, report_error) = match self.pipeline.load(&summary).await {
            Ok(path) => (path, None),
            Err(e) => {
                tracing::warn!("⚠️ Could not write failure report: {}", e);
                (None, Some(e.to_string()))
            }
        };
        transition(&mut state, RunState::Reported);

        tracing::info!(
            "🏁 {} ({} failed) in {}ms",
            summary.success_message(),
            summary.failures.len(),
            summary.elapsed().num_milliseconds()
        );

        Ok(RunReport {
            summary,
            report_path,
            report_error,
        })
    }

    /// Runs validation only and returns the first rows; nothing is deleted.
    pub async fn preview(&self) -> Result<Preview> {
        let records = self.pipeline.extract().await?;
        let sample = records
            .iter()
            .take(PREVIEW_ROWS)
            .map(|record| {
                let target = self.pipeline.request_target(&record.user_id);
                (record.clone(), target)
            })
            .collect();

        Ok(Preview {
            total: records.len(),
            sample,
        })
    }
}

fn transition(state: &mut RunState, next: RunState) {
    tracing::debug!("Run state: {} -> {}", state, next);
    *state = next;
}
