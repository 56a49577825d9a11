use crate::adapters::ScimClient;
use crate::app::collector::parse_user_records;
use crate::app::processor::BatchProcessor;
use crate::app::reporter::Reporter;
use crate::core::{ConfigProvider, Pipeline, ProgressSink, RunSummary, Storage, UserRecord};
use crate::domain::model::Credentials;
use crate::utils::error::{DeleteError, Result};

/// Input collection, deletion and reporting for one run.
pub struct BulkDeletePipeline<S: Storage, C: ConfigProvider, P: ProgressSink> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) progress: P,
}

impl<S: Storage, C: ConfigProvider, P: ProgressSink> BulkDeletePipeline<S, C, P> {
    pub fn new(storage: S, config: C, progress: P) -> Self {
        Self {
            storage,
            config,
            progress,
        }
    }

    fn credentials(&self) -> Result<Credentials> {
        Credentials::new(self.config.api_token().clone(), self.config.org_domain())
    }

    fn directory(&self, credentials: &Credentials) -> Result<ScimClient> {
        match self.config.base_url() {
            Some(base_url) => ScimClient::with_base_url(base_url, credentials.api_token().clone()),
            None => ScimClient::new(credentials),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, P: ProgressSink> Pipeline for BulkDeletePipeline<S, C, P> {
    async fn extract(&self) -> Result<Vec<UserRecord>> {
        let credentials = self.credentials()?;
        self.directory(&credentials)?;

        let input = self.config.input_file();
        tracing::info!("📥 Reading user IDs from: {}", input);

        let content = self
            .storage
            .read_file(input)
            .await
            .map_err(|e| match e {
                DeleteError::Io(source) => DeleteError::Input {
                    path: input.to_string(),
                    source,
                },
                other => other,
            })?;

        let records = parse_user_records(&content)?;
        tracing::info!("📊 Found {} user IDs", records.len());
        Ok(records)
    }

    async fn transform(&self, records: Vec<UserRecord>) -> Result<RunSummary> {
        let credentials = self.credentials()?;
        let directory = self.directory(&credentials)?;

        tracing::info!(
            "🚀 Deleting {} embed users from {}",
            records.len(),
            self.config.base_url().unwrap_or(credentials.org_domain())
        );

        let processor = BatchProcessor::new(&directory, &self.progress);
        Ok(processor.run(records).await)
    }

    async fn load(&self, summary: &RunSummary) -> Result<Option<String>> {
        Reporter::new(&self.storage, self.config.report_file())
            .save(summary)
            .await
    }

    fn request_target(&self, user_id: &str) -> Option<String> {
        let credentials = self.credentials().ok()?;
        let directory = self.directory(&credentials).ok()?;
        directory.user_url(user_id).ok().map(String::from)
    }
}
