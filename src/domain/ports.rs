use crate::domain::model::{ApiToken, ProgressEvent, RunSummary, UserRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_token(&self) -> &ApiToken;
    fn org_domain(&self) -> &str;
    fn input_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn report_file(&self) -> &str;
    /// Replaces `https://{org_domain}` when set.
    fn base_url(&self) -> Option<&str>;
}

/// Raw answer of the remote directory to a deletion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Sends exactly one deletion request. `Err` means no status was received.
    async fn delete_user(&self, user_id: &str) -> Result<DeleteResponse>;
}

pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Validates the run inputs and returns the rows to process.
    async fn extract(&self) -> Result<Vec<UserRecord>>;
    async fn transform(&self, records: Vec<UserRecord>) -> Result<RunSummary>;
    /// Persists the failure report, returning its location when one was written.
    async fn load(&self, summary: &RunSummary) -> Result<Option<String>>;

    /// Where the deletion request for `user_id` would be sent, for previews.
    fn request_target(&self, _user_id: &str) -> Option<String> {
        None
    }
}
