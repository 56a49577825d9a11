use crate::domain::model::{ApiToken, Credentials, UserRecord};
use crate::domain::ports::{DeleteResponse, UserDirectory};
use crate::utils::error::{DeleteError, Result};
use crate::utils::validation::validate_url;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use url::Url;

const EMBED_USERS_PATH: [&str; 5] = ["api", "scim", "v2", "embed", "users"];

/// SCIM embed-user endpoint of one Omni organization.
#[derive(Debug, Clone)]
pub struct ScimClient {
    client: Client,
    base_url: Url,
    api_token: ApiToken,
}

impl ScimClient {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Self::with_base_url(&credentials.base_url(), credentials.api_token().clone())
    }

    pub fn with_base_url(base_url: &str, api_token: ApiToken) -> Result<Self> {
        validate_url("base_url", base_url)?;
        let base_url = Url::parse(base_url).map_err(|e| DeleteError::InvalidConfigValue {
            field: "base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: Client::new(),
            base_url,
            api_token,
        })
    }

    /// `{base}/api/scim/v2/embed/users/{user_id}`, with the identifier
    /// percent-encoded as a single path segment.
    pub fn user_url(&self, user_id: &str) -> Result<Url> {
        if let Some(reason) = UserRecord::unusable_id_reason(user_id) {
            return Err(DeleteError::InvalidUserId {
                user_id: user_id.to_string(),
                reason: reason.to_string(),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DeleteError::config(format!("{} cannot be used as a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(EMBED_USERS_PATH)
            .push(user_id);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl UserDirectory for ScimClient {
    async fn delete_user(&self, user_id: &str) -> Result<DeleteResponse> {
        let url = self.user_url(user_id)?;
        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_token.expose()))
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!("SCIM response status: {}", status);

        // the status is already known; a body that can't be read becomes the error text
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Could not read response body (status {}): {}", status, e);
                format!("failed to read response body: {}", e)
            }
        };
        Ok(DeleteResponse { status, body })
    }
}
