//! BaniDB verse provider.

use async_trait::async_trait;
use reqwest::{Client, Url, header::ACCEPT};
use serde_json::Value;
use tracing::debug;

use crate::application::ports::{AngProvider, ProviderError};
use crate::config::ProviderSettings;
use crate::domain::ang::AngNumber;

use super::error::InfraError;

#[derive(Clone, Debug)]
pub struct BaniDbClient {
    client: Client,
    base: Url,
}

impl BaniDbClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;

        Ok(Self {
            client,
            base: settings.base_url.clone(),
        })
    }

    pub fn ang_url(&self, ang: AngNumber) -> Result<Url, ProviderError> {
        self.base
            .join(&format!("angs/{ang}"))
            .map_err(ProviderError::transport)
    }
}

#[async_trait]
impl AngProvider for BaniDbClient {
    async fn fetch_ang(&self, ang: AngNumber) -> Result<Value, ProviderError> {
        let url = self.ang_url(ang)?;
        debug!(url = %url, "fetching ang from verse provider");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ProviderError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(ProviderError::decode)
    }
}
