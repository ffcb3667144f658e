//! 外部用户数据源

use reqwest::header::AUTHORIZATION;
use tracing::debug;

use super::model::{NewUser, SourcePage};
use crate::config::SourceConfig;
use crate::core::error::{Error, Result};

/// 对第三方用户接口的一次性 GET，不分页不重试
#[derive(Debug, Clone)]
pub struct UserSource {
    client: reqwest::Client,
    url: String,
    api_token: Option<String>,
}

impl UserSource {
    pub fn new(config: &SourceConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &SourceConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            api_token: config.api_token.clone(),
        }
    }

    pub async fn fetch(&self) -> Result<Vec<NewUser>> {
        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.api_token {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus(status));
        }

        let page: SourcePage = response.json().await?;
        debug!(count = page.data.len(), "fetched users from upstream");
        Ok(page.data)
    }
}
