//! EHR connection management through the backend's OAuth endpoints.

use crate::client::ApiClient;
use async_trait::async_trait;
use lmn_core::{AuthProvider, CollaboratorError, CoreConfig, EhrConnector};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionStatus {
    is_connected: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizationUrl {
    authorization_url: String,
}

#[derive(Debug, Serialize)]
struct Callback<'a> {
    code: &'a str,
    state: &'a str,
}

pub struct HttpEhrConnector {
    api: ApiClient,
}

impl HttpEhrConnector {
    pub fn new(
        cfg: &CoreConfig,
        auth: Option<Arc<dyn AuthProvider>>,
    ) -> Result<Self, CollaboratorError> {
        Ok(Self {
            api: ApiClient::new(cfg, auth)?,
        })
    }
}

#[async_trait]
impl EhrConnector for HttpEhrConnector {
    /// A failed status check reads as "not connected".
    async fn is_connected(&self) -> Result<bool, CollaboratorError> {
        match self.api.get_json::<ConnectionStatus>(&["epic", "status"]).await {
            Ok(status) => Ok(status.is_connected),
            Err(err) => {
                tracing::warn!(error = %err, "EHR status check failed");
                Ok(false)
            }
        }
    }

    async fn initiate_connect(&self) -> Result<String, CollaboratorError> {
        let response: AuthorizationUrl = self.api.get_json(&["epic", "auth-url"]).await?;
        if response.authorization_url.is_empty() {
            return Err(CollaboratorError::Decode(
                "empty EHR authorization URL".into(),
            ));
        }
        Ok(response.authorization_url)
    }

    async fn disconnect(&self) -> Result<(), CollaboratorError> {
        self.api
            .send_unit::<()>(Method::POST, &["epic", "disconnect"], None)
            .await
    }

    async fn handle_callback(&self, code: &str, state: &str) -> Result<(), CollaboratorError> {
        self.api
            .send_unit(Method::POST, &["epic", "callback"], Some(&Callback { code, state }))
            .await
    }
}
