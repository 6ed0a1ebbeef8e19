//! REST implementation of [`LetterBackend`].

use crate::client::ApiClient;
use crate::mock::MockBackend;
use async_trait::async_trait;
use lmn_core::{
    AuthProvider, CollaboratorError, CoreConfig, LetterBackend, Organization, Product, Template,
    TemplateType, UserProfile,
};
use reqwest::Method;
use serde::Deserialize;
use std::sync::Arc;

/// Template as served by the backend, which names the display title `title`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TemplatePayload {
    id: String,
    title: String,
    product_id: String,
    is_default: bool,
    #[serde(rename = "type")]
    template_type: TemplateType,
    intro: String,
    rationale: String,
    version: String,
    content: String,
}

impl From<TemplatePayload> for Template {
    fn from(payload: TemplatePayload) -> Self {
        Self {
            id: payload.id,
            name: payload.title,
            product_id: payload.product_id,
            is_default: payload.is_default,
            template_type: payload.template_type,
            intro: payload.intro,
            rationale: payload.rationale,
            version: payload.version,
            content: payload.content,
        }
    }
}

pub struct HttpBackend {
    api: ApiClient,
    use_mock_data: bool,
}

impl HttpBackend {
    pub fn new(
        cfg: &CoreConfig,
        auth: Option<Arc<dyn AuthProvider>>,
    ) -> Result<Self, CollaboratorError> {
        Ok(Self {
            api: ApiClient::new(cfg, auth)?,
            use_mock_data: cfg.use_mock_data(),
        })
    }

    /// Mock data stands in for an unreachable backend, never for a malformed request.
    fn falls_back(&self, err: &CollaboratorError) -> bool {
        self.use_mock_data && !matches!(err, CollaboratorError::InvalidRequest(_))
    }
}

#[async_trait]
impl LetterBackend for HttpBackend {
    async fn get_products(&self) -> Result<Vec<Product>, CollaboratorError> {
        match self.api.get_json(&["products"]).await {
            Ok(products) => Ok(products),
            Err(err) if self.falls_back(&err) => {
                tracing::info!(error = %err, "using mock data for products");
                Ok(MockBackend::products())
            }
            Err(err) => Err(err),
        }
    }

    async fn get_templates(&self, product_id: &str) -> Result<Vec<Template>, CollaboratorError> {
        let path = ["templates", "byProduct", product_id];
        match self.api.get_json::<Vec<TemplatePayload>>(&path).await {
            Ok(payloads) => Ok(payloads.into_iter().map(Template::from).collect()),
            Err(err) if self.falls_back(&err) => {
                tracing::info!(product_id, error = %err, "using mock data for templates");
                Ok(MockBackend::templates(product_id))
            }
            Err(err) => Err(err),
        }
    }

    async fn get_current_user(&self) -> Result<UserProfile, CollaboratorError> {
        self.api.get_json(&["users", "me"]).await
    }

    async fn get_organization(&self, org_id: &str) -> Result<Organization, CollaboratorError> {
        self.api.get_json(&["organizations", org_id]).await
    }

    async fn get_organization_providers(
        &self,
        org_id: &str,
    ) -> Result<Vec<UserProfile>, CollaboratorError> {
        self.api
            .get_json(&["organizations", org_id, "providers"])
            .await
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<(), CollaboratorError> {
        self.api
            .send_unit(Method::PUT, &["users", "me"], Some(profile))
            .await
    }

    async fn create_organization(
        &self,
        organization: &Organization,
    ) -> Result<Organization, CollaboratorError> {
        self.api
            .send_json(Method::POST, &["organizations"], organization)
            .await
    }

    async fn update_organization(&self, organization: &Organization) -> Result<(), CollaboratorError> {
        self.api
            .send_unit(
                Method::PUT,
                &["organizations", organization.id.as_str()],
                Some(organization),
            )
            .await
    }
}
