//! External collaborators consumed by the letter wizard.
//!
//! Authentication, the REST backend, the provider registry and the EHR integration all live
//! outside this crate. The wizard only sees the traits below; concrete HTTP and in-memory
//! implementations are provided by `lmn-backend`.
//!
//! Every method is async and returns [`CollaboratorError`] on failure. Callers decide whether a
//! failure is fatal: in practice the wizard logs and degrades (see the step components).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("no response received from server: {0}")]
    Network(String),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("not authenticated")]
    Unauthenticated,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The request could not be built, for example an id that is not a usable path segment.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// A product a letter can be written for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Kind of letter a template produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    #[default]
    MedicalNecessity,
    Appeal,
}

/// Externally supplied letter boilerplate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub product_id: String,
    pub is_default: bool,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub intro: String,
    pub rationale: String,
    pub version: String,
    pub content: String,
}

/// An authenticated clinician's profile, also used for roster entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub npi_number: String,
    pub practice_id: String,
    pub profile_completed: bool,
}

impl UserProfile {
    /// Missing any of the fields a letter signature needs.
    pub fn is_incomplete(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.title,
            &self.npi_number,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationLocation {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
}

/// A clinician's organisation (practice).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub npi: String,
    pub locations: Vec<OrganizationLocation>,
    pub logo: String,
}

/// Candidate organisation or provider returned by the provider registry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryRecord {
    pub number: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
}

/// Products, templates, profiles and organisations.
#[async_trait]
pub trait LetterBackend: Send + Sync {
    async fn get_products(&self) -> Result<Vec<Product>, CollaboratorError>;

    async fn get_templates(&self, product_id: &str) -> Result<Vec<Template>, CollaboratorError>;

    async fn get_current_user(&self) -> Result<UserProfile, CollaboratorError>;

    async fn get_organization(&self, org_id: &str) -> Result<Organization, CollaboratorError>;

    async fn get_organization_providers(
        &self,
        org_id: &str,
    ) -> Result<Vec<UserProfile>, CollaboratorError>;

    async fn update_profile(&self, profile: &UserProfile) -> Result<(), CollaboratorError>;

    async fn create_organization(
        &self,
        organization: &Organization,
    ) -> Result<Organization, CollaboratorError>;

    async fn update_organization(&self, organization: &Organization)
        -> Result<(), CollaboratorError>;
}

/// Third-party provider registry lookups.
#[async_trait]
pub trait ProviderRegistry: Send + Sync {
    async fn lookup_by_name(&self, name: &str) -> Result<Vec<RegistryRecord>, CollaboratorError>;

    async fn lookup_by_number(&self, number: &str)
        -> Result<Vec<RegistryRecord>, CollaboratorError>;

    async fn lookup_by_provider_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<RegistryRecord>, CollaboratorError>;
}

/// Identity provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self) -> Result<(), CollaboratorError>;

    async fn logout(&self) -> Result<(), CollaboratorError>;

    /// Current bearer token, or `None` when signed out.
    async fn access_token(&self) -> Option<String>;

    /// Identity of the signed-in user, or `None` when signed out.
    fn current_identity(&self) -> Option<String>;
}

/// EHR integration used to prefill provider data.
#[async_trait]
pub trait EhrConnector: Send + Sync {
    async fn is_connected(&self) -> Result<bool, CollaboratorError>;

    /// Returns the authorisation URL the user should be sent to.
    async fn initiate_connect(&self) -> Result<String, CollaboratorError>;

    async fn disconnect(&self) -> Result<(), CollaboratorError>;

    async fn handle_callback(&self, code: &str, state: &str) -> Result<(), CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_deserializes_type_field() {
        let template: Template = serde_json::from_str(
            r#"{"id":"2","name":"Letter of Appeal","type":"appeal","intro":"Dear Sir"}"#,
        )
        .unwrap();
        assert_eq!(template.template_type, TemplateType::Appeal);
        assert_eq!(template.intro, "Dear Sir");
        assert!(template.rationale.is_empty());
    }

    #[test]
    fn test_user_profile_incomplete() {
        let mut user = UserProfile {
            first_name: "John".into(),
            last_name: "Doe".into(),
            title: "MD".into(),
            npi_number: "1234567890".into(),
            ..Default::default()
        };
        assert!(!user.is_incomplete());

        user.npi_number = " ".into();
        assert!(user.is_incomplete());
    }
}
