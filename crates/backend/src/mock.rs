//! In-memory demo data, used directly in mock mode and as the fallback catalogue when the
//! backend is unreachable.

use async_trait::async_trait;
use lmn_core::{
    CollaboratorError, EhrConnector, LetterBackend, Organization, OrganizationLocation, Product,
    ProviderRegistry, RegistryRecord, Template, TemplateType, UserProfile,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

const MOCK_AUTH_URL: &str = "https://fhir.epic.com/interconnect-fhir-oauth/oauth2/authorize";

pub struct MockBackend {
    user: RwLock<UserProfile>,
    organization: RwLock<Organization>,
    ehr_connected: AtomicBool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            user: RwLock::new(mock_user()),
            organization: RwLock::new(mock_organization()),
            ehr_connected: AtomicBool::new(false),
        }
    }

    pub fn products() -> Vec<Product> {
        vec![
            Product {
                id: "1".into(),
                name: "Product A".into(),
                description: "Description for Product A".into(),
            },
            Product {
                id: "2".into(),
                name: "Product B".into(),
                description: "Description for Product B".into(),
            },
        ]
    }

    /// The two demo templates, tagged with `product_id`.
    pub fn templates(product_id: &str) -> Vec<Template> {
        vec![
            Template {
                id: "1".into(),
                name: "Letter of Medical Necessity".into(),
                product_id: product_id.into(),
                is_default: true,
                template_type: TemplateType::MedicalNecessity,
                intro: "I am writing to request coverage of the prescribed treatment for my patient."
                    .into(),
                rationale: "Based on the clinical history above, this treatment is medically necessary."
                    .into(),
                version: "1.0".into(),
                content: String::new(),
            },
            Template {
                id: "2".into(),
                name: "Letter of Appeal".into(),
                product_id: product_id.into(),
                is_default: true,
                template_type: TemplateType::Appeal,
                intro: "I am writing to appeal the denial of coverage for my patient's treatment."
                    .into(),
                rationale: "The denial should be reconsidered in light of the documented treatment history."
                    .into(),
                version: "1.0".into(),
                content: String::new(),
            },
        ]
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn mock_user() -> UserProfile {
    UserProfile {
        id: "1".into(),
        email: "doctor@example.com".into(),
        first_name: "John".into(),
        last_name: "Doe".into(),
        title: "MD".into(),
        npi_number: "1234567890".into(),
        practice_id: "1".into(),
        profile_completed: true,
    }
}

fn mock_organization() -> Organization {
    Organization {
        id: "1".into(),
        name: "Medical Center".into(),
        npi: String::new(),
        locations: vec![OrganizationLocation {
            address: "123 Healthcare Ave".into(),
            city: "Medical City".into(),
            state: "MC".into(),
            zip: "12345".into(),
            phone: "(555) 123-4567".into(),
        }],
        logo: "https://example.com/logo.png".into(),
    }
}

fn poisoned() -> CollaboratorError {
    CollaboratorError::Unavailable("mock store lock poisoned".into())
}

#[async_trait]
impl LetterBackend for MockBackend {
    async fn get_products(&self) -> Result<Vec<Product>, CollaboratorError> {
        Ok(Self::products())
    }

    async fn get_templates(&self, product_id: &str) -> Result<Vec<Template>, CollaboratorError> {
        Ok(Self::templates(product_id))
    }

    async fn get_current_user(&self) -> Result<UserProfile, CollaboratorError> {
        self.user.read().map(|user| user.clone()).map_err(|_| poisoned())
    }

    async fn get_organization(&self, org_id: &str) -> Result<Organization, CollaboratorError> {
        let organization = self.organization.read().map_err(|_| poisoned())?;
        if organization.id == org_id {
            Ok(organization.clone())
        } else {
            Err(CollaboratorError::NotFound(format!("organization {org_id}")))
        }
    }

    async fn get_organization_providers(
        &self,
        org_id: &str,
    ) -> Result<Vec<UserProfile>, CollaboratorError> {
        let user = self.user.read().map_err(|_| poisoned())?;
        if user.practice_id == org_id {
            Ok(vec![user.clone()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<(), CollaboratorError> {
        let mut user = self.user.write().map_err(|_| poisoned())?;
        *user = profile.clone();
        Ok(())
    }

    async fn create_organization(
        &self,
        organization: &Organization,
    ) -> Result<Organization, CollaboratorError> {
        let mut stored = self.organization.write().map_err(|_| poisoned())?;
        *stored = organization.clone();
        if stored.id.is_empty() {
            stored.id = "1".into();
        }
        Ok(stored.clone())
    }

    async fn update_organization(&self, organization: &Organization) -> Result<(), CollaboratorError> {
        let mut stored = self.organization.write().map_err(|_| poisoned())?;
        if stored.id != organization.id {
            return Err(CollaboratorError::NotFound(format!(
                "organization {}",
                organization.id
            )));
        }
        *stored = organization.clone();
        Ok(())
    }
}

#[async_trait]
impl ProviderRegistry for MockBackend {
    async fn lookup_by_name(&self, name: &str) -> Result<Vec<RegistryRecord>, CollaboratorError> {
        Ok(vec![
            RegistryRecord {
                number: "1234567890".into(),
                name: format!("{name} Medical Center"),
                address: "123 Main St".into(),
                city: "Anytown".into(),
                state: "CA".into(),
                zip: "12345".into(),
                phone: "555-123-4567".into(),
                ..Default::default()
            },
            RegistryRecord {
                number: "0987654321".into(),
                name: format!("{name} Hospital"),
                address: "456 Oak Ave".into(),
                city: "Somewhere".into(),
                state: "NY".into(),
                zip: "54321".into(),
                phone: "555-987-6543".into(),
                ..Default::default()
            },
        ])
    }

    async fn lookup_by_number(&self, number: &str) -> Result<Vec<RegistryRecord>, CollaboratorError> {
        Ok(vec![RegistryRecord {
            number: number.into(),
            name: "Sample Organization".into(),
            address: "555 Medical Plaza".into(),
            city: "Healthville".into(),
            state: "WA".into(),
            zip: "13579".into(),
            phone: "555-555-5555".into(),
            ..Default::default()
        }])
    }

    async fn lookup_by_provider_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<RegistryRecord>, CollaboratorError> {
        let record = |number: &str, credential: &str, address: &str, city: &str, state: &str, zip: &str, phone: &str| RegistryRecord {
            number: number.into(),
            name: format!("{first_name} {last_name}, {credential}"),
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
            phone: phone.into(),
        };
        Ok(vec![
            record("1122334455", "MD", "789 Pine St", "Elsewhere", "TX", "67890", "555-321-7654"),
            record("5544332211", "DO", "321 Elm Blvd", "Nowhere", "FL", "09876", "555-765-4321"),
        ])
    }
}

#[async_trait]
impl EhrConnector for MockBackend {
    async fn is_connected(&self) -> Result<bool, CollaboratorError> {
        Ok(self.ehr_connected.load(Ordering::SeqCst))
    }

    async fn initiate_connect(&self) -> Result<String, CollaboratorError> {
        Ok(MOCK_AUTH_URL.into())
    }

    async fn disconnect(&self) -> Result<(), CollaboratorError> {
        self.ehr_connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn handle_callback(&self, code: &str, _state: &str) -> Result<(), CollaboratorError> {
        if code.is_empty() {
            return Err(CollaboratorError::Unauthenticated);
        }
        self.ehr_connected.store(true, Ordering::SeqCst);
        Ok(())
    }
}
