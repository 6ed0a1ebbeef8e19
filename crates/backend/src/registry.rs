//! Provider registry lookups through the backend's NPI proxy.

use crate::client::ApiClient;
use async_trait::async_trait;
use lmn_core::{AuthProvider, CollaboratorError, CoreConfig, ProviderRegistry, RegistryRecord};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RegistryResponse {
    results: Vec<RegistryResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RegistryResult {
    number: String,
    organization_name: String,
    basic: Option<RegistryBasic>,
    addresses: Vec<RegistryAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RegistryBasic {
    first_name: String,
    last_name: String,
    credential: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct RegistryAddress {
    address_1: String,
    city: String,
    state: String,
    postal_code: String,
    telephone_number: String,
}

impl From<RegistryResult> for RegistryRecord {
    /// Individuals are named `First Last, Credential`; organisations by their registered name.
    fn from(result: RegistryResult) -> Self {
        let address = result.addresses.first().cloned().unwrap_or_default();
        let (name, first_name, last_name) = match result.basic {
            Some(basic) => {
                let mut name = format!("{} {}", basic.first_name, basic.last_name);
                if !basic.credential.is_empty() {
                    name = format!("{name}, {}", basic.credential);
                }
                (name, basic.first_name, basic.last_name)
            }
            None => (result.organization_name, String::new(), String::new()),
        };
        Self {
            number: result.number,
            name,
            first_name,
            last_name,
            address: address.address_1,
            city: address.city,
            state: address.state,
            zip: address.postal_code,
            phone: address.telephone_number,
        }
    }
}

pub struct HttpRegistry {
    api: ApiClient,
}

impl HttpRegistry {
    pub fn new(
        cfg: &CoreConfig,
        auth: Option<Arc<dyn AuthProvider>>,
    ) -> Result<Self, CollaboratorError> {
        Ok(Self {
            api: ApiClient::new(cfg, auth)?,
        })
    }

    async fn lookup(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Vec<RegistryRecord>, CollaboratorError> {
        let response: RegistryResponse = self.api.get_json_with_query(segments, query).await?;
        Ok(response.results.into_iter().map(RegistryRecord::from).collect())
    }
}

#[async_trait]
impl ProviderRegistry for HttpRegistry {
    async fn lookup_by_name(&self, name: &str) -> Result<Vec<RegistryRecord>, CollaboratorError> {
        self.lookup(&["npi", "organization"], &[("name", name)]).await
    }

    async fn lookup_by_number(&self, number: &str) -> Result<Vec<RegistryRecord>, CollaboratorError> {
        self.lookup(&["npi", "number", number], &[]).await
    }

    async fn lookup_by_provider_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<RegistryRecord>, CollaboratorError> {
        self.lookup(
            &["npi", "provider"],
            &[("firstName", first_name), ("lastName", last_name)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_payload_mapping() {
        let response: RegistryResponse = serde_json::from_str(
            r#"{"results":[
                {"organization_name":"Acme Hospital","number":"0987654321",
                 "addresses":[{"address_1":"456 Oak Ave","city":"Somewhere","state":"NY","postal_code":"54321","telephone_number":"555-987-6543"}]},
                {"basic":{"first_name":"Jane","last_name":"Roe","credential":"MD"},"number":"1122334455","addresses":[]}
            ]}"#,
        )
        .unwrap();
        let records: Vec<RegistryRecord> =
            response.results.into_iter().map(RegistryRecord::from).collect();

        assert_eq!(records[0].name, "Acme Hospital");
        assert_eq!(records[0].zip, "54321");
        assert_eq!(records[1].name, "Jane Roe, MD");
        assert_eq!(records[1].first_name, "Jane");
        assert!(records[1].address.is_empty());
    }

    #[tokio::test]
    async fn test_number_lookup_rejects_dot_segment() {
        let cfg = CoreConfig::new(
            "http://127.0.0.1:9/api".into(),
            std::time::Duration::from_secs(2),
            false,
            lmn_core::WizardPolicy::Permissive,
            "exports".into(),
        )
        .unwrap();
        let registry = HttpRegistry::new(&cfg, None).unwrap();
        assert!(matches!(
            registry.lookup_by_number("..").await,
            Err(CollaboratorError::InvalidRequest(_))
        ));
    }
}
