//! Step 2: the signing provider and their practice.
//!
//! The step is a small state machine:
//!
//! ```text
//! Loading ──► HasOrganizationData ──┐
//!    │                              ├──► ManualEntry
//!    └──────► NoOrganizationData ───┘
//! ```
//!
//! `Loading` resolves once the roster fetch completes. `ManualEntry` can be forced from any
//! state and is terminal for the session: a roster response arriving afterwards is dropped.

use crate::collaborators::{CollaboratorError, LetterBackend, Organization, UserProfile};
use crate::draft::{Practice, ProviderDetails};
use crate::fetch::{RequestGuard, RequestToken};
use crate::store::DraftStore;
use crate::{LetterError, LetterResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The organisation and its providers, plus the roster entry currently chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub organization: Organization,
    pub providers: Vec<UserProfile>,
    pub selected: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "detail")]
pub enum NoDataReason {
    ProfileIncomplete,
    FetchFailed(String),
}

/// Free-text provider and practice fields used in manual entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualProviderForm {
    pub provider: ProviderDetails,
    pub practice: Practice,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum ProviderState {
    #[default]
    Loading,
    HasOrganizationData(Roster),
    NoOrganizationData {
        reason: NoDataReason,
    },
    ManualEntry(ManualProviderForm),
}

impl ProviderState {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderState::Loading => "loading",
            ProviderState::HasOrganizationData(_) => "hasOrganizationData",
            ProviderState::NoOrganizationData { .. } => "noOrganizationData",
            ProviderState::ManualEntry(_) => "manualEntry",
        }
    }
}

/// Result of fetching the current user's organisation roster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RosterOutcome {
    Loaded {
        user: UserProfile,
        organization: Organization,
        providers: Vec<UserProfile>,
    },
    ProfileIncomplete {
        user: UserProfile,
    },
    Failed(CollaboratorError),
}

impl RosterOutcome {
    /// Fetches the current user, their organisation and its providers.
    ///
    /// A failed providers fetch is not fatal: the roster is left empty.
    pub async fn fetch(backend: &dyn LetterBackend) -> Self {
        let user = match backend.get_current_user().await {
            Ok(user) => user,
            Err(err) => return RosterOutcome::Failed(err),
        };
        if user.is_incomplete() || user.practice_id.trim().is_empty() {
            return RosterOutcome::ProfileIncomplete { user };
        }
        let organization = match backend.get_organization(&user.practice_id).await {
            Ok(organization) => organization,
            Err(err) => return RosterOutcome::Failed(err),
        };
        let providers = match backend.get_organization_providers(&organization.id).await {
            Ok(providers) => providers,
            Err(err) => {
                tracing::warn!(org_id = %organization.id, error = %err, "provider roster fetch failed");
                Vec::new()
            }
        };
        RosterOutcome::Loaded {
            user,
            organization,
            providers,
        }
    }
}

/// Manual-entry form fields, addressed by dotted form names for the practice part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ManualField {
    Title,
    FirstName,
    LastName,
    NpiNumber,
    PracticeName,
    PracticeAddress,
    PracticeCity,
    PracticeState,
    PracticeZip,
    PracticePhone,
}

impl ManualField {
    fn apply(self, form: &mut ManualProviderForm, value: String) {
        let slot = match self {
            ManualField::Title => &mut form.provider.title,
            ManualField::FirstName => &mut form.provider.first_name,
            ManualField::LastName => &mut form.provider.last_name,
            ManualField::NpiNumber => &mut form.provider.npi_number,
            ManualField::PracticeName => &mut form.practice.name,
            ManualField::PracticeAddress => &mut form.practice.address,
            ManualField::PracticeCity => &mut form.practice.city,
            ManualField::PracticeState => &mut form.practice.state,
            ManualField::PracticeZip => &mut form.practice.zip,
            ManualField::PracticePhone => &mut form.practice.phone,
        };
        *slot = value;
    }
}

impl FromStr for ManualField {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "firstName" => Ok(Self::FirstName),
            "lastName" => Ok(Self::LastName),
            "npiNumber" | "npi" => Ok(Self::NpiNumber),
            "practice.name" => Ok(Self::PracticeName),
            "practice.address" => Ok(Self::PracticeAddress),
            "practice.city" => Ok(Self::PracticeCity),
            "practice.state" => Ok(Self::PracticeState),
            "practice.zip" => Ok(Self::PracticeZip),
            "practice.phone" => Ok(Self::PracticePhone),
            other => Err(LetterError::UnknownField(other.to_string())),
        }
    }
}

impl TryFrom<String> for ManualField {
    type Error = LetterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProviderInformation {
    state: ProviderState,
    current_user: Option<UserProfile>,
    guard: RequestGuard,
}

impl ProviderInformation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ProviderState {
        &self.state
    }

    /// The authenticated user, once the roster fetch has reported one.
    pub fn current_user(&self) -> Option<&UserProfile> {
        self.current_user.as_ref()
    }

    /// Starts a fetch. Ignored in `ManualEntry`, which is terminal.
    pub fn begin_load(&mut self) -> Option<RequestToken> {
        if matches!(self.state, ProviderState::ManualEntry(_)) {
            return None;
        }
        self.state = ProviderState::Loading;
        Some(self.guard.issue())
    }

    /// Applies a roster fetch result.
    ///
    /// Returns `false` and leaves everything untouched when `token` is stale or the step has
    /// left `Loading`. When the authenticated user is in the roster they become the default
    /// selection and are copied into the draft together with the practice.
    pub fn resolve(&mut self, store: &mut DraftStore, token: RequestToken, outcome: RosterOutcome) -> bool {
        if !self.guard.is_current(token) || !matches!(self.state, ProviderState::Loading) {
            tracing::warn!(
                token = token.value(),
                state = self.state.name(),
                "discarding stale roster response"
            );
            return false;
        }

        self.state = match outcome {
            RosterOutcome::Loaded {
                user,
                organization,
                providers,
            } => {
                let selected = providers
                    .iter()
                    .find(|provider| provider.id == user.id)
                    .map(|provider| provider.id.clone());
                let practice = Practice::from(&organization);
                let provider = providers
                    .iter()
                    .find(|provider| Some(&provider.id) == selected.as_ref())
                    .map(ProviderDetails::from);
                store.modify(|letter| {
                    if let Some(provider) = provider {
                        letter.provider = Some(provider);
                    }
                    letter.practice = Some(practice);
                });
                self.current_user = Some(user);
                ProviderState::HasOrganizationData(Roster {
                    organization,
                    providers,
                    selected,
                })
            }
            RosterOutcome::ProfileIncomplete { user } => {
                tracing::info!(user_id = %user.id, "profile incomplete, no organisation data");
                self.current_user = Some(user);
                ProviderState::NoOrganizationData {
                    reason: NoDataReason::ProfileIncomplete,
                }
            }
            RosterOutcome::Failed(err) => {
                tracing::warn!(error = %err, "organisation fetch failed");
                ProviderState::NoOrganizationData {
                    reason: NoDataReason::FetchFailed(err.to_string()),
                }
            }
        };
        tracing::debug!(state = self.state.name(), "provider step resolved");
        true
    }

    pub async fn load(&mut self, store: &mut DraftStore, backend: &dyn LetterBackend) {
        let Some(token) = self.begin_load() else {
            return;
        };
        let outcome = RosterOutcome::fetch(backend).await;
        self.resolve(store, token, outcome);
    }

    /// Picks a different roster entry and copies it into the draft.
    pub fn select_provider(&mut self, store: &mut DraftStore, provider_id: &str) -> LetterResult<()> {
        let state = self.state.name();
        let ProviderState::HasOrganizationData(roster) = &mut self.state else {
            return Err(LetterError::InvalidTransition {
                state,
                action: "select a provider",
            });
        };
        let provider = roster
            .providers
            .iter()
            .find(|provider| provider.id == provider_id)
            .map(ProviderDetails::from)
            .ok_or_else(|| LetterError::UnknownProvider(provider_id.to_string()))?;
        let practice = Practice::from(&roster.organization);
        roster.selected = Some(provider_id.to_string());
        store.modify(|letter| {
            letter.provider = Some(provider);
            letter.practice = Some(practice);
        });
        Ok(())
    }

    /// Switches to free-text entry, seeded from the draft's current provider and practice.
    pub fn enter_manual_entry(&mut self, store: &DraftStore) {
        if matches!(self.state, ProviderState::ManualEntry(_)) {
            return;
        }
        self.guard.cancel_all();
        let letter = store.letter();
        let form = ManualProviderForm {
            provider: letter.provider.clone().unwrap_or_default(),
            practice: letter.practice.clone().unwrap_or_default(),
        };
        tracing::debug!(from = self.state.name(), "provider step switched to manual entry");
        self.state = ProviderState::ManualEntry(form);
    }

    /// Edits one manual field and merges the form into the draft.
    pub fn set_manual_field(
        &mut self,
        store: &mut DraftStore,
        field: ManualField,
        value: impl Into<String>,
    ) -> LetterResult<()> {
        let state = self.state.name();
        let ProviderState::ManualEntry(form) = &mut self.state else {
            return Err(LetterError::InvalidTransition {
                state,
                action: "edit manual provider fields",
            });
        };
        field.apply(form, value.into());
        let provider = form.provider.clone();
        let practice = form.practice.clone();
        store.modify(|letter| {
            letter.provider = Some(provider);
            letter.practice = Some(practice);
        });
        Ok(())
    }
}
