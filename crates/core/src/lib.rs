//! # LMN Core
//!
//! Wizard state machine and letter assembly for medical-necessity letters.
//!
//! This crate contains pure logic only:
//! - the draft document store ([`DraftStore`]) and its change notifications
//! - the seven step components ([`steps`]) and the wizard controller ([`WizardController`])
//! - the letter renderer ([`render_letter`])
//! - the traits external collaborators implement ([`collaborators`])
//!
//! **No transport concerns**: HTTP clients live in `lmn-backend`, PDF output in `lmn-export`,
//! and the REST surface in `api-rest`.

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod draft;
pub mod entries;
pub mod error;
pub mod fetch;
pub mod profile;
pub mod render;
pub mod session;
pub mod step;
pub mod steps;
pub mod store;
pub mod validation;
pub mod wizard;

pub use collaborators::{
    AuthProvider, CollaboratorError, EhrConnector, LetterBackend, Organization,
    OrganizationLocation, Product, ProviderRegistry, RegistryRecord, Template, TemplateType,
    UserProfile,
};
pub use config::{
    request_timeout_from_env_value, session_ttl_from_env_value, use_mock_data_from_env_value,
    wizard_policy_from_env_value, CoreConfig, WizardPolicy,
};
pub use draft::{DraftLetter, Slice};
pub use error::{LetterError, LetterResult};
pub use fetch::{RequestGuard, RequestToken};
pub use profile::{ProfileBanner, ProfileNotice};
pub use render::{render_letter, Block, LetterSection, RenderedLetter, SectionKind};
pub use session::WizardSession;
pub use step::WizardStep;
pub use store::{DraftStore, StoreEvent, SubscriptionId};
pub use validation::{missing_required_fields, RequiredField};
pub use wizard::{Transition, WizardController};

pub use lmn_types::{format_long_date, EntryId, LetterDate, NonEmptyText};
