//! Request and response bodies.
//!
//! Core types without an OpenAPI schema are documented as free-form objects.

use lmn_core::steps::{ProviderState, ReviewSummary};
use lmn_core::{
    DraftLetter, NonEmptyText, ProfileNotice, RenderedLetter, Template, Transition, WizardSession,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionReq {
    #[schema(value_type = String)]
    pub product_id: NonEmptyText,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStepReq {
    pub step: u8,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectTemplateReq {
    #[schema(value_type = String)]
    pub template_id: NonEmptyText,
    pub letter_date: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectProviderReq {
    pub provider_id: String,
}

/// One form field edit. `field` is the form name, for example `firstName` or
/// `company.address2`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FieldEditReq {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TextReq {
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub step: u8,
    pub step_title: String,
    #[schema(value_type = Object)]
    pub letter: DraftLetter,
    #[schema(value_type = Vec<Object>)]
    pub templates: Vec<Template>,
    #[schema(value_type = Object)]
    pub provider: ProviderState,
    #[schema(value_type = Option<Object>)]
    pub profile_notice: Option<ProfileNotice>,
}

impl From<&WizardSession> for SessionView {
    fn from(session: &WizardSession) -> Self {
        let step = session.store.current_step();
        Self {
            id: session.id().to_string(),
            step: step.number(),
            step_title: step.title().into(),
            letter: session.store.letter().clone(),
            templates: session.templates.templates().to_vec(),
            provider: session.provider.state().clone(),
            profile_notice: session.profile_notice().cloned(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransitionRes {
    #[schema(value_type = Object)]
    pub transition: Transition,
    pub step: u8,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntryCreatedRes {
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppliedRes {
    pub applied: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewRes {
    #[schema(value_type = Object)]
    pub summary: ReviewSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LetterRes {
    #[schema(value_type = Object)]
    pub letter: RenderedLetter,
    pub text: String,
    pub markdown: String,
}
