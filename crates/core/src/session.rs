//! One user's run through the wizard.

use crate::collaborators::LetterBackend;
use crate::config::WizardPolicy;
use crate::profile::{ProfileBanner, ProfileNotice};
use crate::render::{render_letter, RenderedLetter};
use crate::steps::{ProviderInformation, TemplateSelection};
use crate::store::DraftStore;
use crate::wizard::WizardController;
use crate::LetterResult;
use uuid::Uuid;

#[derive(Debug)]
pub struct WizardSession {
    id: Uuid,
    pub store: DraftStore,
    pub controller: WizardController,
    pub templates: TemplateSelection,
    pub provider: ProviderInformation,
    pub banner: ProfileBanner,
}

impl WizardSession {
    pub fn start(product_id: impl Into<String>, policy: WizardPolicy) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            store: DraftStore::new(),
            controller: WizardController::new(policy),
            templates: TemplateSelection::new(product_id),
            provider: ProviderInformation::new(),
            banner: ProfileBanner::new(),
        };
        tracing::info!(session_id = %session.id, product_id = session.templates.product_id(), "wizard session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Loads the template list and the provider roster, then refreshes the profile banner.
    ///
    /// Failures degrade the affected step and are never returned.
    pub async fn load_collaborator_data(&mut self, backend: &dyn LetterBackend, authenticated: bool) {
        self.templates.load(backend).await;
        self.provider.load(&mut self.store, backend).await;
        self.banner
            .refresh(authenticated, self.provider.current_user());
    }

    pub fn profile_notice(&self) -> Option<&ProfileNotice> {
        self.banner.visible()
    }

    /// Empties the draft and returns to step 1. Loaded templates and the provider state are
    /// kept.
    pub fn reset(&mut self) {
        self.store.reset_letter();
        tracing::info!(session_id = %self.id, "wizard session reset");
    }

    pub fn render(&self) -> RenderedLetter {
        render_letter(self.store.letter())
    }

    /// Renders the letter for export, applying the wizard policy first.
    pub fn render_for_export(&self) -> LetterResult<RenderedLetter> {
        self.controller.ensure_complete(self.store.letter())?;
        Ok(self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{PatientDetails, PatientField};
    use crate::LetterError;

    #[test]
    fn test_reset_clears_draft() {
        let mut session = WizardSession::start("1", WizardPolicy::Permissive);
        PatientDetails::set_field(&mut session.store, PatientField::FirstName, "Ada");
        session.store.set_step(4).unwrap();

        session.reset();
        assert_eq!(session.store.current_step().number(), 1);
        assert!(session.store.letter().patient.is_none());
        assert_eq!(session.templates.product_id(), "1");
    }

    #[test]
    fn test_render_for_export_respects_policy() {
        let permissive = WizardSession::start("1", WizardPolicy::Permissive);
        assert!(permissive.render_for_export().is_ok());

        let strict = WizardSession::start("1", WizardPolicy::RequireComplete);
        assert!(matches!(
            strict.render_for_export(),
            Err(LetterError::IncompleteLetter(_))
        ));
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        let a = WizardSession::start("1", WizardPolicy::Permissive);
        let b = WizardSession::start("1", WizardPolicy::Permissive);
        assert_ne!(a.id(), b.id());
    }
}
