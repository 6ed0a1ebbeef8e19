//! Step 1: template and letter date.
//!
//! The template list is fetched per product. Fetches are tagged with a [`RequestToken`] so a
//! slow response for a product the user has already moved away from is dropped. A failed fetch
//! leaves the step usable with an empty list.

use crate::collaborators::{CollaboratorError, LetterBackend, Template};
use crate::fetch::{RequestGuard, RequestToken};
use crate::store::DraftStore;
use crate::{LetterError, LetterResult};

#[derive(Clone, Debug, Default)]
pub struct TemplateSelection {
    product_id: String,
    templates: Vec<Template>,
    loading: bool,
    guard: RequestGuard,
}

impl TemplateSelection {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            ..Default::default()
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Switches product; the current list and any in-flight fetch are discarded.
    pub fn change_product(&mut self, product_id: impl Into<String>) {
        self.product_id = product_id.into();
        self.templates.clear();
        self.loading = false;
        self.guard.cancel_all();
    }

    pub fn begin_load(&mut self) -> RequestToken {
        self.loading = true;
        self.guard.issue()
    }

    /// Applies a fetch result. Returns `false` when `token` is stale and the result was dropped.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Template>, CollaboratorError>,
    ) -> bool {
        if !self.guard.is_current(token) {
            tracing::warn!(
                token = token.value(),
                product_id = %self.product_id,
                "discarding stale template response"
            );
            return false;
        }
        self.loading = false;
        self.templates = match result {
            Ok(templates) => templates,
            Err(err) => {
                tracing::warn!(product_id = %self.product_id, error = %err, "template fetch failed");
                Vec::new()
            }
        };
        true
    }

    pub async fn load(&mut self, backend: &dyn LetterBackend) {
        let token = self.begin_load();
        let result = backend.get_templates(&self.product_id).await;
        self.resolve(token, result);
    }

    /// Copies the chosen template's id and full record into the draft.
    pub fn select(&self, store: &mut DraftStore, template_id: &str) -> LetterResult<()> {
        let template = self
            .templates
            .iter()
            .find(|template| template.id == template_id)
            .cloned()
            .ok_or_else(|| LetterError::UnknownTemplate(template_id.to_string()))?;
        tracing::debug!(template_id, "template selected");
        store.modify(|letter| {
            letter.template_id = Some(template.id.clone());
            letter.template = Some(template);
        });
        Ok(())
    }

    pub fn set_letter_date(store: &mut DraftStore, date: impl Into<String>) {
        let date = date.into();
        store.modify(|letter| letter.letter_date = Some(date));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str, intro: &str) -> Template {
        Template {
            id: id.into(),
            name: format!("Template {id}"),
            intro: intro.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut step = TemplateSelection::new("1");
        let first = step.begin_load();
        let second = step.begin_load();

        assert!(step.resolve(second, Ok(vec![template("2", "")])));
        assert!(!step.resolve(first, Ok(vec![template("1", "")])));
        assert_eq!(step.templates().len(), 1);
        assert_eq!(step.templates()[0].id, "2");
        assert!(!step.is_loading());
    }

    #[test]
    fn test_change_product_cancels_in_flight_fetch() {
        let mut step = TemplateSelection::new("1");
        let token = step.begin_load();
        step.change_product("2");
        assert!(!step.resolve(token, Ok(vec![template("1", "")])));
        assert!(step.templates().is_empty());
        assert_eq!(step.product_id(), "2");
    }

    #[test]
    fn test_failed_fetch_yields_empty_list() {
        let mut step = TemplateSelection::new("1");
        let token = step.begin_load();
        assert!(step.resolve(
            token,
            Err(CollaboratorError::Network("connection refused".into()))
        ));
        assert!(step.templates().is_empty());
        assert!(!step.is_loading());
    }

    #[test]
    fn test_select_copies_template_into_draft() {
        let mut step = TemplateSelection::new("1");
        let token = step.begin_load();
        step.resolve(token, Ok(vec![template("7", "Dear Sir")]));

        let mut store = DraftStore::new();
        step.select(&mut store, "7").unwrap();
        TemplateSelection::set_letter_date(&mut store, "2024-03-05");

        let letter = store.letter();
        assert_eq!(letter.template_id.as_deref(), Some("7"));
        assert_eq!(letter.template.as_ref().unwrap().intro, "Dear Sir");
        assert_eq!(letter.letter_date.as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_select_unknown_template() {
        let step = TemplateSelection::new("1");
        let mut store = DraftStore::new();
        assert!(matches!(
            step.select(&mut store, "9"),
            Err(LetterError::UnknownTemplate(id)) if id == "9"
        ));
        assert!(store.letter().template_id.is_none());
    }
}
