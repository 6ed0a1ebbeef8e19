//! The draft document store.
//!
//! [`DraftStore`] is the single source of truth for the wizard: it owns the current step
//! pointer and the [`DraftLetter`]. It is an explicit value passed to whoever needs it, not a
//! process-wide singleton.
//!
//! Every mutation is synchronous and atomic from the caller's point of view: the change is
//! applied, then subscribers are notified with a [`StoreEvent`] naming what changed. Mutations
//! that leave the state unchanged notify nobody.

use crate::draft::{DraftLetter, Slice};
use crate::step::WizardStep;
use crate::LetterResult;

/// Notification published after a store mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    StepChanged { from: WizardStep, to: WizardStep },
    LetterChanged { slices: Vec<Slice> },
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent) + Send>;

pub struct DraftStore {
    current_step: WizardStep,
    letter: DraftLetter,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl DraftStore {
    pub fn new() -> Self {
        Self {
            current_step: WizardStep::FIRST,
            letter: DraftLetter::default(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn letter(&self) -> &DraftLetter {
        &self.letter
    }

    /// Sets the step pointer to exactly `n`.
    ///
    /// Values outside 1..=7 are rejected with `LetterError::InvalidStep` and leave the pointer
    /// where it was.
    pub fn set_step(&mut self, n: u8) -> LetterResult<WizardStep> {
        let step = WizardStep::try_from(n)?;
        self.go_to(step);
        Ok(step)
    }

    /// Typed form of [`DraftStore::set_step`].
    pub fn go_to(&mut self, step: WizardStep) {
        let from = self.current_step;
        if from == step {
            return;
        }
        self.current_step = step;
        tracing::debug!(from = from.number(), to = step.number(), "wizard step changed");
        self.publish(&StoreEvent::StepChanged { from, to: step });
    }

    /// Shallow-merges `patch` into the draft and returns the slices that changed.
    ///
    /// See [`DraftLetter::merge`] for the nested-slice calling convention.
    pub fn update_letter_data(&mut self, patch: DraftLetter) -> Vec<Slice> {
        self.modify(|letter| letter.merge(patch))
    }

    /// Edits the draft in place and returns the slices that changed.
    pub fn modify(&mut self, edit: impl FnOnce(&mut DraftLetter)) -> Vec<Slice> {
        let mut next = self.letter.clone();
        edit(&mut next);
        self.commit(next)
    }

    /// Edits a copy of the draft; the copy replaces the draft only if `edit` succeeds.
    pub fn try_modify<T>(
        &mut self,
        edit: impl FnOnce(&mut DraftLetter) -> LetterResult<T>,
    ) -> LetterResult<T> {
        let mut next = self.letter.clone();
        let value = edit(&mut next)?;
        self.commit(next);
        Ok(value)
    }

    /// Restores the empty draft and step 1.
    pub fn reset_letter(&mut self) {
        self.letter = DraftLetter::default();
        self.current_step = WizardStep::FIRST;
        tracing::debug!("draft letter reset");
        self.publish(&StoreEvent::Reset);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + Send + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, next: DraftLetter) -> Vec<Slice> {
        let slices = self.letter.changed_slices(&next);
        if slices.is_empty() {
            return slices;
        }
        self.letter = next;
        self.publish(&StoreEvent::LetterChanged {
            slices: slices.clone(),
        });
        slices
    }

    fn publish(&mut self, event: &StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStore")
            .field("current_step", &self.current_step)
            .field("letter", &self.letter)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{Diagnosis, Patient};
    use crate::LetterError;
    use std::sync::{Arc, Mutex};

    fn recording(store: &mut DraftStore) -> Arc<Mutex<Vec<StoreEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        events
    }

    #[test]
    fn test_set_step_in_range() {
        let mut store = DraftStore::new();
        for n in 1..=7 {
            store.set_step(n).unwrap();
            assert_eq!(store.current_step().number(), n);
        }
    }

    #[test]
    fn test_set_step_out_of_range_is_rejected() {
        let mut store = DraftStore::new();
        store.set_step(4).unwrap();
        assert!(matches!(store.set_step(0), Err(LetterError::InvalidStep(0))));
        assert!(matches!(store.set_step(8), Err(LetterError::InvalidStep(8))));
        assert_eq!(store.current_step(), WizardStep::InsuranceDetails);
    }

    #[test]
    fn test_update_preserves_other_slices() {
        let mut store = DraftStore::new();
        store.update_letter_data(DraftLetter {
            diagnosis: Some(Diagnosis {
                icd10_code: "J45.50".into(),
                ..Default::default()
            }),
            ..Default::default()
        });
        let before = serde_json::to_vec(&store.letter().diagnosis).unwrap();

        store.update_letter_data(DraftLetter {
            patient: Some(Patient {
                first_name: "Ada".into(),
                ..Default::default()
            }),
            ..Default::default()
        });

        let after = serde_json::to_vec(&store.letter().diagnosis).unwrap();
        assert_eq!(before, after);
        assert_eq!(store.letter().patient.as_ref().unwrap().first_name, "Ada");
    }

    #[test]
    fn test_subscribers_see_changed_slices_only() {
        let mut store = DraftStore::new();
        let events = recording(&mut store);

        store.modify(|letter| letter.patient_mut().last_name = "Lovelace".into());
        store.modify(|letter| letter.patient_mut().last_name = "Lovelace".into());
        store.set_step(2).unwrap();
        store.set_step(2).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                StoreEvent::LetterChanged {
                    slices: vec![Slice::Patient]
                },
                StoreEvent::StepChanged {
                    from: WizardStep::TemplateSelection,
                    to: WizardStep::ProviderInformation
                },
            ]
        );
    }

    #[test]
    fn test_try_modify_rolls_back_on_error() {
        let mut store = DraftStore::new();
        let result: LetterResult<()> = store.try_modify(|letter| {
            letter.introduction = Some("partial".into());
            Err(LetterError::UnknownEntry("x".into()))
        });
        assert!(result.is_err());
        assert!(store.letter().introduction.is_none());
    }

    #[test]
    fn test_reset_letter() {
        let mut store = DraftStore::new();
        let events = recording(&mut store);
        store.set_step(6).unwrap();
        store.modify(|letter| letter.final_rationale = Some("needed".into()));

        store.reset_letter();
        assert_eq!(store.current_step(), WizardStep::FIRST);
        assert_eq!(store.letter(), &DraftLetter::default());
        assert_eq!(events.lock().unwrap().last(), Some(&StoreEvent::Reset));
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = DraftStore::new();
        let count = Arc::new(Mutex::new(0));
        let sink = count.clone();
        let id = store.subscribe(move |_| *sink.lock().unwrap() += 1);

        store.set_step(3).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_step(4).unwrap();
        assert_eq!(*count.lock().unwrap(), 1);
    }
}
