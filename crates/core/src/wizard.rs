//! Previous/Next navigation over the draft store.

use crate::config::WizardPolicy;
use crate::draft::DraftLetter;
use crate::step::WizardStep;
use crate::store::DraftStore;
use crate::validation::missing_required_fields;
use crate::{LetterError, LetterResult};
use serde::Serialize;

/// What a navigation request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Transition {
    Moved { from: WizardStep, to: WizardStep },
    /// Nothing to do, for example Previous on the first step.
    Stayed { step: WizardStep },
    /// Next on the final step: leave the wizard for the rendered letter. The step pointer is
    /// not advanced.
    Complete,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WizardController {
    policy: WizardPolicy,
}

impl WizardController {
    pub fn new(policy: WizardPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> WizardPolicy {
        self.policy
    }

    pub fn previous(&self, store: &mut DraftStore) -> Transition {
        let from = store.current_step();
        match from.previous() {
            Some(to) => {
                store.go_to(to);
                Transition::Moved { from, to }
            }
            None => Transition::Stayed { step: from },
        }
    }

    /// Advances one step. On the final step this is the exit transition, which under
    /// [`WizardPolicy::RequireComplete`] fails while required fields are missing.
    pub fn next(&self, store: &mut DraftStore) -> LetterResult<Transition> {
        let from = store.current_step();
        match from.next() {
            Some(to) => {
                store.go_to(to);
                Ok(Transition::Moved { from, to })
            }
            None => {
                self.ensure_complete(store.letter())?;
                tracing::info!("wizard complete");
                Ok(Transition::Complete)
            }
        }
    }

    pub fn go_to(&self, store: &mut DraftStore, n: u8) -> LetterResult<Transition> {
        let from = store.current_step();
        let to = store.set_step(n)?;
        if from == to {
            return Ok(Transition::Stayed { step: to });
        }
        Ok(Transition::Moved { from, to })
    }

    /// Checks the draft against the policy before leaving the wizard or exporting.
    pub fn ensure_complete(&self, draft: &DraftLetter) -> LetterResult<()> {
        if self.policy == WizardPolicy::Permissive {
            return Ok(());
        }
        let missing = missing_required_fields(draft);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LetterError::IncompleteLetter(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_at_first_step_is_noop() {
        let controller = WizardController::default();
        let mut store = DraftStore::new();
        assert_eq!(
            controller.previous(&mut store),
            Transition::Stayed {
                step: WizardStep::TemplateSelection
            }
        );
        assert_eq!(store.current_step().number(), 1);
    }

    #[test]
    fn test_next_walks_every_step_then_completes() {
        let controller = WizardController::default();
        let mut store = DraftStore::new();
        for n in 2..=7 {
            let transition = controller.next(&mut store).unwrap();
            assert!(matches!(transition, Transition::Moved { to, .. } if to.number() == n));
        }
        assert_eq!(controller.next(&mut store).unwrap(), Transition::Complete);
        assert_eq!(store.current_step(), WizardStep::FinalReview);
    }

    #[test]
    fn test_previous_decrements() {
        let controller = WizardController::default();
        let mut store = DraftStore::new();
        controller.go_to(&mut store, 5).unwrap();
        controller.previous(&mut store);
        assert_eq!(store.current_step().number(), 4);
    }

    #[test]
    fn test_require_complete_blocks_exit_only() {
        let controller = WizardController::new(WizardPolicy::RequireComplete);
        let mut store = DraftStore::new();
        for _ in 0..6 {
            controller.next(&mut store).unwrap();
        }
        let err = controller.next(&mut store).unwrap_err();
        assert!(matches!(err, LetterError::IncompleteLetter(ref missing) if missing.len() == 15));
        assert_eq!(store.current_step(), WizardStep::FinalReview);
    }

    #[test]
    fn test_go_to_rejects_out_of_range() {
        let controller = WizardController::default();
        let mut store = DraftStore::new();
        assert!(matches!(
            controller.go_to(&mut store, 8),
            Err(LetterError::InvalidStep(8))
        ));
        assert_eq!(
            controller.go_to(&mut store, 1).unwrap(),
            Transition::Stayed {
                step: WizardStep::TemplateSelection
            }
        );
    }
}
