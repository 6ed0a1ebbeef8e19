//! The seven wizard step components.
//!
//! Each component edits one bounded part of the draft through the store. None of them keep a
//! private copy of draft values: every edit is merged immediately.

pub mod diagnosis_information;
pub mod final_review;
pub mod insurance_details;
pub mod patient_details;
pub mod provider_information;
pub mod template_selection;
pub mod treatment_history;

pub use diagnosis_information::{DiagnosisField, DiagnosisInformation, LabResultField};
pub use final_review::{FinalReview, ReviewSection, ReviewSummary};
pub use insurance_details::{InsuranceDetails, InsuranceField};
pub use patient_details::{PatientDetails, PatientField};
pub use provider_information::{
    ManualField, ManualProviderForm, NoDataReason, ProviderInformation, ProviderState, Roster,
    RosterOutcome,
};
pub use template_selection::TemplateSelection;
pub use treatment_history::{HistoryField, TreatmentField, TreatmentHistoryStep};

use crate::entries::{EntryList, ListEntry};
use crate::{LetterError, LetterResult};
use lmn_types::EntryId;

fn entry_by_id<'a, T: ListEntry>(list: &'a mut EntryList<T>, id: &EntryId) -> LetterResult<&'a mut T> {
    list.get_mut(id)
        .ok_or_else(|| LetterError::UnknownEntry(id.to_string()))
}

fn entry_at<T: ListEntry>(list: &mut EntryList<T>, index: usize) -> LetterResult<&mut T> {
    let len = list.len();
    list.get_mut_at(index)
        .ok_or(LetterError::EntryIndexOutOfRange { index, len })
}
