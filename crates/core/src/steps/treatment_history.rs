//! Step 6: condition description, prior treatments and their outcomes.

use super::{entry_at, entry_by_id};
use crate::draft::Treatment;
use crate::entries::ListEntry;
use crate::store::DraftStore;
use crate::{LetterError, LetterResult};
use lmn_types::EntryId;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryField {
    ConditionDescription,
    Rationale,
}

impl FromStr for HistoryField {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conditionDescription" => Ok(Self::ConditionDescription),
            "rationale" => Ok(Self::Rationale),
            other => Err(LetterError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TreatmentField {
    Date,
    Treatment,
    Outcome,
}

impl TreatmentField {
    fn apply(self, treatment: &mut Treatment, value: String) {
        match self {
            TreatmentField::Date => treatment.date = value,
            TreatmentField::Treatment => treatment.treatment = value,
            TreatmentField::Outcome => treatment.outcome = value,
        }
    }
}

impl FromStr for TreatmentField {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "treatment" => Ok(Self::Treatment),
            "outcome" => Ok(Self::Outcome),
            other => Err(LetterError::UnknownField(other.to_string())),
        }
    }
}

pub struct TreatmentHistoryStep;

impl TreatmentHistoryStep {
    pub fn set_field(store: &mut DraftStore, field: HistoryField, value: impl Into<String>) {
        let value = value.into();
        store.modify(|letter| {
            let history = letter.treatment_history_mut();
            match field {
                HistoryField::ConditionDescription => history.condition_description = value,
                HistoryField::Rationale => history.rationale = value,
            }
        });
    }

    /// Appends an empty treatment and returns its new id.
    pub fn add_treatment(store: &mut DraftStore) -> EntryId {
        let id = EntryId::generate();
        let treatment = Treatment::blank(id.clone());
        store.modify(|letter| letter.treatment_history_mut().treatments.push(treatment));
        id
    }

    pub fn update_treatment(
        store: &mut DraftStore,
        id: &EntryId,
        field: TreatmentField,
        value: impl Into<String>,
    ) -> LetterResult<()> {
        let value = value.into();
        store.try_modify(|letter| {
            let treatment = entry_by_id(&mut letter.treatment_history_mut().treatments, id)?;
            field.apply(treatment, value);
            Ok(())
        })
    }

    pub fn update_treatment_at(
        store: &mut DraftStore,
        index: usize,
        field: TreatmentField,
        value: impl Into<String>,
    ) -> LetterResult<()> {
        let value = value.into();
        store.try_modify(|letter| {
            let treatment = entry_at(&mut letter.treatment_history_mut().treatments, index)?;
            field.apply(treatment, value);
            Ok(())
        })
    }

    pub fn remove_treatment(store: &mut DraftStore, id: &EntryId) -> LetterResult<Treatment> {
        store.try_modify(|letter| {
            letter
                .treatment_history_mut()
                .treatments
                .remove(id)
                .ok_or_else(|| LetterError::UnknownEntry(id.to_string()))
        })
    }

    pub fn remove_treatment_at(store: &mut DraftStore, index: usize) -> LetterResult<Treatment> {
        store.try_modify(|letter| {
            let treatments = &mut letter.treatment_history_mut().treatments;
            let len = treatments.len();
            treatments
                .remove_at(index)
                .ok_or(LetterError::EntryIndexOutOfRange { index, len })
        })
    }
}
