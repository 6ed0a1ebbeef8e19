//! Step 5: diagnosis and supporting lab results.

use super::{entry_at, entry_by_id};
use crate::draft::LabResult;
use crate::entries::ListEntry;
use crate::store::DraftStore;
use crate::{LetterError, LetterResult};
use lmn_types::EntryId;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosisField {
    Icd10Code,
    Description,
    AdditionalDetails,
}

impl FromStr for DiagnosisField {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "icd10Code" => Ok(Self::Icd10Code),
            "description" => Ok(Self::Description),
            "additionalDetails" => Ok(Self::AdditionalDetails),
            other => Err(LetterError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabResultField {
    Date,
    Test,
    Result,
    Unit,
}

impl LabResultField {
    fn apply(self, lab: &mut LabResult, value: String) {
        match self {
            LabResultField::Date => lab.date = value,
            LabResultField::Test => lab.test = value,
            LabResultField::Result => lab.result = value,
            LabResultField::Unit => lab.unit = value,
        }
    }
}

impl FromStr for LabResultField {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "test" => Ok(Self::Test),
            "result" => Ok(Self::Result),
            "unit" => Ok(Self::Unit),
            other => Err(LetterError::UnknownField(other.to_string())),
        }
    }
}

pub struct DiagnosisInformation;

impl DiagnosisInformation {
    pub fn set_field(store: &mut DraftStore, field: DiagnosisField, value: impl Into<String>) {
        let value = value.into();
        store.modify(|letter| {
            let diagnosis = letter.diagnosis_mut();
            match field {
                DiagnosisField::Icd10Code => diagnosis.icd10_code = value,
                DiagnosisField::Description => diagnosis.description = value,
                DiagnosisField::AdditionalDetails => diagnosis.additional_details = value,
            }
        });
    }

    /// Appends an empty lab result and returns its new id.
    pub fn add_lab_result(store: &mut DraftStore) -> EntryId {
        let id = EntryId::generate();
        let lab = LabResult::blank(id.clone());
        store.modify(|letter| letter.diagnosis_mut().lab_results.push(lab));
        id
    }

    pub fn update_lab_result(
        store: &mut DraftStore,
        id: &EntryId,
        field: LabResultField,
        value: impl Into<String>,
    ) -> LetterResult<()> {
        let value = value.into();
        store.try_modify(|letter| {
            let lab = entry_by_id(&mut letter.diagnosis_mut().lab_results, id)?;
            field.apply(lab, value);
            Ok(())
        })
    }

    /// Edits the lab result at `index` in place; its id is unchanged.
    pub fn update_lab_result_at(
        store: &mut DraftStore,
        index: usize,
        field: LabResultField,
        value: impl Into<String>,
    ) -> LetterResult<()> {
        let value = value.into();
        store.try_modify(|letter| {
            let lab = entry_at(&mut letter.diagnosis_mut().lab_results, index)?;
            field.apply(lab, value);
            Ok(())
        })
    }

    pub fn remove_lab_result(store: &mut DraftStore, id: &EntryId) -> LetterResult<LabResult> {
        store.try_modify(|letter| {
            letter
                .diagnosis_mut()
                .lab_results
                .remove(id)
                .ok_or_else(|| LetterError::UnknownEntry(id.to_string()))
        })
    }

    pub fn remove_lab_result_at(store: &mut DraftStore, index: usize) -> LetterResult<LabResult> {
        store.try_modify(|letter| {
            let labs = &mut letter.diagnosis_mut().lab_results;
            let len = labs.len();
            labs.remove_at(index)
                .ok_or(LetterError::EntryIndexOutOfRange { index, len })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lab_result_round_trip() {
        let mut store = DraftStore::new();
        let id = DiagnosisInformation::add_lab_result(&mut store);

        let labs = &store.letter().diagnosis.as_ref().unwrap().lab_results;
        assert_eq!(labs.len(), 1);
        let lab = &labs.as_slice()[0];
        assert_eq!(lab.id, id);
        assert!(lab.test.is_empty() && lab.result.is_empty() && lab.unit.is_empty());

        DiagnosisInformation::update_lab_result_at(&mut store, 0, LabResultField::Result, "140")
            .unwrap();
        let lab = &store.letter().diagnosis.as_ref().unwrap().lab_results.as_slice()[0];
        assert_eq!(lab.result, "140");
        assert_eq!(lab.id, id);
    }

    #[test]
    fn test_add_then_remove_restores_previous_list() {
        let mut store = DraftStore::new();
        let first = DiagnosisInformation::add_lab_result(&mut store);
        DiagnosisInformation::update_lab_result(&mut store, &first, LabResultField::Test, "HbA1c")
            .unwrap();
        let before = store.letter().diagnosis.clone();

        let added = DiagnosisInformation::add_lab_result(&mut store);
        DiagnosisInformation::remove_lab_result(&mut store, &added).unwrap();
        assert_eq!(store.letter().diagnosis, before);
    }

    #[test]
    fn test_remove_does_not_renumber() {
        let mut store = DraftStore::new();
        let a = DiagnosisInformation::add_lab_result(&mut store);
        let b = DiagnosisInformation::add_lab_result(&mut store);
        let c = DiagnosisInformation::add_lab_result(&mut store);

        let removed = DiagnosisInformation::remove_lab_result_at(&mut store, 1).unwrap();
        assert_eq!(removed.id, b);
        let ids = store.letter().diagnosis.as_ref().unwrap().lab_results.ids();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_unknown_entry_leaves_draft_untouched() {
        let mut store = DraftStore::new();
        DiagnosisInformation::set_field(&mut store, DiagnosisField::Icd10Code, "J45.50");
        let before = store.letter().clone();

        let missing = EntryId::from("missing");
        assert!(matches!(
            DiagnosisInformation::update_lab_result(&mut store, &missing, LabResultField::Unit, "mg"),
            Err(LetterError::UnknownEntry(_))
        ));
        assert!(matches!(
            DiagnosisInformation::remove_lab_result_at(&mut store, 2),
            Err(LetterError::EntryIndexOutOfRange { index: 2, len: 0 })
        ));
        assert_eq!(store.letter(), &before);
    }

    #[test]
    fn test_field_edits_keep_lab_results() {
        let mut store = DraftStore::new();
        DiagnosisInformation::add_lab_result(&mut store);
        DiagnosisInformation::set_field(&mut store, DiagnosisField::Description, "Asthma");
        let diagnosis = store.letter().diagnosis.as_ref().unwrap();
        assert_eq!(diagnosis.description, "Asthma");
        assert_eq!(diagnosis.lab_results.len(), 1);
    }
}
