//! Step 7: read-only summary of every slice plus the introduction and final rationale.

use crate::draft::DraftLetter;
use crate::render::join_words;
use crate::step::WizardStep;
use crate::store::DraftStore;
use crate::validation::{missing_required_fields, RequiredField};
use lmn_types::format_long_date;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSection {
    pub title: &'static str,
    pub edit_step: WizardStep,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub sections: Vec<ReviewSection>,
    pub missing: Vec<RequiredField>,
    pub template_introduction_available: bool,
    pub template_rationale_available: bool,
}

pub struct FinalReview;

impl FinalReview {
    pub fn summary(draft: &DraftLetter) -> ReviewSummary {
        let provider = draft.provider.clone().unwrap_or_default();
        let practice = draft.practice.clone().unwrap_or_default();
        let patient = draft.patient.clone().unwrap_or_default();
        let insurance = draft.insurance.clone().unwrap_or_default();
        let diagnosis = draft.diagnosis.clone().unwrap_or_default();
        let history = draft.treatment_history.clone().unwrap_or_default();

        let mut diagnosis_lines = vec![
            format!("ICD-10: {}", diagnosis.icd10_code),
            format!("Diagnosis: {}", diagnosis.description),
        ];
        diagnosis_lines.extend(diagnosis.lab_results.iter().map(|lab| {
            format!(
                "{}: {} {} ({})",
                lab.test,
                lab.result,
                lab.unit,
                format_long_date(&lab.date)
            )
        }));

        let mut history_lines = vec![format!("Condition: {}", history.condition_description)];
        history_lines.extend(history.treatments.iter().map(|treatment| {
            format!(
                "{} - {} ({})",
                treatment.treatment,
                treatment.outcome,
                format_long_date(&treatment.date)
            )
        }));

        let sections = vec![
            ReviewSection {
                title: "Provider Information",
                edit_step: WizardStep::ProviderInformation,
                lines: vec![
                    format!(
                        "Provider: {}",
                        join_words(&[&provider.title, &provider.first_name, &provider.last_name])
                    ),
                    format!("NPI: {}", provider.npi_number),
                    format!("Practice: {}", practice.name),
                ],
            },
            ReviewSection {
                title: "Patient Information",
                edit_step: WizardStep::PatientDetails,
                lines: vec![
                    format!("Name: {}", join_words(&[&patient.first_name, &patient.last_name])),
                    format!("Date of Birth: {}", format_long_date(&patient.date_of_birth)),
                ],
            },
            ReviewSection {
                title: "Insurance Information",
                edit_step: WizardStep::InsuranceDetails,
                lines: vec![
                    format!("Insurance: {}", insurance.company.name),
                    format!("Policy Number: {}", insurance.policy_number),
                    format!(
                        "Policy Holder: {}",
                        join_words(&[
                            &insurance.policy_holder.first_name,
                            &insurance.policy_holder.last_name
                        ])
                    ),
                ],
            },
            ReviewSection {
                title: "Diagnosis Information",
                edit_step: WizardStep::DiagnosisInformation,
                lines: diagnosis_lines,
            },
            ReviewSection {
                title: "Treatment History",
                edit_step: WizardStep::TreatmentHistory,
                lines: history_lines,
            },
        ];

        let template = draft.template.as_ref();
        ReviewSummary {
            sections,
            missing: missing_required_fields(draft),
            template_introduction_available: template.is_some_and(|t| !t.intro.is_empty()),
            template_rationale_available: template.is_some_and(|t| !t.rationale.is_empty()),
        }
    }

    /// Jumps back to the step that owns a section.
    pub fn edit(store: &mut DraftStore, step: WizardStep) {
        store.go_to(step);
    }

    /// Copies the selected template's introduction into the draft. Returns `false` when there
    /// is no template introduction to copy.
    pub fn use_template_introduction(store: &mut DraftStore) -> bool {
        let Some(intro) = store
            .letter()
            .template
            .as_ref()
            .map(|t| t.intro.clone())
            .filter(|intro| !intro.is_empty())
        else {
            return false;
        };
        store.modify(|letter| letter.introduction = Some(intro));
        true
    }

    pub fn use_template_rationale(store: &mut DraftStore) -> bool {
        let Some(rationale) = store
            .letter()
            .template
            .as_ref()
            .map(|t| t.rationale.clone())
            .filter(|rationale| !rationale.is_empty())
        else {
            return false;
        };
        store.modify(|letter| letter.final_rationale = Some(rationale));
        true
    }

    pub fn set_introduction(store: &mut DraftStore, text: impl Into<String>) {
        let text = text.into();
        store.modify(|letter| letter.introduction = Some(text));
    }

    pub fn set_final_rationale(store: &mut DraftStore, text: impl Into<String>) {
        let text = text.into();
        store.modify(|letter| letter.final_rationale = Some(text));
    }
}
