//! Advisory completeness checks.
//!
//! Each wizard input marked required has a [`RequiredField`]. The check never blocks editing;
//! it feeds the Final Review report and, under [`crate::WizardPolicy::RequireComplete`], the
//! exit transition and export.

use crate::draft::DraftLetter;
use crate::step::WizardStep;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    Template,
    LetterDate,
    ProviderFirstName,
    ProviderLastName,
    ProviderNpi,
    PatientFirstName,
    PatientLastName,
    PatientDateOfBirth,
    PolicyNumber,
    InsuranceCompanyName,
    Icd10Code,
    DiagnosisDescription,
    ConditionDescription,
    Introduction,
    FinalRationale,
}

impl RequiredField {
    pub fn label(self) -> &'static str {
        match self {
            RequiredField::Template => "Letter template",
            RequiredField::LetterDate => "Letter date",
            RequiredField::ProviderFirstName => "Provider first name",
            RequiredField::ProviderLastName => "Provider last name",
            RequiredField::ProviderNpi => "Provider NPI",
            RequiredField::PatientFirstName => "Patient first name",
            RequiredField::PatientLastName => "Patient last name",
            RequiredField::PatientDateOfBirth => "Patient date of birth",
            RequiredField::PolicyNumber => "Policy number",
            RequiredField::InsuranceCompanyName => "Insurance company name",
            RequiredField::Icd10Code => "ICD-10 code",
            RequiredField::DiagnosisDescription => "Diagnosis description",
            RequiredField::ConditionDescription => "Condition description",
            RequiredField::Introduction => "Letter introduction",
            RequiredField::FinalRationale => "Final rationale",
        }
    }

    /// The step whose form owns this field.
    pub fn step(self) -> WizardStep {
        match self {
            RequiredField::Template | RequiredField::LetterDate => WizardStep::TemplateSelection,
            RequiredField::ProviderFirstName
            | RequiredField::ProviderLastName
            | RequiredField::ProviderNpi => WizardStep::ProviderInformation,
            RequiredField::PatientFirstName
            | RequiredField::PatientLastName
            | RequiredField::PatientDateOfBirth => WizardStep::PatientDetails,
            RequiredField::PolicyNumber | RequiredField::InsuranceCompanyName => {
                WizardStep::InsuranceDetails
            }
            RequiredField::Icd10Code | RequiredField::DiagnosisDescription => {
                WizardStep::DiagnosisInformation
            }
            RequiredField::ConditionDescription => WizardStep::TreatmentHistory,
            RequiredField::Introduction | RequiredField::FinalRationale => WizardStep::FinalReview,
        }
    }
}

fn blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Required fields that are still blank, in wizard order.
pub fn missing_required_fields(draft: &DraftLetter) -> Vec<RequiredField> {
    let provider = draft.provider.as_ref();
    let patient = draft.patient.as_ref();
    let insurance = draft.insurance.as_ref();
    let diagnosis = draft.diagnosis.as_ref();
    let history = draft.treatment_history.as_ref();

    let checks = [
        (RequiredField::Template, blank(draft.template_id.as_deref())),
        (RequiredField::LetterDate, blank(draft.letter_date.as_deref())),
        (
            RequiredField::ProviderFirstName,
            blank(provider.map(|p| p.first_name.as_str())),
        ),
        (
            RequiredField::ProviderLastName,
            blank(provider.map(|p| p.last_name.as_str())),
        ),
        (
            RequiredField::ProviderNpi,
            blank(provider.map(|p| p.npi_number.as_str())),
        ),
        (
            RequiredField::PatientFirstName,
            blank(patient.map(|p| p.first_name.as_str())),
        ),
        (
            RequiredField::PatientLastName,
            blank(patient.map(|p| p.last_name.as_str())),
        ),
        (
            RequiredField::PatientDateOfBirth,
            blank(patient.map(|p| p.date_of_birth.as_str())),
        ),
        (
            RequiredField::PolicyNumber,
            blank(insurance.map(|i| i.policy_number.as_str())),
        ),
        (
            RequiredField::InsuranceCompanyName,
            blank(insurance.map(|i| i.company.name.as_str())),
        ),
        (
            RequiredField::Icd10Code,
            blank(diagnosis.map(|d| d.icd10_code.as_str())),
        ),
        (
            RequiredField::DiagnosisDescription,
            blank(diagnosis.map(|d| d.description.as_str())),
        ),
        (
            RequiredField::ConditionDescription,
            blank(history.map(|h| h.condition_description.as_str())),
        ),
        (RequiredField::Introduction, blank(draft.introduction.as_deref())),
        (
            RequiredField::FinalRationale,
            blank(draft.final_rationale.as_deref()),
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(field, missing)| missing.then_some(field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_draft_misses_everything() {
        let missing = missing_required_fields(&DraftLetter::default());
        assert_eq!(missing.len(), 15);
        assert_eq!(missing[0], RequiredField::Template);
        assert_eq!(missing[14], RequiredField::FinalRationale);
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let mut draft = DraftLetter::default();
        draft.introduction = Some("   ".into());
        draft.final_rationale = Some("Because".into());
        let missing = missing_required_fields(&draft);
        assert!(missing.contains(&RequiredField::Introduction));
        assert!(!missing.contains(&RequiredField::FinalRationale));
    }

    #[test]
    fn test_field_steps() {
        assert_eq!(RequiredField::ProviderNpi.step(), WizardStep::ProviderInformation);
        assert_eq!(RequiredField::ConditionDescription.step(), WizardStep::TreatmentHistory);
    }
}
