use crate::constants::STEP_COUNT;
use crate::LetterError;
use serde::{Deserialize, Serialize};

/// The seven wizard steps, numbered 1 to 7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum WizardStep {
    TemplateSelection = 1,
    ProviderInformation = 2,
    PatientDetails = 3,
    InsuranceDetails = 4,
    DiagnosisInformation = 5,
    TreatmentHistory = 6,
    FinalReview = 7,
}

impl WizardStep {
    pub const ALL: [WizardStep; STEP_COUNT as usize] = [
        WizardStep::TemplateSelection,
        WizardStep::ProviderInformation,
        WizardStep::PatientDetails,
        WizardStep::InsuranceDetails,
        WizardStep::DiagnosisInformation,
        WizardStep::TreatmentHistory,
        WizardStep::FinalReview,
    ];

    pub const FIRST: WizardStep = WizardStep::TemplateSelection;
    pub const LAST: WizardStep = WizardStep::FinalReview;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        n.checked_sub(1)
            .and_then(|index| Self::ALL.get(usize::from(index)))
            .copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::TemplateSelection => "Template Selection",
            WizardStep::ProviderInformation => "Provider Information",
            WizardStep::PatientDetails => "Patient Details",
            WizardStep::InsuranceDetails => "Insurance Details",
            WizardStep::DiagnosisInformation => "Diagnosis Information",
            WizardStep::TreatmentHistory => "Treatment History",
            WizardStep::FinalReview => "Final Review",
        }
    }

    /// The following step, or `None` on the final step.
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// The preceding step, or `None` on the first step.
    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = LetterError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or(LetterError::InvalidStep(n))
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}
