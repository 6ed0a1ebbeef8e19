//! The accumulating letter document.
//!
//! A [`DraftLetter`] is partial while the wizard runs: every top-level slice is optional and
//! every nested field defaults to an empty string. The same type doubles as the partial update
//! accepted by [`DraftLetter::merge`]: a slice that is `Some` in the update replaces the whole
//! slice in the draft, a slice that is `None` leaves the draft's slice untouched.
//!
//! ## Calling convention for nested slices
//!
//! `merge` is shallow. Updating one field of `diagnosis` through `merge` requires passing the
//! complete `diagnosis` slice (old values plus the change); passing a slice holding only the
//! changed field drops every other diagnosis field. Step components avoid this by editing in
//! place through the `*_mut` accessors (see [`crate::store::DraftStore::modify`]).

use crate::collaborators::{Organization, Template, UserProfile};
use crate::entries::{EntryList, ListEntry};
use lmn_types::EntryId;
use serde::{Deserialize, Serialize};

/// The signing clinician.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderDetails {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(alias = "npi")]
    pub npi_number: String,
}

impl From<&UserProfile> for ProviderDetails {
    fn from(profile: &UserProfile) -> Self {
        Self {
            title: profile.title.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            npi_number: profile.npi_number.clone(),
        }
    }
}

/// The clinician's organisation as printed on the letter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Practice {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub logo: String,
}

impl From<&Organization> for Practice {
    /// Address details come from the organisation's first location.
    fn from(organization: &Organization) -> Self {
        let location = organization.locations.first().cloned().unwrap_or_default();
        Self {
            name: organization.name.clone(),
            address: location.address,
            city: location.city,
            state: location.state,
            zip: location.zip,
            phone: location.phone,
            logo: organization.logo.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyHolder {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuranceCompany {
    pub name: String,
    pub contact_name: String,
    pub contact_title: String,
    pub phone: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Insurance {
    pub policy_number: String,
    pub group_number: String,
    pub policy_holder: PolicyHolder,
    pub company: InsuranceCompany,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    pub id: EntryId,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub test: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub unit: String,
}

impl ListEntry for LabResult {
    fn id(&self) -> &EntryId {
        &self.id
    }

    fn blank(id: EntryId) -> Self {
        Self {
            id,
            date: String::new(),
            test: String::new(),
            result: String::new(),
            unit: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Diagnosis {
    pub icd10_code: String,
    pub description: String,
    pub lab_results: EntryList<LabResult>,
    pub additional_details: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub id: EntryId,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub treatment: String,
    #[serde(default)]
    pub outcome: String,
}

impl ListEntry for Treatment {
    fn id(&self) -> &EntryId {
        &self.id
    }

    fn blank(id: EntryId) -> Self {
        Self {
            id,
            date: String::new(),
            treatment: String::new(),
            outcome: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreatmentHistory {
    pub condition_description: String,
    pub treatments: EntryList<Treatment>,
    pub rationale: String,
}

/// Top-level slices of a [`DraftLetter`], used to report what a mutation changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Slice {
    TemplateId,
    Template,
    LetterDate,
    Provider,
    Practice,
    Patient,
    Insurance,
    Diagnosis,
    TreatmentHistory,
    Introduction,
    FinalRationale,
}

impl Slice {
    pub const ALL: [Slice; 11] = [
        Slice::TemplateId,
        Slice::Template,
        Slice::LetterDate,
        Slice::Provider,
        Slice::Practice,
        Slice::Patient,
        Slice::Insurance,
        Slice::Diagnosis,
        Slice::TreatmentHistory,
        Slice::Introduction,
        Slice::FinalRationale,
    ];
}

/// The letter being assembled across the wizard steps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftLetter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice: Option<Practice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Insurance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Diagnosis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_history: Option<TreatmentHistory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_rationale: Option<String>,
}

macro_rules! merge_slices {
    ($target:expr, $patch:expr, $( $field:ident ),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = Some(value);
            }
        )+
    };
}

impl DraftLetter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow merge: every slice present in `patch` replaces the draft's slice wholesale.
    pub fn merge(&mut self, patch: DraftLetter) {
        merge_slices!(
            self,
            patch,
            template_id,
            template,
            letter_date,
            provider,
            practice,
            patient,
            insurance,
            diagnosis,
            treatment_history,
            introduction,
            final_rationale,
        );
    }

    /// Slices whose value differs between `self` and `other`, in [`Slice::ALL`] order.
    pub fn changed_slices(&self, other: &DraftLetter) -> Vec<Slice> {
        Slice::ALL
            .into_iter()
            .filter(|slice| match slice {
                Slice::TemplateId => self.template_id != other.template_id,
                Slice::Template => self.template != other.template,
                Slice::LetterDate => self.letter_date != other.letter_date,
                Slice::Provider => self.provider != other.provider,
                Slice::Practice => self.practice != other.practice,
                Slice::Patient => self.patient != other.patient,
                Slice::Insurance => self.insurance != other.insurance,
                Slice::Diagnosis => self.diagnosis != other.diagnosis,
                Slice::TreatmentHistory => self.treatment_history != other.treatment_history,
                Slice::Introduction => self.introduction != other.introduction,
                Slice::FinalRationale => self.final_rationale != other.final_rationale,
            })
            .collect()
    }

    pub fn provider_mut(&mut self) -> &mut ProviderDetails {
        self.provider.get_or_insert_with(Default::default)
    }

    pub fn practice_mut(&mut self) -> &mut Practice {
        self.practice.get_or_insert_with(Default::default)
    }

    pub fn patient_mut(&mut self) -> &mut Patient {
        self.patient.get_or_insert_with(Default::default)
    }

    pub fn insurance_mut(&mut self) -> &mut Insurance {
        self.insurance.get_or_insert_with(Default::default)
    }

    pub fn diagnosis_mut(&mut self) -> &mut Diagnosis {
        self.diagnosis.get_or_insert_with(Default::default)
    }

    pub fn treatment_history_mut(&mut self) -> &mut TreatmentHistory {
        self.treatment_history.get_or_insert_with(Default::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnosed() -> DraftLetter {
        DraftLetter {
            diagnosis: Some(Diagnosis {
                icd10_code: "J45.50".into(),
                description: "Severe persistent asthma".into(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_preserves_absent_slices() {
        let mut draft = diagnosed();
        draft.merge(DraftLetter {
            introduction: Some("Dear Sir".into()),
            ..Default::default()
        });
        assert_eq!(draft.diagnosis, diagnosed().diagnosis);
        assert_eq!(draft.introduction.as_deref(), Some("Dear Sir"));
    }

    #[test]
    fn test_merge_replaces_nested_slice_wholesale() {
        let mut draft = diagnosed();
        draft.merge(DraftLetter {
            diagnosis: Some(Diagnosis {
                description: "Changed".into(),
                ..Default::default()
            }),
            ..Default::default()
        });
        let diagnosis = draft.diagnosis.unwrap();
        assert_eq!(diagnosis.description, "Changed");
        assert!(diagnosis.icd10_code.is_empty());
    }

    #[test]
    fn test_changed_slices() {
        let before = diagnosed();
        let mut after = before.clone();
        after.diagnosis_mut().icd10_code = "E11.9".into();
        after.letter_date = Some("2024-03-05".into());
        assert_eq!(
            before.changed_slices(&after),
            vec![Slice::LetterDate, Slice::Diagnosis]
        );
        assert!(before.changed_slices(&before.clone()).is_empty());
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let json = r#"{
            "provider": {"title": "MD", "firstName": "John", "lastName": "Doe", "npi": "1234567890"},
            "diagnosis": {"icd10Code": "J45.50", "labResults": [{"id": "a", "test": "IgE"}]}
        }"#;
        let draft: DraftLetter = serde_json::from_str(json).unwrap();
        assert_eq!(draft.provider.as_ref().unwrap().npi_number, "1234567890");
        let labs = &draft.diagnosis.as_ref().unwrap().lab_results;
        assert_eq!(labs.len(), 1);
        assert_eq!(labs.as_slice()[0].test, "IgE");

        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("patient").is_none());
        assert_eq!(value["provider"]["npiNumber"], "1234567890");
        assert_eq!(value["diagnosis"]["icd10Code"], "J45.50");
    }

    #[test]
    fn test_practice_from_organization_uses_first_location() {
        let organization = Organization {
            id: "1".into(),
            name: "Medical Center".into(),
            locations: vec![crate::collaborators::OrganizationLocation {
                address: "123 Healthcare Ave".into(),
                city: "Medical City".into(),
                state: "MC".into(),
                zip: "12345".into(),
                phone: "(555) 123-4567".into(),
            }],
            ..Default::default()
        };
        let practice = Practice::from(&organization);
        assert_eq!(practice.name, "Medical Center");
        assert_eq!(practice.phone, "(555) 123-4567");

        let bare = Practice::from(&Organization::default());
        assert!(bare.address.is_empty());
    }
}
