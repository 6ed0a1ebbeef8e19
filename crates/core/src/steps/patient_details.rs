//! Step 3: patient details.

use crate::store::DraftStore;
use crate::LetterError;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatientField {
    FirstName,
    LastName,
    DateOfBirth,
}

impl FromStr for PatientField {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firstName" => Ok(Self::FirstName),
            "lastName" => Ok(Self::LastName),
            "dateOfBirth" => Ok(Self::DateOfBirth),
            other => Err(LetterError::UnknownField(other.to_string())),
        }
    }
}

pub struct PatientDetails;

impl PatientDetails {
    pub fn set_field(store: &mut DraftStore, field: PatientField, value: impl Into<String>) {
        let value = value.into();
        store.modify(|letter| {
            let patient = letter.patient_mut();
            match field {
                PatientField::FirstName => patient.first_name = value,
                PatientField::LastName => patient.last_name = value,
                PatientField::DateOfBirth => patient.date_of_birth = value,
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_keeps_other_fields() {
        let mut store = DraftStore::new();
        PatientDetails::set_field(&mut store, PatientField::FirstName, "Ada");
        PatientDetails::set_field(&mut store, "dateOfBirth".parse().unwrap(), "1990-01-02");

        let patient = store.letter().patient.as_ref().unwrap();
        assert_eq!(patient.first_name, "Ada");
        assert_eq!(patient.date_of_birth, "1990-01-02");
        assert!(patient.last_name.is_empty());
    }

    #[test]
    fn test_unknown_field_name() {
        assert!(matches!(
            "middleName".parse::<PatientField>(),
            Err(LetterError::UnknownField(_))
        ));
    }
}
