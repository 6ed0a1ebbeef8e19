//! Step 4: insurance policy, policy holder and insurer mailing details.

use crate::draft::Insurance;
use crate::store::DraftStore;
use crate::LetterError;
use serde::Deserialize;
use std::str::FromStr;

/// Insurance form fields. Form names use dotted paths for the nested parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum InsuranceField {
    PolicyNumber,
    GroupNumber,
    PolicyHolderFirstName,
    PolicyHolderLastName,
    PolicyHolderDateOfBirth,
    CompanyName,
    CompanyContactName,
    CompanyContactTitle,
    CompanyPhone,
    CompanyAddress1,
    CompanyAddress2,
    CompanyCity,
    CompanyState,
    CompanyZip,
}

impl InsuranceField {
    pub const ALL: [InsuranceField; 14] = [
        InsuranceField::PolicyNumber,
        InsuranceField::GroupNumber,
        InsuranceField::PolicyHolderFirstName,
        InsuranceField::PolicyHolderLastName,
        InsuranceField::PolicyHolderDateOfBirth,
        InsuranceField::CompanyName,
        InsuranceField::CompanyContactName,
        InsuranceField::CompanyContactTitle,
        InsuranceField::CompanyPhone,
        InsuranceField::CompanyAddress1,
        InsuranceField::CompanyAddress2,
        InsuranceField::CompanyCity,
        InsuranceField::CompanyState,
        InsuranceField::CompanyZip,
    ];

    pub fn form_name(self) -> &'static str {
        match self {
            InsuranceField::PolicyNumber => "policyNumber",
            InsuranceField::GroupNumber => "groupNumber",
            InsuranceField::PolicyHolderFirstName => "policyHolder.firstName",
            InsuranceField::PolicyHolderLastName => "policyHolder.lastName",
            InsuranceField::PolicyHolderDateOfBirth => "policyHolder.dateOfBirth",
            InsuranceField::CompanyName => "company.name",
            InsuranceField::CompanyContactName => "company.contactName",
            InsuranceField::CompanyContactTitle => "company.contactTitle",
            InsuranceField::CompanyPhone => "company.phone",
            InsuranceField::CompanyAddress1 => "company.address1",
            InsuranceField::CompanyAddress2 => "company.address2",
            InsuranceField::CompanyCity => "company.city",
            InsuranceField::CompanyState => "company.state",
            InsuranceField::CompanyZip => "company.zip",
        }
    }

    fn slot(self, insurance: &mut Insurance) -> &mut String {
        match self {
            InsuranceField::PolicyNumber => &mut insurance.policy_number,
            InsuranceField::GroupNumber => &mut insurance.group_number,
            InsuranceField::PolicyHolderFirstName => &mut insurance.policy_holder.first_name,
            InsuranceField::PolicyHolderLastName => &mut insurance.policy_holder.last_name,
            InsuranceField::PolicyHolderDateOfBirth => &mut insurance.policy_holder.date_of_birth,
            InsuranceField::CompanyName => &mut insurance.company.name,
            InsuranceField::CompanyContactName => &mut insurance.company.contact_name,
            InsuranceField::CompanyContactTitle => &mut insurance.company.contact_title,
            InsuranceField::CompanyPhone => &mut insurance.company.phone,
            InsuranceField::CompanyAddress1 => &mut insurance.company.address1,
            InsuranceField::CompanyAddress2 => &mut insurance.company.address2,
            InsuranceField::CompanyCity => &mut insurance.company.city,
            InsuranceField::CompanyState => &mut insurance.company.state,
            InsuranceField::CompanyZip => &mut insurance.company.zip,
        }
    }
}

impl FromStr for InsuranceField {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.form_name() == s)
            .ok_or_else(|| LetterError::UnknownField(s.to_string()))
    }
}

impl TryFrom<String> for InsuranceField {
    type Error = LetterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

pub struct InsuranceDetails;

impl InsuranceDetails {
    pub fn set_field(store: &mut DraftStore, field: InsuranceField, value: impl Into<String>) {
        let value = value.into();
        store.modify(|letter| *field.slot(letter.insurance_mut()) = value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_names_round_trip() {
        for field in InsuranceField::ALL {
            assert_eq!(field.form_name().parse::<InsuranceField>().unwrap(), field);
        }
        assert!("company.fax".parse::<InsuranceField>().is_err());
    }

    #[test]
    fn test_nested_fields_do_not_clobber_each_other() {
        let mut store = DraftStore::new();
        InsuranceDetails::set_field(&mut store, InsuranceField::PolicyNumber, "P-1");
        InsuranceDetails::set_field(&mut store, InsuranceField::CompanyName, "Acme Health");
        InsuranceDetails::set_field(&mut store, InsuranceField::PolicyHolderLastName, "Doe");
        InsuranceDetails::set_field(&mut store, InsuranceField::CompanyZip, "02139");

        let insurance = store.letter().insurance.as_ref().unwrap();
        assert_eq!(insurance.policy_number, "P-1");
        assert_eq!(insurance.company.name, "Acme Health");
        assert_eq!(insurance.company.zip, "02139");
        assert_eq!(insurance.policy_holder.last_name, "Doe");
    }

    #[test]
    fn test_deserialize_from_form_name() {
        let field: InsuranceField = serde_json::from_str("\"company.address2\"").unwrap();
        assert_eq!(field, InsuranceField::CompanyAddress2);
    }
}
