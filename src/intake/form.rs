//! ROF 5 (Request for Opinion Form 5) intake record.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::fields::{canonical_field, FieldLookup};
use crate::error::{FanisiError, FanisiResult};
use crate::template::DocumentVariable;
use crate::workflow::Priority;

/// Fields that must be non-blank on the validated creation path.
pub const REQUIRED_FIELDS: [&str; 3] = ["siteCode", "siteLocation", "landlordName"];

/// Every string field of the form, by its camelCase name.
pub const FIELD_NAMES: [&str; 27] = [
    "siteCode",
    "siteLocation",
    "county",
    "subCounty",
    "ward",
    "titleNumber",
    "titleType",
    "registrationSection",
    "landArea",
    "landUse",
    "landlordName",
    "landlordType",
    "landlordAddress",
    "landlordPhone",
    "landlordEmail",
    "landlordId",
    "leaseType",
    "leaseTerm",
    "commencementDate",
    "monthlyRent",
    "deposit",
    "rentEscalation",
    "permitType",
    "specialConditions",
    "instructingCounsel",
    "urgencyLevel",
    "expectedCompletionDate",
];

/// Captured intake form for one leasing instruction.
///
/// Values are kept as entered; numeric fields are interpreted by whoever
/// needs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rof5Form {
    // Site details
    pub site_code: String,
    pub site_location: String,
    pub county: String,
    pub sub_county: String,
    pub ward: String,

    // Title details
    pub title_number: String,
    pub title_type: String,
    pub registration_section: String,
    pub land_area: String,
    pub land_use: String,

    // Landlord information
    pub landlord_name: String,
    pub landlord_type: String,
    pub landlord_address: String,
    pub landlord_phone: String,
    pub landlord_email: String,
    pub landlord_id: String,

    // Lease terms
    pub lease_type: String,
    pub lease_term: String,
    pub commencement_date: String,
    pub monthly_rent: String,
    pub deposit: String,
    pub rent_escalation: String,

    // Additional terms
    pub permit_type: String,
    pub special_conditions: String,
    pub documents_received: Vec<String>,

    // Internal details
    pub instructing_counsel: String,
    pub urgency_level: String,
    pub expected_completion_date: String,
}

impl Default for Rof5Form {
    fn default() -> Self {
        Self {
            site_code: String::new(),
            site_location: String::new(),
            county: String::new(),
            sub_county: String::new(),
            ward: String::new(),
            title_number: String::new(),
            title_type: String::new(),
            registration_section: String::new(),
            land_area: String::new(),
            land_use: String::new(),
            landlord_name: String::new(),
            landlord_type: String::new(),
            landlord_address: String::new(),
            landlord_phone: String::new(),
            landlord_email: String::new(),
            landlord_id: String::new(),
            lease_type: String::new(),
            lease_term: String::new(),
            commencement_date: String::new(),
            monthly_rent: String::new(),
            deposit: String::new(),
            rent_escalation: "5".to_string(),
            permit_type: String::new(),
            special_conditions: String::new(),
            documents_received: Vec::new(),
            instructing_counsel: String::new(),
            urgency_level: String::new(),
            expected_completion_date: String::new(),
        }
    }
}

impl Rof5Form {
    /// Required fields that are blank, by camelCase name.
    pub fn missing_required_fields(&self) -> Vec<String> {
        REQUIRED_FIELDS
            .iter()
            .filter(|name| self.lookup(name).map_or(true, |v| v.trim().is_empty()))
            .map(|name| (*name).to_string())
            .collect()
    }

    /// Fail with a validation error listing every blank required field.
    pub fn validate(&self) -> FanisiResult<()> {
        let missing = self.missing_required_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FanisiError::Validation { missing })
        }
    }

    /// Priority asked for on the form, if the urgency level names one.
    pub fn requested_priority(&self) -> Option<Priority> {
        match self.urgency_level.trim().to_lowercase().as_str() {
            "urgent" => Some(Priority::High),
            other => other.parse().ok(),
        }
    }

    /// Template bindings derived from the form.
    pub fn document_bindings(&self, today: NaiveDate) -> Vec<DocumentVariable> {
        vec![
            DocumentVariable::new("current_date", today.format("%d/%m/%Y").to_string()),
            DocumentVariable::new("site_code", &self.site_code),
            DocumentVariable::new("site_location", &self.site_location),
            DocumentVariable::new("landlord_name", &self.landlord_name),
            DocumentVariable::new("landlord_address", &self.landlord_address),
            DocumentVariable::new("title_number", &self.title_number),
            DocumentVariable::new("land_area", &self.land_area),
            DocumentVariable::new("commencement_date", &self.commencement_date),
            DocumentVariable::new("lease_term", &self.lease_term),
            DocumentVariable::new("monthly_rent", &self.monthly_rent),
            DocumentVariable::new("escalation_rate", &self.rent_escalation),
            DocumentVariable::new("deposit", &self.deposit),
            DocumentVariable::new("lease_type", &self.lease_type),
            DocumentVariable::new("file_ref", format!("{}/{}", self.site_code, today.year())),
        ]
    }

    /// Set a string field by camelCase or snake_case name.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> FanisiResult<()> {
        let slot = self
            .slot_mut(&canonical_field(name))
            .ok_or_else(|| FanisiError::UnknownField(name.to_string()))?;
        *slot = value.into();
        Ok(())
    }

    /// Tick or untick an entry on the documents-received checklist.
    pub fn set_document_received(&mut self, document: &str, received: bool) {
        if received {
            if !self.documents_received.iter().any(|d| d == document) {
                self.documents_received.push(document.to_string());
            }
        } else {
            self.documents_received.retain(|d| d != document);
        }
    }

    fn slot(&self, canonical: &str) -> Option<&String> {
        let value = match canonical {
            "siteCode" => &self.site_code,
            "siteLocation" => &self.site_location,
            "county" => &self.county,
            "subCounty" => &self.sub_county,
            "ward" => &self.ward,
            "titleNumber" => &self.title_number,
            "titleType" => &self.title_type,
            "registrationSection" => &self.registration_section,
            "landArea" => &self.land_area,
            "landUse" => &self.land_use,
            "landlordName" => &self.landlord_name,
            "landlordType" => &self.landlord_type,
            "landlordAddress" => &self.landlord_address,
            "landlordPhone" => &self.landlord_phone,
            "landlordEmail" => &self.landlord_email,
            "landlordId" => &self.landlord_id,
            "leaseType" => &self.lease_type,
            "leaseTerm" => &self.lease_term,
            "commencementDate" => &self.commencement_date,
            "monthlyRent" => &self.monthly_rent,
            "deposit" => &self.deposit,
            "rentEscalation" => &self.rent_escalation,
            "permitType" => &self.permit_type,
            "specialConditions" => &self.special_conditions,
            "instructingCounsel" => &self.instructing_counsel,
            "urgencyLevel" => &self.urgency_level,
            "expectedCompletionDate" => &self.expected_completion_date,
            _ => return None,
        };
        Some(value)
    }

    fn slot_mut(&mut self, canonical: &str) -> Option<&mut String> {
        let value = match canonical {
            "siteCode" => &mut self.site_code,
            "siteLocation" => &mut self.site_location,
            "county" => &mut self.county,
            "subCounty" => &mut self.sub_county,
            "ward" => &mut self.ward,
            "titleNumber" => &mut self.title_number,
            "titleType" => &mut self.title_type,
            "registrationSection" => &mut self.registration_section,
            "landArea" => &mut self.land_area,
            "landUse" => &mut self.land_use,
            "landlordName" => &mut self.landlord_name,
            "landlordType" => &mut self.landlord_type,
            "landlordAddress" => &mut self.landlord_address,
            "landlordPhone" => &mut self.landlord_phone,
            "landlordEmail" => &mut self.landlord_email,
            "landlordId" => &mut self.landlord_id,
            "leaseType" => &mut self.lease_type,
            "leaseTerm" => &mut self.lease_term,
            "commencementDate" => &mut self.commencement_date,
            "monthlyRent" => &mut self.monthly_rent,
            "deposit" => &mut self.deposit,
            "rentEscalation" => &mut self.rent_escalation,
            "permitType" => &mut self.permit_type,
            "specialConditions" => &mut self.special_conditions,
            "instructingCounsel" => &mut self.instructing_counsel,
            "urgencyLevel" => &mut self.urgency_level,
            "expectedCompletionDate" => &mut self.expected_completion_date,
            _ => return None,
        };
        Some(value)
    }
}

impl FieldLookup for Rof5Form {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.slot(&canonical_field(name)).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn westlands() -> Rof5Form {
        Rof5Form {
            site_code: "NBI001".to_string(),
            site_location: "Westlands".to_string(),
            landlord_name: "ABC Ltd".to_string(),
            ..Rof5Form::default()
        }
    }

    #[test]
    fn test_default_escalation() {
        assert_eq!(Rof5Form::default().rent_escalation, "5");
    }

    #[test]
    fn test_missing_required_fields() {
        let mut form = westlands();
        assert!(form.missing_required_fields().is_empty());
        assert!(form.validate().is_ok());

        form.site_location = "   ".to_string();
        form.landlord_name.clear();
        assert_eq!(form.missing_required_fields(), vec!["siteLocation", "landlordName"]);
        assert!(matches!(form.validate(), Err(FanisiError::Validation { .. })));
    }

    #[test]
    fn test_requested_priority() {
        let mut form = Rof5Form::default();
        assert_eq!(form.requested_priority(), None);

        form.urgency_level = "high".to_string();
        assert_eq!(form.requested_priority(), Some(Priority::High));

        form.urgency_level = "Urgent".to_string();
        assert_eq!(form.requested_priority(), Some(Priority::High));

        form.urgency_level = "low".to_string();
        assert_eq!(form.requested_priority(), Some(Priority::Low));
    }

    #[test]
    fn test_document_bindings() {
        let mut form = westlands();
        form.monthly_rent = "50000".to_string();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let bindings = form.document_bindings(today);
        assert_eq!(bindings.len(), 14);

        let get = |key: &str| bindings.iter().find(|b| b.key == key).map(|b| b.value.clone());
        assert_eq!(get("current_date").as_deref(), Some("19/10/2026"));
        assert_eq!(get("file_ref").as_deref(), Some("NBI001/2026"));
        assert_eq!(get("escalation_rate").as_deref(), Some("5"));
        assert_eq!(get("monthly_rent").as_deref(), Some("50000"));
    }

    #[test]
    fn test_field_lookup_names() {
        let mut form = westlands();
        form.rent_escalation = "7".to_string();

        assert_eq!(form.lookup("siteCode"), Some("NBI001"));
        assert_eq!(form.lookup("site_code"), Some("NBI001"));
        assert_eq!(form.lookup("escalation_rate"), Some("7"));
        assert_eq!(form.lookup("nonsense"), None);
    }

    #[test]
    fn test_set_field() {
        let mut form = Rof5Form::default();
        form.set_field("siteLocation", "Karen").unwrap();
        form.set_field("monthly_rent", "80000").unwrap();
        assert_eq!(form.site_location, "Karen");
        assert_eq!(form.monthly_rent, "80000");

        let err = form.set_field("documentsReceived", "x").unwrap_err();
        assert!(matches!(err, FanisiError::UnknownField(_)));
    }

    #[test]
    fn test_every_field_name_resolves() {
        let mut form = Rof5Form::default();
        for name in FIELD_NAMES {
            form.set_field(name, name).unwrap();
            assert_eq!(form.lookup(name), Some(name));
        }
    }

    #[test]
    fn test_documents_received_checklist() {
        let mut form = Rof5Form::default();
        form.set_document_received("Title Deed", true);
        form.set_document_received("Title Deed", true);
        form.set_document_received("KRA PIN", true);
        assert_eq!(form.documents_received, vec!["Title Deed", "KRA PIN"]);

        form.set_document_received("Title Deed", false);
        assert_eq!(form.documents_received, vec!["KRA PIN"]);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"siteCode":"MSA002","landlordName":"XYZ Holdings","urgencyLevel":"medium"}"#;
        let form: Rof5Form = serde_json::from_str(json).unwrap();
        assert_eq!(form.site_code, "MSA002");
        assert_eq!(form.landlord_name, "XYZ Holdings");
        assert_eq!(form.rent_escalation, "5");
        assert!(form.documents_received.is_empty());
    }
}
