//! Hospital admin form validation

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::Coordinates;

/// A list field as submitted: either comma-separated text or an array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListField {
    Text(String),
    Items(Vec<String>),
}

impl ListField {
    /// Split, trim and drop blanks
    pub fn items(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            ListField::Text(text) => text.split(',').collect(),
            ListField::Items(items) => items.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Hospital create/update payload before validation
#[derive(Debug, Clone, Deserialize)]
pub struct HospitalForm {
    pub name: String,
    pub address: String,
    pub contact: String,
    pub lat: f64,
    pub lng: f64,
    pub specialties: ListField,
    pub services: ListField,
}

/// A validated hospital without an id, ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalDraft {
    pub name: String,
    pub address: String,
    pub contact: String,
    pub coordinates: Coordinates,
    pub specialties: Vec<String>,
    pub services: Vec<String>,
}

impl HospitalForm {
    /// Check every field and return the normalized draft, or the first
    /// offending field
    pub fn validate(&self) -> Result<HospitalDraft, ValidationError> {
        let name = required("name", &self.name, "Name is required")?;
        let address = required("address", &self.address, "Address is required")?;
        let contact = required("contact", &self.contact, "Contact number is required")?;

        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(ValidationError::new("lat", "must be between -90 and 90"));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(ValidationError::new("lng", "must be between -180 and 180"));
        }

        let specialties = self.specialties.items();
        if specialties.is_empty() {
            return Err(ValidationError::new(
                "specialties",
                "At least one specialty is required",
            ));
        }
        let services = self.services.items();
        if services.is_empty() {
            return Err(ValidationError::new("services", "At least one service is required"));
        }

        Ok(HospitalDraft {
            name,
            address,
            contact,
            coordinates: Coordinates::new(self.lat, self.lng),
            specialties,
            services,
        })
    }
}

fn required(field: &'static str, value: &str, message: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::new(field, message))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> HospitalForm {
        HospitalForm {
            name: " University of Calabar Teaching Hospital ".into(),
            address: "Calabar, Cross River".into(),
            contact: "+234 800 000 0000".into(),
            lat: 4.9765,
            lng: 8.3473,
            specialties: ListField::Text("Cardiology, Neurology,, ".into()),
            services: ListField::Items(vec![" Emergency ".into(), "".into(), "ICU".into()]),
        }
    }

    #[test]
    fn valid_form_is_normalized() {
        let draft = form().validate().unwrap();
        assert_eq!(draft.name, "University of Calabar Teaching Hospital");
        assert_eq!(draft.specialties, vec!["Cardiology", "Neurology"]);
        assert_eq!(draft.services, vec!["Emergency", "ICU"]);
        assert_eq!(draft.coordinates, Coordinates::new(4.9765, 8.3473));
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut f = form();
        f.contact = "   ".into();
        assert_eq!(f.validate().unwrap_err().field, "contact");
    }

    #[test]
    fn coordinates_out_of_range_are_rejected() {
        let mut f = form();
        f.lat = -91.0;
        assert_eq!(f.validate().unwrap_err().field, "lat");

        let mut f = form();
        f.lng = 180.5;
        assert_eq!(f.validate().unwrap_err().field, "lng");
    }

    #[test]
    fn list_of_only_separators_is_rejected() {
        let mut f = form();
        f.specialties = ListField::Text(" , ,".into());
        assert_eq!(f.validate().unwrap_err().field, "specialties");
    }

    #[test]
    fn form_accepts_text_or_array_lists() {
        let f: HospitalForm = serde_json::from_value(serde_json::json!({
            "name": "A", "address": "B", "contact": "C", "lat": 0, "lng": 0,
            "specialties": "Dentistry", "services": ["Outpatient"]
        }))
        .unwrap();
        let draft = f.validate().unwrap();
        assert_eq!(draft.specialties, vec!["Dentistry"]);
        assert_eq!(draft.services, vec!["Outpatient"]);
    }
}
