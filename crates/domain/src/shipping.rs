//! Shipping address input and validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field-keyed validation failures for a shipping form.
///
/// BTreeMap keeps the field order deterministic for clients and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("shipping validation failed: {fields:?}")]
pub struct ValidationErrors {
    pub fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Returns true if no field failed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Shipping details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl ShippingInfo {
    /// Validates all fields, returning a field-keyed error map on failure.
    ///
    /// Checks are deliberately shallow: presence everywhere, a basic shape
    /// for email, phone, and zip. Carrier-grade address verification is an
    /// upstream concern.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let required: [(&'static str, &str); 8] = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip),
            ("country", &self.country),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(field, format!("{field} is required"));
            }
        }

        if !self.email.trim().is_empty() && !is_plausible_email(&self.email) {
            errors.push("email", "email is not valid");
        }
        if !self.phone.trim().is_empty() && !is_plausible_phone(&self.phone) {
            errors.push("phone", "phone is not valid");
        }
        if !self.zip.trim().is_empty() && !is_plausible_zip(&self.zip) {
            errors.push("zip", "zip is not valid");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

fn is_plausible_phone(phone: &str) -> bool {
    let trimmed = phone.strip_prefix('+').unwrap_or(phone);
    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_plausible_zip(zip: &str) -> bool {
    (4..=10).contains(&zip.len()) && zip.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_shipping() -> ShippingInfo {
        ShippingInfo {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+91 98765 43210".to_string(),
            address: "14 Lakeview Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "KA".to_string(),
            zip: "560001".to_string(),
            country: "IN".to_string(),
        }
    }

    #[test]
    fn test_valid_shipping_passes() {
        assert!(valid_shipping().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_are_keyed() {
        let mut shipping = valid_shipping();
        shipping.name.clear();
        shipping.city = "   ".to_string();

        let errors = shipping.validate().unwrap_err();
        assert!(errors.fields.contains_key("name"));
        assert!(errors.fields.contains_key("city"));
        assert_eq!(errors.fields.len(), 2);
    }

    #[test]
    fn test_bad_email_rejected() {
        for email in ["no-at-sign", "@example.com", "a@", "a@nodot", "a b@example.com"] {
            let mut shipping = valid_shipping();
            shipping.email = email.to_string();
            let errors = shipping.validate().unwrap_err();
            assert!(errors.fields.contains_key("email"), "accepted {email:?}");
        }
    }

    #[test]
    fn test_bad_phone_rejected() {
        for phone in ["12345", "not-a-phone", "12345678901234567890"] {
            let mut shipping = valid_shipping();
            shipping.phone = phone.to_string();
            let errors = shipping.validate().unwrap_err();
            assert!(errors.fields.contains_key("phone"), "accepted {phone:?}");
        }
    }

    #[test]
    fn test_phone_formats_accepted() {
        for phone in ["+1 (555) 012-3456", "9876543210", "555-0123456"] {
            let mut shipping = valid_shipping();
            shipping.phone = phone.to_string();
            assert!(shipping.validate().is_ok(), "rejected {phone:?}");
        }
    }

    #[test]
    fn test_bad_zip_rejected() {
        for zip in ["abc", "56 001", "too-long-zip-code"] {
            let mut shipping = valid_shipping();
            shipping.zip = zip.to_string();
            let errors = shipping.validate().unwrap_err();
            assert!(errors.fields.contains_key("zip"), "accepted {zip:?}");
        }
    }

    #[test]
    fn test_alphanumeric_zip_accepted() {
        let mut shipping = valid_shipping();
        shipping.zip = "EC1A1BB".to_string();
        assert!(shipping.validate().is_ok());
    }

    #[test]
    fn test_missing_field_not_double_reported() {
        let mut shipping = valid_shipping();
        shipping.email.clear();
        let errors = shipping.validate().unwrap_err();
        assert_eq!(errors.fields.get("email").unwrap(), "email is required");
    }
}
