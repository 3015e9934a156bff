//! Adopter form rules.
//!
//! The same rule functions back both the per-field check (run on blur) and the whole-form
//! check (run on submit), so the two can never disagree about a value.

use super::domain::{AdopterForm, AdopterProfile, HomeType, OccupationStatus};
use crate::workflows::fields::FieldErrors;

const MIN_NAME_CHARS: usize = 2;
const MIN_ADDRESS_CHARS: usize = 10;
const PHONE_DIGITS: usize = 10;

/// Every validated input of the adopter form, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdopterField {
    FullName,
    Email,
    Phone,
    Address,
    OccupationStatus,
    HomeType,
    AgreedToCare,
}

impl AdopterField {
    pub const ALL: [AdopterField; 7] = [
        AdopterField::FullName,
        AdopterField::Email,
        AdopterField::Phone,
        AdopterField::Address,
        AdopterField::OccupationStatus,
        AdopterField::HomeType,
        AdopterField::AgreedToCare,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            AdopterField::FullName => "fullName",
            AdopterField::Email => "email",
            AdopterField::Phone => "phone",
            AdopterField::Address => "address",
            AdopterField::OccupationStatus => "occupationStatus",
            AdopterField::HomeType => "homeType",
            AdopterField::AgreedToCare => "agreedToCare",
        }
    }
}

/// Inputs whose check yields only a message; the enumerated ones also yield a value.
const FREE_FORM: [AdopterField; 5] = [
    AdopterField::FullName,
    AdopterField::Email,
    AdopterField::Phone,
    AdopterField::Address,
    AdopterField::AgreedToCare,
];

/// Check a single field, returning its error message if it fails.
pub fn validate_field(field: AdopterField, form: &AdopterForm) -> Option<String> {
    match field {
        AdopterField::FullName => check_full_name(&form.full_name),
        AdopterField::Email => check_email(&form.email),
        AdopterField::Phone => check_phone(&form.phone),
        AdopterField::Address => check_address(&form.address),
        AdopterField::OccupationStatus => parse_occupation(&form.occupation_status).err(),
        AdopterField::HomeType => parse_home_type(&form.home_type).err(),
        AdopterField::AgreedToCare => check_agreement(form.agreed_to_care),
    }
}

/// Check the whole form; empty when valid.
pub fn validate_adopter(form: &AdopterForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in AdopterField::ALL {
        if let Some(message) = validate_field(field, form) {
            errors.add(field.name(), message);
        }
    }
    errors
}

/// Validate and normalize a form into the stored profile.
pub fn screen_adopter(form: &AdopterForm) -> Result<AdopterProfile, FieldErrors> {
    let mut errors = FieldErrors::new();
    let occupation_status = keep(
        &mut errors,
        AdopterField::OccupationStatus,
        parse_occupation(&form.occupation_status),
    );
    let home_type = keep(
        &mut errors,
        AdopterField::HomeType,
        parse_home_type(&form.home_type),
    );
    for field in FREE_FORM {
        if let Some(message) = validate_field(field, form) {
            errors.add(field.name(), message);
        }
    }

    match (occupation_status, home_type) {
        (Some(occupation_status), Some(home_type)) if errors.is_empty() => Ok(AdopterProfile {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            address: form.address.trim().to_string(),
            occupation_status,
            home_type,
            has_other_pets: form.has_other_pets,
            agreed_to_care: form.agreed_to_care,
        }),
        _ => Err(errors),
    }
}

fn keep<T>(
    errors: &mut FieldErrors,
    field: AdopterField,
    checked: Result<T, String>,
) -> Option<T> {
    match checked {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add(field.name(), message);
            None
        }
    }
}

fn check_full_name(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        Some("full name is required".to_string())
    } else if value.chars().count() < MIN_NAME_CHARS {
        Some(format!("full name must be at least {MIN_NAME_CHARS} characters"))
    } else {
        None
    }
}

fn check_email(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        Some("email is required".to_string())
    } else if !is_email_shaped(value) {
        Some("enter a valid email address".to_string())
    } else {
        None
    }
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain.
fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

fn check_phone(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Some("phone number is required".to_string());
    }
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if digits == PHONE_DIGITS {
        None
    } else {
        Some(format!("phone number must contain exactly {PHONE_DIGITS} digits"))
    }
}

fn check_address(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        Some("address is required".to_string())
    } else if value.chars().count() < MIN_ADDRESS_CHARS {
        Some(format!("address must be at least {MIN_ADDRESS_CHARS} characters"))
    } else {
        None
    }
}

fn parse_occupation(raw: &str) -> Result<OccupationStatus, String> {
    if raw.trim().is_empty() {
        return Err("occupation status is required".to_string());
    }
    OccupationStatus::parse(raw).ok_or_else(|| {
        format!(
            "occupation status must be one of {}",
            OccupationStatus::ALL.map(OccupationStatus::label).join(", ")
        )
    })
}

fn parse_home_type(raw: &str) -> Result<HomeType, String> {
    if raw.trim().is_empty() {
        return Err("home type is required".to_string());
    }
    HomeType::parse(raw).ok_or_else(|| {
        format!(
            "home type must be one of {}",
            HomeType::ALL.map(HomeType::label).join(", ")
        )
    })
}

fn check_agreement(agreed: bool) -> Option<String> {
    (!agreed).then(|| "you must agree to care for the dog".to_string())
}
