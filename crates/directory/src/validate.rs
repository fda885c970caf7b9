use std::sync::LazyLock;

use {regex::Regex, shelter_service_traits::ServiceError};

#[allow(clippy::expect_used)]
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("failed to compile phone regex"));

#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("failed to compile email regex")
});

/// Phone numbers: 10 to 15 digits with an optional leading `+`.
pub fn phone(value: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    if PHONE_RE.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(ServiceError::validation(format!(
            "invalid phone number: {value}"
        )))
    }
}

pub fn email(value: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    if EMAIL_RE.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(ServiceError::validation(format!("invalid email: {value}")))
    }
}

/// Free-text report fields must say something.
pub fn report_text(field: &str, value: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ServiceError::validation(format!("{field} must not be empty")))
    } else {
        Ok(value.to_string())
    }
}

pub fn photo(bytes: &[u8]) -> Result<(), ServiceError> {
    if bytes.is_empty() {
        Err(ServiceError::validation("photo is empty"))
    } else {
        Ok(())
    }
}
