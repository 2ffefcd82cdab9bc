//! Validation helpers
//!
//! Field patterns shared by the request DTOs and the `ValidatedJson`
//! extractor that runs `validator` before a handler sees the body.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::utils::errors::AppError;

lazy_static! {
    /// Aadhaar numbers are exactly 12 ASCII digits.
    pub static ref AADHAAR_REGEX: Regex = Regex::new(r"^[0-9]{12}$").unwrap();
    /// Phone numbers are exactly 10 ASCII digits.
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

/// JSON body extractor that also runs `Validate::validate`.
///
/// Malformed JSON is reported as `BAD_REQUEST`, failed field rules as
/// `VALIDATION_ERROR` with one message per field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Trim a string, treating blank input as absent.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aadhaar_regex() {
        assert!(AADHAAR_REGEX.is_match("123456789012"));
        assert!(!AADHAAR_REGEX.is_match("12345678901"));
        assert!(!AADHAAR_REGEX.is_match("1234 5678 9012"));
        assert!(!AADHAAR_REGEX.is_match("12345678901a"));
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("9876543210"));
        assert!(!PHONE_REGEX.is_match("+919876543210"));
        assert!(!PHONE_REGEX.is_match("98765"));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        // Devanagari and Arabic-Indic digits
        assert!(!AADHAAR_REGEX.is_match("१२३४५६७८९०१२"));
        assert!(!PHONE_REGEX.is_match("٩٨٧٦٥٤٣٢١٠"));
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("   ".into())), None);
        assert_eq!(normalize_optional(Some(" a@b.in ".into())), Some("a@b.in".into()));
    }
}
