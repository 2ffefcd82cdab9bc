//! Letter templates and generated letters
//!
//! Templates are versioned per (company, type); only the newest created or
//! explicitly activated version is active.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Kind of letter - maps to the `letter_type` enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "letter_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LetterType {
    Offer,
    Termination,
    Relieving,
    Fnf,
    Abscond,
}

impl LetterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterType::Offer => "OFFER",
            LetterType::Termination => "TERMINATION",
            LetterType::Relieving => "RELIEVING",
            LetterType::Fnf => "FNF",
            LetterType::Abscond => "ABSCOND",
        }
    }
}

/// Template row - maps to `letter_templates`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LetterTemplate {
    pub id: Uuid,
    pub company_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub letter_type: LetterType,
    pub name: String,
    pub content: String,
    pub version: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial template update
#[derive(Debug, Clone, Default)]
pub struct TemplateChanges {
    pub name: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateFilter {
    pub company_id: Option<Uuid>,
    pub letter_type: Option<LetterType>,
    pub is_active: Option<bool>,
}

impl TemplateFilter {
    pub fn matches(&self, template: &LetterTemplate) -> bool {
        self.company_id.map_or(true, |c| template.company_id == c)
            && self.letter_type.map_or(true, |t| template.letter_type == t)
            && self.is_active.map_or(true, |a| template.is_active == a)
    }
}

/// Generated letter row - maps to `generated_letters`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GeneratedLetter {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub template_id: Option<Uuid>,
    pub generated_content: String,
    #[serde(skip_serializing)]
    pub file_path: String,
    pub file_url: String,
    pub generated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGeneratedLetter {
    pub employee_id: Uuid,
    pub template_id: Uuid,
    pub generated_content: String,
    pub file_path: String,
    pub file_url: String,
    pub generated_by: Option<Uuid>,
}
