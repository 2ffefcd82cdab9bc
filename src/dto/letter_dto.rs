use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::letter::LetterType;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    #[serde(rename = "type")]
    pub letter_type: LetterType,
    #[validate(length(min = 1, max = 255, message = "Template name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Template content is required"))]
    pub content: String,
    /// Target company for super admins.
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 1, max = 255, message = "Template name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Template content cannot be empty"))]
    pub content: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    #[serde(rename = "type")]
    pub letter_type: Option<LetterType>,
    pub is_active: Option<bool>,
    pub company_id: Option<Uuid>,
}

/// Either a template id or a letter type (resolved to the active template)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenerateLetterRequest {
    pub template_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub letter_type: Option<LetterType>,
    #[serde(default)]
    pub additional_data: HashMap<String, serde_json::Value>,
}
