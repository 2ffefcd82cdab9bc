use serde::Deserialize;
use validator::Validate;

fn default_content_type() -> String {
    "application/octet-stream".to_string()
}

/// Document upload, file content as base64
#[derive(Debug, Deserialize, Validate)]
pub struct UploadDocumentRequest {
    #[validate(length(min = 1, max = 100, message = "Document type is required"))]
    pub document_type: String,
    #[validate(length(min = 1, max = 255, message = "File name is required"))]
    pub file_name: String,
    #[serde(default = "default_content_type")]
    #[validate(length(min = 1, max = 255, message = "Content type is required"))]
    pub content_type: String,
    #[validate(length(min = 1, message = "File data is required"))]
    pub file_data: String,
}
