//! Employee document model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Document row - maps to `employee_documents`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeDocument {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub document_type: String,
    pub file_name: String,
    #[serde(skip_serializing)]
    pub file_path: String,
    pub file_url: String,
    pub content_type: String,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub employee_id: Uuid,
    pub document_type: String,
    pub file_name: String,
    pub file_path: String,
    pub file_url: String,
    pub content_type: String,
    pub uploaded_by: Option<Uuid>,
}
