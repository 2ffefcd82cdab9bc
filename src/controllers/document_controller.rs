//! Employee documents
//!
//! Files arrive base64-encoded in JSON, are written through `FileStorage`
//! and recorded in `employee_documents`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    controllers::scoped_employee,
    dto::document_dto::UploadDocumentRequest,
    middleware::auth::AuthenticatedUser,
    models::document::{EmployeeDocument, NewDocument},
    state::AppState,
    utils::errors::{not_found_error, AppError, AppResult},
};

/// Largest accepted decoded upload.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Request body limit for uploads: the base64 form of the largest file plus
/// room for the surrounding JSON.
pub const MAX_UPLOAD_BODY_BYTES: usize = MAX_DOCUMENT_BYTES / 3 * 4 + 1024 * 1024;

/// Lower-cased alphanumeric extension of `file_name`, `bin` when there is none.
fn extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string())
}

fn decode(file_data: &str) -> AppResult<Vec<u8>> {
    // Accept data URLs as sent by browsers.
    let payload = match file_data.split_once(";base64,") {
        Some((_, data)) => data,
        None => file_data,
    };
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| AppError::BadRequest("File data is not valid base64".to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("File is empty".to_string()));
    }
    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(AppError::BadRequest("File exceeds the 10 MB limit".to_string()));
    }
    Ok(bytes)
}

pub struct DocumentController {
    state: AppState,
}

impl DocumentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    pub async fn upload(
        &self,
        caller: &AuthenticatedUser,
        employee_id: Uuid,
        request: UploadDocumentRequest,
    ) -> AppResult<EmployeeDocument> {
        let employee = scoped_employee(&self.state, caller, employee_id).await?;
        let bytes = decode(&request.file_data)?;

        let path = format!(
            "{}/{}/{}.{}",
            employee.company_id,
            employee.id,
            Uuid::new_v4(),
            extension(&request.file_name)
        );
        let size = bytes.len();
        self.state.storage.put(&path, bytes).await?;

        let created = self
            .state
            .repos
            .documents
            .create(NewDocument {
                employee_id: employee.id,
                document_type: request.document_type.trim().to_string(),
                file_name: request.file_name.trim().to_string(),
                file_url: self.state.storage.public_url(&path),
                file_path: path.clone(),
                content_type: request.content_type,
                uploaded_by: Some(caller.user_id),
            })
            .await;

        match created {
            Ok(document) => {
                info!(
                    "📎 Document {} ({} bytes) stored for employee {}",
                    document.id, size, employee.employee_code
                );
                Ok(document)
            }
            Err(e) => {
                if let Err(cleanup) = self.state.storage.remove(&path).await {
                    warn!("⚠️ Could not remove orphaned upload {}: {}", path, cleanup);
                }
                Err(e)
            }
        }
    }

    pub async fn list(&self, caller: &AuthenticatedUser, employee_id: Uuid) -> AppResult<Vec<EmployeeDocument>> {
        scoped_employee(&self.state, caller, employee_id).await?;
        self.state.repos.documents.list_for_employee(employee_id).await
    }

    pub async fn get(&self, caller: &AuthenticatedUser, employee_id: Uuid, id: Uuid) -> AppResult<EmployeeDocument> {
        scoped_employee(&self.state, caller, employee_id).await?;
        self.state
            .repos
            .documents
            .find(employee_id, id)
            .await?
            .ok_or_else(|| not_found_error("Document"))
    }

    pub async fn delete(&self, caller: &AuthenticatedUser, employee_id: Uuid, id: Uuid) -> AppResult<()> {
        let document = self.get(caller, employee_id, id).await?;

        if !self.state.repos.documents.delete(document.id).await? {
            return Err(not_found_error("Document"));
        }
        if let Err(e) = self.state.storage.remove(&document.file_path).await {
            warn!("⚠️ Could not remove {}: {}", document.file_path, e);
        }

        info!("🗑️ Document {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(extension("aadhaar.PDF"), "pdf");
        assert_eq!(extension("photo.final.jpeg"), "jpeg");
        assert_eq!(extension("README"), "bin");
        assert_eq!(extension("weird.p/df"), "bin");
    }

    #[test]
    fn test_decode_accepts_plain_and_data_url() {
        assert_eq!(decode("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode("data:text/plain;base64,aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("not base64!!"), Err(AppError::BadRequest(_))));
        assert!(matches!(decode(""), Err(AppError::BadRequest(_))));
    }
}
