//! Letter templates and generated letters

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    controllers::scoped_employee,
    dto::letter_dto::{CreateTemplateRequest, GenerateLetterRequest, TemplateQuery, UpdateTemplateRequest},
    middleware::auth::AuthenticatedUser,
    models::letter::{GeneratedLetter, LetterTemplate, NewGeneratedLetter, TemplateChanges, TemplateFilter},
    repositories::constraints,
    services::letter_renderer,
    state::AppState,
    utils::{
        errors::{not_found_error, validation_error, AppError, AppResult},
        validation::normalize_optional,
    },
};

pub struct LetterController {
    state: AppState,
}

impl LetterController {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    async fn scoped_template(&self, caller: &AuthenticatedUser, id: Uuid) -> AppResult<LetterTemplate> {
        self.state
            .repos
            .letters
            .find_template(id)
            .await?
            .filter(|t| caller.can_access_company(t.company_id))
            .ok_or_else(|| not_found_error("Template"))
    }

    pub async fn list_templates(&self, caller: &AuthenticatedUser, query: TemplateQuery) -> AppResult<Vec<LetterTemplate>> {
        let filter = TemplateFilter {
            company_id: caller.scope_with(query.company_id),
            letter_type: query.letter_type,
            is_active: query.is_active,
        };
        self.state.repos.letters.list_templates(&filter).await
    }

    /// New active version of the template type.
    pub async fn create_template(
        &self,
        caller: &AuthenticatedUser,
        request: CreateTemplateRequest,
    ) -> AppResult<LetterTemplate> {
        let company_id = caller.target_company(request.company_id)?;

        let template = self
            .state
            .repos
            .letters
            .create_template(company_id, request.letter_type, request.name.trim(), &request.content)
            .await
            .map_err(|e| {
                if e.is_duplicate_of(constraints::TEMPLATE_VERSION) || e.is_duplicate_of(constraints::ACTIVE_TEMPLATE) {
                    AppError::Conflict("Another template version was created concurrently, please retry".to_string())
                } else {
                    e
                }
            })?;

        info!(
            "📄 Template {} v{} ({}) is now active for company {}",
            template.name,
            template.version,
            template.letter_type.as_str(),
            company_id
        );
        Ok(template)
    }

    pub async fn get_template(&self, caller: &AuthenticatedUser, id: Uuid) -> AppResult<LetterTemplate> {
        self.scoped_template(caller, id).await
    }

    pub async fn update_template(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        request: UpdateTemplateRequest,
    ) -> AppResult<LetterTemplate> {
        let mut template = self.scoped_template(caller, id).await?;

        if request.is_active == Some(false) && template.is_active {
            return Err(AppError::BadRequest(
                "The active version cannot be deactivated; activate another version instead".to_string(),
            ));
        }

        let changes = TemplateChanges {
            name: normalize_optional(request.name),
            content: request.content,
        };
        if changes.name.is_none() && changes.content.is_none() && request.is_active.is_none() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        if changes.name.is_some() || changes.content.is_some() {
            template = self
                .state
                .repos
                .letters
                .update_template(id, changes)
                .await?
                .ok_or_else(|| not_found_error("Template"))?;
        }

        if let Some(is_active) = request.is_active {
            if is_active != template.is_active {
                template = self
                    .state
                    .repos
                    .letters
                    .set_template_active(id, is_active)
                    .await?
                    .ok_or_else(|| not_found_error("Template"))?;
                info!("📄 Template {} active = {}", id, is_active);
            }
        }

        Ok(template)
    }

    /// The active version can only go when it is the last version of its type.
    pub async fn delete_template(&self, caller: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        let template = self.scoped_template(caller, id).await?;
        if template.is_active {
            let versions = self
                .state
                .repos
                .letters
                .list_templates(&TemplateFilter {
                    company_id: Some(template.company_id),
                    letter_type: Some(template.letter_type),
                    is_active: None,
                })
                .await?;
            if versions.len() > 1 {
                return Err(AppError::Conflict(
                    "The active version cannot be deleted; activate another version first".to_string(),
                ));
            }
        }

        if !self.state.repos.letters.delete_template(id).await? {
            return Err(not_found_error("Template"));
        }
        info!("🗑️ Template {} deleted", id);
        Ok(())
    }

    /// Render a template for an employee, store the HTML and record it.
    pub async fn generate(
        &self,
        caller: &AuthenticatedUser,
        employee_id: Uuid,
        request: GenerateLetterRequest,
    ) -> AppResult<GeneratedLetter> {
        let employee = scoped_employee(&self.state, caller, employee_id).await?;

        let template = match (request.template_id, request.letter_type) {
            (Some(template_id), _) => self
                .scoped_template(caller, template_id)
                .await?,
            (None, Some(letter_type)) => self
                .state
                .repos
                .letters
                .active_template(employee.company_id, letter_type)
                .await?
                .ok_or_else(|| not_found_error("Active template"))?,
            (None, None) => {
                return Err(validation_error("template_id", "template_id or type is required"));
            }
        };
        if template.company_id != employee.company_id {
            return Err(AppError::BadRequest(
                "Template belongs to another company".to_string(),
            ));
        }

        let company = self
            .state
            .repos
            .companies
            .find_by_id(employee.company_id)
            .await?
            .ok_or_else(|| not_found_error("Company"))?;

        let now = Utc::now();
        let mut tokens = letter_renderer::employee_tokens(&employee, &company.name, now.date_naive());
        letter_renderer::apply_overrides(&mut tokens, &request.additional_data);
        let body = letter_renderer::render(&template.content, &tokens);
        let html = letter_renderer::wrap_html(&template.name, &body);

        let path = format!(
            "{}/letters/{}_{}_{}.html",
            employee.company_id,
            template.letter_type.as_str(),
            employee.employee_code,
            now.timestamp_millis()
        );
        self.state.storage.put(&path, html.into_bytes()).await?;

        let created = self
            .state
            .repos
            .letters
            .create_letter(NewGeneratedLetter {
                employee_id: employee.id,
                template_id: template.id,
                generated_content: body,
                file_url: self.state.storage.public_url(&path),
                file_path: path.clone(),
                generated_by: Some(caller.user_id),
            })
            .await;

        match created {
            Ok(letter) => {
                info!(
                    "✉️ {} letter generated for {} from template v{}",
                    template.letter_type.as_str(),
                    employee.employee_code,
                    template.version
                );
                Ok(letter)
            }
            Err(e) => {
                if let Err(cleanup) = self.state.storage.remove(&path).await {
                    warn!("⚠️ Could not remove orphaned letter {}: {}", path, cleanup);
                }
                Err(e)
            }
        }
    }

    pub async fn list_letters(&self, caller: &AuthenticatedUser, employee_id: Uuid) -> AppResult<Vec<GeneratedLetter>> {
        scoped_employee(&self.state, caller, employee_id).await?;
        self.state.repos.letters.list_letters(employee_id).await
    }
}
