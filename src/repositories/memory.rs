//! In-memory store
//!
//! Backs the router in tests and local demos. Every table lives behind one
//! lock so multi-row operations (conversion, template versioning) are atomic,
//! and the schema's unique and foreign key constraints are checked by hand
//! with the same constraint names PostgreSQL reports.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    company::Company,
    document::{EmployeeDocument, NewDocument},
    employee::{Employee, EmployeeChanges, EmployeeFilter, EmployeeStatus, NewEmployee},
    letter::{
        GeneratedLetter, LetterTemplate, LetterType, NewGeneratedLetter, TemplateChanges,
        TemplateFilter,
    },
    user::{NewUser, User, UserRole},
    visitor::{NewVisitor, Visitor, VisitorFilter, VisitorStatus},
};
use crate::repositories::{
    constraints, CompanyStore, DocumentStore, EmployeeStore, LetterStore, UserStore, VisitorStore,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Debug, Default)]
struct Tables {
    companies: Vec<Company>,
    users: Vec<User>,
    visitors: Vec<Visitor>,
    employees: Vec<Employee>,
    documents: Vec<EmployeeDocument>,
    templates: Vec<LetterTemplate>,
    letters: Vec<GeneratedLetter>,
}

impl Tables {
    fn company_exists(&self, id: Uuid) -> bool {
        self.companies.iter().any(|c| c.id == id)
    }

    fn require_company(&self, id: Uuid, fkey: &str) -> AppResult<()> {
        if self.company_exists(id) {
            Ok(())
        } else {
            Err(AppError::InvalidReference(fkey.to_string()))
        }
    }

    fn check_employee_code(&self, company_id: Uuid, code: &str, except: Option<Uuid>) -> AppResult<()> {
        let taken = self.employees.iter().any(|e| {
            Some(e.id) != except && e.company_id == company_id && e.employee_code == code
        });
        if taken {
            Err(AppError::Duplicate(constraints::EMPLOYEE_CODE.to_string()))
        } else {
            Ok(())
        }
    }

    fn check_active_aadhaar(&self, company_id: Uuid, aadhaar: &str, except: Option<Uuid>) -> AppResult<()> {
        let taken = self.employees.iter().any(|e| {
            Some(e.id) != except
                && e.company_id == company_id
                && e.status == EmployeeStatus::Active
                && e.aadhaar_number == aadhaar
        });
        if taken {
            Err(AppError::Duplicate(constraints::ACTIVE_AADHAAR.to_string()))
        } else {
            Ok(())
        }
    }

    fn insert_employee(&mut self, employee: NewEmployee) -> AppResult<Employee> {
        self.require_company(employee.company_id, "employees_company_id_fkey")?;
        self.check_employee_code(employee.company_id, &employee.employee_code, None)?;
        self.check_active_aadhaar(employee.company_id, &employee.aadhaar_number, None)?;

        let now = Utc::now();
        let row = Employee {
            id: Uuid::new_v4(),
            company_id: employee.company_id,
            employee_code: employee.employee_code,
            visitor_id: employee.visitor_id,
            full_name: employee.full_name,
            phone: employee.phone,
            email: employee.email,
            aadhaar_number: employee.aadhaar_number,
            department: employee.department,
            designation: employee.designation,
            status: EmployeeStatus::Active,
            date_of_joining: employee.date_of_joining,
            date_of_leaving: None,
            created_at: now,
            updated_at: now,
        };
        self.employees.push(row.clone());
        Ok(row)
    }

    fn deactivate_templates(&mut self, company_id: Uuid, letter_type: LetterType, except: Option<Uuid>) {
        let now = Utc::now();
        for t in self.templates.iter_mut().filter(|t| {
            t.company_id == company_id && t.letter_type == letter_type && Some(t.id) != except && t.is_active
        }) {
            t.is_active = false;
            t.updated_at = now;
        }
    }
}

/// Store implementing every repository trait over in-process tables
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn create(&self, name: &str) -> AppResult<Company> {
        let mut tables = self.tables.write().await;
        if tables.companies.iter().any(|c| c.name == name) {
            return Err(AppError::Duplicate(constraints::COMPANY_NAME.to_string()));
        }
        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.companies.push(company.clone());
        Ok(company)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Company>> {
        let tables = self.tables.read().await;
        Ok(tables.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Company>> {
        let tables = self.tables.read().await;
        Ok(tables.companies.iter().rev().cloned().collect())
    }

    async fn rename(&self, id: Uuid, name: &str) -> AppResult<Option<Company>> {
        let mut tables = self.tables.write().await;
        if tables.companies.iter().any(|c| c.id != id && c.name == name) {
            return Err(AppError::Duplicate(constraints::COMPANY_NAME.to_string()));
        }
        Ok(tables.companies.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = name.to_string();
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.company_id == Some(id)) {
            return Err(AppError::InvalidReference("users_company_id_fkey".to_string()));
        }
        let before = tables.companies.len();
        tables.companies.retain(|c| c.id != id);
        if tables.companies.len() == before {
            return Ok(false);
        }

        let removed_employees: Vec<Uuid> = tables
            .employees
            .iter()
            .filter(|e| e.company_id == id)
            .map(|e| e.id)
            .collect();
        tables.employees.retain(|e| e.company_id != id);
        tables.visitors.retain(|v| v.company_id != id);
        tables.templates.retain(|t| t.company_id != id);
        tables.documents.retain(|d| !removed_employees.contains(&d.employee_id));
        tables.letters.retain(|l| !removed_employees.contains(&l.employee_id));
        Ok(true)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Duplicate(constraints::USER_EMAIL.to_string()));
        }
        if let Some(company_id) = user.company_id {
            tables.require_company(company_id, "users_company_id_fkey")?;
        }
        let now = Utc::now();
        let row = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            full_name: user.full_name,
            company_id: user.company_id,
            is_active: true,
            must_change_password: user.must_change_password,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, company_id: Option<Uuid>, role: Option<UserRole>) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .rev()
            .filter(|u| company_id.map_or(true, |c| u.company_id == Some(c)))
            .filter(|u| role.map_or(true, |r| u.role == r))
            .cloned()
            .collect())
    }

    async fn update_full_name(&self, id: Uuid, full_name: &str) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.full_name = full_name.to_string();
            u.updated_at = Utc::now();
            u.clone()
        }))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(u) = tables.users.iter_mut().find(|u| u.id == id) {
            u.password_hash = password_hash.to_string();
            u.must_change_password = false;
            u.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.is_active = is_active;
            u.updated_at = Utc::now();
            u.clone()
        }))
    }
}

#[async_trait]
impl VisitorStore for MemoryStore {
    async fn find_matching(
        &self,
        company_id: Uuid,
        status: VisitorStatus,
        aadhaar_number: &str,
        phone: &str,
    ) -> AppResult<Option<Visitor>> {
        let tables = self.tables.read().await;
        Ok(tables
            .visitors
            .iter()
            .rev()
            .find(|v| {
                v.company_id == company_id
                    && v.status == status
                    && (v.aadhaar_number == aadhaar_number || v.phone == phone)
            })
            .cloned())
    }

    async fn create(&self, visitor: NewVisitor) -> AppResult<Visitor> {
        let mut tables = self.tables.write().await;
        tables.require_company(visitor.company_id, "visitors_company_id_fkey")?;
        if let Some(hr_id) = visitor.hr_id {
            if !tables.users.iter().any(|u| u.id == hr_id) {
                return Err(AppError::InvalidReference("visitors_hr_id_fkey".to_string()));
            }
        }
        let now = Utc::now();
        let row = Visitor {
            id: Uuid::new_v4(),
            company_id: visitor.company_id,
            hr_id: visitor.hr_id,
            full_name: visitor.full_name,
            phone: visitor.phone,
            email: visitor.email,
            aadhaar_number: visitor.aadhaar_number,
            address: visitor.address,
            candidate_type: visitor.candidate_type,
            status: VisitorStatus::Pending,
            remarks: visitor.remarks,
            created_at: now,
            updated_at: now,
        };
        tables.visitors.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Visitor>> {
        let tables = self.tables.read().await;
        Ok(tables.visitors.iter().find(|v| v.id == id).cloned())
    }

    async fn list(&self, filter: &VisitorFilter) -> AppResult<Vec<Visitor>> {
        let tables = self.tables.read().await;
        Ok(tables
            .visitors
            .iter()
            .rev()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: VisitorStatus,
        remarks: Option<String>,
    ) -> AppResult<Option<Visitor>> {
        let mut tables = self.tables.write().await;
        Ok(tables.visitors.iter_mut().find(|v| v.id == id).map(|v| {
            v.status = status;
            if remarks.is_some() {
                v.remarks = remarks;
            }
            v.updated_at = Utc::now();
            v.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.visitors.len();
        tables.visitors.retain(|v| v.id != id);
        if tables.visitors.len() == before {
            return Ok(false);
        }
        for e in tables.employees.iter_mut().filter(|e| e.visitor_id == Some(id)) {
            e.visitor_id = None;
        }
        Ok(true)
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn find_matching(
        &self,
        company_id: Uuid,
        status: EmployeeStatus,
        aadhaar_number: &str,
        phone: &str,
    ) -> AppResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables
            .employees
            .iter()
            .rev()
            .find(|e| {
                e.company_id == company_id
                    && e.status == status
                    && (e.aadhaar_number == aadhaar_number || e.phone == phone)
            })
            .cloned())
    }

    async fn find_active_by_aadhaar(
        &self,
        company_id: Uuid,
        aadhaar_number: &str,
    ) -> AppResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables
            .employees
            .iter()
            .find(|e| {
                e.company_id == company_id
                    && e.status == EmployeeStatus::Active
                    && e.aadhaar_number == aadhaar_number
            })
            .cloned())
    }

    async fn find_by_aadhaar_numbers(&self, aadhaar_numbers: &[String]) -> AppResult<Vec<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables
            .employees
            .iter()
            .rev()
            .filter(|e| aadhaar_numbers.contains(&e.aadhaar_number))
            .cloned()
            .collect())
    }

    async fn codes_with_prefix(&self, company_id: Uuid, prefix: &str) -> AppResult<Vec<String>> {
        let tables = self.tables.read().await;
        Ok(tables
            .employees
            .iter()
            .filter(|e| e.company_id == company_id && e.employee_code.starts_with(prefix))
            .map(|e| e.employee_code.clone())
            .collect())
    }

    async fn create(&self, employee: NewEmployee) -> AppResult<Employee> {
        let mut tables = self.tables.write().await;
        tables.insert_employee(employee)
    }

    async fn convert_visitor(&self, visitor_id: Uuid, employee: NewEmployee) -> AppResult<Employee> {
        let mut tables = self.tables.write().await;
        let company_id = employee.company_id;
        let position = tables
            .visitors
            .iter()
            .position(|v| v.id == visitor_id && v.company_id == company_id)
            .ok_or_else(|| not_found_error("Visitor"))?;

        // Insert first: a constraint failure must leave the visitor untouched.
        let created = tables.insert_employee(employee)?;
        let visitor = &mut tables.visitors[position];
        visitor.status = VisitorStatus::Selected;
        visitor.updated_at = Utc::now();
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self, filter: &EmployeeFilter) -> AppResult<Vec<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables
            .employees
            .iter()
            .rev()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, changes: EmployeeChanges) -> AppResult<Option<Employee>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.employees.iter().find(|e| e.id == id).cloned() else {
            return Ok(None);
        };

        let mut updated = current;
        changes.apply_to(&mut updated);
        if updated.status == EmployeeStatus::Active {
            tables.check_active_aadhaar(updated.company_id, &updated.aadhaar_number, Some(id))?;
        }
        updated.updated_at = Utc::now();

        if let Some(row) = tables.employees.iter_mut().find(|e| e.id == id) {
            *row = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn offboard(&self, id: Uuid, date_of_leaving: NaiveDate) -> AppResult<Option<Employee>> {
        let mut tables = self.tables.write().await;
        Ok(tables.employees.iter_mut().find(|e| e.id == id).map(|e| {
            e.status = EmployeeStatus::Offboarded;
            e.date_of_leaving = Some(date_of_leaving);
            e.updated_at = Utc::now();
            e.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.employees.len();
        tables.employees.retain(|e| e.id != id);
        if tables.employees.len() == before {
            return Ok(false);
        }
        tables.documents.retain(|d| d.employee_id != id);
        tables.letters.retain(|l| l.employee_id != id);
        Ok(true)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, document: NewDocument) -> AppResult<EmployeeDocument> {
        let mut tables = self.tables.write().await;
        if !tables.employees.iter().any(|e| e.id == document.employee_id) {
            return Err(AppError::InvalidReference(
                "employee_documents_employee_id_fkey".to_string(),
            ));
        }
        let row = EmployeeDocument {
            id: Uuid::new_v4(),
            employee_id: document.employee_id,
            document_type: document.document_type,
            file_name: document.file_name,
            file_path: document.file_path,
            file_url: document.file_url,
            content_type: document.content_type,
            uploaded_by: document.uploaded_by,
            created_at: Utc::now(),
        };
        tables.documents.push(row.clone());
        Ok(row)
    }

    async fn list_for_employee(&self, employee_id: Uuid) -> AppResult<Vec<EmployeeDocument>> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .iter()
            .rev()
            .filter(|d| d.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn find(&self, employee_id: Uuid, id: Uuid) -> AppResult<Option<EmployeeDocument>> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .iter()
            .find(|d| d.id == id && d.employee_id == employee_id)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.documents.len();
        tables.documents.retain(|d| d.id != id);
        Ok(tables.documents.len() < before)
    }
}

#[async_trait]
impl LetterStore for MemoryStore {
    async fn create_template(
        &self,
        company_id: Uuid,
        letter_type: LetterType,
        name: &str,
        content: &str,
    ) -> AppResult<LetterTemplate> {
        let mut tables = self.tables.write().await;
        tables.require_company(company_id, "letter_templates_company_id_fkey")?;

        let version = tables
            .templates
            .iter()
            .filter(|t| t.company_id == company_id && t.letter_type == letter_type)
            .map(|t| t.version)
            .max()
            .unwrap_or(0)
            + 1;
        tables.deactivate_templates(company_id, letter_type, None);

        let now = Utc::now();
        let template = LetterTemplate {
            id: Uuid::new_v4(),
            company_id,
            letter_type,
            name: name.to_string(),
            content: content.to_string(),
            version,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.templates.push(template.clone());
        Ok(template)
    }

    async fn find_template(&self, id: Uuid) -> AppResult<Option<LetterTemplate>> {
        let tables = self.tables.read().await;
        Ok(tables.templates.iter().find(|t| t.id == id).cloned())
    }

    async fn active_template(
        &self,
        company_id: Uuid,
        letter_type: LetterType,
    ) -> AppResult<Option<LetterTemplate>> {
        let tables = self.tables.read().await;
        Ok(tables
            .templates
            .iter()
            .find(|t| t.company_id == company_id && t.letter_type == letter_type && t.is_active)
            .cloned())
    }

    async fn list_templates(&self, filter: &TemplateFilter) -> AppResult<Vec<LetterTemplate>> {
        let tables = self.tables.read().await;
        let mut templates: Vec<LetterTemplate> = tables
            .templates
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        templates.sort_by(|a, b| {
            a.letter_type
                .as_str()
                .cmp(b.letter_type.as_str())
                .then(b.version.cmp(&a.version))
        });
        Ok(templates)
    }

    async fn update_template(
        &self,
        id: Uuid,
        changes: TemplateChanges,
    ) -> AppResult<Option<LetterTemplate>> {
        let mut tables = self.tables.write().await;
        Ok(tables.templates.iter_mut().find(|t| t.id == id).map(|t| {
            if let Some(name) = changes.name {
                t.name = name;
            }
            if let Some(content) = changes.content {
                t.content = content;
            }
            t.updated_at = Utc::now();
            t.clone()
        }))
    }

    async fn set_template_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<LetterTemplate>> {
        let mut tables = self.tables.write().await;
        let Some((company_id, letter_type)) = tables
            .templates
            .iter()
            .find(|t| t.id == id)
            .map(|t| (t.company_id, t.letter_type))
        else {
            return Ok(None);
        };

        if is_active {
            tables.deactivate_templates(company_id, letter_type, Some(id));
        }
        Ok(tables.templates.iter_mut().find(|t| t.id == id).map(|t| {
            t.is_active = is_active;
            t.updated_at = Utc::now();
            t.clone()
        }))
    }

    async fn delete_template(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.templates.len();
        tables.templates.retain(|t| t.id != id);
        if tables.templates.len() == before {
            return Ok(false);
        }
        for l in tables.letters.iter_mut().filter(|l| l.template_id == Some(id)) {
            l.template_id = None;
        }
        Ok(true)
    }

    async fn create_letter(&self, letter: NewGeneratedLetter) -> AppResult<GeneratedLetter> {
        let mut tables = self.tables.write().await;
        if !tables.employees.iter().any(|e| e.id == letter.employee_id) {
            return Err(AppError::InvalidReference(
                "generated_letters_employee_id_fkey".to_string(),
            ));
        }
        let row = GeneratedLetter {
            id: Uuid::new_v4(),
            employee_id: letter.employee_id,
            template_id: Some(letter.template_id),
            generated_content: letter.generated_content,
            file_path: letter.file_path,
            file_url: letter.file_url,
            generated_by: letter.generated_by,
            created_at: Utc::now(),
        };
        tables.letters.push(row.clone());
        Ok(row)
    }

    async fn list_letters(&self, employee_id: Uuid) -> AppResult<Vec<GeneratedLetter>> {
        let tables = self.tables.read().await;
        Ok(tables
            .letters
            .iter()
            .rev()
            .filter(|l| l.employee_id == employee_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::repositories::Repositories;

    fn new_employee(company_id: Uuid, code: &str, aadhaar: &str) -> NewEmployee {
        NewEmployee {
            company_id,
            employee_code: code.to_string(),
            visitor_id: None,
            full_name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            email: None,
            aadhaar_number: aadhaar.to_string(),
            department: None,
            designation: None,
            date_of_joining: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_active_aadhaar_is_unique_per_company() {
        let repos = Repositories::from_memory(Arc::new(MemoryStore::new()));
        let acme = repos.companies.create("Acme").await.unwrap();
        let other = repos.companies.create("Other").await.unwrap();

        let first = repos
            .employees
            .create(new_employee(acme.id, "ACM-2025-0001", "123456789012"))
            .await
            .unwrap();

        let err = repos
            .employees
            .create(new_employee(acme.id, "ACM-2025-0002", "123456789012"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate_of(constraints::ACTIVE_AADHAAR));

        // Another company may employ the same person.
        repos
            .employees
            .create(new_employee(other.id, "OTH-2025-0001", "123456789012"))
            .await
            .unwrap();

        // Once offboarded, the aadhaar is free again.
        repos
            .employees
            .offboard(first.id, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
            .await
            .unwrap();
        repos
            .employees
            .create(new_employee(acme.id, "ACM-2025-0002", "123456789012"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_employee_code_is_unique_per_company() {
        let repos = Repositories::in_memory();
        let acme = repos.companies.create("Acme").await.unwrap();

        repos
            .employees
            .create(new_employee(acme.id, "ACM-2025-0001", "111111111111"))
            .await
            .unwrap();
        let err = repos
            .employees
            .create(new_employee(acme.id, "ACM-2025-0001", "222222222222"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate_of(constraints::EMPLOYEE_CODE));
    }

    #[tokio::test]
    async fn test_template_versions_keep_one_active() {
        let repos = Repositories::in_memory();
        let acme = repos.companies.create("Acme").await.unwrap();

        let v1 = repos
            .letters
            .create_template(acme.id, LetterType::Offer, "Offer", "Hello {{full_name}}")
            .await
            .unwrap();
        let v2 = repos
            .letters
            .create_template(acme.id, LetterType::Offer, "Offer v2", "Dear {{full_name}}")
            .await
            .unwrap();
        assert_eq!((v1.version, v2.version), (1, 2));

        let active = repos
            .letters
            .list_templates(&TemplateFilter {
                company_id: Some(acme.id),
                letter_type: Some(LetterType::Offer),
                is_active: Some(true),
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, v2.id);

        let reactivated = repos.letters.set_template_active(v1.id, true).await.unwrap().unwrap();
        assert!(reactivated.is_active);
        let v2 = repos.letters.find_template(v2.id).await.unwrap().unwrap();
        assert!(!v2.is_active);
    }

    #[tokio::test]
    async fn test_company_with_users_cannot_be_deleted() {
        let repos = Repositories::in_memory();
        let acme = repos.companies.create("Acme").await.unwrap();
        repos
            .users
            .create(NewUser {
                email: "hr@acme.in".to_string(),
                password_hash: "x".to_string(),
                role: UserRole::Hr,
                full_name: "HR".to_string(),
                company_id: Some(acme.id),
                must_change_password: false,
            })
            .await
            .unwrap();

        assert!(matches!(
            repos.companies.delete(acme.id).await,
            Err(AppError::InvalidReference(_))
        ));
    }
}
