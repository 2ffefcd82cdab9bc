//! Data access
//!
//! One trait per aggregate. `Repositories::postgres` wires the sqlx
//! implementations; `Repositories::in_memory` wires `MemoryStore`, which
//! keeps the same unique constraints so conflict handling behaves the same.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
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
use crate::utils::errors::AppResult;

pub mod company_repository;
pub mod document_repository;
pub mod employee_repository;
pub mod letter_repository;
pub mod memory;
pub mod user_repository;
pub mod visitor_repository;

pub use company_repository::CompanyRepository;
pub use document_repository::DocumentRepository;
pub use employee_repository::EmployeeRepository;
pub use letter_repository::LetterRepository;
pub use memory::MemoryStore;
pub use user_repository::UserRepository;
pub use visitor_repository::VisitorRepository;

/// Unique constraint names shared by the schema and `MemoryStore`.
pub mod constraints {
    pub const COMPANY_NAME: &str = "companies_name_key";
    pub const USER_EMAIL: &str = "users_email_key";
    pub const EMPLOYEE_CODE: &str = "employees_company_code_key";
    pub const ACTIVE_AADHAAR: &str = "employees_active_aadhaar_idx";
    pub const ACTIVE_TEMPLATE: &str = "letter_templates_active_type_idx";
    pub const TEMPLATE_VERSION: &str = "letter_templates_version_key";
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn create(&self, name: &str) -> AppResult<Company>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Company>>;
    async fn list(&self) -> AppResult<Vec<Company>>;
    async fn rename(&self, id: Uuid, name: &str) -> AppResult<Option<Company>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> AppResult<User>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// Users ordered by creation, newest first.
    async fn list(&self, company_id: Option<Uuid>, role: Option<UserRole>) -> AppResult<Vec<User>>;
    async fn update_full_name(&self, id: Uuid, full_name: &str) -> AppResult<Option<User>>;
    /// Store a new hash and clear `must_change_password`.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;
    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait VisitorStore: Send + Sync {
    /// First visitor of the company with the given status matching aadhaar OR phone.
    async fn find_matching(
        &self,
        company_id: Uuid,
        status: VisitorStatus,
        aadhaar_number: &str,
        phone: &str,
    ) -> AppResult<Option<Visitor>>;
    async fn create(&self, visitor: NewVisitor) -> AppResult<Visitor>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Visitor>>;
    /// Visitors ordered by creation, newest first.
    async fn list(&self, filter: &VisitorFilter) -> AppResult<Vec<Visitor>>;
    async fn update_status(
        &self,
        id: Uuid,
        status: VisitorStatus,
        remarks: Option<String>,
    ) -> AppResult<Option<Visitor>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// First employee of the company with the given status matching aadhaar OR phone.
    async fn find_matching(
        &self,
        company_id: Uuid,
        status: EmployeeStatus,
        aadhaar_number: &str,
        phone: &str,
    ) -> AppResult<Option<Employee>>;
    async fn find_active_by_aadhaar(
        &self,
        company_id: Uuid,
        aadhaar_number: &str,
    ) -> AppResult<Option<Employee>>;
    /// Employees of any status holding one of the aadhaar numbers, newest first.
    async fn find_by_aadhaar_numbers(&self, aadhaar_numbers: &[String]) -> AppResult<Vec<Employee>>;
    /// Employee codes of the company starting with `prefix`.
    async fn codes_with_prefix(&self, company_id: Uuid, prefix: &str) -> AppResult<Vec<String>>;
    async fn create(&self, employee: NewEmployee) -> AppResult<Employee>;
    /// Insert the employee and mark its visitor SELECTED in one transaction.
    async fn convert_visitor(&self, visitor_id: Uuid, employee: NewEmployee) -> AppResult<Employee>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>>;
    /// Employees ordered by creation, newest first.
    async fn list(&self, filter: &EmployeeFilter) -> AppResult<Vec<Employee>>;
    async fn update(&self, id: Uuid, changes: EmployeeChanges) -> AppResult<Option<Employee>>;
    async fn offboard(&self, id: Uuid, date_of_leaving: NaiveDate) -> AppResult<Option<Employee>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(&self, document: NewDocument) -> AppResult<EmployeeDocument>;
    async fn list_for_employee(&self, employee_id: Uuid) -> AppResult<Vec<EmployeeDocument>>;
    async fn find(&self, employee_id: Uuid, id: Uuid) -> AppResult<Option<EmployeeDocument>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait LetterStore: Send + Sync {
    /// Insert version `max + 1` as the active template, deactivating the
    /// previous active one of the same type, in one transaction.
    async fn create_template(
        &self,
        company_id: Uuid,
        letter_type: LetterType,
        name: &str,
        content: &str,
    ) -> AppResult<LetterTemplate>;
    async fn find_template(&self, id: Uuid) -> AppResult<Option<LetterTemplate>>;
    async fn active_template(
        &self,
        company_id: Uuid,
        letter_type: LetterType,
    ) -> AppResult<Option<LetterTemplate>>;
    /// Templates ordered by type, newest version first.
    async fn list_templates(&self, filter: &TemplateFilter) -> AppResult<Vec<LetterTemplate>>;
    async fn update_template(
        &self,
        id: Uuid,
        changes: TemplateChanges,
    ) -> AppResult<Option<LetterTemplate>>;
    /// Activating deactivates the other versions of the same type.
    async fn set_template_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<LetterTemplate>>;
    async fn delete_template(&self, id: Uuid) -> AppResult<bool>;
    async fn create_letter(&self, letter: NewGeneratedLetter) -> AppResult<GeneratedLetter>;
    /// Letters of an employee, newest first.
    async fn list_letters(&self, employee_id: Uuid) -> AppResult<Vec<GeneratedLetter>>;
}

/// Every store the handlers need
#[derive(Clone)]
pub struct Repositories {
    pub companies: Arc<dyn CompanyStore>,
    pub users: Arc<dyn UserStore>,
    pub visitors: Arc<dyn VisitorStore>,
    pub employees: Arc<dyn EmployeeStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub letters: Arc<dyn LetterStore>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            companies: Arc::new(CompanyRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            visitors: Arc::new(VisitorRepository::new(pool.clone())),
            employees: Arc::new(EmployeeRepository::new(pool.clone())),
            documents: Arc::new(DocumentRepository::new(pool.clone())),
            letters: Arc::new(LetterRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::default()))
    }

    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            companies: store.clone(),
            users: store.clone(),
            visitors: store.clone(),
            employees: store.clone(),
            documents: store.clone(),
            letters: store,
        }
    }
}
