//! Request and response shapes of the HTTP API

pub mod api_response;
pub mod auth_dto;
pub mod company_dto;
pub mod document_dto;
pub mod employee_dto;
pub mod letter_dto;
pub mod visitor_dto;

pub use api_response::ApiResponse;
