pub mod catalog;
pub mod context;
pub mod crud_service;
pub mod enquiry_service;
pub mod entity_service;
pub mod search_service;
pub mod section_service;
pub mod session_service;
pub mod site_service;

pub use context::ServiceContext;
