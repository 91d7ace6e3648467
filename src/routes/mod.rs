pub mod api;
pub mod crud_router;
mod entry;
pub mod views;

pub use crud_router::CrudApiRouter;
pub use entry::{API_PREFIX, router};
