pub mod admin;
mod admin_table;
pub mod localized;
pub mod pages;
mod router;

pub use router::{STATIC_PREFIX, router};
