pub mod auth;
pub mod entities;
pub mod public;
mod router;
pub mod search;
pub mod sections;

pub use router::router;
