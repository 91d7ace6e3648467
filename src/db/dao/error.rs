use sea_orm::DbErr;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Invalid pagination: page={page} page_size={page_size}")]
    InvalidPagination { page: u64, page_size: u64 },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

/// Short table-ish name for log lines and not-found messages
/// (`kitchen_cms::db::entities::lead::Entity` -> `lead`).
pub(crate) fn entity_label<E>() -> &'static str {
    let full = std::any::type_name::<E>();
    full.rsplit("::").nth(1).unwrap_or(full)
}
