pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod session_dao;
pub mod user_dao;

pub use base::{
    ActiveModelOf, ColumnFilter, ColumnOf, DaoBase, DaoPager, EntityDao, FilterOp,
    ModelOf, PaginatedResponse,
};
pub use base_traits::{
    HasContentColumns, HasCreatedAtColumn, HasIdActiveModel, RecordEntity,
    TimestampedActiveModel,
};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use session_dao::SessionDao;
pub use user_dao::UserDao;
