use sea_orm::DatabaseConnection;

use super::{DaoBase, EntityDao, SessionDao, UserDao, base_traits::RecordEntity};

/// Hands out table accessors sharing one pooled connection.
#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn entity<E: RecordEntity>(&self) -> EntityDao<E> {
        EntityDao::new(&self.db)
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn session(&self) -> SessionDao {
        DaoBase::new(&self.db)
    }
}
