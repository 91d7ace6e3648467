use std::marker::PhantomData;

use crate::db::dao::{DaoContext, EntityDao, RecordEntity};

/// CRUD access to one table. Each table supplies its own `CrudService` impl
/// (schema, filters, hooks) for its concrete `EntityService<Entity>`.
pub struct EntityService<E> {
    dao: EntityDao<E>,
    daos: DaoContext,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            dao: self.dao.clone(),
            daos: self.daos.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: RecordEntity> EntityService<E> {
    pub fn new(daos: &DaoContext) -> Self {
        Self {
            dao: daos.entity::<E>(),
            daos: daos.clone(),
            _entity: PhantomData,
        }
    }

    pub fn entity_dao(&self) -> &EntityDao<E> {
        &self.dao
    }

    pub fn daos(&self) -> &DaoContext {
        &self.daos
    }
}
