use std::marker::PhantomData;

use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::base_traits::{HasCreatedAtColumn, HasIdActiveModel, RecordEntity, TimestampedActiveModel};
use super::error::{DaoLayerError, DaoResult, entity_label};

pub type ModelOf<E> = <E as EntityTrait>::Model;
pub type ActiveModelOf<E> = <E as EntityTrait>::ActiveModel;
pub type ColumnOf<E> = <E as EntityTrait>::Column;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub has_next: bool,
    pub total: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum FilterOp {
    Eq(sea_orm::sea_query::Value),
    Like { pattern: String, escape: char },
}

#[derive(Debug, Clone)]
pub struct ColumnFilter<C> {
    pub column: C,
    pub op: FilterOp,
}

/// Walks a filtered, ordered query page by page. Used by the backup command.
pub struct DaoPager<D, F>
where
    D: DaoBase,
    F: Fn(Select<D::Entity>) -> Select<D::Entity> + Clone + Send,
{
    dao: D,
    page: u64,
    page_size: u64,
    order: Option<(ColumnOf<D::Entity>, Order)>,
    apply: F,
    done: bool,
}

impl<D, F> DaoPager<D, F>
where
    D: DaoBase,
    F: Fn(Select<D::Entity>) -> Select<D::Entity> + Clone + Send,
{
    pub async fn next_page(&mut self) -> DaoResult<Option<PaginatedResponse<ModelOf<D::Entity>>>> {
        if self.done {
            return Ok(None);
        }

        let response = self
            .dao
            .find(self.page, self.page_size, self.order.clone(), self.apply.clone())
            .await?;

        if !response.has_next {
            self.done = true;
        }
        self.page = self.page.saturating_add(1);

        Ok(Some(response))
    }
}

fn check_pagination(page: u64, page_size: u64, max: u64) -> DaoResult<()> {
    if page == 0 || page_size == 0 || page_size > max {
        return Err(DaoLayerError::InvalidPagination { page, page_size });
    }
    Ok(())
}

fn apply_column_filters<E: EntityTrait>(
    select: Select<E>,
    filters: &[ColumnFilter<ColumnOf<E>>],
) -> Select<E> {
    filters.iter().fold(select, |select, filter| match &filter.op {
        FilterOp::Eq(value) => select.filter(filter.column.eq(value.clone())),
        FilterOp::Like { pattern, escape } => select.filter(
            Expr::col(filter.column).like(LikeExpr::new(pattern).escape(*escape)),
        ),
    })
}

async fn fetch_page<E: RecordEntity>(
    db: &DatabaseConnection,
    select: Select<E>,
    page: u64,
    page_size: u64,
) -> DaoResult<PaginatedResponse<ModelOf<E>>> {
    let fetch_size = page_size.saturating_add(1);
    let offset = page.saturating_sub(1).saturating_mul(page_size);
    let mut data = select.limit(fetch_size).offset(offset).all(db).await?;

    let has_next = data.len() > page_size as usize;
    if has_next {
        data.truncate(page_size as usize);
    }

    Ok(PaginatedResponse {
        data,
        page,
        page_size,
        has_next,
        total: None,
    })
}

fn order_select<E: RecordEntity>(select: Select<E>, order: Option<(ColumnOf<E>, Order)>) -> Select<E> {
    match order {
        Some((column, order)) => select.order_by(column, order),
        None => select.order_by_desc(E::created_at_column()),
    }
}

#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized {
    type Entity: RecordEntity;
    const MAX_PAGE_SIZE: u64 = 100;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    async fn create(
        &self,
        data: impl IntoActiveModel<ActiveModelOf<Self::Entity>> + Send,
    ) -> DaoResult<ModelOf<Self::Entity>> {
        let now = Utc::now().fixed_offset();
        let mut active = data.into_active_model();
        active.set_id(Uuid::new_v4());
        active.set_created_at(now);
        active.set_updated_at(now);
        Ok(active.insert(self.db()).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<ModelOf<Self::Entity>> {
        let model = Self::Entity::find_by_id(id).one(self.db()).await?;

        model.ok_or(DaoLayerError::NotFound {
            entity: entity_label::<Self::Entity>(),
            id,
        })
    }

    async fn find_one<F>(&self, apply: F) -> DaoResult<Option<ModelOf<Self::Entity>>>
    where
        F: FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    {
        let select = order_select(apply(Self::Entity::find()), None);
        Ok(select.one(self.db()).await?)
    }

    async fn find(
        &self,
        page: u64,
        page_size: u64,
        order: Option<(ColumnOf<Self::Entity>, Order)>,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<PaginatedResponse<ModelOf<Self::Entity>>> {
        check_pagination(page, page_size, Self::MAX_PAGE_SIZE)?;
        let select = order_select(apply(Self::Entity::find()), order);
        fetch_page(self.db(), select, page, page_size).await
    }

    async fn find_with_filters(
        &self,
        page: u64,
        page_size: u64,
        order: Option<(ColumnOf<Self::Entity>, Order)>,
        filters: &[ColumnFilter<ColumnOf<Self::Entity>>],
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<PaginatedResponse<ModelOf<Self::Entity>>> {
        check_pagination(page, page_size, Self::MAX_PAGE_SIZE)?;
        let select = apply_column_filters(apply(Self::Entity::find()), filters);
        let select = order_select(select, order);
        fetch_page(self.db(), select, page, page_size).await
    }

    /// Unpaginated, ordered read capped at `limit` rows.
    async fn find_all<F>(
        &self,
        order: &[(ColumnOf<Self::Entity>, Order)],
        limit: Option<u64>,
        apply: F,
    ) -> DaoResult<Vec<ModelOf<Self::Entity>>>
    where
        F: FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    {
        let mut select = apply(Self::Entity::find());
        for (column, direction) in order {
            select = select.order_by(*column, direction.clone());
        }
        if order.is_empty() {
            select = select.order_by_desc(Self::Entity::created_at_column());
        }
        if let Some(limit) = limit {
            select = select.limit(limit);
        }
        Ok(select.all(self.db()).await?)
    }

    async fn count<F>(&self, apply: F) -> DaoResult<u64>
    where
        F: FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    {
        Ok(apply(Self::Entity::find()).count(self.db()).await?)
    }

    /// True when another row (not `exclude`) already holds `value` in `column`.
    async fn value_taken(
        &self,
        column: ColumnOf<Self::Entity>,
        value: String,
        exclude: Option<Uuid>,
    ) -> DaoResult<bool> {
        let mut select = Self::Entity::find().filter(column.eq(value));
        if let Some(id) = exclude {
            let pk = id_column::<Self::Entity>();
            select = select.filter(pk.ne(id));
        }
        Ok(select.count(self.db()).await? > 0)
    }

    fn find_iter<F>(
        &self,
        page_size: Option<u64>,
        order: Option<(ColumnOf<Self::Entity>, Order)>,
        apply: F,
    ) -> DaoPager<Self, F>
    where
        F: Fn(Select<Self::Entity>) -> Select<Self::Entity> + Clone + Send,
    {
        DaoPager {
            dao: self.clone(),
            page: 1,
            page_size: page_size.unwrap_or(Self::MAX_PAGE_SIZE),
            order,
            apply,
            done: false,
        }
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> DaoResult<ModelOf<Self::Entity>>
    where
        F: for<'a> FnOnce(&'a mut ActiveModelOf<Self::Entity>) + Send,
    {
        let model = Self::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or(DaoLayerError::NotFound {
                entity: entity_label::<Self::Entity>(),
                id,
            })?;

        let mut active = model.into_active_model();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());

        Ok(active.update(self.db()).await?)
    }

    async fn delete(&self, id: Uuid) -> DaoResult<Uuid> {
        let result = Self::Entity::delete_by_id(id).exec(self.db()).await?;

        if result.rows_affected == 0 {
            return Err(DaoLayerError::NotFound {
                entity: entity_label::<Self::Entity>(),
                id,
            });
        }

        Ok(id)
    }
}

fn id_column<E: RecordEntity>() -> ColumnOf<E> {
    use sea_orm::{Iterable, PrimaryKeyToColumn};
    // every record table has the single `id` uuid key injected by #[base_entity]
    E::PrimaryKey::iter()
        .next()
        .map(|pk| pk.into_column())
        .unwrap_or_else(E::created_at_column)
}

/// Table access for one `#[base_entity]` table.
pub struct EntityDao<E> {
    db: DatabaseConnection,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityDao<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: RecordEntity> DaoBase for EntityDao<E> {
    type Entity = E;

    fn new(db: &DatabaseConnection) -> Self {
        Self {
            db: db.clone(),
            _entity: PhantomData,
        }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{
        ColumnTrait, DatabaseBackend, DbErr, MockDatabase, MockExecResult, Order, QueryFilter,
    };
    use uuid::Uuid;

    use super::{DaoBase, EntityDao};
    use crate::db::dao::DaoLayerError;
    use crate::db::entities::statistic;

    type StatisticDao = EntityDao<statistic::Entity>;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn stat(id: Uuid, value: i32, published: bool) -> statistic::Model {
        statistic::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            sort_order: 0,
            published,
            label_en: "Kitchens delivered".to_string(),
            label_ar: "مطابخ منجزة".to_string(),
            value,
            suffix: "+".to_string(),
        }
    }

    #[tokio::test]
    async fn find_reports_next_page_when_extra_row_fetched() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                stat(Uuid::new_v4(), 1, true),
                stat(Uuid::new_v4(), 2, true),
                stat(Uuid::new_v4(), 3, true),
            ]])
            .into_connection();
        let dao = StatisticDao::new(&db);

        let page = dao
            .find(1, 2, None, |query| query)
            .await
            .expect("find should succeed");

        assert_eq!(page.data.len(), 2);
        assert!(page.has_next);
    }

    #[tokio::test]
    async fn find_rejects_oversized_page_without_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let dao = StatisticDao::new(&db);

        let err = dao
            .find(1, 500, None, |query| query)
            .await
            .expect_err("page size should be rejected");

        assert!(matches!(
            err,
            DaoLayerError::InvalidPagination { page: 1, page_size: 500 }
        ));
    }

    #[tokio::test]
    async fn find_all_applies_filter_and_returns_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stat(Uuid::new_v4(), 7, true)]])
            .into_connection();
        let dao = StatisticDao::new(&db);

        let rows = dao
            .find_all(
                &[(statistic::Column::SortOrder, Order::Asc)],
                Some(10),
                |query| query.filter(statistic::Column::Published.eq(true)),
            )
            .await
            .expect("find_all should succeed");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 7);
    }

    #[tokio::test]
    async fn delete_maps_zero_rows_to_not_found() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let dao = StatisticDao::new(&db);

        let err = dao.delete(id).await.expect_err("delete should fail");
        assert!(matches!(
            err,
            DaoLayerError::NotFound { entity: "statistic", id: missing } if missing == id
        ));
    }

    #[tokio::test]
    async fn update_propagates_db_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let dao = StatisticDao::new(&db);

        let err = dao
            .update(Uuid::new_v4(), |_| {})
            .await
            .expect_err("update should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
