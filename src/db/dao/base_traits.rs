use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, IntoActiveModel, PrimaryKeyTrait,
    TryIntoModel,
};
use uuid::Uuid;

pub trait HasCreatedAtColumn: EntityTrait {
    fn created_at_column() -> Self::Column;
}

/// Bilingual content tables: manual ordering plus a publish gate.
pub trait HasContentColumns: EntityTrait {
    fn sort_order_column() -> Self::Column;
    fn published_column() -> Self::Column;
}

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
}

/// Everything the DAO, service and router layers need from a table declared with
/// `#[base_entity]`. Blanket-implemented, never implemented by hand.
pub trait RecordEntity:
    EntityTrait<
        Model: IntoActiveModel<<Self as EntityTrait>::ActiveModel>
                   + serde::Serialize
                   + serde::de::DeserializeOwned
                   + Clone
                   + Send
                   + Sync,
        ActiveModel: ActiveModelTrait<Entity = Self>
                         + TryIntoModel<<Self as EntityTrait>::Model>
                         + ActiveModelBehavior
                         + HasIdActiveModel
                         + TimestampedActiveModel
                         + Send
                         + Sync,
        PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
    > + HasCreatedAtColumn
    + Send
    + Sync
{
}

impl<E> RecordEntity for E where
    E: EntityTrait<
            Model: IntoActiveModel<<E as EntityTrait>::ActiveModel>
                       + serde::Serialize
                       + serde::de::DeserializeOwned
                       + Clone
                       + Send
                       + Sync,
            ActiveModel: ActiveModelTrait<Entity = E>
                             + TryIntoModel<<E as EntityTrait>::Model>
                             + ActiveModelBehavior
                             + HasIdActiveModel
                             + TimestampedActiveModel
                             + Send
                             + Sync,
            PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
        > + HasCreatedAtColumn
        + Send
        + Sync
{
}
