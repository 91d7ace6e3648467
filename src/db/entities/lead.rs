use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    pub name: String,
    #[sea_orm(indexed)]
    pub email: String,
    pub phone: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub source: String,
    #[sea_orm(indexed)]
    pub status: String,
    pub priority: String,
    #[sea_orm(indexed)]
    pub customer_id: Option<Uuid>,
    #[sea_orm(belongs_to, from = "customer_id", to = "id", on_delete = "SetNull")]
    pub customer: HasOne<super::customer::Entity>,
    #[sea_orm(has_many)]
    pub interactions: HasMany<super::interaction::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
