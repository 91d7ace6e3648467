use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "interactions")]
pub struct Model {
    #[sea_orm(indexed)]
    pub customer_id: Option<Uuid>,
    #[sea_orm(indexed)]
    pub lead_id: Option<Uuid>,
    pub kind: String,
    #[sea_orm(column_type = "Text")]
    pub summary: String,
    pub occurred_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "customer_id", to = "id", on_delete = "Cascade")]
    pub customer: HasOne<super::customer::Entity>,
    #[sea_orm(belongs_to, from = "lead_id", to = "id", on_delete = "Cascade")]
    pub lead: HasOne<super::lead::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
