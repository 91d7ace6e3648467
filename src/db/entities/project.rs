use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(kind = "content")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(unique)]
    pub slug: String,
    pub title_en: String,
    pub title_ar: String,
    #[sea_orm(column_type = "Text")]
    pub description_en: String,
    #[sea_orm(column_type = "Text")]
    pub description_ar: String,
    #[sea_orm(indexed)]
    pub category: String,
    pub image_url: String,
    pub location: Option<String>,
    #[sea_orm(indexed)]
    pub customer_id: Option<Uuid>,
    #[sea_orm(belongs_to, from = "customer_id", to = "id", on_delete = "SetNull")]
    pub customer: HasOne<super::customer::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
