use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(kind = "content")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(unique)]
    pub slug: String,
    pub title_en: String,
    pub title_ar: String,
    #[sea_orm(column_type = "Text")]
    pub description_en: String,
    #[sea_orm(column_type = "Text")]
    pub description_ar: String,
    pub icon: String,
}

impl ActiveModelBehavior for ActiveModel {}
