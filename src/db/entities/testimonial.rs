use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(kind = "content")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "testimonials")]
pub struct Model {
    #[sea_orm(column_type = "Text")]
    pub quote_en: String,
    #[sea_orm(column_type = "Text")]
    pub quote_ar: String,
    pub author_en: String,
    pub author_ar: String,
    #[sea_orm(default_value = 5)]
    pub rating: i32,
}

impl ActiveModelBehavior for ActiveModel {}
