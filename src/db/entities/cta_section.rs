use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "cta_sections")]
pub struct Model {
    pub title_en: String,
    pub title_ar: String,
    #[sea_orm(column_type = "Text")]
    pub body_en: String,
    #[sea_orm(column_type = "Text")]
    pub body_ar: String,
    pub button_label_en: String,
    pub button_label_ar: String,
    pub button_url: String,
}

impl ActiveModelBehavior for ActiveModel {}
