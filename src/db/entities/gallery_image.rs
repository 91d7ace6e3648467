use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(kind = "content")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "gallery_images")]
pub struct Model {
    pub caption_en: String,
    pub caption_ar: String,
    pub image_url: String,
    #[sea_orm(indexed)]
    pub category: String,
}

impl ActiveModelBehavior for ActiveModel {}
