use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(kind = "content")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "statistics")]
pub struct Model {
    pub label_en: String,
    pub label_ar: String,
    pub value: i32,
    #[sea_orm(default_value = "")]
    pub suffix: String,
}

impl ActiveModelBehavior for ActiveModel {}
