use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "translations")]
pub struct Model {
    #[sea_orm(unique)]
    pub key: String,
    #[sea_orm(column_type = "Text")]
    pub value_en: String,
    #[sea_orm(column_type = "Text")]
    pub value_ar: String,
    #[sea_orm(indexed)]
    pub category: String,
}

impl ActiveModelBehavior for ActiveModel {}
