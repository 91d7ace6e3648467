use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "newsletter_subscribers")]
pub struct Model {
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(default_value = "en")]
    pub locale: String,
}

impl ActiveModelBehavior for ActiveModel {}
