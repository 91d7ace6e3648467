use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(kind = "content")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "team_members")]
pub struct Model {
    pub name_en: String,
    pub name_ar: String,
    pub role_en: String,
    pub role_ar: String,
    pub photo_url: String,
    pub email: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}
