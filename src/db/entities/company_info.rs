use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "company_info")]
pub struct Model {
    pub name_en: String,
    pub name_ar: String,
    #[sea_orm(column_type = "Text")]
    pub about_en: String,
    #[sea_orm(column_type = "Text")]
    pub about_ar: String,
    pub address_en: String,
    pub address_ar: String,
    pub email: String,
    pub phone: String,
    pub founded_year: i32,
}

impl ActiveModelBehavior for ActiveModel {}
