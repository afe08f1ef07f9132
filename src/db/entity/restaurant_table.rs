use sea_orm::entity::prelude::*;
use serde::{ Deserialize, Serialize };

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurant_tables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// NULL for single-tenant deployments; part of the lookup key otherwise.
    pub restaurant_id: Option<i32>,
    pub name: String,
    /// Permanent secret baked into the printed code; never regenerated once set.
    pub token: Option<String>,
    pub url: Option<String>,
    pub qr_code_path: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
