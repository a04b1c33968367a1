//! Partner location entity.

use sea_orm::entity::prelude::*;

use crate::domain::PartnerLocation;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "partner_locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub province_code: String,
    pub province_name: String,
    pub hospital_name: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub maintenance_count: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PartnerLocation {
    fn from(model: Model) -> Self {
        PartnerLocation {
            id: model.id,
            province_code: model.province_code,
            province_name: model.province_name,
            hospital_name: model.hospital_name,
            address: model.address,
            maintenance_count: model.maintenance_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
