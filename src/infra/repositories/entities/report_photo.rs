//! Report photo reference entity.

use sea_orm::entity::prelude::*;

use crate::domain::ReportPhoto;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "report_photos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub report_id: i64,
    pub kind: String,
    pub file_path: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ReportPhoto {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = model
            .kind
            .parse()
            .map_err(|_| AppError::internal(format!("Unknown photo kind in store: {}", model.kind)))?;

        Ok(ReportPhoto {
            id: model.id,
            report_id: model.report_id,
            kind,
            file_path: model.file_path,
            created_at: model.created_at,
        })
    }
}
