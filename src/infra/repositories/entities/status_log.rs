//! Status log entity (append-only).

use sea_orm::entity::prelude::*;

use crate::domain::{ReportStatus, StatusLog};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "status_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub report_id: i64,
    pub changed_by: i64,
    pub from_status: String,
    pub to_status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn parse_status(raw: &str) -> Result<ReportStatus, AppError> {
    raw.parse()
        .map_err(|_| AppError::internal(format!("Unknown report status in store: {}", raw)))
}

impl TryFrom<Model> for StatusLog {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(StatusLog {
            id: model.id,
            report_id: model.report_id,
            changed_by: model.changed_by,
            from_status: parse_status(&model.from_status)?,
            to_status: parse_status(&model.to_status)?,
            note: model.note,
            created_at: model.created_at,
        })
    }
}
