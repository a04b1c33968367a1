//! Service report entity.

use sea_orm::entity::prelude::*;

use crate::domain::{CustomerInfo, DeviceInfo, ServiceReport};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub dispatch_no: String,
    pub admin_id: i64,
    pub teknisi_id: Option<i64>,
    pub assigned_by: Option<i64>,
    pub customer_name: String,
    pub customer_address: String,
    pub customer_contact: String,
    pub device_name: String,
    pub device_serial: String,
    pub device_location: String,
    #[sea_orm(column_type = "Text")]
    pub complaint: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub action_taken: Option<String>,
    pub status: String,
    pub opened_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ServiceReport {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse()
            .map_err(|_| AppError::internal(format!("Unknown report status in store: {}", model.status)))?;

        Ok(ServiceReport {
            id: model.id,
            dispatch_no: model.dispatch_no,
            admin_id: model.admin_id,
            teknisi_id: model.teknisi_id,
            assigned_by: model.assigned_by,
            customer: CustomerInfo {
                name: model.customer_name,
                address: model.customer_address,
                contact: model.customer_contact,
            },
            device: DeviceInfo {
                name: model.device_name,
                serial: model.device_serial,
                location: model.device_location,
            },
            complaint: model.complaint,
            action_taken: model.action_taken,
            status,
            opened_at: model.opened_at,
            updated_at: model.updated_at,
            completed_at: model.completed_at,
        })
    }
}
