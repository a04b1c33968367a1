//! Partner location repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use super::entities::partner_location::{self, Entity as PartnerEntity};
use crate::domain::{NewPartnerLocation, PartnerLocation};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// Locations ordered by province name, then hospital name
    async fn list(&self, province_code: Option<String>) -> AppResult<Vec<PartnerLocation>>;

    async fn create(&self, input: NewPartnerLocation) -> AppResult<PartnerLocation>;

    /// Returns the number of rows removed
    async fn delete(&self, id: i64) -> AppResult<u64>;
}

pub struct PartnerStore {
    db: DatabaseConnection,
}

impl PartnerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PartnerRepository for PartnerStore {
    async fn list(&self, province_code: Option<String>) -> AppResult<Vec<PartnerLocation>> {
        let mut query = PartnerEntity::find();
        if let Some(code) = province_code {
            query = query.filter(partner_location::Column::ProvinceCode.eq(code));
        }

        let models = query
            .order_by_asc(partner_location::Column::ProvinceName)
            .order_by_asc(partner_location::Column::HospitalName)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(PartnerLocation::from).collect())
    }

    async fn create(&self, input: NewPartnerLocation) -> AppResult<PartnerLocation> {
        let now = Utc::now();
        let model = partner_location::ActiveModel {
            id: NotSet,
            province_code: Set(input.province_code),
            province_name: Set(input.province_name),
            hospital_name: Set(input.hospital_name),
            address: Set(input.address),
            maintenance_count: Set(input.maintenance_count),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(PartnerLocation::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<u64> {
        let result = PartnerEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
