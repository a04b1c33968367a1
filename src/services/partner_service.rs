//! Partner directory service.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use crate::domain::{ensure, Action, Actor, NewPartnerLocation, PartnerLocation};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait PartnerService: Send + Sync {
    async fn list(
        &self,
        actor: Actor,
        province_code: Option<String>,
    ) -> AppResult<Vec<PartnerLocation>>;

    async fn create(&self, actor: Actor, input: NewPartnerLocation) -> AppResult<PartnerLocation>;

    async fn delete(&self, actor: Actor, id: i64) -> AppResult<()>;
}

pub struct PartnerDirectory<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PartnerDirectory<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> PartnerService for PartnerDirectory<U> {
    async fn list(
        &self,
        actor: Actor,
        province_code: Option<String>,
    ) -> AppResult<Vec<PartnerLocation>> {
        ensure(actor.role, Action::ListPartners)?;
        let province_code = province_code.filter(|code| !code.is_empty());
        self.uow.partners().list(province_code).await
    }

    async fn create(&self, actor: Actor, input: NewPartnerLocation) -> AppResult<PartnerLocation> {
        ensure(actor.role, Action::ManagePartners)?;
        input.validate()?;

        let partner = self.uow.partners().create(input).await?;
        tracing::info!(partner_id = partner.id, hospital = %partner.hospital_name, "Partner location added");
        Ok(partner)
    }

    async fn delete(&self, actor: Actor, id: i64) -> AppResult<()> {
        ensure(actor.role, Action::ManagePartners)?;

        if self.uow.partners().delete(id).await? == 0 {
            return Err(AppError::NotFound("Partner location"));
        }

        tracing::info!(partner_id = id, "Partner location removed");
        Ok(())
    }
}
