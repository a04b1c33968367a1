//! Password rotation shared by admin resets and self-service recovery.
//!
//! The new hash is written with a compare-and-set on the previous hash, then
//! the credential is emailed. If delivery fails the previous hash is put back
//! with a second compare-and-set so the account is left as it was.

use crate::domain::{Password, TemporaryCredential, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{EmailMessage, Mailer, UserRepository};

pub(crate) async fn rotate_password(
    users: &dyn UserRepository,
    mailer: &dyn Mailer,
    user: &User,
    plain: String,
) -> AppResult<TemporaryCredential> {
    let new_hash = Password::new(&plain)?.into_string();
    let previous = user.password_hash.clone();

    if !users
        .swap_password_hash(user.id, previous.clone(), new_hash.clone())
        .await?
    {
        return Err(AppError::stale("User"));
    }

    let message = EmailMessage::temporary_password(&user.email, &user.full_name, &plain);
    if let Err(send_err) = mailer.send(message).await {
        let cause = match send_err {
            AppError::Delivery(cause) => cause,
            other => other.to_string(),
        };

        return match users.swap_password_hash(user.id, new_hash, previous).await {
            Ok(true) => {
                tracing::warn!(user_id = user.id, error = %cause, "Password email failed, change reverted");
                Err(AppError::Delivery(cause))
            }
            Ok(false) => {
                tracing::error!(
                    user_id = user.id,
                    "Password email failed and the hash changed concurrently; not reverted"
                );
                Err(AppError::internal("password rollback skipped after concurrent change"))
            }
            Err(rollback_err) => {
                tracing::error!(
                    user_id = user.id,
                    error = %rollback_err,
                    "Password email failed and rollback failed"
                );
                Err(AppError::internal(format!("password rollback failed: {}", rollback_err)))
            }
        };
    }

    Ok(TemporaryCredential {
        user_id: user.id,
        temporary_password: plain,
    })
}
