//! Users service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{hash_password, verify_password},
    database::Db,
    domain::users::{
        PgUsersRepository,
        errors::UsersServiceError,
        models::{PasswordChange, ProfileUpdate, User, UserUuid, split_full_name},
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn get_profile(&self, user: UserUuid) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let profile = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(profile)
    }

    #[tracing::instrument(
        name = "users.service.update_profile",
        skip(self, update),
        fields(user_uuid = %user),
        err
    )]
    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<User, UsersServiceError> {
        let (first_name, last_name) = split_full_name(&update.full_name);

        let mut tx = self.db.begin_transaction().await?;

        let profile = self
            .repository
            .update_profile(
                &mut tx,
                user,
                &first_name,
                &last_name,
                update.email.as_deref(),
                update.phone.as_deref(),
            )
            .await?;

        tx.commit().await?;

        info!("updated profile");

        Ok(profile)
    }

    #[tracing::instrument(
        name = "users.service.change_password",
        skip(self, change),
        fields(user_uuid = %user),
        err
    )]
    async fn change_password(
        &self,
        user: UserUuid,
        change: PasswordChange,
    ) -> Result<(), UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current_hash = self.repository.get_password_hash(&mut tx, user).await?;

        if !verify_password(&change.current_password, &current_hash) {
            return Err(UsersServiceError::IncorrectPassword);
        }

        let new_hash = hash_password(&change.new_password)?;

        self.repository
            .update_password_hash(&mut tx, user, &new_hash)
            .await?;

        tx.commit().await?;

        info!("changed password");

        Ok(())
    }

    async fn update_avatar(
        &self,
        user: UserUuid,
        avatar_src: Option<String>,
    ) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let profile = self
            .repository
            .update_avatar(&mut tx, user, avatar_src.as_deref())
            .await?;

        tx.commit().await?;

        Ok(profile)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Retrieve the user's profile.
    async fn get_profile(&self, user: UserUuid) -> Result<User, UsersServiceError>;

    /// Replace name, email and phone. The full name is split into first and
    /// last name on whitespace.
    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<User, UsersServiceError>;

    /// Change the password after checking the current one.
    async fn change_password(
        &self,
        user: UserUuid,
        change: PasswordChange,
    ) -> Result<(), UsersServiceError>;

    /// Set or clear the avatar image URL.
    async fn update_avatar(
        &self,
        user: UserUuid,
        avatar_src: Option<String>,
    ) -> Result<User, UsersServiceError>;
}
