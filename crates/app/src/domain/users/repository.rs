//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::users::models::{NewUser, User, UserCredentials, UserUuid};

const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const FIND_CREDENTIALS_BY_USERNAME_SQL: &str = include_str!("sql/find_credentials_by_username.sql");
const GET_PASSWORD_HASH_SQL: &str = include_str!("sql/get_password_hash.sql");
const UPDATE_PROFILE_SQL: &str = include_str!("sql/update_profile.sql");
const UPDATE_PASSWORD_HASH_SQL: &str = include_str!("sql/update_password_hash.sql");
const UPDATE_AVATAR_SQL: &str = include_str!("sql/update_avatar.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &NewUser,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_credentials_by_username(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        username: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        let row = query(FIND_CREDENTIALS_BY_USERNAME_SQL)
            .bind(username)
            .fetch_optional(&mut **tx)
            .await?;

        row.map(|row| {
            Ok(UserCredentials {
                uuid: UserUuid::from_uuid(row.try_get("uuid")?),
                password_hash: row.try_get("password_hash")?,
            })
        })
        .transpose()
    }

    /// Locks the user row until the transaction ends.
    pub(crate) async fn get_password_hash(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<String, sqlx::Error> {
        query_scalar::<Postgres, String>(GET_PASSWORD_HASH_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(UPDATE_PROFILE_SQL)
            .bind(user.into_uuid())
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .bind(phone)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_password_hash(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_PASSWORD_HASH_SQL)
            .bind(user.into_uuid())
            .bind(password_hash)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn update_avatar(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        avatar_src: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(UPDATE_AVATAR_SQL)
            .bind(user.into_uuid())
            .bind(avatar_src)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            username: row.try_get("username")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            avatar_src: row.try_get("avatar_src")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
