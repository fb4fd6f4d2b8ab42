//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::{
    auth::{
        AuthServiceError, SessionTokenVersion, format_session_token, generate_session_secret,
        hash_password,
        models::{IssuedSession, NewSession, Registration, SessionUuid},
        parse_session_token,
        repository::PgSessionsRepository,
        session_verifier, verify_password,
    },
    database::Db,
    domain::users::{
        PgUsersRepository,
        models::{NewUser, UserUuid},
    },
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    sessions: PgSessionsRepository,
    users: PgUsersRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            sessions: PgSessionsRepository::new(),
            users: PgUsersRepository::new(),
        }
    }

    async fn issue_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_uuid: UserUuid,
    ) -> Result<IssuedSession, AuthServiceError> {
        let session_uuid = SessionUuid::new();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid, version, &secret);

        let session = self
            .sessions
            .create_session(
                tx,
                &NewSession {
                    uuid: session_uuid,
                    user_uuid,
                    version,
                    token_hash: session_verifier(session_uuid, version, user_uuid, &secret),
                },
            )
            .await?;

        Ok(IssuedSession {
            token,
            user_uuid,
            session,
        })
    }

    /// Resolve a bearer token to its live session, checking the verifier.
    async fn verify_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        bearer_token: &str,
    ) -> Result<(SessionUuid, UserUuid), AuthServiceError> {
        let parsed = parse_session_token(bearer_token)
            .map_err(|_token_error| AuthServiceError::NotFound)?;

        let session = self
            .sessions
            .find_active_session(tx, parsed.session_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let expected = session_verifier(
            parsed.session_uuid,
            session.version,
            session.user_uuid,
            &parsed.secret,
        );

        if expected != session.token_hash {
            return Err(AuthServiceError::NotFound);
        }

        Ok((parsed.session_uuid, session.user_uuid))
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    #[tracing::instrument(
        name = "auth.service.register",
        skip(self, registration),
        fields(
            username = %registration.username,
            user_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn register(
        &self,
        registration: Registration,
    ) -> Result<IssuedSession, AuthServiceError> {
        let password_hash = hash_password(&registration.password)?;

        let mut tx = self.db.begin_transaction().await?;

        let user = self
            .users
            .create_user(
                &mut tx,
                &NewUser {
                    uuid: UserUuid::new(),
                    username: registration.username,
                    password_hash,
                    first_name: registration.first_name,
                },
            )
            .await?;

        let issued = self.issue_session(&mut tx, user.uuid).await?;

        tx.commit().await?;

        tracing::Span::current().record("user_uuid", tracing::field::display(user.uuid));

        info!(user_uuid = %user.uuid, "registered user");

        Ok(issued)
    }

    #[tracing::instrument(
        name = "auth.service.login",
        skip(self, password),
        fields(user_uuid = tracing::field::Empty),
        err
    )]
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedSession, AuthServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let Some(credentials) = self
            .users
            .find_credentials_by_username(&mut tx, username)
            .await?
        else {
            warn!("sign-in for unknown username");

            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(password, &credentials.password_hash) {
            warn!(user_uuid = %credentials.uuid, "sign-in with wrong password");

            return Err(AuthServiceError::InvalidCredentials);
        }

        let issued = self.issue_session(&mut tx, credentials.uuid).await?;

        tx.commit().await?;

        tracing::Span::current().record("user_uuid", tracing::field::display(credentials.uuid));

        info!("user signed in");

        Ok(issued)
    }

    #[tracing::instrument(name = "auth.service.logout", skip(self, bearer_token), err)]
    async fn logout(&self, bearer_token: &str) -> Result<(), AuthServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let (session, user) = self.verify_token(&mut tx, bearer_token).await?;

        if self.sessions.revoke_session(&mut tx, session).await? == 0 {
            return Err(AuthServiceError::NotFound);
        }

        tx.commit().await?;

        info!(user_uuid = %user, session_uuid = %session, "user signed out");

        Ok(())
    }

    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let (session, user) = self.verify_token(&mut tx, bearer_token).await?;

        // Best-effort metadata update; auth success should not depend on this write.
        if let Err(source) = self.sessions.touch_session(&mut tx, session).await {
            warn!("failed to record session use: {source}");

            return Ok(user);
        }

        tx.commit().await?;

        Ok(user)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a user account and sign it in.
    async fn register(&self, registration: Registration)
    -> Result<IssuedSession, AuthServiceError>;

    /// Exchange a username and password for a fresh session token.
    async fn login(&self, username: &str, password: &str)
    -> Result<IssuedSession, AuthServiceError>;

    /// Revoke the session behind a bearer token.
    async fn logout(&self, bearer_token: &str) -> Result<(), AuthServiceError>;

    /// Resolve a bearer token to the signed-in user.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}
