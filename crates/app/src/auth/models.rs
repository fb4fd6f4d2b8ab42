//! Auth data models.

use jiff::Timestamp;

use crate::{auth::SessionTokenVersion, domain::users::models::UserUuid, uuids::TypedUuid};

/// Session UUID
pub type SessionUuid = TypedUuid<Session>;

/// Session data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    /// User that owns this session.
    pub user_uuid: UserUuid,

    /// Token format/hash version.
    pub version: SessionTokenVersion,

    /// SHA-256 verifier for the token secret material.
    pub token_hash: String,
}

/// Session metadata persisted in storage.
#[derive(Debug, Clone)]
pub struct Session {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// New session persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewSession {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub token_hash: String,
}

/// Session issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user_uuid: UserUuid,
    pub session: Session,
}

/// Sign-up payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub first_name: String,
}
