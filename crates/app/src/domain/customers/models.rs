//! Customer Models

use std::{fmt, net::IpAddr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::users::models::UserUuid, uuids::TypedUuid};

/// Customer UUID
pub type CustomerUuid = TypedUuid<Customer>;

/// Longest accepted guest key.
pub const GUEST_KEY_MAX_LEN: usize = 128;

/// Customer Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub uuid: CustomerUuid,
    pub user_uuid: Option<UserUuid>,
    pub guest_key: Option<String>,
    pub created_at: Timestamp,
}

/// Who is shopping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerIdentity {
    /// A signed-in user.
    User(UserUuid),

    /// An anonymous visitor, keyed by client token or remote address.
    Guest(GuestKey),
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GuestKeyError {
    #[error("guest key is empty")]
    Empty,

    #[error("guest key is longer than {GUEST_KEY_MAX_LEN} characters")]
    TooLong,
}

/// Opaque guest identifier. The stored form carries its source, so a
/// client token can never name the same customer as a remote address.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GuestKey(String);

impl GuestKey {
    /// Key a guest by a token the client sent, trimmed.
    ///
    /// # Errors
    ///
    /// Rejects empty tokens and tokens longer than [`GUEST_KEY_MAX_LEN`].
    pub fn from_token(raw: &str) -> Result<Self, GuestKeyError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(GuestKeyError::Empty);
        }

        if trimmed.chars().count() > GUEST_KEY_MAX_LEN {
            return Err(GuestKeyError::TooLong);
        }

        Ok(Self(format!("token:{trimmed}")))
    }

    /// Key a guest by the address the request came from.
    #[must_use]
    pub fn from_remote_ip(ip: IpAddr) -> Self {
        Self(format!("addr:{ip}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GuestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GuestKey").field(&self.0).finish()
    }
}
