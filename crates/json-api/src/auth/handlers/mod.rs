//! Session Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use megano_app::auth::models::IssuedSession;

pub(crate) mod sign_in;
pub(crate) mod sign_out;
pub(crate) mod sign_up;

/// Issued session token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,

    /// Signed-in user
    pub user_id: Uuid,
}

impl From<IssuedSession> for SessionResponse {
    fn from(session: IssuedSession) -> Self {
        Self {
            token: session.token,
            user_id: session.user_uuid.into(),
        }
    }
}
