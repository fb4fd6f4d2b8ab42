//! Profile

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use megano_app::domain::users::models::User;

pub(crate) mod handlers;

/// Avatar image
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvatarResponse {
    pub src: String,
    pub alt: String,
}

/// Profile Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileResponse {
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<AvatarResponse>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        let full_name = user.full_name();

        Self {
            avatar: user.avatar_src.map(|src| AvatarResponse {
                src,
                alt: full_name.clone(),
            }),
            username: user.username,
            full_name,
            email: user.email,
            phone: user.phone,
        }
    }
}
