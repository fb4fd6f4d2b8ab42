//! Profile Handlers

pub(crate) mod avatar;
pub(crate) mod get;
pub(crate) mod password;
pub(crate) mod update;

#[cfg(test)]
pub(crate) mod tests {
    use jiff::Timestamp;

    use megano_app::domain::users::models::User;

    use crate::test_helpers::TEST_USER_UUID;

    pub(crate) fn make_user() -> User {
        User {
            uuid: TEST_USER_UUID,
            username: "ada".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: None,
            avatar_src: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
