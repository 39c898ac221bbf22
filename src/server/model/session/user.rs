use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

pub const SESSION_USER_ID_KEY: &str = "tenantry:user:id";

#[derive(Default, Deserialize, Serialize, Debug)]
pub struct SessionUserId(pub String);

impl SessionUserId {
    /// Insert user ID into session
    ///
    /// The session id is cycled first so a pre-login session id cannot be reused.
    pub async fn insert(session: &Session, user_id: i32) -> Result<(), Error> {
        session.cycle_id().await?;
        session
            .insert(SESSION_USER_ID_KEY, SessionUserId(user_id.to_string()))
            .await?;

        Ok(())
    }

    /// Get user ID from session
    pub async fn get(session: &Session) -> Result<Option<i32>, Error> {
        session
            .get::<SessionUserId>(SESSION_USER_ID_KEY)
            .await?
            .map(|SessionUserId(id_str)| {
                id_str.parse::<i32>().map_err(|e| {
                    Error::ParseError(format!("Failed to parse session user id: {}", e))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    mod insert {
        use tenantry_test_utils::prelude::*;

        use crate::server::model::session::user::SessionUserId;

        #[tokio::test]
        /// Expect success when inserting valid user ID into session
        async fn inserts_user_id() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;

            let result = SessionUserId::insert(&test.session, 1).await;

            assert!(result.is_ok());

            Ok(())
        }
    }

    mod get {
        use tenantry_test_utils::prelude::*;

        use crate::server::model::session::user::{SessionUserId, SESSION_USER_ID_KEY};

        #[tokio::test]
        /// Expect Some when user ID is present in session
        async fn returns_inserted_user_id() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;
            SessionUserId::insert(&test.session, 7).await.unwrap();

            let result = SessionUserId::get(&test.session).await;

            assert_eq!(result.unwrap(), Some(7));

            Ok(())
        }

        #[tokio::test]
        /// Expect None when no user ID is present in session
        async fn returns_none_when_absent() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;

            let result = SessionUserId::get(&test.session).await;

            assert!(result.unwrap().is_none());

            Ok(())
        }

        #[tokio::test]
        /// Expect parse error when user ID inserted into session is not an i32
        async fn parse_error_for_invalid_id() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;
            test.session
                .insert(SESSION_USER_ID_KEY, SessionUserId("invalid_id".to_string()))
                .await?;

            let result = SessionUserId::get(&test.session).await;

            assert!(result.is_err());

            Ok(())
        }
    }
}
