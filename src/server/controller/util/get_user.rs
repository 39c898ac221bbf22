use tower_sessions::Session;

use crate::server::{
    error::{auth::AuthError, Error},
    model::{app::AppState, session::user::SessionUserId},
    service::{access::Actor, user::UserService},
};

/// Retrieves the signed-in user from session and then from database
///
/// # Arguments
/// - `state`: Application state with database connection
/// - `session`: The user's session
///
/// # Returns
/// - `Ok(Model)`: User found
/// - `Err(AuthError::UserNotInSession)`: User ID not present in session
/// - `Err(AuthError::UserNotInDatabase)`: User ID exists in session but not found in database (session is cleared)
/// - `Err(Error)`: Internal errors (database query failures, session errors, etc.)
pub async fn get_user_from_session(
    state: &AppState,
    session: &Session,
) -> Result<entity::app_user::Model, Error> {
    let Some(user_id) = SessionUserId::get(session).await? else {
        return Err(Error::AuthError(AuthError::UserNotInSession));
    };

    let Some(user) = UserService::new(&state.db).get_user(user_id).await? else {
        session.clear().await;

        tracing::debug!(
            "Session cleared for user ID {} with active session but was not found in database",
            user_id
        );

        return Err(Error::AuthError(AuthError::UserNotInDatabase(user_id)));
    };

    Ok(user)
}

/// Signed-in user reduced to an [`Actor`] for access checks
pub async fn get_actor(state: &AppState, session: &Session) -> Result<Actor, Error> {
    let user = get_user_from_session(state, session).await?;

    Ok(Actor::from(&user))
}

#[cfg(test)]
mod tests {
    use tenantry_test_utils::prelude::*;

    use super::{get_actor, get_user_from_session};
    use crate::server::{
        error::{auth::AuthError, Error},
        model::session::user::SessionUserId,
        util::test::app_state,
    };

    /// Expect the session user to be returned
    #[tokio::test]
    async fn returns_session_user() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        SessionUserId::insert(&test.session, landlord.id).await.unwrap();
        let state = app_state(&test);

        let actor = get_actor(&state, &test.session).await.unwrap();

        assert_eq!(actor.id, landlord.id);
        assert_eq!(actor.role, landlord.role);

        Ok(())
    }

    /// Expect UserNotInSession for an anonymous session
    #[tokio::test]
    async fn fails_without_session_user() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let state = app_state(&test);

        let result = get_user_from_session(&state, &test.session).await;

        assert!(matches!(
            result,
            Err(Error::AuthError(AuthError::UserNotInSession))
        ));

        Ok(())
    }

    /// Expect the session to be cleared when its user no longer exists
    #[tokio::test]
    async fn clears_session_for_missing_user() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        SessionUserId::insert(&test.session, 404).await.unwrap();
        let state = app_state(&test);

        let result = get_user_from_session(&state, &test.session).await;

        assert!(matches!(
            result,
            Err(Error::AuthError(AuthError::UserNotInDatabase(404)))
        ));
        assert_eq!(SessionUserId::get(&test.session).await.unwrap(), None);

        Ok(())
    }
}
