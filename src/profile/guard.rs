//! Middleware that keeps users without a completed profile on the setup page.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    Error, endpoints,
    profile::ProfileState,
    user::{UserID, get_user_by_id},
};

/// Redirects users that have not completed their profile to the setup page.
///
/// Must run after [crate::auth::auth_guard] so the [UserID] extension is set.
pub async fn profile_guard(
    State(state): State<ProfileState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user_id) = request.extensions().get::<UserID>().copied() else {
        tracing::error!("profile_guard ran without a user ID, is auth_guard missing?");
        return Redirect::to(endpoints::LOG_IN_VIEW).into_response();
    };

    let profile_completed = match state.db_connection.lock() {
        Ok(connection) => get_user_by_id(user_id, &connection).map(|user| user.profile_completed),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match profile_completed {
        Ok(true) => next.run(request).await,
        Ok(false) => Redirect::to(endpoints::PROFILE_SETUP_VIEW).into_response(),
        Err(Error::NotFound) => {
            tracing::warn!("Auth cookie for unknown user {user_id}, redirecting to log in.");
            Redirect::to(endpoints::LOG_IN_VIEW).into_response()
        }
        Err(error) => {
            tracing::error!("could not check the profile of user {user_id}: {error}");
            error.into_response()
        }
    }
}
