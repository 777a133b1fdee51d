//! /auth
//! Handlers related to authentication.

use super::prelude::*;
use crate::authentication;
use mise_core::Role;
pub use tower_cookies::Cookies;

// handlers

/// Signs the user in and starts a session.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<MiseState>,
    cookies: Cookies,
    Json(login): Json<req::Login<'static>>,
) -> MiseResult<Json<res::LoginAck>> {
    use schema::users as u;

    let task_state = state.clone();
    let req::Login { username, password } = login;
    let name = username.clone().into_owned();
    let verified = tokio::task::spawn_blocking(move || {
        let mut conn = task_state.pool.get()?;

        let user = u::table
            .select(UserAuth::as_select())
            .filter(u::username.eq(username.as_ref()))
            .get_result::<UserAuth>(&mut conn)
            .optional()?;
        let Some(UserAuth { id, password_hash }) = user else {
            return MiseResult::Ok(None);
        };
        if authentication::verify_password(&password, &password_hash).is_err() {
            return Ok(None);
        }
        let roles = queries::user_role_names(&mut conn, id)?;
        let admin = roles.iter().any(|r| r.parse::<Role>() == Ok(Role::Admin));

        Ok(Some((id, admin)))
    })
    .await??
    .ok_or(MiseError::Unauthorized("Invalid username or password"))?;

    let (user_id, admin) = verified;
    let signed_cookies = cookies.signed(&state.private_cookie_key);
    authentication::save_session(user_id, admin, signed_cookies, &state.sessions).await?;

    tracing::info!("Signed in user {user_id}");
    Ok(Json(res::LoginAck {
        username: name,
        message: "Login successful".to_string(),
    }))
}

/// Fetches the signed-in user's own details.
#[instrument]
pub async fn current(
    State(state): State<MiseState>,
    user: Authentication,
) -> MiseResult<Json<res::UserDetails>> {
    let user_id = user.user_id;
    let details = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        queries::user_details(&mut conn, user_id)
    })
    .await??;

    Ok(Json(details))
}

/// Ends the session. Also succeeds when nobody is signed in so a stale
/// cookie can always be cleared.
#[instrument]
pub async fn logout(
    State(state): State<MiseState>,
    cookies: Cookies,
    user: Option<Authentication>,
) -> MiseResult<()> {
    let signed_cookies = cookies.signed(&state.private_cookie_key);
    authentication::forget_session(
        user.map(|u| u.session_id),
        &signed_cookies,
        &state.sessions,
    )
    .await;

    Ok(())
}

// queries

query! {
    struct UserAuth {
        id: i32 = users::id,
        password_hash: String = users::password_hash,
    }
}
