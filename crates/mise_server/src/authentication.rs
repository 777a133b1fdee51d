//! Contains the `Session` type and `Authentication` extractor as well as other authentication related helpers.

use crate::{error::MiseError, MiseState};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{request::Parts, StatusCode},
    RequestPartsExt,
};
use moka::{future::Cache, Expiry};
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, convert::Infallible, fmt::Debug, time::Duration};
use tower_cookies::{cookie::SameSite, Cookie, Cookies, SignedCookies};

pub type SessionCache = Cache<i32, Session>;

/// Session stored in the server's cache.
#[derive(Clone)]
pub struct Session {
    /// The user's database id.
    user_id: i32,
    /// Whether the user held the admin role when the session was created.
    admin: bool,
}

/// Basic cache expiration policy that refreshes after reads and writes.
pub struct Expiration {
    pub days: Duration,
}

impl Expiration {
    pub fn new(days: u32) -> Self {
        Self {
            days: chrono::Duration::days(days.into())
                .to_std()
                .expect("Invalid duration"),
        }
    }
}

impl<K, V> Expiry<K, V> for Expiration {
    fn expire_after_create(
        &self,
        _key: &K,
        _value: &V,
        _current_time: std::time::Instant,
    ) -> Option<std::time::Duration> {
        Some(self.days)
    }

    fn expire_after_read(
        &self,
        _key: &K,
        _value: &V,
        _current_time: std::time::Instant,
        _current_duration: Option<std::time::Duration>,
        _last_modified_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(self.days)
    }

    fn expire_after_update(
        &self,
        _key: &K,
        _value: &V,
        _current_time: std::time::Instant,
        _current_duration: Option<std::time::Duration>,
    ) -> Option<std::time::Duration> {
        Some(self.days)
    }
}

/// The cookie that is stored signed on the user's browser for authentication.
#[derive(Deserialize, Serialize)]
struct SessionCookie {
    user_id: i32,
    /// Session's id in the cache
    session_id: i32,
}

impl SessionCookie {
    /// The name of the cookie in the browser.
    const NAME: &'static str = mise_api::SESSION_COOKIE_NAME;

    /// Creates a new session cookie with a random session id.
    fn new(user_id: i32) -> Self {
        Self {
            user_id,
            session_id: rand::random(),
        }
    }

    /// Tries to extract the cookie from signed cookies.
    /// Removes cookies that exist but fail to parse.
    fn from_signed_cookies(signed_cookies: &SignedCookies<'_>) -> Option<Self> {
        let cookie = signed_cookies.get(SessionCookie::NAME)?;
        match serde_json::from_str::<SessionCookie>(cookie.value()) {
            Ok(session_cookie) => Some(session_cookie),
            Err(_err) => {
                // found cookie but it was malformed for whatever reason, remove it
                remove_session_cookie(signed_cookies);
                None
            }
        }
    }
}

/// Extractor used for authentication.
#[derive(Deserialize, Serialize)]
pub struct Authentication {
    pub session_id: i32,
    pub user_id: i32,
    pub admin: bool,
}

impl Authentication {
    /// Guard for management endpoints.
    pub fn require_admin(&self) -> Result<(), MiseError> {
        if self.admin {
            Ok(())
        } else {
            Err(MiseError::Forbidden("Admin role required"))
        }
    }
}

impl Debug for Authentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_id)
    }
}

impl FromRequestParts<MiseState> for Authentication {
    type Rejection = (StatusCode, &'static str);

    /// Checks the cache for a session that corresponds to the cookie.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &MiseState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = parts.extract::<Cookies>().await?;
        let signed_cookies = cookies.signed(&state.private_cookie_key);
        let session_cookie = SessionCookie::from_signed_cookies(&signed_cookies)
            .ok_or((StatusCode::UNAUTHORIZED, "Not signed in"))?;
        match state.sessions.get(&session_cookie.session_id).await {
            Some(session) => Ok(Authentication {
                session_id: session_cookie.session_id,
                user_id: session.user_id,
                admin: session.admin,
            }),
            None => {
                // signed cookie but no live session: expired or revoked
                remove_session_cookie(&signed_cookies);
                Err((StatusCode::UNAUTHORIZED, "Session expired"))
            }
        }
    }
}

impl OptionalFromRequestParts<MiseState> for Authentication {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &MiseState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let authentication =
            <Authentication as FromRequestParts<MiseState>>::from_request_parts(parts, state)
                .await
                .ok();
        Ok(authentication)
    }
}

fn build_cookie(value: impl Into<Cow<'static, str>>) -> Cookie<'static> {
    // not HttpOnly: the web app checks for the cookie's presence before its
    // startup auth call; the value stays an opaque signed blob either way
    Cookie::build((SessionCookie::NAME, value))
        .path("/")
        .secure(false)
        .http_only(false)
        .same_site(SameSite::Strict)
        .build()
}

/// Saves a new session for the user to both the cookies and server cache.
pub async fn save_session(
    user_id: i32,
    admin: bool,
    signed_cookies: SignedCookies<'_>,
    sessions: &SessionCache,
) -> eyre::Result<i32> {
    let session_cookie = SessionCookie::new(user_id);
    let cookie_value = serde_json::to_string(&session_cookie)?;
    let cookie = build_cookie(cookie_value);
    signed_cookies.add(cookie);
    sessions
        .insert(session_cookie.session_id, Session { user_id, admin })
        .await;
    Ok(session_cookie.session_id)
}

fn remove_session_cookie(signed_cookies: &SignedCookies<'_>) {
    let cookie = build_cookie("");
    signed_cookies.remove(cookie);
}

/// Forgets the session. Also clears the cookie when no session was live.
pub async fn forget_session(
    session_id: Option<i32>,
    signed_cookies: &SignedCookies<'_>,
    sessions: &SessionCache,
) {
    remove_session_cookie(signed_cookies);
    if let Some(session_id) = session_id {
        sessions.remove(&session_id).await;
    }
}

pub fn hash_password(password: &str) -> eyre::Result<String> {
    let argon = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| eyre::eyre!("Failed to hash password"))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> eyre::Result<()> {
    let argon = Argon2::default();
    let password_hash = PasswordHash::new(password_hash)
        .map_err(|_| eyre::eyre!("Failed to create password hash"))?;
    argon
        .verify_password(password.as_bytes(), &password_hash)
        .map_err(|_| eyre::eyre!("Failed to verify password"))?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verifies_a_hashed_password() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).is_ok());
    }

    #[test]
    fn rejects_a_wrong_password() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter3", &hash).is_err());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);
    }
}
