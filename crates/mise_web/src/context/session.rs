//! Session context: the client-side record of who is signed in.
//!
//! The session lives in a single reactive cell and only changes through the
//! [`bootstrap`], [`login`] and [`logout`] flows below, so consuming views
//! never observe a half-written state.

use crate::{
    context::get_client,
    cookie,
    error::{WebError, WebResult},
};
use leptos::prelude::*;
use mise_api::{request as req, response as res};
use mise_core::Role;

/// Snapshot of the session cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// `None` until the server has confirmed an identity.
    pub user: Option<res::UserDetails>,
    /// True while a session operation has a network call in flight.
    pub loading: bool,
    /// True once the startup auth check has completed, successfully or not.
    /// Guards against the check running more than once.
    pub checked: bool,
}

impl SessionState {
    /// The state the app starts in: nobody signed in, check still pending.
    pub fn initial() -> Self {
        Self {
            user: None,
            loading: true,
            checked: false,
        }
    }

    fn anonymous(checked: bool) -> Self {
        Self {
            user: None,
            loading: false,
            checked,
        }
    }

    fn authenticated(user: res::UserDetails) -> Self {
        Self {
            user: Some(user),
            loading: false,
            checked: true,
        }
    }
}

/// The network operations the session lifecycle depends on.
///
/// Implemented by [`Client`](crate::context::client::Client); tests script a
/// gateway instead of talking to a server.
#[allow(async_fn_in_trait)]
pub trait AuthGateway {
    async fn sign_in(&self, credentials: req::Login<'_>) -> WebResult<res::LoginAck>;
    async fn fetch_current_user(&self) -> WebResult<res::UserDetails>;
    async fn sign_out(&self) -> WebResult<()>;
}

/// Write access to the session cell. Every write replaces the whole state in
/// one step.
pub trait SessionCell {
    fn state(&self) -> SessionState;
    fn set_state(&self, state: SessionState);
}

/// One-time startup check reconciling the client with the server-side
/// session. A no-op once the check has already run.
pub async fn bootstrap<C, G>(cell: &C, gateway: &G, token: Option<String>)
where
    C: SessionCell,
    G: AuthGateway,
{
    let state = cell.state();
    if state.checked {
        return;
    }
    cell.set_state(SessionState { loading: true, ..state });

    // No cookie means nobody can be signed in; skip the round-trip.
    if token.is_none() {
        tracing::info!("No session cookie, skipping auth check");
        cell.set_state(SessionState::anonymous(true));
        return;
    }

    match gateway.fetch_current_user().await {
        Ok(user) => {
            tracing::info!("Signed in as {}", user.username);
            cell.set_state(SessionState::authenticated(user));
        }
        Err(err) => {
            if !matches!(err, WebError::Unauthorized) {
                tracing::error!("Auth check failed: {err}");
            }
            // The cookie is stale or invalid; ask the server to clear it and
            // fall back to anonymous whether or not that works.
            let _ = gateway.sign_out().await;
            cell.set_state(SessionState::anonymous(true));
        }
    }
}

/// Signs in and loads the new identity. A failure leaves the session as it
/// was and surfaces the error to the calling view.
pub async fn login<C, G>(cell: &C, gateway: &G, credentials: req::Login<'_>) -> WebResult<()>
where
    C: SessionCell,
    G: AuthGateway,
{
    let before = cell.state();
    cell.set_state(SessionState {
        loading: true,
        ..before.clone()
    });

    let attempt = async {
        gateway.sign_in(credentials).await?;
        gateway.fetch_current_user().await
    };
    match attempt.await {
        Ok(user) => {
            tracing::info!("Signed in as {}", user.username);
            cell.set_state(SessionState::authenticated(user));
            Ok(())
        }
        Err(err) => {
            cell.set_state(SessionState {
                loading: false,
                ..before
            });
            Err(err)
        }
    }
}

/// Signs out. Best-effort: the local session always ends up anonymous, and
/// the startup check becomes eligible to run again.
pub async fn logout<C, G>(cell: &C, gateway: &G)
where
    C: SessionCell,
    G: AuthGateway,
{
    let state = cell.state();
    cell.set_state(SessionState { loading: true, ..state });
    if let Err(err) = gateway.sign_out().await {
        tracing::warn!("Sign-out request failed: {err}");
    }
    cell.set_state(SessionState::anonymous(false));
}

/// Handle to the session cell, provided as context at app start and handed
/// to whichever views need it.
#[derive(Clone, Copy)]
pub struct Session {
    state: RwSignal<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(SessionState::initial()),
        }
    }

    /// The signed-in user's details, if any.
    pub fn user(&self) -> Option<res::UserDetails> {
        self.state.with(|s| s.user.clone())
    }

    /// `Some(true)`/`Some(false)` once the startup check has settled, `None`
    /// while it is still pending.
    pub fn logged_in(&self) -> Option<bool> {
        self.state.with(|s| s.checked.then_some(s.user.is_some()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(|s| s.user.is_some())
    }

    pub fn is_admin(&self) -> bool {
        self.state
            .with(|s| s.user.as_ref().is_some_and(|u| u.has_role(Role::Admin)))
    }

    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }

    /// Runs the startup auth check. Safe to trigger from multiple views;
    /// only the first call after app start (or after a logout) does anything.
    pub async fn check_auth_status(&self) {
        if cfg!(feature = "ssr") {
            return;
        }
        bootstrap(self, &get_client(), cookie::session_token()).await;
    }

    pub async fn login(&self, username: String, password: String) -> WebResult<()> {
        let credentials = req::Login {
            username: username.into(),
            password: password.into(),
        };
        login(self, &get_client(), credentials).await
    }

    pub async fn logout(&self) {
        logout(self, &get_client()).await;
    }

    /// Drops a session the server no longer recognizes, without the sign-out
    /// round-trip. Used when an API call comes back 401.
    pub fn expire(&self) {
        self.state.set(SessionState::anonymous(true));
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCell for Session {
    fn state(&self) -> SessionState {
        self.state.get_untracked()
    }

    fn set_state(&self, state: SessionState) {
        self.state.set(state);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};

    struct TestCell(RefCell<SessionState>);

    impl TestCell {
        fn new() -> Self {
            Self(RefCell::new(SessionState::initial()))
        }

        fn with_state(state: SessionState) -> Self {
            Self(RefCell::new(state))
        }
    }

    impl SessionCell for TestCell {
        fn state(&self) -> SessionState {
            self.0.borrow().clone()
        }

        fn set_state(&self, state: SessionState) {
            *self.0.borrow_mut() = state;
        }
    }

    /// Gateway with scripted responses. Calling an operation that has no
    /// scripted response fails the test.
    #[derive(Default)]
    struct MockGateway {
        sign_in: Option<WebResult<res::LoginAck>>,
        fetch: Option<WebResult<res::UserDetails>>,
        sign_out: Option<WebResult<()>>,
        sign_in_calls: Cell<usize>,
        fetch_calls: Cell<usize>,
        sign_out_calls: Cell<usize>,
    }

    impl AuthGateway for MockGateway {
        async fn sign_in(&self, _credentials: req::Login<'_>) -> WebResult<res::LoginAck> {
            self.sign_in_calls.set(self.sign_in_calls.get() + 1);
            self.sign_in.clone().expect("unexpected sign_in call")
        }

        async fn fetch_current_user(&self) -> WebResult<res::UserDetails> {
            self.fetch_calls.set(self.fetch_calls.get() + 1);
            self.fetch.clone().expect("unexpected fetch_current_user call")
        }

        async fn sign_out(&self) -> WebResult<()> {
            self.sign_out_calls.set(self.sign_out_calls.get() + 1);
            self.sign_out.clone().expect("unexpected sign_out call")
        }
    }

    fn alice() -> res::UserDetails {
        res::UserDetails {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            roles: vec!["ADMIN".to_string()],
        }
    }

    fn ack() -> res::LoginAck {
        res::LoginAck {
            username: "alice".to_string(),
            message: "Login successful".to_string(),
        }
    }

    #[test]
    fn mount_without_cookie_skips_the_network() {
        let cell = TestCell::new();
        let gateway = MockGateway::default();

        block_on(bootstrap(&cell, &gateway, None));

        assert_eq!(cell.state(), SessionState::anonymous(true));
        assert_eq!(gateway.fetch_calls.get(), 0);
        assert_eq!(gateway.sign_out_calls.get(), 0);
    }

    #[test]
    fn mount_with_valid_cookie_loads_the_user() {
        let cell = TestCell::new();
        let gateway = MockGateway {
            fetch: Some(Ok(alice())),
            ..Default::default()
        };

        block_on(bootstrap(&cell, &gateway, Some("token".to_string())));

        let state = cell.state();
        assert_eq!(state.user, Some(alice()));
        assert!(state.checked);
        assert!(!state.loading);
    }

    #[test]
    fn mount_with_stale_cookie_signs_out_best_effort() {
        let cell = TestCell::new();
        let gateway = MockGateway {
            fetch: Some(Err(WebError::Unauthorized)),
            // the cleanup call itself failing must not change the outcome
            sign_out: Some(Err(WebError::network("connection reset"))),
            ..Default::default()
        };

        block_on(bootstrap(&cell, &gateway, Some("stale".to_string())));

        assert_eq!(cell.state(), SessionState::anonymous(true));
        assert_eq!(gateway.sign_out_calls.get(), 1);
    }

    #[test]
    fn mount_degrades_to_anonymous_when_the_server_is_unreachable() {
        let cell = TestCell::new();
        let gateway = MockGateway {
            fetch: Some(Err(WebError::network("timed out"))),
            sign_out: Some(Ok(())),
            ..Default::default()
        };

        block_on(bootstrap(&cell, &gateway, Some("token".to_string())));

        assert_eq!(cell.state(), SessionState::anonymous(true));
    }

    #[test]
    fn repeated_checks_do_not_hit_the_network() {
        let cell = TestCell::new();
        let gateway = MockGateway {
            fetch: Some(Ok(alice())),
            ..Default::default()
        };

        block_on(bootstrap(&cell, &gateway, Some("token".to_string())));
        let settled = cell.state();
        block_on(bootstrap(&cell, &gateway, Some("token".to_string())));

        assert_eq!(gateway.fetch_calls.get(), 1);
        assert_eq!(cell.state(), settled);
    }

    #[test]
    fn failed_login_keeps_the_prior_state() {
        let cell = TestCell::with_state(SessionState::anonymous(true));
        let gateway = MockGateway {
            sign_in: Some(Err(WebError::InvalidCredentials(
                "Invalid username or password".to_string(),
            ))),
            ..Default::default()
        };

        let credentials = req::Login {
            username: "bob".into(),
            password: "bad".into(),
        };
        let result = block_on(login(&cell, &gateway, credentials));

        assert_eq!(
            result,
            Err(WebError::InvalidCredentials(
                "Invalid username or password".to_string()
            ))
        );
        assert_eq!(cell.state(), SessionState::anonymous(true));
        assert_eq!(gateway.fetch_calls.get(), 0);
    }

    #[test]
    fn login_loads_the_user_without_a_separate_mount() {
        let cell = TestCell::new();
        let gateway = MockGateway {
            sign_in: Some(Ok(ack())),
            fetch: Some(Ok(alice())),
            ..Default::default()
        };

        let credentials = req::Login {
            username: "alice".into(),
            password: "good".into(),
        };
        block_on(login(&cell, &gateway, credentials)).unwrap();

        let state = cell.state();
        assert_eq!(state.user, Some(alice()));
        assert!(state.checked);
        assert!(!state.loading);
        // a later bootstrap trigger is now a no-op
        block_on(bootstrap(&cell, &gateway, Some("token".to_string())));
        assert_eq!(gateway.fetch_calls.get(), 1);
    }

    #[test]
    fn login_restores_state_when_the_user_fetch_fails() {
        let cell = TestCell::with_state(SessionState::anonymous(true));
        let gateway = MockGateway {
            sign_in: Some(Ok(ack())),
            fetch: Some(Err(WebError::network("timed out"))),
            ..Default::default()
        };

        let credentials = req::Login {
            username: "alice".into(),
            password: "good".into(),
        };
        let result = block_on(login(&cell, &gateway, credentials));

        assert!(matches!(result, Err(WebError::Network(_))));
        assert_eq!(cell.state(), SessionState::anonymous(true));
    }

    #[test]
    fn logout_always_ends_anonymous() {
        let cell = TestCell::with_state(SessionState::authenticated(alice()));
        let gateway = MockGateway {
            sign_out: Some(Err(WebError::network("connection reset"))),
            ..Default::default()
        };

        block_on(logout(&cell, &gateway));

        assert_eq!(cell.state(), SessionState::anonymous(false));
    }

    #[test]
    fn logout_makes_the_startup_check_eligible_again() {
        let cell = TestCell::with_state(SessionState::authenticated(alice()));
        let gateway = MockGateway {
            sign_out: Some(Ok(())),
            fetch: Some(Ok(alice())),
            ..Default::default()
        };

        block_on(logout(&cell, &gateway));
        assert!(!cell.state().checked);

        block_on(bootstrap(&cell, &gateway, Some("token".to_string())));
        assert_eq!(gateway.fetch_calls.get(), 1);
        assert_eq!(cell.state(), SessionState::authenticated(alice()));
    }
}
