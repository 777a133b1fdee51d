//! Client context for talking to the server API.

use crate::{
    context::{get_session, session::AuthGateway},
    error::{WebError, WebResult},
};
use mise_api::{request as req, response as res};
use reqwasm::http::Response;
use web_sys::RequestCredentials;

#[derive(Debug, Clone, Copy)]
pub struct Client;

impl Client {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-API methods
impl Client {
    async fn assert_success(&self, res: &Response) -> WebResult<()> {
        match res.status() {
            100..=399 => Ok(()),
            401 | 403 => {
                tracing::warn!("Server rejected the session");
                // reflect the server's verdict locally
                if !cfg!(feature = "ssr") {
                    get_session().expire();
                }
                Err(WebError::Unauthorized)
            }
            code => {
                let message = error_message(res).await;
                Err(WebError::new(format!("Request failed: HTTP {code} {message}")))
            }
        }
    }
}

/// Auth gateway methods
impl AuthGateway for Client {
    async fn sign_in(&self, credentials: req::Login<'_>) -> WebResult<res::LoginAck> {
        tracing::info!("Signing in as {}", credentials.username);

        let json = serde_json::to_string(&credentials).map_err(WebError::from)?;
        let res = reqwasm::http::Request::post("/api/auth/login")
            .credentials(RequestCredentials::Include)
            .body(json)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(WebError::network)?;
        match res.status() {
            100..=399 => {}
            400 | 401 | 403 => {
                return Err(WebError::InvalidCredentials(error_message(&res).await));
            }
            code => {
                let message = error_message(&res).await;
                return Err(WebError::new(format!(
                    "Request failed: HTTP {code} {message}"
                )));
            }
        }
        let ack = res.json().await.map_err(WebError::network)?;

        tracing::info!("Signed in");
        Ok(ack)
    }

    async fn fetch_current_user(&self) -> WebResult<res::UserDetails> {
        tracing::info!("Fetching current user");

        let res = reqwasm::http::Request::get("/api/auth/current")
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let user = res.json().await.map_err(WebError::network)?;

        Ok(user)
    }

    async fn sign_out(&self) -> WebResult<()> {
        tracing::info!("Signing out");

        let res = reqwasm::http::Request::post("/api/auth/logout")
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;

        tracing::info!("Signed out");
        Ok(())
    }
}

/// API methods
impl Client {
    pub async fn get_users(&self) -> WebResult<Vec<res::User>> {
        tracing::info!("Fetching users");

        let res = reqwasm::http::Request::get("/api/admin/users")
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let users = res.json().await.map_err(WebError::network)?;

        Ok(users)
    }

    pub async fn get_user(&self, id: i32) -> WebResult<res::User> {
        tracing::info!("Fetching user {id}");

        let res = reqwasm::http::Request::get(&format!("/api/admin/users/{id}"))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let user = res.json().await.map_err(WebError::network)?;

        Ok(user)
    }

    pub async fn create_user(&self, create: &req::CreateUser<'_>) -> WebResult<res::User> {
        tracing::info!("Creating user {}", create.username);

        let json = serde_json::to_string(create).map_err(WebError::from)?;
        let res = reqwasm::http::Request::post("/api/admin/users")
            .credentials(RequestCredentials::Include)
            .body(json)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let user: res::User = res.json().await.map_err(WebError::network)?;

        tracing::info!("Created user {}", user.id);
        Ok(user)
    }

    pub async fn update_user(&self, id: i32, update: &req::UpdateUser<'_>) -> WebResult<res::User> {
        tracing::info!("Updating user {id}");

        let json = serde_json::to_string(update).map_err(WebError::from)?;
        let res = reqwasm::http::Request::put(&format!("/api/admin/users/{id}"))
            .credentials(RequestCredentials::Include)
            .body(json)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let user = res.json().await.map_err(WebError::network)?;

        tracing::info!("Updated user {id}");
        Ok(user)
    }

    pub async fn change_password(
        &self,
        id: i32,
        change: &req::ChangePassword<'_>,
    ) -> WebResult<()> {
        tracing::info!("Changing password for user {id}");

        let json = serde_json::to_string(change).map_err(WebError::from)?;
        let res = reqwasm::http::Request::put(&format!("/api/admin/users/{id}/password"))
            .credentials(RequestCredentials::Include)
            .body(json)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;

        tracing::info!("Changed password for user {id}");
        Ok(())
    }

    pub async fn delete_user(&self, id: i32) -> WebResult<()> {
        tracing::info!("Deleting user {id}");

        let res = reqwasm::http::Request::delete(&format!("/api/admin/users/{id}"))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;

        tracing::info!("Deleted user {id}");
        Ok(())
    }

    pub async fn get_stores(&self) -> WebResult<Vec<res::Store>> {
        tracing::info!("Fetching stores");

        let res = reqwasm::http::Request::get("/api/admin/stores")
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let stores = res.json().await.map_err(WebError::network)?;

        Ok(stores)
    }

    pub async fn get_store(&self, id: i32) -> WebResult<res::Store> {
        tracing::info!("Fetching store {id}");

        let res = reqwasm::http::Request::get(&format!("/api/admin/stores/{id}"))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let store = res.json().await.map_err(WebError::network)?;

        Ok(store)
    }

    pub async fn create_store(&self, create: &req::NewStore<'_>) -> WebResult<res::Store> {
        tracing::info!("Creating store {}", create.name);

        let json = serde_json::to_string(create).map_err(WebError::from)?;
        let res = reqwasm::http::Request::post("/api/admin/stores")
            .credentials(RequestCredentials::Include)
            .body(json)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let store: res::Store = res.json().await.map_err(WebError::network)?;

        tracing::info!("Created store {}", store.id);
        Ok(store)
    }

    pub async fn update_store(
        &self,
        id: i32,
        update: &req::UpdateStore<'_>,
    ) -> WebResult<res::Store> {
        tracing::info!("Updating store {id}");

        let json = serde_json::to_string(update).map_err(WebError::from)?;
        let res = reqwasm::http::Request::put(&format!("/api/admin/stores/{id}"))
            .credentials(RequestCredentials::Include)
            .body(json)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let store = res.json().await.map_err(WebError::network)?;

        tracing::info!("Updated store {id}");
        Ok(store)
    }

    pub async fn delete_store(&self, id: i32) -> WebResult<()> {
        tracing::info!("Deleting store {id}");

        let res = reqwasm::http::Request::delete(&format!("/api/admin/stores/{id}"))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;

        tracing::info!("Deleted store {id}");
        Ok(())
    }

    pub async fn get_store_users(&self, id: i32) -> WebResult<Vec<res::User>> {
        tracing::info!("Fetching users for store {id}");

        let res = reqwasm::http::Request::get(&format!("/api/admin/stores/{id}/users"))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let users = res.json().await.map_err(WebError::network)?;

        Ok(users)
    }

    pub async fn get_shifts(&self) -> WebResult<Vec<res::Shift>> {
        tracing::info!("Fetching shifts");

        let res = reqwasm::http::Request::get("/api/shifts")
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let shifts = res.json().await.map_err(WebError::network)?;

        Ok(shifts)
    }

    pub async fn create_shift(&self, create: &req::NewShift<'_>) -> WebResult<res::Shift> {
        tracing::info!("Creating shift for user {}", create.user_id);

        let json = serde_json::to_string(create).map_err(WebError::from)?;
        let res = reqwasm::http::Request::post("/api/shifts")
            .credentials(RequestCredentials::Include)
            .body(json)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let shift: res::Shift = res.json().await.map_err(WebError::network)?;

        tracing::info!("Created shift {}", shift.id);
        Ok(shift)
    }

    pub async fn update_shift(
        &self,
        id: i32,
        update: &req::UpdateShift<'_>,
    ) -> WebResult<res::Shift> {
        tracing::info!("Updating shift {id}");

        let json = serde_json::to_string(update).map_err(WebError::from)?;
        let res = reqwasm::http::Request::put(&format!("/api/shifts/{id}"))
            .credentials(RequestCredentials::Include)
            .body(json)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;
        let shift = res.json().await.map_err(WebError::network)?;

        tracing::info!("Updated shift {id}");
        Ok(shift)
    }

    pub async fn delete_shift(&self, id: i32) -> WebResult<()> {
        tracing::info!("Deleting shift {id}");

        let res = reqwasm::http::Request::delete(&format!("/api/shifts/{id}"))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::network)?;
        self.assert_success(&res).await?;

        tracing::info!("Deleted shift {id}");
        Ok(())
    }
}

async fn error_message(res: &Response) -> String {
    let bytes = res.binary().await.unwrap_or_default();
    match serde_json::from_slice::<res::Error>(&bytes) {
        Ok(error) => error.message,
        Err(_) => String::from_utf8_lossy(bytes.as_slice()).into_owned(),
    }
}
