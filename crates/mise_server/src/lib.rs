//! Web server for the Mise restaurant operations console.

pub mod authentication;
pub mod error;
pub mod handlers;
pub mod queries;
pub mod schema;
pub mod utils;

use authentication::{Expiration, SessionCache};
use axum::{
    extract::FromRef,
    routing::{get, post, put},
    Router,
};
use diesel::{
    prelude::*,
    r2d2::{ConnectionManager, Pool},
};
use eyre::WrapErr;
use handlers::{auth, shifts, stores, users};
use leptos::prelude::*;
use leptos_axum::LeptosRoutes;
use leptos_meta::*;
use mise_web::App;
use moka::future::Cache;
use std::{fmt::Debug, ops::Deref, sync::Arc, time::Duration};
use tower_cookies::{CookieManagerLayer, Key};
use tower_http::trace::TraceLayer;

pub type MisePool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct MiseState(Arc<MiseStateCore>);

impl Deref for MiseState {
    type Target = MiseStateCore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Debug for MiseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mise")
    }
}

pub struct MiseStateCore {
    pub pool: MisePool,
    pub private_cookie_key: Key,
    pub sessions: SessionCache,
    pub leptos_options: LeptosOptions,
}

impl FromRef<MiseState> for LeptosOptions {
    fn from_ref(input: &MiseState) -> Self {
        input.leptos_options.clone()
    }
}

pub async fn router(state: MiseState) -> Router<()> {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .nest(
                    "/auth",
                    Router::new()
                        .route("/login", post(auth::login))
                        .route("/current", get(auth::current))
                        .route("/logout", post(auth::logout)),
                )
                .nest(
                    "/admin/users",
                    Router::new()
                        .route("/", get(users::get_all).post(users::insert))
                        .nest(
                            "/{id}",
                            Router::new()
                                .route(
                                    "/",
                                    get(users::get_one)
                                        .put(users::update)
                                        .delete(users::delete),
                                )
                                .route("/password", put(users::change_password)),
                        ),
                )
                .nest(
                    "/admin/stores",
                    Router::new()
                        .route("/", get(stores::get_all).post(stores::insert))
                        .nest(
                            "/{id}",
                            Router::new()
                                .route(
                                    "/",
                                    get(stores::get_one)
                                        .put(stores::update)
                                        .delete(stores::delete),
                                )
                                .route("/users", get(stores::store_users)),
                        ),
                )
                .nest(
                    "/shifts",
                    Router::new()
                        .route("/", get(shifts::get_all).post(shifts::insert))
                        .route("/{id}", put(shifts::update).delete(shifts::delete)),
                )
                .layer(CookieManagerLayer::new())
                .layer(TraceLayer::new_for_http()),
        )
        .leptos_routes(
            &state,
            leptos_axum::generate_route_list(|| {
                tracing::info!("Generating route list");
                view! { <App/> }
            }),
            {
                tracing::info!("Running app");
                let leptos_options = state.leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler::<MiseState, _>(shell))
        .with_state(state)
}

pub fn shell(options: LeptosOptions) -> impl IntoView {
    tracing::info!("Running shell");
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

pub async fn router_from_vars(
    database_url: &str,
    private_cookie_password: &str,
) -> eyre::Result<Router<()>> {
    // conservative pool config aimed at not using the database too much
    let pool = Pool::builder()
        .min_idle(Some(0))
        .idle_timeout(Some(Duration::from_secs(30)))
        .build(ConnectionManager::new(database_url))
        .wrap_err_with(|| format!("Failed to connect to the database at {database_url}"))?;

    let private_cookie_key = Key::from(private_cookie_password.as_bytes());
    let sessions = Cache::builder()
        .max_capacity(100_000)
        .expire_after(Expiration::new(4))
        .build();
    let leptos_options = leptos::prelude::get_configuration(None)
        .wrap_err("Failed to read the leptos configuration")?
        .leptos_options;

    let state = MiseState(Arc::new(MiseStateCore {
        pool,
        private_cookie_key,
        sessions,
        leptos_options,
    }));
    let router = self::router(state).await;
    Ok(router)
}
