//! Web server for the Mise restaurant operations console.

use eyre::WrapErr;
use std::{env, net::SocketAddr};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let server_url = env::var("SERVER_URL")
        .wrap_err("Missing SERVER_URL")?
        .parse::<SocketAddr>()
        .wrap_err("Invalid SERVER_URL")?;
    let database_url = env::var("DATABASE_URL").wrap_err("Missing DATABASE_URL")?;
    let private_cookie_password =
        env::var("PRIVATE_COOKIE_PASSWORD").wrap_err("Missing PRIVATE_COOKIE_PASSWORD")?;

    let router = mise_server::router_from_vars(&database_url, &private_cookie_password)
        .await
        .wrap_err("Failed to build router")?;

    tracing::info!("Starting server at {server_url}");
    let listener = TcpListener::bind(server_url)
        .await
        .wrap_err("Failed to bind to address")?;
    axum::serve(listener, router.into_make_service())
        .await
        .wrap_err("Failed to start server")?;
    Ok(())
}
