pub mod client;
pub mod session;

use self::{client::Client, session::Session};
use leptos::prelude::*;

pub fn initialise_context() {
    tracing::trace!("initialising context");

    leptos_meta::provide_meta_context();
    let session = Session::new();
    leptos::context::provide_context(session);
    leptos::context::provide_context(Client::new());

    if !cfg!(feature = "ssr") {
        // one-time startup auth check; repeat triggers are no-ops
        leptos::task::spawn_local(async move { session.check_auth_status().await });
    }
}

pub fn get_client() -> Client {
    Client::new()
}

pub fn get_session() -> Session {
    if cfg!(feature = "ssr") {
        // returning a "dummy" session within the server
        Session::new()
    } else {
        let owner = Owner::current().unwrap();
        owner.with(move || leptos::prelude::expect_context::<Session>())
    }
}
