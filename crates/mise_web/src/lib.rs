#![allow(clippy::unit_arg)]
#![recursion_limit = "256"]

pub mod components;
pub mod context;
pub mod cookie;
pub mod error;
pub mod pages;
pub mod utils;

use components::*;
use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{components::*, ParamSegment, StaticSegment};
use pages::*;

/// Wraps the content in a basic layout and a final fallback error boundary which should never actually trigger
#[component]
pub fn App() -> impl IntoView {
    tracing::info!("Rendering app");

    context::initialise_context();
    leptos_meta::provide_meta_context();

    let fallback = move |errors: ArcRwSignal<Errors>| {
        errors
            .get_untracked()
            .into_iter()
            .map(|(_key, err)| {
                view! { <div>{format!("Unhandled error: {err}")}</div>}
            })
            .collect_view()
    };

    view! {
            <Stylesheet id="mise" href="/pkg/mise.css"/>
            <Meta name="description" content="Mise is an operations console for restaurant teams"/>
            <Title text="Mise"/>
            <div class="is-flex is-flex-direction-column" style="min-height: 100vh">
                <div class="section is-flex is-flex-grow-1">
                    <div class="container">
                        <ErrorBoundary fallback>
                            <Content/>
                        </ErrorBoundary>
                    </div>
                </div>
                <footer class="footer">
                    <div class="container">
                        "Mise operations console"
                    </div>
                </footer>
            </div>
    }
}

/// Contains the navbar and router
#[component]
pub fn Content() -> impl IntoView {
    view! {
        <Router>
            <Navbar/>
            <main>
                <h1 class="title">"Mise"</h1>
                <FlatRoutes fallback=|| "Page not found.">
                    <Route
                        path=StaticSegment("/")
                        view=Home
                    />
                    <Route
                        path=StaticSegment("login")
                        view=Login
                    />
                    <Route
                        path=StaticSegment("staff")
                        view=Staff
                    />
                    <Route
                        path=(StaticSegment("staff"), ParamSegment("user_id"))
                        view=StaffDetail
                    />
                    <Route
                        path=StaticSegment("stores")
                        view=Stores
                    />
                    <Route
                        path=(StaticSegment("stores"), ParamSegment("store_id"))
                        view=StoreDetail
                    />
                    <Route
                        path=StaticSegment("schedule")
                        view=Schedule
                    />
                    <Route
                        path=StaticSegment("analytics")
                        view=Analytics
                    />
                </FlatRoutes>
            </main>
        </Router>
    }
}
