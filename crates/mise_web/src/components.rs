//! Custom components.

use crate::{
    context::get_session,
    error::WebResult,
    utils,
};
use leptos::prelude::*;
use leptos_router::components::*;
use mise_api::response as res;
use send_wrapper::SendWrapper;

#[component]
pub fn Navbar() -> impl IntoView {
    let logout_action = Action::new(move |()| {
        let session = get_session();
        async move {
            SendWrapper::new(session.logout()).await;
            WebResult::Ok(true)
        }
    });

    let navbar_links = move || {
        let session = get_session();
        let view = if session.logged_in()? {
            let username = session.user().map(|u| u.username).unwrap_or_default();
            let admin_links = session.is_admin().then(|| {
                view! {
                    <A exact=true href="/staff">"Staff"</A>
                    <A exact=true href="/stores">"Stores"</A>
                }
            });
            view! {
                {admin_links}
                <A exact=true href="/schedule">"Schedule"</A>
                <A exact=true href="/analytics">"Analytics"</A>
                <span class="is-flex is-flex-grow-1"></span>
                <span class="p-3">{username}</span>
                <button class="button is-link p-3" on:click=move |_ev| { logout_action.dispatch(()); }>"Sign out"</button>
            }
            .into_any()
        } else {
            view! {
                <span class="is-flex is-flex-grow-1"></span>
                <A exact=true href="/login">"Sign in"</A>
            }
            .into_any()
        };
        Some(view)
    };

    view! {
        <nav class="navbar is-flex is-vcentered">
            <A exact=true href="/">"Home"</A>
            {navbar_links}
        </nav>
        <ErrorBoundary fallback={utils::errors_fallback}>
            <Suspense fallback={move || ().into_view()}>
                {move || logout_action.value().get().map(|o| o.unwrap_or_default()).unwrap_or_default().then(|| {
                    view! { <Redirect path="/login" /> }
                })}
            </Suspense>
        </ErrorBoundary>
    }
}

#[component]
pub fn LoginGuard(children: ChildrenFn, require_login: bool) -> impl IntoView {
    let logged_in = move || get_session().logged_in();
    let pass = Memo::new(move |passed| {
        if passed.copied().flatten().unwrap_or_default()
            || logged_in().map(|li| li == require_login)?
        {
            Some(true)
        } else {
            Some(false)
        }
    });

    move || {
        let view = if pass.get()? {
            children().into_any()
        } else {
            let redirect = if require_login {
                let url = leptos_router::hooks::use_url().get();
                let redirect = url.path();
                format!("/login?redirect={redirect}")
            } else {
                "/".to_string()
            };
            tracing::info!("Redirecting to {redirect}");
            view! { <Redirect path=redirect /> }.into_any()
        };
        Some(view)
    }
}

#[component]
pub fn ResourceView<T, F, V>(resource: Resource<WebResult<Option<T>>>, view: F) -> impl IntoView
where
    T: Clone + 'static + Send + Sync,
    F: Fn(Option<T>) -> V + Copy + 'static + Send + Sync,
    V: IntoView + 'static,
{
    let resource_view = move || match resource.get() {
        Some(Ok(Some(res))) => Ok(Some(view(Some(res)).into_view())),
        Some(Ok(None)) => Ok(None),
        Some(Err(err)) => Err(err),
        None => Ok(Some(view(None).into_view())),
    };
    let wrapped_view = view! {
        <Suspense fallback={move || view(None)}>
            <ErrorBoundary fallback={utils::errors_fallback}>
                {resource_view}
            </ErrorBoundary>
        </Suspense>
    };
    WebResult::Ok(wrapped_view)
}

#[component]
pub fn ActionView<T, V>(action: Action<T, WebResult<V>>) -> impl IntoView
where
    T: 'static + Send + Sync,
    V: IntoView + Clone + 'static + Send + Sync,
{
    view! {
        <ErrorBoundary fallback={utils::errors_fallback}>
            <div>
                {move || action.value().get()}
            </div>
        </ErrorBoundary>
    }
}

#[component]
pub fn UserTable(users: Vec<res::User>) -> impl IntoView {
    let rows = users
        .into_iter()
        .map(|user| {
            let href = format!("/staff/{}", user.id);
            let roles = user.roles.join(", ");
            let store = user
                .store
                .map(|s| s.name)
                .unwrap_or_else(|| "-".to_string());
            view! {
                <tr>
                    <td><A href>{user.username}</A></td>
                    <td>{user.email}</td>
                    <td>{roles}</td>
                    <td>{store}</td>
                </tr>
            }
        })
        .collect_view();
    view! {
        <table class="table is-fullwidth">
            <thead>
                <tr>
                    <th>"Username"</th>
                    <th>"Email"</th>
                    <th>"Roles"</th>
                    <th>"Store"</th>
                </tr>
            </thead>
            <tbody>
                {rows}
            </tbody>
        </table>
    }
}

#[component]
pub fn StoreTable(stores: Vec<res::Store>) -> impl IntoView {
    let rows = stores
        .into_iter()
        .map(|store| {
            let href = format!("/stores/{}", store.id);
            let coordinates = format!("{:.4}, {:.4}", store.latitude, store.longitude);
            view! {
                <tr>
                    <td><A href>{store.name}</A></td>
                    <td>{coordinates}</td>
                </tr>
            }
        })
        .collect_view();
    view! {
        <table class="table is-fullwidth">
            <thead>
                <tr>
                    <th>"Name"</th>
                    <th>"Coordinates"</th>
                </tr>
            </thead>
            <tbody>
                {rows}
            </tbody>
        </table>
    }
}
