//! Top level pages.

use crate::{
    components::*,
    context::{get_client, get_session},
    error::{WebError, WebResult},
    utils,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use leptos::{
    html::{Input, Select},
    leptos_dom::helpers::TimeoutHandle,
    prelude::*,
};
use leptos_router::{components::*, params::Params};
use mise_api::{request as req, response as res};
use mise_core::{Role, ShiftWindow};
use send_wrapper::SendWrapper;
use std::{collections::BTreeMap, time::Duration};

const ROLES: [Role; 3] = [Role::Staff, Role::Manager, Role::Admin];

#[component]
pub fn Home() -> impl IntoView {
    tracing::info!("Rendering Home");

    let welcome = move || {
        get_session()
            .user()
            .map(|u| format!("Welcome, {}", u.username))
    };

    view! {
        <LoginGuard require_login=true>
            <h2 class="subtitle">{welcome}</h2>
            <div class="columns">
                <div class="column">
                    <div class="box">
                        <h3 class="subtitle is-6 has-text-weight-bold">"Staff"</h3>
                        <p class="block">"Accounts, roles and store assignments"</p>
                        <A href="/staff">"Manage staff"</A>
                    </div>
                </div>
                <div class="column">
                    <div class="box">
                        <h3 class="subtitle is-6 has-text-weight-bold">"Stores"</h3>
                        <p class="block">"Locations and their coordinates"</p>
                        <A href="/stores">"Manage stores"</A>
                    </div>
                </div>
                <div class="column">
                    <div class="box">
                        <h3 class="subtitle is-6 has-text-weight-bold">"Schedule"</h3>
                        <p class="block">"Shifts for the week"</p>
                        <A href="/schedule">"Manage schedule"</A>
                    </div>
                </div>
                <div class="column">
                    <div class="box">
                        <h3 class="subtitle is-6 has-text-weight-bold">"Analytics"</h3>
                        <p class="block">"Reports across the platform"</p>
                        <A href="/analytics">"View analytics"</A>
                    </div>
                </div>
            </div>
        </LoginGuard>
    }
}

#[component]
pub fn Login() -> impl IntoView {
    tracing::info!("Rendering Login");

    let redirect = move || {
        leptos_router::hooks::use_query_map()
            .get()
            .get("redirect")
            .unwrap_or_else(|| "/".to_string())
    };

    // form
    let username_ref = NodeRef::<Input>::new();
    let password_ref = NodeRef::<Input>::new();
    let submission_act = Action::new(move |&()| {
        tracing::info!("Signing in");
        let username = username_ref
            .get()
            .expect("failed to get username_ref")
            .value();
        let password = password_ref
            .get()
            .expect("failed to get password_ref")
            .value();
        let session = get_session();
        async move {
            if username.is_empty() {
                return Err(WebError::new("Username cannot be empty"));
            }
            if password.is_empty() {
                return Err(WebError::new("Password cannot be empty"));
            }
            SendWrapper::new(session.login(username, password)).await?;
            let view = move || view! { <Redirect path=redirect() /> };
            WebResult::Ok(view)
        }
    });

    let password_visible = RwSignal::new(false);
    let password_visibility_toggle = move || {
        if password_visible.get() {
            view! { <button class="button" on:click=move |_ev| password_visible.set(false)>"Hide password"</button> }.into_any()
        } else {
            view! { <button class="button" on:click=move |_ev| password_visible.set(true)>"Show password"</button> }.into_any()
        }
    };
    let password_input_type = move || {
        if password_visible.get() {
            "text"
        } else {
            "password"
        }
    };

    Effect::new(move |_| {
        if let Some(username_ref) = username_ref.get() {
            username_ref.focus().expect("failed to get username_ref");
        }
    });

    view! {
        <LoginGuard require_login=false>
            <h2 class="subtitle">"Sign in"</h2>
            <form>
                <label class="label">
                    "Username"
                    <input class="input" node_ref=username_ref/>
                </label>
                <label class="label">
                    "Password"
                    <input class="input" type=password_input_type node_ref=password_ref/>
                </label>
                <button class="button mr-2" type="submit" on:click={move |ev| {
                    ev.prevent_default();
                    submission_act.dispatch(());
                }}>
                    "Sign in"
                </button>
                {password_visibility_toggle}
            </form>
            <ActionView action=submission_act/>
        </LoginGuard>
    }
}

#[component]
pub fn Staff() -> impl IntoView {
    tracing::info!("Rendering Staff");

    // resources
    let users_res = utils::logged_in_resource!(get_users());
    let stores_res = utils::logged_in_resource!(get_stores());

    // create form
    let username_ref = NodeRef::<Input>::new();
    let email_ref = NodeRef::<Input>::new();
    let password_ref = NodeRef::<Input>::new();
    let role_ref = NodeRef::<Select>::new();
    let store_ref = NodeRef::<Select>::new();
    let create_act = Action::new(move |&()| {
        let username = username_ref
            .get()
            .expect("failed to get username_ref")
            .value();
        let email = email_ref.get().expect("failed to get email_ref").value();
        let password = password_ref
            .get()
            .expect("failed to get password_ref")
            .value();
        let role = role_ref.get().expect("failed to get role_ref").value();
        let store = store_ref.get().expect("failed to get store_ref").value();
        let client = get_client();
        async move {
            if username.is_empty() {
                return Err(WebError::new("Username cannot be empty"));
            }
            if email.is_empty() {
                return Err(WebError::new("Email cannot be empty"));
            }
            if password.is_empty() {
                return Err(WebError::new("Password cannot be empty"));
            }
            let store_id = if store.is_empty() {
                None
            } else {
                Some(store.parse::<i32>().map_err(WebError::from)?)
            };
            let create = req::CreateUser {
                username: username.into(),
                email: email.into(),
                password: password.into(),
                role: role.into(),
                store_id,
            };
            let user = SendWrapper::new(client.create_user(&create)).await?;
            WebResult::Ok(view! { <Redirect path=format!("/staff/{}", user.id) /> })
        }
    });

    // users
    let users_content = move |users: Vec<res::User>| {
        view! {
            <div class="block">
                <UserTable users/>
            </div>
        }
        .into_any()
    };
    let users_view = move |users: Option<_>| {
        view! {
            <h3 class="subtitle is-6 has-text-weight-bold">"Accounts"</h3>
            {match users {
                Some(users) => users_content(users).into_any(),
                None => utils::loading_fallback("Loading staff...").into_any(),
            }}
        }
        .into_any()
    };

    // create form, needs the store list for the assignment dropdown
    let create_form = move |stores: Vec<res::Store>| {
        let store_options = stores
            .into_iter()
            .map(|s| view! { <option value=s.id.to_string()>{s.name}</option> })
            .collect_view();
        let role_options = ROLES
            .into_iter()
            .map(|r| view! { <option value=r.as_str()>{r.as_str()}</option> })
            .collect_view();
        view! {
            <form>
                <label class="label">
                    "Username"
                    <input class="input" node_ref=username_ref type="text"/>
                </label>
                <label class="label">
                    "Email"
                    <input class="input" node_ref=email_ref type="text"/>
                </label>
                <label class="label">
                    "Password"
                    <input class="input" node_ref=password_ref type="password"/>
                </label>
                <label class="label">
                    "Role"
                    <select class="select" node_ref=role_ref>
                        {role_options}
                    </select>
                </label>
                <label class="label">
                    "Store"
                    <select class="select" node_ref=store_ref>
                        <option value="">"No store"</option>
                        {store_options}
                    </select>
                </label>
                <div class="block">
                    <button class="button" type="submit" on:click=move |ev| {
                        ev.prevent_default();
                        create_act.dispatch(());
                    }>
                        "Create account"
                    </button>
                    <ActionView action=create_act/>
                </div>
            </form>
        }
        .into_any()
    };
    let create_view = move |stores: Option<Vec<res::Store>>| {
        view! {
            <h3 class="subtitle is-6 has-text-weight-bold">"New account"</h3>
            {match stores {
                Some(stores) => create_form(stores).into_any(),
                None => utils::loading_fallback("Loading stores...").into_any(),
            }}
        }
        .into_any()
    };

    view! {
        <LoginGuard require_login=true>
            <h2 class="subtitle">"Staff"</h2>
            <div class="columns">
                <div class="column is-two-thirds">
                    <ResourceView resource=users_res view=users_view/>
                </div>
                <div class="column">
                    <ResourceView resource=stores_res view=create_view/>
                </div>
            </div>
        </LoginGuard>
    }
}

#[derive(Debug, Clone, PartialEq, Params)]
pub struct StaffParams {
    user_id: Option<i32>,
}
#[component]
pub fn StaffDetail() -> impl IntoView {
    let StaffParams { user_id } = utils::params()?;
    let user_id = user_id.expect("failed to get user_id");
    tracing::info!("Rendering StaffDetail {user_id}");

    // resources
    let user_res = utils::logged_in_resource(move |client| async move {
        SendWrapper::new(async move {
            let user = client.get_user(user_id).await?;
            let stores = client.get_stores().await?;
            WebResult::Ok((user, stores))
        })
        .await
    });

    // actions
    let username_ref = NodeRef::<Input>::new();
    let email_ref = NodeRef::<Input>::new();
    let role_ref = NodeRef::<Select>::new();
    let store_ref = NodeRef::<Select>::new();
    let (update_result_message, set_update_result_message) =
        signal((None::<&'static str>, None::<TimeoutHandle>));
    let update_act = Action::new(move |&()| {
        let username = username_ref
            .get()
            .expect("failed to get username_ref")
            .value();
        let email = email_ref.get().expect("failed to get email_ref").value();
        let role = role_ref.get().expect("failed to get role_ref").value();
        let store = store_ref.get().expect("failed to get store_ref").value();
        let client = get_client();
        async move {
            // an empty store selection clears the assignment
            let store_id = if store.is_empty() {
                Some(0)
            } else {
                Some(store.parse::<i32>().map_err(WebError::from)?)
            };
            let update = req::UpdateUser {
                username: (!username.is_empty()).then(|| username.into()),
                email: (!email.is_empty()).then(|| email.into()),
                role: (!role.is_empty()).then(|| role.into()),
                store_id,
            };
            SendWrapper::new(client.update_user(user_id, &update)).await?;
            if let Some(handle) = update_result_message.get_untracked().1 {
                handle.clear();
            }
            let handle = set_timeout_with_handle(
                move || {
                    set_update_result_message.set((None, None));
                },
                Duration::from_secs(4),
            )
            .ok();
            set_update_result_message.set((Some("Updated account!"), handle));
            WebResult::Ok(())
        }
    });
    let password_act = Action::new(move |&()| {
        let password = window()
            .prompt_with_message("New password for this account:")
            .map_err(WebError::from_js);
        let client = get_client();
        async move {
            let Some(password) = password? else {
                return WebResult::Ok(());
            };
            if password.is_empty() {
                return Err(WebError::new("Password cannot be empty"));
            }
            let change = req::ChangePassword {
                new_password: password.clone().into(),
                confirm_password: password.into(),
            };
            SendWrapper::new(client.change_password(user_id, &change)).await?;
            WebResult::Ok(())
        }
    });
    let delete_act = Action::new(move |&()| {
        let confirmed = window()
            .confirm_with_message("Are you sure you want to delete this account?")
            .map_err(WebError::from_js);
        let client = get_client();
        async move {
            let confirmed = confirmed?;
            let view = if confirmed {
                SendWrapper::new(client.delete_user(user_id)).await?;
                Some(view! { <Redirect path="/staff" /> })
            } else {
                None
            };
            WebResult::Ok(view)
        }
    });

    // user
    let user_content = move |(user, stores): (res::User, Vec<res::Store>)| {
        let assigned = user.store.as_ref().map(|s| s.id);
        let current_role = user
            .roles
            .first()
            .cloned()
            .unwrap_or_else(|| Role::Staff.as_str().to_string());
        let store_options = stores
            .into_iter()
            .map(|s| {
                let selected = assigned == Some(s.id);
                view! { <option value=s.id.to_string() selected=selected>{s.name}</option> }
            })
            .collect_view();
        let role_options = ROLES
            .into_iter()
            .map(|r| {
                let selected = current_role == r.as_str();
                view! { <option value=r.as_str() selected=selected>{r.as_str()}</option> }
            })
            .collect_view();
        view! {
            <h2 class="subtitle">{format!("Editing account {}", user.username)}</h2>
            <div class="block">
                <form>
                    <label class="label">
                        "Username"
                        <input class="input" type="text" value=user.username node_ref=username_ref/>
                    </label>
                    <label class="label">
                        "Email"
                        <input class="input" type="text" value=user.email node_ref=email_ref/>
                    </label>
                    <label class="label">
                        "Role"
                        <select class="select" node_ref=role_ref>
                            {role_options}
                        </select>
                    </label>
                    <label class="label">
                        "Store"
                        <select class="select" node_ref=store_ref>
                            <option value="" selected=assigned.is_none()>"No store"</option>
                            {store_options}
                        </select>
                    </label>
                    <button class="button" type="submit" on:click=move |ev| {
                        ev.prevent_default();
                        update_act.dispatch(());
                    }>
                        "Update account"
                    </button>
                    <ActionView action=update_act/>
                    {move || update_result_message.get().0}
                </form>
            </div>
            <div class="block">
                <button class="button" on:click=move |_ev| { password_act.dispatch(()); }>
                    "Reset password"
                </button>
                <ActionView action=password_act/>
            </div>
            <div class="block">
                <button class="button is-danger" on:click=move |_ev| { delete_act.dispatch(()); }>
                    "Delete account"
                </button>
                <ActionView action=delete_act/>
            </div>
        }
    };
    let user_view = move |data: Option<(res::User, Vec<res::Store>)>| match data {
        Some(data) => user_content(data).into_any(),
        None => utils::loading_fallback("Loading account...").into_any(),
    };

    let view = view! {
        <LoginGuard require_login=true>
            <ResourceView resource=user_res view=user_view />
        </LoginGuard>
    };
    WebResult::Ok(view)
}

#[component]
pub fn Stores() -> impl IntoView {
    tracing::info!("Rendering Stores");

    // resources
    let stores_res = utils::logged_in_resource!(get_stores());

    // create form
    let name_ref = NodeRef::<Input>::new();
    let latitude_ref = NodeRef::<Input>::new();
    let longitude_ref = NodeRef::<Input>::new();
    let create_act = Action::new(move |&()| {
        let name = name_ref.get().expect("failed to get name_ref").value();
        let latitude = latitude_ref
            .get()
            .expect("failed to get latitude_ref")
            .value();
        let longitude = longitude_ref
            .get()
            .expect("failed to get longitude_ref")
            .value();
        let client = get_client();
        async move {
            if name.is_empty() {
                return Err(WebError::new("Store name cannot be empty"));
            }
            let latitude = latitude
                .parse::<f64>()
                .map_err(|_| WebError::new("Latitude must be a number"))?;
            let longitude = longitude
                .parse::<f64>()
                .map_err(|_| WebError::new("Longitude must be a number"))?;
            if !mise_core::valid_coordinates(latitude, longitude) {
                return Err(WebError::new("Coordinates are out of range"));
            }
            let create = req::NewStore {
                name: name.into(),
                latitude,
                longitude,
            };
            let store = SendWrapper::new(client.create_store(&create)).await?;
            WebResult::Ok(view! { <Redirect path=format!("/stores/{}", store.id) /> })
        }
    });

    // stores
    let stores_content = move |stores: Vec<res::Store>| {
        view! {
            <div class="block">
                <StoreTable stores/>
            </div>
        }
        .into_any()
    };
    let stores_view = move |stores: Option<_>| {
        view! {
            <h3 class="subtitle is-6 has-text-weight-bold">"Locations"</h3>
            {match stores {
                Some(stores) => stores_content(stores).into_any(),
                None => utils::loading_fallback("Loading stores...").into_any(),
            }}
        }
        .into_any()
    };

    view! {
        <LoginGuard require_login=true>
            <h2 class="subtitle">"Stores"</h2>
            <div class="columns">
                <div class="column is-two-thirds">
                    <ResourceView resource=stores_res view=stores_view/>
                </div>
                <div class="column">
                    <h3 class="subtitle is-6 has-text-weight-bold">"New store"</h3>
                    <form>
                        <label class="label">
                            "Name"
                            <input class="input" node_ref=name_ref type="text"/>
                        </label>
                        <label class="label">
                            "Latitude"
                            <input class="input" node_ref=latitude_ref type="number" step="any"/>
                        </label>
                        <label class="label">
                            "Longitude"
                            <input class="input" node_ref=longitude_ref type="number" step="any"/>
                        </label>
                        <div class="block">
                            <button class="button" type="submit" on:click=move |ev| {
                                ev.prevent_default();
                                create_act.dispatch(());
                            }>
                                "Create store"
                            </button>
                            <ActionView action=create_act/>
                        </div>
                    </form>
                    <p class="help">"Coordinates are decimal degrees. Pick the point on the location map and copy the values here."</p>
                </div>
            </div>
        </LoginGuard>
    }
}

#[derive(Debug, Clone, PartialEq, Params)]
pub struct StoreParams {
    store_id: Option<i32>,
}
#[component]
pub fn StoreDetail() -> impl IntoView {
    let StoreParams { store_id } = utils::params()?;
    let store_id = store_id.expect("failed to get store_id");
    tracing::info!("Rendering StoreDetail {store_id}");

    // resources
    let store_res = utils::logged_in_resource(move |client| async move {
        SendWrapper::new(async move {
            let store = client.get_store(store_id).await?;
            let users = client.get_store_users(store_id).await?;
            WebResult::Ok((store, users))
        })
        .await
    });

    // actions
    let name_ref = NodeRef::<Input>::new();
    let latitude_ref = NodeRef::<Input>::new();
    let longitude_ref = NodeRef::<Input>::new();
    let (update_result_message, set_update_result_message) =
        signal((None::<&'static str>, None::<TimeoutHandle>));
    let update_act = Action::new(move |&()| {
        let name = name_ref.get().expect("failed to get name_ref").value();
        let latitude = latitude_ref
            .get()
            .expect("failed to get latitude_ref")
            .value();
        let longitude = longitude_ref
            .get()
            .expect("failed to get longitude_ref")
            .value();
        let client = get_client();
        async move {
            if name.is_empty() {
                return Err(WebError::new("Store name cannot be empty"));
            }
            let latitude = latitude
                .parse::<f64>()
                .map_err(|_| WebError::new("Latitude must be a number"))?;
            let longitude = longitude
                .parse::<f64>()
                .map_err(|_| WebError::new("Longitude must be a number"))?;
            if !mise_core::valid_coordinates(latitude, longitude) {
                return Err(WebError::new("Coordinates are out of range"));
            }
            let update = req::UpdateStore {
                name: name.into(),
                latitude,
                longitude,
            };
            SendWrapper::new(client.update_store(store_id, &update)).await?;
            if let Some(handle) = update_result_message.get_untracked().1 {
                handle.clear();
            }
            let handle = set_timeout_with_handle(
                move || {
                    set_update_result_message.set((None, None));
                },
                Duration::from_secs(4),
            )
            .ok();
            set_update_result_message.set((Some("Updated store!"), handle));
            WebResult::Ok(())
        }
    });
    let delete_act = Action::new(move |&()| {
        let confirmed = window()
            .confirm_with_message(
                "Are you sure you want to delete this store? \
            Staff assigned to it will be left without a store and its shifts will be removed",
            )
            .map_err(WebError::from_js);
        let client = get_client();
        async move {
            let confirmed = confirmed?;
            let view = if confirmed {
                SendWrapper::new(client.delete_store(store_id)).await?;
                Some(view! { <Redirect path="/stores" /> })
            } else {
                None
            };
            WebResult::Ok(view)
        }
    });

    // store
    let store_content = move |(store, users): (res::Store, Vec<res::User>)| {
        let staff = if users.is_empty() {
            view! { <div>"Nobody is assigned to this store"</div> }.into_any()
        } else {
            view! { <UserTable users/> }.into_any()
        };
        view! {
            <h2 class="subtitle">{format!("Viewing store {}", store.name)}</h2>
            <div class="block">
                <h3 class="subtitle">"Edit store"</h3>
                <form>
                    <label class="label">
                        "Name"
                        <input class="input" type="text" value=store.name node_ref=name_ref/>
                    </label>
                    <label class="label">
                        "Latitude"
                        <input class="input" type="number" step="any" value=store.latitude.to_string() node_ref=latitude_ref/>
                    </label>
                    <label class="label">
                        "Longitude"
                        <input class="input" type="number" step="any" value=store.longitude.to_string() node_ref=longitude_ref/>
                    </label>
                    <button class="button" type="submit" on:click=move |ev| {
                        ev.prevent_default();
                        update_act.dispatch(());
                    }>
                        "Update store"
                    </button>
                    <ActionView action=update_act/>
                    {move || update_result_message.get().0}
                </form>
            </div>
            <div class="block">
                <h3 class="subtitle">"Staff at this store"</h3>
                {staff}
            </div>
            <div class="block">
                <button class="button is-danger" on:click=move |_ev| { delete_act.dispatch(()); }>
                    "Delete store"
                </button>
                <ActionView action=delete_act/>
            </div>
        }
    };
    let store_view = move |data: Option<(res::Store, Vec<res::User>)>| match data {
        Some(data) => store_content(data).into_any(),
        None => utils::loading_fallback("Loading store...").into_any(),
    };

    let view = view! {
        <LoginGuard require_login=true>
            <ResourceView resource=store_res view=store_view />
        </LoginGuard>
    };
    WebResult::Ok(view)
}

#[component]
pub fn Schedule() -> impl IntoView {
    tracing::info!("Rendering Schedule");

    // resources
    let schedule_res = utils::logged_in_resource(move |client| async move {
        SendWrapper::new(async move {
            let shifts = client.get_shifts().await?;
            let users = client.get_users().await?;
            let stores = client.get_stores().await?;
            WebResult::Ok((shifts, users, stores))
        })
        .await
    });

    // actions
    let title_ref = NodeRef::<Input>::new();
    let user_ref = NodeRef::<Select>::new();
    let store_ref = NodeRef::<Select>::new();
    let starts_ref = NodeRef::<Input>::new();
    let ends_ref = NodeRef::<Input>::new();
    let create_act = Action::new(move |&()| {
        let title = title_ref.get().expect("failed to get title_ref").value();
        let user = user_ref.get().expect("failed to get user_ref").value();
        let store = store_ref.get().expect("failed to get store_ref").value();
        let starts = starts_ref.get().expect("failed to get starts_ref").value();
        let ends = ends_ref.get().expect("failed to get ends_ref").value();
        let client = get_client();
        async move {
            if title.is_empty() {
                return Err(WebError::new("Shift title cannot be empty"));
            }
            let user_id = user
                .parse::<i32>()
                .map_err(|_| WebError::new("Pick a staff member"))?;
            let store_id = store
                .parse::<i32>()
                .map_err(|_| WebError::new("Pick a store"))?;
            let starts_at = parse_shift_time(&starts)?;
            let ends_at = parse_shift_time(&ends)?;
            let window = ShiftWindow { starts_at, ends_at };
            if !window.is_valid() {
                return Err(WebError::new("Shift must end after it starts"));
            }
            let create = req::NewShift {
                user_id,
                store_id,
                title: title.into(),
                starts_at,
                ends_at,
            };
            SendWrapper::new(client.create_shift(&create)).await?;
            WebResult::Ok("Created shift!")
        }
    });
    let delete_act = Action::new(move |shift_id: &i32| {
        let confirmed = window()
            .confirm_with_message("Are you sure you want to delete this shift?")
            .map_err(WebError::from_js);
        let shift_id = *shift_id;
        let client = get_client();
        async move {
            if confirmed? {
                SendWrapper::new(client.delete_shift(shift_id)).await?;
            }
            Ok(())
        }
    });

    // schedule
    let schedule_content = move |(shifts, users, stores): (
        Vec<res::Shift>,
        Vec<res::User>,
        Vec<res::Store>,
    )| {
        let mut by_day: BTreeMap<NaiveDate, Vec<res::Shift>> = BTreeMap::new();
        for shift in shifts {
            by_day
                .entry(shift.starts_at.date_naive())
                .or_default()
                .push(shift);
        }
        let days = if by_day.is_empty() {
            view! { <div>"No shifts scheduled"</div> }.into_any()
        } else {
            by_day
                .into_iter()
                .map(|(day, mut shifts)| {
                    shifts.sort_by_key(|s| s.starts_at);
                    let shift_items = shifts
                        .into_iter()
                        .map(|shift| {
                            let shift_id = shift.id;
                            let time = format!(
                                "{}-{}",
                                shift.starts_at.format("%H:%M"),
                                shift.ends_at.format("%H:%M"),
                            );
                            let label = format!(" {} ({})", shift.title, shift.username);
                            view! {
                                <li>
                                    <span class="has-text-weight-bold">{time}</span>
                                    {label}
                                    <button class="button is-small is-danger ml-2" on:click=move |_ev| { delete_act.dispatch(shift_id); }>
                                        "Delete"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view();
                    view! {
                        <div class="block">
                            <h3 class="subtitle is-6 has-text-weight-bold">{day.format("%A %Y-%m-%d").to_string()}</h3>
                            <div class="content">
                                <ul>{shift_items}</ul>
                            </div>
                        </div>
                    }
                })
                .collect_view()
                .into_any()
        };
        let user_options = users
            .into_iter()
            .map(|u| view! { <option value=u.id.to_string()>{u.username}</option> })
            .collect_view();
        let store_options = stores
            .into_iter()
            .map(|s| view! { <option value=s.id.to_string()>{s.name}</option> })
            .collect_view();
        view! {
            <div class="columns">
                <div class="column is-two-thirds">
                    {days}
                    <ActionView action=delete_act/>
                </div>
                <div class="column">
                    <h3 class="subtitle is-6 has-text-weight-bold">"New shift"</h3>
                    <form>
                        <label class="label">
                            "Title"
                            <input class="input" node_ref=title_ref type="text"/>
                        </label>
                        <label class="label">
                            "Staff member"
                            <select class="select" node_ref=user_ref>
                                {user_options}
                            </select>
                        </label>
                        <label class="label">
                            "Store"
                            <select class="select" node_ref=store_ref>
                                {store_options}
                            </select>
                        </label>
                        <label class="label">
                            "Starts"
                            <input class="input" node_ref=starts_ref type="datetime-local"/>
                        </label>
                        <label class="label">
                            "Ends"
                            <input class="input" node_ref=ends_ref type="datetime-local"/>
                        </label>
                        <div class="block">
                            <button class="button" type="submit" on:click=move |ev| {
                                ev.prevent_default();
                                create_act.dispatch(());
                            }>
                                "Create shift"
                            </button>
                            <ActionView action=create_act/>
                        </div>
                    </form>
                </div>
            </div>
        }
        .into_any()
    };
    let schedule_view = move |data: Option<(Vec<res::Shift>, Vec<res::User>, Vec<res::Store>)>| {
        match data {
            Some(data) => schedule_content(data).into_any(),
            None => utils::loading_fallback("Loading schedule...").into_any(),
        }
    };

    view! {
        <LoginGuard require_login=true>
            <h2 class="subtitle">"Schedule"</h2>
            <ResourceView resource=schedule_res view=schedule_view/>
        </LoginGuard>
    }
}

#[component]
pub fn Analytics() -> impl IntoView {
    tracing::info!("Rendering Analytics");

    view! {
        <LoginGuard require_login=true>
            <h2 class="subtitle">"Analytics"</h2>
            <p class="block">"Reporting is not wired up yet. The sections below fill in once the data endpoints land."</p>
            <div class="columns">
                <div class="column">
                    <div class="box">
                        <h3 class="subtitle is-6 has-text-weight-bold">"Sales"</h3>
                        <p>"Daily totals per store"</p>
                    </div>
                </div>
                <div class="column">
                    <div class="box">
                        <h3 class="subtitle is-6 has-text-weight-bold">"Labor"</h3>
                        <p>"Scheduled against worked hours"</p>
                    </div>
                </div>
                <div class="column">
                    <div class="box">
                        <h3 class="subtitle is-6 has-text-weight-bold">"Staffing"</h3>
                        <p>"Coverage across stores"</p>
                    </div>
                </div>
            </div>
        </LoginGuard>
    }
}

/// Parses the value of a `datetime-local` input. The console works in UTC.
fn parse_shift_time(value: &str) -> WebResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map(|naive| naive.and_utc())
        .map_err(|_| WebError::new("Enter both a date and a time"))
}
