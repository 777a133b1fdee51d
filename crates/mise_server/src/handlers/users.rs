//! /admin/users
//! Handlers for managing staff accounts.

use super::prelude::*;
use crate::authentication;
use mise_core::Role;
use std::collections::HashMap;

// handlers

/// Lists every staff account with roles and store assignment.
#[instrument]
pub async fn get_all(
    State(state): State<MiseState>,
    user: Authentication,
) -> MiseResult<Json<Vec<res::User>>> {
    use schema::{roles as r, user_roles as ur, users as u};
    user.require_admin()?;

    let users = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;

        let rows = u::table
            .select(UserRow::as_select())
            .order(u::username.asc())
            .get_results::<UserRow>(&mut conn)?;
        let role_rows = ur::table
            .inner_join(r::table)
            .select((ur::user_id, r::name))
            .get_results::<(i32, String)>(&mut conn)?;
        let stores = stores_by_id(&mut conn)?;

        let mut roles_by_user = HashMap::<i32, Vec<String>>::new();
        for (user_id, role) in role_rows {
            roles_by_user.entry(user_id).or_default().push(role);
        }

        let users = rows
            .into_iter()
            .map(|row| res::User {
                id: row.id,
                username: row.username,
                email: row.email,
                roles: roles_by_user.remove(&row.id).unwrap_or_default(),
                store: row.store_id.and_then(|id| stores.get(&id).cloned()),
            })
            .collect::<Vec<_>>();
        MiseResult::Ok(users)
    })
    .await??;

    Ok(Json(users))
}

/// Fetches a single staff account.
#[instrument]
pub async fn get_one(
    State(state): State<MiseState>,
    Path(id): Path<i32>,
    user: Authentication,
) -> MiseResult<Json<res::User>> {
    user.require_admin()?;

    let user = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        load_user(&mut conn, id)
    })
    .await??;

    Ok(Json(user))
}

/// Creates a staff account.
#[instrument(skip(create))]
pub async fn insert(
    State(state): State<MiseState>,
    user: Authentication,
    Json(create): Json<req::CreateUser<'static>>,
) -> MiseResult<Json<res::User>> {
    use schema::{user_roles as ur, users as u};
    user.require_admin()?;

    let req::CreateUser {
        username,
        email,
        password,
        role,
        store_id,
    } = create;
    let role = role
        .parse::<Role>()
        .map_err(|e| MiseError::BadRequest(e.to_string()))?;
    if username.trim().is_empty() {
        return Err(MiseError::BadRequest("Username is required".to_string()));
    }
    if email.trim().is_empty() {
        return Err(MiseError::BadRequest("Email is required".to_string()));
    }
    if password.is_empty() {
        return Err(MiseError::BadRequest("Password is required".to_string()));
    }

    let created = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;

        let password_hash = authentication::hash_password(&password)?;
        let created = conn.transaction::<_, MiseError, _>(|conn| {
            ensure_unique(conn, &username, &email, None)?;
            if let Some(store_id) = store_id {
                ensure_store_exists(conn, store_id)?;
            }
            let user_id = diesel::insert_into(u::table)
                .values((
                    u::username.eq(username.as_ref()),
                    u::email.eq(email.as_ref()),
                    u::password_hash.eq(&password_hash),
                    u::store_id.eq(store_id),
                ))
                .returning(u::id)
                .get_result::<i32>(conn)?;
            let role_id = queries::role_id(conn, role)?;
            diesel::insert_into(ur::table)
                .values(eq!(ur, user_id, role_id))
                .execute(conn)?;
            load_user(conn, user_id)
        })?;
        MiseResult::Ok(created)
    })
    .await??;

    tracing::info!("Created user {}", created.id);
    Ok(Json(created))
}

/// Updates a staff account. Empty fields are left as they are; a store id of
/// 0 clears the assignment.
#[instrument(skip(update))]
pub async fn update(
    State(state): State<MiseState>,
    Path(id): Path<i32>,
    user: Authentication,
    Json(update): Json<req::UpdateUser<'static>>,
) -> MiseResult<Json<res::User>> {
    use schema::{user_roles as ur, users as u};
    user.require_admin()?;

    let req::UpdateUser {
        username,
        email,
        role,
        store_id,
    } = update;
    let role = role
        .map(|r| r.parse::<Role>())
        .transpose()
        .map_err(|e| MiseError::BadRequest(e.to_string()))?;

    let updated = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;

        let updated = conn.transaction::<_, MiseError, _>(|conn| {
            let current = u::table
                .select(UserRow::as_select())
                .filter(u::id.eq(id))
                .get_result::<UserRow>(conn)
                .optional()?
                .ok_or(MiseError::NotFound("User not found"))?;

            let username = username
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(&current.username)
                .to_string();
            let email = email
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(&current.email)
                .to_string();
            ensure_unique(conn, &username, &email, Some(id))?;

            let store_id = match store_id {
                None => current.store_id,
                Some(0) => None,
                Some(store_id) => {
                    ensure_store_exists(conn, store_id)?;
                    Some(store_id)
                }
            };

            diesel::update(u::table.filter(u::id.eq(id)))
                .set((
                    u::username.eq(&username),
                    u::email.eq(&email),
                    u::store_id.eq(store_id),
                ))
                .execute(conn)?;

            if let Some(role) = role {
                let role_id = queries::role_id(conn, role)?;
                diesel::delete(ur::table.filter(ur::user_id.eq(id))).execute(conn)?;
                diesel::insert_into(ur::table)
                    .values((ur::user_id.eq(id), ur::role_id.eq(role_id)))
                    .execute(conn)?;
            }

            load_user(conn, id)
        })?;
        MiseResult::Ok(updated)
    })
    .await??;

    tracing::info!("Updated user {id}");
    Ok(Json(updated))
}

/// Sets a new password for the account.
#[instrument(skip(change))]
pub async fn change_password(
    State(state): State<MiseState>,
    Path(id): Path<i32>,
    user: Authentication,
    Json(change): Json<req::ChangePassword<'static>>,
) -> MiseResult<()> {
    use schema::users as u;
    user.require_admin()?;

    let req::ChangePassword {
        new_password,
        confirm_password,
    } = change;
    if new_password != confirm_password {
        return Err(MiseError::BadRequest(
            "New password and confirmation do not match".to_string(),
        ));
    }
    if new_password.is_empty() {
        return Err(MiseError::BadRequest("Password is required".to_string()));
    }

    tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;

        let password_hash = authentication::hash_password(&new_password)?;
        let affected = diesel::update(u::table.filter(u::id.eq(id)))
            .set(u::password_hash.eq(&password_hash))
            .execute(&mut conn)?;
        if affected == 0 {
            return Err(MiseError::NotFound("User not found"));
        }
        MiseResult::Ok(())
    })
    .await??;

    tracing::info!("Changed password for user {id}");
    Ok(())
}

/// Deletes the account along with its role links and shifts.
#[instrument]
pub async fn delete(
    State(state): State<MiseState>,
    Path(id): Path<i32>,
    user: Authentication,
) -> MiseResult<()> {
    use schema::{shifts as sh, user_roles as ur, users as u};
    user.require_admin()?;

    tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;

        conn.transaction::<_, MiseError, _>(|conn| {
            diesel::delete(ur::table.filter(ur::user_id.eq(id))).execute(conn)?;
            diesel::delete(sh::table.filter(sh::user_id.eq(id))).execute(conn)?;
            let affected = diesel::delete(u::table.filter(u::id.eq(id))).execute(conn)?;
            if affected == 0 {
                return Err(MiseError::NotFound("User not found"));
            }
            Ok(())
        })
    })
    .await??;

    tracing::info!("Deleted user {id}");
    Ok(())
}

// queries

query! {
    struct UserRow {
        id: i32 = users::id,
        username: String = users::username,
        email: String = users::email,
        store_id: Option<i32> = users::store_id,
    }
}

pub(super) fn load_user(conn: &mut PgConnection, id: i32) -> MiseResult<res::User> {
    use schema::users as u;

    let row = u::table
        .select(UserRow::as_select())
        .filter(u::id.eq(id))
        .get_result::<UserRow>(conn)
        .optional()?
        .ok_or(MiseError::NotFound("User not found"))?;
    let roles = queries::user_role_names(conn, row.id)?;
    let store = match row.store_id {
        Some(store_id) => Some(load_store(conn, store_id)?),
        None => None,
    };

    Ok(res::User {
        id: row.id,
        username: row.username,
        email: row.email,
        roles,
        store,
    })
}

pub(super) fn load_store(conn: &mut PgConnection, id: i32) -> MiseResult<res::Store> {
    use schema::stores as s;

    let (id, name, latitude, longitude) = s::table
        .select((s::id, s::name, s::latitude, s::longitude))
        .filter(s::id.eq(id))
        .get_result::<(i32, String, f64, f64)>(conn)
        .optional()?
        .ok_or(MiseError::NotFound("Store not found"))?;

    Ok(res::Store {
        id,
        name,
        latitude,
        longitude,
    })
}

pub(super) fn stores_by_id(conn: &mut PgConnection) -> MiseResult<HashMap<i32, res::Store>> {
    use schema::stores as s;

    let stores = s::table
        .select((s::id, s::name, s::latitude, s::longitude))
        .get_results::<(i32, String, f64, f64)>(conn)?
        .into_iter()
        .map(|(id, name, latitude, longitude)| {
            (
                id,
                res::Store {
                    id,
                    name,
                    latitude,
                    longitude,
                },
            )
        })
        .collect();

    Ok(stores)
}

fn ensure_unique(
    conn: &mut PgConnection,
    username: &str,
    email: &str,
    exclude: Option<i32>,
) -> MiseResult<()> {
    use schema::users as u;

    let mut query = u::table
        .filter(u::username.eq(username).or(u::email.eq(email)))
        .select(u::username)
        .into_boxed();
    if let Some(exclude) = exclude {
        query = query.filter(u::id.ne(exclude));
    }
    let clashes = query.get_results::<String>(conn)?;
    if clashes.iter().any(|name| name == username) {
        return Err(MiseError::BadRequest(
            "Username is already taken".to_string(),
        ));
    }
    if !clashes.is_empty() {
        return Err(MiseError::BadRequest("Email is already in use".to_string()));
    }

    Ok(())
}

pub(super) fn ensure_store_exists(conn: &mut PgConnection, store_id: i32) -> MiseResult<()> {
    use schema::stores as s;

    let exists = s::table
        .select(s::id)
        .filter(s::id.eq(store_id))
        .get_result::<i32>(conn)
        .optional()?
        .is_some();
    if exists {
        Ok(())
    } else {
        Err(MiseError::NotFound("Store not found"))
    }
}
