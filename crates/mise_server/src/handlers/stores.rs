//! /admin/stores
//! Handlers for managing store locations.

use super::{prelude::*, users};
use mise_core::valid_coordinates;
use std::collections::HashMap;

// handlers

/// Lists every store.
#[instrument]
pub async fn get_all(
    State(state): State<MiseState>,
    user: Authentication,
) -> MiseResult<Json<Vec<res::Store>>> {
    use schema::stores as s;
    user.require_admin()?;

    let stores = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let stores = s::table
            .select(StoreRow::as_select())
            .order(s::name.asc())
            .get_results::<StoreRow>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<res::Store>>();
        MiseResult::Ok(stores)
    })
    .await??;

    Ok(Json(stores))
}

/// Fetches a single store.
#[instrument]
pub async fn get_one(
    State(state): State<MiseState>,
    Path(id): Path<i32>,
    user: Authentication,
) -> MiseResult<Json<res::Store>> {
    user.require_admin()?;

    let store = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        users::load_store(&mut conn, id)
    })
    .await??;

    Ok(Json(store))
}

/// Creates a store.
#[instrument(skip(create))]
pub async fn insert(
    State(state): State<MiseState>,
    user: Authentication,
    Json(create): Json<req::NewStore<'static>>,
) -> MiseResult<Json<res::Store>> {
    use schema::stores as s;
    user.require_admin()?;

    let req::NewStore {
        name,
        latitude,
        longitude,
    } = create;
    validate_store(&name, latitude, longitude)?;

    let store = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let id = diesel::insert_into(s::table)
            .values((
                s::name.eq(name.as_ref()),
                s::latitude.eq(latitude),
                s::longitude.eq(longitude),
            ))
            .returning(s::id)
            .get_result::<i32>(&mut conn)?;
        users::load_store(&mut conn, id)
    })
    .await??;

    tracing::info!("Created store {}", store.id);
    Ok(Json(store))
}

/// Updates a store.
#[instrument(skip(update))]
pub async fn update(
    State(state): State<MiseState>,
    Path(id): Path<i32>,
    user: Authentication,
    Json(update): Json<req::UpdateStore<'static>>,
) -> MiseResult<Json<res::Store>> {
    use schema::stores as s;
    user.require_admin()?;

    let req::UpdateStore {
        name,
        latitude,
        longitude,
    } = update;
    validate_store(&name, latitude, longitude)?;

    let store = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let affected = diesel::update(s::table.filter(s::id.eq(id)))
            .set((
                s::name.eq(name.as_ref()),
                s::latitude.eq(latitude),
                s::longitude.eq(longitude),
            ))
            .execute(&mut conn)?;
        if affected == 0 {
            return Err(MiseError::NotFound("Store not found"));
        }
        users::load_store(&mut conn, id)
    })
    .await??;

    tracing::info!("Updated store {id}");
    Ok(Json(store))
}

/// Deletes the store. Staff assigned to it are left without a store and its
/// shifts are removed.
#[instrument]
pub async fn delete(
    State(state): State<MiseState>,
    Path(id): Path<i32>,
    user: Authentication,
) -> MiseResult<()> {
    use schema::{shifts as sh, stores as s, users as u};
    user.require_admin()?;

    tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;

        conn.transaction::<_, MiseError, _>(|conn| {
            diesel::update(u::table.filter(u::store_id.eq(id)))
                .set(u::store_id.eq(None::<i32>))
                .execute(conn)?;
            diesel::delete(sh::table.filter(sh::store_id.eq(id))).execute(conn)?;
            let affected = diesel::delete(s::table.filter(s::id.eq(id))).execute(conn)?;
            if affected == 0 {
                return Err(MiseError::NotFound("Store not found"));
            }
            Ok(())
        })
    })
    .await??;

    tracing::info!("Deleted store {id}");
    Ok(())
}

/// Lists the staff assigned to the store.
#[instrument]
pub async fn store_users(
    State(state): State<MiseState>,
    Path(id): Path<i32>,
    user: Authentication,
) -> MiseResult<Json<Vec<res::User>>> {
    use schema::{roles as r, user_roles as ur, users as u};
    user.require_admin()?;

    let assigned = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;

        let store = users::load_store(&mut conn, id)?;
        let rows = u::table
            .select((u::id, u::username, u::email))
            .filter(u::store_id.eq(id))
            .order(u::username.asc())
            .get_results::<(i32, String, String)>(&mut conn)?;
        let role_rows = ur::table
            .inner_join(r::table)
            .select((ur::user_id, r::name))
            .filter(ur::user_id.eq_any(rows.iter().map(|(id, _, _)| *id).collect::<Vec<_>>()))
            .get_results::<(i32, String)>(&mut conn)?;

        let mut roles_by_user = HashMap::<i32, Vec<String>>::new();
        for (user_id, role) in role_rows {
            roles_by_user.entry(user_id).or_default().push(role);
        }

        let assigned = rows
            .into_iter()
            .map(|(id, username, email)| res::User {
                id,
                username,
                email,
                roles: roles_by_user.remove(&id).unwrap_or_default(),
                store: Some(store.clone()),
            })
            .collect::<Vec<_>>();
        MiseResult::Ok(assigned)
    })
    .await??;

    Ok(Json(assigned))
}

// queries

query! {
    struct StoreRow {
        id: i32 = stores::id,
        name: String = stores::name,
        latitude: f64 = stores::latitude,
        longitude: f64 = stores::longitude,
    }
}

impl From<StoreRow> for res::Store {
    fn from(value: StoreRow) -> Self {
        res::Store {
            id: value.id,
            name: value.name,
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

fn validate_store(name: &str, latitude: f64, longitude: f64) -> MiseResult<()> {
    if name.trim().is_empty() {
        return Err(MiseError::BadRequest("Store name is required".to_string()));
    }
    if !valid_coordinates(latitude, longitude) {
        return Err(MiseError::BadRequest(
            "Coordinates are out of range".to_string(),
        ));
    }
    Ok(())
}
