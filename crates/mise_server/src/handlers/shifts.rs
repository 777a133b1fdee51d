//! /shifts
//! Handlers for the staff schedule.

use super::{prelude::*, users};
use chrono::{DateTime, Utc};
use mise_core::ShiftWindow;

// handlers

/// Lists the schedule. Any signed-in user can read it.
#[instrument]
pub async fn get_all(
    State(state): State<MiseState>,
    _user: Authentication,
) -> MiseResult<Json<Vec<res::Shift>>> {
    use schema::{shifts as sh, users as u};

    let shifts = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let shifts = sh::table
            .inner_join(u::table)
            .select(ShiftRow::as_select())
            .order(sh::starts_at.asc())
            .get_results::<ShiftRow>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<res::Shift>>();
        MiseResult::Ok(shifts)
    })
    .await??;

    Ok(Json(shifts))
}

/// Schedules a shift. Rejects windows that end before they start and
/// double-bookings for the same staff member.
#[instrument(skip(new))]
pub async fn insert(
    State(state): State<MiseState>,
    user: Authentication,
    Json(new): Json<req::NewShift<'static>>,
) -> MiseResult<Json<res::Shift>> {
    use schema::{shifts as sh, users as u};
    user.require_admin()?;

    let req::NewShift {
        user_id,
        store_id,
        title,
        starts_at,
        ends_at,
    } = new;
    let window = ShiftWindow { starts_at, ends_at };
    validate_shift(&title, &window)?;

    let shift = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;

        let shift = conn.transaction::<_, MiseError, _>(|conn| {
            let staffed = u::table
                .select(u::id)
                .filter(u::id.eq(user_id))
                .get_result::<i32>(conn)
                .optional()?
                .is_some();
            if !staffed {
                return Err(MiseError::NotFound("User not found"));
            }
            users::ensure_store_exists(conn, store_id)?;
            ensure_no_overlap(conn, user_id, &window, None)?;

            let id = diesel::insert_into(sh::table)
                .values((
                    sh::user_id.eq(user_id),
                    sh::store_id.eq(store_id),
                    sh::title.eq(title.as_ref()),
                    sh::starts_at.eq(starts_at),
                    sh::ends_at.eq(ends_at),
                ))
                .returning(sh::id)
                .get_result::<i32>(conn)?;
            load_shift(conn, id)
        })?;
        MiseResult::Ok(shift)
    })
    .await??;

    tracing::info!("Created shift {}", shift.id);
    Ok(Json(shift))
}

/// Reschedules a shift.
#[instrument(skip(update))]
pub async fn update(
    State(state): State<MiseState>,
    Path(id): Path<i32>,
    user: Authentication,
    Json(update): Json<req::UpdateShift<'static>>,
) -> MiseResult<Json<res::Shift>> {
    use schema::shifts as sh;
    user.require_admin()?;

    let req::UpdateShift {
        title,
        starts_at,
        ends_at,
    } = update;
    let window = ShiftWindow { starts_at, ends_at };
    validate_shift(&title, &window)?;

    let shift = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;

        let shift = conn.transaction::<_, MiseError, _>(|conn| {
            let user_id = sh::table
                .select(sh::user_id)
                .filter(sh::id.eq(id))
                .get_result::<i32>(conn)
                .optional()?
                .ok_or(MiseError::NotFound("Shift not found"))?;
            ensure_no_overlap(conn, user_id, &window, Some(id))?;

            diesel::update(sh::table.filter(sh::id.eq(id)))
                .set((
                    sh::title.eq(title.as_ref()),
                    sh::starts_at.eq(starts_at),
                    sh::ends_at.eq(ends_at),
                ))
                .execute(conn)?;
            load_shift(conn, id)
        })?;
        MiseResult::Ok(shift)
    })
    .await??;

    tracing::info!("Updated shift {id}");
    Ok(Json(shift))
}

/// Removes a shift from the schedule.
#[instrument]
pub async fn delete(
    State(state): State<MiseState>,
    Path(id): Path<i32>,
    user: Authentication,
) -> MiseResult<()> {
    use schema::shifts as sh;
    user.require_admin()?;

    tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let affected = diesel::delete(sh::table.filter(sh::id.eq(id))).execute(&mut conn)?;
        if affected == 0 {
            return Err(MiseError::NotFound("Shift not found"));
        }
        MiseResult::Ok(())
    })
    .await??;

    tracing::info!("Deleted shift {id}");
    Ok(())
}

// queries

query! {
    struct ShiftRow {
        id: i32 = shifts::id,
        user_id: i32 = shifts::user_id,
        username: String = users::username,
        store_id: i32 = shifts::store_id,
        title: String = shifts::title,
        starts_at: DateTime<Utc> = shifts::starts_at,
        ends_at: DateTime<Utc> = shifts::ends_at,
    }
}

impl From<ShiftRow> for res::Shift {
    fn from(value: ShiftRow) -> Self {
        res::Shift {
            id: value.id,
            user_id: value.user_id,
            username: value.username,
            store_id: value.store_id,
            title: value.title,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
        }
    }
}

fn load_shift(conn: &mut PgConnection, id: i32) -> MiseResult<res::Shift> {
    use schema::{shifts as sh, users as u};

    let shift = sh::table
        .inner_join(u::table)
        .select(ShiftRow::as_select())
        .filter(sh::id.eq(id))
        .get_result::<ShiftRow>(conn)
        .optional()?
        .ok_or(MiseError::NotFound("Shift not found"))?;

    Ok(shift.into())
}

fn validate_shift(title: &str, window: &ShiftWindow) -> MiseResult<()> {
    if title.trim().is_empty() {
        return Err(MiseError::BadRequest("Shift title is required".to_string()));
    }
    if !window.is_valid() {
        return Err(MiseError::BadRequest(
            "Shift must end after it starts".to_string(),
        ));
    }
    Ok(())
}

fn ensure_no_overlap(
    conn: &mut PgConnection,
    user_id: i32,
    window: &ShiftWindow,
    exclude: Option<i32>,
) -> MiseResult<()> {
    use schema::shifts as sh;

    let mut query = sh::table
        .select((sh::starts_at, sh::ends_at))
        .filter(sh::user_id.eq(user_id))
        .into_boxed();
    if let Some(exclude) = exclude {
        query = query.filter(sh::id.ne(exclude));
    }
    let existing = query.get_results::<(DateTime<Utc>, DateTime<Utc>)>(conn)?;
    let overlaps = existing.into_iter().any(|(starts_at, ends_at)| {
        window.overlaps(&ShiftWindow { starts_at, ends_at })
    });
    if overlaps {
        return Err(MiseError::BadRequest(
            "Shift overlaps an existing shift for this user".to_string(),
        ));
    }

    Ok(())
}
