//! Reusable database query functions.

use diesel::prelude::*;
use mise_api::response as res;
use mise_core::Role;

/// The identity payload returned by the auth endpoints.
pub fn user_details(conn: &mut PgConnection, user_id: i32) -> eyre::Result<res::UserDetails> {
    use crate::schema::users as u;

    let (id, username, email) = u::table
        .select((u::id, u::username, u::email))
        .filter(u::id.eq(user_id))
        .get_result::<(i32, String, String)>(conn)?;
    let roles = user_role_names(conn, user_id)?;

    Ok(res::UserDetails {
        id,
        username,
        email,
        roles,
    })
}

pub fn user_role_names(conn: &mut PgConnection, user_id: i32) -> eyre::Result<Vec<String>> {
    use crate::schema::{roles as r, user_roles as ur};

    let roles = ur::table
        .inner_join(r::table)
        .select(r::name)
        .filter(ur::user_id.eq(user_id))
        .get_results(conn)?;

    Ok(roles)
}

pub fn role_id(conn: &mut PgConnection, role: Role) -> eyre::Result<i32> {
    use crate::schema::roles as r;

    let id = r::table
        .select(r::id)
        .filter(r::name.eq(role.as_str()))
        .get_result(conn)?;

    Ok(id)
}
