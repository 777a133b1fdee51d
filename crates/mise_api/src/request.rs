use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Login<'a> {
    pub username: Cow<'a, str>,
    pub password: Cow<'a, str>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateUser<'a> {
    pub username: Cow<'a, str>,
    pub email: Cow<'a, str>,
    pub password: Cow<'a, str>,
    pub role: Cow<'a, str>,
    pub store_id: Option<i32>,
}

/// Partial update; `None` fields are left as they are.
/// A `store_id` of 0 clears the store assignment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateUser<'a> {
    pub username: Option<Cow<'a, str>>,
    pub email: Option<Cow<'a, str>>,
    pub role: Option<Cow<'a, str>>,
    pub store_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChangePassword<'a> {
    pub new_password: Cow<'a, str>,
    pub confirm_password: Cow<'a, str>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewStore<'a> {
    pub name: Cow<'a, str>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateStore<'a> {
    pub name: Cow<'a, str>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewShift<'a> {
    pub user_id: i32,
    pub store_id: i32,
    pub title: Cow<'a, str>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateShift<'a> {
    pub title: Cow<'a, str>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}
