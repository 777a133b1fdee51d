pub mod auth;
pub mod prelude;
pub mod shifts;
pub mod stores;
pub mod users;
