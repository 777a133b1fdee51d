pub mod diesel;
