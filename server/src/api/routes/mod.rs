//! API route handlers

pub mod auth;
pub mod books;
pub mod health;
pub mod users;
