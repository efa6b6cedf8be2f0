//! Bookshelf server: users, books and their assets behind a JSON API

pub mod api;
mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
