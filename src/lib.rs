// Library root for the tasks service

pub mod core;
pub mod store;
pub mod auth;
pub mod api;
pub mod config;
pub mod utils;
