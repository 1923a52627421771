//! Client side of the deals backend: data access, services and screen sessions.

pub mod admin;
pub mod client;
pub mod config;
pub mod context;
pub mod domain;
pub mod feed;
pub mod logging;
