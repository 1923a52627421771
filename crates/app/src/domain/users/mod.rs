//! Users

pub mod data;
pub mod errors;
pub mod service;

pub use errors::UsersServiceError;
pub use service::*;
