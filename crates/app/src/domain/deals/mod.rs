//! Deals

pub mod data;
pub mod errors;
mod memory;
pub mod service;

pub use errors::DealsServiceError;
pub use memory::InMemoryDealsService;
pub use service::*;
