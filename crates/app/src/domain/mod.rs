//! Dealfeed Domain Concerns

pub mod deals;
pub mod users;
