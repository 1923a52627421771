//! Dealfeed
//!
//! Dealfeed turns a list of crowd-sourced electronics deals into the listing a shopper
//! sees: filtering, promoted-first ordering, display formatting and speculative vote
//! bookkeeping.

pub mod admin;
pub mod affiliate;
pub mod deals;
pub mod display;
pub mod filters;
pub mod fixtures;
pub mod listing;
pub mod numeric;
pub mod prelude;
pub mod projection;
pub mod search;
pub mod votes;
