//! Service layer for trailscope
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, uniqueness rules, and derived statistics.

pub mod client;

pub use client::{ClientService, RosterStats};
