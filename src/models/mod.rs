//! Core data models for trailscope
//!
//! This module contains the data structures for the client roster: the
//! client record, its statuses, the status-conditional field mapping, and
//! the strongly-typed roster id.

pub mod client;
pub mod ids;

pub use client::{
    AccountStatus, CallingStatus, Client, ClientValidationError, ConditionalField,
    FieldDescriptor, FieldKind, FieldValue,
};
pub use ids::ClientId;
