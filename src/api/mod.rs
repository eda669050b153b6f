//! HTTP access to the platform's audit-log API

pub mod client;

pub use client::{ApiConfig, AuditApi, AuditPage, ExportPayload, PaginationInfo};
