//! Modal dialogs rendered over the main view

pub mod audit_log;
pub mod client_editor;
pub mod confirm;
pub mod help;
