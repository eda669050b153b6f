//! Reusable TUI widgets

pub mod input;

pub use input::{render_field, TextInput};
