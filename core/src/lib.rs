//! Parameter editor core — data model and state for the parameter form.
//!
//! Nothing in this crate touches the terminal. The form surface lives in
//! `param-editor-tui`; this crate only tracks parameters, their values, the
//! rename session, and the durable key-value copy of both.
//!
//! # Modules
//!
//! - [`types`] — `Param`, `ParamValue`, `Model`, `Seed`
//! - [`store`] — ordered parameter list plus id → value mapping
//! - [`edit`] — the single-row rename state machine
//! - [`persist`] — key-value storage trait, file and memory backends
//! - [`editor`] — `ParamEditor`, the component that ties them together
//! - [`config`] — `settings.yaml` loading
//! - [`error`] — crate error type

pub mod config;
pub mod edit;
pub mod editor;
pub mod error;
pub mod persist;
pub mod store;
pub mod types;

pub use editor::ParamEditor;
pub use error::{EditorError, Result};
