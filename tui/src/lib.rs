//! Terminal surface for the parameter form.
//!
//! Renders a [`param_editor_core::ParamEditor`] as an editable form with
//! ratatui and routes crossterm key and mouse events into it. Only
//! [`tui`] touches the terminal; everything else is plain state and
//! rendering into a ratatui `Frame`.
//!
//! # Modules
//!
//! - [`app`] — focus, key routing, double activation
//! - [`form`] — layout, rendering, mouse hit-testing
//! - [`input`] — single-line text field editing
//! - [`theme`] — color themes
//! - [`tui`] — terminal setup and event loop

pub mod app;
pub mod form;
pub mod input;
pub mod theme;
pub mod tui;
