//! Core library surface for the Student Records TUI application.
//!
//! The record store, validation and search live here so they can be driven
//! and tested without a terminal; the `ui` module is one front-end on top.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod search;
pub mod ui;
pub mod validation;

pub use config::Config;
pub use db::{Change, RecordStore};
pub use models::{Course, Field, Student, UnknownCourse};
pub use search::{search, search_with, CaseMatch};
pub use validation::{validate, ValidationError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
