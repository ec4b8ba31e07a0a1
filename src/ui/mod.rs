//! Ratatui front-end: a student table with popups for insert, update, delete
//! confirmation, search and about.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
