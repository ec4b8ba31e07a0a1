//! Persistence module split across logical submodules.

mod connection;
mod students;

pub use connection::RecordStore;
pub use students::Change;
