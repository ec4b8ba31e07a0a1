//! Binary entry point: resolve config, start logging, open the database and
//! drive the Ratatui event loop until the user exits.
use student_records::{logging, run_app, App, Config, RecordStore};

/// An unusable database file is fatal and is reported on the terminal after
/// the TUI has been torn down (or before it ever starts).
fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    logging::init(&config)?;

    let store = RecordStore::open(&config.database_path)?;
    let students = store.list_all()?;

    let mut app = App::new(store, students);
    run_app(&mut app)
}
