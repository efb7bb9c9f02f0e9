//! Inspection CLI over a DishSplit database.
//!
//! # Responsibility
//! - List stored groups and print a group's split summary.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage:
//! - `dishsplit` prints the core version.
//! - `dishsplit <db_path> list`
//! - `dishsplit <db_path> show <group>`
//!
//! Logs go to a `logs/` directory next to the database file.

use dishsplit_core::db::open_db;
use dishsplit_core::{GroupStore, Session, SplitOptions, SqliteRecordStore};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let (db_path, command) = match args {
        [] => {
            println!("dishsplit_core version={}", dishsplit_core::core_version());
            return Ok(());
        }
        [db_path, rest @ ..] => (db_path, rest),
    };

    match log_dir_for(Path::new(db_path)) {
        Ok(dir) => {
            let level = dishsplit_core::default_log_level();
            if let Err(err) = dishsplit_core::init_logging(level, &dir.to_string_lossy()) {
                eprintln!("warning: logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }

    let conn = open_db(db_path)?;
    let store = GroupStore::new(SqliteRecordStore::try_new(&conn)?);

    match command {
        [cmd] if cmd == "list" => {
            for name in store.list_names()? {
                println!("{name}");
            }
        }
        [cmd, group] if cmd == "show" => {
            let snapshot = store.load(group)?;
            let options = SplitOptions::default();
            let summary = Session::from_snapshot(&snapshot)?.compute_split(&options)?;
            println!("{}", summary.to_text(&options.currency_symbol));
        }
        _ => return Err("usage: dishsplit <db_path> (list | show <group>)".into()),
    }
    Ok(())
}

/// Absolute `logs/` directory beside `db_path`.
fn log_dir_for(db_path: &Path) -> std::io::Result<PathBuf> {
    let db_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };
    let parent = db_path.parent().unwrap_or(Path::new("/"));
    Ok(parent.join("logs"))
}
