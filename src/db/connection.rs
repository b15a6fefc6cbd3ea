use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use log::{debug, info};
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".anime-tracker";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "animedb.sqlite";

/// Handle to the anime table. The connection is opened once at startup and
/// released either through [`Store::close`] or when the value is dropped.
pub struct Store {
    pub(super) conn: Connection,
}

impl Store {
    /// Open (or create) the database in the user's home directory.
    pub fn open_default() -> Result<Self> {
        Self::open(default_db_path()?)
    }

    /// Open the database file at `path`, creating parent directories and the
    /// table as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("failed to create data directory")?;
            }
        }

        let conn = Connection::open(path).context("failed to open SQLite database")?;
        info!("opened anime database at {}", path.display());

        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open a throwaway in-memory database with the table in place.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Create the anime table if it is missing. Safe to run on every start.
    ///
    /// `AUTOINCREMENT` keeps SQLite from handing out the id of a deleted row
    /// again, even when the deleted row held the highest id.
    pub fn initialize(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS anime (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT,
                    category TEXT,
                    finished INTEGER,
                    rating REAL,
                    watched INTEGER
                )",
                [],
            )
            .context("failed to create anime table")?;

        debug!("anime table ready");
        Ok(())
    }

    /// Release the connection, surfacing any error SQLite reports while
    /// finalizing instead of swallowing it in `Drop`.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .context("failed to close SQLite database")?;
        info!("closed anime database");
        Ok(())
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
pub fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
