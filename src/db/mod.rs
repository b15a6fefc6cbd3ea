//! Persistence module split across logical submodules.

mod anime;
mod connection;

pub use connection::{default_db_path, Store};
