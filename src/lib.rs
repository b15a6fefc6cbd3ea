//! Core library surface for the anime tracker.
//!
//! The binary only wires these pieces together: the SQLite-backed [`Store`],
//! the stateless [`table`] renderer, and the interactive [`Console`] loop.
pub mod console;
pub mod db;
pub mod error;
pub mod models;
pub mod table;

/// Persistence entry points used by `main.rs` and the integration tests.
pub use db::{default_db_path, Store};

/// The domain types passed between the store and the renderer.
pub use models::{Anime, NewAnime};

pub use console::Console;
pub use error::InputError;
