//! Binary entry point: bring up logging, open the database in the user's
//! home directory, and run the menu loop on the terminal until the user quits.
use std::io::{self, IsTerminal};

use anime_tracker::{Console, Store};

/// Initialize persistence and drive the console loop.
///
/// Fatal storage problems bubble up as an error instead of a panic so the
/// user sees the chained cause.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let store = Store::open_default()?;

    let stdout = io::stdout();
    let styled = stdout.is_terminal();
    Console::new(&store, io::stdin().lock(), stdout.lock())
        .styled(styled)
        .run()?;

    store.close()
}
