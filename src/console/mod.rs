//! Interactive numbered-menu loop. Each menu entry gathers the fields one
//! store call needs, runs it, and prints either a table or a short notice.

mod input;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use crossterm::style::{Color, Stylize};
use log::debug;

use crate::db::Store;
use crate::error::InputError;
use crate::models::{Anime, NewAnime};
use crate::table;

pub use input::{normalize_category, parse_id, parse_rating, parse_yes_no, MenuChoice};

/// Printed when the random pick has no finished, unwatched title to draw from.
pub const NO_CANDIDATE_MESSAGE: &str =
    "An anime that has finished airing and is not seen by you could not be found";

/// Whether the loop should keep prompting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Menu loop over any line-based input and output. `main` wires it to the
/// terminal; tests drive it with in-memory buffers.
pub struct Console<'a, R, W> {
    store: &'a Store,
    input: R,
    output: W,
    styled: bool,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(store: &'a Store, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
            styled: false,
        }
    }

    /// Enable ANSI colors for headings and notices.
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Hand back the output sink, mostly so tests can inspect what was written.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Keep showing the menu until the user quits or input runs out.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Enter your choice: ")? else {
                return Ok(());
            };

            let flow = match MenuChoice::parse(&line) {
                Ok(choice) => self.dispatch(choice)?,
                Err(err) => {
                    self.warn(&err.to_string())?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<Flow> {
        debug!("menu choice {choice:?}");
        match choice {
            MenuChoice::Add => self.add(),
            MenuChoice::ViewAll => {
                let animes = self.store.select_all()?;
                self.print_table(&animes)?;
                Ok(Flow::Continue)
            }
            MenuChoice::FilterBySport => {
                let Some(sport) = self.prompt("Enter type of sport: ")? else {
                    return Ok(Flow::Exit);
                };
                let animes = self.store.select_by_category(&normalize_category(&sport))?;
                self.print_table(&animes)?;
                Ok(Flow::Continue)
            }
            MenuChoice::PickRandom => {
                match self.store.select_random_unwatched_finished()? {
                    Some(anime) => self.print_table(&[anime])?,
                    None => self.notice(NO_CANDIDATE_MESSAGE, Color::Yellow)?,
                }
                Ok(Flow::Continue)
            }
            MenuChoice::MarkSeen => {
                let Some(id) = self.prompt_parsed("Enter ID: ", parse_id)? else {
                    return Ok(Flow::Exit);
                };
                if self.store.mark_watched(id)? {
                    self.notice(&format!("Marked anime {id} as seen."), Color::Green)?;
                } else {
                    self.notice(&format!("No anime with ID {id}."), Color::Yellow)?;
                }
                Ok(Flow::Continue)
            }
            MenuChoice::Delete => {
                let Some(id) = self.prompt_parsed("Enter ID: ", parse_id)? else {
                    return Ok(Flow::Exit);
                };
                if self.store.delete(id)? {
                    self.notice(&format!("Deleted anime {id}."), Color::Green)?;
                } else {
                    self.notice(&format!("No anime with ID {id}."), Color::Yellow)?;
                }
                Ok(Flow::Continue)
            }
            MenuChoice::Quit => Ok(Flow::Exit),
        }
    }

    fn add(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt("Enter name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(sport) = self.prompt("Enter type of sport: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(finished) = self.prompt("Is the anime finished? [y/n]: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(rating) = self.prompt_parsed("Enter rating: ", parse_rating)? else {
            return Ok(Flow::Exit);
        };

        let anime = self.store.insert(NewAnime::new(
            name,
            normalize_category(&sport),
            parse_yes_no(&finished),
            rating,
        ))?;
        self.notice(&format!("Added {} with ID {}.", anime.name, anime.id), Color::Green)?;
        Ok(Flow::Continue)
    }

    fn print_menu(&mut self) -> Result<()> {
        let heading = self.paint("Choose an action:", Color::Cyan);
        writeln!(self.output, "{heading}").context("failed to write menu")?;
        for (index, (_, label)) in MenuChoice::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {label}", index + 1).context("failed to write menu")?;
        }
        Ok(())
    }

    fn print_table(&mut self, animes: &[Anime]) -> Result<()> {
        write!(self.output, "{}", table::render(animes)).context("failed to write table")
    }

    /// Print `label` and read one line. `None` means the input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}").context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            writeln!(self.output).context("failed to write prompt")?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Prompt until `parse` accepts the answer or the input runs out.
    fn prompt_parsed<T>(
        &mut self,
        label: &str,
        parse: fn(&str) -> Result<T, InputError>,
    ) -> Result<Option<T>> {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => self.warn(&err.to_string())?,
            }
        }
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        debug!("rejected input: {message}");
        self.notice(message, Color::Red)
    }

    fn notice(&mut self, message: &str, color: Color) -> Result<()> {
        let painted = self.paint(message, color);
        writeln!(self.output, "\n{painted}\n").context("failed to write message")
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.styled {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }
}
