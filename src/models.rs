//! Domain models that mirror the SQLite schema. They stay plain data holders
//! so the store can focus on queries and the table renderer on layout.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
/// One tracked anime title, exactly as stored in the `anime` table.
pub struct Anime {
    /// Auto-incremented primary key. Never reused after a delete.
    pub id: i64,
    /// Title as typed by the user.
    pub name: String,
    /// Free-text category ("sport"), lower-cased before it reaches the store
    /// so equality filtering behaves case-insensitively for the user.
    pub category: String,
    /// Whether the series has finished airing.
    pub finished: bool,
    pub rating: f64,
    /// Flips from `false` to `true` once and stays there.
    pub watched: bool,
}

impl fmt::Display for Anime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Payload for inserting a new title. The id is assigned by SQLite and
/// `watched` starts out false unless overridden.
pub struct NewAnime {
    pub name: String,
    pub category: String,
    pub finished: bool,
    pub rating: f64,
    pub watched: bool,
}

impl NewAnime {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        finished: bool,
        rating: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            finished,
            rating,
            watched: false,
        }
    }

    /// Override the initial watched flag (imports of titles already seen).
    pub fn watched(mut self, watched: bool) -> Self {
        self.watched = watched;
        self
    }

    /// Attach the id SQLite handed out and produce the stored record.
    pub(crate) fn into_anime(self, id: i64) -> Anime {
        Anime {
            id,
            name: self.name,
            category: self.category,
            finished: self.finished,
            rating: self.rating,
            watched: self.watched,
        }
    }
}
