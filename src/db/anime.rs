use anyhow::{Context, Result};
use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;
use rusqlite::{params, OptionalExtension, Row};

use super::connection::Store;
use crate::models::{Anime, NewAnime};

/// Column list shared by every full-row query so `anime_from_row` can rely on
/// positional indexes.
const ANIME_COLUMNS: &str = "id, name, category, finished, rating, watched";

/// SQLite stores a NaN rating as NULL, so NULL reads back as NaN.
fn anime_from_row(row: &Row<'_>) -> rusqlite::Result<Anime> {
    Ok(Anime {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        finished: row.get(3)?,
        rating: row.get::<_, Option<f64>>(4)?.unwrap_or(f64::NAN),
        watched: row.get(5)?,
    })
}

impl Store {
    /// Insert a new title, returning the hydrated record. Nothing is
    /// validated here: blank names and any rating are stored as given.
    pub fn insert(&self, anime: NewAnime) -> Result<Anime> {
        self.conn
            .execute(
                "INSERT INTO anime (name, category, finished, rating, watched)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    anime.name,
                    anime.category,
                    anime.finished,
                    anime.rating,
                    anime.watched
                ],
            )
            .context("failed to insert anime")?;

        let anime = anime.into_anime(self.conn.last_insert_rowid());
        debug!("inserted anime {anime}");
        Ok(anime)
    }

    /// Remove a title. Returns `false` when no row had that id.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM anime WHERE id = ?1", params![id])
            .context("failed to delete anime")?;

        debug!("delete anime {id}: {deleted} row(s)");
        Ok(deleted > 0)
    }

    /// Flag a title as watched. Returns `false` when no row had that id;
    /// marking an already watched title again still reports `true`.
    pub fn mark_watched(&self, id: i64) -> Result<bool> {
        let updated = self
            .conn
            .execute("UPDATE anime SET watched = 1 WHERE id = ?1", params![id])
            .context("failed to mark anime as watched")?;

        debug!("mark anime {id} watched: {updated} row(s)");
        Ok(updated > 0)
    }

    /// Every stored title in insertion order.
    pub fn select_all(&self) -> Result<Vec<Anime>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ANIME_COLUMNS} FROM anime ORDER BY id"))
            .context("failed to prepare anime query")?;

        let animes = stmt
            .query_map([], anime_from_row)
            .context("failed to load anime")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect anime")?;

        Ok(animes)
    }

    /// Titles whose category equals `category` exactly. Stored categories are
    /// lower-case, so callers should lower-case the filter term first.
    pub fn select_by_category(&self, category: &str) -> Result<Vec<Anime>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {ANIME_COLUMNS} FROM anime WHERE category = ?1 ORDER BY id"
            ))
            .context("failed to prepare category query")?;

        let animes = stmt
            .query_map(params![category], anime_from_row)
            .context("failed to filter anime by category")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect anime by category")?;

        debug!("category {category:?}: {} match(es)", animes.len());
        Ok(animes)
    }

    /// Ids of titles that finished airing and have not been watched yet.
    pub fn eligible_ids(&self) -> Result<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM anime WHERE watched = 0 AND finished = 1 ORDER BY id")
            .context("failed to prepare eligible id query")?;

        let ids = stmt
            .query_map([], |row| row.get(0))
            .context("failed to load eligible ids")?
            .collect::<Result<Vec<i64>, _>>()
            .context("failed to collect eligible ids")?;

        Ok(ids)
    }

    /// Pick one finished, unwatched title uniformly at random.
    pub fn select_random_unwatched_finished(&self) -> Result<Option<Anime>> {
        self.select_random_unwatched_finished_with(&mut rand::rng())
    }

    /// Same as [`Store::select_random_unwatched_finished`] with a caller
    /// supplied generator.
    ///
    /// The draw is made over the id set read first; the follow-up fetch
    /// re-checks the predicate, so a row that stopped qualifying in between
    /// yields `None` rather than an ineligible title.
    pub fn select_random_unwatched_finished_with<R>(&self, rng: &mut R) -> Result<Option<Anime>>
    where
        R: Rng + ?Sized,
    {
        let ids = self.eligible_ids()?;
        let Some(&id) = ids.choose(rng) else {
            debug!("no eligible anime for random pick");
            return Ok(None);
        };

        debug!("picked anime {id} out of {} candidate(s)", ids.len());
        self.conn
            .query_row(
                &format!(
                    "SELECT {ANIME_COLUMNS} FROM anime
                     WHERE watched = 0 AND finished = 1 AND id = ?1"
                ),
                params![id],
                anime_from_row,
            )
            .optional()
            .context("failed to fetch random anime")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn store() -> Store {
        Store::open_in_memory().unwrap()
    }

    #[test]
    fn insert_preserves_fields_and_defaults_watched() {
        let store = store();
        let inserted = store
            .insert(NewAnime::new("Haikyuu", "volleyball", true, 9.0))
            .unwrap();

        assert_eq!(inserted.id, 1);
        assert!(!inserted.watched);
        assert_eq!(store.select_all().unwrap(), vec![inserted]);
    }

    #[test]
    fn insert_accepts_blank_name_and_odd_rating() {
        let store = store();
        store.insert(NewAnime::new("", "", false, -42.5)).unwrap();

        let all = store.select_all().unwrap();
        assert_eq!(all[0].name, "");
        assert_eq!(all[0].rating, -42.5);
    }

    #[test]
    fn nan_rating_reads_back_as_nan() {
        let store = store();
        store.insert(NewAnime::new("Monster", "boxing", true, f64::NAN)).unwrap();
        store.insert(NewAnime::new("Ippo", "boxing", true, 9.0)).unwrap();

        let all = store.select_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].rating.is_nan());
        assert_eq!(all[1].rating, 9.0);

        let boxing = store.select_by_category("boxing").unwrap();
        assert!(boxing[0].rating.is_nan());

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            let picked = store
                .select_random_unwatched_finished_with(&mut rng)
                .unwrap();
            assert!(picked.is_some());
        }
    }

    #[test]
    fn watched_override_is_stored() {
        let store = store();
        let anime = store
            .insert(NewAnime::new("Slam Dunk", "basketball", true, 8.5).watched(true))
            .unwrap();
        assert!(store.select_all().unwrap()[0].watched);
        assert!(anime.watched);
    }

    #[test]
    fn haikyuu_lifecycle() {
        let store = store();
        store
            .insert(NewAnime::new("Haikyuu", "volleyball", true, 9.0))
            .unwrap();

        let row = &store.select_all().unwrap()[0];
        assert_eq!(
            (row.id, row.name.as_str(), row.category.as_str(), row.finished, row.rating, row.watched),
            (1, "Haikyuu", "volleyball", true, 9.0, false)
        );

        assert!(store.mark_watched(1).unwrap());
        assert!(store.select_all().unwrap()[0].watched);

        assert!(store.delete(1).unwrap());
        assert!(store.select_all().unwrap().is_empty());
    }

    #[test]
    fn delete_missing_id_is_a_noop() {
        let store = store();
        store.insert(NewAnime::new("Ping Pong", "table tennis", true, 9.1)).unwrap();
        let before = store.select_all().unwrap();

        assert!(!store.delete(99).unwrap());
        assert_eq!(store.select_all().unwrap(), before);
    }

    #[test]
    fn mark_watched_is_idempotent() {
        let store = store();
        store.insert(NewAnime::new("Yowamushi Pedal", "cycling", true, 7.8)).unwrap();

        assert!(store.mark_watched(1).unwrap());
        let once = store.select_all().unwrap();
        assert!(store.mark_watched(1).unwrap());
        assert_eq!(store.select_all().unwrap(), once);
        assert!(!store.mark_watched(2).unwrap());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = store();
        store.insert(NewAnime::new("A", "x", true, 1.0)).unwrap();
        let second = store.insert(NewAnime::new("B", "x", true, 1.0)).unwrap();
        store.delete(second.id).unwrap();

        let third = store.insert(NewAnime::new("C", "x", true, 1.0)).unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn select_by_category_matches_exactly_in_insertion_order() {
        let store = store();
        store.insert(NewAnime::new("Captain Tsubasa", "soccer", true, 7.0)).unwrap();
        store.insert(NewAnime::new("Prince of Tennis", "tennis", true, 7.5)).unwrap();
        store.insert(NewAnime::new("Blue Lock", "soccer", false, 8.0)).unwrap();
        store.insert(NewAnime::new("Aoashi", "Soccer", true, 8.2)).unwrap();

        let names: Vec<_> = store
            .select_by_category("soccer")
            .unwrap()
            .into_iter()
            .map(|anime| anime.name)
            .collect();
        assert_eq!(names, ["Captain Tsubasa", "Blue Lock"]);
        assert!(store.select_by_category("baseball").unwrap().is_empty());
    }

    #[test]
    fn random_pick_without_candidates_is_none() {
        let store = store();
        assert_eq!(store.select_random_unwatched_finished().unwrap(), None);

        store.insert(NewAnime::new("Airing", "boxing", false, 6.0)).unwrap();
        let seen = store.insert(NewAnime::new("Seen", "boxing", true, 6.0)).unwrap();
        store.mark_watched(seen.id).unwrap();

        assert!(store.eligible_ids().unwrap().is_empty());
        assert_eq!(store.select_random_unwatched_finished().unwrap(), None);
    }

    #[test]
    fn random_pick_only_returns_eligible_rows() {
        let store = store();
        store.insert(NewAnime::new("Airing", "boxing", false, 6.0)).unwrap();
        let eligible = store.insert(NewAnime::new("Hajime no Ippo", "boxing", true, 9.0)).unwrap();
        let seen = store.insert(NewAnime::new("Seen", "boxing", true, 6.0)).unwrap();
        store.mark_watched(seen.id).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked = store
                .select_random_unwatched_finished_with(&mut rng)
                .unwrap()
                .unwrap();
            assert_eq!(picked, eligible);
        }
    }

    #[test]
    fn random_pick_is_roughly_uniform() {
        let store = store();
        for name in ["One", "Two", "Three", "Four"] {
            store.insert(NewAnime::new(name, "sumo", true, 5.0)).unwrap();
        }

        let trials = 4_000;
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for _ in 0..trials {
            let picked = store
                .select_random_unwatched_finished_with(&mut rng)
                .unwrap()
                .unwrap();
            *counts.entry(picked.id).or_default() += 1;
        }

        assert_eq!(counts.len(), 4);
        for count in counts.values() {
            assert!((800..=1200).contains(count), "skewed count {count}");
        }
    }
}
