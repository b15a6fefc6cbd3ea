//! Coercion of raw prompt answers into typed values.

use crate::error::InputError;

/// Entries of the numbered main menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    ViewAll,
    FilterBySport,
    PickRandom,
    MarkSeen,
    Delete,
    Quit,
}

impl MenuChoice {
    /// Menu entries in display order, paired with their labels.
    pub const ALL: [(MenuChoice, &'static str); 7] = [
        (MenuChoice::Add, "Add anime"),
        (MenuChoice::ViewAll, "View all animes"),
        (MenuChoice::FilterBySport, "Filter animes by sport"),
        (MenuChoice::PickRandom, "Choose random anime to watch"),
        (MenuChoice::MarkSeen, "Mark anime as seen"),
        (MenuChoice::Delete, "Delete anime"),
        (MenuChoice::Quit, "Quit"),
    ];

    pub fn parse(raw: &str) -> Result<Self, InputError> {
        match raw.trim() {
            "1" => Ok(MenuChoice::Add),
            "2" => Ok(MenuChoice::ViewAll),
            "3" => Ok(MenuChoice::FilterBySport),
            "4" => Ok(MenuChoice::PickRandom),
            "5" => Ok(MenuChoice::MarkSeen),
            "6" => Ok(MenuChoice::Delete),
            "7" => Ok(MenuChoice::Quit),
            other => Err(InputError::InvalidChoice(other.to_string())),
        }
    }
}

/// `y`/`yes` in any case means yes; every other answer means no.
pub fn parse_yes_no(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn parse_rating(raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| InputError::InvalidNumber(trimmed.to_string()))
}

pub fn parse_id(raw: &str) -> Result<i64, InputError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| InputError::InvalidInteger(trimmed.to_string()))
}

/// Categories are stored lower-case so filtering ignores the user's casing.
/// Nothing else about the text changes.
pub fn normalize_category(raw: &str) -> String {
    raw.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choices_map_to_numbers() {
        for (index, (choice, _)) in MenuChoice::ALL.iter().enumerate() {
            assert_eq!(MenuChoice::parse(&(index + 1).to_string()), Ok(*choice));
        }
        assert_eq!(MenuChoice::parse(" 7\n"), Ok(MenuChoice::Quit));
        assert_eq!(
            MenuChoice::parse("8"),
            Err(InputError::InvalidChoice("8".to_string()))
        );
    }

    #[test]
    fn yes_no_only_accepts_yes() {
        assert!(parse_yes_no("y"));
        assert!(parse_yes_no(" YES "));
        assert!(!parse_yes_no("n"));
        assert!(!parse_yes_no(""));
        assert!(!parse_yes_no("yep"));
    }

    #[test]
    fn ratings_and_ids_are_coerced() {
        assert_eq!(parse_rating("9"), Ok(9.0));
        assert_eq!(parse_rating(" 7.25 "), Ok(7.25));
        assert_eq!(
            parse_rating("great"),
            Err(InputError::InvalidNumber("great".to_string()))
        );
        assert_eq!(parse_id("12"), Ok(12));
        assert_eq!(
            parse_id("1.5"),
            Err(InputError::InvalidInteger("1.5".to_string()))
        );
    }

    #[test]
    fn categories_are_lower_cased() {
        assert_eq!(normalize_category("Volleyball"), "volleyball");
        assert_eq!(normalize_category(" Table Tennis "), " table tennis ");
    }
}
