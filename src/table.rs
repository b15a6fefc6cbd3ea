//! Plain-text table rendering for anime listings.
//!
//! Rendering is a pure function of the rows handed in: nothing is cached
//! between calls, and column widths are derived from the displayed rows.

use crate::models::Anime;

/// Header labels, in column order.
const HEADERS: [&str; 6] = ["ID", "Name", "Sport", "Finished Airing", "Rating", "Seen"];

/// Names shorter than this never widen the name column.
const NAME_MIN_LEN: usize = 4;
/// Categories shorter than this never widen the sport column.
const CATEGORY_MIN_LEN: usize = 5;

const ID_WIDTH: usize = 3;
const FINISHED_WIDTH: usize = 15;
const RATING_WIDTH: usize = 6;
const WATCHED_WIDTH: usize = 4;

/// Digits printed after the decimal point for ratings.
const RATING_PRECISION: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

/// Integer and float columns hug the right edge, text hugs the left.
const COLUMN_ALIGN: [Align; 6] = [
    Align::Right,
    Align::Left,
    Align::Left,
    Align::Right,
    Align::Right,
    Align::Right,
];

/// Content width of each column, excluding the one-space padding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColumnWidths {
    pub id: usize,
    pub name: usize,
    pub category: usize,
    pub finished: usize,
    pub rating: usize,
    pub watched: usize,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self {
            id: ID_WIDTH,
            name: NAME_MIN_LEN,
            category: CATEGORY_MIN_LEN,
            finished: FINISHED_WIDTH,
            rating: RATING_WIDTH,
            watched: WATCHED_WIDTH,
        }
    }
}

impl ColumnWidths {
    /// Widths for the given rows.
    pub fn for_records(records: &[Anime]) -> Self {
        Self::from_columns(
            records.iter().map(|anime| anime.name.as_str()),
            records.iter().map(|anime| anime.category.as_str()),
        )
    }

    /// Widths from arbitrary name and category columns. The name (category)
    /// column takes the longest value of at least 4 (5) characters. Both
    /// columns keep their defaults unless each of them has a qualifying value.
    pub fn from_columns<'a>(
        names: impl IntoIterator<Item = &'a str>,
        categories: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        match (
            widest(names, NAME_MIN_LEN),
            widest(categories, CATEGORY_MIN_LEN),
        ) {
            (Some(name), Some(category)) => Self {
                name,
                category,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    fn as_array(&self) -> [usize; 6] {
        [
            self.id,
            self.name,
            self.category,
            self.finished,
            self.rating,
            self.watched,
        ]
    }
}

fn widest<'a>(values: impl IntoIterator<Item = &'a str>, min_len: usize) -> Option<usize> {
    values
        .into_iter()
        .map(|value| value.chars().count())
        .filter(|&len| len >= min_len)
        .max()
}

/// Render `records` as a bordered table sized to fit them.
pub fn render(records: &[Anime]) -> String {
    render_with_widths(records, ColumnWidths::for_records(records))
}

/// Render `records` using explicit column widths. Cells longer than their
/// column wrap onto continuation lines.
pub fn render_with_widths(records: &[Anime], widths: ColumnWidths) -> String {
    let widths = widths.as_array();
    let mut out = String::new();

    push_rule(&mut out, &widths, '-');
    push_row(&mut out, &widths, &HEADERS.map(String::from), &[Align::Center; 6]);

    push_rule(&mut out, &widths, '=');
    if records.is_empty() {
        push_rule(&mut out, &widths, '-');
        return out;
    }

    for anime in records {
        push_row(&mut out, &widths, &cells(anime), &COLUMN_ALIGN);
        push_rule(&mut out, &widths, '-');
    }
    out
}

fn cells(anime: &Anime) -> [String; 6] {
    [
        anime.id.to_string(),
        anime.name.clone(),
        anime.category.clone(),
        u8::from(anime.finished).to_string(),
        format!("{:.*}", RATING_PRECISION, anime.rating),
        u8::from(anime.watched).to_string(),
    ]
}

fn push_rule(out: &mut String, widths: &[usize; 6], fill: char) {
    out.push('+');
    for &width in widths {
        out.extend(std::iter::repeat(fill).take(width + 2));
        out.push('+');
    }
    out.push('\n');
}

fn push_row(out: &mut String, widths: &[usize; 6], cells: &[String; 6], align: &[Align; 6]) {
    let wrapped: Vec<Vec<String>> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| wrap(cell, width))
        .collect();
    let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

    for line in 0..height {
        out.push('|');
        for (column, lines) in wrapped.iter().enumerate() {
            let text = lines.get(line).map(String::as_str).unwrap_or("");
            out.push(' ');
            out.push_str(&pad(text, widths[column], align[column]));
            out.push_str(" |");
        }
        out.push('\n');
    }
}

/// Greedy word wrap; words longer than `width` are split mid-word.
fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.chars().count() <= width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        if current_len > 0 && current_len + 1 + chars.len() <= width {
            current.push(' ');
            current.extend(&chars);
            current_len += 1 + chars.len();
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        while chars.len() > width {
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        current_len = chars.len();
        current = chars.into_iter().collect();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let gap = width.saturating_sub(text.chars().count());
    let (left, right) = match align {
        Align::Left => (0, gap),
        Align::Right => (gap, 0),
        Align::Center => (gap / 2, gap - gap / 2),
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}
