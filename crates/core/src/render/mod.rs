use std::fmt;

use crate::record::{BookRecord, RecordId};

/// Aggregates over the year column. Year aggregates are `None` for an empty
/// library and display as `N/A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub average_year: Option<i64>,
    pub min_year: Option<i64>,
    pub max_year: Option<i64>,
}

impl Stats {
    /// Formats a year aggregate, `N/A` when absent.
    pub fn display_year(value: Option<i64>) -> String {
        value.map_or_else(|| "N/A".to_string(), |year| year.to_string())
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total: {}  average year: {}  oldest: {}  newest: {}",
            self.total,
            Self::display_year(self.average_year),
            Self::display_year(self.min_year),
            Self::display_year(self.max_year),
        )
    }
}

/// One displayed row. `id` is what the row's delete control acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRow {
    /// 1-based position in the list at render time.
    pub number: usize,
    pub id: RecordId,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LibraryView {
    pub rows: Vec<LibraryRow>,
    pub stats: Stats,
}

impl fmt::Display for LibraryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(
                f,
                "{:>3}  {:<17} {:<30} {:<24} {:>6}  [{}]",
                row.number, row.isbn, row.title, row.author, row.year, row.id
            )?;
        }
        write!(f, "{}", self.stats)
    }
}

/// Projects the record list into rows plus statistics. Holds the most
/// recent view so hosts can redraw without re-deriving it.
#[derive(Debug, Default)]
pub struct LibraryRenderer {
    view: LibraryView,
    renders: u64,
}

impl LibraryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, records: &[BookRecord]) -> &LibraryView {
        let rows = records
            .iter()
            .enumerate()
            .map(|(index, record)| LibraryRow {
                number: index + 1,
                id: record.id,
                isbn: record.isbn.clone(),
                title: record.title.clone(),
                author: record.author.clone(),
                year: record.year,
            })
            .collect();

        self.view = LibraryView {
            rows,
            stats: compute_stats(records),
        };
        self.renders += 1;
        &self.view
    }

    /// The view produced by the last render.
    pub fn view(&self) -> &LibraryView {
        &self.view
    }

    /// Number of times [`render`](Self::render) has run.
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

/// Count plus rounded average, minimum and maximum year.
pub fn compute_stats(records: &[BookRecord]) -> Stats {
    let total = records.len();
    if total == 0 {
        return Stats::default();
    }

    let sum: i128 = records.iter().map(|record| record.year as i128).sum();
    let average = (sum as f64 / total as f64).round() as i64;

    Stats {
        total,
        average_year: Some(average),
        min_year: records.iter().map(|record| record.year).min(),
        max_year: records.iter().map(|record| record.year).max(),
    }
}
