use crate::domain::{DateKey, EntrySummary};
use chrono::{Datelike, NaiveDate};
use std::fmt::Write as _;

/// The month on display. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Constructors only admit valid year/month pairs.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        let first = self.first_day();
        self.next().first_day().pred_opt().unwrap_or(first)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Blank cells before day 1, Sunday first.
    pub fn leading_blanks(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        (0..self.days_in_month()).filter_map(move |i| first.checked_add_days(chrono::Days::new(i.into())))
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

/// Source of "which dates have entries" for the grid.
pub trait EntryLookup {
    fn find(&self, key: &DateKey) -> Option<&EntrySummary>;

    fn has_entry(&self, key: &DateKey) -> bool {
        self.find(key).is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub key: DateKey,
    pub day: u32,
    pub today: bool,
    pub selected: bool,
    pub has_entry: bool,
    pub glyph: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridCell {
    Blank,
    Day(DayCell),
}

/// One fully rebuilt month grid. Rendering the same inputs twice yields
/// equal grids.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub cursor: MonthCursor,
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
    pub notice: Option<String>,
}

impl MonthGrid {
    pub fn build(
        cursor: MonthCursor,
        selected: Option<DateKey>,
        today: NaiveDate,
        entries: &impl EntryLookup,
    ) -> Self {
        let days = cursor
            .days()
            .map(|date| {
                let key = DateKey::new(date);
                let entry = entries.find(&key);
                DayCell {
                    key,
                    day: date.day(),
                    today: date == today,
                    selected: selected == Some(key),
                    has_entry: entry.is_some(),
                    glyph: entry.and_then(|e| e.glyph()),
                }
            })
            .collect();

        Self {
            cursor,
            leading_blanks: cursor.leading_blanks(),
            days,
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.leading_blanks)
            .map(|_| GridCell::Blank)
            .chain(self.days.iter().cloned().map(GridCell::Day))
    }

    /// Cells chunked into Sunday-first weeks; the last week is padded with
    /// blanks.
    pub fn weeks(&self) -> Vec<Vec<GridCell>> {
        let mut cells: Vec<GridCell> = self.cells().collect();
        while cells.len() % 7 != 0 {
            cells.push(GridCell::Blank);
        }
        cells.chunks(7).map(|week| week.to_vec()).collect()
    }

    pub fn day(&self, key: &DateKey) -> Option<&DayCell> {
        self.days.iter().find(|cell| &cell.key == key)
    }

    pub fn entry_count(&self) -> usize {
        self.days.iter().filter(|cell| cell.has_entry).count()
    }
}

/// Presentation of a month grid.
pub trait CalendarRenderer {
    type Output;

    fn render(&self, grid: &MonthGrid) -> Self::Output;
}

/// Plain text month, one line per week.
///
/// Markers: `*` has entry, `[..]` selected, `(..)` today. The mood glyph
/// follows the day number.
pub struct TextRenderer;

impl CalendarRenderer for TextRenderer {
    type Output = String;

    fn render(&self, grid: &MonthGrid) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:^42}", grid.cursor.title());
        let _ = writeln!(
            out,
            "{}",
            ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
                .map(|d| format!("{d:^6}"))
                .join("")
        );

        for week in grid.weeks() {
            let line: String = week
                .iter()
                .map(|cell| match cell {
                    GridCell::Blank => " ".repeat(6),
                    GridCell::Day(day) => text_cell(day),
                })
                .collect();
            let _ = writeln!(out, "{}", line.trim_end());
        }

        if let Some(notice) = &grid.notice {
            let _ = writeln!(out, "{notice}");
        }
        out
    }
}

fn text_cell(day: &DayCell) -> String {
    let marker = if day.has_entry { "*" } else { "" };
    let number = format!("{}{}", day.day, marker);
    let number = if day.selected {
        format!("[{number}]")
    } else if day.today {
        format!("({number})")
    } else {
        number
    };
    // Glyphs are double width; keep the column at six terminal cells.
    match day.glyph {
        Some(glyph) => format!("{number:>4}{glyph}"),
        None => format!("{number:>5} "),
    }
}
