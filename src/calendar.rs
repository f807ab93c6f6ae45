use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::warn;

/// Display format of week dates, e.g. `01.09.24`.
pub const WEEK_DATE_FORMAT: &str = "%d.%m.%y";

/// Two-digit years are read relative to this century.
const CENTURY_BASE: i32 = 2000;

/// One calendar week of a turn. `date` marks the first school day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    #[serde(default)]
    pub label: String,
    pub date: String,
    #[serde(default, alias = "isHoliday")]
    pub is_holiday: bool,
}

impl Week {
    pub fn new(label: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            date: date.into(),
            is_holiday: false,
        }
    }

    pub fn holiday(label: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            is_holiday: true,
            ..Self::new(label, date)
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_week_date(&self.date)
    }
}

/// Parses `day.month.year`. A year below 100 is taken as `2000 + year`.
/// Returns `None` for non-numeric components or dates that do not exist.
pub fn parse_week_date(input: &str) -> Option<NaiveDate> {
    let mut parts = input.trim().split('.');
    let day = parse_component(parts.next()?)?;
    let month = parse_component(parts.next()?)?;
    let year = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }

    let year = i32::try_from(year).ok()?;
    let year = if year < 100 { CENTURY_BASE + year } else { year };
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

fn parse_component(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

pub fn format_week_date(date: NaiveDate) -> String {
    date.format(WEEK_DATE_FORMAT).to_string()
}

/// Parsed dates ascend; unparseable dates sort after every parsed date and
/// compare equal to each other, so a stable sort keeps their input order.
fn compare_week_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Date window of one turn after holiday weeks have been removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub week_count: usize,
    /// Active weeks in chronological order.
    pub weeks: Vec<Week>,
}

impl TurnWindow {
    pub fn empty() -> Self {
        Self {
            start: None,
            end: None,
            week_count: 0,
            weeks: Vec::new(),
        }
    }

    /// True when the turn has no active weeks left after holiday filtering.
    pub fn is_empty(&self) -> bool {
        self.week_count == 0
    }

    /// Column header such as `01.09.24 – 15.09.24`; `—` when nothing is known.
    pub fn label(&self) -> String {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start == end => format_week_date(start),
            (Some(start), Some(end)) => {
                format!("{} – {}", format_week_date(start), format_week_date(end))
            }
            _ => "—".to_string(),
        }
    }

    /// Whether `date` falls between the first day of the first week and the
    /// last day of the last week.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end + Duration::days(6),
            _ => false,
        }
    }

    /// Active weeks that have not ended yet on `on`. Weeks with an
    /// unparseable date are not counted.
    pub fn remaining_weeks(&self, on: NaiveDate) -> usize {
        self.weeks
            .iter()
            .filter_map(Week::parsed_date)
            .filter(|date| *date + Duration::days(6) >= on)
            .count()
    }
}

/// Drops holiday weeks, sorts the rest by date and derives the window.
pub fn resolve_turn(weeks: &[Week]) -> TurnWindow {
    let mut active: Vec<(Option<NaiveDate>, &Week)> = weeks
        .iter()
        .filter(|week| !week.is_holiday)
        .map(|week| {
            let parsed = week.parsed_date();
            if parsed.is_none() {
                warn!(date = %week.date, label = %week.label, "unparseable week date");
            }
            (parsed, week)
        })
        .collect();

    if active.is_empty() {
        return TurnWindow::empty();
    }

    active.sort_by(|a, b| compare_week_dates(a.0, b.0));

    let start = active.iter().find_map(|(date, _)| *date);
    let end = active.iter().rev().find_map(|(date, _)| *date);

    TurnWindow {
        start,
        end,
        week_count: active.len(),
        weeks: active.into_iter().map(|(_, week)| week.clone()).collect(),
    }
}

/// A turn resolved against its position in the ordered calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTurn {
    pub index: usize,
    pub key: String,
    pub window: TurnWindow,
}

/// All turns of a school year, keyed by name (`TURNUS1`, `TURNUS2`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnCalendar {
    turns: BTreeMap<String, Vec<Week>>,
}

impl TurnCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, weeks: Vec<Week>) -> Option<Vec<Week>> {
        self.turns.insert(key.into(), weeks)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turn keys in processing order. A trailing number is compared
    /// numerically so `TURNUS2` comes before `TURNUS10`.
    pub fn ordered_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.turns.keys().map(String::as_str).collect();
        keys.sort_by(|a, b| turn_sort_key(a).cmp(&turn_sort_key(b)));
        keys
    }

    pub fn turn_index(&self, key: &str) -> Option<usize> {
        self.ordered_keys().iter().position(|candidate| *candidate == key)
    }

    pub fn resolve(&self, key: &str) -> Option<ResolvedTurn> {
        let index = self.turn_index(key)?;
        let weeks = self.turns.get(key)?;
        Some(ResolvedTurn {
            index,
            key: key.to_string(),
            window: resolve_turn(weeks),
        })
    }

    pub fn ordered_turns(&self) -> Vec<ResolvedTurn> {
        self.ordered_keys()
            .into_iter()
            .enumerate()
            .map(|(index, key)| ResolvedTurn {
                index,
                key: key.to_string(),
                window: resolve_turn(&self.turns[key]),
            })
            .collect()
    }

    /// The first turn (in order) whose window covers `date`.
    pub fn current_turn(&self, date: NaiveDate) -> Option<ResolvedTurn> {
        self.ordered_turns()
            .into_iter()
            .find(|turn| turn.window.contains(date))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Week>)> {
        self.turns.iter()
    }
}

impl FromIterator<(String, Vec<Week>)> for TurnCalendar {
    fn from_iter<T: IntoIterator<Item = (String, Vec<Week>)>>(iter: T) -> Self {
        Self {
            turns: iter.into_iter().collect(),
        }
    }
}

fn turn_sort_key(key: &str) -> (&str, Option<u64>, &str) {
    let prefix = key.trim_end_matches(|c: char| c.is_ascii_digit());
    let number = key[prefix.len()..].parse::<u64>().ok();
    (prefix, number, key)
}
