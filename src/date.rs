//! Calendar dates attached to sources and the ranges aggregated from them
//!
//! Dates from different calendars are compared through their Julian Day
//! Number. A partial date (year, or year and month) covers the whole year or
//! month: its start is the first day and its end the last day of that span.

use core::cmp::Ordering;
use core::fmt;

pub mod format;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Calendar {
  Gregorian,
  Julian,
}

impl Default for Calendar {
  fn default() -> Self {
    Self::Gregorian
  }
}

impl fmt::Display for Calendar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Gregorian => f.write_str("gregorian"),
      Self::Julian => f.write_str("julian"),
    }
  }
}

impl Calendar {
  pub fn is_leap_year(self, year: i32) -> bool {
    match self {
      Self::Gregorian => ((year % 4 == 0) && (year % 100 != 0)) || (year % 400 == 0),
      Self::Julian => year % 4 == 0,
    }
  }

  pub fn days_in_month(self, year: i32, month: u32) -> u32 {
    match month {
      4 | 6 | 9 | 11 => 30,
      2 if self.is_leap_year(year) => 29,
      2 => 28,
      _ => 31,
    }
  }

  /// Julian Day Number of a (proleptic) calendar date
  pub fn julian_day(self, year: i32, month: u32, day: u32) -> i64 {
    let (year, month, day) = (i64::from(year), i64::from(month), i64::from(day));
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    let common = day + (153 * m + 2) / 5 + 365 * y + y / 4;
    match self {
      Self::Gregorian => common - y / 100 + y / 400 - 32045,
      Self::Julian => common - 32083,
    }
  }
}

/// One end of a date: the calendar date as written plus its day number
#[derive(Clone, Debug)]
pub struct DatePoint {
  julian_day: i64,
  calendar: Calendar,
  year: i32,
  month: Option<u32>,
  day: Option<u32>,
}

impl DatePoint {
  /// First day covered by a (possibly partial) date
  pub fn first(calendar: Calendar, year: i32, month: Option<u32>, day: Option<u32>) -> Self {
    let julian_day = calendar.julian_day(year, month.unwrap_or(1), day.unwrap_or(1));
    Self {
      julian_day,
      calendar,
      year,
      month,
      day,
    }
  }

  /// Last day covered by a (possibly partial) date
  pub fn last(calendar: Calendar, year: i32, month: Option<u32>, day: Option<u32>) -> Self {
    let m = month.unwrap_or(12);
    let d = day.unwrap_or_else(|| calendar.days_in_month(year, m));
    Self {
      julian_day: calendar.julian_day(year, m, d),
      calendar,
      year,
      month,
      day,
    }
  }

  /// The same date as written, taken as its first day
  pub fn as_first(&self) -> Self {
    Self::first(self.calendar, self.year, self.month, self.day)
  }

  /// The same date as written, taken as its last day
  pub fn as_last(&self) -> Self {
    Self::last(self.calendar, self.year, self.month, self.day)
  }

  pub fn julian_day(&self) -> i64 {
    self.julian_day
  }

  pub fn calendar(&self) -> Calendar {
    self.calendar
  }

  pub fn year(&self) -> i32 {
    self.year
  }

  pub fn month(&self) -> Option<u32> {
    self.month
  }

  pub fn day(&self) -> Option<u32> {
    self.day
  }

  /// ISO8601 rendering with the precision the date was given with
  pub fn iso(&self) -> String {
    match (self.month, self.day) {
      (Some(m), Some(d)) => format!("{:04}-{m:02}-{d:02}", self.year),
      (Some(m), None) => format!("{:04}-{m:02}", self.year),
      _ => format!("{:04}", self.year),
    }
  }
}

impl PartialEq for DatePoint {
  fn eq(&self, other: &Self) -> bool {
    self.julian_day == other.julian_day
  }
}

impl Eq for DatePoint {}

impl PartialOrd for DatePoint {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for DatePoint {
  fn cmp(&self, other: &Self) -> Ordering {
    self.julian_day.cmp(&other.julian_day)
  }
}

impl fmt::Display for DatePoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.iso())?;
    if self.calendar == Calendar::Julian {
      f.write_str(" (julian)")?;
    }
    Ok(())
  }
}

/// A single date value found on a source. Exact days have `start == end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceDate {
  pub start: DatePoint,
  pub end: DatePoint,
}

impl SourceDate {
  pub fn new(start: DatePoint, end: DatePoint) -> Self {
    // Periods written backwards cover from the first day of the earlier
    // point to the last day of the later one
    if end < start.as_first() {
      Self {
        start: end.as_first(),
        end: start.as_last(),
      }
    } else {
      Self { start, end }
    }
  }

  /// A year, month or day in one calendar
  pub fn point(calendar: Calendar, year: i32, month: Option<u32>, day: Option<u32>) -> Self {
    Self {
      start: DatePoint::first(calendar, year, month, day),
      end: DatePoint::last(calendar, year, month, day),
    }
  }

  pub fn year(year: i32) -> Self {
    Self::point(Calendar::Gregorian, year, None, None)
  }
}

/// Smallest range covering a set of dates
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
  min: DatePoint,
  max: DatePoint,
}

impl DateRange {
  pub fn new(min: DatePoint, max: DatePoint) -> Self {
    Self { min, max }
  }

  pub fn years(from: i32, to: i32) -> Self {
    Self::new(
      DatePoint::first(Calendar::Gregorian, from, None, None),
      DatePoint::last(Calendar::Gregorian, to, None, None),
    )
  }

  pub fn min(&self) -> &DatePoint {
    &self.min
  }

  pub fn max(&self) -> &DatePoint {
    &self.max
  }

  /// Range of the dates of one source, `None` for an undated source
  pub fn from_dates<'a>(dates: impl IntoIterator<Item = &'a SourceDate>) -> Option<Self> {
    Self::reduce(dates.into_iter().map(|d| Self::new(d.start.clone(), d.end.clone())))
  }

  /// Smallest minimum and largest maximum over `ranges`. An empty input has
  /// no range at all.
  pub fn reduce(ranges: impl IntoIterator<Item = DateRange>) -> Option<Self> {
    ranges.into_iter().reduce(|acc, r| acc.merge(r))
  }

  pub fn merge(self, other: DateRange) -> Self {
    Self {
      min: self.min.min(other.min),
      max: self.max.max(other.max),
    }
  }

  /// ISO8601 interval as used for EAD `normal` attributes
  pub fn iso(&self) -> String {
    format!("{}/{}", self.min.iso(), self.max.iso())
  }
}

impl fmt::Display for DateRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let min = self.min.to_string();
    let max = self.max.to_string();
    if min == max {
      f.write_str(&min)
    } else {
      write!(f, "{min} - {max}")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn julian_day_numbers() {
    // 2000-01-01 Gregorian
    assert_eq!(Calendar::Gregorian.julian_day(2000, 1, 1), 2_451_545);
    // Calendar reform: 4 Oct 1582 Julian is followed by 15 Oct 1582 Gregorian
    assert_eq!(
      Calendar::Julian.julian_day(1582, 10, 4) + 1,
      Calendar::Gregorian.julian_day(1582, 10, 15)
    );
  }

  #[test]
  fn partial_dates_cover_their_span() {
    let d = SourceDate::point(Calendar::Gregorian, 1900, Some(2), None);
    assert_eq!(d.end.julian_day() - d.start.julian_day(), 27);
    let leap = SourceDate::point(Calendar::Gregorian, 2000, Some(2), None);
    assert_eq!(leap.end.julian_day() - leap.start.julian_day(), 28);
    assert_eq!(d.start.iso(), "1900-02");
  }

  #[test]
  fn calendars_compare_by_day() {
    let julian = DatePoint::first(Calendar::Julian, 1700, Some(3), Some(1));
    let gregorian = DatePoint::first(Calendar::Gregorian, 1700, Some(3), Some(1));
    assert!(gregorian < julian);
  }

  #[test]
  fn reduce_takes_extremes() {
    let range = DateRange::reduce(vec![
      DateRange::years(1905, 1910),
      DateRange::years(1890, 1900),
      DateRange::years(1901, 1902),
    ])
    .unwrap();
    assert_eq!(range, DateRange::years(1890, 1910));
    assert_eq!(range.to_string(), "1890 - 1910");
    assert_eq!(range.iso(), "1890/1910");
  }

  #[test]
  fn reduce_of_nothing_is_none() {
    assert_eq!(DateRange::reduce(Vec::new()), None);
    assert_eq!(DateRange::from_dates(&[]), None);
  }

  #[test]
  fn single_year_displays_once() {
    let range = DateRange::from_dates(&[SourceDate::year(1900)]).unwrap();
    assert_eq!(range.to_string(), "1900");
  }

  #[test]
  fn backwards_period_is_swapped() {
    let d = SourceDate::new(
      DatePoint::first(Calendar::Gregorian, 1910, None, None),
      DatePoint::last(Calendar::Gregorian, 1900, None, None),
    );
    assert_eq!(d.start.year(), 1900);
    assert_eq!(d.start, DatePoint::first(Calendar::Gregorian, 1900, None, None));
    assert_eq!(d.end, DatePoint::last(Calendar::Gregorian, 1910, None, None));
  }

  #[test]
  fn overlapping_period_is_kept() {
    let d = SourceDate::new(
      DatePoint::first(Calendar::Gregorian, 1910, Some(5), None),
      DatePoint::last(Calendar::Gregorian, 1910, None, None),
    );
    assert_eq!(d.start.julian_day(), Calendar::Gregorian.julian_day(1910, 5, 1));
    assert_eq!(d.end.julian_day(), Calendar::Gregorian.julian_day(1910, 12, 31));
  }

  #[test]
  fn backwards_period_keeps_month_precision() {
    let d = SourceDate::new(
      DatePoint::first(Calendar::Gregorian, 1910, Some(5), None),
      DatePoint::last(Calendar::Gregorian, 1910, Some(2), None),
    );
    assert_eq!(d.start.julian_day(), Calendar::Gregorian.julian_day(1910, 2, 1));
    assert_eq!(d.end.julian_day(), Calendar::Gregorian.julian_day(1910, 5, 31));
  }
}
