//! Date phrase parsing
//!
//! Understands GEDCOM date values (calendar escapes, `ABT`/`BEF`/`AFT`
//! qualifiers, `BET .. AND ..` ranges, `FROM .. TO ..` periods, interpreted
//! dates) as well as ISO8601 dates, ISO intervals and the ISO8601-2
//! unspecified digit notation (`199X`).

use lazy_regex::{regex_captures, regex_is_match};
use log::{trace, warn};

use super::{Calendar, DatePoint, SourceDate};
use crate::constants::{CALENDARS, MONTHS};

/// Parse a date phrase. Unparseable phrases and unsupported calendars are
/// reported and give `None`.
pub fn parse_date(input: &str) -> Option<SourceDate> {
  let input = input.trim();
  if input.is_empty() {
    return None;
  }
  trace!("Parsing date '{}'", input);
  let date = parse_iso(input).or_else(|| parse_gedcom(&input.to_uppercase()));
  if date.is_none() {
    warn!("Could not parse date '{}', ignoring", input);
  }
  date
}

fn parse_iso(input: &str) -> Option<SourceDate> {
  if let Some((start, end)) = input.split_once('/') {
    // 1900/1905, 1900-01/1900-03-12
    let start = parse_iso_point(start)?;
    let end = parse_iso_point(end)?;
    return Some(SourceDate::new(start.start, end.end));
  }
  parse_iso_point(input).or_else(|| parse_date_unspecified(input))
}

fn parse_iso_point(input: &str) -> Option<SourceDate> {
  let (_, year, month, day) = regex_captures!(r"^(-?\d{4})(?:-(\d{2})(?:-(\d{2}))?)?$", input)?;
  let year = year.parse().ok()?;
  let month = optional_number(month);
  let day = optional_number(day);
  valid_point(Calendar::Gregorian, year, month, day)
}

/// ISO8601-2 4.3 unspecified format
fn parse_date_unspecified(input: &str) -> Option<SourceDate> {
  // 199X -> 1990/1999
  if let Some((_, decade)) = regex_captures!(r"^(\d{3})X$", input) {
    let decade: i32 = decade.parse().ok()?;
    return Some(SourceDate::new(
      DatePoint::first(Calendar::Gregorian, decade * 10, None, None),
      DatePoint::last(Calendar::Gregorian, decade * 10 + 9, None, None),
    ));
  }
  // 19XX -> 1900/1999
  if let Some((_, century)) = regex_captures!(r"^(\d{2})XX$", input) {
    let century: i32 = century.parse().ok()?;
    return Some(SourceDate::new(
      DatePoint::first(Calendar::Gregorian, century * 100, None, None),
      DatePoint::last(Calendar::Gregorian, century * 100 + 99, None, None),
    ));
  }
  // 1999-XX -> 1999
  if let Some((_, year)) = regex_captures!(r"^(\d{4})-XX(?:-XX)?$", input) {
    return Some(SourceDate::year(year.parse().ok()?));
  }
  None
}

fn parse_gedcom(input: &str) -> Option<SourceDate> {
  // INT 1900 (about the turn of the century)
  let input = match regex_captures!(r"^INT\s+(.*?)\s*(?:\(.*\))?$", input) {
    Some((_, date)) => date,
    None => input,
  };
  // (free text)
  if regex_is_match!(r"^\(.*\)$", input) {
    return None;
  }
  if let Some((_, start, end)) = regex_captures!(r"^BET\s+(.+?)\s+AND\s+(.+)$", input) {
    return Some(SourceDate::new(parse_point(start)?.start, parse_point(end)?.end));
  }
  if let Some((_, start, end)) = regex_captures!(r"^FROM\s+(.+?)\s+TO\s+(.+)$", input) {
    return Some(SourceDate::new(parse_point(start)?.start, parse_point(end)?.end));
  }
  if let Some((_, date)) = regex_captures!(r"^(?:FROM|TO|BEF|AFT|ABT|CAL|EST)\s+(.+)$", input) {
    return parse_point(date);
  }
  parse_point(input)
}

/// `[@#Dcalendar@] [[day] MON] year[/yy]`
fn parse_point(input: &str) -> Option<SourceDate> {
  let (calendar, rest) = match regex_captures!(r"^(@#D[^@]+@)\s*(.*)$", input) {
    Some((_, escape, rest)) => match CALENDARS.get(escape) {
      Some(&"gregorian") => (Calendar::Gregorian, rest),
      Some(&"julian") => (Calendar::Julian, rest),
      Some(other) => {
        warn!("Dates in the {} calendar are not supported, ignoring '{}'", other, input);
        return None;
      }
      None => {
        warn!("Unknown calendar escape '{}'", escape);
        return None;
      }
    },
    None => (Calendar::Gregorian, input),
  };
  let (_, day, month, year, bc) = regex_captures!(
    r"^(?:(\d{1,2})\s+)?(?:([A-Z]{3})\s+)?(\d{1,4})(?:/\d{2})?(\s*B\.?\s?C\.?)?$",
    rest
  )?;
  let mut year: i32 = year.parse().ok()?;
  if !bc.is_empty() {
    // astronomical year numbering: 1 BC is year 0
    year = 1 - year;
  }
  let month = if month.is_empty() {
    None
  } else {
    Some(*MONTHS.get(month.to_lowercase().as_str())?)
  };
  let day = optional_number(day);
  if day.is_some() && month.is_none() {
    return None;
  }
  valid_point(calendar, year, month, day)
}

fn optional_number(s: &str) -> Option<u32> {
  if s.is_empty() {
    None
  } else {
    s.parse().ok()
  }
}

fn valid_point(calendar: Calendar, year: i32, month: Option<u32>, day: Option<u32>) -> Option<SourceDate> {
  if let Some(m) = month {
    if !(1..=12).contains(&m) {
      return None;
    }
    if let Some(d) = day {
      if d == 0 || d > calendar.days_in_month(year, m) {
        return None;
      }
    }
  }
  Some(SourceDate::point(calendar, year, month, day))
}
