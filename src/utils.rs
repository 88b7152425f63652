//! Various utility subs used in repohier

use core::cmp::Ordering;
use core::iter::Peekable;
use core::str::Chars;

use unicase::UniCase;
use unicode_normalization::UnicodeNormalization;

pub fn nfc(s: &str) -> String {
  s.nfc().collect()
}

/// Natural order comparison: case-insensitive, runs of digits compare by
/// their numeric value ("A9" < "a10"). Leading zeros are ignored unless the
/// values are equal, then the shorter run sorts first.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
  let mut a = a.chars().peekable();
  let mut b = b.chars().peekable();
  loop {
    match (a.peek().copied(), b.peek().copied()) {
      (None, None) => return Ordering::Equal,
      (None, Some(_)) => return Ordering::Less,
      (Some(_), None) => return Ordering::Greater,
      (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
        let ord = compare_numbers(&digit_run(&mut a), &digit_run(&mut b));
        if ord != Ordering::Equal {
          return ord;
        }
      }
      (Some(x), Some(y)) => {
        let ord = UniCase::new(x.to_string()).cmp(&UniCase::new(y.to_string()));
        if ord != Ordering::Equal {
          return ord;
        }
        a.next();
        b.next();
      }
    }
  }
}

fn digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
  let mut run = String::new();
  while let Some(c) = chars.next_if(char::is_ascii_digit) {
    run.push(c);
  }
  run
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
  let a_trimmed = a.trim_start_matches('0');
  let b_trimmed = b.trim_start_matches('0');
  a_trimmed
    .len()
    .cmp(&b_trimmed.len())
    .then_with(|| a_trimmed.cmp(b_trimmed))
    .then_with(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn numbers_by_value() {
    assert_eq!(natural_cmp("Box 9", "Box 10"), Ordering::Less);
    assert_eq!(natural_cmp("Box 10", "Box 9"), Ordering::Greater);
    assert_eq!(natural_cmp("A2/3", "A2/12"), Ordering::Less);
  }

  #[test]
  fn case_insensitive() {
    assert_eq!(natural_cmp("fonds", "FONDS"), Ordering::Equal);
    assert_eq!(natural_cmp("alpha", "Beta"), Ordering::Less);
  }

  #[test]
  fn leading_zeros() {
    assert_eq!(natural_cmp("007", "7"), Ordering::Greater);
    assert_eq!(natural_cmp("007", "8"), Ordering::Less);
  }

  #[test]
  fn prefix_sorts_first() {
    assert_eq!(natural_cmp("A", "A/1"), Ordering::Less);
    assert_eq!(natural_cmp("", "A"), Ordering::Less);
  }

  #[test]
  fn normalises_to_nfc() {
    assert_eq!(nfc("e\u{301}"), "\u{e9}");
  }
}
