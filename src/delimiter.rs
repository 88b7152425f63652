//! `DelimiterExpression` objects
//!
//! A delimiter specification is the text a user enters to say where call
//! numbers are cut into categories. It holds one or more alternatives joined
//! by a separator (`;` by default). Every alternative is a regular expression;
//! plain text like `/` or ` - ` is simply a regular expression without
//! metacharacters. A separator which is part of a pattern is written escaped
//! (`\;`).

use core::fmt;
use core::ops::Range;

use itertools::Itertools;
use log::{debug, trace, warn};
use thiserror::Error;

use crate::constants::{DEGENERATE_PATTERNS, DELIMITER_SEPARATOR, ESCAPED_SEPARATOR_TOKEN};

/// Problems found while parsing a delimiter specification. The messages are
/// shown to the user as they are.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DelimiterError {
  #[error("Regular expression not accepted: {0}")]
  InvalidPattern(String),
  #[error("No valid delimiter or valid regular expression for delimiter found.")]
  NoValidPattern,
}

#[derive(Clone, Debug)]
enum Matcher {
  Literal(String),
  Pattern(fancy_regex::Regex),
}

/// One validated delimiter alternative
#[derive(Clone, Debug)]
pub struct DelimiterExpression {
  pattern: String,
  matcher: Matcher,
}

impl DelimiterExpression {
  /// Compile a user supplied alternative.
  /// `$` and `.` compile fine but would cut a call number at every position,
  /// so they are refused as well.
  pub fn new(pattern: &str) -> Result<Self, DelimiterError> {
    if DEGENERATE_PATTERNS.contains(&pattern) {
      return Err(DelimiterError::InvalidPattern(pattern.into()));
    }
    match fancy_regex::Regex::new(pattern) {
      Ok(regex) => Ok(Self {
        pattern: pattern.into(),
        matcher: Matcher::Pattern(regex),
      }),
      Err(e) => {
        debug!("Delimiter '{}' does not compile: {}", pattern, e);
        Err(DelimiterError::InvalidPattern(pattern.into()))
      }
    }
  }

  /// An alternative which matches `text` verbatim. Used for the synthetic
  /// default delimiter.
  pub fn literal(text: &str) -> Self {
    Self {
      pattern: text.into(),
      matcher: Matcher::Literal(text.into()),
    }
  }

  /// The alternative as the user wrote it (escaped separators restored)
  pub fn pattern(&self) -> &str {
    &self.pattern
  }

  /// Whether the alternative has a capturing group. If so, only the text of
  /// the first group is the cut, the rest of the match is context.
  pub fn has_capture_group(&self) -> bool {
    match &self.matcher {
      Matcher::Literal(_) => false,
      Matcher::Pattern(regex) => regex.captures_len() > 1,
    }
  }

  /// Byte range of the delimiter text for the first match in `haystack`.
  ///
  /// With a capturing group the range is that of the first group; a group
  /// which did not take part in the match falls back to the whole match.
  pub fn find_delimiter(&self, haystack: &str) -> Option<Range<usize>> {
    match &self.matcher {
      Matcher::Literal(text) => haystack.find(text.as_str()).map(|start| start..start + text.len()),
      Matcher::Pattern(regex) => match regex.captures(haystack) {
        Ok(Some(caps)) => caps.get(1).or_else(|| caps.get(0)).map(|m| m.start()..m.end()),
        Ok(None) => None,
        Err(e) => {
          // backtrack limit and friends: treat as no match
          warn!("Delimiter '{}' failed on '{}': {}", self.pattern, haystack, e);
          None
        }
      },
    }
  }

  /// Whether the alternative matches anywhere in `haystack`
  pub fn is_match(&self, haystack: &str) -> bool {
    self.find_delimiter(haystack).is_some()
  }
}

impl fmt::Display for DelimiterExpression {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.pattern)
  }
}

/// Result of parsing a delimiter specification. Both lists may be non-empty
/// at once.
#[derive(Clone, Debug, Default)]
pub struct ParsedDelimiters {
  pub expressions: Vec<DelimiterExpression>,
  pub errors: Vec<DelimiterError>,
}

impl ParsedDelimiters {
  /// The accepted alternatives as strings, in the order given by the user
  pub fn patterns(&self) -> Vec<&str> {
    self.expressions.iter().map(DelimiterExpression::pattern).collect()
  }

  pub fn has_errors(&self) -> bool {
    !self.errors.is_empty()
  }
}

/// Splits a delimiter specification into validated alternatives
#[derive(Clone, Copy, Debug)]
pub struct DelimiterExpressionParser {
  separator: char,
}

impl Default for DelimiterExpressionParser {
  fn default() -> Self {
    Self::new(DELIMITER_SEPARATOR)
  }
}

impl DelimiterExpressionParser {
  pub fn new(separator: char) -> Self {
    Self { separator }
  }

  pub fn separator(&self) -> char {
    self.separator
  }

  fn escaped_separator(&self) -> String {
    format!("\\{}", self.separator)
  }

  /// Parse a delimiter specification. Never fails: bad alternatives end up
  /// in `errors` and are left out of `expressions`.
  pub fn parse(&self, spec: &str) -> ParsedDelimiters {
    let mut parsed = ParsedDelimiters::default();

    // Protect escaped separators from the split
    let protected = spec.replace(&self.escaped_separator(), ESCAPED_SEPARATOR_TOKEN);

    for segment in protected.split(self.separator).filter(|s| !s.is_empty()) {
      let segment = segment.replace(ESCAPED_SEPARATOR_TOKEN, &self.separator.to_string());
      match DelimiterExpression::new(&segment) {
        Ok(expression) => {
          trace!("Accepted delimiter alternative '{}'", segment);
          parsed.expressions.push(expression);
        }
        Err(e) => {
          debug!("{}", e);
          parsed.errors.push(e);
        }
      }
    }

    if parsed.expressions.is_empty() {
      parsed.errors.push(DelimiterError::NoValidPattern);
    }
    parsed
  }

  /// Join alternatives back into a specification `parse` accepts, escaping
  /// separators inside patterns
  pub fn join<'a>(&self, patterns: impl IntoIterator<Item = &'a str>) -> String {
    let escaped = self.escaped_separator();
    patterns
      .into_iter()
      .map(|p| p.replace(self.separator, &escaped))
      .join(&self.separator.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_on_separator_in_order() {
    let parsed = DelimiterExpressionParser::default().parse("/;-;, ");
    assert_eq!(parsed.patterns(), vec!["/", "-", ", "]);
    assert!(parsed.errors.is_empty());
  }

  #[test]
  fn empty_segments_are_dropped() {
    let parsed = DelimiterExpressionParser::default().parse(";;/;");
    assert_eq!(parsed.patterns(), vec!["/"]);
    assert!(!parsed.has_errors());
  }

  #[test]
  fn escaped_separator_stays_in_pattern() {
    let parsed = DelimiterExpressionParser::default().parse(r"a\;b;/");
    assert_eq!(parsed.patterns(), vec!["a;b", "/"]);
  }

  #[test]
  fn degenerate_patterns_are_refused() {
    let parsed = DelimiterExpressionParser::default().parse("$;.;/");
    assert_eq!(parsed.patterns(), vec!["/"]);
    assert_eq!(
      parsed.errors,
      vec![
        DelimiterError::InvalidPattern("$".into()),
        DelimiterError::InvalidPattern(".".into()),
      ]
    );
  }

  #[test]
  fn nothing_valid() {
    let parsed = DelimiterExpressionParser::default().parse("");
    assert!(parsed.expressions.is_empty());
    assert_eq!(parsed.errors, vec![DelimiterError::NoValidPattern]);
    assert_eq!(
      parsed.errors[0].to_string(),
      "No valid delimiter or valid regular expression for delimiter found."
    );
  }

  #[test]
  fn other_separator() {
    let parsed = DelimiterExpressionParser::new('|').parse(r"/|a\|b");
    assert_eq!(parsed.patterns(), vec!["/", "a|b"]);
  }

  #[test]
  fn capture_group_narrows_the_cut() {
    let expr = DelimiterExpression::new("Fonds(/)").unwrap();
    assert!(expr.has_capture_group());
    assert_eq!(expr.find_delimiter("Fonds/Series"), Some(5..6));
  }

  #[test]
  fn whole_match_without_group() {
    let expr = DelimiterExpression::new(r"\s*-\s*").unwrap();
    assert!(!expr.has_capture_group());
    assert_eq!(expr.find_delimiter("A - B - C"), Some(1..4));
  }

  #[test]
  fn non_participating_group_falls_back_to_match() {
    let expr = DelimiterExpression::new("/(x)?").unwrap();
    assert_eq!(expr.find_delimiter("a/b"), Some(1..2));
  }

  #[test]
  fn literal_is_not_a_regex() {
    let expr = DelimiterExpression::literal("{{x}}.");
    assert_eq!(expr.find_delimiter("a{{x}}.b"), Some(1..7));
    assert!(!expr.is_match("a{{x}}b"));
  }

  #[test]
  fn lookaround_is_accepted() {
    let expr = DelimiterExpression::new(r"(?<=\d)/").unwrap();
    assert_eq!(expr.find_delimiter("A/1/2"), Some(3..4));
  }

  #[test]
  fn join_escapes_separator() {
    let parser = DelimiterExpressionParser::default();
    assert_eq!(parser.join(["a;b", "/"]), r"a\;b;/");
  }
}
