//! `CallNumberCategory` objects
//!
//! A category is one segment of a call number. The root has no segment;
//! each child carries the text peeled off its parent's remaining call number,
//! up to and including the delimiter. Sources are filed at the deepest
//! category reached, together with the part of their call number no
//! delimiter matched.

use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

use indexmap::IndexMap;
use log::{debug, trace, warn};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::constants::{DEFAULT_CATEGORY, DEFAULT_DELIMITER};
use crate::date::DateRange;
use crate::delimiter::DelimiterExpression;
use crate::utils::natural_cmp;

/// Lookup of the date range of a single source
pub trait SourceDates {
  fn source_date_range(&self, source_id: &str) -> Option<DateRange>;
}

impl SourceDates for HashMap<String, DateRange> {
  fn source_date_range(&self, source_id: &str) -> Option<DateRange> {
    self.get(source_id).cloned()
  }
}

/// A delimiter matched without consuming anything. The source is filed where
/// the match happened instead of recursing forever.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Delimiter matched an empty string in '{suffix}' of source '{source_id}', filed under '{category}'")]
pub struct DegenerateMatch {
  pub source_id: String,
  pub category: String,
  pub suffix: String,
}

#[derive(Clone, Debug)]
pub struct CallNumberCategory {
  name: String,
  full_name: String,
  id: String,
  hierarchy_level: usize,
  is_root: bool,
  delimiter_alternatives: Rc<[DelimiterExpression]>,
  // source id -> truncated call number, in filing order
  sources: IndexMap<String, String>,
  // keyed by name, in creation order
  sub_categories: IndexMap<String, CallNumberCategory>,
  date_range: Option<DateRange>,
}

impl CallNumberCategory {
  /// The root of a new tree. All categories share `delimiter_alternatives`.
  pub fn new_root(delimiter_alternatives: Vec<DelimiterExpression>) -> Self {
    Self::new(String::new(), String::new(), 1, true, delimiter_alternatives.into())
  }

  fn new(
    name: String,
    full_name: String,
    hierarchy_level: usize,
    is_root: bool,
    delimiter_alternatives: Rc<[DelimiterExpression]>,
  ) -> Self {
    Self {
      id: category_id(&full_name),
      name,
      full_name,
      hierarchy_level,
      is_root,
      delimiter_alternatives,
      sources: IndexMap::new(),
      sub_categories: IndexMap::new(),
      date_range: None,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Names of all categories from the root down to this one, concatenated
  pub fn full_name(&self) -> &str {
    &self.full_name
  }

  /// Stable identifier derived from the full name
  pub fn id(&self) -> &str {
    &self.id
  }

  /// XML-safe identifier of a source filed in this category. Source ids are
  /// free text (GEDCOM xrefs may hold spaces or quotes) so they are hashed.
  pub fn source_node_id(&self, source_id: &str) -> String {
    format!("{}-s{}", self.id, hashed(source_id))
  }

  pub fn hierarchy_level(&self) -> usize {
    self.hierarchy_level
  }

  pub fn is_root(&self) -> bool {
    self.is_root
  }

  pub fn delimiter_alternatives(&self) -> &[DelimiterExpression] {
    &self.delimiter_alternatives
  }

  /// Ids of the sources filed directly here
  pub fn sources(&self) -> impl Iterator<Item = &str> {
    self.sources.keys().map(String::as_str)
  }

  pub fn has_source(&self, source_id: &str) -> bool {
    self.sources.contains_key(source_id)
  }

  /// What is left of a directly filed source's call number
  pub fn truncated_call_number(&self, source_id: &str) -> Option<&str> {
    self.sources.get(source_id).map(String::as_str)
  }

  pub fn sub_categories(&self) -> impl Iterator<Item = &CallNumberCategory> {
    self.sub_categories.values()
  }

  pub fn sub_category(&self, name: &str) -> Option<&CallNumberCategory> {
    self.sub_categories.get(name)
  }

  pub fn has_sub_categories(&self) -> bool {
    !self.sub_categories.is_empty()
  }

  /// Aggregated date range, available after `aggregate_dates`
  pub fn date_range(&self) -> Option<&DateRange> {
    self.date_range.as_ref()
  }

  /// This category and all below it, parents before children
  pub fn descendants(&self) -> Vec<&CallNumberCategory> {
    let mut out = vec![self];
    for child in self.sub_categories.values() {
      out.extend(child.descendants());
    }
    out
  }

  /// Number of sources filed here or anywhere below
  pub fn count_sources(&self) -> usize {
    self.sources.len() + self.sub_categories.values().map(CallNumberCategory::count_sources).sum::<usize>()
  }

  /// The category a source was filed in
  pub fn find_source(&self, source_id: &str) -> Option<&CallNumberCategory> {
    if self.has_source(source_id) {
      return Some(self);
    }
    self.sub_categories.values().find_map(|c| c.find_source(source_id))
  }

  /// File a source under its call number. The call number must already have
  /// had the reserved names substituted for empty or unmatched values.
  ///
  /// Each step peels one segment: the first alternative, in list order,
  /// matching anywhere in the remaining call number decides the cut.
  pub fn insert(&mut self, source_id: &str, call_number: &str) -> Option<DegenerateMatch> {
    trace!("Inserting '{}' at '{}' with '{}'", source_id, self.full_name, call_number);
    let cut = match self.find_cut(call_number) {
      Some(cut) => cut,
      None => {
        self.file(source_id, call_number);
        return None;
      }
    };

    let left = &call_number[..cut.start];
    let delimiter = &call_number[cut.clone()];
    let right = &call_number[cut.end..];

    if right.len() == call_number.len() {
      let degenerate = DegenerateMatch {
        source_id: source_id.into(),
        category: self.full_name.clone(),
        suffix: call_number.into(),
      };
      warn!("{}", degenerate);
      self.file(source_id, call_number);
      return Some(degenerate);
    }

    let left = if left.is_empty() { DEFAULT_CATEGORY } else { left };
    let name = format!("{left}{delimiter}");
    self.sub_category_or_insert(name).insert(source_id, right)
  }

  fn find_cut(&self, call_number: &str) -> Option<Range<usize>> {
    if call_number.contains(DEFAULT_DELIMITER) {
      return DelimiterExpression::literal(DEFAULT_DELIMITER).find_delimiter(call_number);
    }
    self
      .delimiter_alternatives
      .iter()
      .find_map(|alternative| alternative.find_delimiter(call_number))
  }

  fn sub_category_or_insert(&mut self, name: String) -> &mut CallNumberCategory {
    let full_name = format!("{}{}", self.full_name, name);
    let level = self.hierarchy_level + 1;
    let alternatives = Rc::clone(&self.delimiter_alternatives);
    let key = name.clone();
    let child = self.sub_categories.entry(name).or_insert_with(move || {
      debug!("Creating category '{}'", full_name);
      CallNumberCategory::new(key, full_name, level, false, alternatives)
    });
    assert!(
      child.full_name.starts_with(&self.full_name),
      "category '{}' is not below '{}'",
      child.full_name,
      self.full_name
    );
    child
  }

  fn file(&mut self, source_id: &str, truncated_call_number: &str) {
    debug!("Filing source '{}' under '{}' as '{}'", source_id, self.full_name, truncated_call_number);
    self.sources.insert(source_id.into(), truncated_call_number.into());
  }

  /// Work out the date range of every category from scratch, children first.
  /// Categories without any dated source below them get no range.
  pub fn aggregate_dates<D: SourceDates + ?Sized>(&mut self, dates: &D) -> Option<DateRange> {
    let mut ranges: Vec<DateRange> = self
      .sub_categories
      .values_mut()
      .filter_map(|child| child.aggregate_dates(dates))
      .collect();
    ranges.extend(self.sources.keys().filter_map(|id| dates.source_date_range(id)));
    self.date_range = DateRange::reduce(ranges);
    self.date_range.clone()
  }

  /// Sort sub categories by name and sources by truncated call number, in
  /// natural order, all the way down
  pub fn sort_natural(&mut self) {
    self.sub_categories.sort_by(|a, _, b, _| natural_cmp(a, b));
    self.sources.sort_by(|_, a, _, b| natural_cmp(a, b));
    for child in self.sub_categories.values_mut() {
      child.sort_natural();
    }
  }
}

/// Identifier usable as an XML id: `c` followed by the base62 encoded first
/// half of the SHA-256 of the full name
pub fn category_id(full_name: &str) -> String {
  format!("c{}", hashed(full_name))
}

fn hashed(text: &str) -> String {
  let digest = Sha256::digest(text.as_bytes());
  let mut half = [0u8; 16];
  half.copy_from_slice(&digest[..16]);
  base62::encode(u128::from_be_bytes(half))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::NO_CALL_NUMBER;

  fn root(patterns: &[&str]) -> CallNumberCategory {
    CallNumberCategory::new_root(patterns.iter().map(|p| DelimiterExpression::new(p).unwrap()).collect())
  }

  #[test]
  fn peels_one_segment_per_level() {
    let mut tree = root(&["/"]);
    assert_eq!(tree.insert("s1", "Fonds A/Series 1/Item 1"), None);
    let fonds = tree.sub_category("Fonds A/").unwrap();
    assert_eq!(fonds.hierarchy_level(), 2);
    let series = fonds.sub_category("Series 1/").unwrap();
    assert_eq!(series.full_name(), "Fonds A/Series 1/");
    assert_eq!(series.truncated_call_number("s1"), Some("Item 1"));
    assert!(!series.is_root());
    assert!(tree.is_root());
  }

  #[test]
  fn first_alternative_wins_over_leftmost_match() {
    let mut tree = root(&["-", "/"]);
    tree.insert("s1", "A/B-C");
    assert_eq!(tree.sub_category("A/B-").unwrap().truncated_call_number("s1"), Some("C"));
  }

  #[test]
  fn empty_left_becomes_default_category() {
    let mut tree = root(&["/"]);
    tree.insert("s1", "/x");
    let name = format!("{DEFAULT_CATEGORY}/");
    assert_eq!(tree.sub_category(&name).unwrap().truncated_call_number("s1"), Some("x"));
  }

  #[test]
  fn marker_overrides_user_delimiters() {
    let mut tree = root(&["/"]);
    let call_number = format!("{NO_CALL_NUMBER}{DEFAULT_DELIMITER}");
    tree.insert("s1", &call_number);
    let category = tree.sub_category(&call_number).unwrap();
    assert_eq!(category.truncated_call_number("s1"), Some(""));
  }

  #[test]
  fn zero_length_match_is_filed_not_looped() {
    let mut tree = root(&["(?=B)"]);
    let degenerate = tree.insert("s1", "B1").unwrap();
    assert_eq!(degenerate.suffix, "B1");
    assert_eq!(tree.truncated_call_number("s1"), Some("B1"));
  }

  #[test]
  fn zero_length_match_after_text_still_progresses() {
    let mut tree = root(&["(?=B)"]);
    // "A" is peeled, then "B1" starts with the lookahead match and stays
    let degenerate = tree.insert("s1", "AB1").unwrap();
    assert_eq!(degenerate.category, "A");
    let a = tree.sub_category("A").unwrap();
    assert_eq!(a.truncated_call_number("s1"), Some("B1"));
  }

  #[test]
  fn siblings_are_merged_by_name() {
    let mut tree = root(&["/"]);
    tree.insert("s1", "A/1");
    tree.insert("s2", "A/2");
    tree.insert("s3", "B/1");
    let names: Vec<_> = tree.sub_categories().map(CallNumberCategory::name).collect();
    assert_eq!(names, vec!["A/", "B/"]);
    assert_eq!(tree.count_sources(), 3);
    assert_eq!(tree.find_source("s2").unwrap().name(), "A/");
  }

  #[test]
  fn dates_aggregate_bottom_up() {
    let mut tree = root(&["/"]);
    tree.insert("s1", "A/x/1");
    tree.insert("s2", "A/y/1");
    tree.insert("s3", "B/1");
    let mut dates = HashMap::new();
    dates.insert("s1".to_string(), DateRange::years(1900, 1905));
    dates.insert("s2".to_string(), DateRange::years(1890, 1895));
    let range = tree.aggregate_dates(&dates);
    assert_eq!(range, Some(DateRange::years(1890, 1905)));
    assert_eq!(tree.sub_category("A/").unwrap().date_range(), Some(&DateRange::years(1890, 1905)));
    assert_eq!(tree.sub_category("B/").unwrap().date_range(), None);
  }

  #[test]
  fn natural_sort() {
    let mut tree = root(&["/"]);
    tree.insert("s1", "A/10");
    tree.insert("s2", "B/1");
    tree.insert("s3", "A/9");
    tree.insert("s4", "a2/1");
    tree.sort_natural();
    let names: Vec<_> = tree.sub_categories().map(CallNumberCategory::name).collect();
    assert_eq!(names, vec!["A/", "a2/", "B/"]);
    let a: Vec<_> = tree.sub_category("A/").unwrap().sources().collect();
    assert_eq!(a, vec!["s3", "s1"]);
  }

  #[test]
  fn ids_are_stable_and_distinct() {
    assert_eq!(category_id("A/"), category_id("A/"));
    assert_ne!(category_id("A/"), category_id("B/"));
    assert!(category_id("").starts_with('c'));
  }

  #[test]
  fn source_node_ids_are_xml_names() {
    let category = root(&["/"]);
    let id = category.source_node_id("@S 1\"\"@");
    assert!(id.starts_with(category.id()));
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'), "{id}");
    assert_ne!(id, category.source_node_id("@S 2@"));
  }
}
