use phf::phf_map;

// Reserved category names. They are substituted by the caller before a call
// number is inserted and must never collide with real call number text.
pub const NO_CALL_NUMBER: &str = "{{no call number}}";
pub const DEFAULT_CATEGORY: &str = "{{default category}}";
// Synthetic delimiter placed after a reserved category name. A suffix that
// contains it is always split at the marker, whatever the user delimiters are.
pub const DEFAULT_DELIMITER: &str = "{{delimiter}}";

// Display labels for the reserved names
pub const NO_CALL_NUMBER_LABEL: &str = "(no call number)";
pub const DEFAULT_CATEGORY_LABEL: &str = "(default category)";

// Separator between delimiter alternatives
pub const DELIMITER_SEPARATOR: char = ';';
// Stands in for an escaped separator while the expression is split
pub const ESCAPED_SEPARATOR_TOKEN: &str = "\u{0}SEP\u{0}";

// Alternatives rejected even though they compile: they cut everywhere
pub const DEGENERATE_PATTERNS: [&str; 2] = ["$", "."];

// the name of the configuration file, looked for in the current directory,
// the XDG config directory and $HOME
pub const REPOHIER_CONF_NAME: &str = "repohier.conf";

// Highest numbered EAD component element. Deeper levels use unnumbered <c>
pub const EAD_MAX_NUMBERED_LEVEL: usize = 12;

// GEDCOM month abbreviations (Gregorian and Julian calendars)
pub const MONTHS: phf::Map<&'static str, u32> = phf_map! {
  "jan" => 1,
  "feb" => 2,
  "mar" => 3,
  "apr" => 4,
  "may" => 5,
  "jun" => 6,
  "jul" => 7,
  "aug" => 8,
  "sep" => 9,
  "oct" => 10,
  "nov" => 11,
  "dec" => 12
};

// GEDCOM calendar escapes
pub const CALENDARS: phf::Map<&'static str, &'static str> = phf_map! {
  "@#DGREGORIAN@" => "gregorian",
  "@#DJULIAN@" => "julian",
  "@#DHEBREW@" => "hebrew",
  "@#DFRENCH R@" => "french",
  "@#DROMAN@" => "roman",
  "@#DUNKNOWN@" => "unknown"
};

// EAD level attribute by hierarchy level. Root is the fonds itself.
pub const EAD_LEVELS: phf::Map<u32, &'static str> = phf_map! {
  1_u32 => "fonds",
  2_u32 => "series",
  3_u32 => "subseries",
  4_u32 => "file"
};
