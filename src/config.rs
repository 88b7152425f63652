//! Configuration items which need to be saved across the
//! lifetime of a hierarchy build
//!
//! Options are gathered, in increasing priority, from:
//!
//! * hard-coded defaults
//! * the configuration file
//! * the command line

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use log::{debug, info, warn};

use crate::constants::{
  DEFAULT_CATEGORY, DEFAULT_CATEGORY_LABEL, DEFAULT_DELIMITER, DELIMITER_SEPARATOR, NO_CALL_NUMBER,
  NO_CALL_NUMBER_LABEL, REPOHIER_CONF_NAME,
};
use crate::{Bool, InputFormat, OutputFormat, OutputIndent};

/// Display text for the reserved category names
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryLabels {
  pub no_call_number: String,
  pub default_category: String,
}

impl Default for CategoryLabels {
  fn default() -> Self {
    Self {
      no_call_number: NO_CALL_NUMBER_LABEL.into(),
      default_category: DEFAULT_CATEGORY_LABEL.into(),
    }
  }
}

impl CategoryLabels {
  /// Category or call number text as shown to users: reserved names are
  /// replaced by their labels and the synthetic delimiter disappears
  pub fn display(&self, name: &str) -> String {
    name
      .replace(NO_CALL_NUMBER, &self.no_call_number)
      .replace(DEFAULT_CATEGORY, &self.default_category)
      .replace(DEFAULT_DELIMITER, "")
  }
}

/// Where an option value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionSource {
  ConfigFile,
  CommandLine,
}

#[derive(Clone, Debug)]
pub struct Config {
  pub delimiter: String,
  pub separator: char,
  pub labels: CategoryLabels,
  /// Build with the valid alternatives even if others were refused
  pub allow_partial_delimiters: bool,
  pub repository: Option<String>,
  pub show_titles: bool,
  pub show_dates: bool,
  pub show_truncated_call_numbers: bool,
  pub sort: bool,
  pub input_format: Option<InputFormat>,
  pub output_format: OutputFormat,
  pub output_indent: OutputIndent,
  pub output_file: Option<PathBuf>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      delimiter: String::new(),
      separator: DELIMITER_SEPARATOR,
      labels: CategoryLabels::default(),
      allow_partial_delimiters: false,
      repository: None,
      show_titles: true,
      show_dates: true,
      show_truncated_call_numbers: true,
      sort: true,
      input_format: None,
      output_format: OutputFormat::default(),
      output_indent: OutputIndent::default(),
      output_file: None,
    }
  }
}

impl Config {
  /// Defaults overridden by a config file. With no explicit file the default
  /// locations are searched, unless `noconf` is set.
  pub fn load(configfile: Option<&Path>, noconf: bool) -> anyhow::Result<Self> {
    let mut config = Self::default();
    let file = match configfile {
      Some(f) => Some(f.to_path_buf()),
      None if noconf => None,
      None => config_file(),
    };
    if let Some(file) = file {
      config.read_config_file(&file)?;
    }
    Ok(config)
  }

  /// Read a `<config><option name="...">value</option></config>` file
  pub fn read_config_file(&mut self, file: &Path) -> anyhow::Result<()> {
    info!("Reading config file '{}'", file.display());
    let text = std::fs::read_to_string(file).with_context(|| format!("Cannot read config file '{}'", file.display()))?;
    let doc = roxmltree::Document::parse(&text).with_context(|| format!("Config file '{}' is not valid XML", file.display()))?;
    let root = doc.root_element();
    if !root.has_tag_name("config") {
      bail!("Config file '{}' has no <config> root element", file.display());
    }
    for node in root.children().filter(|n| n.has_tag_name("option")) {
      let name = node
        .attribute("name")
        .ok_or_else(|| anyhow!("<option> without name in '{}'", file.display()))?;
      let value = node.text().unwrap_or("");
      if !self.set_option(name, value, OptionSource::ConfigFile)? {
        warn!("Ignoring unknown option '{}' in config file '{}'", name, file.display());
      }
    }
    Ok(())
  }

  /// Set an option by name. Returns `false` for unknown names.
  pub fn set_option(&mut self, name: &str, value: &str, source: OptionSource) -> anyhow::Result<bool> {
    debug!("Setting option '{}' to '{}' from {:?}", name, value, source);
    match name {
      "delimiter" => self.delimiter = value.into(),
      "separator" => {
        let mut chars = value.chars();
        self.separator = match (chars.next(), chars.next()) {
          (Some(c), None) => c,
          _ => bail!("Option 'separator' must be a single character, got '{}'", value),
        };
      }
      "no_call_number_label" => self.labels.no_call_number = value.into(),
      "default_category_label" => self.labels.default_category = value.into(),
      "allow_partial_delimiters" => self.allow_partial_delimiters = parse_bool(name, value)?,
      "repository" => self.repository = Some(value.into()).filter(|r: &String| !r.is_empty()),
      "show_titles" => self.show_titles = parse_bool(name, value)?,
      "show_dates" => self.show_dates = parse_bool(name, value)?,
      "show_truncated_call_numbers" => self.show_truncated_call_numbers = parse_bool(name, value)?,
      "sort" => self.sort = parse_bool(name, value)?,
      "input_format" => self.input_format = Some(value.parse()?),
      "output_format" => self.output_format = value.parse()?,
      "output_indent" => self.output_indent = value.parse()?,
      "output_file" => self.output_file = Some(PathBuf::from(value)),
      _ => return Ok(false),
    }
    Ok(true)
  }
}

fn parse_bool(name: &str, value: &str) -> anyhow::Result<bool> {
  let b: Bool = value
    .trim()
    .parse()
    .with_context(|| format!("Invalid value '{}' for option '{}'", value, name))?;
  Ok(b.0)
}

/// Returns the full path of the first config file found, in order:
///
/// * `repohier.conf` or `.repohier.conf` in the current directory
/// * `$XDG_CONFIG_HOME/repohier/repohier.conf`
/// * `$HOME/.config/repohier/repohier.conf`
/// * `$HOME/.repohier.conf`
pub fn config_file() -> Option<PathBuf> {
  let mut candidates = vec![
    PathBuf::from(REPOHIER_CONF_NAME),
    PathBuf::from(format!(".{REPOHIER_CONF_NAME}")),
  ];
  if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
    candidates.push(Path::new(&xdg).join("repohier").join(REPOHIER_CONF_NAME));
  }
  if let Some(home) = env::var_os("HOME") {
    let home = Path::new(&home);
    candidates.push(home.join(".config").join("repohier").join(REPOHIER_CONF_NAME));
    candidates.push(home.join(format!(".{REPOHIER_CONF_NAME}")));
  }
  candidates.into_iter().find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn labels_replace_reserved_names() {
    let labels = CategoryLabels::default();
    let name = format!("{NO_CALL_NUMBER}{DEFAULT_DELIMITER}");
    assert_eq!(labels.display(&name), "(no call number)");
    assert_eq!(labels.display("A/1"), "A/1");
  }

  #[test]
  fn options_by_name() {
    let mut config = Config::default();
    assert!(config.set_option("delimiter", "/;-", OptionSource::CommandLine).unwrap());
    assert!(config.set_option("show_titles", "false", OptionSource::ConfigFile).unwrap());
    assert!(!config.set_option("colour", "blue", OptionSource::ConfigFile).unwrap());
    assert_eq!(config.delimiter, "/;-");
    assert!(!config.show_titles);
    assert!(config.sort);
  }

  #[test]
  fn bad_values_are_errors() {
    let mut config = Config::default();
    assert!(config.set_option("separator", ";;", OptionSource::CommandLine).is_err());
    assert!(config.set_option("sort", "maybe", OptionSource::CommandLine).is_err());
    assert!(config.set_option("output_format", "pdf", OptionSource::CommandLine).is_err());
  }

  #[test]
  fn reads_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
      file,
      r#"<config>
  <option name="delimiter">Fonds(/)</option>
  <option name="separator">|</option>
  <option name="no_call_number_label">[none]</option>
  <option name="output_format">xml</option>
</config>"#
    )
    .unwrap();
    let config = Config::load(Some(file.path()), false).unwrap();
    assert_eq!(config.delimiter, "Fonds(/)");
    assert_eq!(config.separator, '|');
    assert_eq!(config.labels.no_call_number, "[none]");
    assert!(matches!(config.output_format, OutputFormat::Xml));
  }

  #[test]
  fn missing_config_file_is_an_error() {
    assert!(Config::load(Some(Path::new("/nonexistent/repohier.conf")), false).is_err());
  }
}
