use core::fmt;

pub mod category;
pub mod config;
pub mod constants;
pub mod date;
pub mod delimiter;
pub mod element_builder;
pub mod hierarchy;
pub mod input;
pub mod output;
pub mod source;
pub mod sources;
pub mod utils;

pub use category::{CallNumberCategory, DegenerateMatch, SourceDates};
pub use config::{CategoryLabels, Config, OptionSource};
pub use date::{Calendar, DatePoint, DateRange, SourceDate};
pub use delimiter::{DelimiterError, DelimiterExpression, DelimiterExpressionParser, ParsedDelimiters};
pub use hierarchy::{build_hierarchy, BuiltHierarchy, HierarchyError, RepositoryHierarchy};
pub use source::{Repository, Source};
pub use sources::Sources;

#[derive(Clone, Copy, Debug)]
pub struct Bool(pub bool);

impl fmt::Display for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl core::str::FromStr for Bool {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "1" | "yes" => Ok(Self(true)),
            "0" | "no" => Ok(Self(false)),
            _ => Ok(Self(s.parse::<bool>()?)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Gedcom,
    Xml,
}

impl Default for InputFormat {
    fn default() -> Self {
        Self::Gedcom
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gedcom => f.write_str("gedcom"),
            Self::Xml => f.write_str("xml"),
        }
    }
}

impl core::str::FromStr for InputFormat {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "gedcom" | "ged" => Ok(Self::Gedcom),
            "xml" => Ok(Self::Xml),
            _ => Err(anyhow::anyhow!("Incorrect input format type")),
        }
    }
}

impl InputFormat {
    /// Guess the format from a data file extension
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
            Some("xml") => Self::Xml,
            _ => Self::Gedcom,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Xml,
    Html,
    Dot,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Xml => f.write_str("xml"),
            Self::Html => f.write_str("html"),
            Self::Dot => f.write_str("dot"),
        }
    }
}

impl core::str::FromStr for OutputFormat {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "xml" | "ead" => Ok(Self::Xml),
            "html" => Ok(Self::Html),
            "dot" => Ok(Self::Dot),
            _ => Err(anyhow::anyhow!("Incorrect output format type")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputIndent {
    Spaces(u32),
    Tabs(u32),
}

impl Default for OutputIndent {
    fn default() -> Self {
        Self::Spaces(2)
    }
}

impl fmt::Display for OutputIndent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spaces(num) => write!(f, "{}", num),
            Self::Tabs(num) => write!(f, "{}t", num),
        }
    }
}

impl core::str::FromStr for OutputIndent {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        if let Some(tabs) = s.strip_suffix('t') {
            Ok(Self::Tabs(tabs.parse::<u32>()?))
        } else {
            Ok(Self::Spaces(s.parse::<u32>()?))
        }
    }
}

impl OutputIndent {
    /// The whitespace for one indentation level
    pub fn unit(&self) -> String {
        match self {
            Self::Spaces(num) => " ".repeat(*num as usize),
            Self::Tabs(num) => "\t".repeat(*num as usize),
        }
    }
}
