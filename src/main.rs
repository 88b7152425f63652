use clap::Parser;
use log::{error, info, warn, LevelFilter};
use repohier::*;
use std::path::PathBuf;
use std::process::ExitCode;

/// Arrange the sources of an archive repository into a hierarchy of
/// categories by splitting their call numbers
///
/// Reads "datafile" (GEDCOM or XML), cuts every call number at the first
/// matching delimiter alternative, over and over, and writes the resulting
/// finding aid as text, EAD XML, HTML or GraphViz dot.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Build with the valid delimiter alternatives even if some were refused.
    /// By default any refused alternative stops the build
    #[clap(long)]
    allow_partial_delimiters: bool,

    /// Use "file" as the configuration file instead of looking in the default
    /// locations which are, in order:
    ///
    /// * `repohier.conf` or `.repohier.conf` in the current directory
    ///
    /// * `$XDG_CONFIG_HOME/repohier/repohier.conf`
    ///
    /// * `$HOME/.config/repohier/repohier.conf`
    ///
    /// * `$HOME/.repohier.conf`
    #[clap(short('g'), long, value_name = "file")]
    configfile: Option<PathBuf>,

    /// Turn on debugging
    #[clap(short, long)]
    debug: bool,

    /// Label shown for the category of call numbers no delimiter matches
    #[clap(long, value_name = "label")]
    default_category_label: Option<String>,

    /// Delimiter alternatives, each a regular expression, joined by the
    /// separator. A capture group selects the delimiter text within the match.
    /// Escape the separator with a backslash to use it inside a pattern
    #[clap(short('D'), long, value_name = "re1;re2;...")]
    delimiter: Option<String>,

    /// Data file format. Guessed from the file extension by default
    #[clap(long, value_name = "gedcom|xml")]
    input_format: Option<InputFormat>,

    /// Label shown for the category of sources without a call number
    #[clap(long, value_name = "label")]
    no_call_number_label: Option<String>,

    /// Don't look for a configfile
    #[clap(long)]
    noconf: bool,

    /// Output to "file" instead of STDOUT. "-" also means STDOUT
    #[clap(short, long, value_name = "file")]
    output_file: Option<PathBuf>,

    /// Output format. "ead" is an alias for "xml"
    #[clap(long, value_name = "text|xml|html|dot", alias = "outformat")]
    output_format: Option<OutputFormat>,

    /// Indentation of the output, in spaces or, with a "t" suffix, tabs
    #[clap(long, value_name = "num[t]")]
    output_indent: Option<OutputIndent>,

    /// Log only errors
    #[clap(short, long)]
    quiet: bool,

    /// Only arrange the sources held by the repository with this id
    #[clap(short, long, value_name = "id")]
    repository: Option<String>,

    /// Character separating delimiter alternatives
    #[clap(long, value_name = "char")]
    separator: Option<char>,

    /// Show aggregated date ranges
    #[clap(long, value_name = "true|false")]
    show_dates: Option<Bool>,

    /// Show source titles
    #[clap(long, value_name = "true|false")]
    show_titles: Option<Bool>,

    /// Show what is left of each call number below its category
    #[clap(long, value_name = "true|false")]
    show_truncated_call_numbers: Option<Bool>,

    /// Sort categories and sources in natural order instead of file order
    #[clap(long, value_name = "true|false")]
    sort: Option<Bool>,

    /// Turns on tracing. Generates a lot of output
    #[clap(short('T'), long)]
    trace: bool,

    /// GEDCOM or XML data file
    #[clap(value_name = "datafile")]
    datafile: PathBuf,
}

impl Args {
    /// Options given on the command line, by config option name
    fn options(&self) -> Vec<(&'static str, String)> {
        let mut options = Vec::new();
        let mut push = |name: &'static str, value: Option<String>| {
            if let Some(value) = value {
                options.push((name, value));
            }
        };
        push("delimiter", self.delimiter.clone());
        push("separator", self.separator.map(String::from));
        push("no_call_number_label", self.no_call_number_label.clone());
        push("default_category_label", self.default_category_label.clone());
        push("allow_partial_delimiters", self.allow_partial_delimiters.then(|| "true".into()));
        push("repository", self.repository.clone());
        push("show_titles", self.show_titles.map(|b| b.to_string()));
        push("show_dates", self.show_dates.map(|b| b.to_string()));
        push(
            "show_truncated_call_numbers",
            self.show_truncated_call_numbers.map(|b| b.to_string()),
        );
        push("sort", self.sort.map(|b| b.to_string()));
        push("input_format", self.input_format.map(|f| f.to_string()));
        push("output_format", self.output_format.map(|f| f.to_string()));
        push("output_indent", self.output_indent.map(|i| i.to_string()));
        push(
            "output_file",
            self.output_file.as_ref().map(|f| f.display().to_string()),
        );
        options
    }

    fn log_level(&self) -> LevelFilter {
        if self.trace {
            LevelFilter::Trace
        } else if self.debug {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        }
    }
}

fn init_logging(level: LevelFilter) {
    let level = match level {
        LevelFilter::Off | LevelFilter::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        LevelFilter::Warn => tracing_subscriber::filter::LevelFilter::WARN,
        LevelFilter::Info => tracing_subscriber::filter::LevelFilter::INFO,
        LevelFilter::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
        LevelFilter::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let mut config = Config::load(args.configfile.as_deref(), args.noconf)?;
    for (name, value) in args.options() {
        config.set_option(name, &value, OptionSource::CommandLine)?;
    }

    let format = config
        .input_format
        .unwrap_or_else(|| InputFormat::from_path(&args.datafile));
    let sources = input::load(&args.datafile, format)?;

    let builder = RepositoryHierarchy::new(&config);
    let hierarchy = match builder.build(&sources) {
        Ok(hierarchy) => hierarchy,
        Err(HierarchyError::Delimiters(errors)) => {
            for e in errors {
                error!("{}", e);
            }
            return Ok(ExitCode::from(2));
        }
    };
    for e in &builder.delimiters().errors {
        warn!("{}", e);
    }
    info!(
        "Filed {} sources in {} categories",
        hierarchy.root.count_sources(),
        hierarchy.root.descendants().len() - 1
    );
    if !hierarchy.warnings.is_empty() {
        warn!("{} degenerate delimiter matches", hierarchy.warnings.len());
    }

    let ctx = output::OutputContext::new(&hierarchy, &sources, &config);
    output::write_output(&ctx, config.output_file.as_deref())?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level());
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
