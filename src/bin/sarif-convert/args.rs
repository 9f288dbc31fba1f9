use clap::{crate_description, crate_version, ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use sarif_convert::Destination;

// -----------------------------------------------------------------------------
// command-line args
// -----------------------------------------------------------------------------
#[derive(Parser, Debug)]
#[command(
    author,   // retrieved from Cargo.toml `authors`
    version,  // retrieved from Cargo.toml `version`
    about,    // retrieved from Cargo.toml `description`

    long_version = concat!(
        crate_version!(),
    ),

    long_about = concat!(
        crate_description!(),
    ),
)]
#[deny(missing_docs)]
/// Convert native security scanner reports into SARIF
pub struct CommandLineArgs {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

impl CommandLineArgs {
    pub fn parse_args() -> Self {
        let mut s = Self::parse();

        // If `NO_COLOR` is set in the environment, disable colored output
        //
        // https://no-color.org/
        if std::env::var("NO_COLOR").is_ok() {
            s.global_args.color = Mode::Never
        }

        s
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a scanner report into SARIF
    ///
    /// The report is read from the given path. Reports with a `.json` suffix are parsed; issues
    /// are taken from the `sec_issues` object, and the `total_count` and `vuln_count` fields are
    /// recorded as run metrics. Reports with any other suffix produce a SARIF document with no
    /// results.
    ///
    /// The document is written to stdout unless `--output` is given.
    #[command(display_order = 1)]
    Convert(ConvertArgs),
}

// -----------------------------------------------------------------------------
// global options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Global Options")]
pub struct GlobalArgs {
    /// Enable verbose output
    ///
    /// This can be repeated up to 3 times to enable successively more output.
    #[arg(global=true, long, short, action=ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    ///
    /// This overrides any `-v`/`--verbose` options.
    #[arg(global = true, long, short)]
    pub quiet: bool,

    /// Enable or disable colored output
    ///
    /// When this is "auto", colors are enabled when stderr is a tty.
    ///
    /// If the `NO_COLOR` environment variable is set, it takes precedence and is equivalent to `--color=never`.
    #[arg(global=true, long, default_value_t=Mode::Auto, value_name="MODE")]
    pub color: Mode,
}

impl GlobalArgs {
    pub fn use_color(&self) -> bool {
        match self.color {
            Mode::Never => false,
            Mode::Always => true,
            Mode::Auto => atty::is(atty::Stream::Stderr),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Mode {
    Auto,
    Never,
    Always,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mode::Auto => "auto",
            Mode::Never => "never",
            Mode::Always => "always",
        };
        write!(f, "{s}")
    }
}

// -----------------------------------------------------------------------------
// `convert` command
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Name of the scanner that produced the report
    ///
    /// This becomes the name of the SARIF run's tool driver.
    #[arg(long, short, value_name = "NAME", env("SARIF_CONVERT_TOOL"))]
    pub tool: String,

    /// Arguments the scanner was invoked with
    ///
    /// These are recorded in the SARIF run's conversion metadata.
    #[arg(long, value_name = "ARGS", env("SARIF_CONVERT_TOOL_ARGS"), allow_hyphen_values = true)]
    pub tool_args: Option<String>,

    /// Path of the native scanner report to convert
    #[arg(value_name = "REPORT")]
    pub report: PathBuf,

    #[command(flatten)]
    pub output_args: OutputArgs,
}

// -----------------------------------------------------------------------------
// output options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Output Options")]
pub struct OutputArgs {
    /// Write output to the specified path
    ///
    /// If this argument is not provided, or is `-`, stdout will be used.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    /// Get the destination the converted document should be written to.
    pub fn destination(&self) -> Destination {
        Destination::from_path_or_stdout(self.output.as_ref())
    }
}
