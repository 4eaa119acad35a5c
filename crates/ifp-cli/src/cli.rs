use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "IFPkit CLI - Perceive pharmacophoric atom groups in molecular assemblies and encode their interactions as fingerprints.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to process analysis units in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode one or more analysis units as interaction fingerprints.
    Fingerprint(FingerprintArgs),
    /// List the atom groups perceived in an analysis unit.
    Groups(GroupsArgs),
}

/// Arguments for the `fingerprint` subcommand.
#[derive(Args, Debug)]
pub struct FingerprintArgs {
    // --- Core Arguments ---
    /// Analysis unit file(s) in TOML format. Repeat to encode several units.
    #[arg(short, long = "input", required = true, value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Path of the CSV file receiving the fingerprints.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Encoding Overrides ---
    /// Number of shell levels per group, the seed level included.
    #[arg(long, value_name = "NUM")]
    pub levels: Option<usize>,

    /// Radius increment between consecutive shell levels, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub radius: Option<f64>,

    /// Fold the fingerprint to this length. Use 0 for an unfolded fingerprint.
    #[arg(long, value_name = "NUM")]
    pub length: Option<u32>,

    /// Emit a count fingerprint instead of a binary one.
    #[arg(long)]
    pub count: bool,

    /// Qualify seed identifiers with the classes of the compounds a group spans.
    #[arg(long, value_name = "BOOL")]
    pub diff_classes: Option<bool>,

    /// Keep hydrophobic atoms separate instead of merging them into islands.
    #[arg(long)]
    pub no_merge: bool,
}

/// Arguments for the `groups` subcommand.
#[derive(Args, Debug)]
pub struct GroupsArgs {
    /// Analysis unit file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path of the CSV file receiving the perceived groups.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep hydrophobic atoms separate instead of merging them into islands.
    #[arg(long)]
    pub no_merge: bool,
}
