//! Clap derive structures for the `geoclient` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// geoclient -- inspect GIS application contexts
#[derive(Debug, Parser)]
#[command(
    name = "geoclient",
    version,
    about = "Inspect GIS application contexts from the command line",
    long_about = "Loads an application context from a SHOGun-style backend or a local\n\
        file, resolves its layer tree against the layer registry, and shows\n\
        the resulting map state, layer tree, toolbar, and scales.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "GEOCLIENT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Application base URL (overrides profile)
    #[arg(long, short = 'b', env = "GEOCLIENT_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Backend flavour (overrides profile)
    #[arg(long, env = "GEOCLIENT_MODE", global = true)]
    pub mode: Option<BackendMode>,

    /// Read the application context from a local JSON file
    #[arg(long, short = 'f', global = true)]
    pub file: Option<PathBuf>,

    /// Local layer registry (JSON array of layers) for static mode
    #[arg(long, global = true)]
    pub layers: Option<PathBuf>,

    /// Projection unit used for map scales (m, ft, us-ft, degrees, radians)
    #[arg(long, short = 'u', global = true)]
    pub unit: Option<String>,

    /// Resolve sibling layers concurrently
    #[arg(long, global = true)]
    pub concurrent: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GEOCLIENT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "GEOCLIENT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "GEOCLIENT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackendMode {
    /// SHOGun boot backend
    Boot,
    /// SHOGun2 backend
    Shogun2,
    /// Fixed context document
    Static,
}

impl BackendMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boot => "boot",
            Self::Shogun2 => "shogun2",
            Self::Static => "static",
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load an application context and show the resulting map state
    #[command(alias = "s")]
    State(AppArgs),

    /// Show the resolved layer tree
    #[command(alias = "layers")]
    Tree(TreeArgs),

    /// Show the map toolbar built from the active modules
    #[command(alias = "tools")]
    Toolbar(ToolbarArgs),

    /// Convert map resolutions into display scales
    Scales(ScalesArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Application Commands ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AppArgs {
    /// Application id (not needed when the context is read from a file)
    pub app: Option<String>,
}

#[derive(Debug, Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub app: AppArgs,

    /// List renderable layers only, without groups
    #[arg(long)]
    pub flat: bool,
}

#[derive(Debug, Args)]
pub struct ToolbarArgs {
    #[command(flatten)]
    pub app: AppArgs,

    /// Build the toolbar for a touch device
    #[arg(long)]
    pub mobile: bool,

    /// Translate tooltips with the backend's catalog for this language
    #[arg(long, short = 'l')]
    pub lang: Option<String>,

    /// Translate tooltips with a local message catalog
    #[arg(long, conflicts_with = "lang")]
    pub locale: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ScalesArgs {
    /// Map resolutions, in projection units per pixel
    #[arg(required = true, num_args = 1..)]
    pub resolutions: Vec<f64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or replace a profile from the global flags
    Init,

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
