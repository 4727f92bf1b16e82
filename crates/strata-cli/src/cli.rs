use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Strata: namespaced object storage with queries, ordering and pagination",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Data directory (overrides the config file and STRATA_DATA_DIR)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a single object
    Get(GetArgs),
    /// Store an object, replacing any previous version
    Put(PutArgs),
    /// Remove an object
    Delete(DeleteArgs),
    /// List objects of a kind with filtering, ordering and pagination
    List(ListArgs),
    /// Count objects of a kind matching a query
    Count(CountArgs),
}

#[derive(Args)]
pub struct GetArgs {
    pub kind: String,
    pub id: String,
}

#[derive(Args)]
pub struct PutArgs {
    pub kind: String,
    /// Object id; taken from the document or generated when omitted
    #[arg(long)]
    pub id: Option<String>,
    /// JSON object to store
    pub json: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub kind: String,
    pub id: String,
}

#[derive(Args, Default)]
pub struct ListArgs {
    pub kind: String,
    /// Matches to skip before the page starts
    #[arg(long)]
    pub offset: Option<usize>,
    /// Maximum number of objects on the page
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    /// Query tree as JSON
    #[arg(long)]
    pub query: Option<String>,
    /// Equality filter `path=value`; repeated filters are alternatives
    #[arg(long = "where", value_name = "PATH=VALUE")]
    pub filters: Vec<String>,
    /// Only objects whose `time` is after this instant
    #[arg(long)]
    pub after: Option<String>,
    /// Only objects whose `time` is before this instant
    #[arg(long)]
    pub before: Option<String>,
    /// Field to sort by, as a dotted path
    #[arg(long)]
    pub order_by: Option<String>,
    /// asc or desc
    #[arg(long)]
    pub direction: Option<String>,
}

#[derive(Args)]
pub struct CountArgs {
    pub kind: String,
    /// Query tree as JSON
    #[arg(long)]
    pub query: Option<String>,
}
