use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use picsplit_core::NegativeCostPolicy;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "picsplit", version, about = "Split an itemised bill between friends")]
pub struct Cli {
    #[arg(long, global = true, env = "PICSPLIT_CONFIG", help = "Path to config.toml")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log engine decisions to stderr")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dedupe item names and fold discount lines into their items.
    Normalize {
        #[arg(long)]
        bill: PathBuf,
    },
    /// Start a session file from a recognised bill and a list of names.
    Init {
        #[arg(long)]
        bill: PathBuf,
        #[arg(long, value_delimiter = ',', help = "Comma-separated names")]
        people: Vec<String>,
        #[arg(long, help = "Share every item equally instead of leaving it unassigned")]
        equal: bool,
        #[arg(long, help = "Write the session here instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Check every allocation and list all problems.
    Validate {
        #[arg(long)]
        session: PathBuf,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Compute what everyone owes.
    Settle {
        #[arg(long)]
        session: PathBuf,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        #[arg(long, value_enum)]
        negative_cost: Option<NegativeCostArg>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NegativeCostArg {
    Propagate,
    Clamp,
}

impl From<NegativeCostArg> for NegativeCostPolicy {
    fn from(arg: NegativeCostArg) -> Self {
        match arg {
            NegativeCostArg::Propagate => NegativeCostPolicy::Propagate,
            NegativeCostArg::Clamp => NegativeCostPolicy::Clamp,
        }
    }
}
