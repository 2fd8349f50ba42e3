use crate::github::repos::RepoType;
use crate::github::{RetryPolicy, DEFAULT_API_BASE};
use crate::util::parse_duration;
use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "orgfolio")]
#[command(about = "Generate an organization profile README from GitHub statistics")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(
        long,
        global = true,
        env = "ORGFOLIO_ORG",
        help = "Organization to profile (overrides the config file)"
    )]
    pub org: Option<String>,

    #[arg(
        long,
        global = true,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "Access token for API calls and private clones"
    )]
    pub token: Option<String>,

    #[arg(long, global = true, default_value = DEFAULT_API_BASE, help = "GitHub API base URL")]
    pub api_base: String,

    #[arg(long, global = true, help = "Path to profile.toml")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        allow_hyphen_values = true,
        help = "Hours added to UTC for the commit-time chart (overrides the config file)"
    )]
    pub utc_offset: Option<i32>,

    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "More logging (-v info, -vv debug)"
    )]
    pub verbose: u8,
}

#[derive(Args, Clone, Debug)]
pub struct FetchArgs {
    #[arg(
        long,
        value_enum,
        default_value_t = RepoType::All,
        help = "Which repositories to include"
    )]
    pub repo_type: RepoType,

    #[arg(long, default_value_t = 5, help = "Attempts per statistics request")]
    pub retries: u32,

    #[arg(
        long,
        default_value = "3s",
        value_parser = parse_duration,
        help = "Base delay between attempts; grows linearly"
    )]
    pub retry_delay: Duration,

    #[arg(
        long,
        default_value = "15s",
        value_parser = parse_duration,
        help = "Pause before the second pass over failed repositories"
    )]
    pub cooldown: Duration,

    #[arg(long, default_value_t = 2, help = "Warm-up rounds before fetching statistics")]
    pub warmup_rounds: u32,

    #[arg(
        long,
        default_value = "15s",
        value_parser = parse_duration,
        help = "Pause after each warm-up round"
    )]
    pub warmup_wait: Duration,

    #[arg(long, help = "Skip cloning repositories and counting lines of code")]
    pub skip_loc: bool,
}

impl FetchArgs {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retries,
            base_delay: self.retry_delay,
            accept_pending: false,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, aggregate and write the profile document
    Generate {
        #[clap(flatten)]
        fetch: FetchArgs,

        #[arg(long, help = "Output path (default: profile/README.md next to the config)")]
        output: Option<PathBuf>,

        #[arg(long, help = "Also store the aggregated data as JSON")]
        snapshot: Option<PathBuf>,

        #[arg(long, help = "Compare with the existing document instead of writing it")]
        check: bool,
    },
    /// Fetch and aggregate, then print the data as JSON
    Snapshot {
        #[clap(flatten)]
        fetch: FetchArgs,

        #[arg(long, help = "Write to this file instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Render a stored snapshot without touching the network
    Render {
        #[arg(long = "from", help = "Snapshot JSON produced by `snapshot`")]
        from: PathBuf,

        #[arg(long, help = "Output path (default: profile/README.md next to the config)")]
        output: Option<PathBuf>,

        #[arg(long, help = "Compare with the existing document instead of writing it")]
        check: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Generate {
                fetch,
                output,
                snapshot,
                check,
            } => crate::generate::exec(self.common, fetch, output, snapshot, check),
            Commands::Snapshot { fetch, output } => {
                crate::snapshot::exec(self.common, fetch, output)
            }
            Commands::Render {
                from,
                output,
                check,
            } => crate::render::exec(self.common, from, output, check),
        }
    }
}
