use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Upper bound for `--age-days`, one century.
pub const MAX_AGE_DAYS: i64 = 36_500;

#[derive(Parser)]
#[command(
    name = "trustshift",
    about = "TrustShift: shift verification for gig and service workers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

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
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Inspect trust tokens
    Token(TokenArgs),
    /// Run the risk engine offline
    Risk(RiskArgs),
    /// Print the default configuration as TOML
    Config,
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Overrides `bind_addr` from the configuration.
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub action: TokenAction,
}

#[derive(Subcommand)]
pub enum TokenAction {
    /// Decode a token and print its claims
    Decode {
        token: String,
        /// Hex signing key. Without it the tag, if any, is not checked.
        #[arg(long)]
        key: Option<String>,
    },
}

#[derive(Args)]
pub struct RiskArgs {
    #[command(subcommand)]
    pub action: RiskAction,
}

#[derive(Subcommand)]
pub enum RiskAction {
    /// Score a hypothetical shift
    Score(ScoreArgs),
}

#[derive(Args)]
pub struct ScoreArgs {
    /// Hour of day, 0-23 UTC.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: u32,
    #[arg(long)]
    pub zone: Option<String>,
    #[arg(long, default_value = "0")]
    pub complaints: u32,
    /// Account age in days. Unknown when omitted.
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=MAX_AGE_DAYS))]
    pub age_days: Option<i64>,
}
