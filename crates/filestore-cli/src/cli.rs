use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "filestore",
    about = "FileStore ledger: file metadata records on a shared world state",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// World-state snapshot used by the record commands
    #[arg(long, global = true, default_value = "filestore.state")]
    pub state: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP host
    Serve(ServeArgs),
    /// Store a new file record
    Store(RecordArgs),
    /// Show one file record
    Get(IdArgs),
    /// List every stored record
    List,
    /// Replace an existing file record
    Update(RecordArgs),
    /// Delete a file record
    Delete(IdArgs),
    /// Check whether a record exists
    Exists(IdArgs),
    /// Invoke a contract function by name
    Invoke(InvokeArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Overrides the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

/// Record fields. Validation is left to the contract, so every flag is
/// optional here.
#[derive(Args, Debug, Default)]
pub struct RecordArgs {
    #[arg(long, default_value_t)]
    pub id: String,
    #[arg(long, default_value_t)]
    pub owner: String,
    #[arg(long, default_value_t)]
    pub name: String,
    #[arg(long, default_value_t)]
    pub description: String,
    /// Content identifier of the stored bytes
    #[arg(long, default_value_t)]
    pub cid: String,
    #[arg(long, default_value_t)]
    pub size: i64,
    #[arg(long, default_value_t)]
    pub mime_type: String,
    #[arg(long, default_value_t)]
    pub key_id: String,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args)]
pub struct InvokeArgs {
    pub function: String,
    pub args: Vec<String>,
}
