use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dotprops",
    about = "Inspect and edit grouped property files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print every group and entry
    Show(ShowArgs),
    /// Print the value stored under a key
    Get(KeyArgs),
    /// Store a value unless the key already has one
    Set(SetArgs),
    /// Print a value, storing the given default first if absent
    Default(ValueArgs),
    /// Remove a key
    Unset(KeyArgs),
    /// Validate that a file can be written back without loss
    Check(FileArgs),
}

#[derive(Args)]
pub struct FileArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    pub file: PathBuf,
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct KeyArgs {
    pub file: PathBuf,
    pub key: String,
}

#[derive(Args)]
pub struct ValueArgs {
    pub file: PathBuf,
    pub key: String,
    pub value: String,
}

#[derive(Args)]
pub struct SetArgs {
    pub file: PathBuf,
    pub key: String,
    pub value: String,
    /// Overwrite an existing value
    #[arg(short, long)]
    pub force: bool,
}
