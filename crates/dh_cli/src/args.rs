// crates/dh_cli/src/args.rs
//
// CLI surface. Paths are local files; "-" as an input path reads stdin.
// Ids are parsed by the core newtypes so every entry point agrees on them.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use dh_core::{AccountId, SnapshotId};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "dhondt",
    version,
    disable_help_subcommand = true,
    about = "D'Hondt seat allocation: calculate, inspect and save simulations"
)]
pub struct Args {
    /// TOML config file (default: ./dhondt.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database for saved simulations (overrides the config file).
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Debug logging to stderr (RUST_LOG still wins).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Process a request and print the result.
    Calc(CalcArgs),
    /// Print the divisor table behind an allocation.
    Quotients(InputArgs),
    /// Seats held together by a set of parties.
    Coalition(CoalitionArgs),
    /// Saved simulations.
    #[command(subcommand)]
    Sim(SimCommand),
}

#[derive(Debug, ClapArgs, Clone)]
pub struct InputArgs {
    /// Request JSON file, or "-" for stdin.
    #[arg(long, short)]
    pub input: PathBuf,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = Render::Summary)]
    pub render: Render,

    /// Report title (json/html/text renderers).
    #[arg(long)]
    pub title: Option<String>,

    /// Write to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct CalcArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct CoalitionArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Member party; repeat or comma-separate.
    #[arg(long = "party", short = 'p', required = true, value_delimiter = ',')]
    pub parties: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Render {
    /// Canonical JSON of the raw summary.
    Summary,
    /// Canonical JSON of the versioned snapshot (request, summary, name).
    Snapshot,
    /// Report model as JSON.
    Json,
    Html,
    Text,
}

#[derive(Debug, Subcommand, Clone)]
pub enum SimCommand {
    /// Calculate and store under a name.
    Save {
        #[arg(long)]
        account: AccountId,
        #[arg(long)]
        name: String,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Saved simulations of an account, newest first.
    List {
        #[arg(long)]
        account: AccountId,
    },
    /// Print a saved simulation.
    Show {
        #[arg(long)]
        account: AccountId,
        #[arg(long)]
        id: SnapshotId,
        /// Print the snapshot digest (SIM:<hex>) instead of its content.
        #[arg(long, conflicts_with_all = ["render", "title", "out"])]
        digest: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Recalculate and replace a saved simulation.
    Update {
        #[arg(long)]
        account: AccountId,
        #[arg(long)]
        id: SnapshotId,
        #[arg(long)]
        name: String,
        #[command(flatten)]
        input: InputArgs,
    },
    Delete {
        #[arg(long)]
        account: AccountId,
        #[arg(long)]
        id: SnapshotId,
    },
    /// Exit 0 if the name is free for the account, 3 if taken.
    CheckName {
        #[arg(long)]
        account: AccountId,
        #[arg(long)]
        name: String,
        /// Ignore this simulation (renaming in place).
        #[arg(long)]
        exclude: Option<SnapshotId>,
    },
}
