use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ty", about = concat!("[t] tally v", env!("CARGO_PKG_VERSION"), " - your todos in one json file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Mark a task completed
    Done(PositionArg),
    /// Mark a task not completed
    Reopen(PositionArg),
    /// Flip a task's completion flag
    Toggle(PositionArg),
    /// Change a task's name
    Rename(RenameArgs),
    /// Delete a task
    Delete(PositionArg),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct AddArgs {
    /// Task name
    pub name: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Show only matching tasks (all, active, completed)
    #[arg(long, default_value = "all")]
    pub filter: crate::model::Filter,
}

#[derive(Args)]
pub struct PositionArg {
    /// Task position as shown by `ty list` (1-based)
    pub position: usize,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Task position as shown by `ty list` (1-based)
    pub position: usize,
    /// New name
    pub name: String,
}

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (default: 30 days ago)
    #[arg(long)]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
