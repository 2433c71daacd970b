use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "minigit",
    about = "A minimal content-addressable version-control store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty repository
    Init(InitArgs),
    /// Store a file as a blob and print its hash
    HashObject(HashObjectArgs),
    /// Print a stored object
    CatFile(CatFileArgs),
    /// Stage files for the next commit
    Add(PathsArgs),
    /// Remove files from the staging index
    Rm(PathsArgs),
    /// Record staged and tracked files as a new commit
    Commit(CommitArgs),
    /// Show staged and untracked files
    Status,
    /// Show commit history
    Log(LogArgs),
    /// List every stored object with its type
    LsObjects,
}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct HashObjectArgs {
    /// File to store
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

#[derive(Args)]
pub struct CatFileArgs {
    /// Expected object type
    #[arg(value_enum)]
    pub kind: ObjectKind,
    /// Full or abbreviated object hash
    pub hash: String,
}

#[derive(Args)]
pub struct PathsArgs {
    /// Files or directories
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Args)]
pub struct CommitArgs {
    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Args)]
pub struct LogArgs {
    /// Commit to start from (defaults to the branch head)
    pub hash: Option<String>,
    /// Show at most this many commits
    #[arg(short = 'n', long = "max-count")]
    pub max_count: Option<usize>,
}
