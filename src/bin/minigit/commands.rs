use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use minigit::log::LogOptions;
use minigit::{AddOutcome, Error, Object, Removal, Repository};
use tracing::warn;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::HashObject(args) => cmd_hash_object(args),
        Command::CatFile(args) => cmd_cat_file(args),
        Command::Add(args) => cmd_add(args),
        Command::Rm(args) => cmd_rm(args),
        Command::Commit(args) => cmd_commit(args),
        Command::Status => cmd_status(),
        Command::Log(args) => cmd_log(args),
        Command::LsObjects => cmd_ls_objects(),
    }
}

fn current_dir() -> anyhow::Result<PathBuf> {
    env::current_dir().context("cannot read the current directory")
}

fn open_repo() -> anyhow::Result<Repository> {
    let cwd = current_dir()?;
    Repository::discover(&cwd).context("no repository here; run `minigit init` first")
}

/// Paths on the command line are relative to the shell's directory, not the
/// repository root.
fn absolutize(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let cwd = current_dir()?;
    Ok(paths.iter().map(|p| cwd.join(p)).collect())
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));
    let repo = Repository::init(&path)
        .with_context(|| format!("cannot initialize {}", path.display()))?;
    println!("Initialized empty repository at {}", repo.meta_dir().display());
    Ok(())
}

fn cmd_hash_object(args: HashObjectArgs) -> anyhow::Result<()> {
    let repo = open_repo()?;
    let file = current_dir()?.join(&args.file);
    let oid = repo
        .hash_object(&file)
        .with_context(|| format!("cannot hash {}", args.file.display()))?;
    println!("{}", oid);
    Ok(())
}

fn cmd_cat_file(args: CatFileArgs) -> anyhow::Result<()> {
    let repo = open_repo()?;
    let mut out = io::stdout().lock();

    match args.kind {
        ObjectKind::Blob => {
            let blob = repo.blob(&args.hash)?;
            out.write_all(blob.content())?;
        }
        ObjectKind::Tree => {
            let tree = repo.tree(&args.hash)?;
            for entry in tree.iter() {
                writeln!(
                    out,
                    "{} {} {}\t{}",
                    entry.mode().as_octal(),
                    entry.mode().object_kind(),
                    entry.oid(),
                    entry.name()
                )?;
            }
        }
        ObjectKind::Commit => {
            let commit = repo.commit(&args.hash)?;
            out.write_all(&Object::Commit(commit).serialize())?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn cmd_add(args: PathsArgs) -> anyhow::Result<()> {
    let repo = open_repo()?;
    let paths = absolutize(&args.paths)?;

    for outcome in repo.add(&paths)? {
        match outcome {
            AddOutcome::Staged { path, oid } => println!("Added {} (blob {})", path, oid),
            AddOutcome::Unchanged { path } => println!("Unchanged {}", path),
        }
    }
    Ok(())
}

fn cmd_rm(args: PathsArgs) -> anyhow::Result<()> {
    let repo = open_repo()?;
    let paths = absolutize(&args.paths)?;

    for removal in repo.rm(&paths)? {
        match removal {
            Removal::Unstaged(path) => println!("Untracked {}", path),
            Removal::NotTracked(path) => println!("{} is not tracked.", path),
        }
    }
    Ok(())
}

fn cmd_commit(args: CommitArgs) -> anyhow::Result<()> {
    let repo = open_repo()?;

    match repo.create_commit(args.message.as_deref()) {
        Ok(oid) => {
            println!("Committed as {}", oid);
            Ok(())
        }
        Err(Error::NothingToCommit) => {
            println!("Nothing to commit.");
            Ok(())
        }
        Err(e) => Err(e).context("commit failed"),
    }
}

fn cmd_status() -> anyhow::Result<()> {
    let repo = open_repo()?;
    let status = repo.status()?;

    println!("Staged files:");
    for path in status.staged() {
        println!("  {}", path);
    }
    println!();
    println!("Untracked files:");
    for path in status.untracked() {
        println!("  {}", path);
    }
    Ok(())
}

fn cmd_log(args: LogArgs) -> anyhow::Result<()> {
    let repo = open_repo()?;

    let start = match &args.hash {
        Some(hash) => Some(repo.resolve_oid(hash)?),
        None => None,
    };
    let mut options = LogOptions::new();
    if let Some(n) = args.max_count {
        options = options.max_count(n);
    }

    let mut shown = 0;
    for entry in repo.log_with_options(start, options)? {
        let (oid, commit) = entry.context("broken commit in history")?;
        println!("commit {}", oid);
        println!("Author: {}", commit.author());
        println!("Message: {}", commit.message());
        println!();
        shown += 1;
    }

    if shown == 0 {
        println!("No commits found.");
    }
    Ok(())
}

fn cmd_ls_objects() -> anyhow::Result<()> {
    let repo = open_repo()?;

    for (oid, kind) in repo.ls_objects()? {
        match kind {
            Ok(kind) => println!("{} {}", oid, kind.as_str()),
            Err(e) => {
                warn!(oid = %oid, error = %e, "unreadable object");
                println!("{} (unreadable)", oid);
            }
        }
    }
    Ok(())
}
