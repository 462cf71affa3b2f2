use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::cli::commands::*;
use crate::cli::output::{format_task_list, task_to_json};
use crate::io::recovery;
use crate::model::task::TaskId;
use crate::store::TaskStore;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let dir = resolve_dir(cli.dir.as_deref())?;

    // No subcommand is handled in main.rs (it launches the TUI).
    let Some(command) = cli.command else {
        return Ok(());
    };

    match command {
        Commands::Add(args) => cmd_add(&dir, args),
        Commands::List(args) => cmd_list(&dir, args, json),
        Commands::Done(args) => cmd_set_completed(&dir, args.position, true),
        Commands::Reopen(args) => cmd_set_completed(&dir, args.position, false),
        Commands::Toggle(args) => cmd_toggle(&dir, args.position),
        Commands::Rename(args) => cmd_rename(&dir, args),
        Commands::Delete(args) => cmd_delete(&dir, args.position),
        Commands::Recovery(args) => cmd_recovery(&dir, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the data directory: the `-C` override or the current directory.
pub fn resolve_dir(override_dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match override_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e).into()),
        None => std::env::current_dir().map_err(Into::into),
    }
}

/// Map a 1-based list position to a task id.
fn task_at(store: &TaskStore, position: usize) -> Result<TaskId, Box<dyn std::error::Error>> {
    if position == 0 || position > store.len() {
        return Err(format!(
            "no task at position {} (list has {} task{})",
            position,
            store.len(),
            if store.len() == 1 { "" } else { "s" }
        )
        .into());
    }
    Ok(store.tasks()[position - 1].id)
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_add(dir: &Path, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = TaskStore::load(dir)?;
    match store.add(&args.name)? {
        Some(_) => println!("added \"{}\" ({} total)", args.name.trim(), store.len()),
        None => println!("nothing to add"),
    }
    Ok(())
}

fn cmd_list(dir: &Path, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = TaskStore::load(dir)?;

    // Pair every task with its position in the FULL list before filtering,
    // so the printed numbers stay valid for done/rename/delete.
    let entries: Vec<(usize, &crate::model::Task)> = store
        .tasks()
        .iter()
        .enumerate()
        .filter(|(_, t)| args.filter.matches(t))
        .map(|(i, t)| (i + 1, t))
        .collect();

    if json {
        let out: Vec<_> = entries
            .iter()
            .map(|(position, task)| task_to_json(*position, task))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if entries.is_empty() {
        match args.filter {
            crate::model::Filter::All => println!("no tasks"),
            mode => println!("no {} tasks", mode),
        }
        return Ok(());
    }
    println!("{}", format_task_list(&entries));
    Ok(())
}

fn cmd_set_completed(
    dir: &Path,
    position: usize,
    value: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = TaskStore::load(dir)?;
    let id = task_at(&store, position)?;
    let name = store.tasks()[position - 1].name.clone();
    store.set_completed(id, value)?;
    if value {
        println!("done: {}", name);
    } else {
        println!("reopened: {}", name);
    }
    Ok(())
}

fn cmd_toggle(dir: &Path, position: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = TaskStore::load(dir)?;
    let id = task_at(&store, position)?;
    let name = store.tasks()[position - 1].name.clone();
    let now_completed = store.toggle(id)?;
    if now_completed {
        println!("done: {}", name);
    } else {
        println!("reopened: {}", name);
    }
    Ok(())
}

fn cmd_rename(dir: &Path, args: RenameArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = TaskStore::load(dir)?;
    let id = task_at(&store, args.position)?;
    let old_name = store.tasks()[args.position - 1].name.clone();
    store.rename(id, &args.name)?;
    println!("renamed \"{}\" to \"{}\"", old_name, args.name);
    Ok(())
}

fn cmd_delete(dir: &Path, position: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = TaskStore::load(dir)?;
    let id = task_at(&store, position)?;
    let removed = store.delete(id)?;
    println!("deleted: {}", removed.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(
    dir: &Path,
    args: RecoveryCmd,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(dir).display());
            Ok(())
        }
        Some(RecoveryAction::Prune(prune)) => {
            let before = match prune.before.as_deref() {
                Some(ts) => Some(
                    DateTime::parse_from_rfc3339(ts)
                        .map_err(|e| format!("invalid --before timestamp '{}': {}", ts, e))?
                        .with_timezone(&Utc),
                ),
                None => None,
            };
            let removed = recovery::prune_recovery(dir, before, prune.all)?;
            println!(
                "pruned {} entr{}",
                removed,
                if removed == 1 { "y" } else { "ies" }
            );
            Ok(())
        }
        None => {
            let limit = args.limit.or(Some(10));
            let entries = recovery::read_recovery_entries(dir, limit);
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if entries.is_empty() {
                println!("recovery log is empty");
                return Ok(());
            }
            for entry in &entries {
                println!(
                    "{} — {}: {}",
                    entry
                        .timestamp
                        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                    entry.category,
                    entry.description
                );
                if !entry.body.is_empty() {
                    for line in entry.body.lines() {
                        println!("    {}", line);
                    }
                }
            }
            Ok(())
        }
    }
}
