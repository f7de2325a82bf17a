use crate::app::{PendingAction, Workspace};
use crate::export;
use crate::handlers::{ai, drive};
use crate::models::{read_snapshot, write_snapshot};
use chrono::NaiveDate;
use colored::Colorize;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Shows every collection in the workspace at a glance
pub fn show_overview() -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::open()?;

    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "OREGANOTE WORKSPACE".bold()
    );
    println!("{}", "─".repeat(60).bright_magenta());

    println!("{}  {}", "┃".bright_magenta(), "NOTES".bright_yellow());
    if workspace.notes().is_empty() {
        println!("{}  (no saved notes)", "┃".bright_magenta());
    }
    for note in workspace.notes() {
        let marker = if workspace.active_note_id() == Some(note.id) {
            "*".bright_green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{} {} {}  {}",
            "┃".bright_magenta(),
            marker,
            note.name.bright_white(),
            note.last_modified
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .dimmed()
        );
    }

    println!("{}  {}", "┃".bright_magenta(), "DAILY NOTES".bright_yellow());
    if workspace.daily_notes().is_empty() {
        println!("{}  (none)", "┃".bright_magenta());
    }
    for (date, text) in workspace.daily_notes() {
        println!(
            "{}  {}  {}",
            "┃".bright_magenta(),
            date.to_string().bright_white(),
            first_line(text)
        );
    }

    println!("{}  {}", "┃".bright_magenta(), "TASKS".bright_yellow());
    if workspace.tasks().is_empty() {
        println!("{}  (none)", "┃".bright_magenta());
    }
    for task in workspace.tasks() {
        let mark = if task.completed {
            "[x]".bright_green().to_string()
        } else {
            "[ ]".to_string()
        };
        println!("{}  {} {}", "┃".bright_magenta(), mark, task.text);
    }

    println!("{}  {}", "┃".bright_magenta(), "LINKS".bright_yellow());
    if workspace.links().is_empty() {
        println!("{}  (none)", "┃".bright_magenta());
    }
    for link in workspace.links() {
        println!(
            "{}  {} {} {}",
            "┃".bright_magenta(),
            link.name.bright_white(),
            "->".dimmed(),
            link.url.bright_blue()
        );
    }

    Ok(())
}

/// Dispatches `note` subcommands
pub fn note_command(action: &str, args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut workspace = Workspace::open()?;

    match action {
        "save" => {
            let (title, content) = match (args.first(), args.get(1)) {
                (Some(t), Some(c)) => (t.clone(), c.clone()),
                _ => {
                    println!(
                        "{}  Usage: oreganote note save <TITLE> <TEXT>",
                        "┃".bright_magenta()
                    );
                    return Ok(());
                }
            };
            match workspace.save_note(&title, &content, None) {
                Ok(note) => {
                    println!(
                        "{}  Saved note {} ({})",
                        "┃".bright_magenta(),
                        note.name.bright_white(),
                        note.id.to_string().dimmed()
                    );
                }
                Err(err) => println!("{}  Error: {}", "┃".bright_magenta(), err),
            }
        }
        "update" => {
            let (title, content) = match (args.first(), args.get(1)) {
                (Some(t), Some(c)) => (t.clone(), c.clone()),
                _ => {
                    println!(
                        "{}  Usage: oreganote note update <TITLE> <TEXT>",
                        "┃".bright_magenta()
                    );
                    return Ok(());
                }
            };
            let active = workspace.active_note_id();
            if active.is_none() {
                println!(
                    "{}  No active note. Use 'note open <NAME>' first or 'note save' to create one.",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            match workspace.save_note(&title, &content, active) {
                Ok(note) => {
                    println!(
                        "{}  Updated note {}",
                        "┃".bright_magenta(),
                        note.name.bright_white()
                    );
                }
                Err(err) => println!("{}  Error: {}", "┃".bright_magenta(), err),
            }
        }
        "open" => {
            let Some(name) = args.first() else {
                println!("{}  Usage: oreganote note open <NAME>", "┃".bright_magenta());
                return Ok(());
            };
            match resolve_note(&workspace, name) {
                Some(id) => {
                    let note = workspace.load_note(id)?;
                    println!(
                        "{}  Opened {}",
                        "┃".bright_magenta(),
                        note.name.bright_white()
                    );
                }
                None => print_note_not_found(&workspace, name),
            }
        }
        "show" => {
            let Some(name) = args.first() else {
                println!("{}  Usage: oreganote note show <NAME>", "┃".bright_magenta());
                return Ok(());
            };
            match resolve_note(&workspace, name).and_then(|id| workspace.find_note(id)) {
                Some(note) => {
                    println!("{}  {}", "┃".bright_magenta(), note.name.bold());
                    println!(
                        "{}  Last modified: {}",
                        "┃".bright_magenta(),
                        note.last_modified.format("%Y-%m-%d %H:%M").to_string().dimmed()
                    );
                    println!("{}", "─".repeat(60).bright_magenta());
                    println!("{}", note.content);
                }
                None => print_note_not_found(&workspace, name),
            }
        }
        "list" => {
            if workspace.notes().is_empty() {
                println!("{}  No saved notes", "┃".bright_magenta());
            }
            for note in workspace.notes() {
                println!(
                    "{}  {}  {}",
                    "┃".bright_magenta(),
                    note.name.bright_white(),
                    note.id.to_string().dimmed()
                );
            }
        }
        "rename" => {
            let (name, new_name) = match (args.first(), args.get(1)) {
                (Some(n), Some(nn)) => (n.clone(), nn.clone()),
                _ => {
                    println!(
                        "{}  Usage: oreganote note rename <NAME> <NEW_NAME>",
                        "┃".bright_magenta()
                    );
                    return Ok(());
                }
            };
            match resolve_note(&workspace, &name) {
                Some(id) => match workspace.rename_note(id, &new_name) {
                    Ok(()) => {
                        println!(
                            "{}  Renamed to {}",
                            "┃".bright_magenta(),
                            new_name.bright_white()
                        );
                    }
                    Err(err) => println!("{}  Error: {}", "┃".bright_magenta(), err),
                },
                None => print_note_not_found(&workspace, &name),
            }
        }
        "delete" | "rm" => {
            let Some(name) = args.first() else {
                println!(
                    "{}  Usage: oreganote note delete <NAME> [--yes]",
                    "┃".bright_magenta()
                );
                return Ok(());
            };
            let assume_yes = args.iter().any(|a| a == "--yes");
            match resolve_note(&workspace, name) {
                Some(id) => {
                    let prompt = workspace.request_confirmation(PendingAction::DeleteNote(id));
                    if assume_yes || confirm(&prompt) {
                        workspace.confirm_pending();
                        println!("{}  Note deleted", "┃".bright_magenta());
                    } else {
                        workspace.cancel_pending();
                        println!("{}  Cancelled", "┃".bright_magenta());
                    }
                }
                None => print_note_not_found(&workspace, name),
            }
        }
        _ => {
            println!(
                "{}  Unknown note action: {}",
                "┃".bright_magenta(),
                action
            );
        }
    }

    Ok(())
}

/// Dispatches `day` subcommands for daily calendar notes
pub fn day_command(action: &str, args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut workspace = Workspace::open()?;

    match action {
        "set" => {
            let (date, text) = match (args.first(), args.get(1)) {
                (Some(d), Some(t)) => (d.clone(), t.clone()),
                _ => {
                    println!(
                        "{}  Usage: oreganote day set <YYYY-MM-DD> <TEXT>",
                        "┃".bright_magenta()
                    );
                    return Ok(());
                }
            };
            let Some(date) = parse_date(&date) else {
                return Ok(());
            };
            workspace.upsert_daily_note(date, text);
            println!("{}  Saved note for {}", "┃".bright_magenta(), date);
        }
        "show" => match args.first() {
            Some(raw) => {
                let Some(date) = parse_date(raw) else {
                    return Ok(());
                };
                match workspace.daily_notes().get(&date) {
                    Some(text) => {
                        println!(
                            "{}  {}",
                            "┃".bright_magenta(),
                            date.to_string().bright_white()
                        );
                        println!("{}", text);
                    }
                    None => println!("{}  No note for {}", "┃".bright_magenta(), date),
                }
            }
            None => {
                if workspace.daily_notes().is_empty() {
                    println!("{}  No daily notes", "┃".bright_magenta());
                }
                for (date, text) in workspace.daily_notes() {
                    println!(
                        "{}  {}  {}",
                        "┃".bright_magenta(),
                        date.to_string().bright_white(),
                        first_line(text)
                    );
                }
            }
        },
        "rm" | "delete" => {
            let Some(raw) = args.first() else {
                println!(
                    "{}  Usage: oreganote day rm <YYYY-MM-DD>",
                    "┃".bright_magenta()
                );
                return Ok(());
            };
            let Some(date) = parse_date(raw) else {
                return Ok(());
            };
            if workspace.delete_daily_note(date) {
                println!("{}  Removed note for {}", "┃".bright_magenta(), date);
            } else {
                println!("{}  No note for {}", "┃".bright_magenta(), date);
            }
        }
        _ => {
            println!("{}  Unknown day action: {}", "┃".bright_magenta(), action);
        }
    }

    Ok(())
}

/// Dispatches `task` subcommands
pub fn task_command(action: &str, args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut workspace = Workspace::open()?;

    match action {
        "add" => {
            let Some(text) = args.first() else {
                println!("{}  Usage: oreganote task add <TEXT>", "┃".bright_magenta());
                return Ok(());
            };
            match workspace.add_task(text) {
                Some(task) => {
                    println!(
                        "{}  Added task: {}",
                        "┃".bright_magenta(),
                        task.text.bright_white()
                    );
                }
                None => {
                    println!("{}  Task text cannot be empty", "┃".bright_magenta());
                }
            }
        }
        "done" | "toggle" => {
            let Some(text) = args.first() else {
                println!("{}  Usage: oreganote task done <TEXT_OR_ID>", "┃".bright_magenta());
                return Ok(());
            };
            match resolve_task(&workspace, text) {
                Some(id) => {
                    workspace.toggle_task(id);
                    println!("{}  Toggled task", "┃".bright_magenta());
                }
                None => println!("{}  No task matching: {}", "┃".bright_magenta(), text),
            }
        }
        "rm" | "delete" => {
            let Some(text) = args.first() else {
                println!("{}  Usage: oreganote task rm <TEXT_OR_ID>", "┃".bright_magenta());
                return Ok(());
            };
            match resolve_task(&workspace, text) {
                Some(id) => {
                    workspace.delete_task(id);
                    println!("{}  Task deleted", "┃".bright_magenta());
                }
                None => println!("{}  No task matching: {}", "┃".bright_magenta(), text),
            }
        }
        "list" | "ls" => {
            if workspace.tasks().is_empty() {
                println!("{}  No tasks", "┃".bright_magenta());
            }
            for task in workspace.tasks() {
                let mark = if task.completed {
                    "[x]".bright_green().to_string()
                } else {
                    "[ ]".to_string()
                };
                println!(
                    "{}  {} {}  {}",
                    "┃".bright_magenta(),
                    mark,
                    task.text,
                    task.id.to_string().dimmed()
                );
            }
        }
        _ => {
            println!("{}  Unknown task action: {}", "┃".bright_magenta(), action);
        }
    }

    Ok(())
}

/// Dispatches `link` subcommands
pub fn link_command(action: &str, args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut workspace = Workspace::open()?;

    match action {
        "add" => {
            let (name, url) = match (args.first(), args.get(1)) {
                (Some(n), Some(u)) => (n.clone(), u.clone()),
                _ => {
                    println!(
                        "{}  Usage: oreganote link add <NAME> <URL>",
                        "┃".bright_magenta()
                    );
                    return Ok(());
                }
            };
            match workspace.upsert_link(&name, &url, None) {
                Ok(link) => {
                    println!(
                        "{}  Saved link {} {} {}",
                        "┃".bright_magenta(),
                        link.name.bright_white(),
                        "->".dimmed(),
                        link.url.bright_blue()
                    );
                }
                Err(err) => println!("{}  Error: {}", "┃".bright_magenta(), err),
            }
        }
        "rm" | "delete" => {
            let Some(name) = args.first() else {
                println!("{}  Usage: oreganote link rm <NAME>", "┃".bright_magenta());
                return Ok(());
            };
            match resolve_link(&workspace, name) {
                Some(id) => {
                    workspace.delete_link(id);
                    println!("{}  Link deleted", "┃".bright_magenta());
                }
                None => println!("{}  No link matching: {}", "┃".bright_magenta(), name),
            }
        }
        "list" | "ls" => {
            if workspace.links().is_empty() {
                println!("{}  No links", "┃".bright_magenta());
            }
            for link in workspace.links() {
                println!(
                    "{}  {} {} {}",
                    "┃".bright_magenta(),
                    link.name.bright_white(),
                    "->".dimmed(),
                    link.url.bright_blue()
                );
            }
        }
        _ => {
            println!("{}  Unknown link action: {}", "┃".bright_magenta(), action);
        }
    }

    Ok(())
}

/// Exports the project (or the active note for `html`) to a file
pub fn export_command(format: &str, path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::open()?;

    match format {
        "html" => {
            // The active note exports on its own; with no active note the
            // whole project is exported instead.
            let (document, default_name) = match workspace.active_note() {
                Some(note) => (
                    export::html::note_document(note),
                    export::export_filename(&note.name, "html"),
                ),
                None => (
                    export::html::project_document(
                        workspace.notes(),
                        workspace.daily_notes(),
                        workspace.tasks(),
                        workspace.links(),
                    ),
                    export::export_filename("", "html"),
                ),
            };
            let target = path.map(str::to_string).unwrap_or(default_name);
            std::fs::write(&target, document)?;
            println!(
                "{}  Exported HTML to {}",
                "┃".bright_magenta(),
                target.bright_white()
            );
        }
        "text" | "txt" => {
            let dump = export::text::project_dump(
                workspace.notes(),
                workspace.daily_notes(),
                workspace.tasks(),
                workspace.links(),
            );
            let target = path
                .map(str::to_string)
                .unwrap_or_else(|| export::export_filename("", "txt"));
            std::fs::write(&target, dump)?;
            println!(
                "{}  Exported text dump to {}",
                "┃".bright_magenta(),
                target.bright_white()
            );
        }
        "json" => {
            let snapshot = workspace.export_snapshot();
            let target = path
                .map(str::to_string)
                .unwrap_or_else(|| export::export_filename("", "json"));
            write_snapshot(&snapshot, Path::new(&target))?;
            println!(
                "{}  Exported project snapshot to {}",
                "┃".bright_magenta(),
                target.bright_white()
            );
        }
        _ => {
            println!(
                "{}  Unknown export format: {} (expected html, text or json)",
                "┃".bright_magenta(),
                format
            );
        }
    }

    Ok(())
}

/// Replaces the whole project with a snapshot read from disk
pub fn import_command(path: &str, assume_yes: bool) -> Result<(), Box<dyn Error>> {
    let snapshot = read_snapshot(Path::new(path))?;
    let mut workspace = Workspace::open()?;

    let prompt = workspace.request_confirmation(PendingAction::ImportSnapshot(snapshot));
    if assume_yes || confirm(&prompt) {
        workspace.confirm_pending();
        println!(
            "{}  Imported project from {}",
            "┃".bright_magenta(),
            path.bright_white()
        );
    } else {
        workspace.cancel_pending();
        println!("{}  Cancelled", "┃".bright_magenta());
    }

    Ok(())
}

/// Erases everything and starts an empty project
pub fn new_project_command(assume_yes: bool) -> Result<(), Box<dyn Error>> {
    let mut workspace = Workspace::open()?;

    let prompt = workspace.request_confirmation(PendingAction::ResetAll);
    if assume_yes || confirm(&prompt) {
        workspace.confirm_pending();
        println!("{}  Started a new empty project", "┃".bright_magenta());
    } else {
        workspace.cancel_pending();
        println!("{}  Cancelled", "┃".bright_magenta());
    }

    Ok(())
}

/// Summarizes a note with a local Ollama model
pub fn summarize_command(name: &str, model: Option<&str>) -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::open()?;
    let Some(note) = resolve_note(&workspace, name).and_then(|id| workspace.find_note(id)) else {
        print_note_not_found(&workspace, name);
        return Ok(());
    };

    let runtime = Runtime::new()?;
    let model = match model {
        Some(m) => m.to_string(),
        None => runtime.block_on(ai::default_model())?,
    };

    println!(
        "{}  Summarizing {} with {}...",
        "┃".bright_magenta(),
        note.name.bright_white(),
        model.bright_yellow()
    );

    let summary = runtime.block_on(ai::summarize_note(&model, &note.content))?;
    println!("{}  {}", "┃".bright_magenta(), "SUMMARY".bright_yellow());
    println!("{}", summary.summary);
    if !summary.key_topics.is_empty() {
        println!("{}  {}", "┃".bright_magenta(), "KEY TOPICS".bright_yellow());
        println!("{}", summary.key_topics);
    }

    Ok(())
}

/// Rewrites a note with a local Ollama model. The result is printed, not
/// written back; follow with `note update` to keep it.
pub fn rewrite_command(
    name: &str,
    tone: Option<&str>,
    model: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::open()?;
    let Some(note) = resolve_note(&workspace, name).and_then(|id| workspace.find_note(id)) else {
        print_note_not_found(&workspace, name);
        return Ok(());
    };

    let runtime = Runtime::new()?;
    let model = match model {
        Some(m) => m.to_string(),
        None => runtime.block_on(ai::default_model())?,
    };

    println!(
        "{}  Rewriting {} with {}...",
        "┃".bright_magenta(),
        note.name.bright_white(),
        model.bright_yellow()
    );

    let rewritten = runtime.block_on(ai::rewrite_note(&model, &note.content, tone))?;
    println!("{}", "─".repeat(60).bright_magenta());
    println!("{}", rewritten);

    Ok(())
}

/// Uploads a note to the root of the user's Google Drive
pub fn drive_command(name: &str, token: &str) -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::open()?;
    let Some(note) = resolve_note(&workspace, name).and_then(|id| workspace.find_note(id)) else {
        print_note_not_found(&workspace, name);
        return Ok(());
    };

    println!(
        "{}  Uploading {} to Google Drive...",
        "┃".bright_magenta(),
        note.name.bright_white()
    );

    let runtime = Runtime::new()?;
    let file = runtime.block_on(drive::upload_note(&note.name, &note.content, token))?;

    println!(
        "{}  Uploaded as {} ({})",
        "┃".bright_magenta(),
        file.file_name.bright_white(),
        file.file_id.dimmed()
    );
    if let Some(link) = file.web_view_link {
        println!("{}  {}", "┃".bright_magenta(), link.bright_blue());
    }

    Ok(())
}

// ---- Resolution and prompt helpers ---------------------------------------

/// Resolves a note argument: UUID first, then name lookup.
fn resolve_note(workspace: &Workspace, name_or_id: &str) -> Option<Uuid> {
    if let Ok(id) = Uuid::parse_str(name_or_id) {
        if workspace.find_note(id).is_some() {
            return Some(id);
        }
    }
    workspace.find_note_by_name(name_or_id).map(|n| n.id)
}

/// Resolves a task argument: UUID first, then case-insensitive text match,
/// exact before substring.
fn resolve_task(workspace: &Workspace, text_or_id: &str) -> Option<Uuid> {
    if let Ok(id) = Uuid::parse_str(text_or_id) {
        if workspace.tasks().iter().any(|t| t.id == id) {
            return Some(id);
        }
    }
    let wanted = text_or_id.to_lowercase();
    workspace
        .tasks()
        .iter()
        .find(|t| t.text.to_lowercase() == wanted)
        .or_else(|| {
            workspace
                .tasks()
                .iter()
                .find(|t| t.text.to_lowercase().contains(&wanted))
        })
        .map(|t| t.id)
}

fn resolve_link(workspace: &Workspace, name_or_id: &str) -> Option<Uuid> {
    if let Ok(id) = Uuid::parse_str(name_or_id) {
        if workspace.links().iter().any(|l| l.id == id) {
            return Some(id);
        }
    }
    let wanted = name_or_id.to_lowercase();
    workspace
        .links()
        .iter()
        .find(|l| l.name.to_lowercase() == wanted)
        .map(|l| l.id)
}

fn print_note_not_found(workspace: &Workspace, name: &str) {
    println!(
        "{}  No note found matching: {}",
        "┃".bright_magenta(),
        name
    );
    if workspace.notes().is_empty() {
        return;
    }
    println!("{}  Available notes:", "┃".bright_magenta());
    for note in workspace.notes().iter().take(10) {
        println!(
            "{}  {}",
            "┃".bright_magenta(),
            note.name.bright_white()
        );
    }
    if workspace.notes().len() > 10 {
        println!(
            "{}  ... and {} more",
            "┃".bright_magenta(),
            workspace.notes().len() - 10
        );
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            println!(
                "{}  Invalid date: {} (expected YYYY-MM-DD)",
                "┃".bright_magenta(),
                raw
            );
            None
        }
    }
}

/// Asks the user a y/N question on stdin.
fn confirm(prompt: &str) -> bool {
    print!("{}  {} [y/N] ", "┃".bright_magenta(), prompt);
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
