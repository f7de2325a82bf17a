//! CLI Module for Oreganote
//! This module provides the command-line surface of the workspace: notes,
//! daily calendar notes, tasks, quick links, project export/import, and the
//! AI and Drive integrations.

pub mod commands;

use colored::Colorize;
use std::error::Error;

/// Executes CLI commands based on the provided arguments
pub fn execute_cli(args: &[String]) -> Result<(), Box<dyn Error>> {
    if args.is_empty() {
        print_help();
        return Ok(());
    }

    match args[0].as_str() {
        "list" | "ls" => {
            commands::show_overview()?;
        }
        "note" => {
            if args.len() < 2 {
                println!(
                    "{}  Usage: oreganote note <save|update|open|show|list|rename|delete> ...",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            commands::note_command(&args[1], &args[2..])?;
        }
        "day" => {
            if args.len() < 2 {
                println!(
                    "{}  Usage: oreganote day <set|show|rm> <YYYY-MM-DD> [TEXT]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            commands::day_command(&args[1], &args[2..])?;
        }
        "task" => {
            if args.len() < 2 {
                println!(
                    "{}  Usage: oreganote task <add|done|rm|list> [TEXT_OR_ID]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            commands::task_command(&args[1], &args[2..])?;
        }
        "link" => {
            if args.len() < 2 {
                println!(
                    "{}  Usage: oreganote link <add|rm|list> [NAME] [URL]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            commands::link_command(&args[1], &args[2..])?;
        }
        "export" => {
            if args.len() < 2 {
                println!(
                    "{}  Usage: oreganote export <html|text|json> [PATH]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            commands::export_command(&args[1], args.get(2).map(String::as_str))?;
        }
        "import" => {
            if args.len() < 2 {
                println!(
                    "{}  Usage: oreganote import <PATH> [--yes]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            commands::import_command(&args[1], has_flag(&args[2..], "--yes"))?;
        }
        "new" => {
            commands::new_project_command(has_flag(&args[1..], "--yes"))?;
        }
        "summarize" => {
            if args.len() < 2 {
                println!(
                    "{}  Usage: oreganote summarize <NOTE> [--model MODEL]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            commands::summarize_command(&args[1], flag_value(&args[2..], "--model"))?;
        }
        "rewrite" => {
            if args.len() < 2 {
                println!(
                    "{}  Usage: oreganote rewrite <NOTE> [TONE] [--model MODEL]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            let tone = args.get(2).filter(|a| !a.starts_with("--"));
            commands::rewrite_command(
                &args[1],
                tone.map(String::as_str),
                flag_value(&args[2..], "--model"),
            )?;
        }
        "drive" => {
            if args.len() < 2 {
                println!(
                    "{}  Usage: oreganote drive <NOTE> --token <ACCESS_TOKEN>",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            match flag_value(&args[2..], "--token") {
                Some(token) => commands::drive_command(&args[1], token)?,
                None => {
                    println!(
                        "{}  Error: --token <ACCESS_TOKEN> is required for Drive upload",
                        "┃".bright_magenta()
                    );
                }
            }
        }
        "help" => {
            print_help();
        }
        _ => {
            println!("{}  Unknown command: {}", "┃".bright_magenta(), args[0]);
            print_help();
        }
    }

    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let index = args.iter().position(|a| a == flag)?;
    args.get(index + 1).map(String::as_str)
}

/// Prints the help message with available commands
fn print_help() {
    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "OREGANOTE - NOTE WORKSPACE".bold()
    );

    println!("{}  {}", "┃".bright_magenta(), "USAGE:".bright_yellow());
    println!("{}  oreganote [COMMAND] [ARGS]", "┃".bright_magenta());
    println!("{}  {}", "┃".bright_magenta(), "COMMANDS:".bright_yellow());

    let commands = [
        ("list, ls", "Show the whole workspace at a glance"),
        ("note save <TITLE> <TEXT>", "Save a new note and make it active"),
        ("note update <TITLE> <TEXT>", "Rewrite the active note"),
        ("note open <NAME>", "Load a note into the editor (make active)"),
        ("note show <NAME>", "Print a note"),
        ("note rename <NAME> <NEW>", "Rename a note"),
        ("note delete <NAME>", "Delete a note (asks first)"),
        ("day set <DATE> <TEXT>", "Save the note for a calendar day"),
        ("day show [DATE]", "Show daily notes"),
        ("day rm <DATE>", "Remove a day's note"),
        ("task add <TEXT>", "Add a task to the checklist"),
        ("task done <TASK>", "Toggle a task's completion"),
        ("task rm <TASK>", "Delete a task"),
        ("link add <NAME> <URL>", "Save a quick link"),
        ("link rm <NAME>", "Delete a quick link"),
        ("export <html|text|json>", "Export the project or active note"),
        ("import <PATH>", "Replace the project from a file (asks first)"),
        ("new", "Start a new empty project (asks first)"),
        ("summarize <NOTE>", "Summarize a note with a local model"),
        ("rewrite <NOTE> [TONE]", "Rewrite a note with a local model"),
        ("drive <NOTE> --token <T>", "Upload a note to Google Drive"),
        ("help", "Display this help message"),
    ];

    for (usage, description) in commands {
        println!(
            "{}  {:<27} {}",
            "┃".bright_magenta(),
            usage.bright_white(),
            description
        );
    }
}
