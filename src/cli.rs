//! Terminal front end
//!
//! Same store and render model as the browser, backed by a JSON file.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use futures::executor::block_on;

use daily_habits::celebrate::Confetti;
use daily_habits::habit::Habit;
use daily_habits::persistence::{BlobBackend, JsonFileStorage};
use daily_habits::platform::{EnvSignals, HintState, classify};
use daily_habits::view::ListView;
use daily_habits::{HabitStore, LoadOutcome, SaveOutcome, Theme};

#[derive(Parser, Debug)]
#[command(name = "daily-habits", version, about = "Track daily habits from the terminal")]
struct Cli {
    /// JSON file holding habits and preferences
    #[arg(long, env = "DAILY_HABITS_FILE")]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Habit(HabitCommand),
    /// Show install instructions for a browser
    Hint {
        #[arg(long, default_value = "")]
        user_agent: String,
        /// navigator.platform, e.g. MacIntel
        #[arg(long, default_value = "")]
        platform: String,
        #[arg(long, default_value_t = 0)]
        max_touch_points: u32,
        /// Already running as an installed app
        #[arg(long)]
        standalone: bool,
        /// Stop showing the hint
        #[arg(long, conflicts_with = "reopen")]
        dismiss: bool,
        /// Show the hint again after dismissing it
        #[arg(long)]
        reopen: bool,
    },
    /// Show the theme, or switch it
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

/// Commands that work on the habit list
#[derive(Subcommand, Debug)]
enum HabitCommand {
    /// Show all habits (default)
    List,
    /// Add a habit
    Add {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Mark a habit done; accepts a unique id prefix
    Done { id: String },
    /// Delete a habit; accepts a unique id prefix
    Delete { id: String },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let path = match cli.data_file {
        Some(path) => path,
        None => default_data_file()?,
    };
    log::info!("Using data file {}", path.display());

    let storage = JsonFileStorage::new(path);
    match cli.command.unwrap_or(Command::Habit(HabitCommand::List)) {
        Command::Hint {
            user_agent,
            platform,
            max_touch_points,
            standalone,
            dismiss,
            reopen,
        } => {
            let env = EnvSignals {
                user_agent,
                navigator_platform: platform,
                max_touch_points,
                standalone,
            };
            let detected = classify(&env);
            let hints = HintState::new(&storage);
            println!("Platform: {}", detected.as_str());

            let message = if dismiss {
                hints.dismiss();
                println!("Install hint dismissed");
                None
            } else if reopen {
                hints.reopen(detected)
            } else {
                hints.visible_message(detected)
            };
            if let Some(message) = message {
                println!("{message}");
            }
            Ok(())
        }
        Command::Theme { toggle } => {
            let mut theme = Theme::load(&storage, false);
            if toggle {
                theme = theme.toggle();
                theme.save(&storage);
            }
            println!("Theme: {}", theme.as_str());
            Ok(())
        }
        Command::Habit(command) => block_on(run_habit_command(storage, command)),
    }
}

async fn run_habit_command(storage: JsonFileStorage, command: HabitCommand) -> Result<()> {
    let store = HabitStore::new(BlobBackend::new(storage));
    if let LoadOutcome::Degraded(e) = store.load().await {
        eprintln!("warning: {e}; starting with an empty list");
    }

    match command {
        HabitCommand::List => {}
        HabitCommand::Add { name } => match store.add(&name.join(" ")).await {
            Some(added) => {
                warn_unsaved(&added.saved);
                println!("Added \"{}\"", added.value.name);
            }
            None => println!("Nothing added: habit name is empty"),
        },
        HabitCommand::Done { id } => {
            let id = resolve_id(&store.habits().await, &id)?;
            if let Some(done) = store.mark_done(&id).await {
                warn_unsaved(&done.saved);
                let confetti = Confetti::random(&mut rand::rng());
                println!("{} {} done", confetti.emoji, done.value.habit.name);
                if let Some(message) = done.value.milestone {
                    println!("{message}");
                }
            }
        }
        HabitCommand::Delete { id } => {
            let id = resolve_id(&store.habits().await, &id)?;
            if let Some(removed) = store.delete(&id).await {
                warn_unsaved(&removed.saved);
                println!("Deleted \"{}\"", removed.value.name);
            }
        }
    }

    print_list(&store.habits().await);
    Ok(())
}

fn default_data_file() -> Result<PathBuf> {
    let dir = dirs::data_dir().context("could not locate a data directory; pass --data-file")?;
    Ok(dir.join("daily-habits").join("habits.json"))
}

fn warn_unsaved(saved: &SaveOutcome) {
    if let SaveOutcome::Degraded(e) = saved {
        eprintln!("warning: change not saved: {e}");
    }
}

/// Exact id, or the only habit whose id starts with `query`
fn resolve_id(habits: &[Habit], query: &str) -> Result<String> {
    if let Some(habit) = habits.iter().find(|h| h.id.as_str() == query) {
        return Ok(habit.id.to_string());
    }
    let matches: Vec<&Habit> = habits
        .iter()
        .filter(|h| h.id.as_str().starts_with(query))
        .collect();
    match matches.as_slice() {
        [one] if !query.is_empty() => Ok(one.id.to_string()),
        [] => bail!("no habit with id {query:?}"),
        _ => bail!("id {query:?} is ambiguous ({} habits match)", matches.len()),
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn print_list(habits: &[Habit]) {
    match ListView::from_habits(habits, &chrono::Local) {
        ListView::Empty => println!("No habits yet. Add one with `daily-habits add <name>`."),
        ListView::Rows(rows) => {
            for row in rows {
                println!("{:<8}  {}", short_id(&row.id), row.name);
                println!("{:<8}  {}", "", row.stats);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habits() -> Vec<Habit> {
        vec![
            Habit::new("3f2a9c1e-0000-4000-8000-000000000001".into(), "Read"),
            Habit::new("3f2b0000-0000-4000-8000-000000000002".into(), "Walk"),
            Habit::new("1709980000000".into(), "Stretch"),
        ]
    }

    #[test]
    fn test_resolve_exact_and_prefix() {
        let habits = habits();
        assert_eq!(resolve_id(&habits, "1709980000000").unwrap(), "1709980000000");
        assert_eq!(
            resolve_id(&habits, "3f2a").unwrap(),
            "3f2a9c1e-0000-4000-8000-000000000001"
        );
    }

    #[test]
    fn test_resolve_rejects_ambiguous_and_unknown() {
        let habits = habits();
        assert!(resolve_id(&habits, "3f2").is_err());
        assert!(resolve_id(&habits, "zzz").is_err());
        assert!(resolve_id(&habits, "").is_err());
        assert!(resolve_id(&[], "3f2a").is_err());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("3f2a9c1e-0000-4000"), "3f2a9c1e");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["daily-habits", "add", "Drink", "water"]).unwrap();
        match cli.command {
            Some(Command::Habit(HabitCommand::Add { name })) => {
                assert_eq!(name.join(" "), "Drink water")
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(Cli::try_parse_from(["daily-habits", "hint", "--dismiss", "--reopen"]).is_err());
    }

    #[test]
    fn test_list_commands_are_top_level() {
        for (args, expected) in [
            (vec!["daily-habits", "list"], "list"),
            (vec!["daily-habits", "done", "3f2a"], "done"),
            (vec!["daily-habits", "delete", "3f2a"], "delete"),
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            let got = match cli.command {
                Some(Command::Habit(HabitCommand::List)) => "list",
                Some(Command::Habit(HabitCommand::Done { .. })) => "done",
                Some(Command::Habit(HabitCommand::Delete { .. })) => "delete",
                other => panic!("unexpected {other:?}"),
            };
            assert_eq!(got, expected);
        }

        let cli = Cli::try_parse_from(["daily-habits", "theme", "--toggle"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Theme { toggle: true })));
        assert!(Cli::try_parse_from(["daily-habits"]).unwrap().command.is_none());
    }
}
