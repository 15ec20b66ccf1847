//! Scripted Turn Runner
//!
//! Replays a fixed set of classified turns (plain add, missing details,
//! conflict, lookup, delete, small talk) against a seeded event store and
//! prints each reply. No model is needed.

use clap::Parser;
use schedule_assistant::command::TurnProcessor;
use schedule_assistant::core::error::Result;
use schedule_assistant::core::types::{Event, Intent, IntentAction};
use schedule_assistant::store::{EventStore, InMemoryEventStore, SqliteEventStore};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Scripted Turn Runner - replay demo turns without a model
#[derive(Parser, Debug)]
#[command(name = "scripted_turns")]
#[command(about = "Replay demonstration turns against a seeded event store")]
struct Args {
    /// Use a SQLite database at this path instead of the in-memory store
    #[arg(long)]
    db: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct TurnReport {
    input: String,
    dispositions: Vec<String>,
    reply: String,
}

fn script() -> Vec<(&'static str, Vec<Intent>)> {
    vec![
        (
            "Add dinner with Minsu tomorrow at 8pm",
            vec![Intent::new(
                IntentAction::Create,
                Event::new()
                    .with_title("Dinner")
                    .with_date("2025-09-26")
                    .with_time("20:00")
                    .with_participants(["Minsu"]),
            )],
        ),
        (
            "Tomorrow at 5",
            vec![Intent::clarify(
                IntentAction::Create,
                Event::new().with_date("2025-09-26").with_time("17:00"),
                ["title"],
            )],
        ),
        (
            "Add a workout tomorrow at 7pm",
            vec![Intent::new(
                IntentAction::Create,
                Event::new()
                    .with_title("Workout")
                    .with_date("2025-09-26")
                    .with_time("19:00"),
            )],
        ),
        (
            "What's on tomorrow?",
            vec![Intent::new(
                IntentAction::Read,
                Event::new().with_date("2025-09-26"),
            )],
        ),
        (
            "Cancel tomorrow's meeting",
            vec![Intent::new(
                IntentAction::Delete,
                Event::new().with_title("Meeting").with_date("2025-09-26"),
            )],
        ),
        ("I've been so tired lately", vec![Intent::none()]),
    ]
}

fn seed(store: &dyn EventStore) -> Result<()> {
    store.create(
        &Event::new()
            .with_title("Meeting")
            .with_date("2025-09-26")
            .with_time("19:00")
            .with_participants(["Team"]),
    )?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("schedule_assistant=warn")
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let store: Box<dyn EventStore> = match &args.db {
        Some(path) => Box::new(SqliteEventStore::open(path, Duration::from_secs(5))?),
        None => Box::new(InMemoryEventStore::new()),
    };
    seed(store.as_ref())?;

    let processor = TurnProcessor::new(store.as_ref());
    let mut reports = Vec::new();

    for (input, intents) in script() {
        let result = processor.process_turn(Some(input), &intents);

        if args.format == "json" {
            reports.push(TurnReport {
                input: input.to_string(),
                dispositions: result
                    .dispositions()
                    .iter()
                    .map(|d| format!("{:?}", d))
                    .collect(),
                reply: result.text(),
            });
        } else {
            println!("=== {} ===", input);
            println!("{}", result);
            println!();
        }
    }

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}
