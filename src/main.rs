//! Schedule Assistant - Entry Point
//!
//! Interactive chat loop: reads a line, classifies it into calendar intents,
//! resolves them against the configured event store and prints the reply.
//! Without an API key the loop accepts raw classifier JSON instead of text.

use clap::Parser;
use schedule_assistant::assistant::Assistant;
use schedule_assistant::core::config::{AssistantConfig, StoreBackend};
use schedule_assistant::core::error::Result;
use schedule_assistant::core::types::Intent;
use schedule_assistant::llm::{IntentClassifier, JsonClassifier, LlmClassifier, LlmClient, ScheduleContext};
use schedule_assistant::store::open_store;

use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Natural language scheduling assistant
#[derive(Parser, Debug)]
#[command(name = "schedule-assistant")]
#[command(about = "Manage a calendar by typing requests in plain language")]
struct Args {
    /// TOML config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Event store backend (overrides the config file)
    #[arg(long, value_enum)]
    store: Option<StoreBackend>,

    /// SQLite database path (implies --store sqlite)
    #[arg(long)]
    db: Option<PathBuf>,
}

/// Model-backed classification, or raw JSON when no model is configured
enum Classifier {
    Llm(LlmClassifier),
    Json(JsonClassifier),
}

impl IntentClassifier for Classifier {
    fn classify(&self, input: &str) -> impl Future<Output = Vec<Intent>> + Send {
        async move {
            match self {
                Classifier::Llm(c) => c.classify(input).await,
                Classifier::Json(c) => c.classify(input).await,
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AssistantConfig::load(path)?,
        None => AssistantConfig::default(),
    };
    if let Some(backend) = args.store {
        config.store.backend = backend;
    }
    if let Some(path) = args.db {
        config.store.backend = StoreBackend::Sqlite;
        config.store.path = path;
    }
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::info!("Schedule assistant starting...");

    // Create the async runtime for LLM calls
    let rt = Runtime::new()?;

    let store = open_store(&config.store)?;

    let classifier = match LlmClient::from_config(&config.llm) {
        Ok(client) => {
            tracing::info!(model = client.model(), "Using LLM classifier");
            let context = ScheduleContext::for_today(store.as_ref());
            Classifier::Llm(LlmClassifier::new(client, context))
        }
        Err(e) => {
            tracing::warn!(error = %e, "No LLM available - expecting classifier JSON as input");
            Classifier::Json(JsonClassifier)
        }
    };
    let json_mode = matches!(classifier, Classifier::Json(_));

    let mut assistant = Assistant::new(classifier, store);

    println!("\n=== SCHEDULE ASSISTANT ===");
    if json_mode {
        println!("Paste classifier JSON, e.g.");
        println!(r#"  {{"actions": [{{"action": "read", "event": {{"date": "2025-09-26"}}}}]}}"#);
    } else {
        println!("Tell me what to add, show, change or remove.");
    }
    println!("Type 'quit' to exit.");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        // Refresh date and upcoming events before each model call
        let context = ScheduleContext::for_today(assistant.store());
        if let Classifier::Llm(c) = assistant.classifier_mut() {
            c.set_context(context);
        }

        let reply = rt.block_on(assistant.handle_input(input));
        println!("{}", reply);
        println!();
    }

    drop(assistant.close());
    println!("\nGoodbye!");
    Ok(())
}
