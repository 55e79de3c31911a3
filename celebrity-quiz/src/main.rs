use anyhow::{bail, Context};
use celebrity_quiz::{
    Extractor, ExtractionResult, FetchConfig, Fetcher, GameRules, GameSession, GameState, GuessOutcome,
    LayoutPreset, LoadStatus, SourceConfig,
};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "celebrity-quiz", version, about = "Guess the celebrity from a scraped photo list")]
struct Cli {
    /// Give up on the page after this many milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    timeout_ms: u64,

    #[arg(long, global = true)]
    user_agent: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape the page once and print the records found.
    Scrape {
        #[command(flatten)]
        source: SourceArgs,

        /// Print records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Play the quiz in the terminal.
    Play {
        #[command(flatten)]
        source: SourceArgs,

        /// Seed for a reproducible round order.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct SourceArgs {
    #[arg(long, value_enum, default_value_t = LayoutPreset::OnThisDay)]
    layout: LayoutPreset,

    /// Listing page to scrape instead of the layout's default.
    #[arg(long)]
    url: Option<String>,

    /// Base for relative links; defaults to the layout's site.
    #[arg(long)]
    base_url: Option<String>,
}

impl SourceArgs {
    fn source_config(&self) -> SourceConfig {
        let mut source = self.layout.source();
        if let Some(url) = &self.url {
            source.source_url = url.clone();
        }
        if let Some(base_url) = &self.base_url {
            source.base_url = base_url.clone();
        }
        source
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut fetch_config = FetchConfig {
        timeout_ms: cli.timeout_ms,
        ..FetchConfig::default()
    };
    if let Some(user_agent) = cli.user_agent {
        fetch_config.user_agent = user_agent;
    }

    match cli.command {
        Command::Scrape { source, json } => scrape(fetch_config, source.source_config(), json).await,
        Command::Play { source, seed } => play(fetch_config, source.source_config(), seed).await,
    }
}

fn build_extractor(fetch_config: &FetchConfig, source: &SourceConfig) -> anyhow::Result<Extractor> {
    let fetcher = Fetcher::new(fetch_config.clone()).context("Failed to create HTTP client")?;
    let extractor = Extractor::new(Arc::new(fetcher), &source.layout, fetch_config.timeout())?;
    Ok(extractor)
}

async fn scrape(fetch_config: FetchConfig, source: SourceConfig, json: bool) -> anyhow::Result<()> {
    let extractor = build_extractor(&fetch_config, &source)?;

    match extractor.extract(&source.source_url, &source.base_url).await {
        ExtractionResult::Success(records) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    println!("{}\t{}\t{}", record.name, record.image_url, record.id.as_deref().unwrap_or("-"));
                }
            }
            info!("Printed {} records", records.len());
            Ok(())
        }
        ExtractionResult::Failure(reason) => bail!(reason),
        ExtractionResult::Pending => bail!("extraction did not complete"),
    }
}

async fn play(fetch_config: FetchConfig, source: SourceConfig, seed: Option<u64>) -> anyhow::Result<()> {
    let extractor = build_extractor(&fetch_config, &source)?;
    let rules = GameRules::default();
    let session = match seed {
        Some(seed) => GameSession::with_rng(extractor, &source, rules, StdRng::seed_from_u64(seed)),
        None => GameSession::new(extractor, &source, rules),
    };

    println!("Guess the celebrity! Type a name to guess, ?text for suggestions,");
    println!("/give-up to see the answer, /next to skip, /retry to reload, /quit to leave.");

    let mut updates = session.subscribe();
    let renderer = tokio::spawn(async move {
        let mut previous = updates.borrow_and_update().clone();
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            for line in describe(&previous, &state) {
                println!("{line}");
            }
            previous = state;
        }
    });

    reload_in_background(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "/quit" => break,
            "/give-up" => {
                session.give_up();
            }
            "/next" => {
                session.advance_round();
            }
            "/retry" => reload_in_background(&session),
            _ => {
                if let Some(partial) = line.strip_prefix('?') {
                    let state = session.update_input(partial);
                    if state.suggestions.is_empty() {
                        println!("  (no suggestions)");
                    } else {
                        println!("  maybe: {}", state.suggestions.join(", "));
                    }
                } else {
                    session.submit_guess(line);
                }
            }
        }
    }

    let state = session.snapshot();
    println!("Final score: {} (wrong guesses: {})", state.score, state.attempts);
    renderer.abort();
    Ok(())
}

fn reload_in_background(session: &GameSession) {
    let session = session.clone();
    tokio::spawn(async move {
        let state = session.start_or_reload().await;
        if let Some(message) = state.error() {
            error!("Load failed: {}", message);
        }
    });
}

/// Lines to print for the change from `previous` to `state`.
fn describe(previous: &GameState, state: &GameState) -> Vec<String> {
    let mut lines = Vec::new();

    if state.load_status != previous.load_status {
        match &state.load_status {
            LoadStatus::Loading => lines.push("Loading celebrities...".to_string()),
            LoadStatus::Ready => {}
            LoadStatus::Error(message) => {
                lines.push(format!("Error: {message}"));
                lines.push("Type /retry to try again.".to_string());
            }
            LoadStatus::Exhausted(message) => {
                lines.push(message.clone());
                lines.push(format!("Score: {} (wrong guesses: {})", state.score, state.attempts));
            }
        }
    }

    if state.outcome != previous.outcome || state.attempts != previous.attempts {
        match state.outcome {
            GuessOutcome::Correct => lines.push(format!("Correct! Score: {}", state.score)),
            GuessOutcome::Wrong => lines.push("Wrong, try again.".to_string()),
            GuessOutcome::None => {}
        }
    }

    if state.revealed && !previous.revealed {
        if let Some(current) = &state.current {
            lines.push(format!("Answer: {}", current.name));
        }
    }

    if state.current != previous.current {
        if let Some(current) = &state.current {
            lines.push(format!("Who is this? {}", current.image_url));
        }
    }

    lines
}
