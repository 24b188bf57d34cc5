use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use franchise_insights::dataset::loader;
use franchise_insights::store_lookup::StoreMatcher;
use franchise_insights::{EngineConfig, QueryEngine};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "franchise-insights")]
#[command(about = "Answer plain-English questions about franchise store performance")]
struct Args {
    /// Directory holding the five CSV tables (or set FRANCHISE_DATA_DIR)
    #[arg(short, long, env = "FRANCHISE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// JSON file overriding benchmarks and thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a single question
    Ask {
        question: String,
        /// Store id or name
        #[arg(short, long)]
        store: String,
        /// Print the structured answer as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask questions interactively, one per line
    Chat {
        #[arg(short, long)]
        store: String,
    },
    /// List stores
    Stores {
        #[arg(short, long)]
        brand: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let dataset = loader::load_dir(&args.data_dir)
        .with_context(|| format!("loading data from {}", args.data_dir.display()))?;
    let engine = QueryEngine::new(dataset, config);
    info!("Franchise insights ready");

    match args.command {
        Command::Ask { question, store, json } => {
            let store = StoreMatcher::default().resolve(engine.dataset(), &store)?;
            if json {
                let answer = engine.try_answer(&question, &store.store_id)?;
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("{}", engine.answer(&question, &store.store_id));
            }
        }
        Command::Chat { store } => {
            let store = StoreMatcher::default().resolve(engine.dataset(), &store)?;
            println!(
                "Ask about {} ({}, {}). Type 'quit' to exit.",
                store.store_name, store.store_id, store.brand
            );
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            loop {
                print!("> ");
                stdout.flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if matches!(question, "quit" | "exit") {
                    break;
                }
                println!("{}\n", engine.answer(question, &store.store_id));
            }
        }
        Command::Stores { brand } => {
            let dataset = engine.dataset();
            for name in dataset.brands().into_iter().filter(|b| {
                brand
                    .as_deref()
                    .map_or(true, |wanted| b.eq_ignore_ascii_case(wanted))
            }) {
                println!("{}", name);
                for store in dataset.brand_stores(name) {
                    println!("  {}\t{}", store.store_id, store.store_name);
                }
            }
        }
    }

    Ok(())
}
