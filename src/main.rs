//! Inventomatic CLI
//!
//! Command-line front end for the client state engine:
//! - Inspect and change preferences
//! - Format amounts in the configured currency
//! - Talk to the inventory assistant
//! - Export data and sample memory usage

use anyhow::Context;
use clap::{Parser, Subcommand};
use inventomatic::chat::ChatHistory;
use inventomatic::config::{generate_default_config, Config};
use inventomatic::currency::{format_currency, usd_to_php};
use inventomatic::inventory::{DataSnapshot, ExportDocument};
use inventomatic::monitor::{MemorySampler, SystemMemoryProbe};
use inventomatic::preferences::{PreferenceKey, PreferenceStore, PreferenceUpdate};
use inventomatic::storage::{FileStore, KeyValueStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "inventomatic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inventomatic client state engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overrides config
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or change preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Format an amount
    Format {
        /// Amount to format
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Currency code (default: stored preference)
        #[arg(short, long)]
        currency: Option<String>,
        /// Treat the amount as USD and convert at the legacy fixed PHP rate
        #[arg(long)]
        legacy_php: bool,
    },

    /// Talk to the inventory assistant
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },

    /// Export inventory, suppliers and transactions
    Export {
        /// JSON file with inventory, suppliers and transactions
        #[arg(short, long)]
        data: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Sample memory usage until interrupted
    Monitor {
        /// Seconds between samples (default: config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print every preference
    Show,
    /// Print one preference
    Get { key: String },
    /// Set one preference (use notifications.<kind> for toggles)
    Set { key: String, value: String },
    /// Restore defaults
    Reset,
}

#[derive(Subcommand)]
pub enum ChatAction {
    /// Ask a question
    Ask {
        /// Question text
        question: Vec<String>,
        /// JSON file with inventory, suppliers and transactions
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Print the conversation
    History,
    /// Reset the conversation
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.to_string_lossy().to_string();
    }

    init_logging(&config);

    match cli.command {
        Commands::Prefs { action } => {
            let prefs = PreferenceStore::new(open_storage(&config)?);
            run_prefs(&prefs, action)?;
        }

        Commands::Format {
            value,
            currency,
            legacy_php,
        } => {
            let prefs = PreferenceStore::new(open_storage(&config)?);
            let output = if legacy_php {
                format_currency(usd_to_php(value), Some("PHP"), &prefs)
            } else {
                format_currency(value, currency.as_deref(), &prefs)
            };
            println!("{}", output);
        }

        Commands::Chat { action } => {
            let mut history = ChatHistory::open(open_storage(&config)?);
            run_chat(&mut history, action)?;
        }

        Commands::Export { data, output } => {
            let snapshot = load_snapshot(&data)?;
            let doc = ExportDocument::new(&snapshot, chrono::Utc::now());
            let path = doc.write_to_dir(&output)?;
            println!("Exported to {}", path.display());
        }

        Commands::Monitor { interval } => {
            let Some(period) = config.monitor.sample_interval(interval) else {
                println!("Memory sampler is disabled in config");
                return Ok(());
            };
            let cancel = CancellationToken::new();
            let sampler = MemorySampler::new(SystemMemoryProbe, cancel.child_token())
                .with_interval(period)
                .with_warn_ratio(config.monitor.warn_ratio);
            let handle = tokio::spawn(sampler.run());

            tokio::signal::ctrl_c().await?;
            cancel.cancel();
            let warnings = handle.await?;
            println!("Memory sampler stopped ({} warnings)", warnings);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("inventomatic={}", config.logging.level)),
    );

    // Logs go to stderr so command output stays pipeable
    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn open_storage(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let dir = expand_home(&config.storage.data_dir);
    let store = FileStore::open(&dir)
        .with_context(|| format!("Failed to open data directory {:?}", dir))?;
    Ok(Arc::new(store))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

fn load_snapshot(path: &Path) -> anyhow::Result<DataSnapshot> {
    DataSnapshot::load(path).with_context(|| format!("Failed to load data from {:?}", path))
}

fn run_prefs(prefs: &PreferenceStore, action: PrefsAction) -> anyhow::Result<()> {
    match action {
        PrefsAction::Show => {
            let loaded = prefs.load();
            if let Some(reason) = loaded.reason() {
                println!("# using defaults ({})", reason);
            }
            let record = loaded.into_inner();
            for key in PreferenceKey::all() {
                println!("{:<14} {}", key.as_str(), record.get(*key));
            }
        }
        PrefsAction::Get { key } => {
            let key: PreferenceKey = key.parse().map_err(anyhow::Error::msg)?;
            println!("{}", prefs.get(key));
        }
        PrefsAction::Set { key, value } => {
            let update = PreferenceUpdate::parse(&key, &value).map_err(anyhow::Error::msg)?;
            prefs.set(update)?;
            println!("{} = {}", key, prefs.get(update.key()));
        }
        PrefsAction::Reset => {
            prefs.reset()?;
            println!("Preferences reset to defaults");
        }
    }
    Ok(())
}

fn run_chat(history: &mut ChatHistory, action: ChatAction) -> anyhow::Result<()> {
    match action {
        ChatAction::Ask { question, data } => {
            let snapshot = match data {
                Some(path) => load_snapshot(&path)?,
                None => DataSnapshot::default(),
            };
            match history.ask(&question.join(" "), &snapshot)? {
                Some(reply) => println!("{}", reply.text),
                None => eprintln!("Nothing to ask"),
            }
        }
        ChatAction::History => {
            for message in history.messages() {
                let who = if message.is_bot { "assistant" } else { "you" };
                println!(
                    "[{}] {}: {}",
                    message.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    who,
                    message.text
                );
            }
        }
        ChatAction::Clear => {
            history.clear_history()?;
            println!("Chat history cleared");
        }
    }
    Ok(())
}
