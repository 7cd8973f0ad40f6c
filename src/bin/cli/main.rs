use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use engram::srs::{
    Card, ReviewCoordinator, ReviewStats, SchedulerParams, SqliteCardStore, SystemClock,
};

#[derive(Parser)]
#[command(name = "engram-cli", about = "Engram review queue CLI", version)]
struct Cli {
    /// Path to the card database (default: the user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// TOML file with alternate scheduler weights
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Create a question/answer pair (and its card)
    Add {
        question: String,
        answer: String,
        /// Position within the owning layer
        #[arg(long, default_value_t = 0)]
        position: i32,
    },

    /// List all question/answer pairs with their cards
    Pairs,

    /// Show the review queue: new cards plus cards whose due date has passed
    Due {
        /// Maximum number of cards to return
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Review a card with a rating: 1=Again, 2=Hard, 3=Good, 4=Easy
    Review {
        card_id: Uuid,
        rating: i32,
    },

    /// Show the interval each rating would give for a card
    Preview {
        card_id: Uuid,
    },

    /// Show a card's review history, newest first
    Logs {
        card_id: Uuid,
    },

    /// Show card counts and today's review activity
    Stats,
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Failed to resolve user data directory")?;
    Ok(data_dir.join("engram").join("engram.db"))
}

fn load_params(path: Option<&PathBuf>) -> anyhow::Result<SchedulerParams> {
    match path {
        None => Ok(SchedulerParams::default()),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read params file {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse params file {:?}", path))
        }
    }
}

/// Format an interval in days to a human-readable string
fn format_interval(days: f64) -> String {
    let days = days.round() as i64;
    if days == 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

fn print_card_line(card: &Card, question: Option<&str>) {
    let due = match card.due_date {
        Some(due) => due.format("%Y-%m-%d %H:%M").to_string(),
        None => "never scheduled".to_string(),
    };
    println!(
        "{}  [{}]  due {}  s={:.2} d={:.2} reps={} lapses={}{}",
        card.id,
        card.state.as_str(),
        due,
        card.stability,
        card.difficulty,
        card.reps,
        card.lapses,
        question.map(|q| format!("  {}", q)).unwrap_or_default(),
    );
}

fn print_stats(stats: &ReviewStats) {
    println!("Cards:      {}", stats.total_cards);
    println!("  new        {}", stats.new_cards);
    println!("  learning   {}", stats.learning_cards);
    println!("  review     {}", stats.review_cards);
    println!("  relearning {}", stats.relearning_cards);
    println!("Due now:    {}", stats.due_cards);
    println!("Today:      {} reviews", stats.reviews_today);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let db_path = match cli.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    let params = load_params(cli.params.as_ref())?;
    let mut store = SqliteCardStore::new(db_path)?;

    match cli.command {
        Command::Add {
            question,
            answer,
            position,
        } => {
            let (pair, card) = store.create_qa_pair(question, answer, position)?;
            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "pair": pair,
                            "card": card,
                        }))?
                    );
                }
                OutputFormat::Plain => {
                    println!("Created pair {} with card {}", pair.id, card.id);
                }
            }
        }
        Command::Pairs => {
            let pairs = store.list_qa_pairs()?;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&pairs)?);
                }
                OutputFormat::Plain => {
                    for pair in pairs {
                        let card = store.card_for_pair(pair.id)?;
                        print_card_line(&card, Some(&pair.question));
                    }
                }
            }
        }
        Command::Due { limit } => {
            let coordinator =
                ReviewCoordinator::new(&mut store, SystemClock, params);
            let queue = coordinator.due_queue(limit)?;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&queue)?);
                }
                OutputFormat::Plain => {
                    if queue.is_empty() {
                        println!("No cards due for review.");
                    }
                    for card in queue {
                        print_card_line(&card, None);
                    }
                }
            }
        }
        Command::Review { card_id, rating } => {
            let mut coordinator =
                ReviewCoordinator::new(&mut store, SystemClock, params);
            let outcome = coordinator.submit_review(card_id, rating)?;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                }
                OutputFormat::Plain => {
                    println!(
                        "Card {} -> {} (stability {:.2}), next due {}",
                        card_id,
                        outcome.state.as_str(),
                        outcome.stability,
                        outcome.due_date.format("%Y-%m-%d %H:%M"),
                    );
                }
            }
        }
        Command::Preview { card_id } => {
            let coordinator =
                ReviewCoordinator::new(&mut store, SystemClock, params);
            let previews = coordinator.preview(card_id)?;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&previews)?);
                }
                OutputFormat::Plain => {
                    println!(
                        "Again: {}  Hard: {}  Good: {}  Easy: {}",
                        format_interval(previews[0]),
                        format_interval(previews[1]),
                        format_interval(previews[2]),
                        format_interval(previews[3]),
                    );
                }
            }
        }
        Command::Logs { card_id } => {
            let logs = store.list_logs(card_id)?;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&logs)?);
                }
                OutputFormat::Plain => {
                    for log in logs {
                        println!(
                            "{}  rated {:?} while {}  elapsed {:.2}d  next {:.0}d",
                            log.reviewed_at.format("%Y-%m-%d %H:%M"),
                            log.rating,
                            log.state.as_str(),
                            log.elapsed_days,
                            log.scheduled_days,
                        );
                    }
                }
            }
        }
        Command::Stats => {
            let stats = store.stats(chrono::Utc::now())?;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
                OutputFormat::Plain => print_stats(&stats),
            }
        }
    }

    Ok(())
}
