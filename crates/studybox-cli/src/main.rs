//! Studybox CLI
//!
//! Command-line study companion for the Studybox scheduling engine: import
//! and export decks, build sessions, grade cards, and check deck health.
//! State lives in a JSON snapshot under the data directory.

mod store;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use studybox_core::{
    format_interval, retrievability, CardStatus, CognitiveStage, Grade, SessionCard, SessionScope,
    VisualCue,
};
use tracing_subscriber::EnvFilter;

use crate::store::Workspace;

/// Studybox - adaptive spaced-repetition CLI
#[derive(Parser)]
#[command(name = "studybox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CLI for the Studybox spaced-repetition engine")]
#[command(long_about = "Studybox schedules flashcards by forgetting risk.\n\nCards move through acquisition, fixation, consolidation and retention; each review plans the next one where the chance of forgetting reaches the target risk.")]
struct Cli {
    /// Scheduler config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (defaults to the platform data directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import cards from a delimited text file
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Export cards to a delimited text file
    Export {
        /// Output file path
        output: PathBuf,
        /// Only export this deck and its subdecks
        #[arg(long)]
        deck: Option<String>,
    },

    /// Add a single card
    Add {
        /// Deck path, e.g. "Languages::German"
        deck: String,
        front: String,
        back: String,
        /// Tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Show the current study queue
    Session {
        /// Restrict to this deck and its subdecks
        #[arg(long)]
        deck: Option<String>,
        /// Maximum number of cards
        #[arg(long, default_value_t = studybox_core::session::DEFAULT_SESSION_LIMIT)]
        limit: usize,
        /// Review-only drill of due and fading cards
        #[arg(long)]
        focus: bool,
        /// Print the queue as JSON
        #[arg(long)]
        json: bool,
    },

    /// Grade one card
    Review {
        /// Card id (or a unique prefix of it)
        card: String,
        /// 1 = fail, 2 = hard, 3 = good, 4 = easy
        grade: i32,
        /// Seconds it took to recall the answer
        #[arg(long, default_value_t = 0.0)]
        seconds: f64,
    },

    /// Interactive study session
    Study {
        /// Restrict to this deck and its subdecks
        #[arg(long)]
        deck: Option<String>,
        /// Maximum number of cards
        #[arg(long, default_value_t = studybox_core::session::DEFAULT_SESSION_LIMIT)]
        limit: usize,
    },

    /// Health score of a deck
    Health {
        /// Deck path, e.g. "Languages::German"
        deck: String,
    },

    /// Collection statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for --json output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let mut ws = Workspace::open(cli.data_dir, cli.config.as_deref())?;

    match cli.command {
        Commands::Import { file } => run_import(&mut ws, file),
        Commands::Export { output, deck } => run_export(&ws, output, deck),
        Commands::Add {
            deck,
            front,
            back,
            tags,
        } => run_add(&mut ws, deck, front, back, tags),
        Commands::Session {
            deck,
            limit,
            focus,
            json,
        } => run_session(&ws, deck, limit, focus, json),
        Commands::Review {
            card,
            grade,
            seconds,
        } => run_review(&mut ws, card, grade, seconds),
        Commands::Study { deck, limit } => run_study(&mut ws, deck, limit),
        Commands::Health { deck } => run_health(&ws, deck),
        Commands::Stats => run_stats(&ws),
    }
}

// ============================================================================
// IMPORT / EXPORT / ADD
// ============================================================================

fn run_import(ws: &mut Workspace, file: PathBuf) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let report = ws.engine.import(&mut ws.collection, &text)?;
    ws.save()?;

    println!("{}", "=== Studybox Import ===".cyan().bold());
    println!();
    println!("{}: {}", "Cards Imported".white().bold(), report.imported);
    println!("{}: {}", "Seeded From Intervals".white().bold(), report.seeded);
    println!("{}: {}", "Decks Created".white().bold(), report.decks_created);
    Ok(())
}

fn run_export(ws: &Workspace, output: PathBuf, deck: Option<String>) -> anyhow::Result<()> {
    let text = ws.engine.export(&ws.collection, deck.as_deref())?;
    std::fs::write(&output, &text)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let rows = text.lines().filter(|l| !l.starts_with('#')).count();
    println!(
        "{} Exported to {} ({} cards)",
        "OK".green().bold(),
        output.display(),
        rows
    );
    Ok(())
}

fn run_add(
    ws: &mut Workspace,
    deck: String,
    front: String,
    back: String,
    tags: Option<String>,
) -> anyhow::Result<()> {
    let id = ws.engine.new_card(&mut ws.collection, &deck, front, back);
    if let Some(tags) = tags {
        if let Some(card) = ws.collection.get_mut(id) {
            card.tags = tags
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
    }
    ws.save()?;
    println!("{} Added card {}", "OK".green().bold(), id);
    Ok(())
}

// ============================================================================
// SESSIONS AND REVIEWS
// ============================================================================

fn scope_for(ws: &Workspace, deck: Option<&str>, limit: usize) -> anyhow::Result<SessionScope> {
    match deck {
        Some(path) => Ok(ws.engine.deck_scope(&ws.collection, path, limit)?),
        None => Ok(SessionScope::all(limit)),
    }
}

fn run_session(
    ws: &Workspace,
    deck: Option<String>,
    limit: usize,
    focus: bool,
    json: bool,
) -> anyhow::Result<()> {
    let scope = scope_for(ws, deck.as_deref(), limit)?;
    let queue = if focus {
        ws.engine.build_focus_session(ws.collection.cards(), &scope)
    } else {
        ws.engine.build_session(ws.collection.cards(), &scope)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&queue)?);
        return Ok(());
    }

    let title = if focus { "=== Focus Session ===" } else { "=== Study Session ===" };
    println!("{}", title.cyan().bold());
    println!();

    if queue.is_empty() {
        println!("{}", "Nothing to study right now.".dimmed());
        return Ok(());
    }

    for (i, entry) in queue.iter().enumerate() {
        print_entry(i + 1, entry);
    }
    Ok(())
}

fn print_entry(position: usize, entry: &SessionCard) {
    let id = entry.card.id.to_string();
    println!(
        "{:>3}. {} {:<42} {:>4.0}%  {}",
        position,
        id[..8].dimmed(),
        truncate(&entry.card.front, 40),
        entry.risk * 100.0,
        cue_colored(entry.explanation.cue, &entry.explanation.message),
    );
}

fn cue_colored(cue: VisualCue, text: &str) -> ColoredString {
    match cue {
        VisualCue::Critical => text.red().bold(),
        VisualCue::Warning => text.yellow(),
        VisualCue::Safe => text.green(),
        VisualCue::New => text.cyan(),
    }
}

fn run_review(ws: &mut Workspace, card: String, grade: i32, seconds: f64) -> anyhow::Result<()> {
    let id = ws.resolve_card(&card)?;
    // Fatigue is per session; a one-off review starts fresh.
    let mut session = ws.engine.start_session();
    let outcome = ws
        .engine
        .review_raw(&mut ws.collection, id, grade, seconds, &mut session)?;
    ws.save()?;

    println!(
        "{} {} -> {} ({})",
        outcome.message.green().bold(),
        outcome.stage_before,
        outcome.card.stage(),
        format_interval(outcome.interval_days)
    );
    Ok(())
}

/// Read one line from the learner. `None` means quit.
fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, message: &str) -> anyhow::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;
    match lines.next().transpose()? {
        Some(line) if line.trim().eq_ignore_ascii_case("q") => Ok(None),
        Some(line) => Ok(Some(line.trim().to_string())),
        None => Ok(None),
    }
}

fn run_study(ws: &mut Workspace, deck: Option<String>, limit: usize) -> anyhow::Result<()> {
    let scope = scope_for(ws, deck.as_deref(), limit)?;
    let queue = ws.engine.build_session(ws.collection.cards(), &scope);

    println!("{}", "=== Study Session ===".cyan().bold());
    if queue.is_empty() {
        println!("{}", "Nothing to study right now.".dimmed());
        return Ok(());
    }
    println!("{}", "Enter reveals the answer, q quits.".dimmed());

    let mut session = ws.engine.start_session();
    let fatigue_threshold = ws.engine.config().fatigue_threshold;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let total = queue.len();

    'cards: for (i, entry) in queue.iter().enumerate() {
        println!();
        println!(
            "[{}/{}] {}",
            i + 1,
            total,
            cue_colored(entry.explanation.cue, &entry.explanation.message)
        );
        println!("{}", entry.card.front.white().bold());

        let started = Instant::now();
        if prompt(&mut lines, "> ")?.is_none() {
            break;
        }
        let seconds = started.elapsed().as_secs_f64();
        println!("{}", entry.card.back);

        let grade = loop {
            let Some(answer) = prompt(&mut lines, "Grade [1] fail [2] hard [3] good [4] easy: ")? else {
                break 'cards;
            };
            match answer.parse::<i32>().ok().and_then(Grade::from_i32) {
                Some(grade) => break grade,
                None => println!("{}", "Please answer 1, 2, 3 or 4.".yellow()),
            }
        };

        let outcome = ws
            .engine
            .review(&mut ws.collection, entry.card.id, grade, seconds, &mut session)?;
        ws.save()?;
        println!("{}", outcome.message.green());

        if session.fatigue() >= fatigue_threshold {
            println!("{}", "You have been at it a while. Consider a break.".yellow());
        }
    }

    println!();
    println!(
        "Session complete: {} reviews, fatigue {:.0}%",
        session.reviews().to_string().green().bold(),
        session.fatigue() * 100.0
    );
    Ok(())
}

// ============================================================================
// HEALTH AND STATS
// ============================================================================

fn run_health(ws: &Workspace, deck: String) -> anyhow::Result<()> {
    let health = ws.engine.deck_health(&ws.collection, &deck)?;

    println!("{}", format!("=== Deck Health: {} ===", deck).cyan().bold());
    println!();

    let score = health.health_score.to_string();
    let score = if health.health_score >= studybox_core::health::HEALTHY_SCORE {
        score.green().bold()
    } else if health.health_score >= studybox_core::health::ATTENTION_SCORE {
        score.yellow().bold()
    } else {
        score.red().bold()
    };
    println!("{}: {}/100", "Score".white().bold(), score);
    println!("{}: {}", "Status".white().bold(), health.status_message);
    println!();

    let d = &health.distribution;
    let total = d.total();
    print_distribution_bar("New", d.new, total, "cyan");
    print_distribution_bar("Learning", d.learning, total, "yellow");
    print_distribution_bar("Review", d.review, total, "green");
    print_distribution_bar("Suspended", d.suspended, total, "white");
    Ok(())
}

fn run_stats(ws: &Workspace) -> anyhow::Result<()> {
    let cards = ws.collection.cards();
    let now = chrono::Utc::now();

    println!("{}", "=== Studybox Statistics ===".cyan().bold());
    println!();

    let due = cards.iter().filter(|c| !c.suspended && c.is_due(now)).count();
    let suspended = cards.iter().filter(|c| c.suspended).count();
    let reviews: usize = cards.iter().map(|c| c.metrics().history().len()).sum();
    let lapses: usize = cards.iter().map(|c| c.metrics().lapse_count()).sum();

    println!("{}: {}", "Total Cards".white().bold(), cards.len());
    println!("{}: {}", "Decks".white().bold(), ws.collection.decks().len());
    println!("{}: {}", "Due Now".white().bold(), due);
    println!("{}: {}", "Suspended".white().bold(), suspended);
    println!("{}: {}", "Reviews Logged".white().bold(), reviews);
    println!("{}: {}", "Lapses".white().bold(), lapses);

    if !cards.is_empty() {
        let avg_difficulty =
            cards.iter().map(|c| c.metrics().difficulty()).sum::<f64>() / cards.len() as f64;
        println!("{}: {:.2}", "Average Difficulty".white().bold(), avg_difficulty);

        let learned: Vec<f64> = cards
            .iter()
            .filter(|c| c.status() == CardStatus::Review)
            .map(|c| c.metrics().stability())
            .collect();
        if !learned.is_empty() {
            let avg = learned.iter().sum::<f64>() / learned.len() as f64;
            println!("{}: {}", "Average Stability".white().bold(), format_interval(avg));

            let config = ws.engine.config();
            let recall = cards
                .iter()
                .filter(|c| c.status() == CardStatus::Review)
                .map(|c| retrievability(c, now, config))
                .sum::<f64>()
                / learned.len() as f64;
            println!("{}: {:.1}%", "Average Recall".white().bold(), recall * 100.0);
        }
    }

    println!();
    println!("{}", "=== Cognitive Stages ===".yellow().bold());
    let total = cards.len();
    for (stage, color) in [
        (CognitiveStage::Acquisition, "cyan"),
        (CognitiveStage::Fixation, "yellow"),
        (CognitiveStage::Consolidation, "green"),
        (CognitiveStage::Retention, "magenta"),
        (CognitiveStage::Lapse, "red"),
    ] {
        let count = cards.iter().filter(|c| c.stage() == stage).count();
        print_distribution_bar(stage.as_str(), count, total, color);
        println!("  {:15} {}", "", stage.description().dimmed());
    }

    println!();
    println!("{}: {}", "Data Directory".dimmed(), ws.data_dir().display());
    Ok(())
}

/// Print a distribution bar
fn print_distribution_bar(label: &str, count: usize, total: usize, color: &str) {
    let percentage = if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let bar_width: usize = 30;
    let filled = ((percentage / 100.0) * bar_width as f64) as usize;
    let empty = bar_width.saturating_sub(filled);

    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));
    let colored_bar = match color {
        "green" => bar.green(),
        "yellow" => bar.yellow(),
        "red" => bar.red(),
        "magenta" => bar.magenta(),
        "cyan" => bar.cyan(),
        _ => bar.white(),
    };

    println!("  {:15} [{:30}] {:>4} ({:>5.1}%)", label, colored_bar, count, percentage);
}

/// Single-line preview of `s`, at most `max_chars` characters plus an ellipsis.
fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_chars {
        s
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
