mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "flashdeck-cli", about = "Flashcard decks, cloze cards and review sessions", version)]
struct Cli {
    /// Config file (default: ~/.config/flashdeck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store decks and reviews in this directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

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
    /// Manage decks
    #[command(subcommand)]
    Deck(DeckCommand),

    /// Author and inspect cards
    #[command(subcommand)]
    Card(CardCommand),

    /// Work with cloze deletion text
    #[command(subcommand)]
    Cloze(ClozeCommand),

    /// List practice cards due today
    Due {
        /// Deck name (case-insensitive prefix match)
        #[arg(long)]
        deck: Option<String>,
    },

    /// Run an interactive review session
    Study {
        /// Deck name (case-insensitive prefix match)
        #[arg(long)]
        deck: Option<String>,
        /// Maximum cards this session (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Grade one practice unit without a session
    Review {
        card_id: Uuid,
        card_index: usize,
        /// 0-3 or again, hard, good, easy
        quality: String,
    },
}

#[derive(Subcommand)]
enum DeckCommand {
    /// List decks with card counts
    List,

    /// Create a deck
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a deck and all of its cards
    Delete {
        /// Deck name (case-insensitive prefix match)
        name: String,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FrontBackType {
    Basic,
    #[value(name = "basic_reversed")]
    BasicReversed,
    #[value(name = "basic_with_text")]
    BasicWithText,
}

#[derive(Subcommand)]
enum CardCommand {
    /// Add a front/back card
    Add {
        /// Deck name (case-insensitive prefix match)
        deck: String,
        #[arg(long = "type", value_enum, default_value = "basic")]
        card_type: FrontBackType,
        #[arg(long)]
        front: String,
        #[arg(long)]
        back: String,
        /// Context shown once the answer is revealed
        #[arg(long)]
        extra: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Add a cloze card, e.g. "El {{c1::perro}} corre"
    Cloze {
        /// Deck name (case-insensitive prefix match)
        deck: String,
        text: String,
        #[arg(long)]
        extra: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List cards in a deck
    List {
        /// Deck name (case-insensitive prefix match)
        deck: String,
    },

    /// Show every practice unit of a card
    Show { card_id: Uuid },

    /// Delete a card
    Delete { card_id: Uuid },
}

#[derive(Subcommand)]
enum ClozeCommand {
    /// Show the deletions and practice units a text would produce
    Check { text: String },

    /// Turn the first occurrence of WORD into a new deletion
    Wrap {
        text: String,
        word: String,
        /// Reuse an existing group number instead of the next free one
        #[arg(long)]
        group: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();

    let open_app = || app::App::new(cli.config.as_deref(), cli.data_dir.clone());

    match cli.command {
        // Cloze text tools work without a store
        Command::Cloze(subcmd) => match subcmd {
            ClozeCommand::Check { text } => commands::cloze::run_check(&text, &cli.format, use_color)?,
            ClozeCommand::Wrap { text, word, group } => {
                commands::cloze::run_wrap(&text, &word, group, &cli.format)?
            }
        },
        Command::Deck(subcmd) => {
            let app = open_app()?;
            match subcmd {
                DeckCommand::List => commands::deck::run_list(&app, &cli.format)?,
                DeckCommand::Create { name, description } => {
                    commands::deck::run_create(&app, name, description, &cli.format)?
                }
                DeckCommand::Delete { name } => commands::deck::run_delete(&app, &name)?,
            }
        }
        Command::Card(subcmd) => {
            let app = open_app()?;
            match subcmd {
                CardCommand::Add {
                    deck,
                    card_type,
                    front,
                    back,
                    extra,
                    notes,
                } => commands::card::run_add(
                    &app,
                    &deck,
                    card_type,
                    front,
                    back,
                    extra,
                    notes,
                    &cli.format,
                )?,
                CardCommand::Cloze {
                    deck,
                    text,
                    extra,
                    notes,
                } => commands::card::run_add_cloze(&app, &deck, text, extra, notes, &cli.format)?,
                CardCommand::List { deck } => commands::card::run_list(&app, &deck, &cli.format)?,
                CardCommand::Show { card_id } => {
                    commands::card::run_show(&app, card_id, &cli.format, use_color)?
                }
                CardCommand::Delete { card_id } => commands::card::run_delete(&app, card_id)?,
            }
        }
        Command::Due { deck } => {
            let app = open_app()?;
            commands::due::run(&app, deck.as_deref(), &cli.format, use_color)?;
        }
        Command::Study { deck, limit } => {
            let app = open_app()?;
            commands::study::run(&app, deck.as_deref(), limit, use_color)?;
        }
        Command::Review {
            card_id,
            card_index,
            quality,
        } => {
            let app = open_app()?;
            commands::review::run(&app, card_id, card_index, &quality, &cli.format)?;
        }
    }

    Ok(())
}
