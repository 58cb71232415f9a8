use anyhow::{Context, Result};
use uuid::Uuid;

use flashdeck_lib::flashcards::practice::materialize_all;
use flashdeck_lib::flashcards::{CardContent, CardType, Flashcard};

use crate::app::App;
use crate::render::terminal;
use crate::{FrontBackType, OutputFormat};

impl From<FrontBackType> for CardType {
    fn from(card_type: FrontBackType) -> Self {
        match card_type {
            FrontBackType::Basic => CardType::Basic,
            FrontBackType::BasicReversed => CardType::BasicReversed,
            FrontBackType::BasicWithText => CardType::BasicWithText,
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run_add(
    app: &App,
    deck_name: &str,
    card_type: FrontBackType,
    front: String,
    back: String,
    extra: Option<String>,
    notes: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let content = CardContent::front_back(card_type.into(), front, back)?;
    let card = app.create_card(&deck, content, extra, notes)?;

    print_created(&card, &deck.name, format)
}

pub fn run_add_cloze(
    app: &App,
    deck_name: &str,
    text: String,
    extra: Option<String>,
    notes: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let card = app.create_card(&deck, CardContent::Cloze { cloze_text: text }, extra, notes)?;

    print_created(&card, &deck.name, format)
}

fn print_created(card: &Flashcard, deck_name: &str, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(card)?),
        OutputFormat::Plain => {
            println!("Added {} card to \"{}\"", card.card_type(), deck_name);
            println!("  Practice units: {}", card.unit_count());
            println!("  ID: {}", card.id);
        }
    }
    Ok(())
}

/// Short description of a card's content for listings
fn summary(card: &Flashcard) -> String {
    match &card.content {
        CardContent::Basic { front, back }
        | CardContent::BasicReversed { front, back }
        | CardContent::BasicWithText { front, back } => format!("{} → {}", front, back),
        CardContent::Cloze { cloze_text } => cloze_text.clone(),
    }
}

pub fn run_list(app: &App, deck_name: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let cards = app.list_cards(deck.id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards in \"{}\".", deck.name);
                return Ok(());
            }

            let type_width = cards
                .iter()
                .map(|c| c.card_type().as_str().len())
                .max()
                .unwrap_or(4);
            for card in &cards {
                println!(
                    "{}  {:<tw$}  {}",
                    card.id,
                    card.card_type().as_str(),
                    summary(card),
                    tw = type_width
                );
            }
        }
    }

    Ok(())
}

pub fn run_show(app: &App, card_id: Uuid, format: &OutputFormat, use_color: bool) -> Result<()> {
    let card = app.get_card(card_id)?;
    let mut units = materialize_all(&card);
    let deck_name = app.storage.get_deck(card.deck_id).ok().map(|d| d.name);
    for unit in &mut units {
        unit.deck_name = deck_name.clone();
    }

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "card": card,
                "practiceCards": units,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", summary(&card));
            if units.is_empty() {
                println!("(no practice units)");
            }
            for unit in &units {
                println!();
                println!("{}", terminal::render_header(unit, use_color));
                println!("Q: {}", terminal::render_prompt(unit, use_color));
                println!("A: {}", terminal::render_answer(unit, use_color));
            }
        }
    }

    Ok(())
}

pub fn run_delete(app: &App, card_id: Uuid) -> Result<()> {
    app.storage
        .delete_card(card_id)
        .context("Failed to delete card")?;
    println!("Deleted card {}", card_id);
    Ok(())
}
