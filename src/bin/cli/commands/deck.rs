use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let decks = app.list_decks()?;

    match format {
        OutputFormat::Json => {
            let mut output = Vec::new();
            for deck in &decks {
                let cards = app.list_cards(deck.id)?;
                output.push(serde_json::json!({
                    "id": deck.id.to_string(),
                    "name": deck.name,
                    "description": deck.description,
                    "ownerId": deck.owner_id,
                    "cardCount": cards.len(),
                    "unitCount": cards.iter().map(|c| c.unit_count()).sum::<usize>(),
                }));
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if decks.is_empty() {
                println!("No decks. Create one with `deck create <name>`.");
                return Ok(());
            }

            for deck in &decks {
                let cards = app.list_cards(deck.id)?;
                let units: usize = cards.iter().map(|c| c.unit_count()).sum();
                println!("{} ({} cards, {} practice units)", deck.name, cards.len(), units);
                if let Some(description) = &deck.description {
                    println!("    {}", description);
                }
            }
        }
    }

    Ok(())
}

pub fn run_create(
    app: &App,
    name: String,
    description: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app
        .storage
        .create_deck(app.user_id(), name, description)
        .context("Failed to create deck")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck)?),
        OutputFormat::Plain => {
            println!("Created deck \"{}\"", deck.name);
            println!("  ID: {}", deck.id);
        }
    }

    Ok(())
}

pub fn run_delete(app: &App, name: &str) -> Result<()> {
    let deck = app.find_deck(name)?;
    app.storage
        .delete_deck(app.user_id(), deck.id)
        .with_context(|| format!("Failed to delete deck '{}'", deck.name))?;

    println!("Deleted deck \"{}\"", deck.name);
    Ok(())
}
