use anyhow::Result;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, deck: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards = app.due_cards(deck)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("Nothing due today.");
                return Ok(());
            }

            println!("{} cards due", cards.len());
            for card in &cards {
                println!(
                    "  {}  {}",
                    terminal::render_header(card, use_color),
                    terminal::highlight_blanks(&card.prompt, use_color)
                );
            }
        }
    }

    Ok(())
}
