use anyhow::{Context, Result};

use flashdeck_lib::flashcards::cloze::{distinct_indices, insert_cloze, next_cloze_index, require_cloze};
use flashdeck_lib::flashcards::render::render_cloze;

use crate::render::terminal;
use crate::OutputFormat;

pub fn run_check(text: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let matches = require_cloze(text)?;
    let groups = distinct_indices(&matches);
    let full_content = render_cloze(text, &[], false);

    match format {
        OutputFormat::Json => {
            let prompts: Vec<serde_json::Value> = groups
                .iter()
                .enumerate()
                .map(|(card_index, group)| {
                    serde_json::json!({
                        "cardIndex": card_index,
                        "group": group,
                        "prompt": render_cloze(text, &[*group], true),
                    })
                })
                .collect();
            let output = serde_json::json!({
                "matches": matches,
                "groups": groups,
                "nextGroup": next_cloze_index(&matches),
                "fullContent": full_content,
                "units": prompts,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} deletions, {} practice units", matches.len(), groups.len());
            for m in &matches {
                println!("  c{}: {}", m.index, m.word);
            }
            match next_cloze_index(&matches) {
                Some(group) => println!("Next free group: c{}", group),
                None => println!("No free group number left"),
            }
            println!();
            for (card_index, group) in groups.iter().enumerate() {
                let prompt = render_cloze(text, &[*group], true);
                println!("#{} {}", card_index, terminal::highlight_blanks(&prompt, use_color));
            }
            println!("Full: {}", full_content);
        }
    }

    Ok(())
}

pub fn run_wrap(text: &str, word: &str, group: Option<u32>, format: &OutputFormat) -> Result<()> {
    let start = text
        .find(word)
        .with_context(|| format!("'{}' does not occur in the text", word))?;
    let updated = insert_cloze(text, start..start + word.len(), group)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "text": updated });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("{}", updated),
    }

    Ok(())
}
