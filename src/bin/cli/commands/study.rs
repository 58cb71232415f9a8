use std::io::{self, BufRead, Write};

use anyhow::Result;

use flashdeck_lib::flashcards::algorithm::{format_interval, preview_intervals};
use flashdeck_lib::flashcards::Quality;

use crate::app::App;
use crate::render::terminal;

/// Print `message` without a newline and read one trimmed line.
/// `None` on end of input.
fn ask(lines: &mut impl Iterator<Item = io::Result<String>>, message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

fn is_quit(input: &str) -> bool {
    input.eq_ignore_ascii_case("q")
}

pub fn run(app: &App, deck: Option<&str>, limit: Option<usize>, use_color: bool) -> Result<()> {
    let limit = limit.unwrap_or(app.config.session.max_cards);
    let cards: Vec<_> = app.due_cards(deck)?.into_iter().take(limit).collect();
    if cards.is_empty() {
        println!("Nothing due today.");
        return Ok(());
    }

    let grade_prompt = format!(
        "Grade: {} (q to quit): ",
        Quality::ALL
            .iter()
            .zip(preview_intervals(&app.config.intervals))
            .map(|(q, days)| format!("{} {} [{}]", *q as u8, q, format_interval(days)))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut reviewed = 0;

    'session: for (n, card) in cards.iter().enumerate() {
        println!();
        println!("[{}/{}] {}", n + 1, cards.len(), terminal::render_header(card, use_color));
        println!("{}", terminal::render_prompt(card, use_color));

        match ask(&mut lines, "Press Enter to reveal... ")? {
            Some(input) if !is_quit(&input) => {}
            _ => break 'session,
        }
        println!("{}", terminal::render_answer(card, use_color));

        let quality = loop {
            let Some(input) = ask(&mut lines, &grade_prompt)? else {
                break 'session;
            };
            if is_quit(&input) {
                break 'session;
            }
            match input.parse::<Quality>() {
                Ok(quality) => break quality,
                Err(e) => eprintln!("{}", e),
            }
        };

        let record = app.record_review(card.card_id, card.card_index, quality)?;
        reviewed += 1;
        println!(
            "{}",
            terminal::paint(
                &format!(
                    "Next review {} ({})",
                    record.next_review_date,
                    format_interval(record.interval_days)
                ),
                terminal::Color::DIM,
                use_color
            )
        );
    }

    println!();
    println!("Reviewed {} of {} due cards.", reviewed, cards.len());
    Ok(())
}
