use anyhow::Result;
use uuid::Uuid;

use flashdeck_lib::flashcards::algorithm::format_interval;
use flashdeck_lib::flashcards::Quality;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    card_id: Uuid,
    card_index: usize,
    quality: &str,
    format: &OutputFormat,
) -> Result<()> {
    let quality: Quality = quality.parse()?;
    let record = app.record_review(card_id, card_index, quality)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record.to_submission())?),
        OutputFormat::Plain => println!(
            "Graded {} unit {} as {}. Next review {} ({})",
            record.card_id,
            record.card_index,
            record.quality,
            record.next_review_date,
            format_interval(record.interval_days)
        ),
    }

    Ok(())
}
