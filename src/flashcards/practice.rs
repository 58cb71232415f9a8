//! Practice card materialization
//!
//! Expands a stored flashcard plus a practice-unit index into the concrete
//! prompt/answer pair shown during a session. Out-of-range indices are an
//! expected condition (the card store does not know per-card unit counts)
//! and yield `None`; unknown card types are data-integrity errors.

use uuid::Uuid;

use super::cloze::{group_matches, parse_cloze};
use super::errors::{FlashcardError, Result};
use super::models::{CardContent, DueRow, Flashcard, PracticeCard};
use super::render::render_matches;

/// Borrowed view of everything a practice card is built from
struct Source<'a> {
    card_id: Uuid,
    deck_id: Uuid,
    deck_name: Option<&'a str>,
    content: &'a CardContent,
    extra: Option<&'a str>,
    notes: Option<&'a str>,
}

impl Source<'_> {
    fn practice_card(
        &self,
        card_index: usize,
        prompt: String,
        answer: String,
        full_content: String,
    ) -> PracticeCard {
        PracticeCard {
            card_id: self.card_id,
            card_index,
            deck_id: self.deck_id,
            deck_name: self.deck_name.map(str::to_string),
            card_type: self.content.card_type(),
            prompt,
            answer,
            full_content,
            extra: self.extra.map(str::to_string),
            notes: self.notes.map(str::to_string),
        }
    }

    fn materialize(&self, card_index: usize) -> Option<PracticeCard> {
        match self.content {
            CardContent::Basic { front, back } | CardContent::BasicWithText { front, back } => {
                (card_index == 0)
                    .then(|| self.practice_card(0, front.clone(), back.clone(), back.clone()))
            }
            CardContent::BasicReversed { front, back } => match card_index {
                0 => Some(self.practice_card(0, front.clone(), back.clone(), back.clone())),
                1 => Some(self.practice_card(1, back.clone(), front.clone(), front.clone())),
                _ => None,
            },
            CardContent::Cloze { cloze_text } => self.materialize_cloze(cloze_text, card_index),
        }
    }

    fn materialize_cloze(&self, cloze_text: &str, card_index: usize) -> Option<PracticeCard> {
        let matches = parse_cloze(cloze_text);
        let groups = group_matches(&matches);

        // Ordinals follow ascending group number
        let (&group, occurrences) = groups.iter().nth(card_index)?;
        let answer = matches[*occurrences.first()?].word.clone();

        let prompt = render_matches(cloze_text, &matches, &[group]);
        let full_content = render_matches(cloze_text, &matches, &[]);
        Some(self.practice_card(card_index, prompt, answer, full_content))
    }
}

impl<'a> From<&'a Flashcard> for Source<'a> {
    fn from(card: &'a Flashcard) -> Self {
        Self {
            card_id: card.id,
            deck_id: card.deck_id,
            deck_name: None,
            content: &card.content,
            extra: card.extra.as_deref(),
            notes: card.notes.as_deref(),
        }
    }
}

/// Materialize practice unit `card_index` of `card`.
///
/// Returns `None` when the card has no such unit; callers skip the row.
pub fn materialize(card: &Flashcard, card_index: usize) -> Option<PracticeCard> {
    Source::from(card).materialize(card_index)
}

/// Like [`materialize`], but an out-of-range index is an error
pub fn materialize_strict(card: &Flashcard, card_index: usize) -> Result<PracticeCard> {
    materialize(card, card_index).ok_or(FlashcardError::IndexOutOfRange {
        card_id: card.id,
        card_index,
        unit_count: card.unit_count(),
    })
}

/// Every practice unit of a card, in card-index order
pub fn materialize_all(card: &Flashcard) -> Vec<PracticeCard> {
    let source = Source::from(card);
    (0..card.unit_count())
        .filter_map(|index| source.materialize(index))
        .collect()
}

/// Materialize a due row straight from the store's row shape.
///
/// `Err` means the row is corrupt (unknown type, missing field);
/// `Ok(None)` means the index is out of range and the row should be skipped.
pub fn materialize_row(row: &DueRow) -> Result<Option<PracticeCard>> {
    let content = row.content()?;
    let source = Source {
        card_id: row.card_id,
        deck_id: row.deck_id,
        deck_name: row.deck_name.as_deref(),
        content: &content,
        extra: row.extra.as_deref(),
        notes: row.notes.as_deref(),
    };
    Ok(source.materialize(row.card_index))
}

/// Materialize a batch of due rows, preserving input order.
///
/// Rows whose index is out of range are skipped; the first corrupt row fails
/// the batch so bad data is surfaced rather than rendered wrong.
pub fn materialize_batch(rows: &[DueRow]) -> Result<Vec<PracticeCard>> {
    let mut cards = Vec::with_capacity(rows.len());
    for row in rows {
        match materialize_row(row)? {
            Some(card) => cards.push(card),
            None => log::debug!(
                "Skipping due row for card {}: no practice unit {}",
                row.card_id,
                row.card_index
            ),
        }
    }
    Ok(cards)
}
