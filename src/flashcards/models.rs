//! Data models for the flashcard engine

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cloze::{distinct_indices, parse_cloze};
use super::errors::{FlashcardError, Result};

/// A deck is a named collection of flashcards owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(owner_id: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Type of flashcard, as stored and exchanged with the card store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    /// Front -> back
    Basic,
    /// Front -> back and back -> front
    BasicReversed,
    /// Front -> back, with supporting text shown on reveal
    BasicWithText,
    /// Fill-in-the-blank, one unit per group number
    Cloze,
}

impl CardType {
    pub const ALL: [CardType; 4] = [
        CardType::Basic,
        CardType::BasicReversed,
        CardType::BasicWithText,
        CardType::Cloze,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Basic => "basic",
            CardType::BasicReversed => "basic_reversed",
            CardType::BasicWithText => "basic_with_text",
            CardType::Cloze => "cloze",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = FlashcardError;

    fn from_str(s: &str) -> Result<Self> {
        CardType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FlashcardError::InvalidCardType(s.to_string()))
    }
}

/// Type-specific content of a flashcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cardType", rename_all = "snake_case")]
pub enum CardContent {
    Basic {
        front: String,
        back: String,
    },
    BasicReversed {
        front: String,
        back: String,
    },
    BasicWithText {
        front: String,
        back: String,
    },
    Cloze {
        #[serde(rename = "clozeText")]
        cloze_text: String,
    },
}

impl CardContent {
    pub fn card_type(&self) -> CardType {
        match self {
            CardContent::Basic { .. } => CardType::Basic,
            CardContent::BasicReversed { .. } => CardType::BasicReversed,
            CardContent::BasicWithText { .. } => CardType::BasicWithText,
            CardContent::Cloze { .. } => CardType::Cloze,
        }
    }

    /// Build front/back content for one of the non-cloze types
    pub fn front_back(card_type: CardType, front: String, back: String) -> Result<Self> {
        match card_type {
            CardType::Basic => Ok(CardContent::Basic { front, back }),
            CardType::BasicReversed => Ok(CardContent::BasicReversed { front, back }),
            CardType::BasicWithText => Ok(CardContent::BasicWithText { front, back }),
            CardType::Cloze => Err(FlashcardError::MissingField {
                card_type: CardType::Cloze.as_str(),
                field: "clozeText",
            }),
        }
    }

    /// Number of practice units this content yields. Derived, never stored.
    pub fn unit_count(&self) -> usize {
        match self {
            CardContent::Basic { .. } | CardContent::BasicWithText { .. } => 1,
            CardContent::BasicReversed { .. } => 2,
            CardContent::Cloze { cloze_text } => distinct_indices(&parse_cloze(cloze_text)).len(),
        }
    }
}

/// A single authored flashcard record, which may yield several practice units
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub deck_id: Uuid,
    #[serde(flatten)]
    pub content: CardContent,
    /// Context shown after the answer is revealed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    /// Author notes, never part of grading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flashcard {
    pub fn new(deck_id: Uuid, content: CardContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            deck_id,
            content,
            extra: None,
            notes: None,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn card_type(&self) -> CardType {
        self.content.card_type()
    }

    pub fn unit_count(&self) -> usize {
        self.content.unit_count()
    }
}

/// Learner's self-graded recall
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quality {
    Again = 0,
    Hard = 1,
    Good = 2,
    Easy = 3,
}

impl Quality {
    pub const ALL: [Quality; 4] = [Quality::Again, Quality::Hard, Quality::Good, Quality::Easy];

    pub fn label(&self) -> &'static str {
        match self {
            Quality::Again => "again",
            Quality::Hard => "hard",
            Quality::Good => "good",
            Quality::Easy => "easy",
        }
    }
}

impl TryFrom<i64> for Quality {
    type Error = FlashcardError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Quality::Again),
            1 => Ok(Quality::Hard),
            2 => Ok(Quality::Good),
            3 => Ok(Quality::Easy),
            other => Err(FlashcardError::InvalidQuality(other)),
        }
    }
}

impl TryFrom<u8> for Quality {
    type Error = FlashcardError;

    fn try_from(value: u8) -> Result<Self> {
        Quality::try_from(i64::from(value))
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality as u8
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Quality {
    type Err = FlashcardError;

    /// Accepts a digit (`0`-`3`) or a name (`again`, `hard`, `good`, `easy`)
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Quality::try_from(value);
        }
        let lower = trimmed.to_lowercase();
        Quality::ALL
            .into_iter()
            .find(|q| q.label() == lower)
            .ok_or_else(|| FlashcardError::InvalidQualityName(trimmed.to_string()))
    }
}

/// Interval and date produced by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub interval_days: u32,
    pub next_review_date: NaiveDate,
}

/// One gradable question derived from a flashcard. Computed, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeCard {
    pub card_id: Uuid,
    pub card_index: usize,
    pub deck_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck_name: Option<String>,
    pub card_type: CardType,
    pub prompt: String,
    pub answer: String,
    pub full_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A due row as handed over by the card store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueRow {
    pub card_id: Uuid,
    /// Raw type name; unknown names are a data-integrity error
    pub card_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloze_text: Option<String>,
    pub card_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub deck_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_name: Option<String>,
}

impl DueRow {
    /// Flatten a stored card into the row shape for one practice unit
    pub fn from_card(card: &Flashcard, card_index: usize, deck_name: Option<&str>) -> Self {
        let (front, back, cloze_text) = match &card.content {
            CardContent::Basic { front, back }
            | CardContent::BasicReversed { front, back }
            | CardContent::BasicWithText { front, back } => {
                (Some(front.clone()), Some(back.clone()), None)
            }
            CardContent::Cloze { cloze_text } => (None, None, Some(cloze_text.clone())),
        };

        Self {
            card_id: card.id,
            card_type: card.card_type().to_string(),
            front,
            back,
            cloze_text,
            card_index,
            extra: card.extra.clone(),
            notes: card.notes.clone(),
            deck_id: card.deck_id,
            deck_name: deck_name.map(str::to_string),
        }
    }

    /// Rebuild typed content, validating the type name and required fields
    pub fn content(&self) -> Result<CardContent> {
        let card_type: CardType = self.card_type.parse()?;
        if card_type == CardType::Cloze {
            let cloze_text = required(card_type, "clozeText", &self.cloze_text)?;
            return Ok(CardContent::Cloze { cloze_text });
        }

        let front = required(card_type, "front", &self.front)?;
        let back = required(card_type, "back", &self.back)?;
        CardContent::front_back(card_type, front, back)
    }
}

fn required(card_type: CardType, field: &'static str, value: &Option<String>) -> Result<String> {
    value.clone().ok_or(FlashcardError::MissingField {
        card_type: card_type.as_str(),
        field,
    })
}

/// A record of a single completed review. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: Uuid,
    pub card_id: Uuid,
    pub card_index: usize,
    pub user_id: String,
    pub quality: Quality,
    pub interval_days: u32,
    pub next_review_date: NaiveDate,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewRecord {
    /// Outbound shape handed to the card store
    pub fn to_submission(&self) -> ReviewSubmission {
        ReviewSubmission {
            card_id: self.card_id,
            card_index: self.card_index,
            user_id: self.user_id.clone(),
            quality: self.quality.into(),
            interval_days: self.interval_days,
            next_review_date: self.next_review_date,
        }
    }
}

/// Review payload as the card store persists it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub card_id: Uuid,
    pub card_index: usize,
    pub user_id: String,
    /// 0 = again, 1 = hard, 2 = good, 3 = easy
    pub quality: u8,
    pub interval_days: u32,
    pub next_review_date: NaiveDate,
}
