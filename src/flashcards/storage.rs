//! Reference card store backed by JSON files
//!
//! Directory structure:
//! ```text
//! {data_dir}/
//! ├── decks.json           # Array of all decks
//! ├── cards/
//! │   └── {card-id}.json   # Individual card files
//! └── reviews.jsonl        # Append-only review log, one record per line
//! ```
//!
//! The engine never depends on this module; it implements the
//! [`CardStore`] contract so the CLI has something to run against.

use std::collections::{BTreeSet, HashMap};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::cloze::require_cloze;
use super::errors::FlashcardError;
use super::models::*;

#[derive(Error, Debug)]
pub enum FlashcardStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] FlashcardError),

    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("A deck named '{0}' already exists")]
    DeckNameTaken(String),

    #[error("Deck {deck_id} is not owned by {user_id}")]
    NotDeckOwner { deck_id: Uuid, user_id: String },

    #[error("Could not determine a data directory")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, FlashcardStorageError>;

/// The two operations the engine expects from whatever stores its cards
pub trait CardStore {
    /// Practice units due for `user_id` on `today`, optionally limited to one deck
    fn due_rows(&self, user_id: &str, deck_id: Option<Uuid>, today: NaiveDate) -> Result<Vec<DueRow>>;

    /// Persist a completed review
    fn append_review(&self, record: &ReviewRecord) -> Result<()>;
}

/// Storage manager for decks, cards and review history
pub struct FlashcardStorage {
    data_dir: PathBuf,
}

impl FlashcardStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Default location (e.g., ~/.local/share/flashdeck)
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("flashdeck"))
            .ok_or(FlashcardStorageError::DataDirNotFound)
    }

    fn cards_dir(&self) -> PathBuf {
        self.data_dir.join("cards")
    }

    fn decks_path(&self) -> PathBuf {
        self.data_dir.join("decks.json")
    }

    fn card_path(&self, card_id: Uuid) -> PathBuf {
        self.cards_dir().join(format!("{}.json", card_id))
    }

    fn reviews_path(&self) -> PathBuf {
        self.data_dir.join("reviews.jsonl")
    }

    /// Create the storage directories and an empty deck list
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.cards_dir())?;

        let decks_path = self.decks_path();
        if !decks_path.exists() {
            self.write_decks(&[])?;
        }

        Ok(())
    }

    fn write_decks(&self, decks: &[Deck]) -> Result<()> {
        fs::write(self.decks_path(), serde_json::to_string_pretty(decks)?)?;
        Ok(())
    }

    fn write_card(&self, card: &Flashcard) -> Result<()> {
        fs::write(self.card_path(card.id), serde_json::to_string_pretty(card)?)?;
        Ok(())
    }

    // ==================== Deck Operations ====================

    /// List all decks
    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        let decks_path = self.decks_path();
        if !decks_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&decks_path)?;
        let decks: Vec<Deck> = serde_json::from_str(&content)?;
        Ok(decks)
    }

    /// Get a specific deck
    pub fn get_deck(&self, deck_id: Uuid) -> Result<Deck> {
        self.list_decks()?
            .into_iter()
            .find(|d| d.id == deck_id)
            .ok_or_else(|| FlashcardStorageError::DeckNotFound(deck_id.to_string()))
    }

    /// Find a deck by name: exact (case-insensitive) match first, then a unique prefix
    pub fn find_deck(&self, name: &str) -> Result<Deck> {
        let decks = self.list_decks()?;
        let name_lower = name.to_lowercase();

        if let Some(deck) = decks.iter().find(|d| d.name.to_lowercase() == name_lower) {
            return Ok(deck.clone());
        }

        let mut matches = decks
            .into_iter()
            .filter(|d| d.name.to_lowercase().starts_with(&name_lower));
        match (matches.next(), matches.next()) {
            (Some(deck), None) => Ok(deck),
            _ => Err(FlashcardStorageError::DeckNotFound(name.to_string())),
        }
    }

    /// Create a new deck
    pub fn create_deck(&self, owner_id: &str, name: String, description: Option<String>) -> Result<Deck> {
        self.init()?;

        let mut decks = self.list_decks()?;
        let name_lower = name.to_lowercase();
        if decks.iter().any(|d| d.name.to_lowercase() == name_lower) {
            return Err(FlashcardStorageError::DeckNameTaken(name));
        }

        let mut deck = Deck::new(owner_id.to_string(), name);
        deck.description = description;
        decks.push(deck.clone());
        self.write_decks(&decks)?;

        log::info!("Created deck {} ({})", deck.name, deck.id);
        Ok(deck)
    }

    /// Delete a deck and all its cards. Only the owner may delete a deck.
    pub fn delete_deck(&self, owner_id: &str, deck_id: Uuid) -> Result<()> {
        let deck = self.get_deck(deck_id)?;
        if deck.owner_id != owner_id {
            return Err(FlashcardStorageError::NotDeckOwner {
                deck_id,
                user_id: owner_id.to_string(),
            });
        }

        let cards = self.list_cards(deck_id)?;

        // Deck goes first, so a failed removal below only orphans card files
        let mut decks = self.list_decks()?;
        decks.retain(|d| d.id != deck_id);
        self.write_decks(&decks)?;

        let ids: Vec<Uuid> = cards.iter().map(|c| c.id).collect();
        let leftover = self.remove_card_files(&ids);

        log::info!(
            "Deleted deck {} and {} cards",
            deck.name,
            cards.len() - leftover
        );
        Ok(())
    }

    /// Remove card files, returning how many could not be removed
    fn remove_card_files(&self, card_ids: &[Uuid]) -> usize {
        let mut leftover = 0;
        for card_id in card_ids {
            if let Err(e) = fs::remove_file(self.card_path(*card_id)) {
                log::warn!("Failed to remove card file for {}: {}", card_id, e);
                leftover += 1;
            }
        }
        leftover
    }

    // ==================== Card Operations ====================

    /// List all cards in a deck, in authoring order
    pub fn list_cards(&self, deck_id: Uuid) -> Result<Vec<Flashcard>> {
        let mut cards: Vec<Flashcard> = self
            .list_all_cards()?
            .into_iter()
            .filter(|card| card.deck_id == deck_id)
            .collect();

        cards.sort_by(|a, b| a.position.cmp(&b.position).then(a.created_at.cmp(&b.created_at)));
        Ok(cards)
    }

    /// List all cards across all decks, in no particular order
    pub fn list_all_cards(&self) -> Result<Vec<Flashcard>> {
        let cards_dir = self.cards_dir();
        if !cards_dir.exists() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::new();
        for entry in fs::read_dir(&cards_dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                let card: Flashcard = serde_json::from_str(&content)?;
                cards.push(card);
            }
        }

        Ok(cards)
    }

    /// Get a specific card
    pub fn get_card(&self, card_id: Uuid) -> Result<Flashcard> {
        let card_path = self.card_path(card_id);
        if !card_path.exists() {
            return Err(FlashcardStorageError::CardNotFound(card_id));
        }

        let content = fs::read_to_string(&card_path)?;
        let card: Flashcard = serde_json::from_str(&content)?;
        Ok(card)
    }

    /// Create a new card at the end of a deck.
    ///
    /// Cloze cards without any deletion are rejected.
    pub fn create_card(
        &self,
        deck_id: Uuid,
        content: CardContent,
        extra: Option<String>,
        notes: Option<String>,
    ) -> Result<Flashcard> {
        self.get_deck(deck_id)?;
        validate_content(&content)?;

        let position = next_position(self.list_cards(deck_id)?.len());
        let mut card = Flashcard::new(deck_id, content);
        card.position = position;
        card.extra = extra;
        card.notes = notes;

        self.write_card(&card)?;
        log::info!("Created {} card {} in deck {}", card.card_type(), card.id, deck_id);
        Ok(card)
    }

    /// Update a card
    pub fn update_card(&self, card: &Flashcard) -> Result<Flashcard> {
        if !self.card_path(card.id).exists() {
            return Err(FlashcardStorageError::CardNotFound(card.id));
        }
        validate_content(&card.content)?;

        let mut updated = card.clone();
        updated.updated_at = Utc::now();
        self.write_card(&updated)?;
        Ok(updated)
    }

    /// Delete a card. Its review history stays in the log.
    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        let card_path = self.card_path(card_id);
        if !card_path.exists() {
            return Err(FlashcardStorageError::CardNotFound(card_id));
        }

        fs::remove_file(&card_path)?;
        Ok(())
    }

    // ==================== Review Operations ====================

    /// Read the review log, optionally for one user. Corrupt lines are skipped.
    pub fn list_reviews(&self, user_id: Option<&str>) -> Result<Vec<ReviewRecord>> {
        let reviews_path = self.reviews_path();
        if !reviews_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&reviews_path)?;
        let mut reviews = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ReviewRecord>(line) {
                Ok(record) => {
                    if user_id.map_or(true, |id| record.user_id == id) {
                        reviews.push(record);
                    }
                }
                Err(e) => log::warn!("Skipping unparseable review on line {}: {}", line_no + 1, e),
            }
        }

        Ok(reviews)
    }

    /// Cards in due-query order: decks in creation order, then authoring order
    fn cards_in_scope(&self, deck_id: Option<Uuid>, decks: &[Deck]) -> Result<Vec<Flashcard>> {
        if let Some(id) = deck_id {
            return self.list_cards(id);
        }

        let mut cards = Vec::new();
        for deck in decks {
            cards.extend(self.list_cards(deck.id)?);
        }
        Ok(cards)
    }
}

/// Position for a card appended behind `count` others
fn next_position(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn validate_content(content: &CardContent) -> std::result::Result<(), FlashcardError> {
    if let CardContent::Cloze { cloze_text } = content {
        require_cloze(cloze_text)?;
    }
    Ok(())
}

impl CardStore for FlashcardStorage {
    fn due_rows(&self, user_id: &str, deck_id: Option<Uuid>, today: NaiveDate) -> Result<Vec<DueRow>> {
        let decks = self.list_decks()?;
        if let Some(id) = deck_id {
            if !decks.iter().any(|d| d.id == id) {
                return Err(FlashcardStorageError::DeckNotFound(id.to_string()));
            }
        }
        let deck_names: HashMap<Uuid, &str> =
            decks.iter().map(|d| (d.id, d.name.as_str())).collect();

        // Latest review per (card, unit); later log lines win ties
        let mut latest: HashMap<Uuid, HashMap<usize, ReviewRecord>> = HashMap::new();
        for record in self.list_reviews(Some(user_id))? {
            let units = latest.entry(record.card_id).or_default();
            let newer = units
                .get(&record.card_index)
                .map_or(true, |existing| existing.reviewed_at <= record.reviewed_at);
            if newer {
                units.insert(record.card_index, record);
            }
        }

        let mut rows = Vec::new();
        for card in self.cards_in_scope(deck_id, &decks)? {
            let reviewed = latest.get(&card.id);

            // Indices reviewed before an edit removed them are still reported;
            // the materializer skips them.
            let mut indices: BTreeSet<usize> = (0..card.unit_count()).collect();
            if let Some(units) = reviewed {
                indices.extend(units.keys().copied());
            }

            for index in indices {
                let due = reviewed
                    .and_then(|units| units.get(&index))
                    .map_or(true, |record| record.next_review_date <= today);
                if due {
                    let deck_name = deck_names.get(&card.deck_id).copied();
                    rows.push(DueRow::from_card(&card, index, deck_name));
                }
            }
        }

        Ok(rows)
    }

    fn append_review(&self, record: &ReviewRecord) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.reviews_path())?;
        writeln!(file, "{}", serde_json::to_string(record)?)?;

        log::info!(
            "Recorded review of card {} unit {} ({}), next review {}",
            record.card_id,
            record.card_index,
            record.quality,
            record.next_review_date
        );
        Ok(())
    }
}
