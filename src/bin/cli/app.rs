use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use uuid::Uuid;

use flashdeck_lib::config::Config;
use flashdeck_lib::flashcards::practice::{materialize_batch, materialize_strict};
use flashdeck_lib::flashcards::review::build_review_record_with;
use flashdeck_lib::flashcards::{
    CardContent, CardStore, Deck, Flashcard, FlashcardStorage, PracticeCard, Quality, ReviewRecord,
};

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub storage: FlashcardStorage,
}

impl App {
    /// Load configuration and open the card store.
    ///
    /// `--data-dir` wins over the config file, which wins over the platform default.
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => Config::default_path().context("Failed to locate config file")?,
        };
        let config = Config::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let data_dir = match data_dir.or_else(|| config.data_dir.clone()) {
            Some(dir) => dir,
            None => FlashcardStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let storage = FlashcardStorage::new(data_dir);
        storage.init().context("Failed to initialize card store")?;

        Ok(Self { config, storage })
    }

    /// The reviewer's local calendar date
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn user_id(&self) -> &str {
        &self.config.user_id
    }

    /// Find a deck by name (case-insensitive prefix match)
    pub fn find_deck(&self, name: &str) -> Result<Deck> {
        self.storage.find_deck(name).with_context(|| {
            let available = self
                .storage
                .list_decks()
                .unwrap_or_default()
                .iter()
                .map(|d| format!("  - {}", d.name))
                .collect::<Vec<_>>()
                .join("\n");
            format!("No single deck matching '{}'. Available decks:\n{}", name, available)
        })
    }

    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        self.storage.list_decks().context("Failed to list decks")
    }

    pub fn list_cards(&self, deck_id: Uuid) -> Result<Vec<Flashcard>> {
        self.storage.list_cards(deck_id).context("Failed to list cards")
    }

    pub fn get_card(&self, card_id: Uuid) -> Result<Flashcard> {
        self.storage.get_card(card_id).context("Failed to get card")
    }

    pub fn create_card(
        &self,
        deck: &Deck,
        content: CardContent,
        extra: Option<String>,
        notes: Option<String>,
    ) -> Result<Flashcard> {
        self.storage
            .create_card(deck.id, content, extra, notes)
            .with_context(|| format!("Failed to add card to '{}'", deck.name))
    }

    /// Practice cards due today, optionally for a single deck
    pub fn due_cards(&self, deck_name: Option<&str>) -> Result<Vec<PracticeCard>> {
        let deck_id = match deck_name {
            Some(name) => Some(self.find_deck(name)?.id),
            None => None,
        };

        let rows = self
            .storage
            .due_rows(self.user_id(), deck_id, self.today())
            .context("Failed to query due cards")?;
        materialize_batch(&rows).context("Card store holds a corrupt card")
    }

    /// Grade one practice unit and append the review to the store
    pub fn record_review(&self, card_id: Uuid, card_index: usize, quality: Quality) -> Result<ReviewRecord> {
        let card = self.get_card(card_id)?;
        materialize_strict(&card, card_index)?;

        let record = build_review_record_with(
            &self.config.intervals,
            card_id,
            card_index,
            self.user_id(),
            quality,
            self.today(),
        );
        self.storage
            .append_review(&record)
            .context("Failed to record review")?;
        Ok(record)
    }
}
