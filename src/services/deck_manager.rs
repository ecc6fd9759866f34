//! # Deck Manager Service
//!
//! Deck CRUD plus the structural mutations that keep the cached blocks
//! honest. Every structural change runs the same cycle:
//!
//! ```text
//! 1. Load the deck (scoped to its owner)
//!                ↓
//! 2. Mutate the ledger in memory (copy cap enforced here)
//!                ↓
//! 3. Recompute stats AND the legality flag
//!                ↓
//! 4. Write the whole document back
//! ```
//!
//! Game results skip steps 2-3's stats work but still recompute the win
//! rate before persisting.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::queries::{self, DeckSort};
use crate::db::{Database, DatabaseError, DeckFaction, DeckRecord, DeckSummary};
use crate::ledger::stats::{recompute_deck_stats, update_win_rate, DeckGameStats};
use crate::ledger::validator::{deck_size_is_legal, legality_message};
use crate::ledger::{self, AcquisitionSource, CopyLimit, LedgerError, DECK_COPY_LIMIT};
use crate::models::requests::{CreateDeckRequest, UpdateDeckRequest};

use super::CardCatalog;

/// Maximum deck name length.
const MAX_NAME_LEN: usize = 50;

/// Maximum deck description length.
const MAX_DESCRIPTION_LEN: usize = 500;

/// Errors that can occur in deck operations.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    /// Deck not found (or owned by someone else).
    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    /// The card id does not exist in the catalog.
    #[error("Card not found: {0}")]
    CardNotFound(String),

    /// The card is not present in the deck's ledger.
    #[error("Card not found in deck: {0}")]
    CardNotInDeck(String),

    /// Quantity out of range for the operation.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database operation failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

fn validated_name(name: &str) -> Result<String, DeckError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(DeckError::InvalidInput("Deck name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DeckError::InvalidInput(format!(
            "Deck name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name)
}

fn validate_description(description: &str) -> Result<(), DeckError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DeckError::InvalidInput(format!(
            "Description must be at most {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

impl From<LedgerError> for DeckError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(card_id) => DeckError::CardNotInDeck(card_id),
            LedgerError::InvalidQuantity(q) => DeckError::InvalidQuantity(q),
        }
    }
}

/// Service for constructed decks.
#[derive(Clone)]
pub struct DeckManager {
    db: Database,
    catalog: Arc<CardCatalog>,
}

impl DeckManager {
    pub fn new(db: Database, catalog: Arc<CardCatalog>) -> Self {
        Self { db, catalog }
    }

    /// List the user's decks, most recently updated first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<DeckRecord>, DeckError> {
        Ok(queries::list_decks_by_user(self.db.pool(), user_id).await?)
    }

    /// Get one deck, scoped to its owner.
    pub async fn get(&self, deck_id: Uuid, user_id: Uuid) -> Result<DeckRecord, DeckError> {
        queries::get_deck(self.db.pool(), deck_id, user_id)
            .await?
            .ok_or(DeckError::DeckNotFound(deck_id))
    }

    /// Create a deck, optionally seeded with an initial card list.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateDeckRequest,
    ) -> Result<DeckRecord, DeckError> {
        let name = validated_name(&request.name)?;
        let description = request.description.unwrap_or_default();
        validate_description(&description)?;
        let legend_id = ledger::normalize_card_id(&request.legend_id);
        if legend_id.is_empty() {
            return Err(DeckError::InvalidInput("Legend card id is required".into()));
        }

        let cards = match request.cards {
            Some(inputs) => {
                let pairs: Vec<(String, u32)> = inputs
                    .into_iter()
                    .map(|c| (c.card_id, c.quantity))
                    .collect();
                ledger::deck_entries_from(&pairs)?
            }
            None => Vec::new(),
        };

        let now = Utc::now();
        let mut deck = DeckRecord {
            id: Uuid::new_v4(),
            user_id,
            name,
            description,
            cards,
            main_faction: request.main_faction,
            legend_id,
            format: request.format.unwrap_or_default(),
            stats: Default::default(),
            is_valid: false,
            is_public: request.is_public.unwrap_or(false),
            is_favorite: false,
            game_stats: DeckGameStats::default(),
            cover_card: request.cover_card,
            tags: normalize_tags(request.tags.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };

        self.recompute(&mut deck);
        queries::insert_deck(self.db.pool(), &deck).await?;
        Ok(deck)
    }

    /// Update a deck's editable fields. Fields absent from the request are
    /// left untouched; a supplied card list replaces the ledger wholesale.
    pub async fn update(
        &self,
        deck_id: Uuid,
        user_id: Uuid,
        request: UpdateDeckRequest,
    ) -> Result<DeckRecord, DeckError> {
        let mut deck = self.get(deck_id, user_id).await?;

        if let Some(name) = request.name {
            deck.name = validated_name(&name)?;
        }
        if let Some(description) = request.description {
            validate_description(&description)?;
            deck.description = description;
        }
        if let Some(main_faction) = request.main_faction {
            deck.main_faction = main_faction;
        }
        if let Some(legend_id) = request.legend_id {
            deck.legend_id = ledger::normalize_card_id(&legend_id);
        }
        if let Some(format) = request.format {
            deck.format = format;
        }
        if let Some(is_public) = request.is_public {
            deck.is_public = is_public;
        }
        if let Some(is_favorite) = request.is_favorite {
            deck.is_favorite = is_favorite;
        }
        if let Some(cover_card) = request.cover_card {
            deck.cover_card = Some(cover_card);
        }
        if let Some(tags) = request.tags {
            deck.tags = normalize_tags(tags);
        }
        if let Some(inputs) = request.cards {
            let pairs: Vec<(String, u32)> = inputs
                .into_iter()
                .map(|c| (c.card_id, c.quantity))
                .collect();
            deck.cards = ledger::deck_entries_from(&pairs)?;
        }

        self.persist(&mut deck).await?;
        Ok(deck)
    }

    /// Delete a deck.
    pub async fn delete(&self, deck_id: Uuid, user_id: Uuid) -> Result<(), DeckError> {
        if !queries::delete_deck(self.db.pool(), deck_id, user_id).await? {
            return Err(DeckError::DeckNotFound(deck_id));
        }
        info!("Deck deleted: {} (user {})", deck_id, user_id);
        Ok(())
    }

    /// Add copies of a card to a deck. The card must exist in the catalog;
    /// the quantity clamps silently at three copies per card.
    pub async fn add_card(
        &self,
        deck_id: Uuid,
        user_id: Uuid,
        card_id: &str,
        quantity: u32,
    ) -> Result<DeckRecord, DeckError> {
        let canonical = ledger::normalize_card_id(card_id);
        if self.catalog.resolve(&canonical).is_none() {
            return Err(DeckError::CardNotFound(canonical));
        }

        let mut deck = self.get(deck_id, user_id).await?;

        ledger::add_entry(
            &mut deck.cards,
            &canonical,
            quantity,
            AcquisitionSource::Pack,
            CopyLimit::PerCard(DECK_COPY_LIMIT),
        )?;

        self.persist(&mut deck).await?;
        debug!("Added {}x {} to deck {}", quantity, canonical, deck_id);
        Ok(deck)
    }

    /// Remove copies of a card from a deck.
    pub async fn remove_card(
        &self,
        deck_id: Uuid,
        user_id: Uuid,
        card_id: &str,
        quantity: u32,
    ) -> Result<DeckRecord, DeckError> {
        let mut deck = self.get(deck_id, user_id).await?;

        ledger::remove_entry(&mut deck.cards, card_id, quantity)?;

        self.persist(&mut deck).await?;
        Ok(deck)
    }

    /// Re-run the legality check and persist the flag. Returns the deck and
    /// a user-facing explanation.
    pub async fn validate(
        &self,
        deck_id: Uuid,
        user_id: Uuid,
    ) -> Result<(DeckRecord, &'static str), DeckError> {
        let mut deck = self.get(deck_id, user_id).await?;
        self.persist(&mut deck).await?;
        let message = legality_message(deck.is_valid);
        Ok((deck, message))
    }

    /// Record a game result and fold it into the deck's win rate.
    pub async fn record_game(
        &self,
        deck_id: Uuid,
        user_id: Uuid,
        won: bool,
    ) -> Result<DeckRecord, DeckError> {
        let mut deck = self.get(deck_id, user_id).await?;

        deck.game_stats.times_played += 1;
        if won {
            deck.game_stats.wins += 1;
        } else {
            deck.game_stats.losses += 1;
        }
        update_win_rate(&mut deck.game_stats);

        self.persist(&mut deck).await?;
        info!(
            "Game recorded for deck {}: {} ({}W/{}L, {}%)",
            deck_id,
            if won { "win" } else { "loss" },
            deck.game_stats.wins,
            deck.game_stats.losses,
            deck.game_stats.win_rate
        );
        Ok(deck)
    }

    /// Search public decks.
    pub async fn search_public(
        &self,
        faction: Option<DeckFaction>,
        search: Option<&str>,
        sort: DeckSort,
    ) -> Result<Vec<DeckSummary>, DeckError> {
        Ok(queries::search_public_decks(self.db.pool(), faction, search, sort).await?)
    }

    /// Recompute the cached stats block and legality flag from the ledger.
    fn recompute(&self, deck: &mut DeckRecord) {
        deck.stats = recompute_deck_stats(&deck.cards, &self.catalog.snapshot());
        deck.is_valid = deck_size_is_legal(deck.stats.total_cards);
    }

    /// Recompute, stamp the update time, and write the document back.
    async fn persist(&self, deck: &mut DeckRecord) -> Result<(), DeckError> {
        self.recompute(deck);
        deck.updated_at = Utc::now();
        queries::update_deck(self.db.pool(), deck).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_bounded() {
        assert_eq!(validated_name("  Burn Rush  ").unwrap(), "Burn Rush");
        assert!(validated_name("   ").is_err());
        assert!(validated_name(&"x".repeat(51)).is_err());
        assert!(validated_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn description_length_is_bounded() {
        assert!(validate_description(&"x".repeat(500)).is_ok());
        assert!(validate_description(&"x".repeat(501)).is_err());
    }

    #[test]
    fn tags_are_lowercased_and_cleaned() {
        let tags = normalize_tags(vec![
            " Aggro ".to_string(),
            "BUDGET".to_string(),
            "".to_string(),
        ]);
        assert_eq!(tags, vec!["aggro", "budget"]);
    }
}
