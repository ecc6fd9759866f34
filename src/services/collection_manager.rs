//! # Collection Manager Service
//!
//! Per-user collection operations. Every mutation follows the same cycle:
//!
//! ```text
//! 1. Load the collection document (create empty on first touch)
//!                ↓
//! 2. Mutate the ledger in memory
//!                ↓
//! 3. Recompute the derived stats block from the catalog
//!                ↓
//! 4. Write the whole document back
//! ```
//!
//! Collection quantities are uncapped; the per-card copy limit applies to
//! decks only.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::queries;
use crate::db::{CollectionRecord, Database, DatabaseError};
use crate::ledger::stats::{recompute_collection_stats, CollectionStats};
use crate::ledger::{self, AcquisitionSource, CopyLimit, LedgerError};

use super::CardCatalog;

/// Errors that can occur in collection operations.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    /// The card is not present in the user's collection.
    #[error("Card not found in collection: {0}")]
    CardNotFound(String),

    /// No collection exists for the given user.
    #[error("Collection not found for user: {0}")]
    CollectionNotFound(Uuid),

    /// Quantity must be at least 1.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Database operation failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<LedgerError> for CollectionError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(card_id) => CollectionError::CardNotFound(card_id),
            LedgerError::InvalidQuantity(q) => CollectionError::InvalidQuantity(q),
        }
    }
}

/// Service for per-user collection ledgers.
#[derive(Clone)]
pub struct CollectionManager {
    db: Database,
    catalog: Arc<CardCatalog>,
}

impl CollectionManager {
    pub fn new(db: Database, catalog: Arc<CardCatalog>) -> Self {
        Self { db, catalog }
    }

    /// Get a user's collection, creating an empty one on first access.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<CollectionRecord, CollectionError> {
        if let Some(collection) = queries::get_collection(self.db.pool(), user_id).await? {
            return Ok(collection);
        }

        debug!("Creating empty collection for user: {}", user_id);
        let now = Utc::now();
        let collection = CollectionRecord {
            user_id,
            cards: Vec::new(),
            stats: CollectionStats::default(),
            created_at: now,
            updated_at: now,
        };
        queries::upsert_collection(self.db.pool(), &collection).await?;
        Ok(collection)
    }

    /// Get another user's collection for the public stats view. No
    /// auto-creation here: an untouched collection reads as absent.
    pub async fn get_public(&self, user_id: Uuid) -> Result<CollectionRecord, CollectionError> {
        queries::get_collection(self.db.pool(), user_id)
            .await?
            .ok_or(CollectionError::CollectionNotFound(user_id))
    }

    /// Add copies of a card to the collection. Unknown card ids are
    /// accepted: the ledger references the catalog by id only.
    ///
    /// Also bumps the owner's lifetime cards-collected counter by the
    /// quantity added.
    pub async fn add_card(
        &self,
        user_id: Uuid,
        card_id: &str,
        quantity: u32,
        source: AcquisitionSource,
    ) -> Result<CollectionRecord, CollectionError> {
        let mut collection = self.get_or_create(user_id).await?;

        ledger::add_entry(
            &mut collection.cards,
            card_id,
            quantity,
            source,
            CopyLimit::Unbounded,
        )?;

        self.persist(&mut collection).await?;
        queries::increment_cards_collected(self.db.pool(), user_id, i64::from(quantity)).await?;

        info!(
            "Added {}x {} to collection of user {}",
            quantity,
            ledger::normalize_card_id(card_id),
            user_id
        );
        Ok(collection)
    }

    /// Remove copies of a card from the collection. Removing at least as
    /// many copies as are held deletes the entry.
    pub async fn remove_card(
        &self,
        user_id: Uuid,
        card_id: &str,
        quantity: u32,
    ) -> Result<CollectionRecord, CollectionError> {
        let mut collection = self.get_or_create(user_id).await?;

        ledger::remove_entry(&mut collection.cards, card_id, quantity)?;

        self.persist(&mut collection).await?;
        Ok(collection)
    }

    /// Set or toggle the favorite flag on a collection entry. `None`
    /// toggles; `Some` assigns. Returns the collection and the new state.
    pub async fn set_favorite(
        &self,
        user_id: Uuid,
        card_id: &str,
        is_favorite: Option<bool>,
    ) -> Result<(CollectionRecord, bool), CollectionError> {
        let mut collection = self.get_or_create(user_id).await?;
        let canonical = ledger::normalize_card_id(card_id);

        let entry = collection
            .cards
            .iter_mut()
            .find(|e| e.card_id == canonical)
            .ok_or(CollectionError::CardNotFound(canonical))?;

        entry.is_favorite = is_favorite.unwrap_or(!entry.is_favorite);
        let new_state = entry.is_favorite;

        self.persist(&mut collection).await?;
        Ok((collection, new_state))
    }

    /// Recompute and persist the stats block without touching the ledger.
    /// Keeps a collection honest after catalog reseeds.
    pub async fn refresh_stats(&self, user_id: Uuid) -> Result<CollectionRecord, CollectionError> {
        let mut collection = self.get_or_create(user_id).await?;
        self.persist(&mut collection).await?;
        Ok(collection)
    }

    /// Recompute stats, stamp the update time, and write the document back.
    async fn persist(&self, collection: &mut CollectionRecord) -> Result<(), CollectionError> {
        collection.stats = recompute_collection_stats(&collection.cards, &self.catalog.snapshot());
        collection.updated_at = Utc::now();
        queries::upsert_collection(self.db.pool(), collection).await?;
        Ok(())
    }
}
