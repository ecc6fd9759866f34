//! # Card Catalog Service
//!
//! The catalog is reference data: a few hundred rows, read on every stats
//! recomputation. It is loaded into memory at startup and reloaded after any
//! admin mutation, so the hot paths (collection/deck stats) never join
//! against the database.
//!
//! ## Flow Example: Bulk Import
//!
//! ```text
//! 1. Admin POSTs a card list
//!                ↓
//! 2. Each payload upserted by card id
//!                ↓
//! 3. Cache reloaded from the table
//!                ↓
//! 4. Import summary returned
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{info, warn};

use crate::db::queries::{self, CardFilter};
use crate::db::{CardRecord, Database, DatabaseError};
use crate::ledger::normalize_card_id;

/// Errors that can occur in catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Card not found for the given id.
    #[error("Card not found: {0}")]
    CardNotFound(String),

    /// A card with this id already exists.
    #[error("Card already exists: {0}")]
    DuplicateCard(String),

    /// Database operation failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Aggregate catalog counts for the stats overview endpoint.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOverview {
    pub total_cards: i64,
    pub by_rarity: HashMap<String, i64>,
    pub by_faction: HashMap<String, i64>,
    pub by_type: HashMap<String, i64>,
    pub average_cost: f64,
}

/// In-memory card catalog backed by the `cards` table.
///
/// The cache maps canonical (uppercase) card id to the full record. Reads
/// clone records out of the lock; the lock is never held across an await.
pub struct CardCatalog {
    db: Database,
    cache: RwLock<HashMap<String, CardRecord>>,
}

impl CardCatalog {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Load (or reload) the cache from the database.
    pub async fn reload(&self) -> Result<usize, CatalogError> {
        let cards = queries::load_all_cards(self.db.pool()).await?;
        let count = cards.len();

        let mut map = HashMap::with_capacity(count);
        for card in cards {
            map.insert(normalize_card_id(&card.card_id), card);
        }

        *self.cache.write().unwrap() = map;
        info!("Card catalog loaded: {} cards", count);
        Ok(count)
    }

    /// Look up a card by id. Normalizes the id before lookup.
    pub fn resolve(&self, card_id: &str) -> Option<CardRecord> {
        self.cache
            .read()
            .unwrap()
            .get(&normalize_card_id(card_id))
            .cloned()
    }

    /// Snapshot of the full cache, for stats recomputation.
    pub fn snapshot(&self) -> HashMap<String, CardRecord> {
        self.cache.read().unwrap().clone()
    }

    /// List playable cards with filters, straight from the database so the
    /// listing honors SQL ordering.
    pub async fn list(&self, filter: &CardFilter) -> Result<Vec<CardRecord>, CatalogError> {
        Ok(queries::list_cards(self.db.pool(), filter).await?)
    }

    /// Get a single card, cache-first with a database fallback for cards
    /// created since the last reload.
    pub async fn get(&self, card_id: &str) -> Result<CardRecord, CatalogError> {
        if let Some(card) = self.resolve(card_id) {
            return Ok(card);
        }

        let canonical = normalize_card_id(card_id);
        queries::get_card(self.db.pool(), &canonical)
            .await?
            .ok_or(CatalogError::CardNotFound(canonical))
    }

    /// Create a new catalog card. Admin path.
    pub async fn create(&self, mut card: CardRecord) -> Result<CardRecord, CatalogError> {
        card.card_id = normalize_card_id(&card.card_id);

        if queries::get_card(self.db.pool(), &card.card_id).await?.is_some() {
            return Err(CatalogError::DuplicateCard(card.card_id));
        }

        queries::insert_card(self.db.pool(), &card).await?;
        self.reload().await?;
        Ok(card)
    }

    /// Replace an existing catalog card. Admin path.
    pub async fn update(&self, mut card: CardRecord) -> Result<CardRecord, CatalogError> {
        card.card_id = normalize_card_id(&card.card_id);

        match queries::update_card(self.db.pool(), &card).await {
            Ok(()) => {}
            Err(DatabaseError::NotFound(_)) => {
                return Err(CatalogError::CardNotFound(card.card_id));
            }
            Err(e) => return Err(e.into()),
        }

        self.reload().await?;
        Ok(card)
    }

    /// Delete a catalog card. Admin path. Existing ledger entries keep the
    /// id and simply lose their details.
    pub async fn delete(&self, card_id: &str) -> Result<(), CatalogError> {
        let canonical = normalize_card_id(card_id);

        match queries::delete_card(self.db.pool(), &canonical).await {
            Ok(()) => {}
            Err(DatabaseError::NotFound(_)) => {
                return Err(CatalogError::CardNotFound(canonical));
            }
            Err(e) => return Err(e.into()),
        }

        self.reload().await?;
        Ok(())
    }

    /// Bulk-import catalog cards, replacing by id. Admin path.
    ///
    /// Returns how many payloads were written. Individual upsert failures
    /// abort the import; cards already written stay written (the import is
    /// idempotent, so rerunning is the recovery path).
    pub async fn import(&self, cards: Vec<CardRecord>) -> Result<usize, CatalogError> {
        let total = cards.len();
        info!("Importing {} cards into the catalog", total);

        for mut card in cards {
            card.card_id = normalize_card_id(&card.card_id);
            queries::upsert_card(self.db.pool(), &card).await?;
        }

        let loaded = self.reload().await?;
        if loaded < total {
            warn!("Catalog holds {} cards after importing {}", loaded, total);
        }

        Ok(total)
    }

    /// Aggregate counts over the whole catalog, computed from the cache.
    pub fn overview(&self) -> CatalogOverview {
        let cache = self.cache.read().unwrap();

        let mut overview = CatalogOverview {
            total_cards: cache.len() as i64,
            ..Default::default()
        };

        let mut cost_sum = 0i64;
        for card in cache.values() {
            *overview
                .by_rarity
                .entry(card.rarity.as_str().to_string())
                .or_insert(0) += 1;
            *overview
                .by_faction
                .entry(card.faction.as_str().to_string())
                .or_insert(0) += 1;
            *overview
                .by_type
                .entry(card.card_type.as_str().to_string())
                .or_insert(0) += 1;
            cost_sum += i64::from(card.cost);
        }

        if overview.total_cards > 0 {
            overview.average_cost =
                ((cost_sum as f64 / overview.total_cards as f64) * 100.0).round() / 100.0;
        }

        overview
    }
}
