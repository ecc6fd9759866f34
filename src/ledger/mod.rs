//! # Quantity Ledger
//!
//! The shared bookkeeping core for card ownership. Both a user's collection
//! and each of their decks are a *ledger*: a list of
//! (card id → quantity) entries mutated exclusively through [`add_entry`] and
//! [`remove_entry`].
//!
//! ## Invariants
//!
//! - Quantities are always positive integers. An entry whose quantity would
//!   reach zero is removed from the ledger, never retained at zero.
//! - A card id identifies at most one entry per ledger.
//! - Card ids are normalized to uppercase before any lookup, so `fire001`
//!   and `FIRE001` address the same entry.
//! - Decks cap every entry at [`DECK_COPY_LIMIT`] copies. The cap is a
//!   silent clamp: adding past it discards the excess without an error.
//!
//! After every mutation the owning entity's derived stats (see
//! [`stats`](crate::ledger::stats)) and, for decks, the validity flag (see
//! [`validator`](crate::ledger::validator)) must be recomputed before the
//! entity is persisted. Stale stats are a correctness violation.

pub mod stats;
pub mod validator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum copies of a single card in a deck.
pub const DECK_COPY_LIMIT: u32 = 3;

/// Errors raised by ledger mutations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No entry exists for the card id on removal.
    #[error("Card not found in ledger: {0}")]
    NotFound(String),

    /// The requested quantity is not a positive integer.
    #[error("Quantity must be a positive integer, got {0}")]
    InvalidQuantity(u32),
}

/// How a collection entry was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionSource {
    Pack,
    Craft,
    Trade,
    Reward,
    Purchase,
    Gift,
}

impl Default for AcquisitionSource {
    fn default() -> Self {
        AcquisitionSource::Pack
    }
}

/// A single ledger entry: one owned card and how many copies of it.
///
/// The entry references its card by string identifier only. Display data
/// (name, cost, art) lives in the catalog and is joined on demand; an id
/// with no catalog match is still a perfectly valid entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Canonical (uppercase) card identifier.
    pub card_id: String,

    /// Number of copies. Always >= 1 while the entry exists.
    pub quantity: u32,

    /// Acquisition provenance. Meaningful for collections; decks keep the
    /// default.
    #[serde(default)]
    pub acquired_from: AcquisitionSource,

    /// Whether the owner marked this card as a favorite.
    #[serde(default)]
    pub is_favorite: bool,

    /// When the entry was first created.
    #[serde(default = "Utc::now")]
    pub acquired_at: DateTime<Utc>,
}

/// Per-card copy cap policy for a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyLimit {
    /// No upper bound (collections).
    Unbounded,

    /// At most this many copies per card (decks). Exceeding the cap is a
    /// silent clamp, never an error.
    PerCard(u32),
}

impl CopyLimit {
    fn clamp(&self, quantity: u32) -> u32 {
        match self {
            CopyLimit::Unbounded => quantity,
            CopyLimit::PerCard(cap) => quantity.min(*cap),
        }
    }
}

/// Normalize a card id to its canonical form.
pub fn normalize_card_id(card_id: &str) -> String {
    card_id.trim().to_uppercase()
}

/// Add copies of a card to a ledger.
///
/// If an entry for the card already exists its quantity increases by
/// `quantity`; otherwise a new entry is created with the given provenance.
/// Either way the result is clamped by `limit`.
///
/// ## Errors
///
/// * [`LedgerError::InvalidQuantity`] when `quantity` is zero. Exceeding a
///   deck's copy cap is NOT an error; the excess is silently discarded.
pub fn add_entry(
    entries: &mut Vec<LedgerEntry>,
    card_id: &str,
    quantity: u32,
    source: AcquisitionSource,
    limit: CopyLimit,
) -> Result<(), LedgerError> {
    if quantity == 0 {
        return Err(LedgerError::InvalidQuantity(quantity));
    }

    let card_id = normalize_card_id(card_id);

    match entries.iter_mut().find(|e| e.card_id == card_id) {
        Some(entry) => {
            entry.quantity = limit.clamp(entry.quantity.saturating_add(quantity));
        }
        None => {
            entries.push(LedgerEntry {
                card_id,
                quantity: limit.clamp(quantity),
                acquired_from: source,
                is_favorite: false,
                acquired_at: Utc::now(),
            });
        }
    }

    Ok(())
}

/// Remove copies of a card from a ledger.
///
/// When the existing quantity is less than or equal to the requested amount
/// the entry is deleted entirely; otherwise it is decremented.
///
/// ## Errors
///
/// * [`LedgerError::NotFound`] when no entry exists for the card id. The
///   ledger is left unchanged.
pub fn remove_entry(
    entries: &mut Vec<LedgerEntry>,
    card_id: &str,
    quantity: u32,
) -> Result<(), LedgerError> {
    let card_id = normalize_card_id(card_id);

    let entry = entries
        .iter_mut()
        .find(|e| e.card_id == card_id)
        .ok_or_else(|| LedgerError::NotFound(card_id.clone()))?;

    if entry.quantity <= quantity {
        entries.retain(|e| e.card_id != card_id);
    } else {
        entry.quantity -= quantity;
    }

    Ok(())
}

/// Build a deck ledger from a raw (card id, quantity) list.
///
/// This is the bulk-replace path used when a deck is created with an initial
/// card list or when an update overwrites the whole list. Unlike
/// [`add_entry`], which clamps, the bulk path rejects out-of-range
/// quantities: every entry must carry between 1 and [`DECK_COPY_LIMIT`]
/// copies. Duplicate ids are merged through the normal clamped add.
pub fn deck_entries_from(
    cards: &[(String, u32)],
) -> Result<Vec<LedgerEntry>, LedgerError> {
    let mut entries = Vec::with_capacity(cards.len());

    for (card_id, quantity) in cards {
        if *quantity == 0 || *quantity > DECK_COPY_LIMIT {
            return Err(LedgerError::InvalidQuantity(*quantity));
        }
        add_entry(
            &mut entries,
            card_id,
            *quantity,
            AcquisitionSource::default(),
            CopyLimit::PerCard(DECK_COPY_LIMIT),
        )?;
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(
        entries: &mut Vec<LedgerEntry>,
        card_id: &str,
        quantity: u32,
        limit: CopyLimit,
    ) -> Result<(), LedgerError> {
        add_entry(entries, card_id, quantity, AcquisitionSource::Pack, limit)
    }

    #[test]
    fn add_then_remove_round_trips_to_empty() {
        let mut entries = Vec::new();
        add(&mut entries, "FIRE001", 4, CopyLimit::Unbounded).unwrap();
        remove_entry(&mut entries, "FIRE001", 4).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn add_merges_into_existing_entry() {
        let mut entries = Vec::new();
        add(&mut entries, "FIRE001", 2, CopyLimit::Unbounded).unwrap();
        add(&mut entries, "FIRE001", 3, CopyLimit::Unbounded).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 5);
    }

    #[test]
    fn card_ids_are_case_normalized() {
        let mut entries = Vec::new();
        add(&mut entries, "fire001", 1, CopyLimit::Unbounded).unwrap();
        add(&mut entries, "FIRE001", 1, CopyLimit::Unbounded).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].card_id, "FIRE001");
        assert_eq!(entries[0].quantity, 2);
    }

    #[test]
    fn deck_add_clamps_to_copy_limit() {
        let limit = CopyLimit::PerCard(DECK_COPY_LIMIT);

        // Adding 5 copies to an empty slot yields 3, not 5.
        let mut entries = Vec::new();
        add(&mut entries, "FIRE001", 5, limit).unwrap();
        assert_eq!(entries[0].quantity, 3);

        // 3 then 2 more stays clamped at 3.
        let mut entries = Vec::new();
        add(&mut entries, "FIRE001", 3, limit).unwrap();
        add(&mut entries, "FIRE001", 2, limit).unwrap();
        assert_eq!(entries[0].quantity, 3);
    }

    #[test]
    fn collection_add_is_unbounded() {
        let mut entries = Vec::new();
        add(&mut entries, "FIRE001", 50, CopyLimit::Unbounded).unwrap();
        add(&mut entries, "FIRE001", 50, CopyLimit::Unbounded).unwrap();
        assert_eq!(entries[0].quantity, 100);
    }

    #[test]
    fn zero_quantity_add_is_rejected() {
        let mut entries = Vec::new();
        let err = add(&mut entries, "FIRE001", 0, CopyLimit::Unbounded);
        assert!(matches!(err, Err(LedgerError::InvalidQuantity(0))));
        assert!(entries.is_empty());
    }

    #[test]
    fn remove_missing_card_fails_and_leaves_ledger_unchanged() {
        let mut entries = Vec::new();
        add(&mut entries, "FIRE001", 2, CopyLimit::Unbounded).unwrap();

        let err = remove_entry(&mut entries, "WATER002", 1);
        assert!(matches!(err, Err(LedgerError::NotFound(_))));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 2);
    }

    #[test]
    fn remove_more_than_held_deletes_the_entry() {
        let mut entries = Vec::new();
        add(&mut entries, "FIRE001", 2, CopyLimit::Unbounded).unwrap();
        remove_entry(&mut entries, "FIRE001", 5).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn partial_remove_decrements() {
        let mut entries = Vec::new();
        add(&mut entries, "FIRE001", 3, CopyLimit::Unbounded).unwrap();
        remove_entry(&mut entries, "FIRE001", 1).unwrap();
        assert_eq!(entries[0].quantity, 2);
    }

    #[test]
    fn bulk_deck_list_rejects_out_of_range_quantities() {
        assert!(matches!(
            deck_entries_from(&[("FIRE001".to_string(), 4)]),
            Err(LedgerError::InvalidQuantity(4))
        ));
        assert!(matches!(
            deck_entries_from(&[("FIRE001".to_string(), 0)]),
            Err(LedgerError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn bulk_deck_list_merges_duplicates_with_clamp() {
        let entries = deck_entries_from(&[
            ("fire001".to_string(), 2),
            ("FIRE001".to_string(), 2),
        ])
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 3);
    }
}
