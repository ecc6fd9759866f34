//! # Stats Aggregator
//!
//! Pure recomputation of the derived stat blocks persisted on collections
//! and decks. Callers run these after every ledger mutation and store the
//! result with the entity; the stored blocks are caches, never inputs.
//!
//! Bucketing joins each ledger entry against the catalog by card id. An
//! entry whose id is absent from the catalog still counts toward the totals
//! but lands in no rarity/faction bucket, and contributes nothing to a
//! deck's cost sum; absence means "details unavailable", not corruption.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::db::models::{CardRecord, Faction, Rarity};
use crate::ledger::LedgerEntry;

/// Collection counts keyed by lower-cased rarity.
///
/// The key set is fixed: `Showcase` cards have no bucket here and are
/// dropped from the breakdown (they still count toward the totals).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityBuckets {
    pub common: i64,
    pub uncommon: i64,
    pub rare: i64,
    pub epic: i64,
    pub legendary: i64,
}

impl RarityBuckets {
    /// The bucket for a rarity, or `None` for rarities without one.
    pub fn slot_mut(&mut self, rarity: Rarity) -> Option<&mut i64> {
        match rarity {
            Rarity::Common => Some(&mut self.common),
            Rarity::Uncommon => Some(&mut self.uncommon),
            Rarity::Rare => Some(&mut self.rare),
            Rarity::Epic => Some(&mut self.epic),
            Rarity::Legendary => Some(&mut self.legendary),
            Rarity::Showcase => None,
        }
    }
}

/// Collection counts keyed by lower-cased faction. All seven factions have
/// a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionBuckets {
    pub fire: i64,
    pub water: i64,
    pub earth: i64,
    pub air: i64,
    pub dark: i64,
    pub light: i64,
    pub neutral: i64,
}

impl FactionBuckets {
    pub fn slot_mut(&mut self, faction: Faction) -> &mut i64 {
        match faction {
            Faction::Fire => &mut self.fire,
            Faction::Water => &mut self.water,
            Faction::Earth => &mut self.earth,
            Faction::Air => &mut self.air,
            Faction::Dark => &mut self.dark,
            Faction::Light => &mut self.light,
            Faction::Neutral => &mut self.neutral,
        }
    }
}

/// Derived collection counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionStats {
    /// Sum of all entry quantities.
    pub total_cards: i64,

    /// Number of distinct entries.
    pub unique_cards: i64,

    pub by_rarity: RarityBuckets,
    pub by_faction: FactionBuckets,
}

/// Derived deck totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckStats {
    /// Sum of all entry quantities.
    pub total_cards: i64,

    /// Mean energy cost per card, rounded to two decimals.
    pub average_cost: f64,
}

/// Win/loss record for a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckGameStats {
    pub times_played: i64,
    pub wins: i64,
    pub losses: i64,

    /// Rounded percentage of games won. Holds its prior value until at
    /// least one game has been recorded.
    pub win_rate: i64,
}

/// Recompute a collection's derived stats from its ledger.
///
/// Pure function: the result depends only on the entries and the catalog.
/// Entries absent from the catalog count toward `total_cards` and
/// `unique_cards` but fall into no bucket.
pub fn recompute_collection_stats(
    entries: &[LedgerEntry],
    catalog: &HashMap<String, CardRecord>,
) -> CollectionStats {
    let mut stats = CollectionStats::default();

    for entry in entries {
        let quantity = i64::from(entry.quantity);
        stats.total_cards += quantity;
        stats.unique_cards += 1;

        if let Some(card) = catalog.get(&entry.card_id) {
            if let Some(bucket) = stats.by_rarity.slot_mut(card.rarity) {
                *bucket += quantity;
            }
            *stats.by_faction.slot_mut(card.faction) += quantity;
        }
    }

    stats
}

/// Recompute a deck's derived totals from its ledger.
///
/// Entries absent from the catalog contribute 0 to the cost sum while their
/// quantity still counts toward `total_cards`, so a deck full of unknown
/// ids averages to zero cost. The asymmetry comes from the source system
/// and is preserved deliberately (see the module tests).
pub fn recompute_deck_stats(
    entries: &[LedgerEntry],
    catalog: &HashMap<String, CardRecord>,
) -> DeckStats {
    let mut total_cards = 0i64;
    let mut cost_sum = 0i64;

    for entry in entries {
        let quantity = i64::from(entry.quantity);
        total_cards += quantity;

        if let Some(card) = catalog.get(&entry.card_id) {
            cost_sum += quantity * i64::from(card.cost);
        }
    }

    let average_cost = if total_cards > 0 {
        round2(cost_sum as f64 / total_cards as f64)
    } else {
        0.0
    };

    DeckStats {
        total_cards,
        average_cost,
    }
}

/// Recompute a deck's win rate after a game result was recorded.
///
/// With zero recorded games the prior value is left untouched: the rate is
/// additive, never reset merely because the counters are empty.
pub fn update_win_rate(game_stats: &mut DeckGameStats) {
    let total_games = game_stats.wins + game_stats.losses;
    if total_games > 0 {
        game_stats.win_rate =
            ((game_stats.wins as f64 / total_games as f64) * 100.0).round() as i64;
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{add_entry, AcquisitionSource, CopyLimit};
    use chrono::Utc;

    fn card(card_id: &str, rarity: Rarity, faction: Faction, cost: i32) -> CardRecord {
        CardRecord {
            card_id: card_id.to_string(),
            name: card_id.to_string(),
            description: String::new(),
            card_type: crate::db::models::CardType::Unit,
            rarity,
            cost,
            attack: Some(1),
            health: Some(1),
            faction,
            keywords: Vec::new(),
            image_url: String::new(),
            set: "Base".to_string(),
            flavor: String::new(),
            is_playable: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog(cards: Vec<CardRecord>) -> HashMap<String, CardRecord> {
        cards.into_iter().map(|c| (c.card_id.clone(), c)).collect()
    }

    fn entries(list: &[(&str, u32)]) -> Vec<LedgerEntry> {
        let mut out = Vec::new();
        for (card_id, quantity) in list {
            add_entry(
                &mut out,
                card_id,
                *quantity,
                AcquisitionSource::Pack,
                CopyLimit::Unbounded,
            )
            .unwrap();
        }
        out
    }

    #[test]
    fn empty_ledger_yields_zeroed_stats() {
        let stats = recompute_collection_stats(&[], &HashMap::new());
        assert_eq!(stats, CollectionStats::default());
    }

    #[test]
    fn totals_count_catalog_absent_entries_but_buckets_do_not() {
        // FIRE001 is unknown to the catalog; WATER002 is an Epic Water card.
        let catalog = catalog(vec![card("WATER002", Rarity::Epic, Faction::Water, 4)]);
        let ledger = entries(&[("FIRE001", 3), ("WATER002", 1)]);

        let stats = recompute_collection_stats(&ledger, &catalog);
        assert_eq!(stats.total_cards, 4);
        assert_eq!(stats.unique_cards, 2);
        assert_eq!(stats.by_faction.water, 1);
        assert_eq!(stats.by_rarity.epic, 1);
        assert_eq!(stats.by_faction.fire, 0);
    }

    #[test]
    fn showcase_rarity_drops_from_buckets_but_counts_in_totals() {
        let catalog = catalog(vec![card("LIGHT009", Rarity::Showcase, Faction::Light, 7)]);
        let ledger = entries(&[("LIGHT009", 2)]);

        let stats = recompute_collection_stats(&ledger, &catalog);
        assert_eq!(stats.total_cards, 2);
        assert_eq!(stats.by_faction.light, 2);
        assert_eq!(stats.by_rarity, RarityBuckets::default());
    }

    #[test]
    fn deck_stats_average_cost() {
        let catalog = catalog(vec![
            card("FIRE001", Rarity::Common, Faction::Fire, 2),
            card("WATER002", Rarity::Epic, Faction::Water, 5),
        ]);
        let ledger = entries(&[("FIRE001", 3), ("WATER002", 1)]);

        let stats = recompute_deck_stats(&ledger, &catalog);
        assert_eq!(stats.total_cards, 4);
        // (3*2 + 1*5) / 4 = 2.75
        assert_eq!(stats.average_cost, 2.75);
    }

    // Catalog-absent entries count in the denominator but not the cost sum.
    // This mirrors a quirk of the source system and is intentional: with
    // one unknown 0-cost-contributing card the average dips below the true
    // mean of the known cards.
    #[test]
    fn catalog_absent_entries_dilute_average_cost() {
        let catalog = catalog(vec![card("FIRE001", Rarity::Common, Faction::Fire, 4)]);
        let ledger = entries(&[("FIRE001", 1), ("UNKNOWN999", 1)]);

        let stats = recompute_deck_stats(&ledger, &catalog);
        assert_eq!(stats.total_cards, 2);
        assert_eq!(stats.average_cost, 2.0);
    }

    #[test]
    fn empty_deck_averages_zero() {
        let stats = recompute_deck_stats(&[], &HashMap::new());
        assert_eq!(stats.total_cards, 0);
        assert_eq!(stats.average_cost, 0.0);
    }

    #[test]
    fn first_win_yields_hundred_percent() {
        let mut game_stats = DeckGameStats::default();
        game_stats.times_played += 1;
        game_stats.wins += 1;
        update_win_rate(&mut game_stats);

        assert_eq!(game_stats.wins, 1);
        assert_eq!(game_stats.losses, 0);
        assert_eq!(game_stats.win_rate, 100);
    }

    #[test]
    fn win_rate_rounds_to_nearest_percent() {
        let mut game_stats = DeckGameStats {
            times_played: 3,
            wins: 2,
            losses: 1,
            win_rate: 0,
        };
        update_win_rate(&mut game_stats);
        assert_eq!(game_stats.win_rate, 67);
    }

    #[test]
    fn win_rate_is_not_reset_when_no_games_recorded() {
        let mut game_stats = DeckGameStats {
            times_played: 0,
            wins: 0,
            losses: 0,
            win_rate: 55,
        };
        update_win_rate(&mut game_stats);
        assert_eq!(game_stats.win_rate, 55);
    }
}
