//! # Database Models
//!
//! Row-level structures for the four tables and the domain enums they share.
//!
//! ## Table Overview
//!
//! | Table | Description |
//! |-------|-------------|
//! | `users` | Accounts, currencies, play stats, preferences |
//! | `cards` | The card catalog (reference data, bulk-imported) |
//! | `collections` | One per user; ledger entries + derived stats as JSONB |
//! | `decks` | Many per user; capped ledger, validity flag, game stats |
//!
//! ## Relationship Diagram
//!
//! ```text
//! ┌─────────────┐ 1     1 ┌──────────────┐
//! │    users    │────────>│ collections  │
//! │             │         │ cards JSONB ─┼── card_id ──┐
//! │  id (PK)    │ 1     * │ stats JSONB  │             │  (by string id,
//! └─────────────┘────┐    └──────────────┘             ▼   never a FK)
//!                    │    ┌──────────────┐      ┌─────────────┐
//!                    └───>│    decks     │      │    cards    │
//!                         │ cards JSONB ─┼─────>│ card_id (PK)│
//!                         │ is_valid     │      └─────────────┘
//!                         └──────────────┘
//! ```
//!
//! Ledger entries reference catalog cards by string identifier only, so the
//! catalog can be reseeded or re-versioned independently of persisted
//! collections and decks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::ledger::stats::{CollectionStats, DeckGameStats, DeckStats};
use crate::ledger::LedgerEntry;

/// Error returned when a TEXT column holds a value outside its enum.
#[derive(Debug, thiserror::Error)]
#[error("Unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Card categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardType {
    Unit,
    Spell,
    Artifact,
    Champion,
}

text_enum!(CardType, "card type", {
    Unit => "Unit",
    Spell => "Spell",
    Artifact => "Artifact",
    Champion => "Champion",
});

/// Card rarities.
///
/// Note: `Showcase` exists in the catalog but has no bucket in collection
/// stats; see [`crate::ledger::stats::RarityBuckets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Showcase,
}

text_enum!(Rarity, "rarity", {
    Common => "Common",
    Uncommon => "Uncommon",
    Rare => "Rare",
    Epic => "Epic",
    Legendary => "Legendary",
    Showcase => "Showcase",
});

/// The seven card factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Fire,
    Water,
    Earth,
    Air,
    Dark,
    Light,
    Neutral,
}

text_enum!(Faction, "faction", {
    Fire => "Fire",
    Water => "Water",
    Earth => "Earth",
    Air => "Air",
    Dark => "Dark",
    Light => "Light",
    Neutral => "Neutral",
});

/// A deck's declared main faction. Decks may mix factions, hence `Multi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckFaction {
    Fire,
    Water,
    Earth,
    Air,
    Dark,
    Light,
    Neutral,
    Multi,
}

text_enum!(DeckFaction, "deck faction", {
    Fire => "Fire",
    Water => "Water",
    Earth => "Earth",
    Air => "Air",
    Dark => "Dark",
    Light => "Light",
    Neutral => "Neutral",
    Multi => "Multi",
});

/// Constructed play formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckFormat {
    Standard,
    Extended,
    Unlimited,
}

impl Default for DeckFormat {
    fn default() -> Self {
        DeckFormat::Standard
    }
}

text_enum!(DeckFormat, "format", {
    Standard => "Standard",
    Extended => "Extended",
    Unlimited => "Unlimited",
});

/// Account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

text_enum!(Role, "role", {
    User => "user",
    Admin => "admin",
});

/// A catalog card. Reference data: created by bulk import, read-only for
/// everything except admin maintenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    /// Canonical uppercase identifier. Primary key.
    pub card_id: String,

    /// Display name.
    pub name: String,

    /// Rules text.
    #[serde(default)]
    pub description: String,

    /// Unit, Spell, Artifact or Champion.
    #[serde(rename = "type")]
    pub card_type: CardType,

    pub rarity: Rarity,

    /// Energy cost. Non-negative.
    pub cost: i32,

    /// Attack value. Units only, null otherwise.
    pub attack: Option<i32>,

    /// Health value. Units only, null otherwise.
    pub health: Option<i32>,

    pub faction: Faction,

    /// Keyword abilities, e.g. "Rush", "Shield".
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Card art URL.
    #[serde(default)]
    pub image_url: String,

    /// The set the card was released in.
    #[serde(default = "default_set")]
    pub set: String,

    /// Flavor text.
    #[serde(default)]
    pub flavor: String,

    /// Whether the card is currently legal to play and shown in listings.
    #[serde(default = "default_true")]
    pub is_playable: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_set() -> String {
    "Base".to_string()
}

fn default_true() -> bool {
    true
}

/// A user's card collection. Exactly one per user, created empty at
/// registration and never deleted independently.
///
/// `stats` is a cache over `cards`: it is recomputed on every mutation and
/// persisted alongside the ledger, never trusted across a mutation boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    pub user_id: Uuid,

    /// The quantity ledger: unordered, uncapped.
    pub cards: Vec<LedgerEntry>,

    /// Derived counts. See [`CollectionStats`].
    pub stats: CollectionStats,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A constructed deck. Many per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckRecord {
    pub id: Uuid,
    pub user_id: Uuid,

    pub name: String,
    pub description: String,

    /// The quantity ledger, capped at 3 copies per card.
    pub cards: Vec<LedgerEntry>,

    pub main_faction: DeckFaction,

    /// The deck's required legend/champion card id.
    pub legend_id: String,

    pub format: DeckFormat,

    /// Derived totals. See [`DeckStats`].
    pub stats: DeckStats,

    /// Cached legality flag: true iff total cards in [30, 60]. Recomputed on
    /// every structural mutation, never computed lazily at read time.
    pub is_valid: bool,

    pub is_public: bool,
    pub is_favorite: bool,

    pub game_stats: DeckGameStats,

    /// Card id shown as the deck's cover art.
    pub cover_card: Option<String>,

    /// Free-form lowercase tags.
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Deck projection without the card list, for public search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub main_faction: DeckFaction,
    pub legend_id: String,
    pub format: DeckFormat,
    pub stats: DeckStats,
    pub is_valid: bool,
    pub game_stats: DeckGameStats,
    pub cover_card: Option<String>,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate play statistics on a user account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub total_games_played: i64,
    pub wins: i64,
    pub losses: i64,
    pub total_cards_collected: i64,
}

/// User-tunable preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub favorite_faction: Option<Faction>,
    pub notifications: Option<bool>,
}

/// A user account row.
///
/// The password hash is intentionally not part of this struct; it is fetched
/// separately by the credential queries and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub avatar: String,
    pub level: i32,
    pub experience: i32,

    /// Soft currency balance.
    pub coins: i32,

    /// Premium currency balance.
    pub gems: i32,

    pub stats: UserStats,
    pub preferences: UserPreferences,
    pub role: Role,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_enums_round_trip() {
        for rarity in ["Common", "Uncommon", "Rare", "Epic", "Legendary", "Showcase"] {
            assert_eq!(Rarity::from_str(rarity).unwrap().as_str(), rarity);
        }
        assert!(Rarity::from_str("Mythic").is_err());
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(DeckFaction::from_str("Multi").unwrap(), DeckFaction::Multi);
    }

    #[test]
    fn user_stats_parse_from_empty_document() {
        let stats: UserStats = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(stats.total_games_played, 0);
        assert_eq!(stats.total_cards_collected, 0);
    }
}
