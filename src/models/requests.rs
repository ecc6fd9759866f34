//! # API Request Models
//!
//! Structures for incoming API request bodies and query strings.
//! Each struct represents the expected JSON body for an endpoint.

use serde::{Deserialize, Serialize};

use crate::db::models::{CardType, DeckFaction, DeckFormat, Faction, Rarity, UserPreferences};
use crate::ledger::AcquisitionSource;

fn default_quantity() -> u32 {
    1
}

/// Request to register a new account.
///
/// ## Example JSON
///
/// ```json
/// {
///     "username": "rift_walker",
///     "email": "walker@example.com",
///     "password": "hunter42",
///     "displayName": "Rift Walker"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Unique handle, at least 3 characters.
    pub username: String,

    /// Unique email address, stored lowercased.
    pub email: String,

    /// Plaintext password, at least 6 characters. Hashed before storage.
    pub password: String,

    /// Optional display name; defaults to the username.
    pub display_name: Option<String>,
}

/// Request to log in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to update profile fields. Absent fields stay untouched;
/// preference fields merge individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub preferences: Option<UserPreferences>,
}

/// Request to change the account password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Admin card payload, shared by create, update and bulk import.
///
/// ## Example JSON
///
/// ```json
/// {
///     "cardId": "FIRE001",
///     "name": "Ember Whelp",
///     "type": "Unit",
///     "rarity": "Common",
///     "cost": 2,
///     "attack": 2,
///     "health": 1,
///     "faction": "Fire",
///     "keywords": ["Rush"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPayload {
    pub card_id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "type")]
    pub card_type: CardType,

    pub rarity: Rarity,
    pub cost: i32,
    pub attack: Option<i32>,
    pub health: Option<i32>,
    pub faction: Faction,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub image_url: String,

    pub set: Option<String>,

    #[serde(default)]
    pub flavor: String,

    pub is_playable: Option<bool>,
}

/// Query string filters for the catalog listing.
///
/// `GET /api/cards?faction=Fire&rarity=Common&sort=cost`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardQuery {
    pub faction: Option<Faction>,
    pub rarity: Option<Rarity>,

    #[serde(rename = "type")]
    pub card_type: Option<CardType>,

    /// Substring match on name or description, case-insensitive.
    pub search: Option<String>,

    /// One of `name`, `cost`, `rarity`. Defaults to card id order.
    pub sort: Option<String>,
}

/// Request to add copies of a card to the caller's collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCollectionCardRequest {
    pub card_id: String,

    /// Copies to add, at least 1. Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Where the copies came from. Defaults to a pack opening.
    #[serde(default)]
    pub source: AcquisitionSource,
}

/// Request body for removal endpoints. The body is optional; omitting it
/// removes a single copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCardRequest {
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Request to set or toggle the favorite flag on a collection entry.
/// Omitting `isFavorite` toggles the current state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub is_favorite: Option<bool>,
}

/// One card line in a deck create/update payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCardInput {
    pub card_id: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Request to create a deck.
///
/// ## Example JSON
///
/// ```json
/// {
///     "name": "Burn Rush",
///     "mainFaction": "Fire",
///     "legendId": "FIRE010",
///     "cards": [
///         { "cardId": "FIRE001", "quantity": 3 },
///         { "cardId": "FIRE002", "quantity": 2 }
///     ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeckRequest {
    pub name: String,
    pub description: Option<String>,
    pub main_faction: DeckFaction,

    /// The deck's legend/champion card id.
    pub legend_id: String,

    pub format: Option<DeckFormat>,

    /// Optional initial card list. Per-card quantities must be 1..=3.
    pub cards: Option<Vec<DeckCardInput>>,

    pub is_public: Option<bool>,
    pub cover_card: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Request to update a deck. All fields optional; a supplied card list
/// replaces the deck's ledger wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeckRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub main_faction: Option<DeckFaction>,
    pub legend_id: Option<String>,
    pub format: Option<DeckFormat>,
    pub cards: Option<Vec<DeckCardInput>>,
    pub is_public: Option<bool>,
    pub is_favorite: Option<bool>,
    pub cover_card: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Request to add copies of a card to a deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDeckCardRequest {
    pub card_id: String,

    /// Copies to add. The per-card total clamps silently at 3.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Request to record a finished game against a deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResultRequest {
    pub won: bool,
}

/// Query string filters for the public deck search.
///
/// `GET /api/decks/public/search?faction=Fire&sort=winrate`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSearchQuery {
    pub faction: Option<DeckFaction>,

    /// Substring match on deck name, case-insensitive.
    pub search: Option<String>,

    /// One of `winrate`, `popular`, `recent`. Defaults to `recent`.
    pub sort: Option<String>,
}
