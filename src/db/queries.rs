//! # Database Queries
//!
//! All SQL for the backend lives here, one function per operation, grouped
//! by table:
//!
//! - `user_*` / `get_user_*` - Account rows
//! - `*_card*` - Catalog rows
//! - `*_collection` - Collection documents
//! - `*_deck*` - Deck documents
//!
//! ## Error Handling
//!
//! All queries return `Result<T, DatabaseError>`. Lookups that may
//! legitimately miss return `Option`; updates that target a missing row
//! return `NotFound`. JSONB columns are decoded through serde; a malformed
//! stored document surfaces as `MalformedDocument` rather than a panic.

use deadpool_postgres::Pool;
use std::str::FromStr;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::*;
use super::DatabaseError;
use crate::ledger::LedgerEntry;
use crate::ledger::stats::{CollectionStats, DeckGameStats, DeckStats};

// ============================================
// ROW MAPPERS
// ============================================

fn row_to_user(row: &Row) -> Result<UserRecord, DatabaseError> {
    Ok(UserRecord {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        avatar: row.get("avatar"),
        level: row.get("level"),
        experience: row.get("experience"),
        coins: row.get("coins"),
        gems: row.get("gems"),
        stats: serde_json::from_value(row.get::<_, serde_json::Value>("stats"))?,
        preferences: serde_json::from_value(row.get::<_, serde_json::Value>("preferences"))?,
        role: Role::from_str(row.get::<_, &str>("role"))?,
        is_active: row.get("is_active"),
        last_login: row.get("last_login"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_card(row: &Row) -> Result<CardRecord, DatabaseError> {
    Ok(CardRecord {
        card_id: row.get("card_id"),
        name: row.get("name"),
        description: row.get("description"),
        card_type: CardType::from_str(row.get::<_, &str>("card_type"))?,
        rarity: Rarity::from_str(row.get::<_, &str>("rarity"))?,
        cost: row.get("cost"),
        attack: row.get("attack"),
        health: row.get("health"),
        faction: Faction::from_str(row.get::<_, &str>("faction"))?,
        keywords: row.get("keywords"),
        image_url: row.get("image_url"),
        set: row.get("set_name"),
        flavor: row.get("flavor"),
        is_playable: row.get("is_playable"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_collection(row: &Row) -> Result<CollectionRecord, DatabaseError> {
    let cards: Vec<LedgerEntry> =
        serde_json::from_value(row.get::<_, serde_json::Value>("cards"))?;
    let stats: CollectionStats =
        serde_json::from_value(row.get::<_, serde_json::Value>("stats"))?;

    Ok(CollectionRecord {
        user_id: row.get("user_id"),
        cards,
        stats,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_deck(row: &Row) -> Result<DeckRecord, DatabaseError> {
    let cards: Vec<LedgerEntry> =
        serde_json::from_value(row.get::<_, serde_json::Value>("cards"))?;
    let stats: DeckStats = serde_json::from_value(row.get::<_, serde_json::Value>("stats"))?;
    let game_stats: DeckGameStats =
        serde_json::from_value(row.get::<_, serde_json::Value>("game_stats"))?;

    Ok(DeckRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        cards,
        main_faction: DeckFaction::from_str(row.get::<_, &str>("main_faction"))?,
        legend_id: row.get("legend_id"),
        format: DeckFormat::from_str(row.get::<_, &str>("format"))?,
        stats,
        is_valid: row.get("is_valid"),
        is_public: row.get("is_public"),
        is_favorite: row.get("is_favorite"),
        game_stats,
        cover_card: row.get("cover_card"),
        tags: row.get("tags"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_deck_summary(row: &Row) -> Result<DeckSummary, DatabaseError> {
    let stats: DeckStats = serde_json::from_value(row.get::<_, serde_json::Value>("stats"))?;
    let game_stats: DeckGameStats =
        serde_json::from_value(row.get::<_, serde_json::Value>("game_stats"))?;

    Ok(DeckSummary {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        main_faction: DeckFaction::from_str(row.get::<_, &str>("main_faction"))?,
        legend_id: row.get("legend_id"),
        format: DeckFormat::from_str(row.get::<_, &str>("format"))?,
        stats,
        is_valid: row.get("is_valid"),
        game_stats,
        cover_card: row.get("cover_card"),
        tags: row.get("tags"),
        updated_at: row.get("updated_at"),
    })
}

async fn get_client(pool: &Pool) -> Result<deadpool_postgres::Client, DatabaseError> {
    pool.get()
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))
}

const USER_COLUMNS: &str = "id, username, email, display_name, avatar, level, experience, \
     coins, gems, stats, preferences, role, is_active, last_login, created_at, updated_at";

const CARD_COLUMNS: &str = "card_id, name, description, card_type, rarity, cost, attack, \
     health, faction, keywords, image_url, set_name, flavor, is_playable, created_at, updated_at";

const DECK_COLUMNS: &str = "id, user_id, name, description, cards, main_faction, legend_id, \
     format, stats, is_valid, is_public, is_favorite, game_stats, cover_card, tags, \
     created_at, updated_at";

// ============================================
// USER QUERIES
// ============================================

/// Insert a new user row. The password hash is supplied separately and is
/// never carried on [`UserRecord`].
pub async fn create_user(
    pool: &Pool,
    user: &UserRecord,
    password_hash: &str,
) -> Result<(), DatabaseError> {
    debug!("Creating user: {}", user.username);

    let client = get_client(pool).await?;

    client
        .execute(
            r#"
            INSERT INTO users (
                id, username, email, password_hash, display_name, avatar,
                level, experience, coins, gems, stats, preferences,
                role, is_active, last_login, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    $13, $14, $15, $16, $17)
            "#,
            &[
                &user.id,
                &user.username,
                &user.email,
                &password_hash,
                &user.display_name,
                &user.avatar,
                &user.level,
                &user.experience,
                &user.coins,
                &user.gems,
                &serde_json::to_value(&user.stats)?,
                &serde_json::to_value(&user.preferences)?,
                &user.role.as_str(),
                &user.is_active,
                &user.last_login,
                &user.created_at,
                &user.updated_at,
            ],
        )
        .await?;

    info!("User created: {} ({})", user.username, user.id);
    Ok(())
}

/// Get a user by id.
pub async fn get_user_by_id(pool: &Pool, id: Uuid) -> Result<Option<UserRecord>, DatabaseError> {
    let client = get_client(pool).await?;

    let rows = client
        .query(
            &format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS),
            &[&id],
        )
        .await?;

    rows.first().map(row_to_user).transpose()
}

/// Find the username/email pair of any existing user colliding with a
/// registration attempt. Returns `None` when both are free.
pub async fn find_user_conflict(
    pool: &Pool,
    username: &str,
    email: &str,
) -> Result<Option<(String, String)>, DatabaseError> {
    let client = get_client(pool).await?;

    let rows = client
        .query(
            "SELECT username, email FROM users WHERE username = $1 OR email = $2 LIMIT 1",
            &[&username, &email],
        )
        .await?;

    Ok(rows.first().map(|row| (row.get("username"), row.get("email"))))
}

/// Get a user together with their password hash, for login.
pub async fn get_user_credentials(
    pool: &Pool,
    email: &str,
) -> Result<Option<(UserRecord, String)>, DatabaseError> {
    let client = get_client(pool).await?;

    let rows = client
        .query(
            &format!(
                "SELECT {}, password_hash FROM users WHERE email = $1",
                USER_COLUMNS
            ),
            &[&email],
        )
        .await?;

    match rows.first() {
        Some(row) => {
            let user = row_to_user(row)?;
            let hash: String = row.get("password_hash");
            Ok(Some((user, hash)))
        }
        None => Ok(None),
    }
}

/// Get just the password hash for a user id, for password changes.
pub async fn get_password_hash(pool: &Pool, id: Uuid) -> Result<Option<String>, DatabaseError> {
    let client = get_client(pool).await?;

    let rows = client
        .query("SELECT password_hash FROM users WHERE id = $1", &[&id])
        .await?;

    Ok(rows.first().map(|row| row.get("password_hash")))
}

/// Stamp a successful login.
pub async fn update_last_login(pool: &Pool, id: Uuid) -> Result<(), DatabaseError> {
    let client = get_client(pool).await?;

    client
        .execute(
            "UPDATE users SET last_login = NOW(), updated_at = NOW() WHERE id = $1",
            &[&id],
        )
        .await?;

    Ok(())
}

/// Persist the editable profile fields of a user.
pub async fn update_user_profile(pool: &Pool, user: &UserRecord) -> Result<(), DatabaseError> {
    let client = get_client(pool).await?;

    let rows_affected = client
        .execute(
            r#"
            UPDATE users
            SET display_name = $2, avatar = $3, preferences = $4, updated_at = $5
            WHERE id = $1
            "#,
            &[
                &user.id,
                &user.display_name,
                &user.avatar,
                &serde_json::to_value(&user.preferences)?,
                &user.updated_at,
            ],
        )
        .await?;

    if rows_affected == 0 {
        return Err(DatabaseError::NotFound(format!("User not found: {}", user.id)));
    }

    Ok(())
}

/// Replace a user's password hash.
pub async fn update_password(pool: &Pool, id: Uuid, hash: &str) -> Result<(), DatabaseError> {
    let client = get_client(pool).await?;

    let rows_affected = client
        .execute(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
            &[&id, &hash],
        )
        .await?;

    if rows_affected == 0 {
        return Err(DatabaseError::NotFound(format!("User not found: {}", id)));
    }

    Ok(())
}

/// Bump the lifetime cards-collected counter on a user's stats document.
///
/// Deliberately increment-only: removals do not decrement it.
pub async fn increment_cards_collected(
    pool: &Pool,
    id: Uuid,
    delta: i64,
) -> Result<(), DatabaseError> {
    let client = get_client(pool).await?;

    client
        .execute(
            r#"
            UPDATE users
            SET stats = jsonb_set(
                    stats,
                    '{totalCardsCollected}',
                    to_jsonb(COALESCE((stats->>'totalCardsCollected')::bigint, 0) + $2)
                ),
                updated_at = NOW()
            WHERE id = $1
            "#,
            &[&id, &delta],
        )
        .await?;

    Ok(())
}

// ============================================
// CARD QUERIES
// ============================================

/// Catalog listing filters. All optional; only playable cards are listed.
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    pub faction: Option<Faction>,
    pub rarity: Option<Rarity>,
    pub card_type: Option<CardType>,
    /// Case-insensitive substring match on name or description.
    pub search: Option<String>,
    pub sort: CardSort,
}

/// Catalog listing sort orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardSort {
    #[default]
    CardId,
    Name,
    Cost,
    Rarity,
}

/// List playable catalog cards with optional filters.
pub async fn list_cards(pool: &Pool, filter: &CardFilter) -> Result<Vec<CardRecord>, DatabaseError> {
    debug!("Listing cards with filter: {:?}", filter);

    let client = get_client(pool).await?;

    let mut sql = format!("SELECT {} FROM cards WHERE is_playable = TRUE", CARD_COLUMNS);
    let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

    let faction = filter.faction.map(|f| f.as_str());
    let rarity = filter.rarity.map(|r| r.as_str());
    let card_type = filter.card_type.map(|t| t.as_str());
    let pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

    if let Some(ref value) = faction {
        params.push(value);
        sql.push_str(&format!(" AND faction = ${}", params.len()));
    }
    if let Some(ref value) = rarity {
        params.push(value);
        sql.push_str(&format!(" AND rarity = ${}", params.len()));
    }
    if let Some(ref value) = card_type {
        params.push(value);
        sql.push_str(&format!(" AND card_type = ${}", params.len()));
    }
    if let Some(ref value) = pattern {
        params.push(value);
        let n = params.len();
        sql.push_str(&format!(" AND (name ILIKE ${} OR description ILIKE ${})", n, n));
    }

    sql.push_str(match filter.sort {
        CardSort::Name => " ORDER BY name ASC",
        CardSort::Cost => " ORDER BY cost ASC, name ASC",
        CardSort::Rarity => " ORDER BY rarity ASC, name ASC",
        CardSort::CardId => " ORDER BY card_id ASC",
    });

    let rows = client.query(&sql, &params).await?;

    rows.iter().map(row_to_card).collect()
}

/// Load the entire catalog, including unplayable cards. Startup path for
/// the in-memory catalog cache.
pub async fn load_all_cards(pool: &Pool) -> Result<Vec<CardRecord>, DatabaseError> {
    let client = get_client(pool).await?;

    let rows = client
        .query(&format!("SELECT {} FROM cards", CARD_COLUMNS), &[])
        .await?;

    rows.iter().map(row_to_card).collect()
}

/// Get a single card by its canonical id.
pub async fn get_card(pool: &Pool, card_id: &str) -> Result<Option<CardRecord>, DatabaseError> {
    let client = get_client(pool).await?;

    let rows = client
        .query(
            &format!("SELECT {} FROM cards WHERE card_id = $1", CARD_COLUMNS),
            &[&card_id],
        )
        .await?;

    rows.first().map(row_to_card).transpose()
}

/// Insert a new catalog card. Fails on duplicate id.
pub async fn insert_card(pool: &Pool, card: &CardRecord) -> Result<(), DatabaseError> {
    let client = get_client(pool).await?;

    client
        .execute(
            r#"
            INSERT INTO cards (
                card_id, name, description, card_type, rarity, cost, attack,
                health, faction, keywords, image_url, set_name, flavor,
                is_playable, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16)
            "#,
            &[
                &card.card_id,
                &card.name,
                &card.description,
                &card.card_type.as_str(),
                &card.rarity.as_str(),
                &card.cost,
                &card.attack,
                &card.health,
                &card.faction.as_str(),
                &card.keywords,
                &card.image_url,
                &card.set,
                &card.flavor,
                &card.is_playable,
                &card.created_at,
                &card.updated_at,
            ],
        )
        .await?;

    info!("Card created: {}", card.card_id);
    Ok(())
}

/// Insert or replace a catalog card, keyed by id. Bulk-import path: the
/// catalog source is append-only, so reseeding replaces by id without
/// touching rows other sets contributed.
pub async fn upsert_card(pool: &Pool, card: &CardRecord) -> Result<(), DatabaseError> {
    let client = get_client(pool).await?;

    client
        .execute(
            r#"
            INSERT INTO cards (
                card_id, name, description, card_type, rarity, cost, attack,
                health, faction, keywords, image_url, set_name, flavor,
                is_playable, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16)
            ON CONFLICT (card_id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                card_type = EXCLUDED.card_type,
                rarity = EXCLUDED.rarity,
                cost = EXCLUDED.cost,
                attack = EXCLUDED.attack,
                health = EXCLUDED.health,
                faction = EXCLUDED.faction,
                keywords = EXCLUDED.keywords,
                image_url = EXCLUDED.image_url,
                set_name = EXCLUDED.set_name,
                flavor = EXCLUDED.flavor,
                is_playable = EXCLUDED.is_playable,
                updated_at = EXCLUDED.updated_at
            "#,
            &[
                &card.card_id,
                &card.name,
                &card.description,
                &card.card_type.as_str(),
                &card.rarity.as_str(),
                &card.cost,
                &card.attack,
                &card.health,
                &card.faction.as_str(),
                &card.keywords,
                &card.image_url,
                &card.set,
                &card.flavor,
                &card.is_playable,
                &card.created_at,
                &card.updated_at,
            ],
        )
        .await?;

    Ok(())
}

/// Replace an existing catalog card.
pub async fn update_card(pool: &Pool, card: &CardRecord) -> Result<(), DatabaseError> {
    let client = get_client(pool).await?;

    let rows_affected = client
        .execute(
            r#"
            UPDATE cards
            SET name = $2, description = $3, card_type = $4, rarity = $5,
                cost = $6, attack = $7, health = $8, faction = $9,
                keywords = $10, image_url = $11, set_name = $12, flavor = $13,
                is_playable = $14, updated_at = $15
            WHERE card_id = $1
            "#,
            &[
                &card.card_id,
                &card.name,
                &card.description,
                &card.card_type.as_str(),
                &card.rarity.as_str(),
                &card.cost,
                &card.attack,
                &card.health,
                &card.faction.as_str(),
                &card.keywords,
                &card.image_url,
                &card.set,
                &card.flavor,
                &card.is_playable,
                &card.updated_at,
            ],
        )
        .await?;

    if rows_affected == 0 {
        return Err(DatabaseError::NotFound(format!("Card not found: {}", card.card_id)));
    }

    Ok(())
}

/// Delete a catalog card.
pub async fn delete_card(pool: &Pool, card_id: &str) -> Result<(), DatabaseError> {
    let client = get_client(pool).await?;

    let rows_affected = client
        .execute("DELETE FROM cards WHERE card_id = $1", &[&card_id])
        .await?;

    if rows_affected == 0 {
        return Err(DatabaseError::NotFound(format!("Card not found: {}", card_id)));
    }

    info!("Card deleted: {}", card_id);
    Ok(())
}

// ============================================
// COLLECTION QUERIES
// ============================================

/// Get a user's collection document.
pub async fn get_collection(
    pool: &Pool,
    user_id: Uuid,
) -> Result<Option<CollectionRecord>, DatabaseError> {
    debug!("Fetching collection for user: {}", user_id);

    let client = get_client(pool).await?;

    let rows = client
        .query(
            "SELECT user_id, cards, stats, created_at, updated_at \
             FROM collections WHERE user_id = $1",
            &[&user_id],
        )
        .await?;

    rows.first().map(row_to_collection).transpose()
}

/// Create or replace a collection document.
///
/// The whole entity is written back: the caller has already mutated the
/// ledger and recomputed the stats block.
pub async fn upsert_collection(
    pool: &Pool,
    collection: &CollectionRecord,
) -> Result<(), DatabaseError> {
    debug!("Upserting collection for user: {}", collection.user_id);

    let client = get_client(pool).await?;

    client
        .execute(
            r#"
            INSERT INTO collections (user_id, cards, stats, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                cards = EXCLUDED.cards,
                stats = EXCLUDED.stats,
                updated_at = EXCLUDED.updated_at
            "#,
            &[
                &collection.user_id,
                &serde_json::to_value(&collection.cards)?,
                &serde_json::to_value(&collection.stats)?,
                &collection.created_at,
                &collection.updated_at,
            ],
        )
        .await?;

    Ok(())
}

// ============================================
// DECK QUERIES
// ============================================

/// Public deck search sort orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeckSort {
    /// Most recently updated first.
    #[default]
    Recent,
    /// Highest win rate first.
    WinRate,
    /// Most games played first.
    Popular,
}

/// List a user's decks, most recently updated first.
pub async fn list_decks_by_user(
    pool: &Pool,
    user_id: Uuid,
) -> Result<Vec<DeckRecord>, DatabaseError> {
    debug!("Listing decks for user: {}", user_id);

    let client = get_client(pool).await?;

    let rows = client
        .query(
            &format!(
                "SELECT {} FROM decks WHERE user_id = $1 ORDER BY updated_at DESC",
                DECK_COLUMNS
            ),
            &[&user_id],
        )
        .await?;

    rows.iter().map(row_to_deck).collect()
}

/// Get one deck, scoped to its owner. Ownership enforcement happens here:
/// a deck id belonging to another user reads as absent.
pub async fn get_deck(
    pool: &Pool,
    deck_id: Uuid,
    user_id: Uuid,
) -> Result<Option<DeckRecord>, DatabaseError> {
    let client = get_client(pool).await?;

    let rows = client
        .query(
            &format!(
                "SELECT {} FROM decks WHERE id = $1 AND user_id = $2",
                DECK_COLUMNS
            ),
            &[&deck_id, &user_id],
        )
        .await?;

    rows.first().map(row_to_deck).transpose()
}

/// Insert a new deck document.
pub async fn insert_deck(pool: &Pool, deck: &DeckRecord) -> Result<(), DatabaseError> {
    let client = get_client(pool).await?;

    client
        .execute(
            r#"
            INSERT INTO decks (
                id, user_id, name, description, cards, main_faction, legend_id,
                format, stats, is_valid, is_public, is_favorite, game_stats,
                cover_card, tags, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17)
            "#,
            &[
                &deck.id,
                &deck.user_id,
                &deck.name,
                &deck.description,
                &serde_json::to_value(&deck.cards)?,
                &deck.main_faction.as_str(),
                &deck.legend_id,
                &deck.format.as_str(),
                &serde_json::to_value(&deck.stats)?,
                &deck.is_valid,
                &deck.is_public,
                &deck.is_favorite,
                &serde_json::to_value(&deck.game_stats)?,
                &deck.cover_card,
                &deck.tags,
                &deck.created_at,
                &deck.updated_at,
            ],
        )
        .await?;

    info!("Deck created: {} ({})", deck.name, deck.id);
    Ok(())
}

/// Write back a mutated deck document, scoped to its owner.
pub async fn update_deck(pool: &Pool, deck: &DeckRecord) -> Result<(), DatabaseError> {
    let client = get_client(pool).await?;

    let rows_affected = client
        .execute(
            r#"
            UPDATE decks
            SET name = $3, description = $4, cards = $5, main_faction = $6,
                legend_id = $7, format = $8, stats = $9, is_valid = $10,
                is_public = $11, is_favorite = $12, game_stats = $13,
                cover_card = $14, tags = $15, updated_at = $16
            WHERE id = $1 AND user_id = $2
            "#,
            &[
                &deck.id,
                &deck.user_id,
                &deck.name,
                &deck.description,
                &serde_json::to_value(&deck.cards)?,
                &deck.main_faction.as_str(),
                &deck.legend_id,
                &deck.format.as_str(),
                &serde_json::to_value(&deck.stats)?,
                &deck.is_valid,
                &deck.is_public,
                &deck.is_favorite,
                &serde_json::to_value(&deck.game_stats)?,
                &deck.cover_card,
                &deck.tags,
                &deck.updated_at,
            ],
        )
        .await?;

    if rows_affected == 0 {
        return Err(DatabaseError::NotFound(format!("Deck not found: {}", deck.id)));
    }

    Ok(())
}

/// Delete a deck, scoped to its owner. Returns whether a row was removed.
pub async fn delete_deck(pool: &Pool, deck_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
    let client = get_client(pool).await?;

    let rows_affected = client
        .execute(
            "DELETE FROM decks WHERE id = $1 AND user_id = $2",
            &[&deck_id, &user_id],
        )
        .await?;

    Ok(rows_affected > 0)
}

/// Search public decks, returning summaries without card lists.
pub async fn search_public_decks(
    pool: &Pool,
    faction: Option<DeckFaction>,
    search: Option<&str>,
    sort: DeckSort,
) -> Result<Vec<DeckSummary>, DatabaseError> {
    let client = get_client(pool).await?;

    let mut sql = String::from(
        "SELECT id, user_id, name, description, main_faction, legend_id, format, \
         stats, is_valid, game_stats, cover_card, tags, updated_at \
         FROM decks WHERE is_public = TRUE",
    );
    let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

    let faction = faction.map(|f| f.as_str());
    let pattern = search.map(|s| format!("%{}%", s));

    if let Some(ref value) = faction {
        params.push(value);
        sql.push_str(&format!(" AND main_faction = ${}", params.len()));
    }
    if let Some(ref value) = pattern {
        params.push(value);
        sql.push_str(&format!(" AND name ILIKE ${}", params.len()));
    }

    sql.push_str(match sort {
        DeckSort::WinRate => {
            " ORDER BY COALESCE((game_stats->>'winRate')::numeric, 0) DESC, updated_at DESC"
        }
        DeckSort::Popular => {
            " ORDER BY COALESCE((game_stats->>'timesPlayed')::numeric, 0) DESC, updated_at DESC"
        }
        DeckSort::Recent => " ORDER BY updated_at DESC",
    });
    sql.push_str(" LIMIT 50");

    let rows = client.query(&sql, &params).await?;

    rows.iter().map(row_to_deck_summary).collect()
}
