//! # API Request Handlers
//!
//! This module contains the handler functions for each API endpoint.
//! Each handler:
//! 1. Extracts request data (and the authenticated user where required)
//! 2. Calls the appropriate service
//! 3. Maps service errors onto HTTP status codes
//! 4. Returns a formatted response
//!
//! ## Error Handling
//!
//! All errors are caught and returned as JSON:
//!
//! ```json
//! {
//!     "success": false,
//!     "error": {
//!         "code": "CARD_NOT_FOUND",
//!         "message": "Card not found: FIRE999"
//!     }
//! }
//! ```

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::{self, AdminUser, AuthUser};
use crate::db::queries::{CardFilter, CardSort, DeckSort};
use crate::db::CardRecord;
use crate::ledger::LedgerEntry;
use crate::models::{
    AddCollectionCardRequest, AddDeckCardRequest, ApiResponse, AuthResponse, CardListResponse,
    CardPayload, CardQuery, ChangePasswordRequest, CreateDeckRequest, DeckListResponse,
    DeckSearchQuery, DeckSearchResponse, DetailedCollectionResponse, DetailedDeckResponse,
    DetailedLedgerEntry, FavoriteRequest, FavoriteResponse, GameResultRequest, HealthResponse,
    ImportSummary, LoginRequest, PublicCollectionResponse, RegisterRequest, RemoveCardRequest,
    UpdateDeckRequest, UpdateProfileRequest, ValidateDeckResponse,
};
use crate::services::{AccountError, CardCatalog, CatalogError, CollectionError, DeckError};
use crate::AppState;

// ============================================
// ERROR MAPPING
// ============================================

fn internal_error<E: std::fmt::Display>(e: E) -> HttpResponse {
    error!("Internal error: {}", e);
    HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
        "INTERNAL_ERROR",
        "An internal error occurred",
    ))
}

fn account_error(e: AccountError) -> HttpResponse {
    match &e {
        AccountError::EmailTaken => {
            HttpResponse::Conflict().json(ApiResponse::<()>::error("EMAIL_TAKEN", &e.to_string()))
        }
        AccountError::UsernameTaken => HttpResponse::Conflict()
            .json(ApiResponse::<()>::error("USERNAME_TAKEN", &e.to_string())),
        AccountError::InvalidCredentials => HttpResponse::Unauthorized()
            .json(ApiResponse::<()>::error("INVALID_CREDENTIALS", &e.to_string())),
        AccountError::AccountDisabled => HttpResponse::Forbidden()
            .json(ApiResponse::<()>::error("ACCOUNT_DISABLED", &e.to_string())),
        AccountError::UserNotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::<()>::error("NOT_FOUND", &e.to_string()))
        }
        AccountError::InvalidInput(_) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::error("VALIDATION", &e.to_string()))
        }
        AccountError::Hash(_) | AccountError::Database(_) => internal_error(e),
    }
}

fn catalog_error(e: CatalogError) -> HttpResponse {
    match &e {
        CatalogError::CardNotFound(_) => HttpResponse::NotFound()
            .json(ApiResponse::<()>::error("CARD_NOT_FOUND", &e.to_string())),
        CatalogError::DuplicateCard(_) => {
            HttpResponse::Conflict().json(ApiResponse::<()>::error("CARD_EXISTS", &e.to_string()))
        }
        CatalogError::Database(_) => internal_error(e),
    }
}

fn collection_error(e: CollectionError) -> HttpResponse {
    match &e {
        CollectionError::CardNotFound(_) => HttpResponse::NotFound()
            .json(ApiResponse::<()>::error("CARD_NOT_FOUND", &e.to_string())),
        CollectionError::CollectionNotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::<()>::error("NOT_FOUND", &e.to_string()))
        }
        CollectionError::InvalidQuantity(_) => HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("INVALID_QUANTITY", &e.to_string())),
        CollectionError::Database(_) => internal_error(e),
    }
}

fn deck_error(e: DeckError) -> HttpResponse {
    match &e {
        DeckError::DeckNotFound(_) => HttpResponse::NotFound()
            .json(ApiResponse::<()>::error("DECK_NOT_FOUND", &e.to_string())),
        DeckError::CardNotFound(_) | DeckError::CardNotInDeck(_) => HttpResponse::NotFound()
            .json(ApiResponse::<()>::error("CARD_NOT_FOUND", &e.to_string())),
        DeckError::InvalidQuantity(_) => HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("INVALID_QUANTITY", &e.to_string())),
        DeckError::InvalidInput(_) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::error("VALIDATION", &e.to_string()))
        }
        DeckError::Database(_) => internal_error(e),
    }
}

// ============================================
// SHARED HELPERS
// ============================================

/// Join ledger entries with their catalog cards for detailed views.
fn detail_entries(entries: &[LedgerEntry], catalog: &CardCatalog) -> Vec<DetailedLedgerEntry> {
    entries
        .iter()
        .map(|entry| DetailedLedgerEntry {
            entry: entry.clone(),
            details: catalog.resolve(&entry.card_id),
        })
        .collect()
}

fn card_record_from_payload(payload: CardPayload) -> CardRecord {
    let now = Utc::now();
    CardRecord {
        card_id: payload.card_id,
        name: payload.name,
        description: payload.description,
        card_type: payload.card_type,
        rarity: payload.rarity,
        cost: payload.cost,
        attack: payload.attack,
        health: payload.health,
        faction: payload.faction,
        keywords: payload.keywords,
        image_url: payload.image_url,
        set: payload.set.unwrap_or_else(|| "Base".to_string()),
        flavor: payload.flavor,
        is_playable: payload.is_playable.unwrap_or(true),
        created_at: now,
        updated_at: now,
    }
}

fn card_sort(query: &CardQuery) -> CardSort {
    match query.sort.as_deref() {
        Some("name") => CardSort::Name,
        Some("cost") => CardSort::Cost,
        Some("rarity") => CardSort::Rarity,
        _ => CardSort::CardId,
    }
}

fn deck_sort(query: &DeckSearchQuery) -> DeckSort {
    match query.sort.as_deref() {
        Some("winrate") => DeckSort::WinRate,
        Some("popular") => DeckSort::Popular,
        _ => DeckSort::Recent,
    }
}

// ============================================
// ROOT & HEALTH
// ============================================

/// API information endpoint (root).
///
/// ## Endpoint
///
/// `GET /`
pub async fn api_info() -> HttpResponse {
    let info = json!({
        "name": "Riftbound Companion API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Backend API for the Riftbound TCG companion app",
        "endpoints": {
            "auth": "/api/auth",
            "cards": "/api/cards",
            "collections": "/api/collections",
            "decks": "/api/decks",
            "health": "/health"
        }
    });

    HttpResponse::Ok().json(ApiResponse::success(info))
}

/// Health check endpoint.
///
/// ## Endpoint
///
/// `GET /health`
///
/// ## Example
///
/// ```bash
/// curl http://127.0.0.1:8080/health
/// ```
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "status": "healthy",
///         "database": "connected",
///         "version": "0.1.0",
///         "timestamp": "2026-08-28T12:00:00Z"
///     }
/// }
/// ```
pub async fn health_check(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let db_healthy = state.db.pool().get().await.is_ok();

    HttpResponse::Ok().json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        database: if db_healthy { "connected" } else { "disconnected" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    }))
}

// ============================================
// AUTH HANDLERS
// ============================================

/// Register a new account.
///
/// ## Endpoint
///
/// `POST /api/auth/register`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/auth/register \
///     -H "Content-Type: application/json" \
///     -d '{"username": "rift_walker", "email": "walker@example.com", "password": "hunter42"}'
/// ```
///
/// Returns 201 with a token and the new account, 409 when the email or
/// username is already taken.
pub async fn register(
    state: web::Data<Arc<AppState>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    let user = match state.accounts.register(request.into_inner()).await {
        Ok(user) => user,
        Err(e) => return account_error(e),
    };

    // Every account starts with an (empty) collection.
    if let Err(e) = state.collections.get_or_create(user.id).await {
        return collection_error(e);
    }

    let token = match auth::issue_token(
        user.id,
        &state.config.jwt_secret,
        state.config.jwt_expire_hours,
    ) {
        Ok(token) => token,
        Err(e) => return internal_error(e),
    };

    HttpResponse::Created().json(ApiResponse::success(AuthResponse { token, user }))
}

/// Log in with email and password.
///
/// ## Endpoint
///
/// `POST /api/auth/login`
pub async fn login(
    state: web::Data<Arc<AppState>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    let user = match state.accounts.login(&request.email, &request.password).await {
        Ok(user) => user,
        Err(e) => return account_error(e),
    };

    let token = match auth::issue_token(
        user.id,
        &state.config.jwt_secret,
        state.config.jwt_expire_hours,
    ) {
        Ok(token) => token,
        Err(e) => return internal_error(e),
    };

    HttpResponse::Ok().json(ApiResponse::success(AuthResponse { token, user }))
}

/// Get the authenticated account.
///
/// ## Endpoint
///
/// `GET /api/auth/me`
pub async fn me(user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(user.0))
}

/// Update profile fields of the authenticated account.
///
/// ## Endpoint
///
/// `PUT /api/auth/update-profile`
pub async fn update_profile(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    match state
        .accounts
        .update_profile(user.0.id, request.into_inner())
        .await
    {
        Ok(updated) => HttpResponse::Ok().json(ApiResponse::success(updated)),
        Err(e) => account_error(e),
    }
}

/// Change the password of the authenticated account.
///
/// ## Endpoint
///
/// `PUT /api/auth/change-password`
pub async fn change_password(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    request: web::Json<ChangePasswordRequest>,
) -> HttpResponse {
    match state
        .accounts
        .change_password(user.0.id, &request.current_password, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success(json!({
            "message": "Password changed successfully"
        }))),
        Err(e) => account_error(e),
    }
}

// ============================================
// CARD HANDLERS
// ============================================

/// List playable catalog cards.
///
/// ## Endpoint
///
/// `GET /api/cards`
///
/// ## Query Parameters
///
/// | Parameter | Description |
/// |-----------|-------------|
/// | `faction` | Filter by faction, e.g. `Fire` |
/// | `rarity` | Filter by rarity, e.g. `Legendary` |
/// | `type` | Filter by card type, e.g. `Unit` |
/// | `search` | Substring match on name/description |
/// | `sort` | `name`, `cost` or `rarity` |
///
/// ## Example
///
/// ```bash
/// curl "http://127.0.0.1:8080/api/cards?faction=Fire&sort=cost"
/// ```
pub async fn list_cards(
    state: web::Data<Arc<AppState>>,
    query: web::Query<CardQuery>,
) -> HttpResponse {
    let filter = CardFilter {
        faction: query.faction,
        rarity: query.rarity,
        card_type: query.card_type,
        search: query.search.clone(),
        sort: card_sort(&query),
    };

    match state.catalog.list(&filter).await {
        Ok(cards) => HttpResponse::Ok().json(ApiResponse::success(CardListResponse {
            count: cards.len(),
            cards,
        })),
        Err(e) => catalog_error(e),
    }
}

/// Get a single catalog card.
///
/// ## Endpoint
///
/// `GET /api/cards/{cardId}`
pub async fn get_card(
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> HttpResponse {
    match state.catalog.get(&path.into_inner()).await {
        Ok(card) => HttpResponse::Ok().json(ApiResponse::success(card)),
        Err(e) => catalog_error(e),
    }
}

/// Aggregate counts over the whole catalog.
///
/// ## Endpoint
///
/// `GET /api/cards/stats/overview`
pub async fn card_stats_overview(state: web::Data<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(state.catalog.overview()))
}

/// Create a catalog card. Admin only.
///
/// ## Endpoint
///
/// `POST /api/cards`
pub async fn create_card(
    state: web::Data<Arc<AppState>>,
    admin: AdminUser,
    payload: web::Json<CardPayload>,
) -> HttpResponse {
    let record = card_record_from_payload(payload.into_inner());
    match state.catalog.create(record).await {
        Ok(card) => {
            info!("Card {} created by admin {}", card.card_id, admin.0.username);
            HttpResponse::Created().json(ApiResponse::success(card))
        }
        Err(e) => catalog_error(e),
    }
}

/// Update a catalog card. Admin only. The path id wins over any id in the
/// body.
///
/// ## Endpoint
///
/// `PUT /api/cards/{cardId}`
pub async fn update_card(
    state: web::Data<Arc<AppState>>,
    _admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<CardPayload>,
) -> HttpResponse {
    let mut record = card_record_from_payload(payload.into_inner());
    record.card_id = path.into_inner();

    match state.catalog.update(record).await {
        Ok(card) => HttpResponse::Ok().json(ApiResponse::success(card)),
        Err(e) => catalog_error(e),
    }
}

/// Delete a catalog card. Admin only.
///
/// ## Endpoint
///
/// `DELETE /api/cards/{cardId}`
pub async fn delete_card(
    state: web::Data<Arc<AppState>>,
    _admin: AdminUser,
    path: web::Path<String>,
) -> HttpResponse {
    let card_id = path.into_inner();
    match state.catalog.delete(&card_id).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success(json!({
            "message": "Card deleted",
            "cardId": card_id
        }))),
        Err(e) => catalog_error(e),
    }
}

/// Bulk-import catalog cards, replacing by id. Admin only.
///
/// ## Endpoint
///
/// `POST /api/cards/import`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/cards/import \
///     -H "Authorization: Bearer <token>" \
///     -H "Content-Type: application/json" \
///     -d @cards.json
/// ```
pub async fn import_cards(
    state: web::Data<Arc<AppState>>,
    admin: AdminUser,
    payload: web::Json<Vec<CardPayload>>,
) -> HttpResponse {
    let records: Vec<CardRecord> = payload
        .into_inner()
        .into_iter()
        .map(card_record_from_payload)
        .collect();

    match state.catalog.import(records).await {
        Ok(imported) => {
            info!("{} cards imported by admin {}", imported, admin.0.username);
            HttpResponse::Ok().json(ApiResponse::success(ImportSummary {
                imported,
                catalog_size: state.catalog.overview().total_cards,
            }))
        }
        Err(e) => catalog_error(e),
    }
}

// ============================================
// COLLECTION HANDLERS
// ============================================

/// Get the caller's collection, creating an empty one on first access.
///
/// ## Endpoint
///
/// `GET /api/collections/me`
pub async fn get_my_collection(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
) -> HttpResponse {
    match state.collections.get_or_create(user.0.id).await {
        Ok(collection) => HttpResponse::Ok().json(ApiResponse::success(collection)),
        Err(e) => collection_error(e),
    }
}

/// Get the caller's collection with catalog details on every entry.
///
/// ## Endpoint
///
/// `GET /api/collections/me/detailed`
pub async fn get_my_collection_detailed(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
) -> HttpResponse {
    match state.collections.get_or_create(user.0.id).await {
        Ok(collection) => {
            let cards = detail_entries(&collection.cards, &state.catalog);
            HttpResponse::Ok().json(ApiResponse::success(DetailedCollectionResponse {
                user_id: collection.user_id,
                cards,
                stats: collection.stats,
                updated_at: collection.updated_at,
            }))
        }
        Err(e) => collection_error(e),
    }
}

/// Recompute and return the caller's collection stats. Useful after a
/// catalog reseed.
///
/// ## Endpoint
///
/// `GET /api/collections/me/stats`
pub async fn get_my_collection_stats(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
) -> HttpResponse {
    match state.collections.refresh_stats(user.0.id).await {
        Ok(collection) => HttpResponse::Ok().json(ApiResponse::success(collection.stats)),
        Err(e) => collection_error(e),
    }
}

/// Add copies of a card to the caller's collection.
///
/// ## Endpoint
///
/// `POST /api/collections/cards`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/collections/cards \
///     -H "Authorization: Bearer <token>" \
///     -H "Content-Type: application/json" \
///     -d '{"cardId": "FIRE001", "quantity": 3, "source": "Pack"}'
/// ```
pub async fn add_collection_card(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    request: web::Json<AddCollectionCardRequest>,
) -> HttpResponse {
    match state
        .collections
        .add_card(user.0.id, &request.card_id, request.quantity, request.source)
        .await
    {
        Ok(collection) => HttpResponse::Ok().json(ApiResponse::success(collection)),
        Err(e) => collection_error(e),
    }
}

/// Remove copies of a card from the caller's collection. The body is
/// optional; omitting it removes one copy.
///
/// ## Endpoint
///
/// `DELETE /api/collections/cards/{cardId}`
pub async fn remove_collection_card(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    path: web::Path<String>,
    request: Option<web::Json<RemoveCardRequest>>,
) -> HttpResponse {
    let quantity = request.map(|r| r.quantity).unwrap_or(1);

    match state
        .collections
        .remove_card(user.0.id, &path.into_inner(), quantity)
        .await
    {
        Ok(collection) => HttpResponse::Ok().json(ApiResponse::success(collection)),
        Err(e) => collection_error(e),
    }
}

/// Set or toggle the favorite flag on a collection entry.
///
/// ## Endpoint
///
/// `PUT /api/collections/cards/{cardId}/favorite`
pub async fn favorite_card(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    path: web::Path<String>,
    request: Option<web::Json<FavoriteRequest>>,
) -> HttpResponse {
    let card_id = path.into_inner();
    let is_favorite = request.and_then(|r| r.is_favorite);

    match state
        .collections
        .set_favorite(user.0.id, &card_id, is_favorite)
        .await
    {
        Ok((collection, favorite_now)) => {
            HttpResponse::Ok().json(ApiResponse::success(FavoriteResponse {
                card_id: crate::ledger::normalize_card_id(&card_id),
                is_favorite: favorite_now,
                collection,
            }))
        }
        Err(e) => collection_error(e),
    }
}

/// Get another user's collection stats. No token required: the card list
/// itself stays private, only the aggregate blocks are exposed.
///
/// ## Endpoint
///
/// `GET /api/collections/{userId}`
pub async fn get_public_collection(
    state: web::Data<Arc<AppState>>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    match state.collections.get_public(path.into_inner()).await {
        Ok(collection) => HttpResponse::Ok().json(ApiResponse::success(PublicCollectionResponse {
            user_id: collection.user_id,
            stats: collection.stats,
            updated_at: collection.updated_at,
        })),
        Err(e) => collection_error(e),
    }
}

// ============================================
// DECK HANDLERS
// ============================================

/// List the caller's decks, most recently updated first.
///
/// ## Endpoint
///
/// `GET /api/decks`
pub async fn list_decks(state: web::Data<Arc<AppState>>, user: AuthUser) -> HttpResponse {
    match state.decks.list(user.0.id).await {
        Ok(decks) => HttpResponse::Ok().json(ApiResponse::success(DeckListResponse {
            count: decks.len(),
            decks,
        })),
        Err(e) => deck_error(e),
    }
}

/// Search public decks. No token required.
///
/// ## Endpoint
///
/// `GET /api/decks/public/search`
///
/// ## Query Parameters
///
/// | Parameter | Description |
/// |-----------|-------------|
/// | `faction` | Filter by main faction |
/// | `search` | Substring match on deck name |
/// | `sort` | `winrate`, `popular` or `recent` (default) |
pub async fn search_public_decks(
    state: web::Data<Arc<AppState>>,
    query: web::Query<DeckSearchQuery>,
) -> HttpResponse {
    match state
        .decks
        .search_public(query.faction, query.search.as_deref(), deck_sort(&query))
        .await
    {
        Ok(decks) => HttpResponse::Ok().json(ApiResponse::success(DeckSearchResponse {
            count: decks.len(),
            decks,
        })),
        Err(e) => deck_error(e),
    }
}

/// Create a deck.
///
/// ## Endpoint
///
/// `POST /api/decks`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/decks \
///     -H "Authorization: Bearer <token>" \
///     -H "Content-Type: application/json" \
///     -d '{"name": "Burn Rush", "mainFaction": "Fire", "legendId": "FIRE010"}'
/// ```
pub async fn create_deck(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    request: web::Json<CreateDeckRequest>,
) -> HttpResponse {
    match state.decks.create(user.0.id, request.into_inner()).await {
        Ok(deck) => HttpResponse::Created().json(ApiResponse::success(deck)),
        Err(e) => deck_error(e),
    }
}

/// Get one deck.
///
/// ## Endpoint
///
/// `GET /api/decks/{id}`
pub async fn get_deck(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> HttpResponse {
    match state.decks.get(path.into_inner(), user.0.id).await {
        Ok(deck) => HttpResponse::Ok().json(ApiResponse::success(deck)),
        Err(e) => deck_error(e),
    }
}

/// Get one deck with catalog details on every entry and the legend card
/// resolved.
///
/// ## Endpoint
///
/// `GET /api/decks/{id}/detailed`
pub async fn get_deck_detailed(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> HttpResponse {
    match state.decks.get(path.into_inner(), user.0.id).await {
        Ok(deck) => {
            let cards = detail_entries(&deck.cards, &state.catalog);
            let legend = state.catalog.resolve(&deck.legend_id);
            HttpResponse::Ok().json(ApiResponse::success(DetailedDeckResponse {
                deck,
                cards,
                legend,
            }))
        }
        Err(e) => deck_error(e),
    }
}

/// Update a deck's editable fields.
///
/// ## Endpoint
///
/// `PUT /api/decks/{id}`
pub async fn update_deck(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    path: web::Path<Uuid>,
    request: web::Json<UpdateDeckRequest>,
) -> HttpResponse {
    match state
        .decks
        .update(path.into_inner(), user.0.id, request.into_inner())
        .await
    {
        Ok(deck) => HttpResponse::Ok().json(ApiResponse::success(deck)),
        Err(e) => deck_error(e),
    }
}

/// Delete a deck.
///
/// ## Endpoint
///
/// `DELETE /api/decks/{id}`
pub async fn delete_deck(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let deck_id = path.into_inner();
    match state.decks.delete(deck_id, user.0.id).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success(json!({
            "message": "Deck deleted",
            "deckId": deck_id
        }))),
        Err(e) => deck_error(e),
    }
}

/// Add copies of a card to a deck. The card must exist in the catalog and
/// the per-card total clamps silently at three copies.
///
/// ## Endpoint
///
/// `POST /api/decks/{id}/cards`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/decks/7c9e.../cards \
///     -H "Authorization: Bearer <token>" \
///     -H "Content-Type: application/json" \
///     -d '{"cardId": "FIRE001", "quantity": 2}'
/// ```
pub async fn add_deck_card(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    path: web::Path<Uuid>,
    request: web::Json<AddDeckCardRequest>,
) -> HttpResponse {
    match state
        .decks
        .add_card(path.into_inner(), user.0.id, &request.card_id, request.quantity)
        .await
    {
        Ok(deck) => HttpResponse::Ok().json(ApiResponse::success(deck)),
        Err(e) => deck_error(e),
    }
}

/// Remove copies of a card from a deck. The body is optional; omitting it
/// removes one copy.
///
/// ## Endpoint
///
/// `DELETE /api/decks/{id}/cards/{cardId}`
pub async fn remove_deck_card(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    path: web::Path<(Uuid, String)>,
    request: Option<web::Json<RemoveCardRequest>>,
) -> HttpResponse {
    let (deck_id, card_id) = path.into_inner();
    let quantity = request.map(|r| r.quantity).unwrap_or(1);

    match state
        .decks
        .remove_card(deck_id, user.0.id, &card_id, quantity)
        .await
    {
        Ok(deck) => HttpResponse::Ok().json(ApiResponse::success(deck)),
        Err(e) => deck_error(e),
    }
}

/// Re-run the legality check on a deck and persist the flag.
///
/// ## Endpoint
///
/// `POST /api/decks/{id}/validate`
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "isValid": false,
///         "message": "Deck must contain between 30 and 60 cards",
///         "deck": { ... }
///     }
/// }
/// ```
pub async fn validate_deck(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> HttpResponse {
    match state.decks.validate(path.into_inner(), user.0.id).await {
        Ok((deck, message)) => HttpResponse::Ok().json(ApiResponse::success(ValidateDeckResponse {
            is_valid: deck.is_valid,
            message: message.to_string(),
            deck,
        })),
        Err(e) => deck_error(e),
    }
}

/// Record a finished game against a deck and fold it into the win rate.
///
/// ## Endpoint
///
/// `POST /api/decks/{id}/game-result`
pub async fn record_game(
    state: web::Data<Arc<AppState>>,
    user: AuthUser,
    path: web::Path<Uuid>,
    request: web::Json<GameResultRequest>,
) -> HttpResponse {
    match state
        .decks
        .record_game(path.into_inner(), user.0.id, request.won)
        .await
    {
        Ok(deck) => HttpResponse::Ok().json(ApiResponse::success(deck)),
        Err(e) => deck_error(e),
    }
}
