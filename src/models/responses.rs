//! # API Response Models
//!
//! Structures for outgoing API response bodies.
//! All responses are wrapped in a standard format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{CardRecord, CollectionRecord, DeckRecord, DeckSummary, UserRecord};
use crate::ledger::stats::CollectionStats;
use crate::ledger::LedgerEntry;

/// Standard API response wrapper.
///
/// All API responses follow this format:
///
/// ## Success Response
///
/// ```json
/// {
///     "success": true,
///     "data": { ... },
///     "error": null
/// }
/// ```
///
/// ## Error Response
///
/// ```json
/// {
///     "success": false,
///     "data": null,
///     "error": {
///         "code": "DECK_NOT_FOUND",
///         "message": "Deck not found: 7c9e..."
///     }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,

    /// Response data (null on error).
    pub data: Option<T>,

    /// Error information (null on success).
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

/// API error information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Error code (e.g., "CARD_NOT_FOUND").
    pub code: String,

    /// Human-readable error message.
    pub message: String,
}

/// Authentication response: a bearer token plus the account it belongs to.
///
/// Returned by `POST /api/auth/register` and `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Signed JWT to present as `Authorization: Bearer <token>`.
    pub token: String,

    pub user: UserRecord,
}

/// Health check response.
///
/// Returned by `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall status ("healthy").
    pub status: String,

    /// Database connectivity ("connected" / "disconnected").
    pub database: String,

    /// Server version (from Cargo.toml).
    pub version: String,

    /// Current server timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Catalog listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardListResponse {
    pub count: usize,
    pub cards: Vec<CardRecord>,
}

/// Bulk import summary.
///
/// Returned by `POST /api/cards/import`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// How many payloads were written.
    pub imported: usize,

    /// Catalog size after the import.
    pub catalog_size: i64,
}

/// A ledger entry joined with its catalog card.
///
/// `details` is null when the card id is absent from the catalog; the entry
/// itself is still listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedLedgerEntry {
    #[serde(flatten)]
    pub entry: LedgerEntry,

    pub details: Option<CardRecord>,
}

/// Collection response with catalog details joined onto every entry.
///
/// Returned by `GET /api/collections/me/detailed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedCollectionResponse {
    pub user_id: Uuid,
    pub cards: Vec<DetailedLedgerEntry>,
    pub stats: CollectionStats,
    pub updated_at: DateTime<Utc>,
}

/// Another user's collection, stats only.
///
/// Returned by `GET /api/collections/{userId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCollectionResponse {
    pub user_id: Uuid,
    pub stats: CollectionStats,
    pub updated_at: DateTime<Utc>,
}

/// Favorite toggle result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub card_id: String,
    pub is_favorite: bool,
    pub collection: CollectionRecord,
}

/// Deck listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckListResponse {
    pub count: usize,
    pub decks: Vec<DeckRecord>,
}

/// Public deck search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSearchResponse {
    pub count: usize,
    pub decks: Vec<DeckSummary>,
}

/// Deck response with catalog details joined onto every entry, plus the
/// resolved legend card.
///
/// Returned by `GET /api/decks/{id}/detailed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedDeckResponse {
    pub deck: DeckRecord,
    pub cards: Vec<DetailedLedgerEntry>,
    pub legend: Option<CardRecord>,
}

/// Deck validation result.
///
/// Returned by `POST /api/decks/{id}/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDeckResponse {
    pub is_valid: bool,

    /// User-facing explanation of the verdict.
    pub message: String,

    pub deck: DeckRecord,
}
