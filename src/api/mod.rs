//! # REST API Module
//!
//! This module defines all HTTP endpoints for the Riftbound companion API.
//!
//! ## Endpoint Overview
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | API information |
//! | GET | `/health` | Health check |
//! | POST | `/api/auth/register` | Create account |
//! | POST | `/api/auth/login` | Log in |
//! | GET | `/api/auth/me` | Current account |
//! | PUT | `/api/auth/update-profile` | Update profile |
//! | PUT | `/api/auth/change-password` | Change password |
//! | GET | `/api/cards` | List catalog cards |
//! | GET | `/api/cards/{cardId}` | Get one card |
//! | GET | `/api/cards/stats/overview` | Catalog aggregates |
//! | POST | `/api/cards` | Create card (admin) |
//! | PUT | `/api/cards/{cardId}` | Update card (admin) |
//! | DELETE | `/api/cards/{cardId}` | Delete card (admin) |
//! | POST | `/api/cards/import` | Bulk import (admin) |
//! | GET | `/api/collections/me` | My collection |
//! | GET | `/api/collections/me/detailed` | My collection, joined |
//! | GET | `/api/collections/me/stats` | Recompute my stats |
//! | POST | `/api/collections/cards` | Add cards |
//! | DELETE | `/api/collections/cards/{cardId}` | Remove cards |
//! | PUT | `/api/collections/cards/{cardId}/favorite` | Toggle favorite |
//! | GET | `/api/collections/{userId}` | Another user's stats |
//! | GET | `/api/decks` | My decks |
//! | GET | `/api/decks/public/search` | Public deck search |
//! | POST | `/api/decks` | Create deck |
//! | GET | `/api/decks/{id}` | Get deck |
//! | GET | `/api/decks/{id}/detailed` | Get deck, joined |
//! | PUT | `/api/decks/{id}` | Update deck |
//! | DELETE | `/api/decks/{id}` | Delete deck |
//! | POST | `/api/decks/{id}/cards` | Add card to deck |
//! | DELETE | `/api/decks/{id}/cards/{cardId}` | Remove card from deck |
//! | POST | `/api/decks/{id}/validate` | Re-check legality |
//! | POST | `/api/decks/{id}/game-result` | Record a game |
//!
//! ## Request/Response Format
//!
//! All requests and responses use JSON:
//!
//! ```json
//! // Success response
//! {
//!     "success": true,
//!     "data": { ... }
//! }
//!
//! // Error response
//! {
//!     "success": false,
//!     "error": {
//!         "code": "ERROR_CODE",
//!         "message": "Human readable message"
//!     }
//! }
//! ```

pub mod handlers;
pub mod routes;

pub use routes::configure_routes;
