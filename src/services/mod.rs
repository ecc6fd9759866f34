//! # Services Module
//!
//! Business logic, one service per aggregate:
//!
//! - [`CardCatalog`] - In-memory catalog cache, card lookup and admin maintenance
//! - [`CollectionManager`] - Per-user collection ledger operations
//! - [`DeckManager`] - Deck CRUD, ledger mutations, legality, game results
//! - [`AccountManager`] - Registration, login, profile maintenance
//!
//! Services own the mutate-recompute-persist cycle: handlers never touch the
//! database or the ledger primitives directly.

pub mod account_manager;
pub mod catalog;
pub mod collection_manager;
pub mod deck_manager;

pub use account_manager::{AccountError, AccountManager};
pub use catalog::{CardCatalog, CatalogError};
pub use collection_manager::{CollectionError, CollectionManager};
pub use deck_manager::{DeckError, DeckManager};
