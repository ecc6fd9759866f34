//! # Riftbound Companion Backend Service
//!
//! This is the main entry point for the backend service behind the
//! Riftbound trading-card-game companion app. It provides:
//!
//! - REST API for accounts, the card catalog, collections and decks
//! - JWT bearer authentication for all user-scoped endpoints
//! - An in-memory catalog cache backing all stats recomputation
//! - PostgreSQL storage for accounts and ledger documents
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       BACKEND SERVICE                        │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                   REST API (Actix)                    │   │
//! │  │  /api/auth   /api/cards   /api/collections  /api/decks│   │
//! │  └──────────────────────────┬───────────────────────────┘   │
//! │                             │  AuthUser / AdminUser          │
//! │  ┌──────────────────────────┴───────────────────────────┐   │
//! │  │                    SERVICE LAYER                      │   │
//! │  │ ┌────────────┐ ┌───────────────┐ ┌────────────────┐  │   │
//! │  │ │CardCatalog │ │CollectionMgr  │ │DeckManager     │  │   │
//! │  │ │ (cache)    │ │ ledger+stats  │ │ ledger+legality│  │   │
//! │  │ └────────────┘ └───────────────┘ └────────────────┘  │   │
//! │  └──────────────────────────┬───────────────────────────┘   │
//! │                             │                                │
//! │                      ┌──────┴──────┐                         │
//! │                      │  PostgreSQL │                         │
//! │                      │  (JSONB)    │                         │
//! │                      └─────────────┘                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! 1. Set up PostgreSQL and create the database
//! 2. Copy `.env.example` to `.env` and configure
//! 3. Start the server: `cargo run` (migrations run automatically)
//!
//! ## Environment Variables
//!
//! See `.env.example` for all required configuration.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod api;
mod auth;
mod config;
mod db;
mod ledger;
mod models;
mod services;

use config::AppConfig;
use db::Database;
use services::{AccountManager, CardCatalog, CollectionManager, DeckManager};

/// Application state shared across all handlers.
///
/// This struct contains all the shared resources that API handlers
/// and the auth extractors need access to.
pub struct AppState {
    /// Database connection pool for PostgreSQL
    pub db: Database,

    /// In-memory card catalog cache
    pub catalog: Arc<CardCatalog>,

    /// Account service
    pub accounts: AccountManager,

    /// Collection service
    pub collections: CollectionManager,

    /// Deck service
    pub decks: DeckManager,

    /// Application configuration
    pub config: AppConfig,
}

/// Main entry point for the backend service.
///
/// This function:
/// 1. Loads configuration from environment
/// 2. Initializes database connection and runs migrations
/// 3. Loads the card catalog into memory
/// 4. Wires up the services
/// 5. Launches the HTTP server
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // =========================================
    // STEP 1: Initialize Logging
    // =========================================
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("🚀 Starting Riftbound Companion Backend Service");

    // =========================================
    // STEP 2: Load Configuration
    // =========================================
    dotenvy::dotenv().ok(); // It's okay if .env doesn't exist

    let config = AppConfig::from_env().expect("Failed to load configuration");

    info!("📋 Configuration loaded");
    info!("   Token lifetime: {}h", config.jwt_expire_hours);

    // =========================================
    // STEP 3: Initialize Database
    // =========================================
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    info!("🗄️  Database connected");

    db.run_migrations().await.expect("Failed to run migrations");

    info!("📦 Database migrations complete");

    // =========================================
    // STEP 4: Load Card Catalog
    // =========================================
    let catalog = Arc::new(CardCatalog::new(db.clone()));
    let card_count = catalog
        .reload()
        .await
        .expect("Failed to load card catalog");

    info!("🃏 Card catalog loaded ({} cards)", card_count);

    // =========================================
    // STEP 5: Initialize Services
    // =========================================
    let accounts = AccountManager::new(db.clone());
    let collections = CollectionManager::new(db.clone(), catalog.clone());
    let decks = DeckManager::new(db.clone(), catalog.clone());

    info!("🔧 Services initialized");

    // =========================================
    // STEP 6: Create Application State
    // =========================================
    let app_state = Arc::new(AppState {
        db: db.clone(),
        catalog,
        accounts,
        collections,
        decks,
        config: config.clone(),
    });

    // =========================================
    // STEP 7: Start HTTP Server
    // =========================================
    let server_host = config.server_host.clone();
    let server_port = config.server_port;

    info!("🌐 Starting HTTP server on {}:{}", server_host, server_port);

    HttpServer::new(move || {
        App::new()
            // Attach shared application state
            .app_data(web::Data::new(app_state.clone()))
            // Browser clients live on other origins during development
            .wrap(Cors::permissive())
            // Add logging middleware
            .wrap(middleware::Logger::default())
            // Configure API routes
            .configure(api::configure_routes)
    })
    .bind(format!("{}:{}", server_host, server_port))?
    .run()
    .await
}
